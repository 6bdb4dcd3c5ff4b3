//! Static Map Renderer
//! Draws a prepared state map into an in-memory bitmap with plotters.
//!
//! Layout:
//! 1. White background
//! 2. Base map outline clipped to the accident range
//! 3. One small dot per accident
//!
//! No text is drawn, so rendering does not depend on installed fonts.

use crate::charts::basemap::{BaseMap, UsaOutline};
use crate::charts::state_map::{MapError, StateMap};
use image::{ImageFormat, RgbImage};
use plotters::prelude::*;
use std::path::Path;
use tracing::debug;

const OUTLINE_COLOR: RGBColor = RGBColor(90, 90, 90);
const POINT_COLOR: RGBColor = BLACK;
const POINT_RADIUS: i32 = 2;
const MARGIN: i32 = 10;

fn render_err<E: std::fmt::Display>(e: E) -> MapError {
    MapError::Render(e.to_string())
}

/// Renders state maps onto a fixed-size bitmap surface.
pub struct MapRenderer {
    pub width: u32,
    pub height: u32,
    basemap: Box<dyn BaseMap + Send + Sync>,
}

impl Default for MapRenderer {
    fn default() -> Self {
        Self::new(1024, 768)
    }
}

impl MapRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            basemap: Box::new(UsaOutline),
        }
    }

    /// Draw `basemap` underneath the points instead of the USA outline.
    pub fn with_basemap(mut self, basemap: impl BaseMap + Send + Sync + 'static) -> Self {
        self.basemap = Box::new(basemap);
        self
    }

    pub fn region(&self) -> &str {
        self.basemap.region()
    }

    /// Draw the map and return the RGB image.
    pub fn render(&self, map: &StateMap) -> Result<RgbImage, MapError> {
        let (w, h) = (self.width, self.height);
        let mut buf = vec![0u8; (w as usize) * (h as usize) * 3];
        let view = map.bounds.visible();

        {
            let root = BitMapBackend::with_buffer(&mut buf, (w, h)).into_drawing_area();
            root.fill(&WHITE).map_err(render_err)?;

            let mut chart = ChartBuilder::on(&root)
                .margin(MARGIN)
                .build_cartesian_2d(view.lon.0..view.lon.1, view.lat.0..view.lat.1)
                .map_err(render_err)?;

            let outline = self.basemap.outline(&view);
            debug!(
                "drawing {} outline pieces of '{}' and {} points",
                outline.len(),
                self.basemap.region(),
                map.points.len()
            );

            chart
                .draw_series(
                    outline
                        .into_iter()
                        .map(|piece| PathElement::new(piece, OUTLINE_COLOR.stroke_width(1))),
                )
                .map_err(render_err)?;

            chart
                .draw_series(map.points.iter().map(|p| {
                    Circle::new((p.longitude, p.latitude), POINT_RADIUS, POINT_COLOR.filled())
                }))
                .map_err(render_err)?;

            root.present().map_err(render_err)?;
        }

        RgbImage::from_raw(w, h, buf)
            .ok_or_else(|| MapError::Render("bitmap buffer size mismatch".to_string()))
    }

    /// Draw the map and write it as PNG.
    pub fn save(&self, map: &StateMap, path: impl AsRef<Path>) -> Result<(), MapError> {
        let img = self.render(map)?;
        img.save_with_format(path.as_ref(), ImageFormat::Png)?;
        debug!("wrote map to {}", path.as_ref().display());
        Ok(())
    }
}
