//! State Map Module
//! Filters one year of accidents to a state, drops sentinel coordinates and draws the points.

use crate::charts::basemap::Bounds;
use crate::charts::renderer::MapRenderer;
use crate::data::loader::{DataLoader, LoaderError};
use crate::data::year::IntLike;
use polars::prelude::*;
use serde::Serialize;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const STATE_COL: &str = "STATE";
pub const LONGITUDE_COL: &str = "LONGITUD";
pub const LATITUDE_COL: &str = "LATITUDE";

/// Longitudes above this encode "not recorded".
pub const LONGITUDE_SENTINEL: f64 = 900.0;
/// Latitudes above this encode "not recorded".
pub const LATITUDE_SENTINEL: f64 = 90.0;

#[derive(Error, Debug)]
pub enum MapError {
    #[error(transparent)]
    Load(#[from] LoaderError),
    #[error("invalid STATE number: {0}")]
    InvalidState(String),
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("Failed to draw map: {0}")]
    Render(String),
    #[error("Failed to write image: {0}")]
    Image(#[from] image::ImageError),
}

/// A single accident location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CoordinatePoint {
    pub longitude: f64,
    pub latitude: f64,
}

/// Accident points of one state and year, ready to draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateMap {
    pub state: i64,
    pub year: i32,
    pub points: Vec<CoordinatePoint>,
    pub bounds: Bounds,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MapOutcome {
    Drawn(StateMap),
    NothingToPlot,
}

pub fn valid_longitude(v: Option<f64>) -> Option<f64> {
    v.filter(|&x| x <= LONGITUDE_SENTINEL)
}

pub fn valid_latitude(v: Option<f64>) -> Option<f64> {
    v.filter(|&y| y <= LATITUDE_SENTINEL)
}

/// Loads a year, selects a state and plots its accidents.
pub struct StateMapPlotter<'a> {
    loader: &'a DataLoader,
    renderer: MapRenderer,
}

impl<'a> StateMapPlotter<'a> {
    pub fn new(loader: &'a DataLoader) -> Self {
        Self::with_renderer(loader, MapRenderer::default())
    }

    pub fn with_renderer(loader: &'a DataLoader, renderer: MapRenderer) -> Self {
        Self { loader, renderer }
    }

    /// Prepare and draw the map to `output` as PNG.
    pub fn plot(
        &self,
        state: impl Into<IntLike>,
        year: impl Into<IntLike>,
        output: impl AsRef<Path>,
    ) -> Result<MapOutcome, MapError> {
        match self.prepare(state, year)? {
            Some(map) => {
                self.renderer.save(&map, output)?;
                Ok(MapOutcome::Drawn(map))
            }
            None => Ok(MapOutcome::NothingToPlot),
        }
    }

    /// Everything except drawing. `Ok(None)` means there is nothing to plot.
    pub fn prepare(
        &self,
        state: impl Into<IntLike>,
        year: impl Into<IntLike>,
    ) -> Result<Option<StateMap>, MapError> {
        let (state, year) = (state.into(), year.into());
        let path = self.loader.make_filename(&year);
        let Ok(year) = year.coerce_year() else {
            return Err(LoaderError::NotFound { path }.into());
        };
        let df = self.loader.read_table(&path)?;

        let state_id = match state.coerce() {
            Ok(id) => id,
            Err(warning) => {
                warn!("{}", warning);
                return Err(MapError::InvalidState(state.to_string()));
            }
        };
        if !Self::has_state(&df, state_id)? {
            return Err(MapError::InvalidState(state.to_string()));
        }

        let coords = df
            .lazy()
            .filter(col(STATE_COL).cast(DataType::Int64).eq(lit(state_id)))
            .select([
                col(LONGITUDE_COL).cast(DataType::Float64),
                col(LATITUDE_COL).cast(DataType::Float64),
            ])
            .collect()?;

        if coords.height() == 0 {
            info!("no accidents to plot");
            return Ok(None);
        }

        let lons: Vec<Option<f64>> = coords
            .column(LONGITUDE_COL)?
            .f64()?
            .into_iter()
            .map(valid_longitude)
            .collect();
        let lats: Vec<Option<f64>> = coords
            .column(LATITUDE_COL)?
            .f64()?
            .into_iter()
            .map(valid_latitude)
            .collect();

        let valid_lons = lons.iter().flatten().copied();
        let valid_lats = lats.iter().flatten().copied();
        let Some(bounds) = Bounds::from_axes(valid_lons, valid_lats) else {
            info!("no accidents to plot");
            return Ok(None);
        };

        let points: Vec<CoordinatePoint> = lons
            .iter()
            .zip(lats.iter())
            .filter_map(|(lon, lat)| {
                Some(CoordinatePoint {
                    longitude: (*lon)?,
                    latitude: (*lat)?,
                })
            })
            .collect();
        debug!(
            "state {} in {}: {} rows, {} plottable",
            state_id,
            year,
            coords.height(),
            points.len()
        );

        Ok(Some(StateMap {
            state: state_id,
            year,
            points,
            bounds,
        }))
    }

    fn has_state(df: &DataFrame, state: i64) -> Result<bool, PolarsError> {
        let states = df.column(STATE_COL)?.cast(&DataType::Int64)?;
        let found = states.i64()?.into_iter().flatten().any(|s| s == state);
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_are_invalid() {
        assert_eq!(valid_longitude(Some(999.9999)), None);
        assert_eq!(valid_longitude(Some(-86.5)), Some(-86.5));
        assert_eq!(valid_latitude(Some(99.9999)), None);
        assert_eq!(valid_latitude(Some(77.7777)), Some(77.7777));
        assert_eq!(valid_latitude(Some(f64::NAN)), None);
        assert_eq!(valid_latitude(None), None);
    }

    #[test]
    fn has_state_matches_integer_codes() {
        let df = df! {
            "STATE" => [1i64, 4, 48],
        }
        .expect("frame");
        assert!(StateMapPlotter::has_state(&df, 48).unwrap());
        assert!(!StateMapPlotter::has_state(&df, 2).unwrap());
    }
}
