//! Base Map Module
//! Region outlines drawn underneath accident points, clipped to the visible range.

use serde::Serialize;

/// Longitude/latitude window of a map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub lon: (f64, f64),
    pub lat: (f64, f64),
}

impl Bounds {
    /// Range of each axis over its own values; `None` if either axis has no values.
    pub fn from_axes<L, A>(lons: L, lats: A) -> Option<Self>
    where
        L: IntoIterator<Item = f64>,
        A: IntoIterator<Item = f64>,
    {
        Some(Self {
            lon: range(lons)?,
            lat: range(lats)?,
        })
    }

    /// Bounds widened by half a degree on any axis with zero extent.
    pub fn visible(&self) -> Self {
        let widen = |(lo, hi): (f64, f64)| {
            if hi - lo > 0.0 {
                (lo, hi)
            } else {
                (lo - 0.5, hi + 0.5)
            }
        };
        Self {
            lon: widen(self.lon),
            lat: widen(self.lat),
        }
    }

    pub fn contains(&self, (x, y): (f64, f64)) -> bool {
        x >= self.lon.0 && x <= self.lon.1 && y >= self.lat.0 && y <= self.lat.1
    }
}

fn range<I: IntoIterator<Item = f64>>(values: I) -> Option<(f64, f64)> {
    values.into_iter().fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// A drawable region outline.
pub trait BaseMap {
    /// Region drawn by this map.
    fn region(&self) -> &str;

    /// Outline polylines in (longitude, latitude), clipped to `bounds`.
    fn outline(&self, bounds: &Bounds) -> Vec<Vec<(f64, f64)>>;
}

/// Coarse outline of the conterminous United States.
#[derive(Debug, Clone, Copy, Default)]
pub struct UsaOutline;

const USA_BORDER: [(f64, f64); 82] = [
    (-124.73, 48.38), (-123.10, 49.00), (-95.15, 49.00), (-94.80, 49.38),
    (-94.60, 48.72), (-93.00, 48.60), (-91.00, 48.20), (-89.60, 48.00),
    (-88.40, 48.30), (-84.80, 46.50), (-83.50, 46.00), (-82.40, 45.00),
    (-82.50, 43.00), (-83.10, 42.00), (-82.70, 41.70), (-79.80, 42.50),
    (-79.00, 43.30), (-76.80, 43.60), (-75.00, 44.90), (-71.50, 45.00),
    (-70.70, 45.40), (-69.20, 47.40), (-67.80, 47.10), (-67.00, 44.80),
    (-70.20, 43.70), (-70.70, 42.60), (-69.90, 41.70), (-71.90, 41.30),
    (-74.00, 40.60), (-74.10, 39.80), (-75.00, 38.90), (-75.90, 37.20),
    (-75.70, 35.60), (-76.50, 34.60), (-78.00, 33.90), (-79.30, 33.00),
    (-80.90, 32.00), (-81.40, 30.40), (-80.10, 27.00), (-80.10, 25.80),
    (-81.10, 25.10), (-81.80, 26.10), (-82.80, 27.90), (-82.60, 29.00),
    (-84.00, 30.10), (-85.40, 29.70), (-86.50, 30.40), (-88.10, 30.40),
    (-89.60, 30.20), (-89.40, 29.00), (-90.40, 29.10), (-91.80, 29.50),
    (-93.80, 29.70), (-94.80, 29.30), (-96.60, 28.30), (-97.40, 27.30),
    (-97.20, 25.90), (-99.10, 26.40), (-100.30, 28.00), (-101.40, 29.80),
    (-102.70, 29.70), (-103.30, 29.00), (-104.50, 29.60), (-106.50, 31.80),
    (-108.20, 31.80), (-108.20, 31.30), (-111.10, 31.30), (-114.80, 32.50),
    (-114.70, 32.70), (-117.10, 32.50), (-117.30, 33.20), (-118.50, 34.00),
    (-120.60, 34.60), (-121.90, 36.60), (-122.50, 37.80), (-123.70, 39.00),
    (-124.40, 40.30), (-124.20, 41.90), (-124.50, 42.90), (-124.00, 46.20),
    (-124.60, 47.90), (-124.73, 48.38),
];

impl BaseMap for UsaOutline {
    fn region(&self) -> &str {
        "state"
    }

    fn outline(&self, bounds: &Bounds) -> Vec<Vec<(f64, f64)>> {
        clip_polyline(&USA_BORDER, bounds)
    }
}

/// Split a polyline into the pieces that fall inside `bounds`.
pub fn clip_polyline(points: &[(f64, f64)], bounds: &Bounds) -> Vec<Vec<(f64, f64)>> {
    let mut pieces: Vec<Vec<(f64, f64)>> = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();

    for pair in points.windows(2) {
        match clip_segment(pair[0], pair[1], bounds) {
            Some((a, b)) => {
                if current.last() != Some(&a) {
                    if current.len() > 1 {
                        pieces.push(std::mem::take(&mut current));
                    }
                    current.clear();
                    current.push(a);
                }
                current.push(b);
            }
            None => {
                if current.len() > 1 {
                    pieces.push(std::mem::take(&mut current));
                }
                current.clear();
            }
        }
    }
    if current.len() > 1 {
        pieces.push(current);
    }
    pieces
}

/// Liang-Barsky segment clipping.
fn clip_segment(
    (x0, y0): (f64, f64),
    (x1, y1): (f64, f64),
    bounds: &Bounds,
) -> Option<((f64, f64), (f64, f64))> {
    let (dx, dy) = (x1 - x0, y1 - y0);
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;

    let edges = [
        (-dx, x0 - bounds.lon.0),
        (dx, bounds.lon.1 - x0),
        (-dy, y0 - bounds.lat.0),
        (dy, bounds.lat.1 - y0),
    ];

    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
            if t0 > t1 {
                return None;
            }
        }
    }

    let start = if t0 > 0.0 { (x0 + t0 * dx, y0 + t0 * dy) } else { (x0, y0) };
    let end = if t1 < 1.0 { (x0 + t1 * dx, y0 + t1 * dy) } else { (x1, y1) };
    Some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit() -> Bounds {
        Bounds {
            lon: (0.0, 1.0),
            lat: (0.0, 1.0),
        }
    }

    #[test]
    fn axis_ranges_are_independent() {
        let b = Bounds::from_axes([3.0, -1.0, 2.0], [10.0]).expect("bounds");
        assert_eq!(b.lon, (-1.0, 3.0));
        assert_eq!(b.lat, (10.0, 10.0));
        assert!(Bounds::from_axes([1.0], Vec::new()).is_none());
    }

    #[test]
    fn degenerate_axis_is_widened() {
        let b = Bounds::from_axes([5.0], [10.0, 12.0]).unwrap().visible();
        assert_eq!(b.lon, (4.5, 5.5));
        assert_eq!(b.lat, (10.0, 12.0));
    }

    #[test]
    fn segment_crossing_the_box_is_cut_at_edges() {
        let pieces = clip_polyline(&[(-1.0, 0.5), (2.0, 0.5)], &unit());
        assert_eq!(pieces, vec![vec![(0.0, 0.5), (1.0, 0.5)]]);
    }

    #[test]
    fn leaving_and_reentering_splits_the_line() {
        let line = [(0.2, 0.2), (0.8, 0.2), (0.8, 3.0), (0.2, 3.0), (0.2, 0.8)];
        let pieces = clip_polyline(&line, &unit());
        assert_eq!(pieces.len(), 2);
        let slack = Bounds {
            lon: (-1e-9, 1.0 + 1e-9),
            lat: (-1e-9, 1.0 + 1e-9),
        };
        assert!(pieces.iter().flatten().all(|&p| slack.contains(p)));
    }

    #[test]
    fn usa_outline_is_empty_far_away() {
        let ocean = Bounds {
            lon: (-40.0, -30.0),
            lat: (0.0, 10.0),
        };
        assert!(UsaOutline.outline(&ocean).is_empty());

        let texas = Bounds {
            lon: (-106.6, -93.5),
            lat: (25.8, 36.5),
        };
        assert!(!UsaOutline.outline(&texas).is_empty());
    }
}
