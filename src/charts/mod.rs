//! Charts module - state accident maps

pub mod basemap;
mod renderer;
mod state_map;

pub use basemap::{BaseMap, Bounds, UsaOutline};
pub use renderer::MapRenderer;
pub use state_map::{CoordinatePoint, MapError, MapOutcome, StateMap, StateMapPlotter};
