//! FARS Explorer - yearly accident data summaries & state accident maps
//!
//! Reads the per-year FARS accident files (`accident_<year>.csv.bz2`), counts
//! accidents by month and year, and draws accident locations for a state.
//!
//! The free functions use [`DataConfig::from_env`]; build a [`DataLoader`] with
//! an explicit [`DataConfig`] to point at another data directory.

pub mod charts;
pub mod config;
pub mod data;
pub mod logging;

pub use charts::{MapError, MapOutcome, MapRenderer, StateMap, StateMapPlotter};
pub use config::DataConfig;
pub use data::{
    CoercionWarning, DataLoader, IntLike, LoaderError, SummaryError, SummaryTable,
    YearExtractor, YearOutcome, YearSummarizer,
};

use polars::prelude::DataFrame;
use std::path::{Path, PathBuf};

fn default_loader() -> DataLoader {
    DataLoader::new(DataConfig::from_env())
}

/// Read an accident file into a DataFrame.
pub fn read_table(filename: impl AsRef<Path>) -> Result<DataFrame, LoaderError> {
    data::loader::read_table(filename)
}

/// Path of the accident file for `year` in the installed data directory.
pub fn make_filename(year: impl Into<IntLike>) -> PathBuf {
    default_loader().make_filename(year)
}

/// (MONTH, year) tables for each year, failures tagged in place.
pub fn read_years<I, Y>(years: I) -> Vec<YearOutcome>
where
    I: IntoIterator<Item = Y>,
    Y: Into<IntLike>,
{
    YearExtractor::new(&default_loader()).read_years(years)
}

/// Accident counts per month (rows) and year (columns).
pub fn summarize_years<I, Y>(years: I) -> Result<SummaryTable, SummaryError>
where
    I: IntoIterator<Item = Y>,
    Y: Into<IntLike>,
{
    YearSummarizer::new(&default_loader()).summarize_years(years)
}

/// Plot the accidents of `state` in `year` to a PNG at `output`.
pub fn map_state(
    state: impl Into<IntLike>,
    year: impl Into<IntLike>,
    output: impl AsRef<Path>,
) -> Result<MapOutcome, MapError> {
    StateMapPlotter::new(&default_loader()).plot(state, year, output)
}
