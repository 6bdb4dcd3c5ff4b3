//! Year Extractor Module
//! Loads several years and projects each one down to (MONTH, year) pairs.

use crate::data::loader::{DataLoader, LoaderError};
use crate::data::year::{CoercionWarning, IntLike};
use polars::prelude::*;
use thiserror::Error;
use tracing::warn;

/// Name of the derived year column.
pub const YEAR_COL: &str = "year";
/// Name of the month column in the source files.
pub const MONTH_COL: &str = "MONTH";

/// Why a single year could not be extracted.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error(transparent)]
    Coercion(#[from] CoercionWarning),
    #[error(transparent)]
    Load(#[from] LoaderError),
    #[error("Failed to project MONTH/year: {0}")]
    Projection(#[from] PolarsError),
}

/// Result of extracting one requested year.
#[derive(Debug)]
pub enum YearOutcome {
    /// Two columns: `MONTH` (Int64) and `year` (Int32).
    Loaded { year: i32, table: DataFrame },
    /// The year as the caller supplied it, plus the cause.
    Failed { year: String, reason: ExtractError },
}

impl YearOutcome {
    pub fn table(&self) -> Option<&DataFrame> {
        match self {
            YearOutcome::Loaded { table, .. } => Some(table),
            YearOutcome::Failed { .. } => None,
        }
    }

    pub fn into_table(self) -> Option<DataFrame> {
        match self {
            YearOutcome::Loaded { table, .. } => Some(table),
            YearOutcome::Failed { .. } => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, YearOutcome::Loaded { .. })
    }
}

/// Per-year extraction with failure isolation.
pub struct YearExtractor<'a> {
    loader: &'a DataLoader,
}

impl<'a> YearExtractor<'a> {
    pub fn new(loader: &'a DataLoader) -> Self {
        Self { loader }
    }

    /// One outcome per input year, in input order. A failing year never aborts the others.
    pub fn read_years<I, Y>(&self, years: I) -> Vec<YearOutcome>
    where
        I: IntoIterator<Item = Y>,
        Y: Into<IntLike>,
    {
        years
            .into_iter()
            .map(|year| {
                let year = year.into();
                match self.extract_year(&year) {
                    Ok((coerced, table)) => YearOutcome::Loaded {
                        year: coerced,
                        table,
                    },
                    Err(reason) => {
                        warn!("invalid year: {}", year);
                        YearOutcome::Failed {
                            year: year.to_string(),
                            reason,
                        }
                    }
                }
            })
            .collect()
    }

    fn extract_year(&self, year: &IntLike) -> Result<(i32, DataFrame), ExtractError> {
        let coerced = year.coerce_year()?;
        let df = self.loader.read_table(self.loader.make_filename(coerced))?;
        Ok((coerced, Self::month_year_pairs(df, coerced)?))
    }

    /// Attach the year and keep only `MONTH` and `year`.
    pub fn month_year_pairs(df: DataFrame, year: i32) -> Result<DataFrame, PolarsError> {
        df.lazy()
            .with_column(lit(year).alias(YEAR_COL))
            .select([
                col(MONTH_COL).cast(DataType::Int64),
                col(YEAR_COL).cast(DataType::Int32),
            ])
            .collect()
    }
}
