//! Year Summary Module
//! Counts accidents per (year, MONTH) and reshapes them to one row per month.

use crate::data::extractor::{YearExtractor, MONTH_COL, YEAR_COL};
use crate::data::loader::DataLoader;
use crate::data::year::IntLike;
use polars::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;
use tracing::debug;

const COUNT_COL: &str = "n";

#[derive(Error, Debug)]
pub enum SummaryError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// One month of the summary; `counts` lines up with [`SummaryTable::years`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub month: i64,
    pub counts: Vec<Option<u32>>,
}

/// Accident counts, one row per observed month and one column per observed year.
///
/// A month/year combination with no accidents is `None`, not `Some(0)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SummaryTable {
    pub years: Vec<i32>,
    pub rows: Vec<SummaryRow>,
}

impl SummaryTable {
    /// Reshape long (year, month, count) triples into the wide table.
    pub fn from_counts<I>(counts: I) -> Self
    where
        I: IntoIterator<Item = (i32, i64, u32)>,
    {
        let mut by_month: BTreeMap<i64, BTreeMap<i32, u32>> = BTreeMap::new();
        let mut years: BTreeSet<i32> = BTreeSet::new();

        for (year, month, n) in counts {
            years.insert(year);
            *by_month.entry(month).or_default().entry(year).or_default() += n;
        }

        let years: Vec<i32> = years.into_iter().collect();
        let rows = by_month
            .into_iter()
            .map(|(month, per_year)| SummaryRow {
                month,
                counts: years.iter().map(|y| per_year.get(y).copied()).collect(),
            })
            .collect();

        Self { years, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.years.is_empty()
    }

    pub fn months(&self) -> Vec<i64> {
        self.rows.iter().map(|r| r.month).collect()
    }

    /// Count for a month/year cell, `None` when the cell is missing.
    pub fn get(&self, month: i64, year: i32) -> Option<u32> {
        let col = self.years.iter().position(|&y| y == year)?;
        self.rows
            .iter()
            .find(|r| r.month == month)
            .and_then(|r| r.counts.get(col).copied().flatten())
    }

    /// Sum of all cells, missing cells counted as zero.
    pub fn total(&self) -> u64 {
        self.rows
            .iter()
            .flat_map(|r| r.counts.iter())
            .map(|c| c.unwrap_or(0) as u64)
            .sum()
    }

    /// Wide DataFrame: `MONTH` followed by one column per year, missing cells null.
    pub fn to_dataframe(&self) -> Result<DataFrame, SummaryError> {
        let mut columns = Vec::with_capacity(self.years.len() + 1);
        if !self.years.is_empty() {
            columns.push(Column::new(MONTH_COL.into(), self.months()));
        }
        for (i, year) in self.years.iter().enumerate() {
            let cells: Vec<Option<u32>> = self
                .rows
                .iter()
                .map(|r| r.counts.get(i).copied().flatten())
                .collect();
            columns.push(Column::new(year.to_string().into(), cells));
        }
        Ok(DataFrame::new(columns)?)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Builds monthly accident summaries across several years.
pub struct YearSummarizer<'a> {
    loader: &'a DataLoader,
}

impl<'a> YearSummarizer<'a> {
    pub fn new(loader: &'a DataLoader) -> Self {
        Self { loader }
    }

    /// Years that fail to load are left out; [`YearExtractor`] has already warned about them.
    ///
    /// Columns come only from counted rows, so a year whose file loads but holds no
    /// accidents gets no column either. A year requested twice is counted twice.
    pub fn summarize_years<I, Y>(&self, years: I) -> Result<SummaryTable, SummaryError>
    where
        I: IntoIterator<Item = Y>,
        Y: Into<IntLike>,
    {
        let frames: Vec<LazyFrame> = YearExtractor::new(self.loader)
            .read_years(years)
            .into_iter()
            .filter_map(|outcome| outcome.into_table())
            .map(|df| df.lazy())
            .collect();

        if frames.is_empty() {
            return Ok(SummaryTable::default());
        }

        let counts = concat(frames, UnionArgs::default())?
            .filter(col(MONTH_COL).is_not_null())
            .group_by([col(YEAR_COL), col(MONTH_COL)])
            .agg([len().cast(DataType::UInt32).alias(COUNT_COL)])
            .collect()?;
        debug!("{} (year, MONTH) groups", counts.height());

        Self::reshape(&counts)
    }

    /// Turn the grouped long table into the wide summary.
    pub fn reshape(counts: &DataFrame) -> Result<SummaryTable, SummaryError> {
        let years = counts.column(YEAR_COL)?.i32()?;
        let months = counts.column(MONTH_COL)?.i64()?;
        let ns = counts.column(COUNT_COL)?.u32()?;

        let triples = years
            .into_iter()
            .zip(months)
            .zip(ns)
            .filter_map(|((y, m), n)| Some((y?, m?, n?)));

        Ok(SummaryTable::from_counts(triples))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reshape_leaves_unobserved_cells_missing() {
        let table = SummaryTable::from_counts([(2014, 1, 4), (2013, 2, 3), (2013, 1, 2)]);

        assert_eq!(table.years, vec![2013, 2014]);
        assert_eq!(table.months(), vec![1, 2]);
        assert_eq!(table.get(1, 2013), Some(2));
        assert_eq!(table.get(1, 2014), Some(4));
        assert_eq!(table.get(2, 2014), None);
        assert_eq!(table.get(3, 2013), None);
        assert_eq!(table.total(), 9);
    }

    #[test]
    fn empty_counts_give_empty_table() {
        let table = SummaryTable::from_counts(Vec::new());
        assert!(table.is_empty());

        let df = table.to_dataframe().expect("frame");
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 0);
    }

    #[test]
    fn wide_frame_has_year_columns_with_nulls() {
        let table = SummaryTable::from_counts([(2013, 1, 2), (2014, 3, 1)]);
        let df = table.to_dataframe().expect("frame");

        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(names, ["MONTH", "2013", "2014"]);
        assert_eq!(df.column("2013").unwrap().null_count(), 1);
        assert_eq!(df.column("2014").unwrap().null_count(), 1);
    }

    #[test]
    fn reshape_reads_grouped_frame() {
        let counts = df! {
            "year" => [2013i32, 2013, 2014],
            "MONTH" => [1i64, 5, 5],
            "n" => [3u32, 1, 2],
        }
        .expect("frame");

        let table = YearSummarizer::reshape(&counts).expect("reshape");
        assert_eq!(table.get(5, 2014), Some(2));
        assert_eq!(table.get(1, 2014), None);
        assert_eq!(table.total(), 6);
    }

    #[test]
    fn short_count_rows_read_as_missing() {
        let table = SummaryTable {
            years: vec![2013, 2014],
            rows: vec![SummaryRow {
                month: 1,
                counts: vec![Some(5)],
            }],
        };

        assert_eq!(table.get(1, 2013), Some(5));
        assert_eq!(table.get(1, 2014), None);
        let df = table.to_dataframe().expect("frame");
        assert_eq!(df.column("2014").unwrap().null_count(), 1);
    }

    #[test]
    fn serializes_missing_cells_as_null() {
        let table = SummaryTable::from_counts([(2013, 1, 2), (2014, 2, 1)]);
        let json = table.to_json().expect("json");
        assert!(json.contains("null"));
    }
}
