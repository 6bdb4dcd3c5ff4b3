//! Accident File Loader Module
//! Resolves yearly file names and reads (bzip2 compressed) CSV files using Polars.

use crate::config::DataConfig;
use crate::data::year::{IntLike, NA_TOKEN};
use bzip2::read::BzDecoder;
use polars::prelude::*;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("file '{}' does not exist", path.display())]
    NotFound { path: PathBuf },
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to load CSV: {0}")]
    Csv(#[from] PolarsError),
}

/// Resolves years to accident files and loads them into DataFrames.
///
/// Holds no state besides the data directory; every read goes to disk.
#[derive(Debug, Clone, Default)]
pub struct DataLoader {
    config: DataConfig,
}

impl DataLoader {
    pub fn new(config: DataConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DataConfig {
        &self.config
    }

    /// Build the path of the accident file for `year`.
    ///
    /// A year that cannot be coerced logs a warning and yields `accident_NA.csv.bz2`.
    /// Existence is not checked here.
    pub fn make_filename(&self, year: impl Into<IntLike>) -> PathBuf {
        let year = year.into();
        let token = match year.coerce_year() {
            Ok(y) => y.to_string(),
            Err(warning) => {
                warn!("{}", warning);
                NA_TOKEN.to_string()
            }
        };
        self.config
            .data_dir()
            .join(format!("accident_{}.csv.bz2", token))
    }

    /// Load an accident file. `.bz2` files are decompressed in memory first.
    pub fn read_table(&self, path: impl AsRef<Path>) -> Result<DataFrame, LoaderError> {
        read_table(path)
    }
}

/// Load a (possibly bzip2 compressed) CSV file into a DataFrame.
pub fn read_table(path: impl AsRef<Path>) -> Result<DataFrame, LoaderError> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(LoaderError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let is_bz2 = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("bz2"));

    let df = if is_bz2 {
        let mut bytes = Vec::new();
        BzDecoder::new(File::open(path)?).read_to_end(&mut bytes)?;

        CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(None)
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()?
    } else {
        LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(None)
            .finish()?
            .collect()?
    };

    debug!(
        "loaded {} rows, {} columns from {}",
        df.height(),
        df.width(),
        path.display()
    );
    Ok(df)
}
