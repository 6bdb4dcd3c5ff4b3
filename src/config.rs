//! Data directory configuration.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable overriding the installed data directory.
pub const DATA_DIR_ENV: &str = "FARS_DATA_DIR";

/// Location of the yearly accident files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataConfig {
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self::new(Self::installed_data_dir())
    }
}

impl DataConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// `FARS_DATA_DIR` if set, otherwise the bundled `extdata/` directory.
    pub fn from_env() -> Self {
        match env::var_os(DATA_DIR_ENV) {
            Some(dir) if !dir.is_empty() => Self::new(dir),
            _ => Self::default(),
        }
    }

    /// Directory holding the data files shipped with the crate.
    pub fn installed_data_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("extdata")
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
