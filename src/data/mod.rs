//! Data module - accident file loading, extraction and summaries

pub mod extractor;
pub mod loader;
pub mod summary;
pub mod year;

pub use extractor::{ExtractError, YearExtractor, YearOutcome};
pub use loader::{DataLoader, LoaderError};
pub use summary::{SummaryError, SummaryRow, SummaryTable, YearSummarizer};
pub use year::{CoercionWarning, IntLike};
