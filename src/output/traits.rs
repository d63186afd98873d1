//! Exporter trait and error types
//!
//! An exporter receives the finished record sequence of one search term and
//! persists it, returning where it went.

use crate::record::{DetailLevel, JobRecord};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while exporting records
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Refusing to export an empty record set")]
    Empty,

    #[error("Records of different detail levels cannot share one export ({0} vs {1})")]
    MixedLevels(DetailLevel, DetailLevel),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;

/// Persists the records of one search term
pub trait Exporter {
    /// Writes `records` under `label` and returns the path written
    ///
    /// `records` is non-empty and uniform in detail level; implementations
    /// reject anything else.
    fn write(&mut self, records: &[JobRecord], label: &str) -> ExportResult<PathBuf>;
}

/// Checks that `records` is non-empty and single-level, returning the level
pub fn uniform_level(records: &[JobRecord]) -> ExportResult<DetailLevel> {
    let first = records.first().ok_or(ExportError::Empty)?.level();
    match records.iter().map(JobRecord::level).find(|level| *level != first) {
        Some(other) => Err(ExportError::MixedLevels(first, other)),
        None => Ok(first),
    }
}
