//! Output module for exporting records and reporting runs
//!
//! This module handles:
//! - Serializing record sequences as JSON, CSV, Parquet or SQLite
//! - Choosing the export path, with a fallback location
//! - Per-term and per-run crawl statistics

mod csv_output;
mod exporter;
mod json;
mod parquet_output;
mod sqlite_output;
pub mod stats;
mod traits;

pub use exporter::{sanitize_label, FileExporter, FILE_TIMESTAMP_FORMAT};
pub use sqlite_output::TABLE as SQLITE_TABLE;
pub use stats::{print_summary, RunSummary, TermOutcome, TermReport};
pub use traits::{uniform_level, ExportError, ExportResult, Exporter};

use crate::record::JobRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Csv,
    #[serde(alias = "columnar")]
    Parquet,
    Sqlite,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Json,
        ExportFormat::Csv,
        ExportFormat::Parquet,
        ExportFormat::Sqlite,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Parquet => "parquet",
            ExportFormat::Sqlite => "sqlite",
        }
    }

    /// File extension of exported files
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Parquet => "parquet",
            ExportFormat::Sqlite => "db",
        }
    }

    /// Serializes `records` to `path` in this format
    pub fn write(self, path: &Path, records: &[JobRecord]) -> ExportResult<()> {
        uniform_level(records)?;
        match self {
            ExportFormat::Json => json::write_json(path, records),
            ExportFormat::Csv => csv_output::write_csv(path, records),
            ExportFormat::Parquet => parquet_output::write_parquet(path, records),
            ExportFormat::Sqlite => sqlite_output::write_sqlite(path, records),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "parquet" | "columnar" => Ok(ExportFormat::Parquet),
            "sqlite" => Ok(ExportFormat::Sqlite),
            other => Err(format!(
                "unknown format '{}' (expected json, csv, parquet/columnar or sqlite)",
                other
            )),
        }
    }
}
