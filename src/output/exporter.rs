//! File-based exporter
//!
//! Writes each term's records to `<results-dir>/<label>/<timestamp>.<ext>`.
//! When the label directory cannot be created, the file goes to
//! `<fallback-dir>/<label>_<timestamp>.<ext>` instead.

use crate::config::OutputConfig;
use crate::output::traits::{uniform_level, ExportResult, Exporter};
use crate::output::ExportFormat;
use crate::record::JobRecord;
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};

/// Timestamp format used in export file names
pub const FILE_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H-%M-%SZ";

/// Exporter writing one file per term in the configured format
#[derive(Debug, Clone)]
pub struct FileExporter {
    results_dir: PathBuf,
    fallback_dir: PathBuf,
    format: ExportFormat,
}

impl FileExporter {
    pub fn new(
        results_dir: impl Into<PathBuf>,
        fallback_dir: impl Into<PathBuf>,
        format: ExportFormat,
    ) -> Self {
        Self {
            results_dir: results_dir.into(),
            fallback_dir: fallback_dir.into(),
            format,
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(&config.results_dir, &config.fallback_dir, config.format)
    }

    /// Overrides the configured format
    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    pub fn format(&self) -> ExportFormat {
        self.format
    }

    /// Picks the output path, creating directories as needed
    fn target_path(&self, label: &str) -> ExportResult<PathBuf> {
        let stamp = Utc::now().format(FILE_TIMESTAMP_FORMAT).to_string();
        let ext = self.format.extension();
        let primary = self.results_dir.join(label);

        match fs::create_dir_all(&primary) {
            Ok(()) => Ok(unique_path(&primary, &stamp, ext)),
            Err(e) => {
                tracing::warn!(
                    "Cannot create {} ({}); writing to {} instead",
                    primary.display(),
                    e,
                    self.fallback_dir.display()
                );
                fs::create_dir_all(&self.fallback_dir)?;
                Ok(unique_path(
                    &self.fallback_dir,
                    &format!("{}_{}", label, stamp),
                    ext,
                ))
            }
        }
    }
}

impl Exporter for FileExporter {
    fn write(&mut self, records: &[JobRecord], label: &str) -> ExportResult<PathBuf> {
        let level = uniform_level(records)?;
        let label = sanitize_label(label);
        let path = self.target_path(&label)?;

        self.format.write(&path, records)?;

        tracing::info!(
            "Exported {} record(s) at level {} to {}",
            records.len(),
            level,
            path.display()
        );
        Ok(path)
    }
}

/// Makes a search term safe to use as a single path component
pub fn sanitize_label(label: &str) -> String {
    let cleaned: String = label
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_matches(|c| c == '.' || c == ' ');
    if cleaned.is_empty() {
        "untitled".to_string()
    } else {
        cleaned.to_string()
    }
}

/// `<dir>/<stem>.<ext>`, suffixed with `-N` if that file already exists
fn unique_path(dir: &Path, stem: &str, ext: &str) -> PathBuf {
    let candidate = dir.join(format!("{}.{}", stem, ext));
    if !candidate.exists() {
        return candidate;
    }
    (1..)
        .map(|n| dir.join(format!("{}-{}.{}", stem, n, ext)))
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}
