//! Crawl statistics
//!
//! Every term yields a [`TermReport`]; the run collects them into a
//! [`RunSummary`] that is printed when the crawl ends, so the operator can
//! judge how complete each export is.

use crate::record::{DetailLevel, SearchTerm};
use std::path::PathBuf;

/// How a term ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermOutcome {
    /// Records were written to this path
    Exported(PathBuf),

    /// The listing had no relevant candidates
    NoCandidates,

    /// Candidates were found but no detail page could be fetched
    NoRecords,

    /// Records were collected but could not be written
    ExportFailed(String),
}

/// Statistics for one search term
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermReport {
    pub term: SearchTerm,
    pub pages_fetched: u32,
    pub candidates_found: usize,
    pub details_failed: usize,
    pub records: usize,
    pub outcome: TermOutcome,
}

impl TermReport {
    pub fn new(term: SearchTerm) -> Self {
        Self {
            term,
            pages_fetched: 0,
            candidates_found: 0,
            details_failed: 0,
            records: 0,
            outcome: TermOutcome::NoCandidates,
        }
    }

    pub fn exported_path(&self) -> Option<&PathBuf> {
        match &self.outcome {
            TermOutcome::Exported(path) => Some(path),
            _ => None,
        }
    }
}

/// Statistics for a whole run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub level: DetailLevel,
    pub reports: Vec<TermReport>,

    /// Set when the run was interrupted; the term in flight has no report
    pub interrupted: bool,
}

impl RunSummary {
    pub fn new(level: DetailLevel) -> Self {
        Self {
            level,
            reports: Vec::new(),
            interrupted: false,
        }
    }

    pub fn total_records(&self) -> usize {
        self.reports.iter().map(|r| r.records).sum()
    }

    pub fn exported_terms(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| r.exported_path().is_some())
            .count()
    }

    /// Share of candidates that became records, as a percentage
    pub fn completeness(&self) -> f64 {
        let candidates: usize = self.reports.iter().map(|r| r.candidates_found).sum();
        if candidates == 0 {
            return 0.0;
        }
        let kept: usize = self
            .reports
            .iter()
            .map(|r| r.candidates_found - r.details_failed)
            .sum();
        (kept as f64 / candidates as f64) * 100.0
    }
}

/// Prints the run summary to stdout
pub fn print_summary(summary: &RunSummary) {
    println!("=== Crawl Summary ===\n");

    println!("Overview:");
    println!("  Detail level: {}", summary.level);
    println!("  Terms crawled: {}", summary.reports.len());
    println!("  Terms exported: {}", summary.exported_terms());
    println!("  Records exported: {}", summary.total_records());
    if summary.interrupted {
        println!("  Interrupted: yes (the term in progress was not exported)");
    }
    println!();

    if !summary.reports.is_empty() {
        println!("Terms:");
        for report in &summary.reports {
            println!(
                "  '{}': {} page(s), {} candidate(s), {} failed detail(s), {} record(s)",
                report.term,
                report.pages_fetched,
                report.candidates_found,
                report.details_failed,
                report.records
            );
            match &report.outcome {
                TermOutcome::Exported(path) => println!("    -> {}", path.display()),
                TermOutcome::NoCandidates => println!("    -> skipped: no relevant listings"),
                TermOutcome::NoRecords => println!("    -> skipped: no detail page could be fetched"),
                TermOutcome::ExportFailed(e) => println!("    -> export failed: {}", e),
            }
        }
        println!();
    }

    if summary.level.needs_detail_page() {
        println!("Completeness: {:.1}%", summary.completeness());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(term: &str, candidates: usize, failed: usize, exported: bool) -> TermReport {
        TermReport {
            term: SearchTerm::new(term).unwrap(),
            pages_fetched: 1,
            candidates_found: candidates,
            details_failed: failed,
            records: candidates - failed,
            outcome: if exported {
                TermOutcome::Exported(PathBuf::from(format!("results/{}/x.json", term)))
            } else {
                TermOutcome::NoRecords
            },
        }
    }

    #[test]
    fn test_totals() {
        let mut summary = RunSummary::new(DetailLevel::Structured);
        summary.reports.push(report("rust", 4, 1, true));
        summary.reports.push(report("go", 2, 2, false));

        assert_eq!(summary.total_records(), 3);
        assert_eq!(summary.exported_terms(), 1);
        assert!((summary.completeness() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_summary() {
        let summary = RunSummary::new(DetailLevel::Summary);
        assert_eq!(summary.total_records(), 0);
        assert_eq!(summary.completeness(), 0.0);
    }
}
