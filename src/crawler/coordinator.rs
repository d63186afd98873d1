//! Crawl coordinator
//!
//! Runs the search terms one after another over a single page source:
//! - Paginates each term's listing through a [`LinkCollector`]
//! - Feeds references to the [`DetailFetcher`] when the level needs it
//! - Hands each finished, non-empty record sequence to the exporter
//! - Abandons the term in flight when the shutdown signal fires

use crate::crawler::{CrawlSettings, DetailFetcher, LinkCollector, Listing};
use crate::output::{Exporter, RunSummary, TermOutcome, TermReport};
use crate::record::{JobRecord, SearchTerm};
use crate::source::PageSource;
use std::future::Future;

/// Main crawl coordinator
///
/// Borrows the page source so the caller keeps ownership and can release the
/// session on every exit path.
pub struct Coordinator<'a, S: PageSource + ?Sized, E: Exporter + ?Sized> {
    source: &'a mut S,
    exporter: &'a mut E,
    settings: CrawlSettings,
}

impl<'a, S: PageSource + ?Sized, E: Exporter + ?Sized> Coordinator<'a, S, E> {
    pub fn new(source: &'a mut S, exporter: &'a mut E, settings: CrawlSettings) -> Self {
        Self {
            source,
            exporter,
            settings,
        }
    }

    pub fn settings(&self) -> &CrawlSettings {
        &self.settings
    }

    /// Crawls every term in order
    pub async fn run(&mut self, terms: &[SearchTerm]) -> RunSummary {
        self.run_until(terms, std::future::pending::<()>()).await
    }

    /// Crawls every term in order until `shutdown` completes
    ///
    /// On shutdown the term in flight is dropped without export; terms that
    /// already finished keep their exports.
    ///
    /// # Arguments
    ///
    /// * `terms` - Search terms, crawled strictly in this order
    /// * `shutdown` - Future that completes when the run must stop
    ///
    /// # Returns
    ///
    /// A [`RunSummary`] with one report per finished term and the
    /// `interrupted` flag set when `shutdown` fired first
    pub async fn run_until<F>(&mut self, terms: &[SearchTerm], shutdown: F) -> RunSummary
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut summary = RunSummary::new(self.settings.level);

        for term in terms {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    tracing::warn!("Interrupted while crawling '{}'; abandoning it", term);
                    summary.interrupted = true;
                    break;
                }
                report = self.crawl_term(term) => summary.reports.push(report),
            }
        }

        summary
    }

    /// Crawls one term and exports its records
    pub async fn crawl_term(&mut self, term: &SearchTerm) -> TermReport {
        tracing::info!(
            "Crawling '{}' at detail level {}",
            term,
            self.settings.level
        );

        let mut report = TermReport::new(term.clone());
        let records = self.collect(term, &mut report).await;
        report.records = records.len();

        if report.candidates_found == 0 {
            tracing::warn!("No relevant listings for '{}'; skipping", term);
            report.outcome = TermOutcome::NoCandidates;
            return report;
        }

        if records.is_empty() {
            tracing::warn!(
                "None of the {} detail page(s) for '{}' could be fetched; skipping",
                report.candidates_found,
                term
            );
            report.outcome = TermOutcome::NoRecords;
            return report;
        }

        report.outcome = match self.exporter.write(&records, term.as_str()) {
            Ok(path) => TermOutcome::Exported(path),
            Err(e) => {
                tracing::error!("Export for '{}' failed: {}", term, e);
                TermOutcome::ExportFailed(e.to_string())
            }
        };

        report
    }

    /// Gathers the records of one term in discovery order
    async fn collect(&mut self, term: &SearchTerm, report: &mut TermReport) -> Vec<JobRecord> {
        let mut collector = LinkCollector::new(term.clone(), &self.settings);
        let fetcher = DetailFetcher::new(&self.settings);
        let mut records = Vec::new();

        while let Some(item) = collector.next(&mut *self.source).await {
            match item {
                Listing::Summary(record) => records.push(JobRecord::Summary(record)),
                Listing::Reference(reference) => {
                    match fetcher.fetch(&mut *self.source, &reference).await {
                        Some(record) => records.push(record),
                        None => report.details_failed += 1,
                    }
                }
            }
        }

        report.pages_fetched = collector.pages_fetched();
        report.candidates_found = collector.candidates_found();
        records
    }
}
