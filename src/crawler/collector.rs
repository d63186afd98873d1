//! Listing pagination
//!
//! The collector walks the search results one page at a time, starting at
//! page 1, and hands out items on demand. It stops for good as soon as a page
//! yields no relevant candidates or cannot be loaded; there is no page cap.

use crate::crawler::parser::{listing_url, parse_listing};
use crate::crawler::selectors::listing;
use crate::crawler::CrawlSettings;
use crate::record::{capture_timestamp, DetailLevel, PageReference, SearchTerm, SummaryRecord};
use crate::source::PageSource;
use std::collections::VecDeque;

/// One item discovered on a listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    /// Level 1: the card itself is the record
    Summary(SummaryRecord),

    /// Level 2+: the detail page still has to be fetched
    Reference(PageReference),
}

/// Pull-based paginator for one search term
pub struct LinkCollector<'a> {
    term: SearchTerm,
    settings: &'a CrawlSettings,
    next_page: u32,
    buffer: VecDeque<Listing>,
    exhausted: bool,
    pages_fetched: u32,
    candidates_found: usize,
}

impl<'a> LinkCollector<'a> {
    pub fn new(term: SearchTerm, settings: &'a CrawlSettings) -> Self {
        Self {
            term,
            settings,
            next_page: 1,
            buffer: VecDeque::new(),
            exhausted: false,
            pages_fetched: 0,
            candidates_found: 0,
        }
    }

    /// Listing pages that loaded successfully
    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    /// Relevant candidates discovered so far
    pub fn candidates_found(&self) -> usize {
        self.candidates_found
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted && self.buffer.is_empty()
    }

    /// Returns the next item, fetching further listing pages as needed
    ///
    /// Returns `None` once the results are exhausted; every later call also
    /// returns `None` without touching the source.
    ///
    /// # Arguments
    ///
    /// * `source` - The page source listing pages are loaded through
    ///
    /// # Returns
    ///
    /// * `Some(Listing::Summary(_))` - A card record (detail level 1)
    /// * `Some(Listing::Reference(_))` - A detail page still to fetch (level 2+)
    /// * `None` - No further relevant results
    pub async fn next<S: PageSource + ?Sized>(&mut self, source: &mut S) -> Option<Listing> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Some(item);
            }
            if self.exhausted {
                return None;
            }
            self.fetch_page(source).await;
        }
    }

    /// Loads the next listing page into the buffer, or marks the end
    async fn fetch_page<S: PageSource + ?Sized>(&mut self, source: &mut S) {
        let page = self.next_page;
        let url = match listing_url(&self.settings.site, &self.term, page) {
            Ok(url) => url,
            Err(e) => {
                tracing::error!("Cannot build listing URL for '{}': {}", self.term, e);
                self.exhausted = true;
                return;
            }
        };

        self.settings.page_delay.pause().await;
        tracing::info!("Fetching listing page {} for '{}'", page, self.term);

        let html = match source
            .load(&url, listing::LANDMARK, self.settings.page_timeout)
            .await
        {
            Ok(html) => html,
            Err(e) if e.is_timeout() => {
                tracing::info!(
                    "Listing page {} for '{}' shows no results ({}); stopping",
                    page,
                    self.term,
                    e
                );
                self.exhausted = true;
                return;
            }
            Err(e) => {
                tracing::warn!("Listing page {} failed ({}): {}; stopping", page, url, e);
                self.exhausted = true;
                return;
            }
        };

        self.pages_fetched += 1;
        self.next_page += 1;

        let candidates = parse_listing(&html, &self.term);
        if candidates.is_empty() {
            tracing::info!(
                "Listing page {} for '{}' has no relevant candidates; stopping",
                page,
                self.term
            );
            self.exhausted = true;
            return;
        }

        tracing::debug!("Page {}: {} candidate(s)", page, candidates.len());
        self.candidates_found += candidates.len();

        for candidate in candidates {
            let item = match self.settings.level {
                DetailLevel::Summary => match candidate.reference.resolve(&self.settings.base_url) {
                    Ok(url) => Listing::Summary(candidate.into_summary(&url, capture_timestamp())),
                    Err(e) => {
                        tracing::warn!(
                            "Skipping card '{}' with unusable link '{}': {}",
                            candidate.title,
                            candidate.reference,
                            e
                        );
                        continue;
                    }
                },
                _ => Listing::Reference(candidate.reference),
            };
            self.buffer.push_back(item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::source::fake::FakeSource;

    fn settings(level: DetailLevel) -> CrawlSettings {
        CrawlSettings::from_config(&Config::default())
            .unwrap()
            .with_level(level)
            .without_delays()
    }

    fn listing_page(titles: &[(&str, &str)]) -> String {
        let cards: Vec<String> = titles
            .iter()
            .map(|(title, href)| {
                format!(
                    r#"<div class="JobCardsc__JobcardContainer-sc-hmqj50-0">
                        <a class="CompactOpportunityCardsc__JobCardTitleNoStyleAnchor-sc-dkg8my-12" href="{}">{}</a>
                    </div>"#,
                    href, title
                )
            })
            .collect();
        format!("<html><body>{}</body></html>", cards.join(""))
    }

    fn page_url(settings: &CrawlSettings, term: &SearchTerm, page: u32) -> String {
        listing_url(&settings.site, term, page).unwrap().to_string()
    }

    async fn drain<S: PageSource>(collector: &mut LinkCollector<'_>, source: &mut S) -> Vec<Listing> {
        let mut items = Vec::new();
        while let Some(item) = collector.next(source).await {
            items.push(item);
        }
        items
    }

    #[tokio::test]
    async fn test_engineer_scenario_stops_after_empty_page() {
        let settings = settings(DetailLevel::Structured);
        let term = SearchTerm::new("engineer").unwrap();
        let mut source = FakeSource::new()
            .page(
                &page_url(&settings, &term, 1),
                &listing_page(&[
                    ("Software Engineer", "/jobs/1"),
                    ("Sales Manager", "/jobs/2"),
                    ("QA Engineer", "/jobs/3"),
                ]),
            )
            .page(&page_url(&settings, &term, 2), "<html><body></body></html>");

        let mut collector = LinkCollector::new(term.clone(), &settings);
        let items = drain(&mut collector, &mut source).await;

        assert_eq!(
            items,
            vec![
                Listing::Reference(PageReference::new("/jobs/1")),
                Listing::Reference(PageReference::new("/jobs/3")),
            ]
        );
        assert_eq!(source.navigations.len(), 2);
        assert_eq!(collector.pages_fetched(), 1);
        assert_eq!(collector.candidates_found(), 2);
        assert!(collector.is_exhausted());

        // exhausted collectors never touch the source again
        assert_eq!(collector.next(&mut source).await, None);
        assert_eq!(source.navigations.len(), 2);
    }

    #[tokio::test]
    async fn test_page_then_card_order_across_pages() {
        let settings = settings(DetailLevel::Structured);
        let term = SearchTerm::new("dev").unwrap();
        let mut source = FakeSource::new()
            .page(
                &page_url(&settings, &term, 1),
                &listing_page(&[("Dev A", "/a"), ("Dev B", "/b")]),
            )
            .page(&page_url(&settings, &term, 2), &listing_page(&[("Dev C", "/c")]))
            .page(
                &page_url(&settings, &term, 3),
                &listing_page(&[("Accountant", "/z")]),
            );

        let mut collector = LinkCollector::new(term, &settings);
        let refs: Vec<String> = drain(&mut collector, &mut source)
            .await
            .into_iter()
            .map(|item| match item {
                Listing::Reference(r) => r.as_str().to_string(),
                Listing::Summary(_) => panic!("unexpected summary"),
            })
            .collect();

        assert_eq!(refs, vec!["/a", "/b", "/c"]);
        assert_eq!(collector.pages_fetched(), 3);
    }

    #[tokio::test]
    async fn test_fetch_failure_truncates_sequence() {
        let settings = settings(DetailLevel::Structured);
        let term = SearchTerm::new("dev").unwrap();
        let mut source = FakeSource::new()
            .page(&page_url(&settings, &term, 1), &listing_page(&[("Dev A", "/a")]))
            .failing(&page_url(&settings, &term, 2));

        let mut collector = LinkCollector::new(term, &settings);
        let items = drain(&mut collector, &mut source).await;
        assert_eq!(items.len(), 1);
        assert_eq!(source.navigations.len(), 2);
    }

    #[tokio::test]
    async fn test_summary_level_emits_records() {
        let settings = settings(DetailLevel::Summary);
        let term = SearchTerm::new("dev").unwrap();
        let mut source = FakeSource::new()
            .page(
                &page_url(&settings, &term, 1),
                &listing_page(&[("Dev A", "/id/opportunities/jobs/dev-a/1")]),
            );

        let mut collector = LinkCollector::new(term, &settings);
        let items = drain(&mut collector, &mut source).await;

        let [Listing::Summary(record)] = items.as_slice() else {
            panic!("expected one summary, got {:?}", items);
        };
        assert_eq!(record.title, "Dev A");
        assert_eq!(record.url, "https://glints.com/id/opportunities/jobs/dev-a/1");
    }

    #[tokio::test]
    async fn test_consumer_can_stop_early() {
        let settings = settings(DetailLevel::Structured);
        let term = SearchTerm::new("dev").unwrap();
        let mut source = FakeSource::new()
            .page(
                &page_url(&settings, &term, 1),
                &listing_page(&[("Dev A", "/a"), ("Dev B", "/b")]),
            )
            .page(&page_url(&settings, &term, 2), &listing_page(&[("Dev C", "/c")]));

        let mut collector = LinkCollector::new(term, &settings);
        assert!(collector.next(&mut source).await.is_some());
        assert_eq!(source.navigations.len(), 1);
    }
}
