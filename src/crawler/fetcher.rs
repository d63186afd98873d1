//! Detail page fetcher
//!
//! Resolves a listing reference, loads the detail page with bounded retries
//! and delegates to the extractor. Every attempt is preceded by a politeness
//! pause; a reference that never loads is dropped, not propagated.

use crate::crawler::extractor::extract;
use crate::crawler::selectors::detail;
use crate::crawler::CrawlSettings;
use crate::record::{capture_timestamp, JobRecord, PageReference};
use crate::source::PageSource;
use scraper::Html;
use url::Url;

/// Fetches and extracts detail pages
pub struct DetailFetcher<'a> {
    settings: &'a CrawlSettings,
}

impl<'a> DetailFetcher<'a> {
    pub fn new(settings: &'a CrawlSettings) -> Self {
        Self { settings }
    }

    /// Fetches one detail page
    ///
    /// Makes at most `retry.max_attempts` attempts and returns `None` after
    /// the last one fails.
    ///
    /// # Arguments
    ///
    /// * `source` - The page source to load the detail page with
    /// * `reference` - Link taken from the listing card
    ///
    /// # Returns
    ///
    /// * `Some(JobRecord)` - The extracted record at the crawl's level
    /// * `None` - The reference could not be resolved or never loaded
    pub async fn fetch<S: PageSource + ?Sized>(
        &self,
        source: &mut S,
        reference: &PageReference,
    ) -> Option<JobRecord> {
        let url = match reference.resolve(&self.settings.base_url) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Skipping unresolvable reference '{}': {}", reference, e);
                return None;
            }
        };

        let attempts = self.settings.retry.max_attempts;
        for attempt in 1..=attempts {
            self.settings.retry.delay.pause().await;

            match source
                .load(&url, detail::LANDMARK, self.settings.page_timeout)
                .await
            {
                Ok(html) => {
                    tracing::debug!("Fetched detail page {}", url);
                    return Some(self.extract_page(&html, &url));
                }
                Err(e) => {
                    tracing::warn!(
                        "Detail page {} failed (attempt {}/{}): {}",
                        url,
                        attempt,
                        attempts,
                        e
                    );
                }
            }
        }

        tracing::warn!("Giving up on {} after {} attempt(s)", url, attempts);
        None
    }

    fn extract_page(&self, html: &str, url: &Url) -> JobRecord {
        let document = Html::parse_document(html);
        extract(
            &document,
            self.settings.level,
            &self.settings.rules,
            url,
            capture_timestamp(),
        )
    }
}
