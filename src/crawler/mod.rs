//! Crawl and extraction engine
//!
//! This module contains the core crawling logic:
//! - Listing pagination and candidate discovery ([`LinkCollector`])
//! - Detail page fetching with bounded retry ([`DetailFetcher`])
//! - Level-dependent field extraction ([`extract`])
//! - Per-term sequencing and export hand-off ([`Coordinator`])

mod collector;
mod coordinator;
mod extractor;
mod fetcher;
mod parser;
mod politeness;
pub mod selectors;

pub use collector::{LinkCollector, Listing};
pub use coordinator::Coordinator;
pub use extractor::{extract, ExtractionRules};
pub use fetcher::DetailFetcher;
pub use parser::{listing_url, parse_listing, ListingCandidate};
pub use politeness::{DelayPolicy, RetryPolicy};

use crate::config::{Config, SiteConfig};
use crate::record::DetailLevel;
use std::time::Duration;
use url::Url;

/// Crawl-wide settings, fixed for one run
#[derive(Debug, Clone)]
pub struct CrawlSettings {
    pub level: DetailLevel,
    pub site: SiteConfig,
    pub base_url: Url,
    pub page_delay: DelayPolicy,
    pub retry: RetryPolicy,
    pub page_timeout: Duration,
    pub rules: ExtractionRules,
}

impl CrawlSettings {
    /// Derives the engine settings from a validated configuration
    pub fn from_config(config: &Config) -> Result<Self, url::ParseError> {
        let crawler = &config.crawler;
        Ok(Self {
            level: crawler.detail_level,
            site: config.site.clone(),
            base_url: Url::parse(&config.site.base_url)?,
            page_delay: DelayPolicy::from_millis(crawler.page_delay_min_ms, crawler.page_delay_max_ms),
            retry: RetryPolicy::new(
                crawler.max_retries,
                DelayPolicy::from_millis(crawler.detail_delay_min_ms, crawler.detail_delay_max_ms),
            ),
            page_timeout: Duration::from_secs(crawler.page_timeout_secs),
            rules: ExtractionRules {
                skipped_requirement_tags: crawler.skipped_requirement_tags,
            },
        })
    }

    /// Overrides the configured detail level
    pub fn with_level(mut self, level: DetailLevel) -> Self {
        self.level = level;
        self
    }

    /// Disables both politeness delays (tests and local mirrors)
    pub fn without_delays(mut self) -> Self {
        self.page_delay = DelayPolicy::none();
        self.retry.delay = DelayPolicy::none();
        self
    }
}
