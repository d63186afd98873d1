//! Listing page parser
//!
//! This module turns a rendered search-results page into listing candidates:
//! - One candidate per result card with a usable title anchor
//! - Cards that do not mention the search term are dropped
//! - Secondary card fields (company, salary, ...) are optional
//!
//! It also builds the listing URL for a `(term, page)` pair.

use crate::config::SiteConfig;
use crate::crawler::selectors::listing;
use crate::record::{PageReference, SearchTerm, SummaryRecord, NO_DATA, UNDISCLOSED};
use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// One result card on a listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingCandidate {
    pub title: String,
    pub reference: PageReference,
    pub company: Option<String>,
    pub salary: Option<String>,
    pub location: Option<String>,
    pub freshness: Option<String>,
}

impl ListingCandidate {
    /// Builds the level-1 record for this card
    pub fn into_summary(self, url: &Url, captured_at: DateTime<Utc>) -> SummaryRecord {
        SummaryRecord {
            title: self.title,
            company: self.company.unwrap_or_else(|| UNDISCLOSED.to_string()),
            salary: self.salary.unwrap_or_else(|| UNDISCLOSED.to_string()),
            location: self.location.unwrap_or_else(|| NO_DATA.to_string()),
            freshness: self.freshness.unwrap_or_else(|| NO_DATA.to_string()),
            url: url.to_string(),
            timestamp: captured_at,
        }
    }
}

/// Builds the listing URL for one page of a search
///
/// Pages are numbered from 1.
pub fn listing_url(site: &SiteConfig, term: &SearchTerm, page: u32) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(&site.base_url)?.join(&site.listing_path)?;
    url.query_pairs_mut()
        .append_pair("keyword", term.as_str())
        .append_pair("country", &site.country)
        .append_pair("locationName", &site.location_name)
        .append_pair("lowestLocationLevel", "1")
        .append_pair("page", &page.to_string());
    Ok(url)
}

/// Parses a listing page into the candidates relevant to `term`
///
/// # Candidate Rules
///
/// **Dropped:**
/// - Title anchors without an `href` (or with a blank one)
/// - Title anchors whose text is empty after trimming
/// - Titles that do not contain `term`, ignoring case
///
/// Candidates keep card order.
pub fn parse_listing(html: &str, term: &SearchTerm) -> Vec<ListingCandidate> {
    let document = Html::parse_document(html);
    let (Ok(title_selector), Ok(card_selector)) =
        (Selector::parse(listing::TITLE), Selector::parse(listing::CARD))
    else {
        return Vec::new();
    };

    let mut candidates = Vec::new();

    for anchor in document.select(&title_selector) {
        let Some(href) = anchor
            .value()
            .attr("href")
            .map(str::trim)
            .filter(|h| !h.is_empty())
        else {
            continue;
        };

        let title = element_text(anchor);
        if title.is_empty() {
            continue;
        }

        if !term.matches(&title) {
            tracing::trace!("Skipping irrelevant card '{}'", title);
            continue;
        }

        let card = anchor
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|el| card_selector.matches(el));

        let field = |css: &str| card.and_then(|card| first_text(card, css));

        candidates.push(ListingCandidate {
            title,
            reference: PageReference::new(href),
            company: field(listing::COMPANY),
            salary: field(listing::SALARY),
            location: field(listing::LOCATION),
            freshness: field(listing::FRESHNESS),
        });
    }

    candidates
}

/// Text of an element with whitespace runs collapsed to single spaces
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text of the first match of `css` under `scope`, if non-empty
pub(crate) fn first_text(scope: ElementRef<'_>, css: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    scope
        .select(&selector)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty())
}
