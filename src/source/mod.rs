//! Page sources
//!
//! A [`PageSource`] is the single page-loading session a crawl runs on. The
//! crawler only ever asks it to navigate, wait for a landmark element, and
//! hand back the rendered HTML; the login flow additionally clicks and types.
//!
//! Two implementations are provided:
//! - [`BrowserSession`]: a real Chrome/Chromium session over CDP
//! - [`HttpPageSource`]: plain HTTP fetches, for static pages and tests

mod browser;
mod http;

pub use browser::BrowserSession;
pub use http::HttpPageSource;

use async_trait::async_trait;
use scraper::{Html, Selector};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors raised by a page source
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to start page source: {0}")]
    Launch(String),

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Timed out after {timeout:?} waiting for {what}")]
    Timeout { what: String, timeout: Duration },

    #[error("Landmark '{selector}' not present on page")]
    LandmarkMissing { selector: String },

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Operation not supported by this page source: {0}")]
    Unsupported(&'static str),
}

impl SourceError {
    /// True for failures caused by a page that did not become ready in time
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            SourceError::Timeout { .. } | SourceError::LandmarkMissing { .. }
        )
    }
}

/// Result type alias for page source operations
pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// A page-loading session
#[async_trait]
pub trait PageSource: Send {
    /// Loads `url` in the session, replacing the current page
    async fn navigate(&mut self, url: &Url) -> SourceResult<()>;

    /// Waits until an element matching `selector` is present
    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> SourceResult<()>;

    /// Waits until any of `selectors` is present and returns the index of the first match
    async fn wait_for_any(&mut self, selectors: &[&str], timeout: Duration) -> SourceResult<usize>;

    /// Returns the current page's HTML
    async fn content(&mut self) -> SourceResult<String>;

    /// Clicks the first element matching `selector`
    async fn click(&mut self, selector: &str) -> SourceResult<()>;

    /// Types `text` into the first element matching `selector`
    async fn type_text(&mut self, selector: &str, text: &str) -> SourceResult<()>;

    /// Releases the session; further calls are no-ops
    async fn close(&mut self) -> SourceResult<()> {
        Ok(())
    }

    /// Navigates to `url`, waits for `landmark`, and returns the page HTML
    async fn load(&mut self, url: &Url, landmark: &str, timeout: Duration) -> SourceResult<String> {
        self.navigate(url).await?;
        self.wait_for(landmark, timeout).await?;
        self.content().await
    }
}

/// Returns whether `html` contains an element matching `selector`
///
/// An invalid selector never matches.
pub fn contains_selector(html: &str, selector: &str) -> bool {
    match Selector::parse(selector) {
        Ok(sel) => Html::parse_document(html).select(&sel).next().is_some(),
        Err(_) => false,
    }
}
