//! Plain HTTP page source
//!
//! Fetches pages with a single GET and serves their static HTML. Nothing is
//! rendered, so it only works for server-rendered pages (and mirrors of them).
//! Interaction primitives are unsupported, which makes logins fail cleanly.

use crate::config::BrowserConfig;
use crate::source::{contains_selector, PageSource, SourceError, SourceResult};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Page source backed by a `reqwest` client
pub struct HttpPageSource {
    client: Client,
    timeout: Duration,
    current: Option<(Url, String)>,
}

impl HttpPageSource {
    /// Builds a client with the configured user agent and navigation timeout
    pub fn new(config: &BrowserConfig) -> SourceResult<Self> {
        let timeout = Duration::from_secs(config.navigation_timeout_secs);
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(|e| SourceError::Launch(e.to_string()))?;

        Ok(Self {
            client,
            timeout,
            current: None,
        })
    }

    fn html(&self) -> &str {
        self.current.as_ref().map(|(_, html)| html.as_str()).unwrap_or("")
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn navigate(&mut self, url: &Url) -> SourceResult<()> {
        self.current = None;
        tracing::debug!("GET {}", url);

        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout {
                    what: format!("response from {}", url),
                    timeout: self.timeout,
                }
            } else {
                SourceError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Navigation {
                url: url.to_string(),
                message: format!("HTTP {}", status.as_u16()),
            });
        }

        let final_url = response.url().clone();
        let body = response.text().await?;
        self.current = Some((final_url, body));
        Ok(())
    }

    async fn wait_for(&mut self, selector: &str, _timeout: Duration) -> SourceResult<()> {
        if contains_selector(self.html(), selector) {
            Ok(())
        } else {
            Err(SourceError::LandmarkMissing {
                selector: selector.to_string(),
            })
        }
    }

    async fn wait_for_any(&mut self, selectors: &[&str], _timeout: Duration) -> SourceResult<usize> {
        selectors
            .iter()
            .position(|sel| contains_selector(self.html(), sel))
            .ok_or_else(|| SourceError::LandmarkMissing {
                selector: selectors.join(" | "),
            })
    }

    async fn content(&mut self) -> SourceResult<String> {
        Ok(self.html().to_string())
    }

    async fn click(&mut self, _selector: &str) -> SourceResult<()> {
        Err(SourceError::Unsupported("click"))
    }

    async fn type_text(&mut self, _selector: &str, _text: &str) -> SourceResult<()> {
        Err(SourceError::Unsupported("type_text"))
    }

    async fn close(&mut self) -> SourceResult<()> {
        self.current = None;
        Ok(())
    }
}
