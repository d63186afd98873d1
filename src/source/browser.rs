use crate::config::BrowserConfig;
use crate::source::{PageSource, SourceError, SourceResult};
use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig as CdpConfig, Element, Page};
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use url::Url;

/// Interval between element lookups while waiting for a landmark
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// A single Chrome/Chromium session driven over CDP
///
/// One page is reused for the whole run. The session must be closed with
/// [`PageSource::close`]; closing twice is harmless.
pub struct BrowserSession {
    browser: Option<Browser>,
    handler: Option<JoinHandle<()>>,
    page: Option<Page>,
    navigation_timeout: Duration,
}

impl BrowserSession {
    /// Launches the browser and opens a blank page
    pub async fn launch(config: &BrowserConfig) -> SourceResult<Self> {
        let navigation_timeout = Duration::from_secs(config.navigation_timeout_secs);

        let mut builder = CdpConfig::builder()
            .request_timeout(navigation_timeout)
            .arg(format!("--user-agent={}", config.user_agent))
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage");

        if !config.headless {
            builder = builder.with_head();
        }
        if config.no_sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(path) = &config.executable {
            builder = builder.chrome_executable(path);
        }

        let cdp_config = builder.build().map_err(SourceError::Launch)?;
        let (mut browser, mut handler) = Browser::launch(cdp_config)
            .await
            .map_err(|e| SourceError::Launch(e.to_string()))?;

        // Drain browser events until the connection goes away
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                let _ = browser.close().await;
                let _ = browser.wait().await;
                handler_task.abort();
                return Err(SourceError::Launch(e.to_string()));
            }
        };

        tracing::info!(
            "Browser session started ({})",
            if config.headless { "headless" } else { "headed" }
        );

        Ok(Self {
            browser: Some(browser),
            handler: Some(handler_task),
            page: Some(page),
            navigation_timeout,
        })
    }

    fn page(&self) -> SourceResult<&Page> {
        self.page
            .as_ref()
            .ok_or_else(|| SourceError::Browser("session already closed".to_string()))
    }

    /// Polls for an element until `timeout` elapses
    async fn find(&self, selector: &str, timeout: Duration) -> SourceResult<Element> {
        let page = self.page()?;
        let deadline = Instant::now() + timeout;

        loop {
            if let Ok(element) = page.find_element(selector).await {
                return Ok(element);
            }
            if Instant::now() >= deadline {
                return Err(SourceError::Timeout {
                    what: selector.to_string(),
                    timeout,
                });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}

#[async_trait]
impl PageSource for BrowserSession {
    async fn navigate(&mut self, url: &Url) -> SourceResult<()> {
        let page = self.page()?;
        tracing::debug!("Navigating to {}", url);

        match tokio::time::timeout(self.navigation_timeout, page.goto(url.as_str())).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(SourceError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            }),
            Err(_) => Err(SourceError::Timeout {
                what: format!("navigation to {}", url),
                timeout: self.navigation_timeout,
            }),
        }
    }

    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> SourceResult<()> {
        self.find(selector, timeout).await.map(|_| ())
    }

    async fn wait_for_any(&mut self, selectors: &[&str], timeout: Duration) -> SourceResult<usize> {
        let page = self.page()?;
        let deadline = Instant::now() + timeout;

        loop {
            for (index, selector) in selectors.iter().enumerate() {
                if page.find_element(*selector).await.is_ok() {
                    return Ok(index);
                }
            }
            if Instant::now() >= deadline {
                return Err(SourceError::Timeout {
                    what: selectors.join(" | "),
                    timeout,
                });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn content(&mut self) -> SourceResult<String> {
        self.page()?
            .content()
            .await
            .map_err(|e| SourceError::Browser(e.to_string()))
    }

    async fn click(&mut self, selector: &str) -> SourceResult<()> {
        let element = self.find(selector, self.navigation_timeout).await?;
        element
            .click()
            .await
            .map_err(|e| SourceError::Browser(format!("click on '{}' failed: {}", selector, e)))?;
        Ok(())
    }

    async fn type_text(&mut self, selector: &str, text: &str) -> SourceResult<()> {
        let element = self.find(selector, self.navigation_timeout).await?;
        element
            .click()
            .await
            .map_err(|e| SourceError::Browser(format!("focus on '{}' failed: {}", selector, e)))?;
        element
            .type_str(text)
            .await
            .map_err(|e| SourceError::Browser(format!("typing into '{}' failed: {}", selector, e)))?;
        Ok(())
    }

    async fn close(&mut self) -> SourceResult<()> {
        self.page = None;

        let Some(mut browser) = self.browser.take() else {
            return Ok(());
        };

        let closed = browser
            .close()
            .await
            .map(|_| ())
            .map_err(|e| SourceError::Browser(e.to_string()));
        if let Err(e) = browser.wait().await {
            tracing::warn!("Browser process did not exit cleanly: {}", e);
        }
        if let Some(handler) = self.handler.take() {
            handler.abort();
        }

        tracing::info!("Browser session closed");
        closed
    }
}
