//! Headless browser session for the marketplace pages.
//!
//! The search page is rendered client-side and lazy-loads more cards on
//! scroll, so plain HTTP fetches see nothing useful. One `BrowserSession` is
//! launched per cycle and must be closed with [`BrowserSession::close`] when
//! the cycle ends, whatever its outcome.

use std::time::Duration;

use chromiumoxide::Page;
use chromiumoxide::browser::{Browser, BrowserConfig};
use dealwatch_core::{CandidateSet, CandidateSource, DescriptionFetcher, Error};
use futures_util::StreamExt;
use thiserror::Error;
use tokio::task::JoinHandle;
use url::Url;

use crate::scrape::{CARD_SELECTOR, SECTION_SELECTOR, parse_description, parse_listings};

/// Upper bound on scroll steps while expanding the result list.
const MAX_SCROLL_STEPS: usize = 200;

/// Interval between two selector checks.
const SELECTOR_POLL: Duration = Duration::from_millis(250);

/// Errors that can occur while driving the browser.
#[derive(Debug, Error)]
pub enum BrowserError {
    /// Failed to launch or connect to browser.
    #[error("browser launch failed: {0}")]
    Launch(String),

    /// Failed to navigate to URL.
    #[error("navigation failed: {0}")]
    Navigation(String),

    /// Failed to get page content or evaluate a script.
    #[error("content retrieval failed: {0}")]
    ContentRetrieval(String),

    /// Timeout waiting for page to load.
    #[error("page timeout after {0}ms")]
    Timeout(u64),

    /// Wait selector not found.
    #[error("selector not found: {0}")]
    SelectorNotFound(String),
}

impl From<BrowserError> for Error {
    fn from(err: BrowserError) -> Self {
        match err {
            BrowserError::ContentRetrieval(msg) => Error::Scrape(msg),
            other => Error::Navigation(other.to_string()),
        }
    }
}

/// Options for a browser session.
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    /// Run without a window (default: true).
    pub headless: bool,

    /// Bound for each navigation and selector wait (default: 30s).
    pub page_timeout: Duration,

    /// Pause after each scroll step (default: 1.5s).
    pub scroll_pause: Duration,

    /// Viewport dimensions (default: 1280x720).
    pub viewport: (u32, u32),
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            headless: true,
            page_timeout: Duration::from_secs(30),
            scroll_pause: Duration::from_millis(1500),
            viewport: (1280, 720),
        }
    }
}

/// A launched browser with one working tab.
pub struct BrowserSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    opts: BrowserOptions,
}

impl BrowserSession {
    /// Launch a browser and open a blank tab.
    ///
    /// The browser uses a background task to handle Chrome DevTools Protocol
    /// events; it stops when the session is closed.
    pub async fn launch(opts: BrowserOptions) -> Result<Self, BrowserError> {
        let mut builder = BrowserConfig::builder()
            .window_size(opts.viewport.0, opts.viewport.1)
            .request_timeout(opts.page_timeout)
            .arg("--ignore-certificate-errors");
        if !opts.headless {
            builder = builder.with_head();
        }
        let config = builder.build().map_err(BrowserError::Launch)?;

        let (browser, mut handler) =
            Browser::launch(config).await.map_err(|e| BrowserError::Launch(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("browser handler event error: {e}");
                    break;
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                handler.abort();
                return Err(BrowserError::Launch(e.to_string()));
            }
        };

        Ok(Self { browser, page, handler, opts })
    }

    /// Navigate the working tab and wait for the load to finish.
    async fn goto(&self, url: &str) -> Result<(), BrowserError> {
        let timeout_ms = self.opts.page_timeout.as_millis() as u64;
        tokio::time::timeout(self.opts.page_timeout, self.page.goto(url))
            .await
            .map_err(|_| BrowserError::Timeout(timeout_ms))?
            .map_err(|e| BrowserError::Navigation(format!("{url}: {e}")))?;
        Ok(())
    }

    /// Poll until `selector` matches an element or the page timeout elapses.
    async fn wait_for(&self, selector: &str) -> Result<(), BrowserError> {
        let wait = tokio::time::timeout(self.opts.page_timeout, async {
            loop {
                if self.page.find_element(selector).await.is_ok() {
                    return;
                }
                tokio::time::sleep(SELECTOR_POLL).await;
            }
        })
        .await;

        wait.map_err(|_| BrowserError::SelectorNotFound(selector.to_string()))
    }

    async fn eval<T: serde::de::DeserializeOwned>(&self, expression: &str) -> Result<T, BrowserError> {
        self.page
            .evaluate(expression)
            .await
            .map_err(|e| BrowserError::ContentRetrieval(e.to_string()))?
            .into_value::<T>()
            .map_err(|e| BrowserError::ContentRetrieval(e.to_string()))
    }

    /// Scroll until the lazy-loaded list stops growing.
    ///
    /// Stops when a scroll leaves the page height unchanged or a second
    /// results section appears. Failures are logged and end the expansion;
    /// whatever is loaded so far is still scraped.
    pub async fn expand_result_set(&self) {
        if let Err(e) = self.try_expand_result_set().await {
            tracing::warn!(error = %e, "scrolling stopped early");
        }
    }

    async fn try_expand_result_set(&self) -> Result<(), BrowserError> {
        let count_sections = format!("document.querySelectorAll('{SECTION_SELECTOR}').length");

        for step in 0..MAX_SCROLL_STEPS {
            let sections: u64 = self.eval(&count_sections).await?;
            if sections > 1 {
                tracing::debug!(step, "second results section reached");
                return Ok(());
            }

            let before: u64 = self.eval("document.body.scrollHeight").await?;
            self.page
                .evaluate("window.scrollTo(0, document.body.scrollHeight)")
                .await
                .map_err(|e| BrowserError::ContentRetrieval(e.to_string()))?;
            tokio::time::sleep(self.opts.scroll_pause).await;
            let after: u64 = self.eval("document.body.scrollHeight").await?;

            if after == before {
                tracing::debug!(step, height = after, "page height stable");
                return Ok(());
            }
        }

        tracing::debug!("scroll step limit reached");
        Ok(())
    }

    async fn current_url(&self, fallback: &Url) -> Url {
        match self.page.url().await {
            Ok(Some(current)) => Url::parse(&current).unwrap_or_else(|_| fallback.clone()),
            _ => fallback.clone(),
        }
    }

    async fn html(&self) -> Result<String, BrowserError> {
        self.page
            .content()
            .await
            .map_err(|e| BrowserError::ContentRetrieval(e.to_string()))
    }

    /// Close the tab and the browser and stop the event handler.
    pub async fn close(mut self) {
        self.page.clone().close().await.ok();
        if let Err(e) = self.browser.close().await {
            tracing::debug!("browser close failed: {e}");
        }
        self.browser.wait().await.ok();
        self.handler.abort();
    }
}

#[async_trait::async_trait]
impl CandidateSource for BrowserSession {
    async fn fetch_candidates(&self, search_url: &str) -> Result<CandidateSet, Error> {
        let url = Url::parse(search_url).map_err(|e| Error::InvalidInput(format!("search url: {e}")))?;

        self.goto(url.as_str()).await?;
        self.wait_for(CARD_SELECTOR).await?;
        self.expand_result_set().await;

        let html = self.html().await?;
        let base = self.current_url(&url).await;
        let listings = parse_listings(&html, &base);
        tracing::debug!(count = listings.len(), "listings scraped");

        Ok(CandidateSet::from_items(listings))
    }
}

#[async_trait::async_trait]
impl DescriptionFetcher for BrowserSession {
    async fn fetch_description(&self, url: &str) -> Result<String, Error> {
        self.goto(url).await?;
        let html = self.html().await?;
        Ok(parse_description(&html))
    }
}
