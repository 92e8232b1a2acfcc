//! Page fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - GET requests for numbered catalog pages
//! - Waiting, within a time limit, for the items container to be present
//! - Error classification for fatal page failures

use crate::config::{Config, UserAgentConfig};
use crate::crawler::pagination::PageUrls;
use crate::crawler::parser::PageDocument;
use crate::events::{CrawlEvent, EventSink};
use crate::SweepError;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use scraper::Selector;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Errors that end a crawl at the page being fetched
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid URL for page {page}: {message}")]
    InvalidUrl { page: u32, message: String },

    #[error("HTTP error for {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Timed out after {waited:?} waiting for '{marker}' on {url}")]
    NotReady {
        url: String,
        marker: String,
        waited: Duration,
    },

    #[error("Page fetcher is closed")]
    Closed,
}

/// Source of catalog pages
///
/// A fetcher is owned by one crawl at a time, through a [`FetcherLease`].
/// `close` is called exactly once when the lease ends, whatever the stop
/// reason, including when the crawl future is dropped or unwinds.
#[async_trait(?Send)]
pub trait PageFetcher {
    /// Loads catalog page `page` and returns it once its items container is present
    async fn fetch(&mut self, page: u32) -> Result<PageDocument, FetchError>;

    /// Releases the fetcher's resources
    ///
    /// Runs from `Drop`, so it must not block or panic.
    fn close(&mut self) {}
}

/// Exclusive use of a page fetcher for the duration of one crawl
///
/// The fetcher is closed and `FetcherClosed` emitted exactly once: either by
/// an explicit [`release`](Self::release) or when the lease is dropped.
pub struct FetcherLease<F: PageFetcher> {
    fetcher: F,
    events: Arc<dyn EventSink>,
    released: bool,
}

impl<F: PageFetcher> FetcherLease<F> {
    pub fn new(fetcher: F, events: Arc<dyn EventSink>) -> Self {
        Self {
            fetcher,
            events,
            released: false,
        }
    }

    /// Fetches a page; a released lease refuses every page
    pub async fn fetch(&mut self, page: u32) -> Result<PageDocument, FetchError> {
        if self.released {
            return Err(FetchError::Closed);
        }
        self.fetcher.fetch(page).await
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Closes the fetcher; later calls do nothing
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.fetcher.close();
        self.events.emit(CrawlEvent::FetcherClosed);
    }
}

impl<F: PageFetcher> Drop for FetcherLease<F> {
    fn drop(&mut self) {
        self.release();
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Timeout of a single request
///
/// # Example
///
/// ```no_run
/// use catalog_sweep::config::UserAgentConfig;
/// use catalog_sweep::crawler::build_http_client;
/// use std::time::Duration;
///
/// let config = UserAgentConfig {
///     crawler_name: "CatalogSweep".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config, Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches catalog pages over HTTP
///
/// # Request Flow
///
/// 1. Build the page URL (page 1 is the base URL)
/// 2. Send a GET request; transport errors and non-2xx statuses are fatal
/// 3. Parse the body and look for the ready marker
///    - Present (or no marker configured) → return the document
///    - Absent → wait one poll interval and fetch again, until the ready
///      timeout elapses → `FetchError::NotReady`
pub struct HttpPageFetcher {
    client: Option<Client>,
    urls: PageUrls,
    ready: Option<(Selector, String)>,
    ready_timeout: Duration,
    poll_interval: Duration,
}

impl HttpPageFetcher {
    /// Creates a fetcher for the configured catalog
    ///
    /// `ready_marker` is the compiled form of `config.selectors.ready`.
    pub fn new(config: &Config, ready_marker: Option<Selector>) -> Result<Self, SweepError> {
        let client = build_http_client(&config.user_agent, config.crawler.request_timeout())?;
        let urls = PageUrls::from_config(&config.site)?;

        Ok(Self {
            client: Some(client),
            urls,
            ready: ready_marker.map(|selector| (selector, config.selectors.ready.clone())),
            ready_timeout: config.crawler.ready_timeout(),
            poll_interval: config.crawler.ready_poll_interval(),
        })
    }

    async fn fetch_body(client: &Client, url: &str) -> Result<String, FetchError> {
        let response = client.get(url).send().await.map_err(|source| FetchError::Http {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| FetchError::Http {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait(?Send)]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&mut self, page: u32) -> Result<PageDocument, FetchError> {
        let client = self.client.as_ref().ok_or(FetchError::Closed)?;
        let url = self
            .urls
            .url_for(page)
            .map_err(|message| FetchError::InvalidUrl { page, message })?;
        let url = url.as_str();

        let started = Instant::now();
        loop {
            let body = Self::fetch_body(client, url).await?;
            let document = PageDocument::parse(page, url, &body);

            let Some((marker, css)) = &self.ready else {
                return Ok(document);
            };
            if document.contains(marker) {
                return Ok(document);
            }

            let waited = started.elapsed();
            if waited + self.poll_interval > self.ready_timeout {
                return Err(FetchError::NotReady {
                    url: url.to_string(),
                    marker: css.clone(),
                    waited,
                });
            }

            tracing::trace!("'{}' not present on {} yet, polling again", css, url);
            drop(document);
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    fn close(&mut self) {
        self.client = None;
    }
}
