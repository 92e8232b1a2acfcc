//! Crawler module for paginating a catalog and extracting records
//!
//! This module contains the core crawling logic, including:
//! - Page URL construction for numbered catalog pages
//! - HTTP fetching with a bounded wait for the items container
//! - Item discovery and field reading with CSS selectors
//! - Per-item failure tolerant record extraction
//! - The pagination state machine that decides when to stop

mod coordinator;
mod extractor;
mod fetcher;
mod pagination;
mod parser;

pub use coordinator::{CrawlOutcome, Coordinator};
pub use extractor::FieldExtractor;
pub use fetcher::{build_http_client, FetchError, FetcherLease, HttpPageFetcher, PageFetcher};
pub use pagination::PageUrls;
pub use parser::{CatalogSelectors, Field, PageDocument};

use crate::config::Config;
use crate::events::EventSink;
use crate::SweepError;
use std::fmt;
use std::num::NonZeroU32;
use std::sync::Arc;

/// Which pages a crawl visits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlMode {
    /// Start at page 1 and follow next-page links until the catalog ends
    All,

    /// Pages 1 through N, stopping earlier if the catalog ends
    FirstPages(NonZeroU32),

    /// Exactly one page, without looking for a next-page link
    SinglePage(NonZeroU32),
}

impl CrawlMode {
    /// Page the crawl begins at
    pub fn start_page(&self) -> u32 {
        match self {
            Self::All | Self::FirstPages(_) => 1,
            Self::SinglePage(page) => page.get(),
        }
    }

    /// Last page a bounded crawl may process, or None when unbounded
    pub fn page_limit(&self) -> Option<u32> {
        match self {
            Self::All => None,
            Self::FirstPages(count) => Some(count.get()),
            Self::SinglePage(page) => Some(page.get()),
        }
    }

    pub fn is_bounded(&self) -> bool {
        self.page_limit().is_some()
    }
}

impl fmt::Display for CrawlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all-pages"),
            Self::FirstPages(count) => write!(f, "first-{}-pages", count),
            Self::SinglePage(page) => write!(f, "page-{}", page),
        }
    }
}

/// Runs a complete crawl over HTTP
///
/// This is the main entry point for crawling a catalog. It will:
/// 1. Compile the configured selectors
/// 2. Build the HTTP page fetcher
/// 3. Paginate according to `mode` until a stop condition is reached
/// 4. Release the fetcher
///
/// Fetch failures do not surface here: they end the crawl and are reported
/// through the outcome's status, with every record collected before them.
///
/// # Returns
///
/// * `Ok(CrawlOutcome)` - The crawl ran to a stop condition
/// * `Err(SweepError)` - The selectors or the HTTP client could not be built
pub async fn crawl(
    config: &Config,
    mode: CrawlMode,
    events: Arc<dyn EventSink>,
) -> Result<CrawlOutcome, SweepError> {
    let selectors = CatalogSelectors::from_config(&config.selectors)?;
    let fetcher = HttpPageFetcher::new(config, selectors.ready_marker().cloned())?;
    let extractor = FieldExtractor::new(selectors, events.clone());

    Coordinator::new(fetcher, extractor, mode, events)
        .with_delay(config.crawler.politeness_delay())
        .run()
        .await
}
