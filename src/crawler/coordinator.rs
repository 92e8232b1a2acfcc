//! Crawler coordinator - main pagination logic
//!
//! This module contains the crawl loop that drives one catalog crawl:
//! - Fetching the current page
//! - Extracting its records
//! - Deciding whether to stop or move to the next page
//! - Pausing between pages
//! - Releasing the page fetcher on every exit path

use crate::crawler::extractor::FieldExtractor;
use crate::crawler::fetcher::{FetchError, FetcherLease, PageFetcher};
use crate::crawler::CrawlMode;
use crate::events::{CrawlEvent, EventSink};
use crate::output::{summarize, Statistics};
use crate::record::Record;
use crate::state::{CrawlState, CrawlStatus};
use crate::SweepError;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Result of a finished crawl
#[derive(Debug)]
pub struct CrawlOutcome {
    /// Terminal status explaining why the crawl stopped
    pub status: CrawlStatus,

    /// Records from every successfully processed page, in page order
    pub records: Vec<Record>,

    /// Page the crawl stopped at
    pub last_page: u32,

    /// Number of pages that contributed records
    pub pages_processed: u32,

    /// The fetch failure behind a `StoppedError` status
    pub failure: Option<FetchError>,

    pub started_at: Instant,
    pub finished_at: Instant,
}

impl CrawlOutcome {
    pub fn elapsed(&self) -> Duration {
        self.finished_at.saturating_duration_since(self.started_at)
    }

    /// Summary statistics over the collected records
    pub fn statistics(&self) -> Statistics {
        summarize(&self.records, self.started_at, self.finished_at)
    }
}

/// Main crawl coordinator
///
/// Owns the page fetcher for the lifetime of a single crawl. Each iteration:
///
/// 1. Fetch the current page. A failure stops the crawl with `StoppedError`;
///    the failing page contributes nothing.
/// 2. Extract records. An empty page stops the crawl with `StoppedEmpty`.
/// 3. Append the page's records.
/// 4. In bounded mode, stop with `StoppedLimit` once the last requested page
///    has been processed.
/// 5. Stop with `StoppedNoNext` if the page has no next-page link.
/// 6. Advance to the next page and wait the politeness delay.
///
/// The fetcher is held through a [`FetcherLease`] from construction on, so it
/// is released even if the coordinator is dropped before or during `run`.
pub struct Coordinator<F: PageFetcher> {
    fetcher: FetcherLease<F>,
    extractor: FieldExtractor,
    mode: CrawlMode,
    delay: Duration,
    events: Arc<dyn EventSink>,
}

impl<F: PageFetcher> Coordinator<F> {
    /// Creates a coordinator with a one second politeness delay
    pub fn new(
        fetcher: F,
        extractor: FieldExtractor,
        mode: CrawlMode,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            fetcher: FetcherLease::new(fetcher, events.clone()),
            extractor,
            mode,
            delay: Duration::from_secs(1),
            events,
        }
    }

    /// Sets the pause between successive page fetches
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Runs the crawl to a stop condition
    ///
    /// Page failures never surface as errors; they are reflected in the
    /// outcome's status and `failure`. The fetcher is closed before this
    /// returns, on every path.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlOutcome)` - The crawl reached a terminal state
    /// * `Err(SweepError::InvalidTransition)` - The state machine was misused
    pub async fn run(mut self) -> Result<CrawlOutcome, SweepError> {
        let started_at = Instant::now();
        let mut state = CrawlState::new(self.mode.start_page());

        self.events.emit(CrawlEvent::CrawlStarted {
            mode: self.mode,
            start_page: state.current_page(),
        });

        let result = self.paginate(&mut state).await;

        self.fetcher.release();

        let failure = result?;
        let finished_at = Instant::now();

        self.events.emit(CrawlEvent::CrawlStopped {
            reason: state.status(),
            last_page: state.current_page(),
            pages_processed: state.pages_processed(),
            total_records: state.collected().len(),
            elapsed: finished_at.saturating_duration_since(started_at),
        });

        Ok(CrawlOutcome {
            status: state.status(),
            last_page: state.current_page(),
            pages_processed: state.pages_processed(),
            records: state.into_records(),
            failure,
            started_at,
            finished_at,
        })
    }

    /// Drives the state machine until it reaches a terminal status
    ///
    /// Returns the fetch error when the crawl stopped because of one.
    async fn paginate(
        &mut self,
        state: &mut CrawlState,
    ) -> Result<Option<FetchError>, SweepError> {
        let page_limit = self.mode.page_limit();

        loop {
            let page = state.current_page();

            let document = match self.fetcher.fetch(page).await {
                Ok(document) => document,
                Err(e) => {
                    self.events.emit(CrawlEvent::fetch_failed(page, &e));
                    state.stop(CrawlStatus::StoppedError)?;
                    return Ok(Some(e));
                }
            };
            self.events.emit(CrawlEvent::PageFetched {
                page,
                url: document.url().to_string(),
            });

            let records = self.extractor.extract(&document);
            self.events.emit(CrawlEvent::PageExtracted {
                page,
                records: records.len(),
            });

            if records.is_empty() {
                state.stop(CrawlStatus::StoppedEmpty)?;
                return Ok(None);
            }
            state.append_page(records)?;

            if page_limit.is_some_and(|limit| page >= limit) {
                state.stop(CrawlStatus::StoppedLimit)?;
                return Ok(None);
            }

            if !self.extractor.has_next_page(&document) {
                state.stop(CrawlStatus::StoppedNoNext)?;
                return Ok(None);
            }

            drop(document);
            state.advance()?;

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }
    }
}
