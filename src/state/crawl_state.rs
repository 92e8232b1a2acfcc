//! Crawl state definitions for the pagination loop
//!
//! This module defines the statuses a crawl moves through and the
//! per-invocation state the coordinator mutates while paginating.
use crate::record::Record;
use crate::SweepError;
use std::fmt;

/// Represents the current status of a crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlStatus {
    // ===== Active State =====
    /// Pages are still being fetched
    Running,

    // ===== Terminal States =====
    /// A page produced no records; treated as running past the last page
    StoppedEmpty,

    /// The last processed page had no next-page link
    StoppedNoNext,

    /// A page fetch failed; the crawl ends with what was collected before it
    StoppedError,

    /// The requested number of pages was reached (bounded mode only)
    StoppedLimit,
}

impl CrawlStatus {
    /// Returns true if this is a terminal state (no further fetches)
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Running)
    }

    /// Stable snake_case name used in logs and events
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::StoppedEmpty => "stopped_empty",
            Self::StoppedNoNext => "stopped_no_next",
            Self::StoppedError => "stopped_error",
            Self::StoppedLimit => "stopped_limit",
        }
    }

    /// Human-readable explanation of a stop reason
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Running => "crawl in progress",
            Self::StoppedEmpty => "no more items found",
            Self::StoppedNoNext => "reached last page",
            Self::StoppedError => "page fetch failed",
            Self::StoppedLimit => "page limit reached",
        }
    }
}

impl fmt::Display for CrawlStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Mutable state of a single crawl invocation
///
/// `current_page` only moves forward by one per successful iteration, and
/// the status leaves `Running` exactly once.
#[derive(Debug, Clone)]
pub struct CrawlState {
    current_page: u32,
    collected: Vec<Record>,
    status: CrawlStatus,
    pages_processed: u32,
}

impl CrawlState {
    /// Creates a running state positioned at `start_page` (clamped to 1)
    pub fn new(start_page: u32) -> Self {
        Self {
            current_page: start_page.max(1),
            collected: Vec::new(),
            status: CrawlStatus::Running,
            pages_processed: 0,
        }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn status(&self) -> CrawlStatus {
        self.status
    }

    /// Returns true once a terminal status has been reached
    pub fn is_done(&self) -> bool {
        self.status.is_terminal()
    }

    /// Records collected so far, in page order then extraction order
    pub fn collected(&self) -> &[Record] {
        &self.collected
    }

    /// Number of pages whose records were appended
    pub fn pages_processed(&self) -> u32 {
        self.pages_processed
    }

    /// Appends one page worth of records
    pub fn append_page(&mut self, records: Vec<Record>) -> Result<(), SweepError> {
        self.ensure_running(CrawlStatus::Running)?;
        self.collected.extend(records);
        self.pages_processed += 1;
        Ok(())
    }

    /// Moves on to the next page
    pub fn advance(&mut self) -> Result<u32, SweepError> {
        self.ensure_running(CrawlStatus::Running)?;
        self.current_page += 1;
        Ok(self.current_page)
    }

    /// Transitions into a terminal status
    ///
    /// Fails if the crawl has already stopped or if `to` is not terminal.
    pub fn stop(&mut self, to: CrawlStatus) -> Result<(), SweepError> {
        self.ensure_running(to)?;
        if !to.is_terminal() {
            return Err(SweepError::InvalidTransition {
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }

    /// Consumes the state, returning the collected records
    pub fn into_records(self) -> Vec<Record> {
        self.collected
    }

    fn ensure_running(&self, to: CrawlStatus) -> Result<(), SweepError> {
        if self.status.is_terminal() {
            return Err(SweepError::InvalidTransition {
                from: self.status,
                to,
            });
        }
        Ok(())
    }
}
