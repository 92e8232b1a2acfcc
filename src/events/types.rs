//! Event type definitions
//!
//! This module contains the events emitted while crawling and exporting.

use crate::crawler::{CrawlMode, Field};
use crate::output::ExportKind;
use crate::state::CrawlStatus;
use std::path::PathBuf;
use std::time::Duration;

/// Event types emitted during a crawl and its export
#[derive(Debug, Clone, PartialEq)]
pub enum CrawlEvent {
    /// Emitted once before the first page is fetched
    CrawlStarted { mode: CrawlMode, start_page: u32 },

    /// A page was fetched and its items container is present
    PageFetched { page: u32, url: String },

    /// Records were extracted from a page
    PageExtracted { page: u32, records: usize },

    /// One item on a page was dropped because a field could not be read
    ItemSkipped {
        page: u32,
        index: usize,
        field: Field,
    },

    /// A page fetch failed, which ends the crawl
    FetchFailed { page: u32, error: String },

    /// The crawl reached a terminal state
    CrawlStopped {
        reason: CrawlStatus,
        last_page: u32,
        pages_processed: u32,
        total_records: usize,
        elapsed: Duration,
    },

    /// The page fetcher released its resources
    FetcherClosed,

    /// A new export file was written
    ExportWritten {
        kind: ExportKind,
        path: PathBuf,
        rows: usize,
    },

    /// Rows were appended to an existing export file
    ExportAppended { path: PathBuf, rows: usize },

    /// Writing an export file failed
    ExportFailed { path: PathBuf, error: String },
}

/// Helper functions for creating common events
impl CrawlEvent {
    /// Create an `ItemSkipped` event
    #[must_use]
    pub fn item_skipped(page: u32, index: usize, field: Field) -> Self {
        Self::ItemSkipped { page, index, field }
    }

    /// Create a `FetchFailed` event from any displayable error
    #[must_use]
    pub fn fetch_failed(page: u32, error: &impl std::fmt::Display) -> Self {
        Self::FetchFailed {
            page,
            error: error.to_string(),
        }
    }

    /// Create an `ExportFailed` event from any displayable error
    #[must_use]
    pub fn export_failed(path: PathBuf, error: &impl std::fmt::Display) -> Self {
        Self::ExportFailed {
            path,
            error: error.to_string(),
        }
    }

    /// Returns true for events that describe a failure
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::ItemSkipped { .. } | Self::FetchFailed { .. } | Self::ExportFailed { .. }
        )
    }
}
