//! Event sink implementations

use crate::events::CrawlEvent;
use std::sync::{Arc, Mutex};

/// Receiver of crawl and export events
///
/// Implementations must not fail or block for long; emitting an event never
/// changes the outcome of the operation that produced it.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: CrawlEvent);
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: CrawlEvent) {}
}

/// Renders events as `tracing` records
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: CrawlEvent) {
        match event {
            CrawlEvent::CrawlStarted { mode, start_page } => {
                tracing::info!("Starting {} crawl at page {}", mode, start_page);
            }
            CrawlEvent::PageFetched { page, url } => {
                tracing::debug!("Fetched page {}: {}", page, url);
            }
            CrawlEvent::PageExtracted { page, records } => {
                tracing::info!("Extracted {} records from page {}", records, page);
            }
            CrawlEvent::ItemSkipped { page, index, field } => {
                tracing::warn!(
                    "Skipping item {} on page {}: missing {} field",
                    index,
                    page,
                    field
                );
            }
            CrawlEvent::FetchFailed { page, error } => {
                tracing::error!("Error processing page {}: {}", page, error);
            }
            CrawlEvent::CrawlStopped {
                reason,
                last_page,
                pages_processed,
                total_records,
                elapsed,
            } => {
                tracing::info!(
                    "Crawl stopped ({}: {}) at page {}: {} records from {} pages in {:?}",
                    reason,
                    reason.describe(),
                    last_page,
                    total_records,
                    pages_processed,
                    elapsed
                );
            }
            CrawlEvent::FetcherClosed => {
                tracing::debug!("Page fetcher closed");
            }
            CrawlEvent::ExportWritten { kind, path, rows } => {
                tracing::info!("Wrote {} {} rows to {}", rows, kind, path.display());
            }
            CrawlEvent::ExportAppended { path, rows } => {
                tracing::info!("Appended {} rows to {}", rows, path.display());
            }
            CrawlEvent::ExportFailed { path, error } => {
                tracing::error!("Failed to write {}: {}", path.display(), error);
            }
        }
    }
}

/// Keeps every event in memory, in emission order
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<CrawlEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events recorded so far
    pub fn events(&self) -> Vec<CrawlEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Number of recorded events matching `predicate`
    pub fn count(&self, predicate: impl Fn(&CrawlEvent) -> bool) -> usize {
        self.events().iter().filter(|e| predicate(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: CrawlEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

/// Forwards each event to several sinks
#[derive(Default, Clone)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn EventSink>>,
}

impl FanoutSink {
    pub fn new(sinks: Vec<Arc<dyn EventSink>>) -> Self {
        Self { sinks }
    }
}

impl EventSink for FanoutSink {
    fn emit(&self, event: CrawlEvent) {
        if let Some((last, rest)) = self.sinks.split_last() {
            for sink in rest {
                sink.emit(event.clone());
            }
            last.emit(event);
        }
    }
}
