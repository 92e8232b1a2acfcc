//! Diagnostics events emitted by the crawler and the exporter
//!
//! Components never write to the console directly. They report what happens
//! through an [`EventSink`], which the caller chooses: the binary logs through
//! `tracing`, tests record events and assert on them.

mod sinks;
mod types;

pub use sinks::{EventSink, FanoutSink, NullSink, RecordingSink, TracingSink};
pub use types::CrawlEvent;
