//! Output module for crawl statistics and CSV exports
//!
//! This module handles:
//! - Computing summary statistics over collected records
//! - Partitioning records by availability
//! - Writing main, category and appended CSV files

mod csv_output;
mod export;
pub mod stats;
mod traits;

pub use csv_output::CsvSink;
pub use export::{
    clean_text, partition_by_availability, ExportKind, ExportedFile, Exporter, CSV_HEADER,
};
pub use stats::{format_statistics, print_statistics, summarize, Statistics};
pub use traits::{ExportError, ExportResult, SinkError, TabularSink};
