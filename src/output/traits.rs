//! Output sink traits and error types
//!
//! This module defines the interface export files are written through and
//! the errors an export can fail with.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised by a tabular sink
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// An export that could not be completed
///
/// Rows written before the failure stay in the file.
#[derive(Debug, Error)]
#[error("Failed to export {rows} records to {}: {source}", .path.display())]
pub struct ExportError {
    pub path: PathBuf,
    pub rows: usize,
    #[source]
    pub source: SinkError,
}

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;

/// Destination for rows of text
pub trait TabularSink {
    /// Writes `rows` to `path`
    ///
    /// With `append` set, rows are added to the end of an existing file and
    /// the header is only written if the file is empty. Otherwise the file
    /// is replaced and starts with the header.
    fn write_rows(
        &mut self,
        path: &Path,
        header: &[&str],
        rows: &[Vec<String>],
        append: bool,
    ) -> Result<(), SinkError>;
}
