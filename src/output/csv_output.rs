//! CSV file sink
//!
//! Writes rows as UTF-8 comma-separated files using the csv crate, which
//! quotes fields containing delimiters, quotes or line breaks.

use crate::output::traits::{SinkError, TabularSink};
use csv::WriterBuilder;
use std::fs::{self, OpenOptions};
use std::path::Path;

/// Tabular sink writing CSV files on the local filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvSink;

impl CsvSink {
    pub fn new() -> Self {
        Self
    }
}

impl TabularSink for CsvSink {
    fn write_rows(
        &mut self,
        path: &Path,
        header: &[&str],
        rows: &[Vec<String>],
        append: bool,
    ) -> Result<(), SinkError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = if append {
            OpenOptions::new().create(true).append(true).open(path)?
        } else {
            OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(path)?
        };
        let needs_header = !append || file.metadata()?.len() == 0;

        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);

        if needs_header {
            writer.write_record(header)?;
        }
        for row in rows {
            writer.write_record(row)?;
        }
        writer.flush()?;

        tracing::debug!(
            "Wrote {} rows to {} (append: {})",
            rows.len(),
            path.display(),
            append
        );

        Ok(())
    }
}
