//! Record export pipeline
//!
//! Turns collected records into CSV files:
//! - one main file with every record, in collection order
//! - one file per non-empty availability category
//! - appending to an existing file without repeating the header
//!
//! Every field is cleaned (trimmed, whitespace runs collapsed) before it is
//! written, and each call stamps all of its rows with a single export time.

use crate::config::OutputConfig;
use crate::events::{CrawlEvent, EventSink};
use crate::output::csv_output::CsvSink;
use crate::output::traits::{ExportError, ExportResult, TabularSink};
use crate::record::{is_in_stock, Record};
use chrono::{DateTime, Local};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Column header of every export file
pub const CSV_HEADER: [&str; 4] = ["Title", "Price", "Availability", "Scraped_At"];

/// Which part of a record set a file holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportKind {
    /// Every record
    Main,
    /// Records whose availability contains "in stock"
    InStock,
    /// All remaining records
    OutOfStock,
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Main => "main",
            Self::InStock => "in_stock",
            Self::OutOfStock => "out_of_stock",
        };
        write!(f, "{}", name)
    }
}

/// Description of a written export file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub kind: ExportKind,
    pub path: PathBuf,
    pub rows: usize,
}

/// Writes record sets through a tabular sink
pub struct Exporter<S: TabularSink = CsvSink> {
    sink: S,
    settings: OutputConfig,
    events: Arc<dyn EventSink>,
}

impl Exporter<CsvSink> {
    /// Creates an exporter writing CSV files
    pub fn new(settings: OutputConfig, events: Arc<dyn EventSink>) -> Self {
        Self::with_sink(CsvSink::new(), settings, events)
    }
}

impl<S: TabularSink> Exporter<S> {
    pub fn with_sink(sink: S, settings: OutputConfig, events: Arc<dyn EventSink>) -> Self {
        Self {
            sink,
            settings,
            events,
        }
    }

    /// Writes every record to one file
    ///
    /// A non-empty `filename` is used as given; otherwise a name is generated
    /// from the default prefix and the current time.
    pub fn write_records(
        &mut self,
        records: &[Record],
        filename: Option<&str>,
    ) -> ExportResult<ExportedFile> {
        let now = Local::now();
        self.write_main(records, filename, now)
    }

    /// Appends records to an existing file, without a header
    pub fn append_records(
        &mut self,
        records: &[Record],
        path: &Path,
    ) -> ExportResult<ExportedFile> {
        let now = Local::now();
        let path = self.resolve(path);
        self.write_file(ExportKind::Main, &path, records, now, true)?;

        self.events.emit(CrawlEvent::ExportAppended {
            path: path.clone(),
            rows: records.len(),
        });

        Ok(ExportedFile {
            kind: ExportKind::Main,
            path,
            rows: records.len(),
        })
    }

    /// Writes one file per non-empty availability category
    pub fn write_by_availability(
        &mut self,
        records: &[Record],
    ) -> ExportResult<Vec<ExportedFile>> {
        let now = Local::now();
        self.write_partitions(records, now)
    }

    /// Writes the main file followed by the category files
    ///
    /// All files of one call share the same export time. On failure, files
    /// written before the failing one are left in place.
    pub fn export(
        &mut self,
        records: &[Record],
        filename: Option<&str>,
    ) -> ExportResult<Vec<ExportedFile>> {
        let now = Local::now();

        let mut written = vec![self.write_main(records, filename, now)?];
        written.extend(self.write_partitions(records, now)?);
        Ok(written)
    }

    fn write_main(
        &mut self,
        records: &[Record],
        filename: Option<&str>,
        now: DateTime<Local>,
    ) -> ExportResult<ExportedFile> {
        let name = match filename {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => default_filename(&self.settings.default_prefix, now),
        };
        let path = self.resolve(Path::new(&name));

        self.write_new(ExportKind::Main, path, records, now)
    }

    fn write_partitions(
        &mut self,
        records: &[Record],
        now: DateTime<Local>,
    ) -> ExportResult<Vec<ExportedFile>> {
        let (in_stock, out_of_stock) = partition_by_availability(records);
        let mut written = Vec::new();

        for (kind, prefix, part) in [
            (
                ExportKind::InStock,
                self.settings.in_stock_prefix.clone(),
                in_stock,
            ),
            (
                ExportKind::OutOfStock,
                self.settings.out_of_stock_prefix.clone(),
                out_of_stock,
            ),
        ] {
            if part.is_empty() {
                continue;
            }
            let path = self.resolve(Path::new(&partition_filename(&prefix, now)));
            written.push(self.write_new(kind, path, &part, now)?);
        }

        Ok(written)
    }

    fn write_new(
        &mut self,
        kind: ExportKind,
        path: PathBuf,
        records: &[Record],
        now: DateTime<Local>,
    ) -> ExportResult<ExportedFile> {
        self.write_file(kind, &path, records, now, false)?;

        self.events.emit(CrawlEvent::ExportWritten {
            kind,
            path: path.clone(),
            rows: records.len(),
        });

        Ok(ExportedFile {
            kind,
            path,
            rows: records.len(),
        })
    }

    fn write_file(
        &mut self,
        kind: ExportKind,
        path: &Path,
        records: &[Record],
        now: DateTime<Local>,
        append: bool,
    ) -> ExportResult<()> {
        let timestamp = format_timestamp(now);
        let rows: Vec<Vec<String>> = records.iter().map(|r| to_row(r, &timestamp)).collect();

        self.sink
            .write_rows(path, &CSV_HEADER, &rows, append)
            .map_err(|source| {
                let error = ExportError {
                    path: path.to_path_buf(),
                    rows: rows.len(),
                    source,
                };
                tracing::debug!("{} export failed", kind);
                self.events
                    .emit(CrawlEvent::export_failed(path.to_path_buf(), &error));
                error
            })
    }

    /// Places relative names under the output directory
    fn resolve(&self, name: &Path) -> PathBuf {
        let directory = &self.settings.directory;
        if name.is_absolute() || directory.as_os_str().is_empty() || directory == Path::new(".") {
            name.to_path_buf()
        } else {
            directory.join(name)
        }
    }
}

/// Splits records into (in stock, out of stock), keeping their order
pub fn partition_by_availability(records: &[Record]) -> (Vec<Record>, Vec<Record>) {
    records
        .iter()
        .cloned()
        .partition(|r| is_in_stock(r.availability()))
}

/// Trims a field and collapses internal whitespace runs to one space
///
/// A missing field becomes an empty string.
pub fn clean_text(text: Option<&str>) -> String {
    match text {
        Some(text) => text.split_whitespace().collect::<Vec<_>>().join(" "),
        None => String::new(),
    }
}

fn to_row(record: &Record, timestamp: &str) -> Vec<String> {
    vec![
        clean_text(Some(record.title())),
        clean_text(Some(record.price())),
        clean_text(Some(record.availability())),
        timestamp.to_string(),
    ]
}

/// Value of the Scraped_At column
fn format_timestamp(now: DateTime<Local>) -> String {
    now.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Name of a main export without a caller-supplied name
fn default_filename(prefix: &str, now: DateTime<Local>) -> String {
    format!("{}_{}.csv", prefix, now.format("%Y-%m-%d_%H-%M-%S"))
}

/// Name of a category export
fn partition_filename(prefix: &str, now: DateTime<Local>) -> String {
    format!("{}_{}.csv", prefix, now.format("%Y_%m_%d_%H_%M_%S"))
}
