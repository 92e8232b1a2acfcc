//! Integration tests for the CSV export pipeline
//!
//! Records are crawled from a mock catalog, written to a temporary directory
//! and read back with the csv crate.

use crate::common::{catalog_page, create_test_config, item, mount_page};
use catalog_sweep::crawler::{crawl, CrawlMode};
use catalog_sweep::events::{CrawlEvent, NullSink, RecordingSink};
use catalog_sweep::output::{clean_text, ExportKind, Exporter, CSV_HEADER};
use catalog_sweep::Record;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::MockServer;

fn read_csv(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).expect("Failed to open export");
    let header = reader
        .headers()
        .expect("Missing header")
        .iter()
        .map(String::from)
        .collect();
    let rows = reader
        .records()
        .map(|row| row.expect("Bad row").iter().map(String::from).collect())
        .collect();
    (header, rows)
}

fn output_config(dir: &TempDir) -> catalog_sweep::config::OutputConfig {
    catalog_sweep::config::OutputConfig {
        directory: dir.path().to_path_buf(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_crawl_then_export_round_trip() {
    let mock_server = MockServer::start().await;
    mount_page(
        &mock_server,
        1,
        catalog_page(
            &[
                item("Tea, Earl Grey", "£12.50", "In stock"),
                item("  The  \"Quoted\"   Book ", "£7.00", "Out of stock"),
                item("Plain", "£3.25", "In stock (4 available)"),
            ],
            false,
        ),
    )
    .await;

    let config = create_test_config(&mock_server);
    let outcome = crawl(&config, CrawlMode::All, Arc::new(NullSink))
        .await
        .unwrap();
    assert_eq!(outcome.records.len(), 3);

    let dir = TempDir::new().unwrap();
    let events = RecordingSink::new();
    let mut exporter = Exporter::new(output_config(&dir), Arc::new(events.clone()));

    let written = exporter.export(&outcome.records, Some("books.csv")).unwrap();
    assert_eq!(written.len(), 3);

    let (header, rows) = read_csv(&written[0].path);
    assert_eq!(header, CSV_HEADER);
    assert_eq!(rows.len(), outcome.records.len());
    for (row, record) in rows.iter().zip(&outcome.records) {
        assert_eq!(row[0], clean_text(Some(record.title())));
        assert_eq!(row[1], clean_text(Some(record.price())));
        assert_eq!(row[2], clean_text(Some(record.availability())));
    }
    assert_eq!(rows[0][0], "Tea, Earl Grey");
    assert_eq!(rows[1][0], "The \"Quoted\" Book");
    assert_eq!(rows[1][2], "Out of stock");

    assert_eq!(
        events.count(|e| matches!(e, CrawlEvent::ExportWritten { .. })),
        3
    );
}

#[test]
fn test_partitions_cover_every_record() {
    let dir = TempDir::new().unwrap();
    let records = vec![
        Record::new("A", "£1.00", "In stock"),
        Record::new("B", "£2.00", "Out of stock"),
        Record::new("C", "£3.00", "in STOCK (2 available)"),
        Record::new("D", "£4.00", "Unavailable"),
    ];
    let mut exporter = Exporter::new(output_config(&dir), Arc::new(NullSink));

    let written = exporter.write_by_availability(&records).unwrap();
    assert_eq!(written.len(), 2);

    let mut total = 0;
    for file in &written {
        let (_, rows) = read_csv(&file.path);
        total += rows.len();

        let expect_in_stock = file.kind == ExportKind::InStock;
        for row in &rows {
            let in_stock = row[2].to_lowercase().contains("in stock");
            assert_eq!(in_stock, expect_in_stock, "row {:?} in {}", row, file.kind);
        }
    }
    assert_eq!(total, records.len());
}

#[test]
fn test_append_adds_rows_without_header() {
    let dir = TempDir::new().unwrap();
    let mut exporter = Exporter::new(output_config(&dir), Arc::new(NullSink));

    let first = exporter
        .write_records(&[Record::new("First", "£1.00", "In stock")], Some("books.csv"))
        .unwrap();
    exporter
        .append_records(
            &[
                Record::new("Second", "£2.00", "In stock"),
                Record::new("Third", "£3.00", "Out of stock"),
            ],
            Path::new("books.csv"),
        )
        .unwrap();

    let (header, rows) = read_csv(&first.path);
    assert_eq!(header, CSV_HEADER);
    let titles: Vec<_> = rows.iter().map(|row| row[0].as_str()).collect();
    assert_eq!(titles, vec!["First", "Second", "Third"]);
}

#[test]
fn test_unwritable_directory_reports_error() {
    let dir = TempDir::new().unwrap();
    // A regular file where the output directory should be
    let blocker = dir.path().join("blocked");
    std::fs::write(&blocker, "not a directory").unwrap();

    let settings = catalog_sweep::config::OutputConfig {
        directory: blocker,
        ..Default::default()
    };
    let events = RecordingSink::new();
    let mut exporter = Exporter::new(settings, Arc::new(events.clone()));

    let records = [Record::new("A", "£1.00", "In stock")];
    let result = exporter.write_records(&records, Some("books.csv"));

    assert!(result.is_err());
    assert_eq!(events.count(CrawlEvent::is_failure), 1);
}
