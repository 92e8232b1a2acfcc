//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small paginated catalog and run the
//! full fetch, extract and paginate cycle over HTTP.

use crate::common::{catalog_page, create_test_config, item, mount_page, mount_status, Item};
use catalog_sweep::config::Config;
use catalog_sweep::crawler::{crawl, CrawlMode, FetchError};
use catalog_sweep::events::{CrawlEvent, RecordingSink};
use catalog_sweep::CrawlStatus;
use std::num::NonZeroU32;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn nz(n: u32) -> NonZeroU32 {
    NonZeroU32::new(n).unwrap()
}

async fn run(config: &Config, mode: CrawlMode) -> (catalog_sweep::CrawlOutcome, RecordingSink) {
    let events = RecordingSink::new();
    let outcome = crawl(config, mode, Arc::new(events.clone()))
        .await
        .expect("Crawl failed to start");
    (outcome, events)
}

#[tokio::test]
async fn test_full_crawl_follows_next_links() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        1,
        catalog_page(
            &[
                item("A Light in the Attic", "£51.77", "In stock"),
                item("Tipping the Velvet", "£53.74", "In stock"),
            ],
            true,
        ),
    )
    .await;
    mount_page(
        &mock_server,
        2,
        catalog_page(&[item("Soumission", "£50.10", "Out of stock")], true),
    )
    .await;
    mount_page(
        &mock_server,
        3,
        catalog_page(&[item("Sharp Objects", "£47.82", "In stock")], false),
    )
    .await;

    let config = create_test_config(&mock_server);
    let (outcome, events) = run(&config, CrawlMode::All).await;

    assert_eq!(outcome.status, CrawlStatus::StoppedNoNext);
    assert_eq!(outcome.pages_processed, 3);
    assert_eq!(outcome.last_page, 3);
    assert!(outcome.failure.is_none());

    let titles: Vec<_> = outcome.records.iter().map(|r| r.title()).collect();
    assert_eq!(
        titles,
        vec![
            "A Light in the Attic",
            "Tipping the Velvet",
            "Soumission",
            "Sharp Objects"
        ]
    );

    let extracted: usize = events
        .events()
        .iter()
        .filter_map(|e| match e {
            CrawlEvent::PageExtracted { records, .. } => Some(*records),
            _ => None,
        })
        .sum();
    assert_eq!(extracted, outcome.records.len());
    assert_eq!(events.count(|e| matches!(e, CrawlEvent::FetcherClosed)), 1);
}

#[tokio::test]
async fn test_empty_page_stops_crawl() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        1,
        catalog_page(&[item("Only Book", "£10.00", "In stock")], true),
    )
    .await;
    mount_page(&mock_server, 2, catalog_page(&[], true)).await;

    let config = create_test_config(&mock_server);
    let (outcome, _events) = run(&config, CrawlMode::All).await;

    assert_eq!(outcome.status, CrawlStatus::StoppedEmpty);
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.pages_processed, 1);
    assert_eq!(outcome.last_page, 2);
}

#[tokio::test]
async fn test_server_error_keeps_earlier_records() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        1,
        catalog_page(
            &[
                item("First", "£1.00", "In stock"),
                item("Second", "£2.00", "In stock"),
            ],
            true,
        ),
    )
    .await;
    mount_status(&mock_server, 2, 500).await;

    let config = create_test_config(&mock_server);
    let (outcome, events) = run(&config, CrawlMode::All).await;

    assert_eq!(outcome.status, CrawlStatus::StoppedError);
    assert_eq!(outcome.records.len(), 2);
    assert!(matches!(
        outcome.failure,
        Some(FetchError::Status { status: 500, .. })
    ));
    assert_eq!(
        events.count(|e| matches!(e, CrawlEvent::FetchFailed { page: 2, .. })),
        1
    );
}

#[tokio::test]
async fn test_missing_items_container_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html><body>Loading</body></html>"),
        )
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server);
    let (outcome, _events) = run(&config, CrawlMode::All).await;

    assert_eq!(outcome.status, CrawlStatus::StoppedError);
    assert!(outcome.records.is_empty());
    assert!(matches!(outcome.failure, Some(FetchError::NotReady { .. })));

    // The page was polled again before giving up
    let requests = mock_server.received_requests().await.unwrap_or_default();
    assert!(requests.len() > 1);
}

#[tokio::test]
async fn test_first_pages_stops_at_limit() {
    let mock_server = MockServer::start().await;

    for page in 1..=3 {
        mount_page(
            &mock_server,
            page,
            catalog_page(&[item("Book", "£5.00", "In stock")], true),
        )
        .await;
    }

    let config = create_test_config(&mock_server);
    let (outcome, _events) = run(&config, CrawlMode::FirstPages(nz(2))).await;

    assert_eq!(outcome.status, CrawlStatus::StoppedLimit);
    assert_eq!(outcome.pages_processed, 2);
    assert_eq!(outcome.records.len(), 2);

    let requests = mock_server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn test_single_page_skips_broken_items() {
    let mock_server = MockServer::start().await;

    let items = [
        item("One", "£1.00", "In stock"),
        item("Two", "£2.00", "In stock"),
        Item {
            title: "No Price",
            price: None,
            availability: "In stock",
        },
        item("Four", "£4.00", "Out of stock"),
    ];
    mount_page(&mock_server, 4, catalog_page(&items, true)).await;

    let config = create_test_config(&mock_server);
    let (outcome, events) = run(&config, CrawlMode::SinglePage(nz(4))).await;

    assert_eq!(outcome.status, CrawlStatus::StoppedLimit);
    assert_eq!(outcome.last_page, 4);
    assert_eq!(outcome.records.len(), 3);
    assert!(outcome.records.iter().all(|r| r.title() != "No Price"));
    assert_eq!(
        events.count(|e| matches!(e, CrawlEvent::ItemSkipped { page: 4, index: 2, .. })),
        1
    );
}

#[tokio::test]
async fn test_politeness_delay_between_pages() {
    let mock_server = MockServer::start().await;

    for page in 1..=3 {
        mount_page(
            &mock_server,
            page,
            catalog_page(&[item("Book", "£5.00", "In stock")], page < 3),
        )
        .await;
    }

    let mut config = create_test_config(&mock_server);
    config.crawler.politeness_delay = 200;

    let started = std::time::Instant::now();
    let (outcome, _events) = run(&config, CrawlMode::All).await;
    let elapsed = started.elapsed();

    assert_eq!(outcome.status, CrawlStatus::StoppedNoNext);
    assert_eq!(outcome.pages_processed, 3);
    // Two pauses: after page 1 and after page 2, none after the last page
    assert!(elapsed >= std::time::Duration::from_millis(400), "{:?}", elapsed);
}
