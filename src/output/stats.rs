//! Summary statistics over a finished crawl
//!
//! This module computes record counts, timing and the average price of a
//! record set, and formats them for display.

use crate::record::Record;
use std::fmt::Write;
use std::time::Instant;

/// Number of sample records shown in a report
const SAMPLE_SIZE: usize = 3;

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq)]
pub struct Statistics {
    /// Total number of records
    pub total: usize,

    /// Records whose availability contains "in stock" (any case)
    pub in_stock: usize,

    /// All other records
    pub out_of_stock: usize,

    /// Wall-clock duration of the crawl
    pub duration_seconds: f64,

    /// Mean price; unparseable prices count as 0.0
    pub average_price: f64,
}

impl Statistics {
    /// Throughput of the crawl, 0.0 when no time elapsed
    pub fn records_per_second(&self) -> f64 {
        if self.duration_seconds > 0.0 {
            self.total as f64 / self.duration_seconds
        } else {
            0.0
        }
    }
}

/// Computes statistics for `records` collected between `start` and `end`
///
/// The in-stock rule is the same predicate the export partitions use, so the
/// counts here always match the partition files.
pub fn summarize(records: &[Record], start: Instant, end: Instant) -> Statistics {
    let total = records.len();
    let in_stock = records.iter().filter(|r| r.is_in_stock()).count();

    let average_price = if total == 0 {
        0.0
    } else {
        let sum: f64 = records
            .iter()
            .map(|r| r.price_value().unwrap_or(0.0))
            .sum();
        (sum / total as f64).max(0.0)
    };

    Statistics {
        total,
        in_stock,
        out_of_stock: total - in_stock,
        duration_seconds: end.saturating_duration_since(start).as_secs_f64(),
        average_price,
    }
}

/// Formats statistics and a few sample records as a text report
pub fn format_statistics(stats: &Statistics, records: &[Record]) -> String {
    let mut report = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(report, "=== Scraping Results ===");
    let _ = writeln!(report, "Total books scraped: {}", stats.total);
    let _ = writeln!(report, "Time taken: {:.2} seconds", stats.duration_seconds);
    let _ = writeln!(report, "Books per second: {:.2}", stats.records_per_second());
    let _ = writeln!(report, "In stock: {}", stats.in_stock);
    let _ = writeln!(report, "Out of stock: {}", stats.out_of_stock);
    let _ = writeln!(report, "Average price: £{:.2}", stats.average_price);

    if !records.is_empty() {
        let _ = writeln!(report);
        let _ = writeln!(report, "=== Sample Books ===");
        for record in records.iter().take(SAMPLE_SIZE) {
            let _ = writeln!(report, "{}", record);
        }
        if records.len() > SAMPLE_SIZE {
            let _ = writeln!(
                report,
                "... and {} more books",
                records.len() - SAMPLE_SIZE
            );
        }
    }

    report
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &Statistics, records: &[Record]) {
    println!();
    print!("{}", format_statistics(stats, records));
}
