//! Catalog record model
//!
//! A `Record` is one listed item as it appeared on a catalog page. Text is
//! kept exactly as extracted; cleaning happens at export time.

use chrono::{DateTime, Local};
use std::fmt;

/// Substring that marks an item as available, matched case-insensitively
const IN_STOCK_MARKER: &str = "in stock";

/// One extracted catalog item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    title: String,
    price: String,
    availability: String,
    scraped_at: DateTime<Local>,
}

impl Record {
    /// Creates a record stamped with the current local time
    pub fn new(
        title: impl Into<String>,
        price: impl Into<String>,
        availability: impl Into<String>,
    ) -> Self {
        Self::with_timestamp(title, price, availability, Local::now())
    }

    /// Creates a record with an explicit extraction timestamp
    pub fn with_timestamp(
        title: impl Into<String>,
        price: impl Into<String>,
        availability: impl Into<String>,
        scraped_at: DateTime<Local>,
    ) -> Self {
        Self {
            title: title.into(),
            price: price.into(),
            availability: availability.into(),
            scraped_at,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Raw, currency-prefixed price text
    pub fn price(&self) -> &str {
        &self.price
    }

    pub fn availability(&self) -> &str {
        &self.availability
    }

    pub fn scraped_at(&self) -> DateTime<Local> {
        self.scraped_at
    }

    /// Returns true if this record belongs to the in-stock category
    pub fn is_in_stock(&self) -> bool {
        is_in_stock(&self.availability)
    }

    /// Numeric price, if the price text can be parsed
    pub fn price_value(&self) -> Option<f64> {
        parse_price(&self.price)
    }

    /// Compares title, price and availability, ignoring the timestamp
    pub fn same_content(&self, other: &Record) -> bool {
        self.title == other.title
            && self.price == other.price
            && self.availability == other.availability
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Book{{title='{}', price='{}', availability='{}'}}",
            self.title,
            self.price,
            self.availability.trim()
        )
    }
}

/// Category predicate shared by the statistics and the export partitions
///
/// An availability text is in stock when it contains "in stock", ignoring case.
pub fn is_in_stock(availability: &str) -> bool {
    availability.to_lowercase().contains(IN_STOCK_MARKER)
}

/// Parses a currency-prefixed price such as `£51.77`
///
/// Leading and trailing characters that cannot be part of a decimal number
/// (currency symbols, mis-decoded bytes, whitespace) are stripped before
/// parsing. Returns None when the remainder is not a finite number.
pub fn parse_price(price: &str) -> Option<f64> {
    let numeric = price.trim_matches(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-'));

    numeric
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}
