use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for Catalog-Sweep
///
/// Every table is optional; missing values fall back to settings for the
/// books.toscrape.com catalog.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub selectors: SelectorConfig,
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Catalog location and pagination scheme
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// URL of the first catalog page
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path of pages 2 and onwards, relative to `base_url`; `{page}` is replaced
    /// by the page number
    #[serde(rename = "page-path-template")]
    pub page_path_template: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://books.toscrape.com/".to_string(),
            page_path_template: "catalogue/page-{page}.html".to_string(),
        }
    }
}

/// CSS selectors used to read the catalog
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// One match per catalog item
    pub item: String,

    /// Title node, relative to an item
    pub title: String,

    /// Attribute holding the title; the node text is used when unset
    #[serde(rename = "title-attribute")]
    pub title_attribute: Option<String>,

    /// Price node, relative to an item
    pub price: String,

    /// Availability node, relative to an item
    pub availability: String,

    /// Link to the next page, anywhere on the page
    #[serde(rename = "next-page")]
    pub next_page: String,

    /// Items container waited for before a page counts as loaded; empty
    /// disables the wait
    pub ready: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            item: "article.product_pod".to_string(),
            title: "h3 a".to_string(),
            title_attribute: Some("title".to_string()),
            price: "p.price_color".to_string(),
            availability: "p.instock.availability".to_string(),
            next_page: "li.next a".to_string(),
            ready: "ol.row".to_string(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Pause between successive page fetches (milliseconds)
    #[serde(rename = "politeness-delay")]
    pub politeness_delay: u64,

    /// Longest wait for the items container to appear (milliseconds)
    #[serde(rename = "ready-timeout")]
    pub ready_timeout: u64,

    /// Interval between readiness checks (milliseconds)
    #[serde(rename = "ready-poll-interval")]
    pub ready_poll_interval: u64,

    /// Timeout of a single HTTP request (milliseconds)
    #[serde(rename = "request-timeout")]
    pub request_timeout: u64,
}

impl CrawlerConfig {
    pub fn politeness_delay(&self) -> Duration {
        Duration::from_millis(self.politeness_delay)
    }

    pub fn ready_timeout(&self) -> Duration {
        Duration::from_millis(self.ready_timeout)
    }

    pub fn ready_poll_interval(&self) -> Duration {
        Duration::from_millis(self.ready_poll_interval)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            politeness_delay: 1000,
            ready_timeout: 10_000,
            ready_poll_interval: 500,
            request_timeout: 30_000,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Format: CrawlerName/Version (+ContactURL; ContactEmail)
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "CatalogSweep".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/catalog-sweep".to_string(),
            contact_email: "crawler@example.com".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving export files with relative names
    pub directory: PathBuf,

    /// Prefix of generated main export names
    #[serde(rename = "default-prefix")]
    pub default_prefix: String,

    /// Prefix of the in-stock partition file
    #[serde(rename = "in-stock-prefix")]
    pub in_stock_prefix: String,

    /// Prefix of the out-of-stock partition file
    #[serde(rename = "out-of-stock-prefix")]
    pub out_of_stock_prefix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            default_prefix: "books_data".to_string(),
            in_stock_prefix: "books_in_stock".to_string(),
            out_of_stock_prefix: "books_out_of_stock".to_string(),
        }
    }
}
