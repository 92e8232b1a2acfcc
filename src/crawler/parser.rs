//! HTML document and selector handling for catalog pages
//!
//! This module wraps a fetched page in a queryable document and answers the
//! three questions the crawler asks of it:
//! - Which nodes are catalog items
//! - What text (or attribute) a field of an item holds
//! - Whether the page links to a next page

use crate::config::SelectorConfig;
use crate::ConfigError;
use scraper::{ElementRef, Html, Selector};
use std::fmt;

/// A record field read from an item node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Price,
    Availability,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Price => "price",
            Self::Availability => "availability",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A fetched catalog page, parsed and ready for querying
#[derive(Debug)]
pub struct PageDocument {
    page: u32,
    url: String,
    html: Html,
}

impl PageDocument {
    /// Parses `body` as the HTML of catalog page `page`
    pub fn parse(page: u32, url: impl Into<String>, body: &str) -> Self {
        Self {
            page,
            url: url.into(),
            html: Html::parse_document(body),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Returns true if at least one node matches `selector`
    pub fn contains(&self, selector: &Selector) -> bool {
        self.html.select(selector).next().is_some()
    }
}

/// How one field is read from an item
#[derive(Debug, Clone)]
struct FieldSelector {
    selector: Selector,
    attribute: Option<String>,
}

impl FieldSelector {
    fn read(&self, item: ElementRef<'_>) -> Option<String> {
        let node = item.select(&self.selector).next()?;

        match &self.attribute {
            Some(attribute) => node.value().attr(attribute).map(str::to_string),
            None => Some(node.text().collect()),
        }
    }
}

/// Compiled selectors for one catalog layout
#[derive(Debug, Clone)]
pub struct CatalogSelectors {
    item: Selector,
    title: FieldSelector,
    price: FieldSelector,
    availability: FieldSelector,
    next_page: Selector,
    ready: Option<Selector>,
}

impl CatalogSelectors {
    /// Compiles every selector in `config`
    ///
    /// # Returns
    ///
    /// * `Ok(CatalogSelectors)` - All selectors compiled
    /// * `Err(ConfigError::InvalidSelector)` - The first selector that failed
    pub fn from_config(config: &SelectorConfig) -> Result<Self, ConfigError> {
        let ready = match config.ready.trim() {
            "" => None,
            css => Some(compile_selector(css)?),
        };

        Ok(Self {
            item: compile_selector(&config.item)?,
            title: FieldSelector {
                selector: compile_selector(&config.title)?,
                attribute: config.title_attribute.clone(),
            },
            price: FieldSelector {
                selector: compile_selector(&config.price)?,
                attribute: None,
            },
            availability: FieldSelector {
                selector: compile_selector(&config.availability)?,
                attribute: None,
            },
            next_page: compile_selector(&config.next_page)?,
            ready,
        })
    }

    /// Item nodes on the page, in document order
    pub fn find_items<'a>(&self, document: &'a PageDocument) -> Vec<ElementRef<'a>> {
        document.html().select(&self.item).collect()
    }

    /// Reads one field of an item; None when the node or attribute is missing
    ///
    /// Text is returned exactly as it appears in the document.
    pub fn read_field(&self, item: ElementRef<'_>, field: Field) -> Option<String> {
        match field {
            Field::Title => self.title.read(item),
            Field::Price => self.price.read(item),
            Field::Availability => self.availability.read(item),
        }
    }

    /// Returns true if the page links to a next page
    pub fn has_next_page(&self, document: &PageDocument) -> bool {
        document.contains(&self.next_page)
    }

    /// Items container the fetcher waits for, if any
    pub fn ready_marker(&self) -> Option<&Selector> {
        self.ready.as_ref()
    }
}

/// Compiles a CSS selector, mapping failures to a configuration error
pub(crate) fn compile_selector(css: &str) -> Result<Selector, ConfigError> {
    Selector::parse(css).map_err(|e| ConfigError::InvalidSelector {
        selector: css.to_string(),
        message: e.to_string(),
    })
}
