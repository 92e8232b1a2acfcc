//! Record extraction from catalog pages

use crate::crawler::parser::{CatalogSelectors, Field, PageDocument};
use crate::events::{CrawlEvent, EventSink};
use crate::record::Record;
use chrono::Local;
use scraper::ElementRef;
use std::sync::Arc;

/// Turns catalog pages into records
///
/// An item whose title, price or availability cannot be read is dropped and
/// reported as `ItemSkipped`; the rest of the page is still extracted. A page
/// without item nodes yields an empty list, which the coordinator treats as
/// the end of the catalog.
pub struct FieldExtractor {
    selectors: CatalogSelectors,
    events: Arc<dyn EventSink>,
}

impl FieldExtractor {
    pub fn new(selectors: CatalogSelectors, events: Arc<dyn EventSink>) -> Self {
        Self { selectors, events }
    }

    /// Extracts one record per readable item, in document order
    pub fn extract(&self, document: &PageDocument) -> Vec<Record> {
        let items = self.selectors.find_items(document);
        let mut records = Vec::with_capacity(items.len());

        for (index, item) in items.into_iter().enumerate() {
            match self.read_record(item) {
                Ok(record) => records.push(record),
                Err(field) => {
                    self.events
                        .emit(CrawlEvent::item_skipped(document.page(), index, field));
                }
            }
        }

        records
    }

    /// Returns true if the page links to a next page
    pub fn has_next_page(&self, document: &PageDocument) -> bool {
        self.selectors.has_next_page(document)
    }

    /// Reads all fields of an item, or reports the first missing one
    fn read_record(&self, item: ElementRef<'_>) -> Result<Record, Field> {
        let read = |field| self.selectors.read_field(item, field).ok_or(field);

        let title = read(Field::Title)?;
        let price = read(Field::Price)?;
        let availability = read(Field::Availability)?;

        Ok(Record::with_timestamp(title, price, availability, Local::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SelectorConfig;
    use crate::events::RecordingSink;

    fn item(title: &str, price: Option<&str>, availability: &str) -> String {
        let price = price
            .map(|p| format!(r#"<p class="price_color">{}</p>"#, p))
            .unwrap_or_default();
        format!(
            r#"<article class="product_pod">
                <h3><a href="x.html" title="{}">{}</a></h3>
                <div class="product_price">{}
                    <p class="instock availability"><i class="icon-ok"></i> {} </p>
                </div>
            </article>"#,
            title, title, price, availability
        )
    }

    fn page(page: u32, items: &[String]) -> PageDocument {
        PageDocument::parse(
            page,
            format!("https://books.toscrape.com/catalogue/page-{}.html", page),
            &format!(
                r#"<html><body><section><ol class="row">{}</ol></section></body></html>"#,
                items.concat()
            ),
        )
    }

    fn extractor() -> (FieldExtractor, RecordingSink) {
        let sink = RecordingSink::new();
        let selectors = CatalogSelectors::from_config(&SelectorConfig::default()).unwrap();
        (FieldExtractor::new(selectors, Arc::new(sink.clone())), sink)
    }

    #[test]
    fn test_extracts_every_item() {
        let (extractor, sink) = extractor();
        let document = page(
            1,
            &[
                item("A Light in the Attic", Some("£51.77"), "In stock"),
                item("Tipping the Velvet", Some("£53.74"), "In stock"),
            ],
        );

        let records = extractor.extract(&document);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title(), "A Light in the Attic");
        assert_eq!(records[1].price(), "£53.74");
        assert!(records.iter().all(Record::is_in_stock));
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_broken_item_is_skipped() {
        let (extractor, sink) = extractor();
        let document = page(
            3,
            &[
                item("One", Some("£1.00"), "In stock"),
                item("Two", Some("£2.00"), "In stock"),
                item("Three", None, "In stock"),
                item("Four", Some("£4.00"), "Out of stock"),
                item("Five", Some("£5.00"), "In stock"),
            ],
        );

        let records = extractor.extract(&document);
        let titles: Vec<_> = records.iter().map(Record::title).collect();
        assert_eq!(titles, vec!["One", "Two", "Four", "Five"]);
        assert_eq!(
            sink.events(),
            vec![CrawlEvent::ItemSkipped {
                page: 3,
                index: 2,
                field: Field::Price
            }]
        );
    }

    #[test]
    fn test_page_without_items_is_empty() {
        let (extractor, sink) = extractor();
        let document =
            PageDocument::parse(51, "https://books.toscrape.com/", "<h1>Not found</h1>");

        assert!(extractor.extract(&document).is_empty());
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_text_is_not_cleaned() {
        let (extractor, _sink) = extractor();
        let document = page(1, &[item("Soumission", Some("£50.10"), "In stock")]);

        let records = extractor.extract(&document);
        assert_eq!(records[0].availability(), " In stock ");
    }

    #[test]
    fn test_extraction_is_repeatable() {
        let (extractor, _sink) = extractor();
        let document = page(
            1,
            &[
                item("Sharp Objects", Some("£47.82"), "In stock"),
                item("Sapiens", None, "In stock"),
                item("The Requiem Red", Some("£22.65"), "Out of stock"),
            ],
        );

        let first = extractor.extract(&document);
        let second = extractor.extract(&document);

        assert_eq!(first.len(), second.len());
        assert!(first.iter().zip(&second).all(|(a, b)| a.same_content(b)));
    }
}
