//! Shared fixtures for the integration tests

use catalog_sweep::config::Config;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// One catalog item as rendered by the mock catalog
pub struct Item<'a> {
    pub title: &'a str,
    pub price: Option<&'a str>,
    pub availability: &'a str,
}

pub fn item<'a>(title: &'a str, price: &'a str, availability: &'a str) -> Item<'a> {
    Item {
        title,
        price: Some(price),
        availability,
    }
}

/// Creates a test configuration pointing at the mock server
///
/// The politeness delay is disabled and the ready wait kept short.
pub fn create_test_config(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.site.base_url = format!("{}/", server.uri());
    config.site.page_path_template = "catalogue/page-{page}.html".to_string();
    config.crawler.politeness_delay = 0;
    config.crawler.ready_timeout = 300;
    config.crawler.ready_poll_interval = 50;
    config.crawler.request_timeout = 5_000;
    config
}

/// Renders a catalog page in the books.toscrape.com layout
pub fn catalog_page(items: &[Item<'_>], has_next: bool) -> String {
    let mut html = String::from("<html><body><section><ol class=\"row\">");

    for item in items {
        html.push_str("<li><article class=\"product_pod\">");
        html.push_str(&format!(
            "<h3><a href=\"#\" title=\"{}\">{}</a></h3>",
            item.title.replace('"', "&quot;"),
            item.title
        ));
        if let Some(price) = item.price {
            html.push_str(&format!("<p class=\"price_color\">{}</p>", price));
        }
        html.push_str(&format!(
            "<p class=\"instock availability\">\n    {}\n</p>",
            item.availability
        ));
        html.push_str("</article></li>");
    }

    html.push_str("</ol>");
    if has_next {
        html.push_str("<ul class=\"pager\"><li class=\"next\"><a href=\"next\">next</a></li></ul>");
    }
    html.push_str("</section></body></html>");
    html
}

/// Path of catalog page `page` on the mock server
pub fn page_path(page: u32) -> String {
    if page <= 1 {
        "/".to_string()
    } else {
        format!("/catalogue/page-{}.html", page)
    }
}

/// Serves `body` as catalog page `page`
pub async fn mount_page(server: &MockServer, page: u32, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path(page)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Answers catalog page `page` with a bare status code
pub async fn mount_status(server: &MockServer, page: u32, status: u16) {
    Mock::given(method("GET"))
        .and(path(page_path(page)))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}
