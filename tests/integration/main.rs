//! End-to-end tests against mock HTTP catalogs

mod common;
mod crawl_tests;
mod export_tests;
