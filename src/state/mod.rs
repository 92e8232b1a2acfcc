//! State module for tracking crawl progress
//!
//! This module provides the pagination state machine driven by the crawl
//! coordinator.
//!
//! # Components
//!
//! - `CrawlStatus`: Running, or the terminal stop reason of a crawl
//! - `CrawlState`: current page, collected records and status of one crawl

mod crawl_state;

// Re-export main types
pub use crawl_state::{CrawlState, CrawlStatus};
