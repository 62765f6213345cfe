//! Crawler module for listing page fetching and extraction
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a browser user agent
//! - A narrow markup abstraction over parsed HTML
//! - Per-listing field extraction
//! - The pagination-driven crawl loop

mod coordinator;
mod extractor;
mod fetcher;
pub mod markup;
mod observer;

pub use coordinator::{
    next_page_url, scan_html, scan_node, CrawlOutcome, CrawlSettings, CrawlState, Crawler,
    PageScan, Pagination, Termination, DEFAULT_BASE_ORIGIN,
};
pub use extractor::{extract_item, normalize_detail_key, LISTING_ITEM};
pub use fetcher::{build_http_client, fetch_url, AbsentReason, FetchResult, HttpFetcher, PageFetcher};
pub use observer::{CrawlObserver, TracingObserver};

use crate::config::Config;
use crate::CrawlerError;

/// Runs a complete crawl operation over HTTP
///
/// Builds the HTTP fetcher from the configured user agent and drives the
/// crawl loop from the configured start URL.
///
/// # Returns
///
/// * `Ok(CrawlOutcome)` - The crawl reached a terminal state
/// * `Err(CrawlerError)` - The HTTP client could not be built
pub async fn crawl(config: &Config) -> Result<CrawlOutcome, CrawlerError> {
    let fetcher = HttpFetcher::new(&config.user_agent)?;
    let crawler = Crawler::new(fetcher, config.settings());
    Ok(crawler.run().await)
}
