//! Output module for crawl results
//!
//! This module handles:
//! - Exporting the extracted listings as JSON
//! - Summarizing a finished crawl

mod json;
pub mod stats;

pub use json::{export_records, write_records};
pub use stats::{print_statistics, CrawlStatistics};
