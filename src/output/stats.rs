//! Crawl statistics
//!
//! Summarizes a finished crawl for the terminal.

use crate::crawler::{CrawlOutcome, Termination};
use std::collections::BTreeMap;

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Pages fetched (including absent ones)
    pub pages_visited: usize,

    /// Records extracted
    pub listings: usize,

    /// Listing items dropped on extraction errors
    pub items_skipped: usize,

    /// Distinct `net_id` values among the records
    pub unique_listings: usize,

    /// How often each key detail occurred across all records
    pub detail_counts: BTreeMap<String, usize>,

    /// How the crawl ended
    pub termination: Termination,
}

impl CrawlStatistics {
    /// Computes statistics from a crawl outcome
    pub fn from_outcome(outcome: &CrawlOutcome) -> Self {
        let mut detail_counts = BTreeMap::new();
        for record in &outcome.records {
            for key in record.details.keys() {
                *detail_counts.entry(key.clone()).or_insert(0) += 1;
            }
        }

        let mut ids: Vec<&str> = outcome.records.iter().map(|r| r.net_id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();

        Self {
            pages_visited: outcome.pages_visited,
            listings: outcome.records.len(),
            items_skipped: outcome.items_skipped,
            unique_listings: ids.len(),
            detail_counts,
            termination: outcome.termination,
        }
    }
}

/// Prints statistics to stderr in a formatted manner
///
/// Stdout is left alone since it may carry the JSON export.
pub fn print_statistics(stats: &CrawlStatistics) {
    eprintln!("=== Crawl Statistics ===\n");

    eprintln!("Overview:");
    eprintln!("  Pages visited: {}", stats.pages_visited);
    eprintln!("  Listings extracted: {}", stats.listings);
    eprintln!("  Unique listings: {}", stats.unique_listings);
    eprintln!("  Listings skipped: {}", stats.items_skipped);
    eprintln!("  Termination: {:?}", stats.termination);
    eprintln!();

    if !stats.detail_counts.is_empty() {
        eprintln!("Key Details:");
        let mut counts: Vec<_> = stats.detail_counts.iter().collect();
        counts.sort_by(|a, b| b.1.cmp(a.1));

        for (key, count) in counts {
            let percentage = if stats.listings > 0 {
                (*count as f64 / stats.listings as f64) * 100.0
            } else {
                0.0
            };
            eprintln!("  {}: {} ({:.1}%)", key, count, percentage);
        }
        eprintln!();
    }
}
