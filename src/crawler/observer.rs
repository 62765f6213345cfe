//! Crawl observability sink
//!
//! The crawl loop never configures logging itself. It reports what happens
//! through a `CrawlObserver` handed to it by the caller; `TracingObserver` is
//! the default and forwards events to `tracing`.

use crate::crawler::coordinator::{CrawlOutcome, CrawlState};
use crate::crawler::fetcher::AbsentReason;
use crate::ExtractionError;

/// Receives crawl loop events
///
/// All methods default to doing nothing.
pub trait CrawlObserver {
    /// A page could not be fetched and is processed as an empty document
    fn page_absent(&self, _state: &CrawlState, _reason: &AbsentReason) {}

    /// One listing item on the current page failed extraction and was skipped
    fn item_skipped(&self, _state: &CrawlState, _position: usize, _error: &ExtractionError) {}

    /// The current page has been fully extracted
    fn page_processed(&self, _state: &CrawlState, _extracted: usize, _skipped: usize) {}

    /// Neither an enabled nor a disabled next-page link was found
    fn pagination_missing(&self, _state: &CrawlState) {}

    /// The loop reached a terminal state
    fn finished(&self, _outcome: &CrawlOutcome) {}
}

/// Observer that emits `tracing` events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl CrawlObserver for TracingObserver {
    fn page_absent(&self, state: &CrawlState, reason: &AbsentReason) {
        tracing::debug!(
            "Page {} ({}) unavailable: {}",
            state.page_index,
            state.current_url,
            reason
        );
    }

    fn item_skipped(&self, state: &CrawlState, position: usize, error: &ExtractionError) {
        tracing::warn!(
            "Skipping listing #{} on {}: {}",
            position,
            state.current_url,
            error
        );
    }

    fn page_processed(&self, state: &CrawlState, extracted: usize, skipped: usize) {
        tracing::info!(
            "Page {}/{}: {} listings extracted, {} skipped ({})",
            state.page_index + 1,
            state.pagination_limit,
            extracted,
            skipped,
            state.current_url
        );
    }

    fn pagination_missing(&self, state: &CrawlState) {
        tracing::error!(
            "No pagination control found on {}; page structure has changed",
            state.current_url
        );
    }

    fn finished(&self, outcome: &CrawlOutcome) {
        tracing::info!(
            "Crawl finished ({:?}): {} pages, {} listings",
            outcome.termination,
            outcome.pages_visited,
            outcome.records.len()
        );
    }
}

impl<T: CrawlObserver + ?Sized> CrawlObserver for &T {
    fn page_absent(&self, state: &CrawlState, reason: &AbsentReason) {
        (**self).page_absent(state, reason)
    }

    fn item_skipped(&self, state: &CrawlState, position: usize, error: &ExtractionError) {
        (**self).item_skipped(state, position, error)
    }

    fn page_processed(&self, state: &CrawlState, extracted: usize, skipped: usize) {
        (**self).page_processed(state, extracted, skipped)
    }

    fn pagination_missing(&self, state: &CrawlState) {
        (**self).pagination_missing(state)
    }

    fn finished(&self, outcome: &CrawlOutcome) {
        (**self).finished(outcome)
    }
}
