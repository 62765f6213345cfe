//! Crawler coordinator - main crawl loop
//!
//! The loop is a small state machine driven one page at a time:
//!
//! ```text
//! Fetching -> Extracting -> DecidingNext -> Fetching
//!                                        -> Done(Exhausted | LimitReached)
//!                                        -> ErrorHalt (PaginationMissing)
//! ```
//!
//! Everything is sequential: a page is fetched, parsed and fully extracted
//! before the next URL is computed.

use crate::crawler::extractor::{extract_item, LISTING_ITEM};
use crate::crawler::fetcher::{FetchResult, PageFetcher};
use crate::crawler::markup::{MarkupNode, Query};
use crate::crawler::observer::{CrawlObserver, TracingObserver};
use crate::listing::ListingRecord;
use crate::ExtractionError;
use scraper::Html;

/// Origin prepended to next-page links
pub const DEFAULT_BASE_ORIGIN: &str = "https://www.chileautos.cl";

const NEXT_LINK: Query = Query::exact_class("page-link next").tag("a").with_attr("href");
const DISABLED_NEXT_LINK: Query = Query::exact_class("page-link next disabled").tag("a");

/// Caller input for one crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlSettings {
    /// First results page to fetch
    pub start_url: String,

    /// Maximum number of pages to fetch
    pub pagination_limit: usize,

    /// Origin that next-page `href` values are appended to
    pub base_origin: String,
}

impl CrawlSettings {
    pub fn new(start_url: impl Into<String>, pagination_limit: usize) -> Self {
        Self {
            start_url: start_url.into(),
            pagination_limit,
            base_origin: DEFAULT_BASE_ORIGIN.to_string(),
        }
    }

    pub fn with_base_origin(mut self, base_origin: impl Into<String>) -> Self {
        self.base_origin = base_origin.into();
        self
    }
}

/// Mutable position of the crawl loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlState {
    /// URL of the page being processed
    pub current_url: String,

    /// 0-based index of the page being processed
    pub page_index: usize,

    /// Upper bound on pages visited
    pub pagination_limit: usize,
}

impl CrawlState {
    fn new(settings: &CrawlSettings) -> Self {
        Self {
            current_url: settings.start_url.clone(),
            page_index: 0,
            pagination_limit: settings.pagination_limit,
        }
    }

    /// True when the current page is the last one the limit allows to fetch
    fn limit_reached(&self) -> bool {
        self.page_index + 1 >= self.pagination_limit
    }

    fn advance(&mut self, next_url: String) {
        self.current_url = next_url;
        self.page_index += 1;
    }
}

/// How the crawl loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Termination {
    /// The last page carried a disabled next-page link
    Exhausted,

    /// `pagination_limit` pages were visited and the last one still linked onward
    LimitReached,

    /// No pagination control at all; the page structure no longer matches
    PaginationMissing,
}

impl Termination {
    /// Returns true if the crawl ended without a structural problem
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Exhausted | Self::LimitReached)
    }
}

/// Everything one crawl invocation produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlOutcome {
    /// Extracted records, in page order then document order
    pub records: Vec<ListingRecord>,

    /// Terminal state of the loop
    pub termination: Termination,

    /// Number of fetches performed
    pub pages_visited: usize,

    /// Listing items dropped because extraction failed
    pub items_skipped: usize,

    /// URL of the last page processed
    pub last_url: String,
}

/// Pagination control found on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pagination {
    /// Enabled next link with its raw `href`
    Next(String),

    /// Disabled next link: this is the last page
    Last,

    /// No next link of either kind
    Missing,
}

/// Result of scanning one results page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageScan {
    /// One entry per listing item, in document order
    pub items: Vec<Result<ListingRecord, ExtractionError>>,

    /// The page's next-link state
    pub pagination: Pagination,
}

/// Extracts every listing item and the pagination control below `root`
pub fn scan_node<N: MarkupNode>(root: &N) -> PageScan {
    let items = root
        .find_all(&LISTING_ITEM)
        .iter()
        .map(extract_item)
        .collect();

    let pagination = if let Some(href) = root
        .find_first(&NEXT_LINK)
        .and_then(|link| link.attr("href").map(str::to_string))
    {
        Pagination::Next(href)
    } else if root.find_first(&DISABLED_NEXT_LINK).is_some() {
        Pagination::Last
    } else {
        Pagination::Missing
    };

    PageScan { items, pagination }
}

/// Parses an HTML document and scans it
///
/// An empty string parses to an empty document, so absent pages go through
/// the same path.
pub fn scan_html(html: &str) -> PageScan {
    let document = Html::parse_document(html);
    scan_node(&document.root_element())
}

/// Builds the next page URL: origin and `href` concatenated verbatim
pub fn next_page_url(base_origin: &str, href: &str) -> String {
    format!("{}{}", base_origin, href)
}

/// Main crawl loop
pub struct Crawler<F, O = TracingObserver> {
    fetcher: F,
    settings: CrawlSettings,
    observer: O,
}

impl<F: PageFetcher> Crawler<F, TracingObserver> {
    /// Creates a crawler reporting through `tracing`
    pub fn new(fetcher: F, settings: CrawlSettings) -> Self {
        Self {
            fetcher,
            settings,
            observer: TracingObserver,
        }
    }
}

impl<F: PageFetcher, O: CrawlObserver> Crawler<F, O> {
    /// Replaces the observer receiving crawl events
    pub fn with_observer<P: CrawlObserver>(self, observer: P) -> Crawler<F, P> {
        Crawler {
            fetcher: self.fetcher,
            settings: self.settings,
            observer,
        }
    }

    /// Runs the crawl to a terminal state
    ///
    /// Never fails: absent pages count as empty documents and malformed
    /// listing items are skipped. At most `pagination_limit` pages are fetched.
    pub async fn run(&self) -> CrawlOutcome {
        let mut state = CrawlState::new(&self.settings);
        let mut records = Vec::new();
        let mut items_skipped = 0;
        let mut pages_visited = 0;

        let termination = if state.pagination_limit == 0 {
            Termination::LimitReached
        } else {
            loop {
                // Fetching
                let body = match self.fetcher.fetch(&state.current_url).await {
                    FetchResult::Success { body } => body,
                    FetchResult::Absent { reason } => {
                        self.observer.page_absent(&state, &reason);
                        String::new()
                    }
                };
                pages_visited += 1;

                // Extracting
                let scan = scan_html(&body);
                let mut extracted = 0;
                let mut skipped = 0;
                for (position, item) in scan.items.into_iter().enumerate() {
                    match item {
                        Ok(record) => {
                            records.push(record);
                            extracted += 1;
                        }
                        Err(e) => {
                            self.observer.item_skipped(&state, position, &e);
                            skipped += 1;
                        }
                    }
                }
                items_skipped += skipped;
                self.observer.page_processed(&state, extracted, skipped);

                // Deciding next
                match scan.pagination {
                    Pagination::Next(_) if state.limit_reached() => {
                        break Termination::LimitReached;
                    }
                    Pagination::Next(href) => {
                        let next = next_page_url(&self.settings.base_origin, &href);
                        tracing::debug!("Next page: {}", next);
                        state.advance(next);
                    }
                    Pagination::Last => break Termination::Exhausted,
                    Pagination::Missing => {
                        self.observer.pagination_missing(&state);
                        break Termination::PaginationMissing;
                    }
                }
            }
        };

        let outcome = CrawlOutcome {
            records,
            termination,
            pages_visited,
            items_skipped,
            last_url: state.current_url,
        };
        self.observer.finished(&outcome);
        outcome
    }
}
