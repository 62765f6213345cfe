//! listing-crawler: a paginated classifieds crawler
//!
//! This crate walks the result pages of a vehicle classifieds site, extracts
//! one structured record per listing and collects them in document order.

pub mod config;
pub mod crawler;
pub mod listing;
pub mod output;

use thiserror::Error;

/// Main error type for crawler operations
///
/// Transport failures never show up here: the fetcher absorbs them into
/// an absent page. This covers the glue around the crawl loop.
#[derive(Debug, Error)]
pub enum CrawlerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors raised while turning one listing item into a record
///
/// These are per-item: the crawl loop logs them and moves on to the next item.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("missing required attribute `{name}`")]
    MissingAttribute { name: String },

    #[error("missing required element: {what}")]
    MissingElement { what: &'static str },

    #[error("no text content in {what}")]
    EmptyText { what: &'static str },
}

/// Result type alias for crawler operations
pub type Result<T> = std::result::Result<T, CrawlerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlOutcome, CrawlSettings, Crawler, Termination};
pub use listing::ListingRecord;
