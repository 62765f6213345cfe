//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building an HTTP client with the configured browser user agent
//! - Single-attempt GET requests
//! - Folding every transport failure into an absent page
//!
//! The listing site serves different markup (or nothing) to clients that do
//! not look like a browser, hence the fixed `User-Agent`.

use crate::config::UserAgentConfig;
use reqwest::{Client, StatusCode};
use std::future::Future;
use thiserror::Error;
use url::Url;

/// Why a page could not be retrieved
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbsentReason {
    /// The URL did not parse, or its scheme is not http(s)
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Connection, TLS or body transfer failure
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with something other than 200
    #[error("HTTP status {0}")]
    Status(u16),
}

/// Result of a fetch operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Page body content
        body: String,
    },

    /// No page could be retrieved
    Absent {
        /// What went wrong
        reason: AbsentReason,
    },
}

/// Source of result pages for the crawl loop
///
/// Implementations must never fail: every problem is reported as
/// `FetchResult::Absent`.
pub trait PageFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = FetchResult> + Send;
}

/// Builds an HTTP client with proper configuration
///
/// Timeouts and the redirect policy are left at reqwest's defaults, and no
/// cookie store is enabled, so every request is independent.
///
/// # Example
///
/// ```no_run
/// use listing_crawler::config::UserAgentConfig;
/// use listing_crawler::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.value.clone())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL once
///
/// # Outcome mapping
///
/// | Condition | Result | Log level |
/// |-----------|--------|-----------|
/// | HTTP 200 | `Success` | - |
/// | Unparseable URL / non-http(s) scheme | `Absent(InvalidUrl)` | debug |
/// | Connection failure | `Absent(Network)` | error |
/// | Any other status | `Absent(Status)` | info |
/// | Body read failure | `Absent(Network)` | error |
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let target = match Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => parsed,
        Ok(parsed) => {
            tracing::debug!("Unsupported scheme {} in {}", parsed.scheme(), url);
            return FetchResult::Absent {
                reason: AbsentReason::InvalidUrl(url.to_string()),
            };
        }
        Err(e) => {
            tracing::debug!("Cannot fetch {:?}: {}", url, e);
            return FetchResult::Absent {
                reason: AbsentReason::InvalidUrl(url.to_string()),
            };
        }
    };

    let response = match client.get(target).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("Failed to get the page {}: {}", url, e);
            return FetchResult::Absent {
                reason: AbsentReason::Network(e.to_string()),
            };
        }
    };

    let status = response.status();
    if status != StatusCode::OK {
        tracing::info!("Failed to get the page {} (status {})", url, status.as_u16());
        return FetchResult::Absent {
            reason: AbsentReason::Status(status.as_u16()),
        };
    }

    match response.text().await {
        Ok(body) => FetchResult::Success { body },
        Err(e) => {
            tracing::error!("Failed to read the page {}: {}", url, e);
            FetchResult::Absent {
                reason: AbsentReason::Network(e.to_string()),
            }
        }
    }
}

/// `PageFetcher` backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with a client built from the user agent config
    pub fn new(config: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchResult {
        fetch_url(&self.client, url).await
    }
}
