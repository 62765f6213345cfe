use crate::crawler::{CrawlSettings, DEFAULT_BASE_ORIGIN};
use serde::Deserialize;

/// Desktop browser identity the listing site expects
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_11_5) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/50.0.2661.102 Safari/537.36";

/// Results page crawled when none is configured
pub const DEFAULT_START_URL: &str = "https://www.chileautos.cl/vehiculos/ssangyong/tivoli/";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Crawl loop input derived from the `[crawler]` table
    pub fn settings(&self) -> CrawlSettings {
        CrawlSettings::new(self.crawler.start_url.clone(), self.crawler.pagination_limit)
            .with_base_origin(self.crawler.base_origin.clone())
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// First results page
    #[serde(rename = "start-url")]
    pub start_url: String,

    /// Maximum number of result pages to fetch
    #[serde(rename = "pagination-limit")]
    pub pagination_limit: usize,

    /// Origin prepended to next-page links
    #[serde(rename = "base-origin")]
    pub base_origin: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            start_url: DEFAULT_START_URL.to_string(),
            pagination_limit: 1,
            base_origin: DEFAULT_BASE_ORIGIN.to_string(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Full `User-Agent` header value
    pub value: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            value: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// JSON file for the extracted listings; stdout when unset
    pub path: Option<String>,

    /// Pretty-print the JSON output
    pub pretty: bool,
}
