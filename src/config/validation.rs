use crate::config::types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.pagination_limit < 1 {
        return Err(ConfigError::Validation(format!(
            "pagination_limit must be >= 1, got {}",
            config.pagination_limit
        )));
    }

    let start = Url::parse(&config.start_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid start_url '{}': {}", config.start_url, e))
    })?;
    validate_http_scheme(&start, "start_url")?;

    validate_base_origin(&config.base_origin)?;

    Ok(())
}

/// The base origin is glued verbatim in front of `href` values, so it must be
/// a bare `scheme://host[:port]` with no trailing slash.
fn validate_base_origin(origin: &str) -> Result<(), ConfigError> {
    let url = Url::parse(origin).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid base_origin '{}': {}", origin, e))
    })?;
    validate_http_scheme(&url, "base_origin")?;

    if origin.ends_with('/') {
        return Err(ConfigError::Validation(format!(
            "base_origin must not end with '/', got '{}'",
            origin
        )));
    }

    if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
        return Err(ConfigError::Validation(format!(
            "base_origin must be an origin without path, query or fragment, got '{}'",
            origin
        )));
    }

    Ok(())
}

fn validate_http_scheme(url: &Url, field: &str) -> Result<(), ConfigError> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "{} must use http or https, got '{}'",
            field,
            url.scheme()
        )));
    }
    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.value.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent value cannot be empty".to_string(),
        ));
    }

    if config.value.chars().any(char::is_control) {
        return Err(ConfigError::Validation(
            "user-agent value cannot contain control characters".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if let Some(path) = &config.path {
        if path.is_empty() {
            return Err(ConfigError::Validation(
                "output path cannot be empty".to_string(),
            ));
        }
    }
    Ok(())
}
