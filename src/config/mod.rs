//! Crawl configuration
//!
//! Settings come either from CLI flags or from a small TOML file; in both
//! cases they end up in a validated [`CrawlConfig`]. Settings are read once
//! at startup and never re-read during a run.

use crate::{ConfigError, ConfigResult};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Default ceiling on the number of admitted URLs
pub const DEFAULT_MAX_PAGES: usize = 1000;

/// Default number of concurrent workers
pub const DEFAULT_WORKERS: usize = 5;

fn default_max_pages() -> usize {
    DEFAULT_MAX_PAGES
}

fn default_workers() -> usize {
    DEFAULT_WORKERS
}

fn default_user_agent() -> String {
    format!("hostbound/{}", env!("CARGO_PKG_VERSION"))
}

/// Configuration for a single crawl run
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// The URL the crawl starts from; its host defines the crawl scope
    #[serde(rename = "root-url")]
    pub root_url: String,

    /// Maximum number of URLs admitted for processing (the crawl budget)
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: usize,

    /// Number of concurrent worker tasks
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// User agent sent with every request and matched against robots.txt
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

impl CrawlConfig {
    /// Builds a config from plain startup parameters, applying defaults
    /// for any omitted value.
    pub fn new(
        root_url: String,
        max_pages: Option<usize>,
        workers: Option<usize>,
        user_agent: Option<String>,
    ) -> Self {
        Self {
            root_url,
            max_pages: max_pages.unwrap_or(DEFAULT_MAX_PAGES),
            workers: workers.unwrap_or(DEFAULT_WORKERS),
            user_agent: user_agent.unwrap_or_else(default_user_agent),
        }
    }

    /// Validates the configuration
    ///
    /// Rejects a zero budget, zero workers, and a root URL that is not an
    /// absolute http(s) URL.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_pages == 0 {
            return Err(ConfigError::Validation(
                "max-pages must be at least 1".to_string(),
            ));
        }
        if self.workers == 0 {
            return Err(ConfigError::Validation(
                "workers must be at least 1".to_string(),
            ));
        }
        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::Validation(
                "user-agent must not be empty".to_string(),
            ));
        }

        let parsed = url::Url::parse(&self.root_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", self.root_url, e)))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ConfigError::InvalidUrl(format!(
                "root URL must be http or https, got scheme '{}'",
                parsed.scheme()
            )));
        }
        if parsed.host_str().is_none() {
            return Err(ConfigError::InvalidUrl(format!(
                "root URL has no host: {}",
                self.root_url
            )));
        }

        Ok(())
    }
}

/// Loads and validates a configuration from a TOML file
pub fn load_config(path: &Path) -> ConfigResult<CrawlConfig> {
    let content = fs::read_to_string(path)?;
    let config: CrawlConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}
