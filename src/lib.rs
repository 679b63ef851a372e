//! Hostbound: a same-origin breadth-first web crawler
//!
//! This crate implements a BFS crawler that visits every reachable page on
//! a single host, respecting robots.txt and a page budget. A fixed pool of
//! workers shares one frontier (pending queue + visited set + in-flight
//! counter); the run terminates when no work is pending or in flight.

pub mod config;
pub mod crawler;
pub mod output;
pub mod robots;
pub mod url;

use thiserror::Error;

/// Main error type for hostbound operations
///
/// Per-URL fetch and parse failures are deliberately not represented here:
/// they stay inside the per-URL pipeline and are logged, never propagated.
/// A `CrawlError` means the run itself could not proceed.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Worker task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
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

    #[error("Invalid root URL: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for hostbound operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::CrawlConfig;
pub use crawler::{Coordinator, Frontier};
pub use output::CrawlReport;
pub use url::{normalize_url, HostScope};
