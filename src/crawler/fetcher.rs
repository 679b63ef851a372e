//! HTTP fetching
//!
//! Thin collaborator around reqwest: build one shared client at startup,
//! then fetch page bodies. The engine only distinguishes "got an HTML
//! body", "got something that is not HTML", and "failed"; every failure
//! is uniform and is handled locally by the worker that hit it.

use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Successful fetch of a URL
#[derive(Debug)]
pub enum FetchOutcome {
    /// An HTML body to extract links from
    Html(String),

    /// A 2xx response that is not HTML; fetched, but yields no children
    NotHtml {
        /// The Content-Type the server reported
        content_type: String,
    },
}

/// A failed fetch; skip the URL, report, no retry
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP status {0}")]
    Status(u16),

    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(reqwest::Error),
}

/// Builds the HTTP client shared by all workers
pub fn build_http_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.to_string())
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches one page
///
/// Redirects are followed by the client (its default policy); the page is
/// recorded under the URL it was claimed as. Non-2xx statuses are
/// failures; 2xx non-HTML responses succeed with no extractable content.
pub async fn fetch_page(client: &Client, url: &Url) -> Result<FetchOutcome, FetchError> {
    let response = client.get(url.as_str()).send().await.map_err(|e| {
        if e.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Transport(e)
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    // Missing Content-Type is treated as HTML, matching servers that
    // serve pages without the header.
    if !content_type.is_empty() && !content_type.contains("text/html") {
        return Ok(FetchOutcome::NotHtml { content_type });
    }

    match response.text().await {
        Ok(body) => Ok(FetchOutcome::Html(body)),
        Err(e) => Err(FetchError::Transport(e)),
    }
}
