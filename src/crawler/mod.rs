//! The traversal engine
//!
//! - `frontier` -- shared BFS queue, visited set, and termination counter
//! - `coordinator` -- worker pool and the per-URL pipeline
//! - `fetcher` -- HTTP transport collaborator
//! - `extractor` -- anchor href extraction from HTML

mod coordinator;
mod extractor;
mod fetcher;
mod frontier;

pub use coordinator::{Coordinator, CrawlStats};
pub use extractor::extract_hrefs;
pub use fetcher::{build_http_client, fetch_page, FetchError, FetchOutcome};
pub use frontier::Frontier;

use crate::config::CrawlConfig;
use crate::output::CrawlReport;
use crate::Result;

/// Runs a complete crawl: seed the root, traverse every same-host page
/// up to the budget, and return the report
pub async fn crawl(config: CrawlConfig) -> Result<CrawlReport> {
    let coordinator = Coordinator::new(config).await?;
    coordinator.run().await
}
