//! Crawl coordination
//!
//! The coordinator owns the worker pool and drives the whole run: it
//! seeds the frontier with the root URL, spawns N workers, and waits for
//! all of them to exit. Workers exit when the frontier reports that no
//! work is pending or in flight, so joining the pool is the termination
//! detector.
//!
//! Each worker repeats claim -> policy check -> fetch -> extract ->
//! resolve -> scope filter -> admit children -> resolve the claim. No
//! per-URL failure escapes this pipeline; one bad page never aborts the
//! run.

use crate::config::CrawlConfig;
use crate::crawler::extractor::extract_hrefs;
use crate::crawler::fetcher::{build_http_client, fetch_page, FetchOutcome};
use crate::crawler::frontier::Frontier;
use crate::output::CrawlReport;
use crate::robots::RobotsGate;
use crate::url::{normalize_url, resolve_against, HostScope};
use crate::Result;
use reqwest::Client;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use url::Url;

/// Counters shared by all workers, folded into the final report
#[derive(Debug, Default)]
pub struct CrawlStats {
    /// Pages fetched with a 2xx response (HTML or not)
    pub fetched: AtomicU64,
    /// URLs skipped because robots.txt disallows them
    pub denied: AtomicU64,
    /// URLs whose fetch failed (transport error or non-2xx status)
    pub failed: AtomicU64,
}

/// Everything a worker needs; cheap to clone into each task
#[derive(Clone)]
struct WorkerContext {
    frontier: Arc<Frontier>,
    gate: Arc<RobotsGate>,
    client: Client,
    scope: HostScope,
    stats: Arc<CrawlStats>,
}

/// Owns the worker pool and the run lifecycle
pub struct Coordinator {
    config: CrawlConfig,
    root: Url,
    frontier: Arc<Frontier>,
    context: WorkerContext,
}

impl Coordinator {
    /// Creates a coordinator: validates config, builds the shared HTTP
    /// client, and fetches robots.txt once for the root's origin
    pub async fn new(config: CrawlConfig) -> Result<Self> {
        config.validate()?;

        let root = normalize_url(&config.root_url)?;
        let scope = HostScope::of(&root)?;
        let client = build_http_client(&config.user_agent)?;

        let gate = Arc::new(RobotsGate::fetch(&client, &root, &config.user_agent).await);
        let frontier = Arc::new(Frontier::new(config.max_pages));

        let context = WorkerContext {
            frontier: frontier.clone(),
            gate,
            client,
            scope,
            stats: Arc::new(CrawlStats::default()),
        };

        Ok(Self {
            config,
            root,
            frontier,
            context,
        })
    }

    /// Runs the crawl to completion and returns the final report
    ///
    /// Seeds the frontier, spawns the pool, and joins it. The frontier
    /// closes itself when its pending-work counter reaches zero; each
    /// worker then observes the stop sentinel on its next claim and
    /// exits.
    pub async fn run(self) -> Result<CrawlReport> {
        let started = Instant::now();
        tracing::info!(
            "Starting crawl of {} ({} workers, budget {})",
            self.root,
            self.config.workers,
            self.config.max_pages
        );

        self.frontier.seed(self.root.clone());

        let mut workers = JoinSet::new();
        for worker_id in 0..self.config.workers {
            let context = self.context.clone();
            workers.spawn(worker_loop(worker_id, context));
        }

        while let Some(joined) = workers.join_next().await {
            joined?;
        }

        let stats = &self.context.stats;
        let mut visited = self.frontier.visited();
        visited.sort();

        let report = CrawlReport {
            visited,
            fetched: stats.fetched.load(Ordering::Relaxed),
            denied: stats.denied.load(Ordering::Relaxed),
            failed: stats.failed.load(Ordering::Relaxed),
            elapsed: started.elapsed(),
        };

        tracing::info!(
            "Crawl complete: {} URLs admitted, {} fetched, {} denied, {} failed in {:.2?}",
            report.visited.len(),
            report.fetched,
            report.denied,
            report.failed,
            report.elapsed
        );

        Ok(report)
    }
}

/// One worker: claim until the frontier closes, resolving every claim
/// exactly once
async fn worker_loop(worker_id: usize, context: WorkerContext) {
    tracing::debug!(worker_id, "worker started");

    while let Some(url) = context.frontier.claim().await {
        process_url(&context, &url).await;
        // The balancing decrement for this URL's admission; runs on
        // every pipeline outcome.
        context.frontier.mark_resolved();
    }

    tracing::debug!(worker_id, "worker exiting");
}

/// The per-URL pipeline
async fn process_url(context: &WorkerContext, url: &Url) {
    if !context.gate.is_allowed(url) {
        tracing::info!("Access denied by robots.txt to {}", url);
        context.stats.denied.fetch_add(1, Ordering::Relaxed);
        return;
    }

    let body = match fetch_page(&context.client, url).await {
        Ok(FetchOutcome::Html(body)) => body,
        Ok(FetchOutcome::NotHtml { content_type }) => {
            context.stats.fetched.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("{}: no link extraction for content type {}", url, content_type);
            return;
        }
        Err(e) => {
            context.stats.failed.fetch_add(1, Ordering::Relaxed);
            tracing::warn!("Failed to fetch {}: {}", url, e);
            return;
        }
    };

    let fetched = context.stats.fetched.fetch_add(1, Ordering::Relaxed) + 1;
    if fetched % 25 == 0 {
        tracing::info!(
            "Progress: {} pages fetched, {} URLs admitted",
            fetched,
            context.frontier.visited_len()
        );
    }

    let mut admitted = 0usize;
    for href in extract_hrefs(&body) {
        let child = match resolve_against(url, &href) {
            Some(child) => child,
            None => continue,
        };

        // Scope filter, not the visited check, is what keeps the crawl
        // bounded to one site.
        if !context.scope.contains(&child) {
            tracing::trace!("{}: out of scope, dropping {}", url, child);
            continue;
        }

        // Already-visited and over-budget children are silent drops.
        if context.frontier.try_admit(child) {
            admitted += 1;
        }
    }

    tracing::debug!("{}: admitted {} new URLs", url, admitted);
}
