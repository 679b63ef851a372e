//! Hostbound main entry point
//!
//! Command-line interface for the same-origin BFS crawler.

use anyhow::Context;
use clap::Parser;
use hostbound::config::{load_config, CrawlConfig};
use hostbound::crawler::crawl;
use hostbound::output::print_report;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Hostbound: a same-origin breadth-first web crawler
///
/// Crawls every reachable page on the root URL's host, breadth-first,
/// respecting robots.txt and a page budget, then prints the sorted list
/// of discovered URLs.
#[derive(Parser, Debug)]
#[command(name = "hostbound")]
#[command(version)]
#[command(about = "A same-origin breadth-first web crawler", long_about = None)]
struct Cli {
    /// Root URL to crawl from (defines the host scope)
    #[arg(value_name = "URL", required_unless_present = "config")]
    root_url: Option<String>,

    /// Maximum number of URLs to crawl
    #[arg(long, value_name = "N")]
    max_pages: Option<usize>,

    /// Number of concurrent workers
    #[arg(long, value_name = "N")]
    workers: Option<usize>,

    /// User agent string sent with every request
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Read settings from a TOML file; CLI flags override it
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;
    config.validate().context("invalid configuration")?;

    tracing::info!("Root URL: {}", config.root_url);

    let report = crawl(config).await.context("crawl failed")?;
    print_report(&report);

    Ok(())
}

/// Merges the optional config file with CLI flags (flags win)
fn build_config(cli: &Cli) -> anyhow::Result<CrawlConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => CrawlConfig::new(
            cli.root_url.clone().unwrap_or_default(),
            cli.max_pages,
            cli.workers,
            cli.user_agent.clone(),
        ),
    };

    if cli.config.is_some() {
        if let Some(root_url) = &cli.root_url {
            config.root_url = root_url.clone();
        }
        if let Some(max_pages) = cli.max_pages {
            config.max_pages = max_pages;
        }
        if let Some(workers) = cli.workers {
            config.workers = workers;
        }
        if let Some(user_agent) = &cli.user_agent {
            config.user_agent = user_agent.clone();
        }
    }

    Ok(config)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("hostbound=info,warn"),
            1 => EnvFilter::new("hostbound=debug,info"),
            2 => EnvFilter::new("hostbound=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
