//! Crawler module for page fetching and graph traversal
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the `PageFetcher` trait
//! - Field extraction from event and fighter pages
//! - Frontier ordering and the in-flight limit
//! - The traversal engine tying them to the crawl state and output

mod coordinator;
mod fetcher;
mod parser;
mod scheduler;

pub use coordinator::{Coordinator, CrawlReport};
pub use fetcher::{build_http_client, fetch_url, HttpFetcher, PageFetcher};
pub use parser::{
    parse_html, BoutRow, FieldExtractor, FighterProfile, Listing, SherdogExtractor,
};
pub use scheduler::{FetchTask, ScheduledFetch, Scheduler};

use crate::config::{validate, Config};
use crate::output::TsvSink;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client
/// 2. Create today's fighter and fight files under the output prefix
/// 3. Crawl from the configured root until the frontier is exhausted
/// 4. Flush both files
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl completed; per-page failures are counted in it
/// * `Err(FightFinderError)` - Invalid config, or setup or output failed
pub async fn crawl(config: Config) -> crate::Result<CrawlReport<TsvSink>> {
    validate(&config)?;

    let fetcher = HttpFetcher::from_config(&config.crawler, &config.user_agent)?;
    let sink = TsvSink::create_today(&config.output.prefix)?;

    tracing::info!(
        "Writing {} and {}",
        sink.fighters_path().display(),
        sink.fights_path().display()
    );

    Coordinator::new(&config, fetcher, sink)?.run().await
}
