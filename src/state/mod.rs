//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: the dedup sets for fighters, fights and event pages; every
//!   "already seen?" question in the crawl goes through it
//! - `CrawlStatistics`: counters describing what the crawl did and skipped

mod crawl_state;
mod statistics;

pub use crawl_state::CrawlState;
pub use statistics::CrawlStatistics;
