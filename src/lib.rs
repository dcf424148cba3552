//! Fight-Finder: a fighter/fight graph crawler
//!
//! This crate crawls a structured fight-record site starting from an
//! organisation's event index, walks the graph of fighter profiles reachable
//! through their bout histories, and emits two deduplicated datasets: one row
//! per fighter and one row per fight.

pub mod config;
pub mod crawler;
pub mod output;
pub mod records;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Fight-Finder operations
///
/// Only configuration, HTTP client construction and output failures end up
/// here. Per-page problems are [`FetchError`] / [`ExtractionError`] and never
/// abort a crawl.
#[derive(Debug, Error)]
pub enum FightFinderError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),
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

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Failure to retrieve a page. The item is dropped, never retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Expected HTML from {url}, got {content_type}")]
    ContentMismatch { url: String, content_type: String },

    #[error("Failed to read body of {url}: {message}")]
    Body { url: String, message: String },
}

/// A document did not have the shape the extractor expects.
///
/// Scope depends on where it is raised: for a whole page nothing is emitted,
/// for a single bout row only that row is skipped.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Document is not a fighter profile")]
    NotAFighterPage,

    #[error("Missing expected field '{field}'")]
    MissingField { field: &'static str },

    #[error("Unusable link '{href}': {reason}")]
    InvalidLink { href: String, reason: String },
}

/// URL-specific errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Not a fighter profile link: {0}")]
    NotAFighterLink(String),

    #[error("Link leaves the crawled site: {0}")]
    ForeignHost(String),
}

/// Result type alias for Fight-Finder operations
pub type Result<T> = std::result::Result<T, FightFinderError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, Coordinator, CrawlReport};
pub use records::{FightKey, FightRecord, FighterId, FighterRecord, FrontierItem};
pub use state::{CrawlState, CrawlStatistics};
