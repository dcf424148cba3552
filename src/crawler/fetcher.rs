//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - The `PageFetcher` trait the traversal engine fetches through
//! - Building HTTP clients with a proper user agent string
//! - GET requests with error classification
//!
//! There is no retry: a failed fetch drops the item.

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::FetchError;
use reqwest::{redirect::Policy, Client};
use std::future::Future;
use std::time::Duration;
use url::Url;

/// Retrieves the HTML body of a page
///
/// Implementations must be shareable across tasks: the engine runs several
/// fetches at once and they may complete in any order.
pub trait PageFetcher: Send + Sync + 'static {
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// `PageFetcher` backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a fetcher from the crawler and user agent settings
    pub fn from_config(
        crawler: &CrawlerConfig,
        user_agent: &UserAgentConfig,
    ) -> Result<Self, reqwest::Error> {
        let timeout = Duration::from_secs(crawler.request_timeout_secs);
        Ok(Self::new(build_http_client(user_agent, timeout)?))
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        fetch_url(&self.client, url).await
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Total per-request timeout
///
/// # Example
///
/// ```no_run
/// use fight_finder::config::UserAgentConfig;
/// use fight_finder::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and returns its HTML body
///
/// # Error classification
///
/// | Condition | Result |
/// |-----------|--------|
/// | Non-2xx status | `FetchError::Status` |
/// | Content-Type present but not HTML | `FetchError::ContentMismatch` |
/// | Timeout | `FetchError::Timeout` |
/// | Connection or other transport failure | `FetchError::Network` |
/// | Body could not be read | `FetchError::Body` |
pub async fn fetch_url(client: &Client, url: &Url) -> Result<String, FetchError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| classify_error(url, &e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    if let Some(content_type) = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    {
        if !is_html(content_type) {
            return Err(FetchError::ContentMismatch {
                url: url.to_string(),
                content_type: content_type.to_string(),
            });
        }
    }

    response.text().await.map_err(|e| FetchError::Body {
        url: url.to_string(),
        message: e.to_string(),
    })
}

fn is_html(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    content_type.contains("text/html") || content_type.contains("application/xhtml+xml")
}

fn classify_error(url: &Url, error: &reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        FetchError::Network {
            url: url.to_string(),
            message: "Connection refused".to_string(),
        }
    } else {
        FetchError::Network {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}
