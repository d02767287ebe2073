//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the harvester, including:
//! - Building HTTP clients with proper user agent strings
//! - GET requests for category and item pages
//! - Streaming GET requests for archive assets
//! - Error classification
//!
//! There is no retry logic: a failed fetch drops its page or item for the
//! rest of the run.

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::FetchError;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use comic_harvester::config::UserAgentConfig;
/// use comic_harvester::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "ComicHarvester".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: None,
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent_string(config))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Formats the identification header: `Name/Version` or `Name/Version (+ContactURL)`
pub fn user_agent_string(config: &UserAgentConfig) -> String {
    match &config.contact_url {
        Some(contact) => format!(
            "{}/{} (+{})",
            config.crawler_name, config.crawler_version, contact
        ),
        None => format!("{}/{}", config.crawler_name, config.crawler_version),
    }
}

/// Page and asset retrieval over one explicitly constructed client
///
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    page_timeout: Duration,
    asset_timeout: Duration,
}

impl Fetcher {
    /// Wraps an existing client with the configured timeouts
    pub fn new(client: Client, config: &CrawlerConfig) -> Self {
        Self {
            client,
            page_timeout: Duration::from_secs(config.page_timeout_secs),
            asset_timeout: Duration::from_secs(config.asset_timeout_secs),
        }
    }

    /// Builds the client from the user agent section and wraps it
    pub fn from_config(
        user_agent: &UserAgentConfig,
        crawler: &CrawlerConfig,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(user_agent)?, crawler))
    }

    /// Fetches a page and returns its markup
    ///
    /// Only a 200 response counts as success; every other status is a
    /// [`FetchError::Status`]. The page timeout covers the whole exchange.
    pub async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        let exchange = async {
            let response = self.send(url).await?;
            response
                .text()
                .await
                .map_err(|e| FetchError::from_reqwest(url, e))
        };

        tokio::time::timeout(self.page_timeout, exchange)
            .await
            .map_err(|_| FetchError::Timeout {
                url: url.to_string(),
            })?
    }

    /// Opens a streaming request for an archive asset
    ///
    /// The asset timeout bounds the wait for the response head only; the
    /// body is left unread so the caller can stream it to disk, applying
    /// [`Fetcher::asset_timeout`] to each chunk.
    pub async fn open_asset(&self, url: &str) -> Result<Response, FetchError> {
        tokio::time::timeout(self.asset_timeout, self.send(url))
            .await
            .map_err(|_| FetchError::Timeout {
                url: url.to_string(),
            })?
    }

    /// Longest tolerated stall while streaming an asset
    pub fn asset_timeout(&self) -> Duration {
        self.asset_timeout
    }

    async fn send(&self, url: &str) -> Result<Response, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }
}
