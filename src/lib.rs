//! Comic-Harvester: a category crawler and archive downloader for comic sites
//!
//! This crate walks the paginated categories of a comics-aggregation site,
//! resolves every item page to its direct download link, and stores the
//! `.cbz`/`.cbr` archives locally without ever re-fetching or overwriting
//! something already on disk. A separate audit pass verifies stored archives
//! and removes the corrupted ones.

pub mod audit;
pub mod config;
pub mod crawler;
pub mod download;
pub mod inventory;
pub mod output;
pub mod pipeline;
pub mod url;

use thiserror::Error;

/// Main error type for Comic-Harvester operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
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

/// Errors from a single page or asset retrieval
///
/// A fetch error never aborts a run; callers log it and drop the page or
/// item it belongs to.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Unexpected status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Network error for {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// Classifies a transport error raised while talking to `url`
    pub fn from_reqwest(url: &str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else {
            FetchError::Network {
                url: url.to_string(),
                source: error,
            }
        }
    }
}

/// Result type alias for Comic-Harvester operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for fetch operations
pub type FetchResult<T> = std::result::Result<T, FetchError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CatalogWalker, Fetcher, ItemLink};
pub use download::{DownloadEngine, DownloadOutcome};
pub use inventory::Inventory;
pub use pipeline::{harvest, Harvester};
