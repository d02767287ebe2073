use serde::Deserialize;

/// Main configuration structure for Comic-Harvester
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub site: SiteConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub inventory: InventoryConfig,
    #[serde(default)]
    pub audit: AuditConfig,
    #[serde(default, rename = "category")]
    pub categories: Vec<CategoryEntry>,
}

/// Crawler and downloader behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of downloads in flight at once
    #[serde(rename = "max-concurrent-downloads", default = "default_max_concurrent")]
    pub max_concurrent_downloads: u32,

    /// Timeout for category and item pages (seconds)
    #[serde(rename = "page-timeout-secs", default = "default_page_timeout")]
    pub page_timeout_secs: u64,

    /// Timeout for the asset response head and for each stalled chunk (seconds)
    #[serde(rename = "asset-timeout-secs", default = "default_asset_timeout")]
    pub asset_timeout_secs: u64,

    /// Upper bound on pages walked per category
    #[serde(rename = "max-pages", default)]
    pub max_pages: Option<u32>,

    /// Draw per-download progress bars
    #[serde(rename = "show-progress", default = "default_true")]
    pub show_progress: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_downloads: default_max_concurrent(),
            page_timeout_secs: default_page_timeout(),
            asset_timeout_secs: default_asset_timeout(),
            max_pages: None,
            show_progress: true,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", default)]
    pub contact_url: Option<String>,
}

/// Site-specific matching rules
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Path fragments that mark a link as an item page
    #[serde(rename = "item-markers", default = "default_item_markers")]
    pub item_markers: Vec<String>,

    /// Absolute URL prefixes of same-site item pages outside the marked sections
    #[serde(rename = "item-prefixes", default)]
    pub item_prefixes: Vec<String>,

    /// Path fragment of the download-resolution link on an item page
    #[serde(rename = "download-marker", default = "default_download_marker")]
    pub download_marker: String,

    /// Fragment that marks a comment anchor rather than a comic
    #[serde(rename = "comment-marker", default = "default_comment_marker")]
    pub comment_marker: String,

    /// CSS selector of the numbered pagination container
    #[serde(rename = "pagination-selector", default = "default_pagination_selector")]
    pub pagination_selector: String,

    /// Extension used when the asset URL does not reveal one ("cbz" or "cbr")
    #[serde(rename = "default-extension", default = "default_extension")]
    pub default_extension: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            item_markers: default_item_markers(),
            item_prefixes: Vec::new(),
            download_marker: default_download_marker(),
            comment_marker: default_comment_marker(),
            pagination_selector: default_pagination_selector(),
            default_extension: default_extension(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory downloaded archives are written to
    #[serde(rename = "download-dir")]
    pub download_dir: String,
}

/// Local inventory scan configuration
#[derive(Debug, Clone, Deserialize)]
pub struct InventoryConfig {
    /// Drop already-known items before dispatching downloads
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Storage roots to scan; detected from the OS when empty
    #[serde(default)]
    pub roots: Vec<String>,

    /// Folder names looked up under every root
    #[serde(default = "default_subfolders")]
    pub subfolders: Vec<String>,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            roots: Vec::new(),
            subfolders: default_subfolders(),
        }
    }
}

/// Integrity audit configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditConfig {
    /// Directory to audit; defaults to the download directory
    #[serde(default)]
    pub directory: Option<String>,
}

/// One browsable category of the site
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryEntry {
    /// Display name used in logs
    pub name: String,

    /// Root URL of the category (its first page)
    pub url: String,
}

fn default_max_concurrent() -> u32 {
    8
}

fn default_page_timeout() -> u64 {
    10
}

fn default_asset_timeout() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_item_markers() -> Vec<String> {
    vec!["/dc/".to_string(), "/marvel/".to_string()]
}

fn default_download_marker() -> String {
    "/dlds/".to_string()
}

fn default_comment_marker() -> String {
    "#comment".to_string()
}

fn default_pagination_selector() -> String {
    "div.wp-pagenavi".to_string()
}

fn default_extension() -> String {
    "cbz".to_string()
}

fn default_subfolders() -> Vec<String> {
    vec!["Books".to_string(), "Downloads".to_string()]
}
