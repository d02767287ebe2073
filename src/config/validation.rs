use crate::config::types::{
    CategoryEntry, Config, CrawlerConfig, OutputConfig, SiteConfig, UserAgentConfig,
};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_site_config(&config.site)?;
    validate_output_config(&config.output)?;
    validate_categories(&config.categories)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_downloads < 1 || config.max_concurrent_downloads > 256 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_downloads must be between 1 and 256, got {}",
            config.max_concurrent_downloads
        )));
    }

    if config.page_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "page_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.asset_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "asset_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.max_pages == Some(0) {
        return Err(ConfigError::Validation(
            "max_pages must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if let Some(contact_url) = &config.contact_url {
        Url::parse(contact_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;
    }

    Ok(())
}

/// Validates the site matching rules
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    if config.item_markers.is_empty() || config.item_markers.iter().any(|m| m.is_empty()) {
        return Err(ConfigError::Validation(
            "item_markers must list at least one non-empty marker".to_string(),
        ));
    }

    for prefix in &config.item_prefixes {
        let url = Url::parse(prefix)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid item prefix '{}': {}", prefix, e)))?;
        if url.host_str().is_none() {
            return Err(ConfigError::Validation(format!(
                "item prefix '{}' must name a host",
                prefix
            )));
        }
    }

    if config.download_marker.is_empty() {
        return Err(ConfigError::Validation(
            "download_marker cannot be empty".to_string(),
        ));
    }

    if config.comment_marker.is_empty() {
        return Err(ConfigError::Validation(
            "comment_marker cannot be empty".to_string(),
        ));
    }

    Selector::parse(&config.pagination_selector).map_err(|_| {
        ConfigError::Validation(format!(
            "pagination_selector '{}' is not a valid CSS selector",
            config.pagination_selector
        ))
    })?;

    if !matches!(config.default_extension.as_str(), "cbz" | "cbr") {
        return Err(ConfigError::Validation(format!(
            "default_extension must be 'cbz' or 'cbr', got '{}'",
            config.default_extension
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.download_dir.is_empty() {
        return Err(ConfigError::Validation(
            "download_dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates category entries
fn validate_categories(categories: &[CategoryEntry]) -> Result<(), ConfigError> {
    for entry in categories {
        if entry.name.is_empty() {
            return Err(ConfigError::Validation(
                "category name cannot be empty".to_string(),
            ));
        }

        let url = Url::parse(&entry.url).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid category URL '{}': {}", entry.url, e))
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Validation(format!(
                "Category URL '{}' must use HTTP or HTTPS",
                entry.url
            )));
        }
    }

    Ok(())
}
