//! Crawler module for category walking and link resolution
//!
//! This module contains the crawl side of the pipeline, including:
//! - HTTP fetching with a fixed identification header
//! - Pagination discovery for categories
//! - Item and asset link extraction
//! - The catalog walk that produces the deduplicated item set

mod extractor;
mod fetcher;
mod pagination;
mod walker;

pub use extractor::{extract_asset_link, extract_item_links};
pub use fetcher::{build_http_client, user_agent_string, Fetcher};
pub use pagination::{page_count_from_html, resolve_page_count};
pub use walker::{CatalogWalker, WalkOutcome};

/// URL of one comic's detail page; identity is the exact string
pub type ItemLink = String;
