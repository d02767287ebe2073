//! Catalog walker - category and page iteration
//!
//! The walker visits every configured category in turn, resolves its page
//! count, fetches each page and merges the item links it finds into one
//! global set. Everything here runs sequentially, before any download
//! starts.

use crate::config::{CategoryEntry, SiteConfig};
use crate::crawler::extractor::extract_item_links;
use crate::crawler::pagination::resolve_page_count;
use crate::crawler::{Fetcher, ItemLink};
use crate::url::PageRef;
use std::collections::BTreeSet;
use url::Url;

/// Links gathered by a walk, with page accounting
#[derive(Debug, Default)]
pub struct WalkOutcome {
    /// Deduplicated item-page links across all categories
    pub links: BTreeSet<ItemLink>,

    /// Pages fetched and scanned successfully
    pub pages_fetched: u64,

    /// Pages dropped after a fetch failure
    pub pages_failed: u64,
}

/// Walks category listings and collects item links
pub struct CatalogWalker {
    fetcher: Fetcher,
    site: SiteConfig,
    max_pages: Option<u32>,
}

impl CatalogWalker {
    /// Creates a new walker
    ///
    /// # Arguments
    ///
    /// * `fetcher` - The page fetcher to use
    /// * `site` - Matching rules for item links and pagination
    /// * `max_pages` - Optional cap on pages walked per category
    pub fn new(fetcher: Fetcher, site: SiteConfig, max_pages: Option<u32>) -> Self {
        Self {
            fetcher,
            site,
            max_pages,
        }
    }

    /// Collects item links from every category
    ///
    /// A page that fails to fetch is logged and skipped; the walk carries on
    /// with the remaining pages and categories.
    pub async fn collect(&self, categories: &[CategoryEntry]) -> WalkOutcome {
        let mut outcome = WalkOutcome::default();

        for category in categories {
            let mut page_count = resolve_page_count(
                &self.fetcher,
                &category.url,
                &self.site.pagination_selector,
            )
            .await;

            if let Some(cap) = self.max_pages {
                page_count = page_count.min(cap);
            }

            tracing::info!("Scraping {} ({} pages)...", category.name, page_count);

            let before = outcome.links.len();
            for number in 1..=page_count {
                let page = PageRef::new(&category.url, number);
                self.walk_page(&page, &mut outcome).await;
            }

            tracing::info!(
                "{}: {} new item links ({} total)",
                category.name,
                outcome.links.len() - before,
                outcome.links.len()
            );
        }

        outcome
    }

    async fn walk_page(&self, page: &PageRef<'_>, outcome: &mut WalkOutcome) {
        let page_url = page.url();

        let base_url = match Url::parse(&page_url) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Skipping malformed page URL {}: {}", page_url, e);
                outcome.pages_failed += 1;
                return;
            }
        };

        let html = match self.fetcher.fetch_page(&page_url).await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!("Failed to fetch {}: {}", page_url, e);
                outcome.pages_failed += 1;
                return;
            }
        };

        let links = extract_item_links(
            &html,
            &base_url,
            &self.site.item_markers,
            &self.site.item_prefixes,
        );
        tracing::debug!("{}: {} item links", page_url, links.len());

        outcome.pages_fetched += 1;
        outcome.links.extend(links);
    }
}
