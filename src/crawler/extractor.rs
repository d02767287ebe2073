//! HTML link extraction for category and item pages
//!
//! Two modes:
//! - category pages yield the set of item-page links they reference
//! - item pages yield the first direct download-resolution link

use crate::crawler::ItemLink;
use crate::url::{listing_root, resolve_link};
use scraper::{Html, Selector};
use std::collections::BTreeSet;
use url::Url;

/// Collects every absolute link of the document, in document order
fn resolved_links(document: &Html, base_url: &Url) -> Vec<String> {
    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .collect()
}

/// Extracts the item-page links from a category page
///
/// A link is kept when its resolved URL contains any of `item_markers`, or
/// when it is a same-site link that extends one of `item_prefixes` (generic
/// item references outside the publisher sections). Links to the listing
/// being scanned (its root or `<listing>/page/N/`) are never items.
///
/// # Example
///
/// ```
/// use comic_harvester::crawler::extract_item_links;
/// use url::Url;
///
/// let html = r#"<a href="/dc/item-a/">A</a><a href="/about/">About</a>"#;
/// let page = Url::parse("https://example.org/cat/dc").unwrap();
/// let links = extract_item_links(html, &page, &["/dc/".to_string()], &[]);
/// assert!(links.contains("https://example.org/dc/item-a/"));
/// assert_eq!(links.len(), 1);
/// ```
pub fn extract_item_links(
    html: &str,
    page_url: &Url,
    item_markers: &[String],
    item_prefixes: &[String],
) -> BTreeSet<ItemLink> {
    let document = Html::parse_document(html);

    resolved_links(&document, page_url)
        .into_iter()
        .filter(|link| {
            item_markers.iter().any(|marker| link.contains(marker.as_str()))
                || is_generic_item(link, page_url, item_prefixes)
        })
        .filter(|link| !is_listing_page(link, page_url))
        .collect()
}

/// Any page of the listing `page_url` belongs to, page 1 included
fn is_listing_page(link: &str, page_url: &Url) -> bool {
    listing_root(link) == listing_root(page_url.as_str())
}

/// Same host as the page, strictly below one of the prefixes
fn is_generic_item(link: &str, page_url: &Url, item_prefixes: &[String]) -> bool {
    let below_prefix = item_prefixes
        .iter()
        .any(|prefix| link.len() > prefix.len() && link.starts_with(prefix.as_str()));

    below_prefix
        && Url::parse(link)
            .map(|url| url.host_str() == page_url.host_str())
            .unwrap_or(false)
}

/// Extracts the direct download-resolution link from an item page
///
/// Returns the first link whose resolved URL contains `download_marker`, or
/// `None` when the page offers nothing to download.
pub fn extract_asset_link(html: &str, page_url: &Url, download_marker: &str) -> Option<String> {
    let document = Html::parse_document(html);

    resolved_links(&document, page_url)
        .into_iter()
        .find(|link| link.contains(download_marker))
}
