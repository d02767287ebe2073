//! Category page-count discovery
//!
//! Two pagination controls are recognized and the larger answer wins:
//! a container of numbered page links, and a single "last page" anchor whose
//! target carries the page number in a `/page/N/` segment.

use crate::crawler::Fetcher;
use crate::url::page_number_from_href;
use scraper::{ElementRef, Html, Selector};

/// Texts that mark an anchor as the "last page" control
const LAST_PAGE_TEXTS: &[&str] = &["last", "last »", "»", "last page"];

/// Determines how many pages a category has
///
/// Fetches the first page and inspects its pagination control. A failed
/// fetch or a missing control means a single-page category.
pub async fn resolve_page_count(
    fetcher: &Fetcher,
    category_url: &str,
    pagination_selector: &str,
) -> u32 {
    match fetcher.fetch_page(category_url).await {
        Ok(html) => page_count_from_html(&html, pagination_selector),
        Err(e) => {
            tracing::warn!("Failed to fetch {}: {}", category_url, e);
            1
        }
    }
}

/// Parses the page count out of a category page's markup (always >= 1)
pub fn page_count_from_html(html: &str, pagination_selector: &str) -> u32 {
    let document = Html::parse_document(html);

    let numbered = numbered_links_max(&document, pagination_selector);
    let last = last_page_anchor(&document);

    numbered.max(last).unwrap_or(1).max(1)
}

/// Largest numeric anchor text inside the pagination container
fn numbered_links_max(document: &Html, pagination_selector: &str) -> Option<u32> {
    let container_selector = Selector::parse(pagination_selector).ok()?;
    let a_selector = Selector::parse("a").ok()?;

    document
        .select(&container_selector)
        .flat_map(|container| container.select(&a_selector))
        .filter_map(|anchor| element_text(&anchor).parse::<u32>().ok())
        .max()
}

/// Page number of the "last page" anchor, read from its target URL
fn last_page_anchor(document: &Html) -> Option<u32> {
    let a_selector = Selector::parse("a[href]").ok()?;

    document
        .select(&a_selector)
        .filter(|anchor| is_last_page_control(anchor))
        .filter_map(|anchor| anchor.value().attr("href"))
        .filter_map(page_number_from_href)
        .max()
}

fn is_last_page_control(anchor: &ElementRef<'_>) -> bool {
    let by_class = anchor
        .value()
        .classes()
        .any(|class| class.eq_ignore_ascii_case("last"));
    let text = element_text(anchor).to_lowercase();

    by_class || LAST_PAGE_TEXTS.contains(&text.as_str())
}

fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SELECTOR: &str = "div.wp-pagenavi";

    #[test]
    fn test_no_pagination_is_single_page() {
        let html = r#"<html><body><a href="/dc/item-a/">A</a></body></html>"#;
        assert_eq!(page_count_from_html(html, SELECTOR), 1);
    }

    #[test]
    fn test_numbered_container() {
        let html = r#"<div class="wp-pagenavi">
            <span class="current">1</span>
            <a href="/cat/dc/page/2/">2</a>
            <a href="/cat/dc/page/3/">3</a>
            <a href="/cat/dc/page/57/">57</a>
            <a href="/cat/dc/page/2/">Next</a>
            </div>"#;
        assert_eq!(page_count_from_html(html, SELECTOR), 57);
    }

    #[test]
    fn test_numbered_container_without_numbers() {
        let html = r#"<div class="wp-pagenavi"><a href="/cat/dc/page/2/">Next</a></div>"#;
        assert_eq!(page_count_from_html(html, SELECTOR), 1);
    }

    #[test]
    fn test_numbers_outside_container_ignored() {
        let html = r#"<div class="sidebar"><a href="/top/">250</a></div>"#;
        assert_eq!(page_count_from_html(html, SELECTOR), 1);
    }

    #[test]
    fn test_last_page_anchor_by_class() {
        let html = r#"<nav><a class="pagination-button last" href="https://example.org/cat/dc/page/412/">»</a></nav>"#;
        assert_eq!(page_count_from_html(html, SELECTOR), 412);
    }

    #[test]
    fn test_last_page_anchor_by_text() {
        let html = r#"<nav><a href="https://example.org/cat/dc/page/88/">Last</a></nav>"#;
        assert_eq!(page_count_from_html(html, SELECTOR), 88);
    }

    #[test]
    fn test_last_page_anchor_without_page_segment() {
        let html = r#"<nav><a class="last" href="https://example.org/cat/dc/">Last</a></nav>"#;
        assert_eq!(page_count_from_html(html, SELECTOR), 1);
    }

    #[test]
    fn test_both_strategies_take_maximum() {
        let html = r#"<div class="wp-pagenavi">
            <a href="/cat/dc/page/2/">2</a>
            <a class="last" href="/cat/dc/page/90/">Last »</a>
            </div>"#;
        assert_eq!(page_count_from_html(html, SELECTOR), 90);
    }
}
