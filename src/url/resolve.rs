use url::Url;

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Fragment-only hrefs (same page anchors)
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
pub fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    if href.starts_with('#') {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}

/// Returns the last non-empty `/`-separated segment of a URL string
///
/// The fragment stays attached, which is what lets a comment anchor such as
/// `.../item-a/#comments` surface as `#comments`.
///
/// # Examples
///
/// ```
/// use comic_harvester::url::last_path_segment;
///
/// assert_eq!(last_path_segment("https://example.org/dc/item-a/"), Some("item-a"));
/// assert_eq!(last_path_segment("https://example.org/dc/item-a/#comments"), Some("#comments"));
/// ```
pub fn last_path_segment(url: &str) -> Option<&str> {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty() && !segment.ends_with(':'))
}

/// Parses the page number out of a `/page/N/` pagination href
pub fn page_number_from_href(href: &str) -> Option<u32> {
    let (_, rest) = href.rsplit_once("/page/")?;
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Strips a trailing `/page/N/` segment and trailing slashes
///
/// Every page of one category listing shares this root.
pub fn listing_root(url: &str) -> &str {
    let root = match url.rsplit_once("/page/") {
        Some((head, rest)) if rest.starts_with(|c: char| c.is_ascii_digit()) => head,
        _ => url,
    };
    root.trim_end_matches('/')
}
