//! URL handling module for Comic-Harvester
//!
//! This module derives pagination URLs for categories, resolves hrefs found
//! in markup to absolute URLs, and extracts the path segment an item's
//! filename is derived from.

mod page;
mod resolve;

pub use page::PageRef;
pub use resolve::{last_path_segment, listing_root, page_number_from_href, resolve_link};
