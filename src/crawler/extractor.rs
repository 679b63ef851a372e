//! Link extraction from HTML
//!
//! Pure text-in, hrefs-out: no network access, no URL resolution, no
//! policy logic. Malformed markup never fails extraction -- html5ever
//! parses whatever it is given and we collect what we can from
//! well-formed anchor tags.

use scraper::{Html, Selector};
use std::collections::HashSet;

/// Extracts the raw href targets of anchor tags from one page's markup
///
/// Duplicate hrefs within the page collapse; result order follows
/// document order but carries no meaning (the frontier imposes BFS order
/// on admission). Hrefs that can never become fetchable URLs are dropped
/// here:
/// - `javascript:`, `mailto:`, `tel:`, `data:` schemes
/// - fragment-only links (same-page anchors)
/// - empty hrefs
pub fn extract_hrefs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    let mut seen = HashSet::new();
    let mut hrefs = Vec::new();

    if let Ok(anchor) = Selector::parse("a[href]") {
        for element in document.select(&anchor) {
            if let Some(href) = element.value().attr("href") {
                let href = href.trim();
                if !is_extractable(href) {
                    continue;
                }
                if seen.insert(href.to_string()) {
                    hrefs.push(href.to_string());
                }
            }
        }
    }

    hrefs
}

fn is_extractable(href: &str) -> bool {
    if href.is_empty() || href.starts_with('#') {
        return false;
    }
    !(href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:"))
}
