//! Hyperlink extraction from rendered HTML
//!
//! The automation handle serializes the live DOM and hands it here, so link
//! discovery sees anchors that client-side rendering inserted.

use scraper::{Html, Selector};
use url::Url;

/// Extracts all navigational hyperlinks from an HTML document
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` anywhere in the document, resolved against `<base href>`
///   when present and against `page_url` otherwise
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` links and data URIs
/// - fragment-only links (same-page anchors)
/// - anything that is not http(s) after resolution
///
/// Links are returned in document order with exact duplicates removed.
///
/// # Example
///
/// ```
/// use vibe_crawler::browser::extract_links;
/// use url::Url;
///
/// let html = r#"<html><body><a href="/about">About</a></body></html>"#;
/// let page = Url::parse("https://example.com/").unwrap();
/// assert_eq!(extract_links(html, &page), vec!["https://example.com/about"]);
/// ```
pub fn extract_links(html: &str, page_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    let base_url = document_base(&document, page_url);

    let mut links: Vec<String> = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            // Skip if it has the download attribute
            if element.value().attr("download").is_some() {
                continue;
            }

            if let Some(href) = element.value().attr("href") {
                if let Some(absolute_url) = resolve_link(href, &base_url) {
                    if !links.contains(&absolute_url) {
                        links.push(absolute_url);
                    }
                }
            }
        }
    }

    links
}

/// Returns the effective base URL of a document
fn document_base(document: &Html, page_url: &Url) -> Url {
    Selector::parse("base[href]")
        .ok()
        .and_then(|selector| {
            document
                .select(&selector)
                .next()
                .and_then(|el| el.value().attr("href"))
                .and_then(|href| page_url.join(href.trim()).ok())
        })
        .unwrap_or_else(|| page_url.clone())
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded.
pub(crate) fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') || is_non_navigational(href) {
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

/// True for hrefs that never lead to a document worth requesting
pub fn is_non_navigational(href: &str) -> bool {
    let lower = href.trim_start().to_ascii_lowercase();
    ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
}
