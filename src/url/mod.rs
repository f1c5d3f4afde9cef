//! URL handling module for Vibe Crawler
//!
//! This module provides URL normalization, host extraction, and the
//! same-origin scope rule used by the frontier.

mod domain;
mod normalize;

// Re-export main functions
pub use domain::{extract_host, host_of};
pub use normalize::normalize_url;

/// Scope classification of a discovered link relative to the seed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkScope {
    /// Same host as the seed - eligible for crawling
    SameOrigin,
    /// A different host - never crawled
    OffOrigin,
    /// Not an http(s) URL with a host (mailto:, javascript:, garbage)
    Unsupported,
}

impl LinkScope {
    /// Returns true if the link may enter the frontier
    pub fn should_crawl(&self) -> bool {
        matches!(self, Self::SameOrigin)
    }
}

/// Classifies a link against the seed host
///
/// Host equality is exact: subdomains and other schemes on the same host are
/// not relaxed into scope beyond what host comparison gives. Ports are ignored.
///
/// # Examples
///
/// ```
/// use vibe_crawler::url::{classify_link, LinkScope};
///
/// assert_eq!(classify_link("https://example.com/a", "example.com"), LinkScope::SameOrigin);
/// assert_eq!(classify_link("https://cdn.example.com/a", "example.com"), LinkScope::OffOrigin);
/// assert_eq!(classify_link("mailto:x@example.com", "example.com"), LinkScope::Unsupported);
/// ```
pub fn classify_link(candidate: &str, seed_host: &str) -> LinkScope {
    if normalize_url(candidate).is_err() {
        return LinkScope::Unsupported;
    }

    match host_of(candidate) {
        Some(host) if host == seed_host.to_lowercase() => LinkScope::SameOrigin,
        Some(_) => LinkScope::OffOrigin,
        None => LinkScope::Unsupported,
    }
}

/// Returns true if two URLs share a host
pub fn same_origin(a: &str, b: &str) -> bool {
    match (host_of(a), host_of(b)) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}
