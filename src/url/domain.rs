use url::Url;

/// Extracts the host from a URL
///
/// The host is lowercased and the port is not part of it, so
/// `https://example.com:8443/` and `https://example.com/` share a host.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use vibe_crawler::url::extract_host;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_host(&url), Some("example.com".to_string()));
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Parses a URL string and extracts its host
///
/// Returns `None` when the string does not parse or has no host.
pub fn host_of(url_str: &str) -> Option<String> {
    Url::parse(url_str.trim())
        .ok()
        .as_ref()
        .and_then(extract_host)
}
