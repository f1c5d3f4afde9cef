use crate::UrlError;
use url::Url;

/// Normalizes a URL into the form used for frontier comparison
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Reject schemes other than http and https
/// 3. Reject URLs without a host
/// 4. Remove fragment (everything after #)
/// 5. Remove trailing slashes from the serialized form
///
/// The host is lowercased by the parser. Query strings are kept as-is, so
/// `/search?q=a` and `/search?q=b` remain distinct pages.
///
/// # Examples
///
/// ```
/// use vibe_crawler::url::normalize_url;
///
/// let url = normalize_url("https://EXAMPLE.COM/page/#top").unwrap();
/// assert_eq!(url, "https://example.com/page");
/// ```
pub fn normalize_url(url_str: &str) -> Result<String, UrlError> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);

    Ok(url.as_str().trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_trailing_slash() {
        let result = normalize_url("https://example.com/page/").unwrap();
        assert_eq!(result, "https://example.com/page");
    }

    #[test]
    fn test_root_loses_slash() {
        assert_eq!(
            normalize_url("https://example.com/").unwrap(),
            "https://example.com"
        );
        assert_eq!(
            normalize_url("https://example.com").unwrap(),
            "https://example.com"
        );
    }

    #[test]
    fn test_remove_fragment() {
        let result = normalize_url("https://example.com/page#section").unwrap();
        assert_eq!(result, "https://example.com/page");
    }

    #[test]
    fn test_fragment_and_trailing_slash_collapse() {
        let a = normalize_url("https://example.com/docs/#intro").unwrap();
        let b = normalize_url("https://example.com/docs").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_query_is_kept() {
        let result = normalize_url("https://example.com/search?q=rust#results").unwrap();
        assert_eq!(result, "https://example.com/search?q=rust");
    }

    #[test]
    fn test_lowercase_host() {
        let result = normalize_url("https://EXAMPLE.COM/Page").unwrap();
        assert_eq!(result, "https://example.com/Page");
    }

    #[test]
    fn test_http_scheme_allowed() {
        let result = normalize_url("http://localhost:8080/a/").unwrap();
        assert_eq!(result, "http://localhost:8080/a");
    }

    #[test]
    fn test_invalid_scheme() {
        let result = normalize_url("mailto:someone@example.com");
        assert!(matches!(result.unwrap_err(), UrlError::InvalidScheme(_)));

        let result = normalize_url("ftp://example.com/file");
        assert!(matches!(result.unwrap_err(), UrlError::InvalidScheme(_)));
    }

    #[test]
    fn test_malformed_url() {
        assert!(matches!(
            normalize_url("not a url").unwrap_err(),
            UrlError::Parse(_)
        ));
        assert!(normalize_url("").is_err());
    }

    #[test]
    fn test_surrounding_whitespace_trimmed() {
        let result = normalize_url("  https://example.com/about/  ").unwrap();
        assert_eq!(result, "https://example.com/about");
    }
}
