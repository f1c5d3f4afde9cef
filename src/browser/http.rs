//! HTTP status checks for link targets
//!
//! Broken-link checks issue HEAD requests outside the browser page so that a
//! slow target never blocks the page itself.

use crate::browser::BrowserError;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;

/// Builds the HTTP client used for HEAD checks
///
/// Redirects are followed (up to 10 hops) so a moved page reports the status
/// of its final destination rather than a 301.
pub fn build_status_client(user_agent: &str) -> Result<Client, BrowserError> {
    Client::builder()
        .user_agent(user_agent)
        .connect_timeout(Duration::from_secs(5))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
        .map_err(|e| BrowserError::Http(e.to_string()))
}

/// Sends a HEAD request and returns the response status code
///
/// # Errors
///
/// | Condition | Result |
/// |-----------|--------|
/// | Response received (any status) | `Ok(status)` |
/// | No response within `timeout` | `BrowserError::Timeout` |
/// | Connection refused, DNS, TLS | `BrowserError::Http` |
pub async fn head_status(client: &Client, url: &str, timeout: Duration) -> Result<u16, BrowserError> {
    match client.head(url).timeout(timeout).send().await {
        Ok(response) => Ok(response.status().as_u16()),
        Err(e) if e.is_timeout() => Err(BrowserError::Timeout {
            operation: format!("HEAD {}", url),
            millis: timeout.as_millis() as u64,
        }),
        Err(e) => Err(BrowserError::Http(format!("HEAD {} failed: {}", url, e))),
    }
}
