//! Page automation
//!
//! The crawl core never talks to a browser directly. It drives a
//! [`PageHandle`], which the binary backs with a real Chromium page
//! ([`ChromiumPage`]) and the tests back with a scripted in-memory page.

mod chromium;
mod events;
mod http;
mod links;

pub use chromium::{BrowserSettings, ChromiumPage};
pub use events::{ConsoleKind, DrainedEvents, EventSubscription, PageEvent};
pub use http::{build_status_client, head_status};
pub use links::{extract_links, is_non_navigational};

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors raised by a page automation handle
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("{operation} timed out after {millis}ms")]
    Timeout { operation: String, millis: u64 },

    #[error("Script evaluation failed: {0}")]
    Script(String),

    #[error("Browser protocol error: {0}")]
    Cdp(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Page is closed")]
    Closed,
}

impl From<chromiumoxide::error::CdpError> for BrowserError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        BrowserError::Cdp(err.to_string())
    }
}

/// Result type alias for page automation operations
pub type BrowserResult<T> = std::result::Result<T, BrowserError>;

/// What a completed navigation reported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationOutcome {
    /// HTTP status of the main document, when the engine exposes one
    pub status: Option<u16>,
    /// URL after redirects
    pub final_url: String,
}

impl NavigationOutcome {
    pub fn new(status: Option<u16>, final_url: impl Into<String>) -> Self {
        Self {
            status,
            final_url: final_url.into(),
        }
    }

    /// True when the main document answered with a 4xx or 5xx status
    pub fn is_error_status(&self) -> bool {
        matches!(self.status, Some(s) if s >= 400)
    }
}

/// A single browser page the crawler can drive
///
/// Calls are strictly sequential: the crawler holds the only `&mut` borrow
/// and lends it to one detector at a time.
#[async_trait]
pub trait PageHandle: Send {
    /// Loads `url` and waits for the load event, giving up after `timeout`
    async fn navigate(&mut self, url: &str, timeout: Duration) -> BrowserResult<NavigationOutcome>;

    /// Runs a script in the page and returns its JSON-serialized result
    async fn evaluate(&mut self, script: &str) -> BrowserResult<Value>;

    /// Returns the absolute http(s) targets of every navigational link on the page
    async fn query_links(&mut self) -> BrowserResult<Vec<String>>;

    /// Issues a HEAD request to `url` outside the page and returns the status
    async fn head_request(&mut self, url: &str, timeout: Duration) -> BrowserResult<u16>;

    /// Starts buffering console messages and uncaught errors for the
    /// lifetime of the handle
    async fn subscribe(&mut self, capacity: usize) -> BrowserResult<EventSubscription>;

    /// Releases the page and the browser behind it
    async fn close(&mut self) -> BrowserResult<()>;
}
