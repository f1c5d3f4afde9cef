//! Page detectors
//!
//! A detector inspects one loaded page and reports what it found as a
//! [`Detection`]. Detectors are registered once per run and called in
//! registration order for every page that navigated successfully.
//!
//! Built-in detectors:
//! - `console_errors`: console errors and uncaught exceptions
//! - `broken_links`: links whose target answers 4xx/5xx
//! - `overflow`: elements with horizontal overflow
//! - `accessibility`: missing alt text, labels, names and `lang`
//! - `meta_seo`: title, description, viewport, favicon, `<h1>`
//! - `dead_clicks`: button-like elements that are not interactive
//! - `mobile_responsiveness`: layout problems on narrow viewports

mod accessibility;
mod broken_links;
mod console_errors;
mod dead_clicks;
mod meta_seo;
mod mobile;
mod overflow;

#[cfg(test)]
pub(crate) mod testing;

pub use accessibility::AccessibilityDetector;
pub use broken_links::{BrokenLinkDetector, MAX_LINKS_PER_PAGE};
pub use console_errors::ConsoleErrorDetector;
pub use dead_clicks::DeadClickDetector;
pub use meta_seo::MetaSeoDetector;
pub use mobile::MobileResponsivenessDetector;
pub use overflow::OverflowDetector;

use crate::browser::{BrowserError, PageHandle};
use crate::config::Config;
use crate::model::Bug;
use crate::VibeError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Errors a detector can return from `attach` or `detect`
#[derive(Debug, Error)]
pub enum DetectorError {
    #[error(transparent)]
    Browser(#[from] BrowserError),

    #[error("Unexpected script result: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    Failed(String),
}

/// Result type alias for detector operations
pub type DetectorResult<T> = std::result::Result<T, DetectorError>;

/// What one detector found on one page
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Detection {
    pub bugs: Vec<Bug>,
    /// Soft failures worth keeping that are not findings (skipped checks,
    /// dropped events)
    pub diagnostics: Vec<String>,
}

impl Detection {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_bugs(bugs: Vec<Bug>) -> Self {
        Self {
            bugs,
            diagnostics: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bugs.is_empty() && self.diagnostics.is_empty()
    }
}

/// A pluggable page inspector
///
/// One instance lives for the whole run. Any per-page state must be cleared
/// inside `detect` (and in `reset`, which the crawler calls when a page visit
/// ends without `detect`).
#[async_trait]
pub trait Detector: Send {
    /// Stable identifier, used in configuration and error messages
    fn name(&self) -> &str;

    /// Hooks into the page before the first navigation
    async fn attach(&mut self, _page: &mut dyn PageHandle) -> DetectorResult<()> {
        Ok(())
    }

    /// Inspects the currently loaded page
    async fn detect(&mut self, page: &mut dyn PageHandle, url: &str) -> DetectorResult<Detection>;

    /// Discards per-page state gathered for a page that was never inspected
    fn reset(&mut self) {}
}

/// Runs `script` and decodes its result, treating `null`/`undefined` as empty
pub(crate) async fn evaluate_as<T>(page: &mut dyn PageHandle, script: &str) -> DetectorResult<T>
where
    T: DeserializeOwned + Default,
{
    match page.evaluate(script).await? {
        Value::Null => Ok(T::default()),
        value => Ok(serde_json::from_value(value)?),
    }
}

/// Tunables shared by the built-in detectors
#[derive(Debug, Clone)]
pub struct DetectorOptions {
    /// Per-request timeout for link HEAD checks
    pub link_check_timeout: Duration,
    /// Buffered console events kept between two inspections
    pub event_buffer_capacity: usize,
}

impl DetectorOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            link_check_timeout: Duration::from_millis(config.crawler.link_check_timeout_ms),
            event_buffer_capacity: config.browser.event_buffer_capacity,
        }
    }
}

impl Default for DetectorOptions {
    fn default() -> Self {
        Self {
            link_check_timeout: Duration::from_millis(8000),
            event_buffer_capacity: 200,
        }
    }
}

/// The built-in detector set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetectorKind {
    ConsoleErrors,
    BrokenLinks,
    Overflow,
    Accessibility,
    MetaSeo,
    DeadClicks,
    MobileResponsiveness,
}

impl DetectorKind {
    /// Every built-in detector in default registration order
    pub fn all() -> [DetectorKind; 7] {
        [
            DetectorKind::ConsoleErrors,
            DetectorKind::BrokenLinks,
            DetectorKind::Overflow,
            DetectorKind::Accessibility,
            DetectorKind::MetaSeo,
            DetectorKind::DeadClicks,
            DetectorKind::MobileResponsiveness,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            DetectorKind::ConsoleErrors => "console_errors",
            DetectorKind::BrokenLinks => "broken_links",
            DetectorKind::Overflow => "overflow",
            DetectorKind::Accessibility => "accessibility",
            DetectorKind::MetaSeo => "meta_seo",
            DetectorKind::DeadClicks => "dead_clicks",
            DetectorKind::MobileResponsiveness => "mobile_responsiveness",
        }
    }

    pub fn from_name(name: &str) -> Option<DetectorKind> {
        DetectorKind::all().into_iter().find(|k| k.name() == name)
    }

    /// Creates a fresh instance of this detector
    pub fn build(&self, options: &DetectorOptions) -> Box<dyn Detector> {
        match self {
            DetectorKind::ConsoleErrors => {
                Box::new(ConsoleErrorDetector::new(options.event_buffer_capacity))
            }
            DetectorKind::BrokenLinks => {
                Box::new(BrokenLinkDetector::new(options.link_check_timeout))
            }
            DetectorKind::Overflow => Box::new(OverflowDetector),
            DetectorKind::Accessibility => Box::new(AccessibilityDetector),
            DetectorKind::MetaSeo => Box::new(MetaSeoDetector),
            DetectorKind::DeadClicks => Box::new(DeadClickDetector),
            DetectorKind::MobileResponsiveness => Box::new(MobileResponsivenessDetector),
        }
    }
}

impl fmt::Display for DetectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for DetectorKind {
    type Err = VibeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DetectorKind::from_name(s.trim()).ok_or_else(|| VibeError::UnknownDetector(s.to_string()))
    }
}

/// Builds detectors for the given names, in the given order
///
/// # Errors
///
/// Returns `VibeError::UnknownDetector` for the first name that is not a
/// built-in detector.
pub fn build_detectors<S: AsRef<str>>(
    names: &[S],
    options: &DetectorOptions,
) -> crate::Result<Vec<Box<dyn Detector>>> {
    names
        .iter()
        .map(|name| name.as_ref().parse::<DetectorKind>().map(|kind| kind.build(options)))
        .collect()
}
