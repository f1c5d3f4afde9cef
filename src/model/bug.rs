//! The `Bug` finding type and its severity/category tags

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Descriptions longer than this many characters are cut on construction
pub const MAX_DESCRIPTION_CHARS: usize = 500;

/// How bad a finding is, ordered from most to least severe
///
/// The derived ordering puts `Critical` first, so sorting a list of
/// severities ascending yields the reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Info => "info",
        }
    }

    /// Returns every severity in reporting order
    pub fn all() -> [Self; 5] {
        [
            Self::Critical,
            Self::High,
            Self::Medium,
            Self::Low,
            Self::Info,
        ]
    }

    /// Critical and high findings are the ones a reader should see first
    pub fn is_urgent(&self) -> bool {
        matches!(self, Self::Critical | Self::High)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What kind of defect a finding describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Javascript,
    BrokenLink,
    Layout,
    Accessibility,
    Seo,
    Ux,
    Mobile,
    Http,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Javascript => "javascript",
            Self::BrokenLink => "broken_link",
            Self::Layout => "layout",
            Self::Accessibility => "accessibility",
            Self::Seo => "seo",
            Self::Ux => "ux",
            Self::Mobile => "mobile",
            Self::Http => "http",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single finding on a single page
///
/// Fields are private: a `Bug` does not change after it is built. The
/// `with_*` methods consume the value and return an extended copy, which is
/// how detectors attach optional data while constructing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bug {
    url: String,
    category: Category,
    severity: Severity,
    title: String,
    description: String,
    #[serde(default)]
    selector: Option<String>,
    #[serde(default)]
    extra: BTreeMap<String, Value>,
}

impl Bug {
    /// Creates a finding, truncating the description to
    /// [`MAX_DESCRIPTION_CHARS`] characters
    pub fn new(
        url: impl Into<String>,
        category: Category,
        severity: Severity,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            category,
            severity,
            title: title.into(),
            description: truncate_chars(&description.into(), MAX_DESCRIPTION_CHARS),
            selector: None,
            extra: BTreeMap::new(),
        }
    }

    /// The synthetic finding emitted when the page itself answers with an
    /// error status
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::new(
            url,
            Category::Http,
            Severity::High,
            format!("HTTP {}", status),
            format!("Page returned status {}", status),
        )
    }

    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = Some(selector.into());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn selector(&self) -> Option<&str> {
        self.selector.as_deref()
    }

    pub fn extra(&self) -> &BTreeMap<String, Value> {
        &self.extra
    }
}

/// Cuts a string to at most `max` characters on a char boundary
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
