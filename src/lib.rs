//! Vibe Crawler: an automated first-pass QA sweep for websites
//!
//! This crate explores the same-origin pages of a site breadth-first from a seed
//! URL, runs a set of pluggable page detectors against each one in a live
//! browser page, and aggregates what they find into a single defect report.

pub mod browser;
pub mod config;
pub mod crawler;
pub mod detectors;
pub mod model;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for fatal Vibe Crawler failures
///
/// Per-page problems never surface here: they are recorded inside the
/// [`model::CrawlResult`]. These variants only describe failures that prevent
/// a run from starting or its report from being written.
#[derive(Debug, Error)]
pub enum VibeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Browser error: {0}")]
    Browser(#[from] browser::BrowserError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("Report output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Unknown detector: {0}")]
    UnknownDetector(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Vibe Crawler operations
pub type Result<T> = std::result::Result<T, VibeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use browser::{ChromiumPage, PageHandle};
pub use config::Config;
pub use crawler::{crawl, Crawler, CrawlSettings, Frontier};
pub use detectors::{Detection, Detector, DetectorKind};
pub use model::{Bug, Category, CrawlResult, Severity, Summary};
pub use state::SessionState;
pub use url::{extract_host, normalize_url, same_origin};
