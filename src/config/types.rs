use crate::detectors::DetectorKind;
use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure for Vibe Crawler
///
/// Every section is optional in the TOML file; missing values take their
/// defaults. `start-url` has no useful default and must come from either the
/// file or the command line.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub browser: BrowserConfig,
    pub detectors: DetectorsConfig,
    pub output: OutputConfig,
}

/// Crawl budget and timing configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Seed URL; its host bounds the crawl
    #[serde(rename = "start-url")]
    pub start_url: String,

    /// Maximum number of pages to visit
    #[serde(rename = "max-pages")]
    pub max_pages: usize,

    /// Upper bound on a single navigation (milliseconds)
    #[serde(rename = "navigation-timeout-ms")]
    pub navigation_timeout_ms: u64,

    /// Pause after load before inspecting, for client-side rendering (milliseconds)
    #[serde(rename = "settle-delay-ms")]
    pub settle_delay_ms: u64,

    /// Per-request timeout for link HEAD checks (milliseconds)
    #[serde(rename = "link-check-timeout-ms")]
    pub link_check_timeout_ms: u64,

    /// Operational errors kept in the report before further ones are only counted
    #[serde(rename = "max-errors")]
    pub max_errors: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            start_url: String::new(),
            max_pages: 20,
            navigation_timeout_ms: 20_000,
            settle_delay_ms: 1_500,
            link_check_timeout_ms: 8_000,
            max_errors: 1_000,
        }
    }
}

/// Browser launch configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BrowserConfig {
    pub headless: bool,

    /// Path to a Chromium binary; auto-detected when unset
    pub executable: Option<PathBuf>,

    /// Console events buffered between two pages
    pub event_buffer_capacity: usize,

    pub viewport: ViewportConfig,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            executable: None,
            event_buffer_capacity: 200,
            viewport: ViewportConfig::default(),
        }
    }
}

/// Page viewport in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 800,
        }
    }
}

/// Which detectors run, in order
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DetectorsConfig {
    pub enabled: Vec<String>,
}

impl Default for DetectorsConfig {
    fn default() -> Self {
        Self {
            enabled: DetectorKind::all()
                .iter()
                .map(|kind| kind.name().to_string())
                .collect(),
        }
    }
}

/// Report output configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the JSON report
    #[serde(rename = "json-path")]
    pub json_path: PathBuf,

    /// Path of the HTML report
    #[serde(rename = "html-path")]
    pub html_path: PathBuf,

    /// Which file reports to write
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            json_path: PathBuf::from("report.json"),
            html_path: PathBuf::from("report.html"),
            format: OutputFormat::Both,
        }
    }
}

/// File report selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Html,
    #[default]
    Both,
}

impl OutputFormat {
    pub fn writes_json(&self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::Both)
    }

    pub fn writes_html(&self) -> bool {
        matches!(self, OutputFormat::Html | OutputFormat::Both)
    }
}
