//! JSON report

use crate::model::{Bug, CrawlResult, Summary};
use crate::output::traits::{OutputResult, ReportSink};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Name written into every report's `tool` field
pub const TOOL_NAME: &str = "Vibe Crawler";

/// Serialized form of a crawl result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonReport {
    pub tool: String,
    pub start_url: String,
    pub pages_visited: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub summary: Summary,
    pub bugs: Vec<Bug>,
    pub errors: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub dropped_errors: usize,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

impl JsonReport {
    pub fn from_result(result: &CrawlResult) -> Self {
        Self {
            tool: TOOL_NAME.to_string(),
            start_url: result.start_url().to_string(),
            pages_visited: result.pages_visited(),
            started_at: result.started_at(),
            finished_at: result.finished_at(),
            summary: result.summary(),
            bugs: result.bugs().to_vec(),
            errors: result.errors().to_vec(),
            diagnostics: result.diagnostics().to_vec(),
            dropped_errors: result.dropped_errors(),
        }
    }
}

/// Formats a crawl result as pretty-printed JSON
pub fn format_json_report(result: &CrawlResult) -> OutputResult<String> {
    Ok(serde_json::to_string_pretty(&JsonReport::from_result(result))?)
}

/// Writes the JSON report to `output_path`
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(OutputError)` - Failed to serialize or write the report
pub fn write_json_report(result: &CrawlResult, output_path: &Path) -> OutputResult<()> {
    let json = format_json_report(result)?;

    let mut file = File::create(output_path)?;
    file.write_all(json.as_bytes())?;
    file.write_all(b"\n")?;

    tracing::info!("JSON report saved to {}", output_path.display());
    Ok(())
}

/// Sink that writes the JSON report to a file
#[derive(Debug, Clone)]
pub struct JsonSink {
    path: PathBuf,
}

impl JsonSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ReportSink for JsonSink {
    fn name(&self) -> &str {
        "json"
    }

    fn emit(&self, result: &CrawlResult) -> OutputResult<()> {
        write_json_report(result, &self.path)
    }
}
