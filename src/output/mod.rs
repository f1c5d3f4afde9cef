//! Output module for rendering crawl reports
//!
//! This module handles:
//! - Printing the grouped report to the terminal
//! - Writing the machine-readable JSON report
//! - Writing the self-contained HTML report

mod html;
mod json;
mod terminal;
mod traits;

pub use html::{escape_html, format_html_report, write_html_report, HtmlSink};
pub use json::{format_json_report, write_json_report, JsonReport, JsonSink, TOOL_NAME};
pub use terminal::{format_report, print_report, TerminalSink, TERMINAL_TEXT_CHARS};
pub use traits::{OutputError, OutputResult, ReportSink};

use crate::config::OutputConfig;
use crate::model::CrawlResult;

/// Builds the file sinks selected by the output configuration
pub fn build_sinks(output: &OutputConfig) -> Vec<Box<dyn ReportSink>> {
    let mut sinks: Vec<Box<dyn ReportSink>> = Vec::new();
    if output.format.writes_json() {
        sinks.push(Box::new(JsonSink::new(&output.json_path)));
    }
    if output.format.writes_html() {
        sinks.push(Box::new(HtmlSink::new(&output.html_path)));
    }
    sinks
}

/// Hands the result to every sink in order
///
/// A failing sink is logged and does not stop the remaining ones. Returns the
/// names of the sinks that failed.
pub fn emit_all(sinks: &[Box<dyn ReportSink>], result: &CrawlResult) -> Vec<String> {
    let mut failed = Vec::new();
    for sink in sinks {
        if let Err(e) = sink.emit(result) {
            tracing::error!("Failed to write {} report: {}", sink.name(), e);
            failed.push(sink.name().to_string());
        }
    }
    failed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use crate::model::{Aggregator, DEFAULT_MAX_ERRORS};
    use tempfile::TempDir;

    fn output_in(dir: &TempDir, format: OutputFormat) -> OutputConfig {
        OutputConfig {
            json_path: dir.path().join("report.json"),
            html_path: dir.path().join("report.html"),
            format,
        }
    }

    #[test]
    fn test_build_sinks_honors_format() {
        let dir = TempDir::new().unwrap();
        let names = |format| -> Vec<String> {
            build_sinks(&output_in(&dir, format))
                .iter()
                .map(|s| s.name().to_string())
                .collect()
        };

        assert_eq!(names(OutputFormat::Json), vec!["json"]);
        assert_eq!(names(OutputFormat::Html), vec!["html"]);
        assert_eq!(names(OutputFormat::Both), vec!["json", "html"]);
    }

    #[test]
    fn test_failing_sink_does_not_stop_others() {
        let dir = TempDir::new().unwrap();
        let mut output = output_in(&dir, OutputFormat::Both);
        output.json_path = dir.path().join("missing").join("report.json");

        let result = Aggregator::new("https://example.com", DEFAULT_MAX_ERRORS).finish(0);
        let failed = emit_all(&build_sinks(&output), &result);

        assert_eq!(failed, vec!["json"]);
        assert!(output.html_path.exists());
    }
}
