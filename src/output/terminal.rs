//! Terminal report
//!
//! Findings grouped by severity (most severe first), then crawler errors.

use crate::model::{truncate_chars, CrawlResult, Severity};
use crate::output::traits::{OutputResult, ReportSink};
use std::fmt::Write as _;

/// Descriptions and errors are cut to this many characters on screen
pub const TERMINAL_TEXT_CHARS: usize = 120;

const RULE_WIDTH: usize = 60;

fn severity_icon(severity: Severity) -> &'static str {
    if severity.is_urgent() {
        "🔴"
    } else if severity == Severity::Medium {
        "🟡"
    } else {
        "🔵"
    }
}

/// Formats a crawl result for the terminal
pub fn format_report(result: &CrawlResult) -> String {
    let mut out = String::new();
    let rule = "=".repeat(RULE_WIDTH);

    // Writing to a String cannot fail
    let _ = writeln!(out, "\n{}", rule);
    let _ = writeln!(out, "  VIBE CRAWLER REPORT - {}", result.start_url());
    let _ = writeln!(out, "  Pages visited: {}", result.pages_visited());
    let _ = writeln!(out, "  Bugs found:    {}", result.bugs().len());
    let _ = writeln!(out, "{}", rule);

    for severity in Severity::all() {
        let bugs: Vec<_> = result
            .bugs()
            .iter()
            .filter(|b| b.severity() == severity)
            .collect();
        if bugs.is_empty() {
            continue;
        }

        let _ = writeln!(
            out,
            "\n{} {} ({})",
            severity_icon(severity),
            severity.as_str().to_uppercase(),
            bugs.len()
        );
        for bug in bugs {
            let _ = writeln!(out, "  [{}] {}", bug.category(), bug.title());
            let _ = writeln!(out, "    URL: {}", bug.url());
            let _ = writeln!(
                out,
                "    {}",
                truncate_chars(bug.description(), TERMINAL_TEXT_CHARS)
            );
        }
    }

    if !result.errors().is_empty() {
        let _ = writeln!(out, "\n⚠️  CRAWLER ERRORS ({})", result.errors().len());
        for err in result.errors() {
            let _ = writeln!(out, "  {}", truncate_chars(err, TERMINAL_TEXT_CHARS));
        }
        if result.dropped_errors() > 0 {
            let _ = writeln!(out, "  ... and {} more not stored", result.dropped_errors());
        }
    }

    out
}

/// Prints the report to stdout
pub fn print_report(result: &CrawlResult) {
    println!("{}", format_report(result));
}

/// Sink that prints the terminal report
#[derive(Debug, Default)]
pub struct TerminalSink;

impl ReportSink for TerminalSink {
    fn name(&self) -> &str {
        "terminal"
    }

    fn emit(&self, result: &CrawlResult) -> OutputResult<()> {
        print_report(result);
        Ok(())
    }
}
