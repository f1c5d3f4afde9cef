//! Report sink trait and errors
//!
//! A sink renders a finished [`CrawlResult`] somewhere: the terminal, a JSON
//! file or a self-contained HTML page.

use crate::model::CrawlResult;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("Failed to format output: {0}")]
    Format(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for report sinks
///
/// Sinks only read the result. A failing sink does not affect the others.
pub trait ReportSink {
    /// Short name used in log messages
    fn name(&self) -> &str;

    /// Renders the result to this sink's destination
    fn emit(&self, result: &CrawlResult) -> OutputResult<()>;
}
