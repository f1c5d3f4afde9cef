//! Run-level aggregation of findings and operational failures

use crate::model::{Bug, Summary};
use chrono::{DateTime, Utc};

/// Default cap on stored operational errors
pub const DEFAULT_MAX_ERRORS: usize = 1000;

/// Collects findings and failures while a crawl is running
///
/// The aggregator is the only mutable view of a run's results. Calling
/// [`Aggregator::finish`] consumes it and yields the read-only [`CrawlResult`].
#[derive(Debug)]
pub struct Aggregator {
    start_url: String,
    bugs: Vec<Bug>,
    errors: Vec<String>,
    diagnostics: Vec<String>,
    dropped_errors: usize,
    max_errors: usize,
    started_at: DateTime<Utc>,
}

impl Aggregator {
    /// Starts a new aggregation, stamping the start time
    pub fn new(start_url: impl Into<String>, max_errors: usize) -> Self {
        Self {
            start_url: start_url.into(),
            bugs: Vec::new(),
            errors: Vec::new(),
            diagnostics: Vec::new(),
            dropped_errors: 0,
            max_errors,
            started_at: Utc::now(),
        }
    }

    pub fn record_bug(&mut self, bug: Bug) {
        self.bugs.push(bug);
    }

    pub fn record_bugs(&mut self, bugs: impl IntoIterator<Item = Bug>) {
        self.bugs.extend(bugs);
    }

    /// Records an operational failure
    ///
    /// Returns false when the error cap is reached; the error is then only
    /// counted in `dropped_errors`.
    pub fn record_error(&mut self, message: impl Into<String>) -> bool {
        let message = message.into();
        if self.errors.len() >= self.max_errors {
            self.dropped_errors += 1;
            tracing::warn!("Error cap reached, dropping: {}", message);
            return false;
        }
        tracing::warn!("{}", message);
        self.errors.push(message);
        true
    }

    /// Records a soft failure that is worth keeping but is not an error
    pub fn record_diagnostic(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!("{}", message);
        self.diagnostics.push(message);
    }

    pub fn bugs(&self) -> &[Bug] {
        &self.bugs
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    /// Freezes the run, stamping the finish time
    pub fn finish(self, pages_visited: usize) -> CrawlResult {
        CrawlResult {
            start_url: self.start_url,
            pages_visited,
            bugs: self.bugs,
            errors: self.errors,
            diagnostics: self.diagnostics,
            dropped_errors: self.dropped_errors,
            started_at: self.started_at,
            finished_at: Utc::now(),
        }
    }
}

/// The complete output of one crawl run
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlResult {
    start_url: String,
    pages_visited: usize,
    bugs: Vec<Bug>,
    errors: Vec<String>,
    diagnostics: Vec<String>,
    dropped_errors: usize,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
}

impl CrawlResult {
    pub fn start_url(&self) -> &str {
        &self.start_url
    }

    pub fn pages_visited(&self) -> usize {
        self.pages_visited
    }

    /// Findings in discovery order
    pub fn bugs(&self) -> &[Bug] {
        &self.bugs
    }

    /// Operational failures in the order they happened
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    /// Errors that were not stored because the cap was reached
    pub fn dropped_errors(&self) -> usize {
        self.dropped_errors
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn finished_at(&self) -> DateTime<Utc> {
        self.finished_at
    }

    pub fn summary(&self) -> Summary {
        Summary::from_bugs(&self.bugs)
    }

    /// Findings on one page, in discovery order
    pub fn bugs_for<'a>(&'a self, url: &'a str) -> impl Iterator<Item = &'a Bug> + 'a {
        self.bugs.iter().filter(move |b| b.url() == url)
    }
}
