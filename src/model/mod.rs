//! Bug and report data model
//!
//! - [`Bug`]: one immutable finding
//! - [`Aggregator`]: the mutable collector used while a run is in progress
//! - [`CrawlResult`]: the frozen output of a run
//! - [`Summary`]: counts by severity and category

mod bug;
mod result;
mod summary;

pub use bug::{truncate_chars, Bug, Category, Severity, MAX_DESCRIPTION_CHARS};
pub use result::{Aggregator, CrawlResult, DEFAULT_MAX_ERRORS};
pub use summary::Summary;
