//! Crawler module for page visiting and inspection
//!
//! This module contains the core crawling logic, including:
//! - The breadth-first, same-origin frontier
//! - The per-page session runner
//! - Overall crawl coordination

mod coordinator;
mod scheduler;
mod session;

pub use coordinator::{CrawlSettings, Crawler};
pub use scheduler::Frontier;
pub use session::PageSession;

use crate::browser::{BrowserSettings, ChromiumPage};
use crate::config::Config;
use crate::detectors::{build_detectors, DetectorOptions};
use crate::model::CrawlResult;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Runs a complete crawl against a real browser
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the configured detectors
/// 2. Launch Chromium with the configured viewport
/// 3. Crawl until the frontier is empty, the budget is spent or `stop` is set
///
/// # Errors
///
/// Only startup failures are returned: an unknown detector name, an invalid
/// start URL, or a browser that fails to launch.
pub async fn crawl(config: &Config, stop: Arc<AtomicBool>) -> crate::Result<CrawlResult> {
    let options = DetectorOptions::from_config(config);
    let detectors = build_detectors(&config.detectors.enabled, &options)?;

    let page = ChromiumPage::launch(&BrowserSettings::from_config(config)).await?;

    let crawler = Crawler::new(CrawlSettings::from_config(config), Box::new(page), detectors)?
        .with_stop_flag(stop);

    Ok(crawler.run().await)
}
