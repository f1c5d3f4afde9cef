//! Crawl coordinator that orchestrates the page loop
//!
//! The coordinator is responsible for:
//! - Attaching detectors before the first navigation
//! - Pulling URLs from the frontier in breadth-first order
//! - Running one page session per URL
//! - Honouring the stop flag between pages
//! - Closing the page and freezing the results

use crate::browser::PageHandle;
use crate::config::Config;
use crate::crawler::session::panic_message;
use crate::crawler::{Frontier, PageSession};
use crate::detectors::Detector;
use crate::model::{Aggregator, CrawlResult, DEFAULT_MAX_ERRORS};
use crate::state::SessionState;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Run-level knobs for the crawl loop
#[derive(Debug, Clone)]
pub struct CrawlSettings {
    pub start_url: String,
    pub max_pages: usize,
    pub navigation_timeout: Duration,
    pub settle_delay: Duration,
    pub max_errors: usize,
}

impl CrawlSettings {
    /// Settings with the default budget and timings
    pub fn new(start_url: impl Into<String>) -> Self {
        Self {
            start_url: start_url.into(),
            max_pages: 20,
            navigation_timeout: Duration::from_millis(20_000),
            settle_delay: Duration::from_millis(1_500),
            max_errors: DEFAULT_MAX_ERRORS,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            start_url: config.crawler.start_url.clone(),
            max_pages: config.crawler.max_pages,
            navigation_timeout: Duration::from_millis(config.crawler.navigation_timeout_ms),
            settle_delay: Duration::from_millis(config.crawler.settle_delay_ms),
            max_errors: config.crawler.max_errors,
        }
    }
}

/// Crawler owns the page handle, the detectors and the frontier for one run
pub struct Crawler {
    settings: CrawlSettings,
    page: Box<dyn PageHandle>,
    detectors: Vec<Box<dyn Detector>>,
    frontier: Frontier,
    stop: Arc<AtomicBool>,
}

impl Crawler {
    /// Creates a crawler for `settings.start_url`
    ///
    /// # Errors
    ///
    /// Fails only when the start URL is not an absolute http(s) URL.
    pub fn new(
        settings: CrawlSettings,
        page: Box<dyn PageHandle>,
        detectors: Vec<Box<dyn Detector>>,
    ) -> crate::Result<Self> {
        let frontier = Frontier::new(&settings.start_url, settings.max_pages)?;

        Ok(Self {
            settings,
            page,
            detectors,
            frontier,
            stop: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Uses an externally owned stop flag (e.g. one set by a signal handler)
    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = stop;
        self
    }

    /// Returns a flag that ends the run after the current page when set
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Runs the crawl to completion
    ///
    /// This method:
    /// 1. Attaches every detector to the page
    /// 2. Visits URLs until the frontier is empty, the budget is spent or a
    ///    stop is requested
    /// 3. Closes the page
    /// 4. Returns the frozen results
    ///
    /// Nothing that happens on an individual page aborts the run.
    pub async fn run(mut self) -> CrawlResult {
        tracing::info!(
            "Starting crawl of {} (max {} pages, {} detectors)",
            self.settings.start_url,
            self.settings.max_pages,
            self.detectors.len()
        );

        let start_time = Instant::now();
        let mut aggregator = Aggregator::new(self.settings.start_url.clone(), self.settings.max_errors);

        for detector in self.detectors.iter_mut() {
            if let Err(e) = detector.attach(self.page.as_mut()).await {
                aggregator.record_error(format!(
                    "Detector {} failed to attach: {}",
                    detector.name(),
                    e
                ));
            }
        }

        loop {
            if self.stop.load(Ordering::SeqCst) {
                tracing::info!("Stop requested, ending crawl");
                break;
            }

            let url = match self.frontier.next() {
                Some(url) => url,
                None => {
                    if self.frontier.budget_exhausted() {
                        tracing::info!("Page budget of {} reached", self.settings.max_pages);
                    } else {
                        tracing::info!("Frontier is empty, crawl complete");
                    }
                    break;
                }
            };

            if self.frontier.is_visited(&url) {
                continue;
            }
            self.frontier.mark_visited(&url);

            tracing::info!(
                "[{}/{}] Visiting {}",
                self.frontier.visited_count(),
                self.settings.max_pages,
                url
            );

            let session = PageSession {
                page: self.page.as_mut(),
                detectors: &mut self.detectors,
                frontier: &mut self.frontier,
                aggregator: &mut aggregator,
                settings: &self.settings,
            };

            match session.run(&url).await {
                Ok(SessionState::Done) => {}
                Ok(state) => tracing::debug!("Session for {} ended in {}", url, state),
                Err(e) => {
                    aggregator.record_error(format!("Session for {} aborted: {}", url, e));
                }
            }
        }

        match AssertUnwindSafe(self.page.close()).catch_unwind().await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => aggregator.record_diagnostic(format!("Failed to close page: {}", e)),
            Err(panic) => aggregator.record_diagnostic(format!(
                "Failed to close page: panicked: {}",
                panic_message(panic.as_ref())
            )),
        }

        let result = aggregator.finish(self.frontier.visited_count());

        tracing::info!(
            "Crawl completed: {} pages, {} bugs, {} errors in {:?}",
            result.pages_visited(),
            result.bugs().len(),
            result.errors().len(),
            start_time.elapsed()
        );

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::testing::StubPage;

    #[test]
    fn test_default_settings() {
        let settings = CrawlSettings::new("https://example.com");
        assert_eq!(settings.max_pages, 20);
        assert_eq!(settings.navigation_timeout, Duration::from_secs(20));
        assert_eq!(settings.settle_delay, Duration::from_millis(1500));
        assert_eq!(settings.max_errors, 1000);
    }

    #[test]
    fn test_settings_from_config() {
        let mut config = Config::default();
        config.crawler.start_url = "https://example.com".to_string();
        config.crawler.max_pages = 5;
        config.crawler.settle_delay_ms = 0;

        let settings = CrawlSettings::from_config(&config);
        assert_eq!(settings.start_url, "https://example.com");
        assert_eq!(settings.max_pages, 5);
        assert_eq!(settings.settle_delay, Duration::ZERO);
    }

    #[test]
    fn test_invalid_start_url() {
        let result = Crawler::new(
            CrawlSettings::new("example.com"),
            Box::new(StubPage::default()),
            Vec::new(),
        );
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_stop_flag_set_before_run() {
        let crawler = Crawler::new(
            CrawlSettings::new("https://example.com"),
            Box::new(StubPage::default()),
            Vec::new(),
        )
        .unwrap();
        crawler.stop_handle().store(true, Ordering::SeqCst);

        let result = crawler.run().await;
        assert_eq!(result.pages_visited(), 0);
        assert!(result.errors().is_empty());
    }
}
