//! Page session runner
//!
//! Drives one URL through navigate, settle, status check, inspection and link
//! discovery. Each stage isolates its own failures so that a broken page or a
//! broken detector only costs the work of that stage.

use crate::browser::PageHandle;
use crate::crawler::{CrawlSettings, Frontier};
use crate::detectors::Detector;
use crate::model::{Aggregator, Bug};
use crate::state::{SessionError, SessionState};
use crate::url::same_origin;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

/// Slack given to a handle's own navigation timeout before the session gives up on it
pub const NAVIGATION_GRACE: Duration = Duration::from_secs(1);

/// Everything one page session works on, borrowed from the run loop
pub struct PageSession<'a> {
    pub page: &'a mut dyn PageHandle,
    pub detectors: &'a mut [Box<dyn Detector>],
    pub frontier: &'a mut Frontier,
    pub aggregator: &'a mut Aggregator,
    pub settings: &'a CrawlSettings,
}

impl<'a> PageSession<'a> {
    /// Runs the session for `url` and returns its terminal state
    ///
    /// # Errors
    ///
    /// Only an illegal state transition fails the session; page and detector
    /// failures are recorded in the aggregator instead.
    pub async fn run(self, url: &str) -> Result<SessionState, SessionError> {
        let PageSession {
            page,
            detectors,
            frontier,
            aggregator,
            settings,
        } = self;

        let mut state = SessionState::Pending.transition(SessionState::Navigating)?;

        // The handle bounds navigation itself; the outer bound only catches a
        // handle that ignores its timeout
        let navigation = tokio::time::timeout(
            settings.navigation_timeout + NAVIGATION_GRACE,
            AssertUnwindSafe(page.navigate(url, settings.navigation_timeout)).catch_unwind(),
        )
        .await;

        let outcome = match navigation {
            Ok(Ok(Ok(outcome))) => outcome,
            Ok(Ok(Err(e))) => {
                aggregator.record_error(format!("Failed to load {}: {}", url, e));
                return fail_navigation(state, detectors);
            }
            Ok(Err(panic)) => {
                aggregator.record_error(format!(
                    "Failed to load {}: panicked: {}",
                    url,
                    panic_message(panic.as_ref())
                ));
                return fail_navigation(state, detectors);
            }
            Err(_) => {
                aggregator.record_error(format!(
                    "Failed to load {}: navigation timed out after {}ms",
                    url,
                    settings.navigation_timeout.as_millis()
                ));
                return fail_navigation(state, detectors);
            }
        };

        if outcome.final_url != url {
            if same_origin(url, &outcome.final_url) {
                tracing::debug!("{} settled at {}", url, outcome.final_url);
            } else {
                tracing::warn!("{} redirected off-origin to {}", url, outcome.final_url);
            }
        }

        state = state.transition(SessionState::Settling)?;
        if !settings.settle_delay.is_zero() {
            tokio::time::sleep(settings.settle_delay).await;
        }

        state = state.transition(SessionState::StatusChecked)?;
        if let Some(status) = outcome.status.filter(|_| outcome.is_error_status()) {
            aggregator.record_bug(Bug::http_status(url, status));
        }

        state = state.transition(SessionState::Inspecting)?;
        for detector in detectors.iter_mut() {
            run_detector(detector.as_mut(), &mut *page, url, aggregator).await;
        }

        state = state.transition(SessionState::LinkDiscovery)?;
        match AssertUnwindSafe(page.query_links()).catch_unwind().await {
            Ok(Ok(links)) => {
                let found = links.len();
                let accepted = frontier.offer(links);
                tracing::debug!("{}: {} links, {} newly queued", url, found, accepted);
            }
            Ok(Err(e)) => aggregator.record_diagnostic(format!("Link discovery failed on {}: {}", url, e)),
            Err(panic) => aggregator.record_diagnostic(format!(
                "Link discovery failed on {}: panicked: {}",
                url,
                panic_message(panic.as_ref())
            )),
        }

        state.transition(SessionState::Done)
    }
}

fn fail_navigation(
    state: SessionState,
    detectors: &mut [Box<dyn Detector>],
) -> Result<SessionState, SessionError> {
    for detector in detectors.iter_mut() {
        detector.reset();
    }
    state.transition(SessionState::FailedNavigation)
}

/// Runs one detector, turning errors and panics into recorded errors
async fn run_detector(
    detector: &mut dyn Detector,
    page: &mut dyn PageHandle,
    url: &str,
    aggregator: &mut Aggregator,
) {
    let name = detector.name().to_string();

    match AssertUnwindSafe(detector.detect(page, url)).catch_unwind().await {
        Ok(Ok(detection)) => {
            tracing::debug!("Detector {} found {} bugs on {}", name, detection.bugs.len(), url);
            aggregator.record_bugs(detection.bugs);
            for diagnostic in detection.diagnostics {
                aggregator.record_diagnostic(diagnostic);
            }
        }
        Ok(Err(e)) => {
            aggregator.record_error(format!("Detector {} failed on {}: {}", name, url, e));
        }
        Err(panic) => {
            aggregator.record_error(format!(
                "Detector {} failed on {}: panicked: {}",
                name,
                url,
                panic_message(panic.as_ref())
            ));
        }
    }
}

pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
