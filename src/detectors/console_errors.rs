//! Console error and uncaught exception detector

use crate::browser::{ConsoleKind, EventSubscription, PageEvent, PageHandle};
use crate::detectors::{Detection, Detector, DetectorResult};
use crate::model::{Bug, Category, Severity};
use async_trait::async_trait;

/// Reports `console.error` calls and uncaught exceptions seen while a page
/// loaded
///
/// Events are buffered from [`attach`](Detector::attach) onward and drained on
/// every `detect`, so each finding is attributed to the page that was loaded
/// when it fired.
pub struct ConsoleErrorDetector {
    capacity: usize,
    subscription: Option<EventSubscription>,
}

impl ConsoleErrorDetector {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            subscription: None,
        }
    }
}

#[async_trait]
impl Detector for ConsoleErrorDetector {
    fn name(&self) -> &str {
        "console_errors"
    }

    async fn attach(&mut self, page: &mut dyn PageHandle) -> DetectorResult<()> {
        self.subscription = Some(page.subscribe(self.capacity).await?);
        Ok(())
    }

    async fn detect(&mut self, _page: &mut dyn PageHandle, url: &str) -> DetectorResult<Detection> {
        let Some(subscription) = &self.subscription else {
            return Ok(Detection::empty());
        };

        let drained = subscription.drain();
        let mut detection = Detection::empty();

        for event in drained.events {
            match event {
                PageEvent::Console {
                    kind: ConsoleKind::Error,
                    text,
                } => detection.bugs.push(Bug::new(
                    url,
                    Category::Javascript,
                    Severity::Medium,
                    "JS console.error",
                    text,
                )),
                PageEvent::UncaughtError { text } => detection.bugs.push(Bug::new(
                    url,
                    Category::Javascript,
                    Severity::High,
                    "JS unhandled_exception",
                    text,
                )),
                PageEvent::Console { .. } => {}
            }
        }

        if drained.dropped > 0 {
            detection.diagnostics.push(format!(
                "console_errors dropped {} buffered events on {}",
                drained.dropped, url
            ));
        }

        Ok(detection)
    }

    fn reset(&mut self) {
        if let Some(subscription) = &self.subscription {
            subscription.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::testing::StubPage;

    fn console(kind: ConsoleKind, text: &str) -> PageEvent {
        PageEvent::Console {
            kind,
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_maps_events_to_bugs() {
        let mut page = StubPage::default();
        let mut detector = ConsoleErrorDetector::new(10);
        detector.attach(&mut page).await.unwrap();

        let events = page.subscription.clone().unwrap();
        events.push(console(ConsoleKind::Error, "Failed to fetch /api"));
        events.push(console(ConsoleKind::Warning, "deprecated"));
        events.push(PageEvent::UncaughtError {
            text: "TypeError: x is undefined".to_string(),
        });

        let detection = detector.detect(&mut page, "https://example.com").await.unwrap();
        assert_eq!(detection.bugs.len(), 2);

        assert_eq!(detection.bugs[0].title(), "JS console.error");
        assert_eq!(detection.bugs[0].severity(), Severity::Medium);
        assert_eq!(detection.bugs[0].description(), "Failed to fetch /api");

        assert_eq!(detection.bugs[1].title(), "JS unhandled_exception");
        assert_eq!(detection.bugs[1].severity(), Severity::High);
        assert_eq!(detection.bugs[1].category(), Category::Javascript);
        assert!(detection.diagnostics.is_empty());

        // Buffer was drained
        let again = detector.detect(&mut page, "https://example.com/b").await.unwrap();
        assert!(again.is_empty());
    }

    #[tokio::test]
    async fn test_overflowing_buffer_reports_diagnostic() {
        let mut page = StubPage::default();
        let mut detector = ConsoleErrorDetector::new(2);
        detector.attach(&mut page).await.unwrap();

        let events = page.subscription.clone().unwrap();
        for i in 0..5 {
            events.push(console(ConsoleKind::Error, &format!("e{}", i)));
        }

        let detection = detector.detect(&mut page, "https://example.com").await.unwrap();
        assert_eq!(detection.bugs.len(), 2);
        assert_eq!(detection.bugs[0].description(), "e3");
        assert_eq!(detection.diagnostics.len(), 1);
        assert!(detection.diagnostics[0].contains("dropped 3"));
    }

    #[tokio::test]
    async fn test_reset_discards_buffered_events() {
        let mut page = StubPage::default();
        let mut detector = ConsoleErrorDetector::new(10);
        detector.attach(&mut page).await.unwrap();

        page.subscription
            .clone()
            .unwrap()
            .push(console(ConsoleKind::Error, "from failed page"));
        detector.reset();

        let detection = detector.detect(&mut page, "https://example.com/next").await.unwrap();
        assert!(detection.bugs.is_empty());
    }

    #[tokio::test]
    async fn test_unattached_detector_reports_nothing() {
        let mut page = StubPage {
            fail_subscribe: true,
            ..StubPage::default()
        };
        let mut detector = ConsoleErrorDetector::new(10);
        assert!(detector.attach(&mut page).await.is_err());

        let detection = detector.detect(&mut page, "https://example.com").await.unwrap();
        assert!(detection.is_empty());
    }
}
