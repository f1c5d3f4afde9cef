//! Broken link detector

use crate::browser::{is_non_navigational, PageHandle};
use crate::detectors::{evaluate_as, Detection, Detector, DetectorResult};
use crate::model::{Bug, Category, Severity};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// Links checked per page; the rest are ignored
pub const MAX_LINKS_PER_PAGE: usize = 50;

const LINKS_SCRIPT: &str = r#"(() => Array.from(document.querySelectorAll('a[href]')).map(e => ({
    href: e.href,
    text: (e.innerText || '').trim().slice(0, 80),
})))()"#;

#[derive(Debug, Deserialize)]
struct LinkRecord {
    #[serde(default)]
    href: String,
    #[serde(default)]
    text: String,
}

/// Sends a HEAD request to each link target and reports 4xx/5xx answers
///
/// Probe failures (timeouts, refused connections) are common on external
/// sites and are kept as diagnostics, not findings.
pub struct BrokenLinkDetector {
    timeout: Duration,
}

impl BrokenLinkDetector {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl Detector for BrokenLinkDetector {
    fn name(&self) -> &str {
        "broken_links"
    }

    async fn detect(&mut self, page: &mut dyn PageHandle, url: &str) -> DetectorResult<Detection> {
        let links: Vec<LinkRecord> = evaluate_as(page, LINKS_SCRIPT).await?;
        let mut detection = Detection::empty();

        for link in links.into_iter().take(MAX_LINKS_PER_PAGE) {
            if link.href.is_empty() || is_non_navigational(&link.href) {
                continue;
            }

            match page.head_request(&link.href, self.timeout).await {
                Ok(status) if status >= 400 => {
                    let severity = if status >= 500 {
                        Severity::High
                    } else {
                        Severity::Medium
                    };
                    detection.bugs.push(
                        Bug::new(
                            url,
                            Category::BrokenLink,
                            severity,
                            format!("Broken link ({})", status),
                            format!("Link \"{}\" → {} returned {}", link.text, link.href, status),
                        )
                        .with_extra("status", status)
                        .with_extra("target", link.href.clone()),
                    );
                }
                Ok(_) => {}
                Err(e) => detection
                    .diagnostics
                    .push(format!("Link check skipped for {} on {}: {}", link.href, url, e)),
            }
        }

        Ok(detection)
    }
}
