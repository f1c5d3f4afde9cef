//! Accessibility detector

use crate::browser::PageHandle;
use crate::detectors::{evaluate_as, Detection, Detector, DetectorResult};
use crate::model::{Bug, Category, Severity};
use async_trait::async_trait;
use serde::Deserialize;

const ACCESSIBILITY_SCRIPT: &str = r#"(() => {
    const problems = [];

    document.querySelectorAll('img:not([alt])').forEach(img => {
        problems.push({
            type: 'img_no_alt',
            detail: img.src?.slice(0, 120) || '(no src)',
        });
    });

    document.querySelectorAll('button, a[href]').forEach(el => {
        const text = (el.innerText || '').trim();
        const ariaLabel = el.getAttribute('aria-label') || '';
        const title = el.getAttribute('title') || '';
        if (!text && !ariaLabel && !title) {
            problems.push({
                type: 'empty_interactive',
                detail: el.outerHTML.slice(0, 150),
            });
        }
    });

    if (!document.documentElement.getAttribute('lang')) {
        problems.push({
            type: 'no_lang',
            detail: '<html> missing lang attribute',
        });
    }

    document.querySelectorAll('input:not([type=hidden]), textarea, select').forEach(el => {
        const id = el.id;
        const ariaLabel = el.getAttribute('aria-label');
        const ariaLabelledBy = el.getAttribute('aria-labelledby');
        const hasLabel = id && document.querySelector('label[for="' + id + '"]');
        if (!hasLabel && !ariaLabel && !ariaLabelledBy) {
            problems.push({
                type: 'input_no_label',
                detail: el.outerHTML.slice(0, 150),
            });
        }
    });

    return problems.slice(0, 30);
})()"#;

#[derive(Debug, Deserialize)]
struct IssueRecord {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    detail: String,
}

/// Maps an issue type to its title and severity
fn classify(kind: &str) -> (String, Severity) {
    match kind {
        "img_no_alt" => ("Image missing alt text".to_string(), Severity::Medium),
        "empty_interactive" => (
            "Interactive element has no accessible name".to_string(),
            Severity::Medium,
        ),
        "no_lang" => ("Missing lang attribute on <html>".to_string(), Severity::Low),
        "input_no_label" => (
            "Form input missing associated label".to_string(),
            Severity::Medium,
        ),
        other => (other.to_string(), Severity::Low),
    }
}

/// Reports missing alt text, unnamed controls, unlabeled inputs and a
/// missing document language (up to 30 issues per page)
pub struct AccessibilityDetector;

#[async_trait]
impl Detector for AccessibilityDetector {
    fn name(&self) -> &str {
        "accessibility"
    }

    async fn detect(&mut self, page: &mut dyn PageHandle, url: &str) -> DetectorResult<Detection> {
        let issues: Vec<IssueRecord> = evaluate_as(page, ACCESSIBILITY_SCRIPT).await?;

        let bugs = issues
            .into_iter()
            .map(|issue| {
                let (title, severity) = classify(&issue.kind);
                Bug::new(url, Category::Accessibility, severity, title, issue.detail)
            })
            .collect();

        Ok(Detection::from_bugs(bugs))
    }
}
