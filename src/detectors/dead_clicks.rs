//! Dead click detector

use crate::browser::PageHandle;
use crate::detectors::{evaluate_as, Detection, Detector, DetectorResult};
use crate::model::{Bug, Category, Severity};
use async_trait::async_trait;
use serde::Deserialize;

// Elements with a pointer cursor, a button role, a tabindex or an inline
// onclick handler are treated as interactive.
const DEAD_CLICK_SCRIPT: &str = r#"(() => {
    const results = [];
    const els = document.querySelectorAll(
        '[class*="btn"], [class*="button"], [class*="cta"], [class*="click"]'
    );
    for (const el of els) {
        const tag = el.tagName.toLowerCase();
        if (['button', 'a', 'input', 'select', 'textarea'].includes(tag)) continue;
        const style = getComputedStyle(el);
        if (
            style.cursor === 'pointer' ||
            el.getAttribute('role') === 'button' ||
            el.getAttribute('tabindex')
        ) continue;
        if (!el.onclick) {
            results.push({
                tag,
                text: el.innerText?.trim().slice(0, 60) || '',
                html: el.outerHTML.slice(0, 150),
            });
        }
        if (results.length >= 10) break;
    }
    return results;
})()"#;

#[derive(Debug, Deserialize)]
struct SuspectRecord {
    tag: String,
    #[serde(default)]
    text: String,
    #[serde(default)]
    html: String,
}

/// Reports elements styled like buttons that nothing makes clickable
pub struct DeadClickDetector;

#[async_trait]
impl Detector for DeadClickDetector {
    fn name(&self) -> &str {
        "dead_clicks"
    }

    async fn detect(&mut self, page: &mut dyn PageHandle, url: &str) -> DetectorResult<Detection> {
        let suspects: Vec<SuspectRecord> = evaluate_as(page, DEAD_CLICK_SCRIPT).await?;

        let bugs = suspects
            .into_iter()
            .map(|s| {
                Bug::new(
                    url,
                    Category::Ux,
                    Severity::Low,
                    "Possibly non-interactive button-like element",
                    format!(
                        "`{}` with text \"{}\" has a button-like class name but may not be clickable.",
                        s.tag, s.text
                    ),
                )
                .with_extra("html", s.html)
            })
            .collect();

        Ok(Detection::from_bugs(bugs))
    }
}
