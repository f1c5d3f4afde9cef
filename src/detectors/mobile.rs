//! Mobile responsiveness detector
//!
//! Evaluates the page at the configured viewport. For a phone-sized sweep run
//! the crawler with a narrow viewport such as 375x812.

use crate::browser::PageHandle;
use crate::detectors::{evaluate_as, Detection, Detector, DetectorResult};
use crate::model::{Bug, Category, Severity};
use async_trait::async_trait;
use serde::Deserialize;

const MOBILE_SCRIPT: &str = r#"(() => {
    const problems = [];
    const vw = window.innerWidth;

    for (const el of document.querySelectorAll('*')) {
        const rect = el.getBoundingClientRect();
        if (rect.width > vw + 5 && rect.width > 0) {
            const tag = el.tagName.toLowerCase();
            if (['html', 'body'].includes(tag)) continue;
            const id = el.id ? '#' + el.id : '';
            const cls = el.className && typeof el.className === 'string'
                ? '.' + el.className.trim().split(/\s+/).slice(0, 2).join('.')
                : '';
            problems.push({
                type: 'wider_than_viewport',
                selector: tag + id + cls,
                elementWidth: Math.round(rect.width),
                viewportWidth: vw,
            });
            if (problems.length >= 15) break;
        }
    }

    document.querySelectorAll('[style*="width"]').forEach(el => {
        const style = el.getAttribute('style') || '';
        const match = style.match(/width:\s*(\d+)px/);
        if (match && parseInt(match[1]) > vw) {
            problems.push({
                type: 'fixed_width_overflow',
                selector: el.tagName.toLowerCase(),
                detail: style.slice(0, 100),
            });
        }
    });

    document.querySelectorAll('a, button, input, select, textarea').forEach(el => {
        const rect = el.getBoundingClientRect();
        if (
            rect.width > 0 && rect.height > 0 &&
            (rect.width < 44 || rect.height < 44) &&
            rect.width < 200
        ) {
            const text = (el.innerText || el.getAttribute('aria-label') || '').trim().slice(0, 40);
            problems.push({
                type: 'small_tap_target',
                selector: el.tagName.toLowerCase(),
                detail: text,
                width: Math.round(rect.width),
                height: Math.round(rect.height),
            });
        }
    });

    for (const el of document.querySelectorAll('p, span, li, td, th, label')) {
        const fontSize = parseFloat(getComputedStyle(el).fontSize);
        if (fontSize > 0 && fontSize < 12 && el.innerText?.trim().length > 5) {
            problems.push({
                type: 'small_text',
                detail: el.innerText.trim().slice(0, 60),
                fontSize: fontSize,
            });
            break;
        }
    }

    return problems.slice(0, 25);
})()"#;

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum MobileIssue {
    WiderThanViewport {
        selector: String,
        #[serde(rename = "elementWidth")]
        element_width: u64,
        #[serde(rename = "viewportWidth")]
        viewport_width: u64,
    },
    FixedWidthOverflow {
        #[serde(default)]
        detail: String,
    },
    SmallTapTarget {
        selector: String,
        #[serde(default)]
        detail: String,
        width: u64,
        height: u64,
    },
    SmallText {
        #[serde(default)]
        detail: String,
        #[serde(rename = "fontSize")]
        font_size: f64,
    },
    #[serde(other)]
    Unknown,
}

impl MobileIssue {
    fn into_bug(self, url: &str) -> Option<Bug> {
        let bug = match self {
            MobileIssue::WiderThanViewport {
                selector,
                element_width,
                viewport_width,
            } => Bug::new(
                url,
                Category::Mobile,
                Severity::Medium,
                "Element wider than viewport",
                format!(
                    "Element `{}` is {}px wide but viewport is {}px.",
                    selector, element_width, viewport_width
                ),
            )
            .with_selector(selector),
            MobileIssue::FixedWidthOverflow { detail } => Bug::new(
                url,
                Category::Mobile,
                Severity::Medium,
                "Fixed-width element overflows viewport",
                format!("Inline style sets a fixed pixel width: {}", detail),
            ),
            MobileIssue::SmallTapTarget {
                selector,
                detail,
                width,
                height,
            } => Bug::new(
                url,
                Category::Mobile,
                Severity::Low,
                "Tap target too small",
                format!(
                    "`{}` \"{}\" is only {}×{}px (minimum recommended: 44×44px).",
                    selector, detail, width, height
                ),
            ),
            MobileIssue::SmallText { detail, font_size } => Bug::new(
                url,
                Category::Mobile,
                Severity::Low,
                "Text may be too small on mobile",
                format!(
                    "Text \"{}\" is {}px (minimum recommended: 12px).",
                    detail, font_size
                ),
            ),
            MobileIssue::Unknown => return None,
        };
        Some(bug)
    }
}

/// Reports layout and readability problems that break narrow screens
pub struct MobileResponsivenessDetector;

#[async_trait]
impl Detector for MobileResponsivenessDetector {
    fn name(&self) -> &str {
        "mobile_responsiveness"
    }

    async fn detect(&mut self, page: &mut dyn PageHandle, url: &str) -> DetectorResult<Detection> {
        let issues: Vec<MobileIssue> = evaluate_as(page, MOBILE_SCRIPT).await?;
        let bugs = issues
            .into_iter()
            .filter_map(|issue| issue.into_bug(url))
            .collect();
        Ok(Detection::from_bugs(bugs))
    }
}
