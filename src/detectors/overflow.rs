//! Horizontal overflow detector

use crate::browser::PageHandle;
use crate::detectors::{evaluate_as, Detection, Detector, DetectorResult};
use crate::model::{Bug, Category, Severity};
use async_trait::async_trait;
use serde::Deserialize;

const OVERFLOW_SCRIPT: &str = r#"(() => {
    const results = [];
    for (const el of document.querySelectorAll('*')) {
        if (el.scrollWidth > el.clientWidth + 2 && el.clientWidth > 0) {
            const tag = el.tagName.toLowerCase();
            if (['html', 'body'].includes(tag)) continue;
            const id = el.id ? '#' + el.id : '';
            const cls = el.className && typeof el.className === 'string'
                ? '.' + el.className.trim().split(/\s+/).join('.') : '';
            results.push({
                selector: tag + id + cls,
                scrollWidth: el.scrollWidth,
                clientWidth: el.clientWidth,
            });
        }
        if (results.length >= 20) break;
    }
    return results;
})()"#;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OverflowRecord {
    selector: String,
    scroll_width: u64,
    client_width: u64,
}

/// Reports elements whose content is wider than their box (up to 20 per page)
pub struct OverflowDetector;

#[async_trait]
impl Detector for OverflowDetector {
    fn name(&self) -> &str {
        "overflow"
    }

    async fn detect(&mut self, page: &mut dyn PageHandle, url: &str) -> DetectorResult<Detection> {
        let records: Vec<OverflowRecord> = evaluate_as(page, OVERFLOW_SCRIPT).await?;

        let bugs = records
            .into_iter()
            .map(|r| {
                Bug::new(
                    url,
                    Category::Layout,
                    Severity::Medium,
                    "Horizontal overflow detected",
                    format!(
                        "Element `{}` overflows: scrollWidth={}px vs clientWidth={}px",
                        r.selector, r.scroll_width, r.client_width
                    ),
                )
                .with_selector(r.selector)
            })
            .collect();

        Ok(Detection::from_bugs(bugs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::testing::StubPage;
    use serde_json::json;

    #[tokio::test]
    async fn test_maps_records() {
        let mut page = StubPage::returning(json!([
            {"selector": "div#hero.wide", "scrollWidth": 1600, "clientWidth": 1280},
        ]));

        let detection = OverflowDetector
            .detect(&mut page, "https://example.com")
            .await
            .unwrap();

        assert_eq!(detection.bugs.len(), 1);
        let bug = &detection.bugs[0];
        assert_eq!(bug.title(), "Horizontal overflow detected");
        assert_eq!(bug.category(), Category::Layout);
        assert_eq!(bug.selector(), Some("div#hero.wide"));
        assert_eq!(
            bug.description(),
            "Element `div#hero.wide` overflows: scrollWidth=1600px vs clientWidth=1280px"
        );
    }

    #[tokio::test]
    async fn test_clean_page() {
        let mut page = StubPage::returning(json!([]));
        let detection = OverflowDetector
            .detect(&mut page, "https://example.com")
            .await
            .unwrap();
        assert!(detection.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_result_is_an_error() {
        let mut page = StubPage::returning(json!({"unexpected": true}));
        let result = OverflowDetector.detect(&mut page, "https://example.com").await;
        assert!(matches!(result, Err(crate::detectors::DetectorError::Decode(_))));
    }
}
