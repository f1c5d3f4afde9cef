//! Meta tag and SEO detector

use crate::browser::PageHandle;
use crate::detectors::{evaluate_as, Detection, Detector, DetectorResult};
use crate::model::{Bug, Category, Severity};
use async_trait::async_trait;
use serde::Deserialize;

const META_SCRIPT: &str = r#"(() => ({
    title: document.title,
    metaDescription: document.querySelector('meta[name="description"]')?.content || '',
    viewport: document.querySelector('meta[name="viewport"]')?.content || '',
    h1Count: document.querySelectorAll('h1').length,
    favicon: !!document.querySelector('link[rel*="icon"]'),
}))()"#;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PageMeta {
    title: String,
    meta_description: String,
    viewport: String,
    h1_count: u32,
    favicon: bool,
}

/// Checks title, viewport, description, favicon and `<h1>` usage
pub struct MetaSeoDetector;

impl MetaSeoDetector {
    fn findings(meta: &PageMeta, url: &str) -> Vec<Bug> {
        let seo = |severity, title: String, description: &str| {
            Bug::new(url, Category::Seo, severity, title, description)
        };
        let mut bugs = Vec::new();

        if meta.title.trim().is_empty() {
            bugs.push(seo(
                Severity::Medium,
                "Missing page <title>".to_string(),
                "The page has no <title> tag.",
            ));
        }

        if meta.viewport.is_empty() {
            bugs.push(seo(
                Severity::Medium,
                "Missing viewport meta tag".to_string(),
                "No <meta name='viewport'> found, this page is likely broken on mobile devices.",
            ));
        }

        if meta.meta_description.is_empty() {
            bugs.push(seo(
                Severity::Low,
                "Missing meta description".to_string(),
                "No <meta name='description'> tag found.",
            ));
        }

        if !meta.favicon {
            bugs.push(seo(
                Severity::Low,
                "Missing favicon".to_string(),
                "No <link rel='icon'> found.",
            ));
        }

        match meta.h1_count {
            0 => bugs.push(seo(
                Severity::Low,
                "No <h1> heading found".to_string(),
                "Page has no <h1> element.",
            )),
            1 => {}
            n => bugs.push(seo(
                Severity::Low,
                format!("Multiple <h1> tags ({})", n),
                "Best practice is a single <h1> per page.",
            )),
        }

        bugs
    }
}

#[async_trait]
impl Detector for MetaSeoDetector {
    fn name(&self) -> &str {
        "meta_seo"
    }

    async fn detect(&mut self, page: &mut dyn PageHandle, url: &str) -> DetectorResult<Detection> {
        let meta: PageMeta = evaluate_as(page, META_SCRIPT).await?;
        Ok(Detection::from_bugs(Self::findings(&meta, url)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::testing::StubPage;
    use serde_json::json;

    fn complete_page() -> serde_json::Value {
        json!({
            "title": "Home",
            "metaDescription": "A site",
            "viewport": "width=device-width",
            "h1Count": 1,
            "favicon": true,
        })
    }

    #[tokio::test]
    async fn test_complete_page_has_no_findings() {
        let mut page = StubPage::returning(complete_page());
        let detection = MetaSeoDetector
            .detect(&mut page, "https://example.com")
            .await
            .unwrap();
        assert!(detection.is_empty());
    }

    #[tokio::test]
    async fn test_only_missing_title_yields_one_bug_and_is_stable() {
        let mut value = complete_page();
        value["title"] = json!("");
        let mut page = StubPage::returning(value);
        let mut detector = MetaSeoDetector;

        let first = detector.detect(&mut page, "https://example.com").await.unwrap();
        assert_eq!(first.bugs.len(), 1);
        assert_eq!(first.bugs[0].title(), "Missing page <title>");
        assert_eq!(first.bugs[0].severity(), Severity::Medium);
        assert_eq!(first.bugs[0].category(), Category::Seo);

        let second = detector.detect(&mut page, "https://example.com").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_bare_page_reports_everything() {
        let mut page = StubPage::returning(json!({"title": "", "h1Count": 0, "favicon": false}));
        let detection = MetaSeoDetector
            .detect(&mut page, "https://example.com")
            .await
            .unwrap();
        let titles: Vec<&str> = detection.bugs.iter().map(|b| b.title()).collect();
        assert_eq!(
            titles,
            vec![
                "Missing page <title>",
                "Missing viewport meta tag",
                "Missing meta description",
                "Missing favicon",
                "No <h1> heading found",
            ]
        );
    }

    #[test]
    fn test_multiple_h1() {
        let meta = PageMeta {
            title: "t".into(),
            meta_description: "d".into(),
            viewport: "v".into(),
            h1_count: 3,
            favicon: true,
        };
        let bugs = MetaSeoDetector::findings(&meta, "https://example.com");
        assert_eq!(bugs.len(), 1);
        assert_eq!(bugs[0].title(), "Multiple <h1> tags (3)");
        assert_eq!(bugs[0].severity(), Severity::Low);
    }
}
