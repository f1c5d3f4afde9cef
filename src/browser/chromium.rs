//! Chromium-backed page handle using chromiumoxide

use crate::browser::{
    build_status_client, extract_links, head_status, BrowserError, BrowserResult, ConsoleKind,
    EventSubscription, NavigationOutcome, PageEvent, PageHandle,
};
use crate::config::Config;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::js_protocol::runtime as cdp_runtime;
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::page::Page;
use futures::StreamExt;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;
use tokio::task::JoinHandle;
use url::Url;

/// Navigation Timing status of the current document, or null when the engine
/// does not expose one (older engines, file and data URLs)
const NAVIGATION_STATUS_SCRIPT: &str = r#"(() => {
    const entries = performance.getEntriesByType('navigation');
    if (!entries.length) return null;
    const status = entries[0].responseStatus;
    return typeof status === 'number' && status > 0 ? status : null;
})()"#;

const OUTER_HTML_SCRIPT: &str = "document.documentElement.outerHTML";

/// How to launch the browser
#[derive(Debug, Clone)]
pub struct BrowserSettings {
    pub headless: bool,
    /// Chromium binary; auto-detected when unset
    pub executable: Option<PathBuf>,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub user_agent: String,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: true,
            executable: None,
            viewport_width: 1280,
            viewport_height: 800,
            user_agent: format!("VibeCrawler/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl BrowserSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            headless: config.browser.headless,
            executable: config.browser.executable.clone(),
            viewport_width: config.browser.viewport.width,
            viewport_height: config.browser.viewport.height,
            ..Self::default()
        }
    }
}

/// One Chromium page plus the browser process that owns it
pub struct ChromiumPage {
    browser: Option<Browser>,
    page: Page,
    http: reqwest::Client,
    handler_task: JoinHandle<()>,
    event_tasks: Vec<JoinHandle<()>>,
}

impl ChromiumPage {
    /// Launches a browser and opens a single blank page
    pub async fn launch(settings: &BrowserSettings) -> BrowserResult<Self> {
        let mut builder = BrowserConfig::builder()
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .window_size(settings.viewport_width, settings.viewport_height)
            .viewport(Viewport {
                width: settings.viewport_width,
                height: settings.viewport_height,
                ..Default::default()
            });

        if !settings.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &settings.executable {
            builder = builder.chrome_executable(path);
        }

        let config = builder
            .build()
            .map_err(|e| BrowserError::Launch(format!("invalid browser config: {}", e)))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::trace!("CDP handler error: {}", e);
                }
            }
        });

        let page = browser.new_page("about:blank").await?;
        page.execute(cdp_runtime::EnableParams::default()).await?;

        tracing::info!(
            "Launched Chromium ({}, viewport {}x{})",
            if settings.headless { "headless" } else { "headed" },
            settings.viewport_width,
            settings.viewport_height
        );

        Ok(Self {
            browser: Some(browser),
            page,
            http: build_status_client(&settings.user_agent)?,
            handler_task,
            event_tasks: Vec::new(),
        })
    }

    fn ensure_open(&self) -> BrowserResult<()> {
        if self.browser.is_some() {
            Ok(())
        } else {
            Err(BrowserError::Closed)
        }
    }

    async fn current_url(&self) -> BrowserResult<Option<String>> {
        Ok(self.page.url().await?)
    }
}

#[async_trait]
impl PageHandle for ChromiumPage {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> BrowserResult<NavigationOutcome> {
        self.ensure_open()?;

        match tokio::time::timeout(timeout, self.page.goto(url)).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => return Err(BrowserError::Navigation(e.to_string())),
            Err(_) => {
                return Err(BrowserError::Timeout {
                    operation: format!("navigation to {}", url),
                    millis: timeout.as_millis() as u64,
                })
            }
        }

        let status = self
            .evaluate(NAVIGATION_STATUS_SCRIPT)
            .await?
            .as_u64()
            .and_then(|s| u16::try_from(s).ok());
        let final_url = self
            .current_url()
            .await?
            .unwrap_or_else(|| url.to_string());

        Ok(NavigationOutcome { status, final_url })
    }

    async fn evaluate(&mut self, script: &str) -> BrowserResult<Value> {
        self.ensure_open()?;
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| BrowserError::Script(e.to_string()))?;
        Ok(result.value().cloned().unwrap_or(Value::Null))
    }

    async fn query_links(&mut self) -> BrowserResult<Vec<String>> {
        let html = match self.evaluate(OUTER_HTML_SCRIPT).await? {
            Value::String(html) => html,
            other => {
                return Err(BrowserError::Script(format!(
                    "expected document HTML, got {}",
                    other
                )))
            }
        };

        let page_url = self
            .current_url()
            .await?
            .ok_or_else(|| BrowserError::Navigation("page has no URL".to_string()))?;
        let base = Url::parse(&page_url)
            .map_err(|e| BrowserError::Navigation(format!("unparseable page URL {}: {}", page_url, e)))?;

        Ok(extract_links(&html, &base))
    }

    async fn head_request(&mut self, url: &str, timeout: Duration) -> BrowserResult<u16> {
        head_status(&self.http, url, timeout).await
    }

    async fn subscribe(&mut self, capacity: usize) -> BrowserResult<EventSubscription> {
        self.ensure_open()?;
        let subscription = EventSubscription::new(capacity);

        let mut console_events = self
            .page
            .event_listener::<cdp_runtime::EventConsoleApiCalled>()
            .await?;
        let sink = subscription.clone();
        self.event_tasks.push(tokio::spawn(async move {
            while let Some(event) = console_events.next().await {
                let kind = match event.r#type {
                    cdp_runtime::ConsoleApiCalledType::Error => ConsoleKind::Error,
                    cdp_runtime::ConsoleApiCalledType::Warning => ConsoleKind::Warning,
                    _ => ConsoleKind::Other,
                };
                let text = event
                    .args
                    .iter()
                    .map(remote_object_text)
                    .collect::<Vec<_>>()
                    .join(" ");
                sink.push(PageEvent::Console { kind, text });
            }
        }));

        let mut exceptions = self
            .page
            .event_listener::<cdp_runtime::EventExceptionThrown>()
            .await?;
        let sink = subscription.clone();
        self.event_tasks.push(tokio::spawn(async move {
            while let Some(event) = exceptions.next().await {
                let details = &event.exception_details;
                let text = details
                    .exception
                    .as_ref()
                    .and_then(|e| e.description.clone())
                    .unwrap_or_else(|| details.text.clone());
                sink.push(PageEvent::UncaughtError { text });
            }
        }));

        Ok(subscription)
    }

    async fn close(&mut self) -> BrowserResult<()> {
        let Some(mut browser) = self.browser.take() else {
            return Ok(());
        };

        for task in self.event_tasks.drain(..) {
            task.abort();
        }

        let page_result = self.page.clone().close().await;
        let browser_result = browser.close().await;
        if let Err(e) = browser.wait().await {
            tracing::debug!("Waiting for the browser process failed: {}", e);
        }
        self.handler_task.abort();

        page_result?;
        browser_result?;
        tracing::debug!("Browser closed");
        Ok(())
    }
}

/// Renders a console argument the way the devtools console would print it
fn remote_object_text(object: &cdp_runtime::RemoteObject) -> String {
    match &object.value {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => object.description.clone().unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = BrowserSettings::default();
        assert!(settings.headless);
        assert!(settings.executable.is_none());
        assert_eq!(settings.viewport_width, 1280);
        assert_eq!(settings.viewport_height, 800);
        assert!(settings.user_agent.starts_with("VibeCrawler/"));
    }

    #[tokio::test]
    #[ignore] // Requires Chromium to be installed
    async fn test_launch_navigate_and_close() {
        let mut page = ChromiumPage::launch(&BrowserSettings::default())
            .await
            .expect("failed to launch");
        let outcome = page
            .navigate(
                "data:text/html,<a href='https://example.com/x'>x</a>",
                Duration::from_secs(10),
            )
            .await
            .expect("navigation failed");
        assert!(outcome.status.is_none());

        let links = page.query_links().await.expect("links");
        assert_eq!(links, vec!["https://example.com/x"]);

        page.close().await.expect("close");
        assert!(matches!(
            page.evaluate("1").await,
            Err(BrowserError::Closed)
        ));
    }
}
