//! Shared fixtures for the integration tests
//!
//! `MockPage` is a scripted, in-memory `PageHandle`: every URL maps to a
//! canned navigation outcome, a set of links and the console output the page
//! would produce.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;
use vibe_crawler::browser::{
    BrowserError, BrowserResult, ConsoleKind, EventSubscription, NavigationOutcome, PageEvent,
    PageHandle,
};
use vibe_crawler::crawler::CrawlSettings;

/// What navigating to one URL does
#[derive(Debug, Clone)]
pub enum PageScript {
    Load {
        status: Option<u16>,
        links: Vec<String>,
        console_errors: Vec<String>,
    },
    Fail(String),
    Hang,
    /// The handle itself panics mid-navigation
    Panic,
}

impl PageScript {
    pub fn ok(links: &[&str]) -> Self {
        Self::status(200, links)
    }

    pub fn status(status: u16, links: &[&str]) -> Self {
        PageScript::Load {
            status: Some(status),
            links: links.iter().map(|l| l.to_string()).collect(),
            console_errors: Vec::new(),
        }
    }

    pub fn with_console_error(mut self, text: &str) -> Self {
        if let PageScript::Load { console_errors, .. } = &mut self {
            console_errors.push(text.to_string());
        }
        self
    }
}

/// What the tests can observe after the page has been handed to the crawler
#[derive(Debug, Default, Clone)]
pub struct PageLog {
    pub navigations: Arc<Mutex<Vec<String>>>,
    pub closed: Arc<AtomicBool>,
}

impl PageLog {
    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().unwrap().clone()
    }

    pub fn was_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

/// Scripted page automation handle
#[derive(Debug, Default)]
pub struct MockPage {
    pages: HashMap<String, PageScript>,
    current_links: Vec<String>,
    subscriptions: Vec<EventSubscription>,
    fail_link_queries: bool,
    panic_link_queries: bool,
    panic_on_close: bool,
    log: PageLog,
}

impl MockPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the page for `url` (keys are compared to normalized URLs)
    pub fn page(mut self, url: &str, script: PageScript) -> Self {
        self.pages.insert(url.to_string(), script);
        self
    }

    pub fn failing_link_queries(mut self) -> Self {
        self.fail_link_queries = true;
        self
    }

    pub fn panicking_link_queries(mut self) -> Self {
        self.panic_link_queries = true;
        self
    }

    pub fn panicking_close(mut self) -> Self {
        self.panic_on_close = true;
        self
    }

    pub fn log(&self) -> PageLog {
        self.log.clone()
    }
}

#[async_trait]
impl PageHandle for MockPage {
    async fn navigate(&mut self, url: &str, _timeout: Duration) -> BrowserResult<NavigationOutcome> {
        self.log.navigations.lock().unwrap().push(url.to_string());
        self.current_links.clear();

        let script = self
            .pages
            .get(url)
            .cloned()
            .unwrap_or_else(|| PageScript::Fail("net::ERR_NAME_NOT_RESOLVED".to_string()));

        match script {
            PageScript::Load {
                status,
                links,
                console_errors,
            } => {
                for text in console_errors {
                    for subscription in &self.subscriptions {
                        subscription.push(PageEvent::Console {
                            kind: ConsoleKind::Error,
                            text: text.clone(),
                        });
                    }
                }
                self.current_links = resolve_links(url, &links);
                Ok(NavigationOutcome::new(status, url))
            }
            PageScript::Fail(reason) => Err(BrowserError::Navigation(reason)),
            PageScript::Hang => std::future::pending().await,
            PageScript::Panic => panic!("renderer process crashed"),
        }
    }

    async fn evaluate(&mut self, _script: &str) -> BrowserResult<Value> {
        Ok(Value::Null)
    }

    async fn query_links(&mut self) -> BrowserResult<Vec<String>> {
        if self.panic_link_queries {
            panic!("link query hit a detached frame");
        }
        if self.fail_link_queries {
            return Err(BrowserError::Script("document is detached".to_string()));
        }
        Ok(self.current_links.clone())
    }

    async fn head_request(&mut self, _url: &str, _timeout: Duration) -> BrowserResult<u16> {
        Ok(200)
    }

    async fn subscribe(&mut self, capacity: usize) -> BrowserResult<EventSubscription> {
        let subscription = EventSubscription::new(capacity);
        self.subscriptions.push(subscription.clone());
        Ok(subscription)
    }

    async fn close(&mut self) -> BrowserResult<()> {
        if self.panic_on_close {
            panic!("browser already gone");
        }
        self.log.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Resolves scripted hrefs against the page URL, as a browser would
fn resolve_links(page_url: &str, links: &[String]) -> Vec<String> {
    let Ok(base) = Url::parse(page_url) else {
        return links.to_vec();
    };
    links
        .iter()
        .map(|link| match base.join(link) {
            Ok(resolved) => resolved.to_string(),
            Err(_) => link.clone(),
        })
        .collect()
}

/// Crawl settings suited to an in-memory page: no settle delay, short timeout
pub fn fast_settings(start_url: &str, max_pages: usize) -> CrawlSettings {
    let mut settings = CrawlSettings::new(start_url);
    settings.max_pages = max_pages;
    settings.settle_delay = Duration::ZERO;
    settings.navigation_timeout = Duration::from_millis(200);
    settings
}
