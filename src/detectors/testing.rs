//! Stub page handle for detector unit tests

use crate::browser::{
    BrowserError, BrowserResult, EventSubscription, NavigationOutcome, PageHandle,
};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

/// Returns the same value for every script and canned HEAD statuses
#[derive(Default)]
pub(crate) struct StubPage {
    pub script_result: Value,
    pub head_statuses: HashMap<String, u16>,
    pub subscription: Option<EventSubscription>,
    pub fail_subscribe: bool,
    pub evaluations: usize,
    pub head_requests: Vec<String>,
}

impl StubPage {
    pub fn returning(value: Value) -> Self {
        Self {
            script_result: value,
            ..Self::default()
        }
    }
}

#[async_trait]
impl PageHandle for StubPage {
    async fn navigate(&mut self, url: &str, _timeout: Duration) -> BrowserResult<NavigationOutcome> {
        Ok(NavigationOutcome::new(Some(200), url))
    }

    async fn evaluate(&mut self, _script: &str) -> BrowserResult<Value> {
        self.evaluations += 1;
        Ok(self.script_result.clone())
    }

    async fn query_links(&mut self) -> BrowserResult<Vec<String>> {
        Ok(Vec::new())
    }

    async fn head_request(&mut self, url: &str, timeout: Duration) -> BrowserResult<u16> {
        self.head_requests.push(url.to_string());
        self.head_statuses
            .get(url)
            .copied()
            .ok_or_else(|| BrowserError::Timeout {
                operation: format!("HEAD {}", url),
                millis: timeout.as_millis() as u64,
            })
    }

    async fn subscribe(&mut self, capacity: usize) -> BrowserResult<EventSubscription> {
        if self.fail_subscribe {
            return Err(BrowserError::Cdp("target closed".to_string()));
        }
        let subscription = EventSubscription::new(capacity);
        self.subscription = Some(subscription.clone());
        Ok(subscription)
    }

    async fn close(&mut self) -> BrowserResult<()> {
        Ok(())
    }
}
