//! Mock upstream for testing purposes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::error::AdapterError;
use crate::models::{UpstreamRequest, UpstreamResult};

use super::Upstream;

/// An upstream that returns predefined responses and records every request.
#[derive(Debug, Default)]
pub struct MockUpstream {
    responses: Mutex<HashMap<String, Result<UpstreamResult, AdapterError>>>,
    fallback: Mutex<Option<Result<UpstreamResult, AdapterError>>>,
    requests: Mutex<Vec<UpstreamRequest>>,
    delay: Option<Duration>,
}

impl MockUpstream {
    /// Create a new mock answering `{}` to everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait this long before answering, to exercise cancellation.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Answer requests for `path` with `response`.
    pub fn respond(&self, path: &str, response: Result<UpstreamResult, AdapterError>) {
        let mut guard = self.responses.lock().unwrap();
        guard.insert(path.to_string(), response);
    }

    /// Answer every request without a path-specific response with `response`.
    pub fn respond_to_all(&self, response: Result<UpstreamResult, AdapterError>) {
        let mut guard = self.fallback.lock().unwrap();
        *guard = Some(response);
    }

    /// Requests received so far, in order.
    pub fn requests(&self) -> Vec<UpstreamRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Upstream for MockUpstream {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(&self, request: &UpstreamRequest) -> Result<UpstreamResult, AdapterError> {
        self.requests.lock().unwrap().push(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(response) = self.responses.lock().unwrap().get(&request.path) {
            return response.clone();
        }
        match &*self.fallback.lock().unwrap() {
            Some(response) => response.clone(),
            None => Ok(UpstreamResult::json(serde_json::json!({}))),
        }
    }
}
