//! Scripted transport for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{ArangoError, Result};
use crate::transport::{HttpRequest, HttpResponse, Transport};

/// Replays queued responses in order and records every request it sees
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<(u16, String)>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push(&self, status: u16, body: Value) {
        self.push_raw(status, body.to_string());
    }

    pub fn push_empty(&self, status: u16) {
        self.push_raw(status, String::new());
    }

    pub fn push_raw(&self, status: u16, body: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .push_back((status, body.into()));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// `"METHOD /_db/..."` for every request sent so far.
    pub fn calls(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|request| {
                let path = request
                    .url
                    .find("/_db/")
                    .map(|index| &request.url[index..])
                    .unwrap_or(&request.url);
                format!("{} {}", request.method, path)
            })
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let method = request.method;
        let url = request.url.clone();
        self.requests.lock().unwrap().push(request);
        let (status, body) = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ArangoError::InvalidResponse(format!("unscripted request {} {}", method, url)))?;
        Ok(HttpResponse::new(method, url, status, None, body))
    }
}
