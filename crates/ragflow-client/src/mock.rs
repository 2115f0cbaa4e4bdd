//! Scripted in-memory transport for tests

use crate::ports::{HttpRequest, HttpResponse, Transport, TransportError};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Replays queued responses in order and records every request it sees
///
/// Once the script is exhausted every further request fails at the
/// transport level.
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON response with the given status
    pub fn respond_json(self, status: u16, body: Value) -> Self {
        self.push(Ok(HttpResponse::new(status, body.to_string())))
    }

    /// Queue a raw response body
    pub fn respond_raw(self, status: u16, body: impl Into<String>) -> Self {
        self.push(Ok(HttpResponse::new(status, body)))
    }

    /// Queue a transport failure
    pub fn fail(self, message: impl Into<String>) -> Self {
        self.push(Err(TransportError::new(message)))
    }

    /// Requests seen so far, in order
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().map(|requests| requests.clone()).unwrap_or_default()
    }

    fn push(self, entry: Result<HttpResponse, TransportError>) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(entry);
        }
        self
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }

        self.script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front())
            .unwrap_or_else(|| Err(TransportError::new("no scripted response left")))
    }
}
