//! Transport port definitions

use serde_json::Value;
use thiserror::Error;

/// HTTP methods used by the RAGFlow API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A fully prepared request: absolute URL, headers and optional JSON body
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: Option<Value>,
}

impl HttpRequest {
    /// Look up a header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Status and raw body of a completed exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body as JSON
    pub fn json(&self) -> Result<Value, TransportError> {
        serde_json::from_str(&self.body)
            .map_err(|e| TransportError::new(format!("Invalid JSON in response body: {}", e)))
    }
}

/// Anything that prevented a usable HTTP response from arriving
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Port for issuing one blocking HTTP exchange
pub trait Transport: Send + Sync {
    /// Send a request and wait for the full response
    ///
    /// Only failures to obtain a response are errors; any HTTP status,
    /// including 4xx and 5xx, is returned as a response.
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}
