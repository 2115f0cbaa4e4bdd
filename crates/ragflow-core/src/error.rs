//! Error types for RAGFlow Search

use thiserror::Error;

/// The single failure kind surfaced by the API client.
///
/// Application-level rejections (non-zero `code`) and transport failures
/// (DNS, TLS, refused connections, timeouts, non-2xx statuses) are only told
/// apart by the message text. Callers should treat the message as opaque.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    message: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }

    /// Server answered with a non-zero `code`
    pub fn rejected(server_message: impl AsRef<str>) -> Self {
        Self::new(format!("API Error: {}", server_message.as_ref()))
    }

    /// Listing-style calls could not reach the server or got a bad status
    pub fn connection(reason: impl AsRef<str>) -> Self {
        Self::new(format!("Connection error: {}", reason.as_ref()))
    }

    /// Request-style calls failed at the transport level
    pub fn request_failed(reason: impl AsRef<str>) -> Self {
        Self::new(format!("Request failed: {}", reason.as_ref()))
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Error)]
pub enum RagflowError {
    // Remote API errors
    #[error(transparent)]
    Api(#[from] ApiError),

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RagflowError>;
