//! The `{code, message, data}` envelope wrapped around every RAGFlow response

use crate::error::ApiError;
use serde_json::Value;

/// Message used when a rejected response carries no `message` field
const UNKNOWN_MESSAGE: &str = "unknown error";

/// Decoded response envelope
///
/// A numeric `code` equal to zero (`0` or `0.0`) is the only success value.
/// Anything else, including a missing or non-numeric `code`, is a failure
/// carrying the server's message.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope<T = Value> {
    /// `code == 0`, with the `data` payload (`Value::Null` when absent)
    Success(T),

    /// Any other `code`
    Failure {
        code: Option<i64>,
        message: String,
    },
}

impl Envelope<Value> {
    /// Decode a raw response body
    pub fn decode(body: &Value) -> Self {
        let raw_code = body.get("code");
        let code = raw_code.and_then(Value::as_i64);

        // A float zero (`0.0`) counts as success too
        if code == Some(0) || raw_code.and_then(Value::as_f64) == Some(0.0) {
            return Envelope::Success(body.get("data").cloned().unwrap_or(Value::Null));
        }

        let message = match body.get("message") {
            Some(Value::String(message)) => message.clone(),
            Some(Value::Null) | None => UNKNOWN_MESSAGE.to_string(),
            Some(other) => other.to_string(),
        };

        Envelope::Failure { code, message }
    }
}

impl<T> Envelope<T> {
    /// Transform the success payload
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
        match self {
            Envelope::Success(payload) => Envelope::Success(f(payload)),
            Envelope::Failure { code, message } => Envelope::Failure { code, message },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Envelope::Success(_))
    }

    /// Turn a failure into an [`ApiError`] carrying the server message
    pub fn into_result(self) -> Result<T, ApiError> {
        match self {
            Envelope::Success(payload) => Ok(payload),
            Envelope::Failure { message, .. } => Err(ApiError::rejected(message)),
        }
    }
}
