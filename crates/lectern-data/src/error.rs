//! HTTP client error types.

use serde_json::Value;
use thiserror::Error;

/// Message shown for failures that carry no server explanation.
pub const UNEXPECTED_ERROR: &str = "Unexpected error";

/// Errors that can occur when making HTTP requests.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Failed to send the request.
    #[error("Request failed: {0}")]
    RequestError(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTTP error response.
    #[error("HTTP {status}: {message}")]
    HttpError { status: u16, message: String },

    /// Failed to parse response body.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Request timeout.
    #[error("Request timed out")]
    Timeout,

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(String),
}

impl FetchError {
    /// Build an HTTP error from a non-2xx response body.
    ///
    /// The backend explains failures in a `detail` or `message` field, either
    /// as a string or as a list of validation entries with `msg`.
    pub fn from_status(status: u16, body: &[u8]) -> Self {
        let message = serde_json::from_slice::<Value>(body)
            .ok()
            .and_then(|v| server_message(&v))
            .or_else(|| {
                let text = String::from_utf8_lossy(body).trim().to_string();
                (!text.is_empty()).then_some(text)
            })
            .unwrap_or_else(|| format!("status {}", status));
        FetchError::HttpError { status, message }
    }

    /// HTTP status, for HTTP errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Text suitable for showing to the user.
    ///
    /// Server explanations pass through; everything else collapses to
    /// [`UNEXPECTED_ERROR`].
    pub fn user_message(&self) -> String {
        match self {
            FetchError::HttpError { message, .. } => message.clone(),
            _ => UNEXPECTED_ERROR.to_string(),
        }
    }
}

fn server_message(value: &Value) -> Option<String> {
    ["detail", "message"]
        .iter()
        .filter_map(|field| value.get(field))
        .find_map(|v| match v {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Array(items) => {
                let parts: Vec<&str> = items
                    .iter()
                    .filter_map(|i| i.get("msg").and_then(Value::as_str))
                    .collect();
                (!parts.is_empty()).then(|| parts.join("; "))
            }
            _ => None,
        })
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::JsonError(e.to_string())
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_builder() {
            FetchError::InvalidUrl(e.to_string())
        } else {
            FetchError::RequestError(e.to_string())
        }
    }
}
