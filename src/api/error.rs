use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Every failure the catalog client can produce. `Display` is the message
/// shown to the user.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-success status.
    #[error("{message}")]
    Server { status: StatusCode, message: String },

    /// The request went out but no response came back.
    #[error("Cannot reach the server. Make sure the API is running at {base_url}")]
    Unreachable { base_url: String },

    /// The request could not be built or sent, or the response was unusable.
    #[error("{0}")]
    Request(String),
}

impl ApiError {
    pub(crate) fn from_status(status: StatusCode, body: &[u8]) -> Self {
        let message = serde_json::from_slice::<Value>(body)
            .ok()
            .and_then(|value| extract_error_message(&value))
            .unwrap_or_else(|| format!("Server error ({})", status.as_u16()));
        ApiError::Server { status, message }
    }

    pub(crate) fn from_transport(err: reqwest::Error, base_url: &str) -> Self {
        if err.is_builder() {
            return ApiError::request(err.to_string());
        }
        if err.is_connect() || err.is_timeout() || err.is_request() {
            return ApiError::Unreachable {
                base_url: base_url.to_string(),
            };
        }
        ApiError::request(err.to_string())
    }

    pub(crate) fn request(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            ApiError::Request("Request failed".to_string())
        } else {
            ApiError::Request(message)
        }
    }
}

/// Pull a human-readable message out of an error body: `detail` wins over
/// `message`, and FastAPI-style validation lists are flattened.
pub fn extract_error_message(body: &Value) -> Option<String> {
    match body.get("detail") {
        Some(Value::String(detail)) if !detail.is_empty() => return Some(detail.clone()),
        Some(Value::Array(entries)) => {
            let messages: Vec<&str> = entries
                .iter()
                .filter_map(|entry| entry.get("msg").and_then(Value::as_str))
                .filter(|msg| !msg.is_empty())
                .collect();
            if !messages.is_empty() {
                return Some(messages.join("; "));
            }
        }
        _ => {}
    }

    body.get("message")
        .and_then(Value::as_str)
        .filter(|msg| !msg.is_empty())
        .map(str::to_string)
}
