//! Error types for the health backend client

use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Server returned status {status}")]
    ServerError {
        status: u16,
        message: Option<String>,
    },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Timeout error: {0}")]
    TimeoutError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// MongoDB-style duplicate key error code some backends pass through
const DUPLICATE_KEY_CODE: i64 = 11000;

/// Longest server text an alert will carry
pub const MAX_SERVER_MESSAGE_CHARS: usize = 200;

/// A plain-text body usable as an alert message: short and not markup
pub fn plain_text_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    let markup = trimmed.starts_with('<') || trimmed.to_lowercase().contains("<html");
    let short = trimmed.lines().count() <= 3 && trimmed.chars().count() <= MAX_SERVER_MESSAGE_CHARS;

    (!trimmed.is_empty() && !markup && short).then(|| trimmed.to_string())
}

/// Cut server text down to alert size
fn clip_message(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= MAX_SERVER_MESSAGE_CHARS {
        return trimmed.to_string();
    }
    let mut clipped: String = trimmed.chars().take(MAX_SERVER_MESSAGE_CHARS).collect();
    clipped.push('…');
    clipped
}

impl ApiError {
    /// Message text supplied by the server, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::ServerError { message, .. } => message.as_deref(),
            ApiError::Conflict(message) => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, ApiError::Conflict(_))
    }

    /// Build an error from a non-success status and its raw body
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed: Option<Value> = serde_json::from_str(body).ok();
        let message = match &parsed {
            Some(value) => extract_message(value),
            None => plain_text_message(body),
        };

        let duplicate_code = parsed
            .as_ref()
            .and_then(|v| v.get("code"))
            .and_then(Value::as_i64)
            == Some(DUPLICATE_KEY_CODE);
        let duplicate_text = message
            .as_deref()
            .map(|m| {
                let lower = m.to_lowercase();
                lower.contains("duplicate") || lower.contains("e11000")
            })
            .unwrap_or(false);

        if status == 409 || duplicate_code || duplicate_text {
            return ApiError::Conflict(message.unwrap_or_else(|| "duplicate record".to_string()));
        }

        ApiError::ServerError { status, message }
    }
}

fn extract_message(value: &Value) -> Option<String> {
    ["message", "error", "msg"]
        .iter()
        .filter_map(|key| value.get(*key))
        .find_map(|v| match v {
            Value::String(s) if !s.trim().is_empty() => Some(clip_message(s)),
            Value::Object(_) => extract_message(v),
            _ => None,
        })
}
