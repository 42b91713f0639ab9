use std::fmt;

use serde_json::Value;

/// Error category for backend calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// No response: connect failure, timeout, or a broken body stream.
    Network,
    /// Non-2xx HTTP status.
    HttpStatus,
    /// 2xx response that reports failure or lacks a required field.
    Backend,
    /// Body is not the expected JSON.
    Parse,
    /// Rejected locally before any request was made.
    Validation,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::Network => write!(f, "network"),
            ApiErrorKind::HttpStatus => write!(f, "http_status"),
            ApiErrorKind::Backend => write!(f, "backend"),
            ApiErrorKind::Parse => write!(f, "parse"),
            ApiErrorKind::Validation => write!(f, "validation"),
        }
    }
}

/// Structured error from the chat backend client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    /// One-line summary suitable for display.
    pub message: String,
    /// Optional raw body or underlying error text.
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Network, message)
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Backend, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Validation, message)
    }

    pub fn parse(message: impl Into<String>, body: &str) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            message: message.into(),
            details: (!body.is_empty()).then(|| body.to_string()),
        }
    }

    /// Creates an HTTP status error, pulling a readable reason out of the body.
    ///
    /// The backend answers failures with `http.Error`, so most bodies are a
    /// single plain-text line; JSON bodies with `error` or `message` are
    /// handled too.
    pub fn http_status(status: u16, body: &str) -> Self {
        let reason = extract_reason(body);
        let message = match &reason {
            Some(reason) => format!("HTTP {status}: {reason}"),
            None => format!("HTTP {status}"),
        };
        Self {
            kind: ApiErrorKind::HttpStatus,
            message,
            details: (!body.is_empty()).then(|| body.to_string()),
        }
    }

    pub fn is_network(&self) -> bool {
        self.kind == ApiErrorKind::Network
    }

    pub fn is_validation(&self) -> bool {
        self.kind == ApiErrorKind::Validation
    }
}

fn extract_reason(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(json) = serde_json::from_str::<Value>(trimmed) {
        let from_json = json
            .get("error")
            .and_then(|e| e.get("message").or(Some(e)))
            .or_else(|| json.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string);
        if from_json.is_some() {
            return from_json;
        }
    }

    trimmed.lines().next().map(|line| line.trim().to_string())
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for backend calls.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

pub(crate) fn classify_reqwest_error(e: &reqwest::Error) -> ApiError {
    let message = if e.is_timeout() {
        format!("Request timed out: {e}")
    } else if e.is_connect() {
        format!("Connection failed: {e}")
    } else if e.is_request() {
        format!("Request error: {e}")
    } else {
        format!("Network error: {e}")
    };
    ApiError::network(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_uses_plain_text_body() {
        let err = ApiError::http_status(403, "对话已终止\n");
        assert_eq!(err.kind, ApiErrorKind::HttpStatus);
        assert_eq!(err.message, "HTTP 403: 对话已终止");
        assert_eq!(err.details.as_deref(), Some("对话已终止\n"));
    }

    #[test]
    fn test_http_status_extracts_json_message() {
        let err = ApiError::http_status(500, r#"{"error":{"message":"boom"}}"#);
        assert_eq!(err.message, "HTTP 500: boom");

        let err = ApiError::http_status(400, r#"{"message":"bad name"}"#);
        assert_eq!(err.message, "HTTP 400: bad name");
    }

    #[test]
    fn test_http_status_empty_body() {
        let err = ApiError::http_status(502, "");
        assert_eq!(err.message, "HTTP 502");
        assert_eq!(err.details, None);
    }
}
