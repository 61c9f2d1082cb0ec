use http::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Failures surfaced by the client, auth service and session.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Credentials were rejected, or a token was rejected and no refresh token was available.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Input was rejected, either locally or by the backend.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The refresh call itself failed; the session has been terminated.
    #[error("Session expired: {0}")]
    RefreshExhausted(String),

    #[error("Server returned {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Token store error: {0}")]
    Storage(String),

    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ClientError {
    /// Classify a non-success response by status, keeping the backend's message.
    pub async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Self::from_status(status, &body)
    }

    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = extract_detail(body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        });

        match status {
            StatusCode::UNAUTHORIZED => ClientError::Authentication(message),
            StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
                ClientError::Validation(message)
            }
            _ => ClientError::Http {
                status: status.as_u16(),
                message,
            },
        }
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, ClientError::Authentication(_))
    }

    /// Failures after which the local session no longer exists.
    pub fn ends_session(&self) -> bool {
        matches!(self, ClientError::RefreshExhausted(_))
    }
}

/// Pull a readable message out of an error body.
///
/// Handles `{"detail": "..."}`, `{"detail": [{"msg": "..."}, ...]}`,
/// `{"message": "..."}` and `{"error": "..."}`, falling back to the raw text.
fn extract_detail(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    let value: Value = match serde_json::from_str(trimmed) {
        Ok(v) => v,
        Err(_) => return Some(trimmed.to_string()),
    };

    let field = ["detail", "message", "error"]
        .iter()
        .find_map(|key| value.get(*key))?;

    match field {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let messages: Vec<String> = items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.clone()),
                    other => other.get("msg").and_then(Value::as_str).map(str::to_string),
                })
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        other => Some(other.to_string()),
    }
}
