//! Error types for the AMS SDK.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    /// The HTTP response had a non-2xx status code.
    #[error("API error {status}: {}", message.as_deref().unwrap_or("no message"))]
    Api { status: u16, message: Option<String> },

    /// An error from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A generic error string.
    #[error("{0}")]
    Other(String),
}

impl SdkError {
    /// The backend's own `message`, if it sent one.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            SdkError::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            SdkError::Api { status, .. } => Some(*status),
            SdkError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the backend rejected the write because the name is taken.
    ///
    /// Backends disagree on how they say this, so a 409 status and any message
    /// mentioning "409", "duplicate" or "already exists" all count.
    pub fn is_duplicate(&self) -> bool {
        if self.status() == Some(409) {
            return true;
        }
        let text = match self {
            SdkError::Api { message: Some(m), .. } => m.to_lowercase(),
            SdkError::Other(m) => m.to_lowercase(),
            _ => return false,
        };
        text.contains("409") || text.contains("duplicate") || text.contains("already exists")
    }
}

pub type Result<T> = std::result::Result<T, SdkError>;
