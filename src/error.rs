// Typed errors with thiserror. Every failure is recovered locally; the variant decides the toast text.

use thiserror::Error;

/// UI error types.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UiError {
    /// The request never completed.
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx answer. `message` is the body's `detail`/`message` when present.
    #[error("Server rejected request ({status}): {}", .message.as_deref().unwrap_or("no details"))]
    Server { status: u16, message: Option<String> },

    /// Caught before any request was issued.
    #[error("{0}")]
    Validation(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("DOM error: {0}")]
    Dom(String),
}

pub const NETWORK_ERROR_MESSAGE: &str = "Network error";

impl UiError {
    /// Text to show in a toast. `fallback` covers server failures without a readable body.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            UiError::Network(_) => NETWORK_ERROR_MESSAGE.to_string(),
            UiError::Server {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            UiError::Validation(message) => message.clone(),
            _ => fallback.to_string(),
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, UiError::Network(_))
    }
}

impl From<serde_json::Error> for UiError {
    fn from(err: serde_json::Error) -> Self {
        UiError::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for UiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            UiError::Serialization(err.to_string())
        } else {
            UiError::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = UiError::InvalidConfig("missing field".to_string());
        assert!(err.to_string().contains("missing field"));

        let err = UiError::Server {
            status: 401,
            message: None,
        };
        assert_eq!(err.to_string(), "Server rejected request (401): no details");
    }

    #[test]
    fn user_message_follows_taxonomy() {
        let network = UiError::Network("connection reset".into());
        assert_eq!(network.user_message("Error adding movie"), "Network error");

        let server = UiError::Server {
            status: 400,
            message: Some("User already exists".into()),
        };
        assert_eq!(server.user_message("Registration failed"), "User already exists");

        let bare = UiError::Server {
            status: 500,
            message: None,
        };
        assert_eq!(bare.user_message("Error adding movie"), "Error adding movie");

        let blank = UiError::Server {
            status: 500,
            message: Some("  ".into()),
        };
        assert_eq!(blank.user_message("Error adding movie"), "Error adding movie");

        let invalid = UiError::Validation("Passwords do not match".into());
        assert_eq!(invalid.user_message("ignored"), "Passwords do not match");
    }
}
