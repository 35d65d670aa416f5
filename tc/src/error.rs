//! Chat client error types

use thiserror::Error;

/// Errors that can occur during chat-completion calls
///
/// No retry logic lives here; whether and how to retry is a caller concern.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Credential absent or empty. Raised at call time, before any I/O.
    #[error("API key not configured: set the {0} environment variable")]
    MissingApiKey(String),

    /// Non-success HTTP response from the chat service
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Network-level failure, propagated unchanged
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Malformed response body
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ChatError {
    /// Whether this error was raised before any request was sent
    pub fn is_configuration(&self) -> bool {
        matches!(self, ChatError::MissingApiKey(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_is_configuration() {
        let err = ChatError::MissingApiKey("ZHIPU_API_KEY".to_string());
        assert!(err.is_configuration());
        assert!(err.to_string().contains("ZHIPU_API_KEY"));
    }

    #[test]
    fn test_api_error_carries_service_message() {
        let err = ChatError::Api {
            status: 401,
            message: "invalid api key".to_string(),
        };
        assert!(!err.is_configuration());
        assert_eq!(err.to_string(), "API error 401: invalid api key");
    }
}
