//! Error types for the Mira client.

use std::path::PathBuf;

use mira_flow::{FlowError, LoadError, ValidationError};
use thiserror::Error;

/// Errors that can occur when using the Mira client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response was received.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("API error (status {status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// Response body was not valid JSON.
    #[error("Failed to deserialize response: {0}")]
    Json(#[from] serde_json::Error),

    /// Response was JSON but not of the expected shape.
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    /// A flow could not be loaded or failed validation.
    #[error(transparent)]
    Flow(#[from] FlowError),

    /// A local file could not be read.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File that was being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A knowledge source was rejected before upload.
    #[error("Invalid knowledge source: {0}")]
    KnowledgeSource(String),

    /// Client configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Http(_) => "ERR_CLIENT_HTTP",
            ClientError::Api { .. } => "ERR_CLIENT_API",
            ClientError::Json(_) => "ERR_CLIENT_JSON",
            ClientError::InvalidResponse(_) => "ERR_CLIENT_INVALID_RESPONSE",
            ClientError::Flow(err) => err.error_code(),
            ClientError::Io { .. } => "ERR_CLIENT_IO",
            ClientError::KnowledgeSource(_) => "ERR_CLIENT_KNOWLEDGE_SOURCE",
            ClientError::Config(_) => "ERR_CLIENT_CONFIG",
        }
    }
}

impl From<ValidationError> for ClientError {
    fn from(err: ValidationError) -> Self {
        ClientError::Flow(FlowError::Validation(err))
    }
}

impl From<LoadError> for ClientError {
    fn from(err: LoadError) -> Self {
        ClientError::Flow(FlowError::Load(err))
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;
    use mira_flow::error_codes;

    #[test]
    fn test_api_error_display() {
        let err = ClientError::Api {
            status: 404,
            body: "Not found".to_string(),
        };
        assert_eq!(err.to_string(), "API error (status 404): Not found");
        assert_eq!(err.error_code(), "ERR_CLIENT_API");
    }

    #[test]
    fn test_validation_error_keeps_code() {
        let err: ClientError = ValidationError::new(error_codes::INVALID_NAME, "Invalid name: x").into();
        assert_eq!(err.error_code(), error_codes::INVALID_NAME);
        assert!(err.to_string().contains("Invalid name: x"));
    }
}
