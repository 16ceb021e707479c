//! Error types for the API client

use stopscan_core::providers::ProviderError;
use thiserror::Error;

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// API client errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Non-success HTTP status
    #[error("({status}): {message}")]
    ApiResponse {
        /// HTTP status code
        status: u16,
        /// Response body, or `empty response`
        message: String,
    },

    /// The API answered 200 with an error status field
    #[error("{status}: {message}")]
    ApiStatus {
        /// Status string such as `REQUEST_DENIED`
        status: String,
        /// Provider error message, if any
        message: String,
    },

    /// Nothing found at the requested location
    #[error("{0}")]
    NoResults(String),

    /// A required field was missing from an otherwise valid response
    #[error("missing field `{0}` in response")]
    MissingField(&'static str),
}

impl ApiError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an API response error, naming empty bodies explicitly
    pub fn api_response(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let message = if body.trim().is_empty() { "empty response".to_string() } else { body };
        Self::ApiResponse { status, message }
    }
}

impl From<ApiError> for ProviderError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Request(e) if e.is_decode() => ProviderError::Decode(e.to_string()),
            ApiError::Request(e) => ProviderError::Transport(e.to_string()),
            ApiError::Json(e) => ProviderError::Decode(e.to_string()),
            ApiError::MissingField(field) => ProviderError::Decode(format!("missing field `{field}`")),
            ApiError::Config(msg) => ProviderError::Transport(msg),
            ApiError::ApiResponse { status, message } => ProviderError::Api { status, message },
            ApiError::ApiStatus { status, message } => ProviderError::Api {
                status: 200,
                message: if message.is_empty() { status } else { format!("{status}: {message}") },
            },
            ApiError::NoResults(msg) => ProviderError::NoResults(msg),
        }
    }
}
