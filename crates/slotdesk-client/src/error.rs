//! Client error types

use serde::{Deserialize, Serialize};
use slotdesk_core::SourceError;
use thiserror::Error;

/// Error type for API client operations
#[derive(Error, Debug)]
pub enum Error {
    /// API error returned by the server
    #[error("API error: {code} - {message}")]
    Api {
        code: String,
        message: String,
        status_code: u16,
        request_id: Option<String>,
    },

    /// Rate limit exceeded
    #[error("Rate limit exceeded. Retry after {retry_after} seconds")]
    RateLimit {
        retry_after: u64,
        request_id: Option<String>,
    },

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Returns true if this is a not found error (404)
    pub fn is_not_found_error(&self) -> bool {
        matches!(self, Error::Api { status_code: 404, .. })
    }

    /// Returns true if this is a rate limit error (429)
    pub fn is_rate_limit_error(&self) -> bool {
        matches!(self, Error::RateLimit { .. })
    }

    /// Returns true if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::RateLimit { .. } => true,
            Error::Api { status_code, .. } => *status_code >= 500,
            Error::Http(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Collapse into the gate's collaborator error
    pub fn into_source_error(self, timeout: std::time::Duration) -> SourceError {
        match self {
            e if e.is_not_found_error() => SourceError::NotFound(e.to_string()),
            Error::Json(e) => SourceError::Malformed(e.to_string()),
            Error::Http(e) if e.is_timeout() => SourceError::Timeout(timeout),
            Error::Http(e) if e.is_decode() => SourceError::Malformed(e.to_string()),
            other => SourceError::Unavailable(other.to_string()),
        }
    }
}

/// Error body returned by the API
#[derive(Debug, Clone, Deserialize, Serialize)]
pub(crate) struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub(crate) struct ErrorBody {
    pub code: String,
    pub message: String,
}
