//! Error types for autoblog-generator

use thiserror::Error;

/// Result type for autoblog-generator operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for autoblog-generator
///
/// Only preconditions surface here. Per-title failures end up in the
/// [`BatchReport`](crate::BatchReport) instead.
#[derive(Error, Debug)]
pub enum Error {
    /// API credential missing from the environment
    #[error("{0} environment variable is not set")]
    MissingCredential(&'static str),

    /// Connectivity probe failed before the batch started
    #[error("Failed to connect to the text provider")]
    ConnectionFailed,

    /// Provider could not be constructed
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Core library error
    #[error("Core error: {0}")]
    Core(#[from] autoblog_core::Error),
}

/// Failure of a single provider request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Credential rejected (401/403)
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// Rate limit exceeded (429)
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// Unknown model or endpoint (404)
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// Other non-success status, timeout or connection failure
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Response body was not a usable completion
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Any other transport error
    #[error("HTTP error: {0}")]
    Http(String),
}

impl ProviderError {
    /// Short classification used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::AuthFailed(_) => "auth_failed",
            ProviderError::RateLimited(_) => "rate_limited",
            ProviderError::ModelNotFound(_) => "model_not_found",
            ProviderError::RequestFailed(_) => "request_failed",
            ProviderError::InvalidResponse(_) => "invalid_response",
            ProviderError::Http(_) => "http",
        }
    }

    /// Classify a non-success HTTP status with its response body
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => ProviderError::AuthFailed(body),
            429 => ProviderError::RateLimited(body),
            404 => ProviderError::ModelNotFound(body),
            _ => ProviderError::RequestFailed(format!("status {}: {}", status, body)),
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if let Some(status) = error.status() {
            ProviderError::from_status(status.as_u16(), error.to_string())
        } else if error.is_timeout() {
            ProviderError::RequestFailed(format!("timeout: {}", error))
        } else if error.is_connect() {
            ProviderError::RequestFailed(format!("connection error: {}", error))
        } else if error.is_decode() {
            ProviderError::InvalidResponse(error.to_string())
        } else {
            ProviderError::Http(error.to_string())
        }
    }
}
