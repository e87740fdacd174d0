//! Zero-shot inference client error types.

use std::sync::Arc;

use dealwatch_core::Error;

/// Errors from the hosted zero-shot inference API.
#[derive(Debug, thiserror::Error)]
pub enum ZeroShotError {
    /// No API token configured.
    #[error("missing API token: DEALWATCH_HF_API_TOKEN not set")]
    MissingToken,

    /// Request rejected before sending (empty labels, empty text).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Authentication failed (invalid API token).
    #[error("authentication failed: invalid API token")]
    AuthError,

    /// Rate limited by the inference API.
    #[error("rate limited: too many requests")]
    RateLimited,

    /// Model is still being loaded on the provider side.
    #[error("model loading: {0}")]
    ModelLoading(String),

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ZeroShotError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { ZeroShotError::Timeout } else { ZeroShotError::Network(Arc::new(err)) }
    }
}

impl From<ZeroShotError> for Error {
    fn from(err: ZeroShotError) -> Self {
        Error::Classifier(err.to_string())
    }
}
