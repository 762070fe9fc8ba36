//! Provider error types.
//!
//! Defined in `prakriti-core` so the retry wrapper and the session can
//! downcast and classify backend failures without relying on string
//! matching alone.

use thiserror::Error;

/// Errors that can occur when talking to a generation backend.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The API returned a 429 response (quota or rate limit exhausted).
    #[error("rate limited (HTTP 429): {message}")]
    RateLimited { message: String },

    /// Authentication failed (invalid or missing API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The requested model was not found.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The API answered, but the body could not be understood.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),
}

impl ProviderError {
    /// Returns `true` if this error is the backend telling us to slow down.
    pub fn is_rate_limit(&self) -> bool {
        match self {
            ProviderError::RateLimited { .. } => true,
            ProviderError::ApiError { status, .. } => *status == 429,
            _ => false,
        }
    }
}
