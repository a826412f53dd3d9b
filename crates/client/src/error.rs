//! API error mapping.

use thiserror::Error;

/// Failure talking to the backend.
///
/// A 401 is a distinct variant so callers (the reactive-refresh stage in
/// particular) can match on it structurally instead of inspecting messages.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// HTTP 401: the presented credential was rejected.
    #[error("unauthorized")]
    Unauthorized,

    /// Any other non-2xx response, with the backend's `message` when the
    /// body parsed.
    #[error("api error ({status}): {message}")]
    Status { status: u16, message: String },

    /// Transport-level failure (connect, timeout, body read).
    #[error("network error: {0}")]
    Network(String),

    /// The response body did not match the expected shape.
    #[error("decode error: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}
