//! Session error taxonomy.

use thiserror::Error;

/// Failure modes of the client session manager.
///
/// `Clone`/`PartialEq` because the last error is carried inside the published
/// session snapshot and compared by tests.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Malformed request parameters, caught before any network call.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The backend rejected the presented credentials (bad email/password).
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The access token was rejected. Normally handled internally by the
    /// refresh protocol and never surfaced to the end user.
    #[error("unauthorized")]
    Unauthorized,

    /// Transport-level failure talking to the backend.
    #[error("network error: {0}")]
    Network(String),

    /// The refresh token itself was rejected; the session has been forcibly
    /// terminated. Rendered distinctly from a user-initiated logout.
    #[error("session expired")]
    RefreshExhausted,

    /// The credential store failed to read or write.
    #[error("credential store error: {0}")]
    Store(String),
}

impl SessionError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }
}
