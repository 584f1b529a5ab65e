//! Document acquisition error types.

use thiserror::Error;

/// Errors that can occur while loading an exam report.
#[derive(Debug, Error)]
pub enum SourceError {
    /// A local file does not exist.
    #[error("source file not found: {0}")]
    NotFound(String),

    /// The server answered with a non-success status.
    #[error("HTTP {status} fetching {url}")]
    Http { status: u16, url: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    Network(String),
}

impl SourceError {
    /// Returns `true` if the server refused access, usually an expired or
    /// missing session cookie.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, SourceError::Http { status: 401 | 403, .. })
    }
}
