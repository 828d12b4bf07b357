//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// conflicts, lookups). Transport concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// A value failed validation (e.g. missing or malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A uniqueness constraint was violated (username/email already taken).
    #[error("conflict: {0}")]
    Conflict(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested account was not found.
    #[error("not found")]
    NotFound,

    /// Authentication failed (unknown username or wrong password).
    ///
    /// The message is deliberately uniform for both causes so callers cannot
    /// enumerate usernames; the distinction is only logged internally.
    #[error("invalid username or password")]
    InvalidCredentials,
}

impl DirectoryError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}
