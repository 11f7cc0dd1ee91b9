//! Application-wide error types.
//!
//! `AppError` is the outer taxonomy handed to a transport layer. Client-facing
//! categories are recoverable by the caller; `Consistency` is an internal fault.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or rule-violating input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Referenced entity is absent.
    #[error("Not found: {0}")]
    NotFound(String),

    /// State-machine violation (duplicate key, already corrected).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Caller role is not allowed to perform the operation.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Store-level failure not attributable to caller input.
    #[error("Consistency failure: {0}")]
    Consistency(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::Consistency(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Consistency(_) => "CONSISTENCY_FAILURE",
        }
    }

    /// Returns true if the error is the caller's to fix.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        !matches!(self, Self::Consistency(_))
    }
}
