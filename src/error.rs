//! Library error types.

use thiserror::Error;

/// Result type alias using `TrackerError`.
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Errors raised while loading, validating or storing policies.
///
/// The accrual calculator never produces these; malformed records degrade
/// to zero contributions instead.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A new policy failed an entry rule.
    #[error("Validation error: {0}")]
    Validation(String),

    /// No policy with the given application number.
    #[error("Policy not found: {0}")]
    NotFound(String),

    /// Duplicate application number.
    #[error("Application number already exists: {0}")]
    Conflict(String),

    #[error("Unsupported policy file format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid month {0}, expected 1-12")]
    InvalidMonth(u32),
}

impl TrackerError {
    /// HTTP status code used when the error crosses the Lambda boundary.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_)
            | Self::Json(_)
            | Self::InvalidDate(_)
            | Self::InvalidMonth(_)
            | Self::UnsupportedFormat(_) => 400,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::Io(_) | Self::Csv(_) => 500,
        }
    }
}
