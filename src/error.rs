//! Error types for GLEU scoring

use thiserror::Error;

/// Errors surfaced to callers of the scoring entry points.
///
/// Every variant except `Worker` is an argument error: the call is rejected
/// before any pair is scored, so no partial results are ever returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GleuError {
    #[error("Got {predictions} predictions but {references} reference lists")]
    LengthMismatch {
        predictions: usize,
        references: usize,
    },

    #[error("min_len must be at least 1, got {0}")]
    MinLenTooSmall(i64),

    #[error("min_len ({min_len}) is greater than max_len ({max_len})")]
    InvertedRange { min_len: usize, max_len: usize },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Scoring worker failed: {0}")]
    Worker(String),
}

impl GleuError {
    /// True for errors caused by the caller's arguments.
    pub fn is_argument_error(&self) -> bool {
        !matches!(self, GleuError::Worker(_))
    }
}

/// Result type for GLEU operations
pub type Result<T> = std::result::Result<T, GleuError>;
