//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HerError {
    /// Unknown goal strategy, normalization mode or an out-of-range parameter.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Vector dimensions do not agree.
    #[error("Shape mismatch in {what}: expected {expected}, got {got}")]
    ShapeMismatch {
        /// What was being checked.
        what: &'static str,

        /// Expected dimension.
        expected: usize,

        /// Actual dimension.
        got: usize,
    },

    /// More items were requested than the buffer (or its window) holds.
    #[error("Insufficient data: requested {requested} items, {available} available")]
    InsufficientData {
        /// Number of requested items.
        requested: usize,

        /// Number of items available for sampling.
        available: usize,
    },

    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),
}

impl HerError {
    /// Returns [`HerError::ShapeMismatch`] if `expected != got`.
    pub(crate) fn check_dim(what: &'static str, expected: usize, got: usize) -> Result<(), Self> {
        if expected == got {
            Ok(())
        } else {
            Err(Self::ShapeMismatch {
                what,
                expected,
                got,
            })
        }
    }
}
