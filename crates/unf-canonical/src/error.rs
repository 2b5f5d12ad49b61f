use thiserror::Error;

use crate::canonicalizer::NormalizationError;
use crate::validation::ValidationError;

/// Coarse classification of a failure, mirroring the type/value split
/// callers use to decide whether the input or its shape was wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The input had the wrong kind (non-integer digits, nested sequence, ...).
    Type,
    /// The input had the right kind but an unusable value or shape.
    Value,
}

/// Top-level error for fingerprint operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UnfError {
    /// Configuration or header validation failed.
    #[error("invalid configuration: {0}")]
    Validation(#[from] ValidationError),
    /// The data could not be normalized.
    #[error("normalization failed: {0}")]
    Normalization(#[from] NormalizationError),
}

impl UnfError {
    /// Type/value classification of the underlying error.
    pub fn class(&self) -> ErrorClass {
        match self {
            UnfError::Validation(err) => err.class(),
            UnfError::Normalization(err) => err.class(),
        }
    }

    /// Returns `true` for errors caused by the digit count rather than the data.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            UnfError::Validation(
                ValidationError::DigitsNotInteger { .. } | ValidationError::DigitsOutOfBounds { .. }
            )
        )
    }
}
