use thiserror::Error;

use crate::error::ErrorClass;

/// Validation errors for configuration values and fingerprint headers.
///
/// These are raised before any data is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The digit count is not an integer.
    #[error("digits must be an integer, got '{value}'")]
    DigitsNotInteger {
        /// Offending value, as supplied.
        value: String,
    },
    /// The digit count is an integer but not a positive one.
    #[error("digits must be positive, got {value}")]
    DigitsOutOfBounds {
        /// Offending value.
        value: String,
    },
    /// A fingerprint string does not follow the `UNF:6:[N<d>:]<b64>` layout.
    #[error("malformed fingerprint '{value}': {reason}")]
    MalformedFingerprint {
        /// Offending text.
        value: String,
        /// What part of the header was rejected.
        reason: &'static str,
    },
}

impl ValidationError {
    /// Whether the error reflects a type mismatch or a bad value.
    pub fn class(&self) -> ErrorClass {
        match self {
            ValidationError::DigitsNotInteger { .. } => ErrorClass::Type,
            ValidationError::DigitsOutOfBounds { .. }
            | ValidationError::MalformedFingerprint { .. } => ErrorClass::Value,
        }
    }
}
