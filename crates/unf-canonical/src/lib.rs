//! Universal Numeric Fingerprints (UNF version 6).
//!
//! A value is normalized into an exact byte string, hashed with SHA-256,
//! truncated to 16 bytes, base64-encoded and wrapped as `UNF:6:<digest>`
//! (or `UNF:6:N<digits>:<digest>` at non-default precision). The normal form
//! is a wire format: every byte is fixed by the algorithm.
//!
//! ```rust
//! use unf_canonical::{fingerprint, Digits, Value};
//!
//! let value: Value = vec![Some(1.23456789), None, Some(0.0)].into();
//! let fp = fingerprint(&value, Digits::DEFAULT)?;
//! assert_eq!(fp.to_string(), "UNF:6:Do5dfAoOOFt4FSj0JcByEw==");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
#![deny(missing_docs)]

/// Numeric arrays with n-dimensional shapes.
pub mod array;
/// Staged normalization of homogeneous numeric buffers.
pub mod bulk;
/// Value normalization and path selection.
pub mod canonicalizer;
/// Algorithm constants and digit counts.
pub mod config;
mod decimal;
/// Hashing and fingerprint construction.
pub mod encoder;
/// Top-level error types.
pub mod error;
/// Fingerprint header type.
pub mod fingerprint;
/// Named columns and tables.
pub mod table;
/// Configuration and header validation errors.
pub mod validation;
/// The value model.
pub mod value;

pub use array::{NumericArray, NumericBuffer};
pub use bulk::{
    normalize_numeric_bulk, BulkWorkspace, NumericIter, NumericSlice, BULK_MAX_DIGITS,
};
pub use canonicalizer::{select_strategy, Canonicalizer, NormalizationError, Strategy};
pub use config::{Digits, UnfConfig};
pub use encoder::{
    combine_digests, compute_digest, compute_fingerprint, digest_bytes, verify_fingerprint,
};
pub use error::{ErrorClass, UnfError};
pub use fingerprint::Fingerprint;
pub use table::{Column, ColumnType, Table};
pub use validation::ValidationError;
pub use value::Value;

/// Normalized bytes of a value with the default profile.
pub fn normalize(value: &Value, digits: Digits) -> Result<Vec<u8>, UnfError> {
    Ok(Canonicalizer::default().normalize(value, digits)?)
}

/// Base64 digest of a value, without the `UNF:6:` header.
pub fn digest(value: &Value, digits: Digits) -> Result<String, UnfError> {
    compute_digest(value, digits, &Canonicalizer::default())
}

/// Fingerprint of a value.
pub fn fingerprint(value: &Value, digits: Digits) -> Result<Fingerprint, UnfError> {
    compute_fingerprint(value, digits, &Canonicalizer::default())
}

/// Whether `claimed` is the fingerprint of `value`.
pub fn verify(value: &Value, claimed: &Fingerprint) -> Result<bool, UnfError> {
    verify_fingerprint(value, claimed, &Canonicalizer::default())
}
