//! Fingerprint computation: hash, truncate, encode, wrap.
//!
//! A digest is computed as `base64(sha256(normalize(value))[..16])` and a
//! fingerprint wraps it as `UNF:6:[N<digits>:]<digest>`.

use base64::Engine;
use sha2::{Digest as Sha2Digest, Sha256};
use tracing::debug;

use crate::canonicalizer::Canonicalizer;
use crate::config::Digits;
use crate::error::UnfError;
use crate::fingerprint::Fingerprint;
use crate::value::Value;

/// Hashes already-normalized bytes into a base64 digest.
pub fn digest_bytes(normalized: &[u8], canonicalizer: &Canonicalizer) -> String {
    let hash = Sha256::digest(normalized);
    let truncated = &hash[..canonicalizer.config().digest_len()];
    base64::engine::general_purpose::STANDARD.encode(truncated)
}

/// Computes the bare base64 digest of a value.
///
/// # Example
///
/// ```rust
/// use unf_canonical::{compute_digest, Canonicalizer, Digits, Value};
///
/// let canonicalizer = Canonicalizer::default();
/// let digest = compute_digest(&Value::Missing, Digits::DEFAULT, &canonicalizer)?;
/// assert_eq!(digest, "cJ6AyISHokEeHuTfufIqhg==");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// # Errors
///
/// Returns [`UnfError`] if the value cannot be normalized.
pub fn compute_digest(
    value: &Value,
    digits: Digits,
    canonicalizer: &Canonicalizer,
) -> Result<String, UnfError> {
    let normalized = canonicalizer.normalize(value, digits)?;
    Ok(digest_bytes(&normalized, canonicalizer))
}

/// Computes the fingerprint of a value.
///
/// # Example
///
/// ```rust
/// use unf_canonical::{compute_fingerprint, Canonicalizer, Digits, Value};
///
/// let canonicalizer = Canonicalizer::default();
/// let fp = compute_fingerprint(&Value::Real(1.23456789), Digits::new(9)?, &canonicalizer)?;
/// assert_eq!(fp.to_string(), "UNF:6:N9:IKw+l4ywdwsJeDze8dplJA==");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// # Errors
///
/// Returns [`UnfError`] if the value cannot be normalized.
pub fn compute_fingerprint(
    value: &Value,
    digits: Digits,
    canonicalizer: &Canonicalizer,
) -> Result<Fingerprint, UnfError> {
    let digest = compute_digest(value, digits, canonicalizer)?;
    Ok(Fingerprint::from_parts(digits, digest))
}

/// Combines the digests of an unordered collection of sub-sequences.
///
/// The digests are sorted, then normalized and hashed as a sequence of text,
/// so the result ignores the order of the parts.
pub fn combine_digests(
    mut digests: Vec<String>,
    canonicalizer: &Canonicalizer,
) -> Result<String, UnfError> {
    debug!(parts = digests.len(), "combining digests");
    digests.sort();
    let sorted = Value::Sequence(digests.into_iter().map(Value::Text).collect());
    // Text normalization does not depend on the digit count.
    compute_digest(&sorted, canonicalizer.config().default_digits(), canonicalizer)
}

/// Verifies that a claimed fingerprint matches the value, recomputing with
/// the digit count recorded in the fingerprint.
///
/// # Errors
///
/// Returns [`UnfError`] if the value cannot be normalized.
pub fn verify_fingerprint(
    value: &Value,
    claimed: &Fingerprint,
    canonicalizer: &Canonicalizer,
) -> Result<bool, UnfError> {
    let computed = compute_fingerprint(value, claimed.digits(), canonicalizer)?;
    Ok(&computed == claimed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_of_empty_normal_form() {
        let canonicalizer = Canonicalizer::default();
        // SHA-256("") = e3b0c442 98fc1c14 9afbf4c8 996fb924 ...
        assert_eq!(digest_bytes(b"", &canonicalizer), "47DEQpj8HBSa+/TImW+5JA==");
    }

    #[test]
    fn combined_digests_ignore_order() {
        let canonicalizer = Canonicalizer::default();
        let a = "Gu/iYw2g7MIfVrNo1t4+zQ==".to_string();
        let b = "AvELPR5QTaBbnq6S22Msow==".to_string();
        let ab = combine_digests(vec![a.clone(), b.clone()], &canonicalizer).unwrap();
        let ba = combine_digests(vec![b, a], &canonicalizer).unwrap();
        assert_eq!(ab, ba);
    }

    #[test]
    fn verify_uses_claimed_digits() {
        let canonicalizer = Canonicalizer::default();
        let value = Value::Real(1.23456789);
        let claimed = Fingerprint::parse("UNF:6:N9:IKw+l4ywdwsJeDze8dplJA==").unwrap();
        assert!(verify_fingerprint(&value, &claimed, &canonicalizer).unwrap());
        let other = Fingerprint::parse("UNF:6:vcKELUSS4s4k1snF4OTB9A==").unwrap();
        assert!(verify_fingerprint(&value, &other, &canonicalizer).unwrap());
        assert!(!verify_fingerprint(&Value::Real(1.2345), &other, &canonicalizer).unwrap());
    }
}
