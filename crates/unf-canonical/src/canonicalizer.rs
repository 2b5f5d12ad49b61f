use tracing::{debug, trace};

use crate::bulk::{self, NumericSlice, BULK_MAX_DIGITS};
use crate::config::{Digits, UnfConfig};
use crate::decimal::{self, RECORD_END};
use crate::error::ErrorClass;
use crate::value::Value;

/// Normal form of a missing value.
const MISSING: &[u8] = b"\0\0\0";

/// Error returned when a value cannot be normalized.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum NormalizationError {
    /// A sequence element was itself a sequence.
    #[error("nested sequence at element {index}")]
    NestedSequence {
        /// Position of the offending element.
        index: usize,
    },
    /// The input has no normal form.
    #[error("unsupported type for data: {kind}")]
    UnsupportedType {
        /// Description of the rejected input.
        kind: String,
    },
    /// The bulk numeric path was handed a non-numeric element.
    #[error("bulk numeric path requires integers or reals, found {kind} at element {index}")]
    NonNumericElement {
        /// Position of the offending element.
        index: usize,
        /// Kind of the offending element.
        kind: &'static str,
    },
    /// The bulk numeric path was handed an array with more than one non-trivial dimension.
    #[error("array shape {shape:?} is not effectively one-dimensional")]
    UnsupportedShape {
        /// Offending shape.
        shape: Vec<usize>,
    },
    /// The bulk numeric path does not support this many digits.
    #[error("bulk numeric path supports at most {max} digits, got {digits}")]
    DigitsOutOfRange {
        /// Requested digit count.
        digits: u32,
        /// Largest supported digit count.
        max: u32,
    },
    /// The requested digit count needs a scale factor beyond any double.
    #[error("cannot scale {magnitude:e} to {digits} digits without overflow")]
    ScaleOverflow {
        /// Magnitude being normalized.
        magnitude: f64,
        /// Requested digit count.
        digits: u32,
    },
    /// A column value does not match the column's declared type.
    #[error("column '{column}' element {index} has kind {kind}, not allowed by its type")]
    ColumnTypeMismatch {
        /// Column name.
        column: String,
        /// Position of the offending element.
        index: usize,
        /// Kind of the offending element.
        kind: &'static str,
    },
    /// Two table columns share a name.
    #[error("duplicate column '{name}'")]
    DuplicateColumn {
        /// Repeated column name.
        name: String,
    },
    /// A table without columns has no fingerprint.
    #[error("table has no columns")]
    EmptyTable,
}

impl NormalizationError {
    /// Whether the error reflects a type mismatch or a bad value/shape.
    pub fn class(&self) -> ErrorClass {
        match self {
            NormalizationError::NestedSequence { .. }
            | NormalizationError::UnsupportedType { .. }
            | NormalizationError::NonNumericElement { .. } => ErrorClass::Type,
            NormalizationError::UnsupportedShape { .. }
            | NormalizationError::DigitsOutOfRange { .. }
            | NormalizationError::ScaleOverflow { .. }
            | NormalizationError::ColumnTypeMismatch { .. }
            | NormalizationError::DuplicateColumn { .. }
            | NormalizationError::EmptyTable => ErrorClass::Value,
        }
    }
}

/// Which normalization path produces the bytes. Both paths yield identical
/// output for every input the bulk path accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Element-wise dispatch over every value kind.
    Scalar,
    /// Staged numeric normalization of a homogeneous numeric sequence.
    Bulk,
}

/// Picks the bulk path for non-empty all-numeric sequences within its digit
/// envelope, the scalar path for everything else.
pub fn select_strategy(value: &Value, digits: Digits) -> Strategy {
    match value {
        Value::Sequence(items)
            if !items.is_empty()
                && digits.get() <= BULK_MAX_DIGITS
                && items.iter().all(Value::is_numeric) =>
        {
            Strategy::Bulk
        }
        _ => Strategy::Scalar,
    }
}

/// Canonicalizer that emits the UNF normal form of a value.
#[derive(Debug, Clone, Default)]
pub struct Canonicalizer {
    config: UnfConfig,
}

impl Canonicalizer {
    /// Creates a canonicalizer for the provided algorithm profile.
    pub fn new(config: UnfConfig) -> Self {
        Self { config }
    }

    /// Algorithm constants in effect.
    pub fn config(&self) -> &UnfConfig {
        &self.config
    }

    /// Produces normalized bytes, choosing the path with [`select_strategy`].
    pub fn normalize(&self, value: &Value, digits: Digits) -> Result<Vec<u8>, NormalizationError> {
        let strategy = select_strategy(value, digits);
        debug!(?strategy, kind = value.kind(), %digits, "normalizing value");
        self.normalize_with(value, digits, strategy)
    }

    /// Produces normalized bytes along an explicitly chosen path.
    ///
    /// Forcing [`Strategy::Bulk`] on input outside its envelope returns the
    /// envelope error instead of falling back.
    pub fn normalize_with(
        &self,
        value: &Value,
        digits: Digits,
        strategy: Strategy,
    ) -> Result<Vec<u8>, NormalizationError> {
        match strategy {
            Strategy::Scalar => self.normalize_elementwise(value, digits),
            Strategy::Bulk => match value {
                Value::Sequence(items) => bulk::normalize_values(items, digits),
                other => Err(NormalizationError::NonNumericElement {
                    index: 0,
                    kind: other.kind(),
                }),
            },
        }
    }

    /// Normalizes a homogeneous numeric buffer, using the bulk path when the
    /// digit count allows it and the element-wise path otherwise.
    pub fn normalize_numeric(
        &self,
        values: NumericSlice<'_>,
        digits: Digits,
    ) -> Result<Vec<u8>, NormalizationError> {
        match bulk::normalize_numeric_bulk(values, digits) {
            Err(NormalizationError::DigitsOutOfRange { .. }) => {
                debug!(%digits, len = values.len(), "bulk path rejected digits, falling back");
                let mut out = Vec::new();
                for n in values.iter() {
                    decimal::write_number(&mut out, n, digits.get())?;
                }
                Ok(out)
            }
            other => other,
        }
    }

    fn normalize_elementwise(
        &self,
        value: &Value,
        digits: Digits,
    ) -> Result<Vec<u8>, NormalizationError> {
        match value {
            Value::Sequence(items) => {
                trace!(len = items.len(), "normalizing sequence element-wise");
                let mut out = Vec::new();
                for (index, item) in items.iter().enumerate() {
                    if let Value::Sequence(_) = item {
                        return Err(NormalizationError::NestedSequence { index });
                    }
                    self.write_scalar(&mut out, item, digits)?;
                }
                Ok(out)
            }
            scalar => {
                let mut out = Vec::new();
                self.write_scalar(&mut out, scalar, digits)?;
                Ok(out)
            }
        }
    }

    fn write_scalar(
        &self,
        out: &mut Vec<u8>,
        value: &Value,
        digits: Digits,
    ) -> Result<(), NormalizationError> {
        match value {
            Value::Missing => out.extend_from_slice(MISSING),
            Value::Boolean(b) => {
                decimal::write_number(out, if *b { 1.0 } else { 0.0 }, digits.get())?
            }
            Value::Integer(i) => decimal::write_number(out, *i as f64, digits.get())?,
            Value::Real(r) => decimal::write_number(out, *r, digits.get())?,
            Value::Text(s) => {
                let bytes = s.as_bytes();
                out.extend_from_slice(&bytes[..bytes.len().min(self.config.max_text_bytes())]);
                out.extend_from_slice(RECORD_END);
            }
            // Callers strip the outer sequence before reaching here.
            Value::Sequence(_) => return Err(NormalizationError::NestedSequence { index: 0 }),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(value: impl Into<Value>) -> Vec<u8> {
        Canonicalizer::default()
            .normalize(&value.into(), Digits::DEFAULT)
            .unwrap()
    }

    #[test]
    fn missing_is_three_nuls() {
        assert_eq!(normalize(Value::Missing), b"\0\0\0");
    }

    #[test]
    fn booleans_normalize_as_integers() {
        assert_eq!(normalize(true), normalize(1));
        assert_eq!(normalize(false), normalize(0));
        assert_eq!(normalize(true), b"+1.e+\n\0");
    }

    #[test]
    fn text_is_truncated_by_bytes() {
        let text = "\u{e9}".repeat(70);
        let out = normalize(text.as_str());
        assert_eq!(out.len(), 130);
        // Byte 128 is the first half of an `é`; the split is kept as-is.
        assert_eq!(&out[126..], b"\xc3\xa9\n\0");
        let text = "\u{e9}".repeat(64) + "x";
        let out = normalize(text.as_str());
        assert_eq!(&out[126..], b"\xc3\xa9\n\0");
    }

    #[test]
    fn odd_byte_cut_splits_code_point() {
        let text = "a".to_string() + &"\u{e9}".repeat(70);
        let out = normalize(text.as_str());
        assert_eq!(out.len(), 130);
        assert_eq!(&out[126..], b"\xa9\xc3\n\0");
    }

    #[test]
    fn sequences_concatenate() {
        let value = Value::Sequence(vec![1.23456789.into(), Value::Missing, 0.into()]);
        assert_eq!(normalize(value), b"+1.234568e+\n\0\0\0\0+0.e+\n\0");
    }

    #[test]
    fn nested_sequences_are_type_errors() {
        let value = Value::Sequence(vec![1.into(), Value::Sequence(vec![2.into()])]);
        let err = Canonicalizer::default()
            .normalize(&value, Digits::DEFAULT)
            .unwrap_err();
        assert_eq!(err, NormalizationError::NestedSequence { index: 1 });
        assert_eq!(err.class(), ErrorClass::Type);
    }

    #[test]
    fn strategy_selection() {
        let digits = Digits::DEFAULT;
        let numbers: Value = vec![1.5, 2.0].into();
        assert_eq!(select_strategy(&numbers, digits), Strategy::Bulk);
        let mixed = Value::Sequence(vec![1.5.into(), Value::Missing]);
        assert_eq!(select_strategy(&mixed, digits), Strategy::Scalar);
        let bools: Value = vec![true, false].into();
        assert_eq!(select_strategy(&bools, digits), Strategy::Scalar);
        assert_eq!(select_strategy(&Value::Sequence(vec![]), digits), Strategy::Scalar);
        assert_eq!(select_strategy(&Value::Real(1.0), digits), Strategy::Scalar);
        assert_eq!(
            select_strategy(&numbers, Digits::new(30).unwrap()),
            Strategy::Scalar
        );
    }

    #[test]
    fn forced_bulk_rejects_mixed_input() {
        let mixed = Value::Sequence(vec![1.5.into(), "a".into()]);
        let err = Canonicalizer::default()
            .normalize_with(&mixed, Digits::DEFAULT, Strategy::Bulk)
            .unwrap_err();
        assert_eq!(
            err,
            NormalizationError::NonNumericElement {
                index: 1,
                kind: "text"
            }
        );
        let scalar = Canonicalizer::default()
            .normalize_with(&mixed, Digits::DEFAULT, Strategy::Scalar)
            .unwrap();
        assert_eq!(scalar, b"+1.5e+\n\0a\n\0");
    }

    #[test]
    fn numeric_buffers_fall_back_beyond_bulk_digits() {
        let canonicalizer = Canonicalizer::default();
        let digits = Digits::new(20).unwrap();
        let out = canonicalizer
            .normalize_numeric(NumericSlice::Real(&[0.5, -2.0]), digits)
            .unwrap();
        assert_eq!(out, b"+5.e-1\n\0-2.e+\n\0");
    }
}
