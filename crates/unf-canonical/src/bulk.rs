//! Bulk normalization of homogeneous numeric data.
//!
//! Each stage of the number format runs over the whole buffer before the
//! next one starts: load (signs, magnitudes, special values), exponents,
//! rounded mantissas, rendering. Output is byte-identical to normalizing the
//! elements one at a time.

use tracing::trace;

use crate::canonicalizer::NormalizationError;
use crate::config::Digits;
use crate::decimal::{self, Special, RECORD_END};
use crate::value::Value;

/// Largest digit count whose mantissas fit the `u64` staging buffer.
pub const BULK_MAX_DIGITS: u32 = 18;

/// Stand-in magnitude for special values so `log10` stays in its domain.
const PLACEHOLDER: f64 = 1.0;

/// Borrowed homogeneous numeric buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericSlice<'a> {
    /// Integers, converted to the nearest double.
    Integer(&'a [i64]),
    /// Doubles.
    Real(&'a [f64]),
}

impl<'a> NumericSlice<'a> {
    /// Number of elements.
    pub fn len(&self) -> usize {
        match self {
            NumericSlice::Integer(values) => values.len(),
            NumericSlice::Real(values) => values.len(),
        }
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Elements as doubles.
    pub fn iter(&self) -> NumericIter<'a> {
        match *self {
            NumericSlice::Integer(values) => NumericIter::Integer(values.iter()),
            NumericSlice::Real(values) => NumericIter::Real(values.iter()),
        }
    }
}

/// Iterator over a [`NumericSlice`] as doubles.
#[derive(Debug, Clone)]
pub enum NumericIter<'a> {
    /// Over integers.
    Integer(std::slice::Iter<'a, i64>),
    /// Over doubles.
    Real(std::slice::Iter<'a, f64>),
}

impl Iterator for NumericIter<'_> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        match self {
            NumericIter::Integer(iter) => iter.next().map(|&i| i as f64),
            NumericIter::Real(iter) => iter.next().copied(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            NumericIter::Integer(iter) => iter.size_hint(),
            NumericIter::Real(iter) => iter.size_hint(),
        }
    }
}

impl ExactSizeIterator for NumericIter<'_> {}

/// Whether `shape` has at most one dimension longer than one.
pub fn is_effectively_flat(shape: &[usize]) -> bool {
    shape.iter().filter(|&&dim| dim > 1).count() <= 1
}

/// Working buffers for bulk normalization, reusable across calls.
#[derive(Debug, Default)]
pub struct BulkWorkspace {
    negative: Vec<bool>,
    special: Vec<Option<Special>>,
    magnitude: Vec<f64>,
    exponent: Vec<i32>,
    mantissa: Vec<u64>,
}

impl BulkWorkspace {
    /// Creates an empty workspace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a workspace sized for `len` elements.
    pub fn with_capacity(len: usize) -> Self {
        Self {
            negative: Vec::with_capacity(len),
            special: Vec::with_capacity(len),
            magnitude: Vec::with_capacity(len),
            exponent: Vec::with_capacity(len),
            mantissa: Vec::with_capacity(len),
        }
    }

    /// Normalizes a numeric buffer.
    pub fn normalize(
        &mut self,
        values: NumericSlice<'_>,
        digits: Digits,
    ) -> Result<Vec<u8>, NormalizationError> {
        check_digits(digits)?;
        match values {
            NumericSlice::Integer(values) => self.load(values.iter().map(|&i| i as f64)),
            NumericSlice::Real(values) => self.load(values.iter().copied()),
        }
        self.run(digits)
    }

    /// Normalizes a slice of values, all of which must be integers or reals.
    pub fn normalize_values(
        &mut self,
        values: &[Value],
        digits: Digits,
    ) -> Result<Vec<u8>, NormalizationError> {
        check_digits(digits)?;
        if let Some((index, value)) = values.iter().enumerate().find(|(_, v)| !v.is_numeric()) {
            return Err(NormalizationError::NonNumericElement {
                index,
                kind: value.kind(),
            });
        }
        self.load(values.iter().filter_map(Value::as_f64));
        self.run(digits)
    }

    fn run(&mut self, digits: Digits) -> Result<Vec<u8>, NormalizationError> {
        trace!(len = self.magnitude.len(), %digits, "bulk normalization");
        self.compute_exponents();
        self.compute_mantissas(digits.get())?;
        Ok(self.render(digits.get()))
    }

    fn load(&mut self, values: impl Iterator<Item = f64>) {
        self.negative.clear();
        self.special.clear();
        self.magnitude.clear();
        for n in values {
            let special = Special::classify(n);
            self.negative.push(n.is_sign_negative());
            self.special.push(special);
            self.magnitude
                .push(if special.is_some() { PLACEHOLDER } else { n.abs() });
        }
    }

    fn compute_exponents(&mut self) {
        self.exponent.clear();
        self.exponent
            .extend(self.magnitude.iter().map(|&m| decimal::exponent(m)));
    }

    fn compute_mantissas(&mut self, digits: u32) -> Result<(), NormalizationError> {
        self.mantissa.clear();
        for (&magnitude, &exp) in self.magnitude.iter().zip(&self.exponent) {
            let scaled = decimal::scaled_mantissa(magnitude, exp, digits)?;
            // Within the digit envelope the scaled value is an integer below 2^63.
            self.mantissa.push(scaled as u64);
        }
        Ok(())
    }

    fn render(&self, digits: u32) -> Vec<u8> {
        let width = (digits - 1) as usize;
        let divisor = 10u64.pow(digits - 1);
        let mut fraction = [b'0'; BULK_MAX_DIGITS as usize];
        let mut out = Vec::with_capacity(self.mantissa.len() * (width + 12));

        for i in 0..self.mantissa.len() {
            if let Some(special) = self.special[i] {
                out.extend_from_slice(special.literal());
                out.extend_from_slice(RECORD_END);
                continue;
            }
            let (negative, exp, mantissa) = (self.negative[i], self.exponent[i], self.mantissa[i]);
            let int_part = mantissa / divisor;
            if (1..=9).contains(&int_part) {
                // Left-pad to the full width so leading fractional zeros
                // (0.9005... -> 9.005...) survive.
                let mut rest = mantissa % divisor;
                for slot in fraction[..width].iter_mut().rev() {
                    *slot = b'0' + (rest % 10) as u8;
                    rest /= 10;
                }
                decimal::write_parts(
                    &mut out,
                    negative,
                    b'0' + int_part as u8,
                    decimal::strip_trailing_zeros(&fraction[..width]),
                    exp,
                );
            } else {
                // Carry to 10^digits, or a short mantissa after log10 rounding.
                let digit_string = mantissa.to_string();
                decimal::write_digit_string(&mut out, negative, digit_string.as_bytes(), exp);
            }
        }
        out
    }
}

fn check_digits(digits: Digits) -> Result<(), NormalizationError> {
    if digits.get() > BULK_MAX_DIGITS {
        return Err(NormalizationError::DigitsOutOfRange {
            digits: digits.get(),
            max: BULK_MAX_DIGITS,
        });
    }
    Ok(())
}

/// Normalizes a homogeneous numeric buffer with freshly sized buffers.
pub fn normalize_numeric_bulk(
    values: NumericSlice<'_>,
    digits: Digits,
) -> Result<Vec<u8>, NormalizationError> {
    BulkWorkspace::with_capacity(values.len()).normalize(values, digits)
}

/// Normalizes a sequence of numeric values; any other kind is rejected so
/// the caller can fall back to the element-wise path.
pub fn normalize_values(values: &[Value], digits: Digits) -> Result<Vec<u8>, NormalizationError> {
    BulkWorkspace::with_capacity(values.len()).normalize_values(values, digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bulk(values: &[f64], digits: u32) -> Vec<u8> {
        normalize_numeric_bulk(NumericSlice::Real(values), Digits::new(i64::from(digits)).unwrap())
            .unwrap()
    }

    #[test]
    fn keeps_leading_fraction_zeros() {
        assert_eq!(bulk(&[0.9005000798402081], 7), b"+9.005001e-1\n\0");
        assert_eq!(bulk(&[1.000001], 7), b"+1.000001e+\n\0");
        assert_eq!(bulk(&[1.00010001], 7), b"+1.0001e+\n\0");
    }

    #[test]
    fn exponents_with_zero_digits() {
        assert_eq!(bulk(&[1e0, 1e1, 1e10, 1e100, 1e101], 7),
            b"+1.e+\n\0+1.e+1\n\0+1.e+10\n\0+1.e+100\n\0+1.e+101\n\0");
    }

    #[test]
    fn specials_overwrite_placeholders() {
        assert_eq!(
            bulk(&[f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 0.0, -0.0], 7),
            b"+nan\n\0+inf\n\0-inf\n\0+0.e+\n\0-0.e+\n\0"
        );
    }

    #[test]
    fn carry_renders_like_scalar_path() {
        assert_eq!(bulk(&[9.9999999, -9.6], 7), b"+1.e+\n\0-9.6e+\n\0");
        assert_eq!(bulk(&[9.6], 1), b"+1.e+\n\0");
    }

    #[test]
    fn integers_share_the_format() {
        let out = normalize_numeric_bulk(NumericSlice::Integer(&[-300, 12345635]), Digits::DEFAULT)
            .unwrap();
        assert_eq!(out, b"-3.e+2\n\0+1.234564e+7\n\0");
    }

    #[test]
    fn empty_input_has_empty_form() {
        assert!(bulk(&[], 7).is_empty());
    }

    #[test]
    fn rejects_digits_beyond_envelope() {
        let err = normalize_numeric_bulk(NumericSlice::Real(&[1.0]), Digits::new(19).unwrap())
            .unwrap_err();
        assert!(matches!(err, NormalizationError::DigitsOutOfRange { digits: 19, .. }));
    }

    #[test]
    fn rejects_non_numeric_values() {
        let values = vec![Value::Real(1.0), Value::Missing];
        let err = normalize_values(&values, Digits::DEFAULT).unwrap_err();
        assert_eq!(
            err,
            NormalizationError::NonNumericElement {
                index: 1,
                kind: "missing"
            }
        );
    }

    #[test]
    fn workspace_is_reusable() {
        let mut workspace = BulkWorkspace::new();
        let first = workspace
            .normalize(NumericSlice::Real(&[1.5, 2.5, 3.5]), Digits::DEFAULT)
            .unwrap();
        let second = workspace
            .normalize(NumericSlice::Real(&[4.5]), Digits::DEFAULT)
            .unwrap();
        assert_eq!(first, b"+1.5e+\n\0+2.5e+\n\0+3.5e+\n\0");
        assert_eq!(second, b"+4.5e+\n\0");
    }

    #[test]
    fn workspace_keeps_buffer_capacity() {
        let mut workspace = BulkWorkspace::with_capacity(4);
        workspace
            .normalize(NumericSlice::Integer(&[1, 2, 3, 4]), Digits::DEFAULT)
            .unwrap();
        let capacity = workspace.magnitude.capacity();
        workspace
            .normalize(NumericSlice::Real(&[0.5, 0.25]), Digits::DEFAULT)
            .unwrap();
        assert_eq!(workspace.magnitude.capacity(), capacity);
        assert_eq!(workspace.magnitude, vec![0.5, 0.25]);
    }

    #[test]
    fn slice_iterates_as_doubles() {
        let ints = NumericSlice::Integer(&[1, -2, i64::MAX]);
        assert_eq!(ints.iter().len(), 3);
        assert_eq!(ints.iter().collect::<Vec<_>>(), vec![1.0, -2.0, i64::MAX as f64]);
        let reals = NumericSlice::Real(&[0.5, f64::INFINITY]);
        assert_eq!(reals.iter().collect::<Vec<_>>(), vec![0.5, f64::INFINITY]);
    }

    #[test]
    fn flat_shapes() {
        assert!(is_effectively_flat(&[5]));
        assert!(is_effectively_flat(&[1, 5]));
        assert!(is_effectively_flat(&[5, 1]));
        assert!(is_effectively_flat(&[1, 1]));
        assert!(!is_effectively_flat(&[2, 3]));
        assert!(!is_effectively_flat(&[2, 3, 4]));
    }
}
