use tracing::debug;

use crate::bulk::{is_effectively_flat, NumericSlice};
use crate::canonicalizer::{Canonicalizer, NormalizationError};
use crate::config::Digits;
use crate::encoder::{combine_digests, digest_bytes};
use crate::error::UnfError;
use crate::fingerprint::Fingerprint;

/// Row-major storage of a [`NumericArray`].
#[derive(Debug, Clone, PartialEq)]
pub enum NumericBuffer {
    /// Integer elements.
    Integer(Vec<i64>),
    /// Double elements.
    Real(Vec<f64>),
}

impl NumericBuffer {
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn as_slice(&self) -> NumericSlice<'_> {
        match self {
            NumericBuffer::Integer(values) => NumericSlice::Integer(values),
            NumericBuffer::Real(values) => NumericSlice::Real(values),
        }
    }

    fn slice(&self, start: usize, end: usize) -> NumericSlice<'_> {
        match self {
            NumericBuffer::Integer(values) => NumericSlice::Integer(&values[start..end]),
            NumericBuffer::Real(values) => NumericSlice::Real(&values[start..end]),
        }
    }
}

/// A homogeneous numeric array with an n-dimensional shape.
///
/// One-dimensional arrays are vectors. Two-dimensional arrays are a
/// collection of row vectors whose fingerprint ignores row order.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericArray {
    shape: Vec<usize>,
    data: NumericBuffer,
}

impl NumericArray {
    /// Constructs an array; the shape must describe exactly the buffer's length.
    pub fn new(shape: Vec<usize>, data: NumericBuffer) -> Result<Self, NormalizationError> {
        let expected = shape.iter().product::<usize>();
        if expected != data.len() {
            return Err(NormalizationError::UnsupportedShape { shape });
        }
        Ok(Self { shape, data })
    }

    /// A one-dimensional array of doubles.
    pub fn vector(values: Vec<f64>) -> Self {
        Self {
            shape: vec![values.len()],
            data: NumericBuffer::Real(values),
        }
    }

    /// A two-dimensional array from row-major data.
    pub fn matrix(
        rows: usize,
        cols: usize,
        data: NumericBuffer,
    ) -> Result<Self, NormalizationError> {
        Self::new(vec![rows, cols], data)
    }

    /// Array shape.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Normalizes an effectively one-dimensional array through the bulk path.
    pub fn normalize(
        &self,
        digits: Digits,
        canonicalizer: &Canonicalizer,
    ) -> Result<Vec<u8>, NormalizationError> {
        if self.shape.is_empty() {
            return Err(NormalizationError::UnsupportedType {
                kind: "zero-dimensional array".to_string(),
            });
        }
        if !is_effectively_flat(&self.shape) {
            return Err(NormalizationError::UnsupportedShape {
                shape: self.shape.clone(),
            });
        }
        canonicalizer.normalize_numeric(self.data.as_slice(), digits)
    }

    /// Base64 digest of the array.
    pub fn digest(
        &self,
        digits: Digits,
        canonicalizer: &Canonicalizer,
    ) -> Result<String, UnfError> {
        match self.shape.as_slice() {
            [] | [_] => {
                let normalized = self.normalize(digits, canonicalizer)?;
                Ok(digest_bytes(&normalized, canonicalizer))
            }
            &[rows, cols] => {
                let row_digest = |row: usize| -> Result<String, UnfError> {
                    let slice = self.data.slice(row * cols, (row + 1) * cols);
                    let normalized = canonicalizer.normalize_numeric(slice, digits)?;
                    Ok(digest_bytes(&normalized, canonicalizer))
                };
                if rows == 1 {
                    return row_digest(0);
                }
                debug!(rows, cols, "fingerprinting matrix rows");
                let digests = (0..rows).map(row_digest).collect::<Result<Vec<_>, _>>()?;
                combine_digests(digests, canonicalizer)
            }
            _ => Err(NormalizationError::UnsupportedShape {
                shape: self.shape.clone(),
            }
            .into()),
        }
    }

    /// Fingerprint of the array.
    pub fn fingerprint(
        &self,
        digits: Digits,
        canonicalizer: &Canonicalizer,
    ) -> Result<Fingerprint, UnfError> {
        Ok(Fingerprint::from_parts(digits, self.digest(digits, canonicalizer)?))
    }
}
