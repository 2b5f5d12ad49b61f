//! Decimal rendering of doubles shared by the scalar and bulk normalizers.
//!
//! A nonzero finite number is written as `{sign}{d}.{ddd}e{exp}\n\0` where the
//! mantissa is obtained by scaling the magnitude so that `digits` significant
//! digits sit left of the decimal point and rounding half-to-even. The
//! exponent is the one computed before rounding, so a carry such as
//! `9.9999999 -> 10000000` renders as `+1.e+` and not `+1.e+1`.

use crate::canonicalizer::NormalizationError;

/// Every record ends with a newline and a NUL byte.
pub(crate) const RECORD_END: &[u8] = b"\n\0";

/// Powers of ten that are exact in binary64.
const EXACT_POWERS: [f64; 23] = [
    1e0, 1e1, 1e2, 1e3, 1e4, 1e5, 1e6, 1e7, 1e8, 1e9, 1e10, 1e11, 1e12, 1e13, 1e14, 1e15, 1e16,
    1e17, 1e18, 1e19, 1e20, 1e21, 1e22,
];

/// Second factor when a scale is split in two; `10^300` is finite.
const SPLIT_SHIFT: i64 = 300;

/// Values with a fixed textual form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Special {
    Nan,
    PosInf,
    NegInf,
    PosZero,
    NegZero,
}

impl Special {
    pub(crate) fn classify(n: f64) -> Option<Special> {
        if n.is_nan() {
            Some(Special::Nan)
        } else if n.is_infinite() {
            Some(if n > 0.0 {
                Special::PosInf
            } else {
                Special::NegInf
            })
        } else if n == 0.0 {
            Some(if n.is_sign_negative() {
                Special::NegZero
            } else {
                Special::PosZero
            })
        } else {
            None
        }
    }

    pub(crate) fn literal(self) -> &'static [u8] {
        match self {
            Special::Nan => b"+nan",
            Special::PosInf => b"+inf",
            Special::NegInf => b"-inf",
            Special::PosZero => b"+0.e+",
            Special::NegZero => b"-0.e+",
        }
    }
}

/// `10^k` as a double.
///
/// Non-negative powers are correctly rounded (exact up to `10^22`); negative
/// powers go through the platform `pow`.
pub(crate) fn pow10(k: i64) -> f64 {
    if (0..EXACT_POWERS.len() as i64).contains(&k) {
        EXACT_POWERS[k as usize]
    } else if k > 308 {
        f64::INFINITY
    } else if k > 0 {
        format!("1e{}", k).parse().unwrap_or(f64::INFINITY)
    } else {
        10f64.powf(k as f64)
    }
}

/// Decimal exponent of the most significant digit of a positive magnitude.
pub(crate) fn exponent(magnitude: f64) -> i32 {
    magnitude.log10().floor() as i32
}

/// Scales `magnitude` to `digits` integer digits and rounds half-to-even.
pub(crate) fn scaled_mantissa(
    magnitude: f64,
    exp: i32,
    digits: u32,
) -> Result<f64, NormalizationError> {
    let shift = i64::from(digits) - 1 - i64::from(exp);
    let factor = pow10(shift);
    let scaled = if factor.is_finite() {
        magnitude * factor
    } else {
        // Tiny magnitudes need a factor past f64::MAX; apply it in two steps.
        magnitude * pow10(shift - SPLIT_SHIFT) * pow10(SPLIT_SHIFT)
    };
    let scaled = scaled.round_ties_even();
    if !scaled.is_finite() {
        return Err(NormalizationError::ScaleOverflow { magnitude, digits });
    }
    Ok(scaled)
}

/// Writes a complete record for `n`.
pub(crate) fn write_number(
    out: &mut Vec<u8>,
    n: f64,
    digits: u32,
) -> Result<(), NormalizationError> {
    if let Some(special) = Special::classify(n) {
        out.extend_from_slice(special.literal());
        out.extend_from_slice(RECORD_END);
        return Ok(());
    }
    let negative = n.is_sign_negative();
    let magnitude = n.abs();
    let exp = exponent(magnitude);
    let mantissa = scaled_mantissa(magnitude, exp, digits)?;
    // Fixed-precision formatting of an integral double prints its exact value.
    let rendered = format!("{:.0}", mantissa);
    write_digit_string(out, negative, rendered.as_bytes(), exp);
    Ok(())
}

/// Writes a record from the mantissa's full decimal digit string: the first
/// digit is the integer part and the rest, minus trailing zeros, the fraction.
pub(crate) fn write_digit_string(out: &mut Vec<u8>, negative: bool, mantissa: &[u8], exp: i32) {
    let (first, rest) = match mantissa.split_first() {
        Some((first, rest)) => (*first, rest),
        None => (b'0', &[][..]),
    };
    write_parts(out, negative, first, strip_trailing_zeros(rest), exp);
}

/// Writes `{sign}{int}.{frac}e{exp}\n\0`.
pub(crate) fn write_parts(
    out: &mut Vec<u8>,
    negative: bool,
    int_digit: u8,
    fraction: &[u8],
    exp: i32,
) {
    out.push(if negative { b'-' } else { b'+' });
    out.push(int_digit);
    out.push(b'.');
    out.extend_from_slice(fraction);
    out.push(b'e');
    write_exponent(out, exp);
    out.extend_from_slice(RECORD_END);
}

/// Zero is the bare `+`; everything else is explicitly signed, unpadded.
fn write_exponent(out: &mut Vec<u8>, exp: i32) {
    if exp == 0 {
        out.push(b'+');
    } else {
        out.extend_from_slice(format!("{:+}", exp).as_bytes());
    }
}

pub(crate) fn strip_trailing_zeros(digits: &[u8]) -> &[u8] {
    let end = digits
        .iter()
        .rposition(|&d| d != b'0')
        .map_or(0, |pos| pos + 1);
    &digits[..end]
}
