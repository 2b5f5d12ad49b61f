//! Algorithm constants and the validated digit count.
//!
//! The library never reads the environment; every knob is passed in by the
//! caller so that fingerprints stay reproducible.

use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// Number of significant decimal digits retained when normalizing reals.
///
/// Construction is the only place digit counts are checked: a `Digits` value
/// is always a positive integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct Digits(u32);

impl Digits {
    /// The default digit count (7). Fingerprints at this precision carry no `N` tag.
    pub const DEFAULT: Digits = Digits(7);

    /// Constructs a validated digit count.
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if value < 1 || value > i64::from(u32::MAX) {
            return Err(ValidationError::DigitsOutOfBounds {
                value: value.to_string(),
            });
        }
        Ok(Digits(value as u32))
    }

    /// Parses a digit count from text such as a CLI flag or header tag.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let trimmed = value.trim();
        let re = Regex::new(r"^[+-]?[0-9]+$").expect("invalid regex");
        if !re.is_match(trimmed) {
            return Err(ValidationError::DigitsNotInteger {
                value: value.to_string(),
            });
        }
        // An integer literal too wide for i64 is a bad value, not a bad type.
        let parsed = trimmed
            .parse::<i64>()
            .map_err(|_| ValidationError::DigitsOutOfBounds {
                value: trimmed.to_string(),
            })?;
        Digits::new(parsed)
    }

    /// The digit count as an unsigned integer.
    pub fn get(self) -> u32 {
        self.0
    }

    /// Whether this is the default precision.
    pub fn is_default(self) -> bool {
        self == Digits::DEFAULT
    }
}

impl Default for Digits {
    fn default() -> Self {
        Digits::DEFAULT
    }
}

impl fmt::Display for Digits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Digits {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Digits::parse(s)
    }
}

impl TryFrom<i64> for Digits {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Digits::new(value)
    }
}

impl TryFrom<&serde_json::Value> for Digits {
    type Error = ValidationError;

    /// Only JSON integers are digit counts; `7.0`, `"7"` or `true` are type errors.
    fn try_from(value: &serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::Number(n) if n.is_i64() => Digits::new(n.as_i64().unwrap_or(0)),
            serde_json::Value::Number(n) if n.is_u64() => Err(ValidationError::DigitsOutOfBounds {
                value: n.to_string(),
            }),
            other => Err(ValidationError::DigitsNotInteger {
                value: other.to_string(),
            }),
        }
    }
}

impl From<Digits> for u32 {
    fn from(value: Digits) -> Self {
        value.0
    }
}

/// Fixed constants of a UNF algorithm generation.
///
/// Only version 6 exists; the fields are exposed read-only so that callers
/// cannot produce fingerprints that disagree with other implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UnfConfig {
    version: u32,
    default_digits: Digits,
    max_text_bytes: usize,
    digest_len: usize,
}

impl UnfConfig {
    /// UNF version 6.
    pub const V6: UnfConfig = UnfConfig {
        version: 6,
        default_digits: Digits::DEFAULT,
        max_text_bytes: 128,
        digest_len: 16,
    };

    /// Algorithm generation written into the header.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Precision at which the `N<digits>:` header tag is omitted.
    pub fn default_digits(&self) -> Digits {
        self.default_digits
    }

    /// Text values are cut to this many UTF-8 bytes.
    pub fn max_text_bytes(&self) -> usize {
        self.max_text_bytes
    }

    /// Number of SHA-256 bytes kept in the digest.
    pub fn digest_len(&self) -> usize {
        self.digest_len
    }
}

impl Default for UnfConfig {
    fn default() -> Self {
        UnfConfig::V6
    }
}
