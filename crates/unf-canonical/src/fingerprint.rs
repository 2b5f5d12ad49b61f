use std::fmt;
use std::str::FromStr;

use base64::Engine;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::config::{Digits, UnfConfig};
use crate::validation::ValidationError;

/// A versioned fingerprint: `UNF:6:<b64>` or `UNF:6:N<digits>:<b64>`.
///
/// The digest is standard base64 (with padding) of the first 16 bytes of a
/// SHA-256 hash. The `N<digits>:` segment is present only for non-default
/// precision.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    version: u32,
    digits: Digits,
    digest: String,
}

impl Fingerprint {
    /// Constructs a validated fingerprint from its parts.
    pub fn new(digits: Digits, digest: impl Into<String>) -> Result<Self, ValidationError> {
        let digest = digest.into();
        if !is_valid_digest(&digest) {
            return Err(ValidationError::MalformedFingerprint {
                value: digest,
                reason: "digest is not base64 of 16 bytes",
            });
        }
        Ok(Self::from_parts(digits, digest))
    }

    /// Parts produced by the encoder are valid by construction.
    pub(crate) fn from_parts(digits: Digits, digest: String) -> Self {
        Self {
            version: UnfConfig::V6.version(),
            digits,
            digest,
        }
    }

    /// Parses the textual form.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let malformed = |reason| ValidationError::MalformedFingerprint {
            value: value.to_string(),
            reason,
        };
        let re = Regex::new(r"^UNF:([0-9]+):(?:N([^:]*):)?([^:]*)$").expect("invalid regex");
        let caps = re
            .captures(value)
            .ok_or_else(|| malformed("expected UNF:<version>:[N<digits>:]<digest>"))?;

        if caps[1].parse::<u32>().ok() != Some(UnfConfig::V6.version()) {
            return Err(malformed("unsupported version"));
        }
        let digits = match caps.get(2) {
            Some(tag) => {
                let digits = Digits::parse(tag.as_str())?;
                if digits.is_default() || tag.as_str() != digits.to_string() {
                    return Err(malformed("digit tag is not in canonical form"));
                }
                digits
            }
            None => Digits::DEFAULT,
        };
        let digest = &caps[3];
        if !is_valid_digest(digest) {
            return Err(malformed("digest is not base64 of 16 bytes"));
        }
        Ok(Self::from_parts(digits, digest.to_string()))
    }

    /// Algorithm version (always 6).
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Digit count the fingerprint was computed with.
    pub fn digits(&self) -> Digits {
        self.digits
    }

    /// Base64 digest without the header.
    pub fn digest(&self) -> &str {
        &self.digest
    }
}

fn is_valid_digest(digest: &str) -> bool {
    // 16 bytes: 21 free characters, one carrying 2 bits, then `==`.
    let re = Regex::new(r"^[A-Za-z0-9+/]{21}[AQgw]==$").expect("invalid regex");
    re.is_match(digest)
        && base64::engine::general_purpose::STANDARD
            .decode(digest)
            .map(|bytes| bytes.len() == UnfConfig::V6.digest_len())
            .unwrap_or(false)
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.digits.is_default() {
            write!(f, "UNF:{}:{}", self.version, self.digest)
        } else {
            write!(f, "UNF:{}:N{}:{}", self.version, self.digits, self.digest)
        }
    }
}

impl FromStr for Fingerprint {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Fingerprint::parse(s)
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Fingerprint::parse(&raw).map_err(serde::de::Error::custom)
    }
}
