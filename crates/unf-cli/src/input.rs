//! Loading JSON input into something that can be fingerprinted.

use std::io::{self, Read};

use thiserror::Error;
use tracing::debug;
use unf_canonical::{
    compute_digest, compute_fingerprint, Canonicalizer, Digits, Fingerprint, NormalizationError,
    Table, UnfError, Value,
};

/// What the input JSON describes.
pub enum Subject {
    /// Any non-object JSON: a scalar or an array.
    Value(Value),
    /// A JSON object of named column arrays.
    Table(Table),
}

impl Subject {
    pub fn kind(&self) -> &'static str {
        match self {
            Subject::Value(_) => "value",
            Subject::Table(_) => "table",
        }
    }

    pub fn digest(
        &self,
        digits: Digits,
        canonicalizer: &Canonicalizer,
    ) -> Result<String, UnfError> {
        match self {
            Subject::Value(value) => compute_digest(value, digits, canonicalizer),
            Subject::Table(table) => table.digest(digits, canonicalizer),
        }
    }

    pub fn fingerprint(
        &self,
        digits: Digits,
        canonicalizer: &Canonicalizer,
    ) -> Result<Fingerprint, UnfError> {
        match self {
            Subject::Value(value) => compute_fingerprint(value, digits, canonicalizer),
            Subject::Table(table) => table.fingerprint(digits, canonicalizer),
        }
    }
}

/// Failures while turning input into a [`Subject`].
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Failed to read file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Failed to read stdin: {0}")]
    Stdin(#[source] io::Error),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unsupported table: {0}")]
    Table(#[source] NormalizationError),
    #[error("Unsupported value: {0}")]
    Value(#[source] NormalizationError),
}

/// Reads JSON from a file, or stdin when no path is given.
pub fn read_json(input: Option<String>) -> Result<serde_json::Value, InputError> {
    let json_str = if let Some(path) = input {
        std::fs::read_to_string(&path).map_err(|source| InputError::Read { path, source })?
    } else {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(InputError::Stdin)?;
        buffer
    };

    Ok(serde_json::from_str(&json_str)?)
}

/// Reads and converts the input.
pub fn load(input: Option<String>) -> Result<Subject, InputError> {
    let json = read_json(input)?;
    let subject = match &json {
        serde_json::Value::Object(map) => {
            Subject::Table(Table::try_from(map).map_err(InputError::Table)?)
        }
        other => Subject::Value(Value::try_from(other).map_err(InputError::Value)?),
    };
    debug!(kind = subject.kind(), "loaded input");
    Ok(subject)
}
