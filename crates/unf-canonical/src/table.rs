//! Tabular adapter: named columns fingerprinted as an unordered collection.
//!
//! A column is an ordered sequence of scalars; a table's fingerprint depends
//! on each column's content and row order but not on column order. A table
//! with a single column has exactly that column's fingerprint.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::canonicalizer::{Canonicalizer, NormalizationError};
use crate::config::Digits;
use crate::encoder::{combine_digests, compute_digest};
use crate::error::UnfError;
use crate::fingerprint::Fingerprint;
use crate::value::Value;

/// Declared type of a column, as reported by the data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Integers; missing values allowed.
    Integer,
    /// Doubles (integers accepted); NaN is a value.
    Real,
    /// Doubles where NaN stands in for a missing value.
    NullableReal,
    /// Booleans; missing values allowed.
    Boolean,
    /// Text; missing values allowed.
    Text,
    /// Any scalar kind.
    Mixed,
}

impl ColumnType {
    fn admits(self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Sequence(_)) => false,
            (_, Value::Missing) | (ColumnType::Mixed, _) => true,
            (ColumnType::Integer, Value::Integer(_)) => true,
            (ColumnType::Real | ColumnType::NullableReal, v) => v.is_numeric(),
            (ColumnType::Boolean, Value::Boolean(_)) => true,
            (ColumnType::Text, Value::Text(_)) => true,
            _ => false,
        }
    }
}

/// A named, typed, ordered column of scalars.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    column_type: ColumnType,
    values: Vec<Value>,
}

impl Column {
    /// Constructs a column, checking every value against the declared type.
    pub fn new(
        name: impl Into<String>,
        column_type: ColumnType,
        values: Vec<Value>,
    ) -> Result<Self, NormalizationError> {
        let name = name.into();
        for (index, value) in values.iter().enumerate() {
            if let Value::Sequence(_) = value {
                return Err(NormalizationError::NestedSequence { index });
            }
            if !column_type.admits(value) {
                return Err(NormalizationError::ColumnTypeMismatch {
                    column: name,
                    index,
                    kind: value.kind(),
                });
            }
        }
        Ok(Self {
            name,
            column_type,
            values,
        })
    }

    /// A nullable double column: NaN entries are missing values.
    pub fn from_reals(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            column_type: ColumnType::NullableReal,
            values: values.into_iter().map(Value::Real).collect(),
        }
    }

    /// An integer column with optional missing entries.
    pub fn from_integers(name: impl Into<String>, values: Vec<Option<i64>>) -> Self {
        Self {
            name: name.into(),
            column_type: ColumnType::Integer,
            values: values.into_iter().map(Value::from).collect(),
        }
    }

    /// A text column with optional missing entries.
    pub fn from_text(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            column_type: ColumnType::Text,
            values: values.into_iter().map(Value::from).collect(),
        }
    }

    /// Column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared column type.
    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The sequence handed to the canonicalizer, with the column type's
    /// missing sentinels replaced by [`Value::Missing`].
    pub fn to_sequence(&self) -> Value {
        let values = match self.column_type {
            ColumnType::NullableReal => self
                .values
                .iter()
                .map(|v| match v {
                    Value::Real(r) if r.is_nan() => Value::Missing,
                    other => other.clone(),
                })
                .collect(),
            _ => self.values.clone(),
        };
        Value::Sequence(values)
    }

    /// Base64 digest of the column.
    pub fn digest(
        &self,
        digits: Digits,
        canonicalizer: &Canonicalizer,
    ) -> Result<String, UnfError> {
        compute_digest(&self.to_sequence(), digits, canonicalizer)
    }

    /// Fingerprint of the column.
    pub fn fingerprint(
        &self,
        digits: Digits,
        canonicalizer: &Canonicalizer,
    ) -> Result<Fingerprint, UnfError> {
        Ok(Fingerprint::from_parts(digits, self.digest(digits, canonicalizer)?))
    }
}

/// A non-empty set of uniquely named columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Constructs a table. Column order is kept for display only.
    pub fn new(columns: Vec<Column>) -> Result<Self, NormalizationError> {
        if columns.is_empty() {
            return Err(NormalizationError::EmptyTable);
        }
        let mut seen = BTreeSet::new();
        for column in &columns {
            if !seen.insert(column.name()) {
                return Err(NormalizationError::DuplicateColumn {
                    name: column.name().to_string(),
                });
            }
        }
        Ok(Self { columns })
    }

    /// Columns in insertion order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Base64 digest of the table.
    pub fn digest(
        &self,
        digits: Digits,
        canonicalizer: &Canonicalizer,
    ) -> Result<String, UnfError> {
        if let [only] = self.columns.as_slice() {
            return only.digest(digits, canonicalizer);
        }
        debug!(columns = self.columns.len(), %digits, "fingerprinting table");
        let digests = self
            .columns
            .iter()
            .map(|column| column.digest(digits, canonicalizer))
            .collect::<Result<Vec<_>, _>>()?;
        combine_digests(digests, canonicalizer)
    }

    /// Fingerprint of the table.
    pub fn fingerprint(
        &self,
        digits: Digits,
        canonicalizer: &Canonicalizer,
    ) -> Result<Fingerprint, UnfError> {
        Ok(Fingerprint::from_parts(digits, self.digest(digits, canonicalizer)?))
    }
}

impl TryFrom<&serde_json::Map<String, serde_json::Value>> for Table {
    type Error = NormalizationError;

    /// Each member must be an array; JSON `null` is a missing value.
    fn try_from(map: &serde_json::Map<String, serde_json::Value>) -> Result<Self, Self::Error> {
        let columns = map
            .iter()
            .map(|(name, column)| match Value::try_from(column)? {
                Value::Sequence(values) => Column::new(name.clone(), ColumnType::Mixed, values),
                other => Err(NormalizationError::UnsupportedType {
                    kind: format!("column '{}' is a {}, not an array", name, other.kind()),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Table::new(columns)
    }
}
