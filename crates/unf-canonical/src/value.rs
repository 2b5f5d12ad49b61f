use crate::canonicalizer::NormalizationError;

/// A value that can be fingerprinted.
///
/// Scalars normalize to a single record; a `Sequence` normalizes to the
/// in-order concatenation of its elements' records. A sequence nested inside
/// another sequence is representable but rejected during normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing value (`None`, `NA`, SQL `NULL`).
    Missing,
    /// Boolean; normalizes exactly like the integers 1 and 0.
    Boolean(bool),
    /// Integer; normalizes through the nearest `f64`.
    Integer(i64),
    /// IEEE-754 double, including NaN, infinities and signed zero.
    Real(f64),
    /// Text; only the first 128 UTF-8 bytes participate.
    Text(String),
    /// Ordered sequence of scalars.
    Sequence(Vec<Value>),
}

impl Value {
    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Missing => "missing",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Real(_) => "real",
            Value::Text(_) => "text",
            Value::Sequence(_) => "sequence",
        }
    }

    /// Integers and reals. Booleans do not count.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Real(_))
    }

    /// Numeric view used by the number normalizer.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Real(r) => Some(*r),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Real(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Missing, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::Sequence(values.into_iter().map(Into::into).collect())
    }
}

impl TryFrom<&serde_json::Value> for Value {
    type Error = NormalizationError;

    /// Maps JSON onto the value model. Objects have no scalar meaning and
    /// are rejected; callers wanting table semantics use [`crate::Table`].
    fn try_from(value: &serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::Null => Ok(Value::Missing),
            serde_json::Value::Bool(b) => Ok(Value::Boolean(*b)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Value::Integer(i))
                } else if let Some(u) = n.as_u64() {
                    Ok(Value::Real(u as f64))
                } else {
                    n.as_f64()
                        .map(Value::Real)
                        .ok_or_else(|| NormalizationError::UnsupportedType {
                            kind: format!("number {}", n),
                        })
                }
            }
            serde_json::Value::String(s) => Ok(Value::Text(s.clone())),
            serde_json::Value::Array(items) => items
                .iter()
                .map(Value::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Sequence),
            serde_json::Value::Object(_) => Err(NormalizationError::UnsupportedType {
                kind: "object".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_maps_onto_value_model() {
        let value = Value::try_from(&json!([1, 2.5, null, true, "a"])).unwrap();
        assert_eq!(
            value,
            Value::Sequence(vec![
                Value::Integer(1),
                Value::Real(2.5),
                Value::Missing,
                Value::Boolean(true),
                Value::Text("a".into()),
            ])
        );
    }

    #[test]
    fn json_objects_are_rejected() {
        let err = Value::try_from(&json!({"a": 1})).unwrap_err();
        assert!(matches!(err, NormalizationError::UnsupportedType { .. }));
    }

    #[test]
    fn options_become_missing() {
        let value: Value = vec![Some(1.5), None].into();
        assert_eq!(
            value,
            Value::Sequence(vec![Value::Real(1.5), Value::Missing])
        );
    }

    #[test]
    fn booleans_are_not_numeric() {
        assert!(!Value::Boolean(true).is_numeric());
        assert!(Value::Integer(3).is_numeric());
        assert_eq!(Value::Integer(-3).as_f64(), Some(-3.0));
    }
}
