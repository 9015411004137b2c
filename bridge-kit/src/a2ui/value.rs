//! A2UI Value Types
//!
//! Represents the primitive value types used in A2UI protocol for data binding,
//! and the resolver that turns a bound value into a literal against a data model.

use std::fmt;

use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::data_model::DataModel;

/// A resolved scalar value.
///
/// Serializes as a bare JSON scalar, which is the shape the producer
/// receives in outbound action context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    String(String),
    Number(f64),
    Boolean(bool),
}

impl Literal {
    /// Get the string if this is a string literal
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the number if this is a number literal
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Literal::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the boolean if this is a boolean literal
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Literal::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Convert to a JSON scalar
    pub fn to_json(&self) -> Value {
        match self {
            Literal::String(s) => Value::String(s.clone()),
            Literal::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Literal::Boolean(b) => Value::Bool(*b),
        }
    }

    /// Build a literal from a JSON scalar. Objects, arrays and null are not literals.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Literal::String(s.clone())),
            Value::Number(n) => n.as_f64().map(Literal::Number),
            Value::Bool(b) => Some(Literal::Boolean(*b)),
            _ => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(s) => f.write_str(s),
            Literal::Number(n) if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            Literal::Number(n) => write!(f, "{n}"),
            Literal::Boolean(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::String(s.to_string())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Literal::String(s)
    }
}

impl From<f64> for Literal {
    fn from(n: f64) -> Self {
        Literal::Number(n)
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Literal::Boolean(b)
    }
}

/// A value that is either a literal or a data-bound path.
///
/// # Examples
///
/// ```json
/// {"literalString": "Hello World"}
/// {"literalNumber": 42}
/// {"literalBoolean": true}
/// {"path": "user.name"}
/// ```
///
/// Decoding is lenient: the `value*` spellings used in data model entries,
/// `literalBool`, and bare JSON scalars are accepted too. Encoding always
/// produces the canonical `literal*` / `path` form.
#[derive(Debug, Clone, PartialEq)]
pub enum DataValue {
    /// A literal value
    Literal(Literal),
    /// A path reference to the data model
    Path(String),
}

impl DataValue {
    /// Create a new literal string value
    pub fn string(s: impl Into<String>) -> Self {
        DataValue::Literal(Literal::String(s.into()))
    }

    /// Create a new literal number value
    pub fn number(n: f64) -> Self {
        DataValue::Literal(Literal::Number(n))
    }

    /// Create a new literal boolean value
    pub fn boolean(b: bool) -> Self {
        DataValue::Literal(Literal::Boolean(b))
    }

    /// Create a new path reference
    pub fn path(p: impl Into<String>) -> Self {
        DataValue::Path(p.into())
    }

    /// Check if this is a literal value
    pub fn is_literal(&self) -> bool {
        matches!(self, DataValue::Literal(_))
    }

    /// Check if this is a path reference
    pub fn is_path(&self) -> bool {
        matches!(self, DataValue::Path(_))
    }

    /// Get the path if this is a path reference
    pub fn as_path(&self) -> Option<&str> {
        match self {
            DataValue::Path(path) => Some(path),
            _ => None,
        }
    }

    /// Get the literal if this is a literal value
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            DataValue::Literal(literal) => Some(literal),
            _ => None,
        }
    }

    /// Decode from any of the accepted JSON shapes.
    pub fn from_json(value: &Value) -> Option<Self> {
        let Value::Object(map) = value else {
            return Literal::from_json(value).map(DataValue::Literal);
        };

        if let Some(path) = map.get("path").and_then(Value::as_str) {
            return Some(DataValue::Path(path.to_string()));
        }

        for key in ["literalString", "valueString"] {
            if let Some(s) = map.get(key).and_then(Value::as_str) {
                return Some(DataValue::string(s));
            }
        }
        for key in ["literalNumber", "valueNumber"] {
            if let Some(n) = map.get(key).and_then(Value::as_f64) {
                return Some(DataValue::number(n));
            }
        }
        for key in ["literalBoolean", "literalBool", "valueBoolean"] {
            if let Some(b) = map.get(key).and_then(Value::as_bool) {
                return Some(DataValue::boolean(b));
            }
        }

        None
    }
}

impl Default for DataValue {
    fn default() -> Self {
        DataValue::string("")
    }
}

impl From<Literal> for DataValue {
    fn from(literal: Literal) -> Self {
        DataValue::Literal(literal)
    }
}

impl Serialize for DataValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            DataValue::Path(path) => map.serialize_entry("path", path)?,
            DataValue::Literal(Literal::String(s)) => map.serialize_entry("literalString", s)?,
            DataValue::Literal(Literal::Number(n)) => map.serialize_entry("literalNumber", n)?,
            DataValue::Literal(Literal::Boolean(b)) => map.serialize_entry("literalBoolean", b)?,
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for DataValue {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(d)?;
        DataValue::from_json(&value).ok_or_else(|| {
            de::Error::custom(
                "expected one of literalString, literalNumber, literalBoolean or path",
            )
        })
    }
}

// ============================================================================
// Value Resolver
// ============================================================================

/// Resolve a bound value against a data model.
///
/// Literals resolve to themselves by reference, independent of the model.
/// Paths are looked up afresh on every call; a path that was never written
/// resolves to `None` and the caller decides the fallback.
pub fn resolve<'a>(value: &'a DataValue, data_model: &'a DataModel) -> Option<&'a Literal> {
    match value {
        DataValue::Literal(literal) => Some(literal),
        DataValue::Path(path) => data_model.read(path),
    }
}

/// Resolve to a string. Non-string literals resolve to `None`.
pub fn resolve_string<'a>(value: &'a DataValue, data_model: &'a DataModel) -> Option<&'a str> {
    resolve(value, data_model).and_then(Literal::as_str)
}

/// Resolve to a number. Non-number literals resolve to `None`.
pub fn resolve_number(value: &DataValue, data_model: &DataModel) -> Option<f64> {
    resolve(value, data_model).and_then(Literal::as_f64)
}

/// Resolve to a boolean. Non-boolean literals resolve to `None`.
pub fn resolve_bool(value: &DataValue, data_model: &DataModel) -> Option<bool> {
    resolve(value, data_model).and_then(Literal::as_bool)
}
