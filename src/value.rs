//! Dynamic values stored under a key.
//!
//! [`Value`] models the full range of data a store entry can hold: scalars,
//! ordered sequences, string-keyed mappings, raw bytes, and nested
//! combinations thereof. [`Value::Null`] is an explicit absence marker that
//! is itself a storable value — storing `Null` under a key is observably
//! different from the key not being present.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A storable value.
///
/// Equality is deep: two structured values compare equal iff their entire
/// trees do. `Float` follows `f64` equality (`NaN != NaN`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// The explicit null marker. Distinct from "key not present".
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed 64-bit integer.
    Int(i64),
    /// A 64-bit float.
    Float(f64),
    /// A UTF-8 string.
    String(String),
    /// Arbitrary bytes, including embedded NUL bytes.
    Bytes(Vec<u8>),
    /// An ordered sequence of values.
    Array(Vec<Value>),
    /// A string-keyed mapping. `BTreeMap` keeps the encoding deterministic.
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Runtime type name, used in error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Bytes(_) => "binary",
            Self::Array(_) => "array",
            Self::Map(_) => "map",
        }
    }

    /// Returns `true` for the explicit null marker.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Self::Array(value)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(value: BTreeMap<String, Value>) -> Self {
        Self::Map(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_is_its_own_type() {
        assert!(Value::Null.is_null());
        assert!(!Value::Int(0).is_null());
        assert_ne!(Value::Null, Value::Int(0));
        assert_ne!(Value::Null, Value::String(String::new()));
    }

    #[test]
    fn deep_equality_for_structured_values() {
        let a = Value::Map(BTreeMap::from([
            ("list".to_owned(), Value::Array(vec![Value::from(1), Value::from("x")])),
            ("nested".to_owned(), Value::Map(BTreeMap::from([("k".to_owned(), Value::Null)]))),
        ]));
        let b = a.clone();
        assert_eq!(a, b);
    }

    #[test]
    fn type_names_cover_every_variant() {
        let cases = [
            (Value::Null, "null"),
            (Value::Bool(true), "boolean"),
            (Value::Int(1), "integer"),
            (Value::Float(0.5), "float"),
            (Value::String("s".into()), "string"),
            (Value::Bytes(vec![0]), "binary"),
            (Value::Array(vec![]), "array"),
            (Value::Map(BTreeMap::new()), "map"),
        ];
        for (value, name) in cases {
            assert_eq!(value.type_name(), name);
        }
    }
}
