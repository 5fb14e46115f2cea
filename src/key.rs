//! Store keys and key validation.
//!
//! A [`Key`] is restricted to the set {integer, UTF-8 string}. The typed
//! enum makes invalid keys unrepresentable inside the crate, so validation
//! happens at the boundary where dynamic data enters: [`validate`] and
//! [`validate_multiple`] reject any [`Value`] that is not an integer or a
//! string with [`StoreError::InvalidKey`], before any backend I/O.
//!
//! Keys are not normalized: no trimming, no case folding. The integer key
//! `1` and the string key `"1"` are distinct identities in every backend
//! shipped by this crate.

use std::fmt;

use crate::{
    error::{StoreError, StoreResult},
    value::Value,
};

/// A store key: an integer or a UTF-8 string.
///
/// The empty string is a valid key.
///
/// # Examples
///
/// ```
/// use polystore::{Key, Value};
///
/// let a = Key::from("user:1");
/// let b = Key::from(1);
/// assert_ne!(Key::from(1), Key::from("1"));
///
/// // Dynamic values convert at the boundary, rejecting invalid types.
/// assert!(Key::try_from(Value::from(42)).is_ok());
/// assert!(Key::try_from(Value::Null).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    /// An integer key.
    Int(i64),
    /// A string key.
    Str(String),
}

impl Key {
    /// Returns the key as a [`Value`], the inverse of `Key::try_from`.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Int(i) => Value::Int(*i),
            Self::Str(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Key {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl TryFrom<Value> for Key {
    type Error = StoreError;

    fn try_from(value: Value) -> StoreResult<Self> {
        match value {
            Value::Int(i) => Ok(Self::Int(i)),
            Value::String(s) => Ok(Self::Str(s)),
            other => Err(StoreError::invalid_key(&other)),
        }
    }
}

/// Validates that a dynamic value is a valid key.
///
/// Succeeds iff the value is an integer or a string. This is a precondition
/// check, not a backend-reported error: it runs before any backend I/O and
/// is never wrapped in `Read`/`Write`.
pub fn validate(value: &Value) -> StoreResult<()> {
    match value {
        Value::Int(_) | Value::String(_) => Ok(()),
        other => Err(StoreError::invalid_key(other)),
    }
}

/// Validates that every element of a sequence is a valid key.
///
/// Fails on the first invalid element encountered, in input order.
pub fn validate_multiple<'a, I>(values: I) -> StoreResult<()>
where
    I: IntoIterator<Item = &'a Value>,
{
    for value in values {
        validate(value)?;
    }
    Ok(())
}

/// Converts a sequence of dynamic values into keys, failing on the first
/// invalid element.
pub fn keys_from_values<I>(values: I) -> StoreResult<Vec<Key>>
where
    I: IntoIterator<Item = Value>,
{
    values.into_iter().map(Key::try_from).collect()
}
