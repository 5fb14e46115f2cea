//! Store error types and result alias.
//!
//! This module defines the error taxonomy that every backend and decorator
//! must map its internal failures onto. The taxonomy is the contract's
//! user-visible failure surface: callers branch on the variant to decide
//! whether a failure is expected absence ([`StoreError::NoSuchKey`]), a
//! caller bug ([`StoreError::InvalidKey`]), or an operational incident
//! ([`StoreError::Read`] / [`StoreError::Write`]).
//!
//! # Propagation policy
//!
//! - Key validation and value serialization errors are raised synchronously
//!   before any backend I/O. They are never wrapped in `Read`/`Write`.
//! - Backend-native failures are caught at the adapter boundary and wrapped
//!   into `Read` or `Write`, preserving the original failure as the
//!   `#[source]` cause for diagnostics.
//! - Decorators propagate errors from the wrapped store unchanged, except
//!   where their contract explicitly intercepts them (e.g.
//!   [`CachedStore::get`](crate::CachedStore) catching `NoSuchKey` to return
//!   the default).
//! - The core never retries. `Read`/`Write` may be retried by the caller at
//!   their discretion; every other kind indicates the caller must change
//!   the input.

use std::sync::Arc;

use thiserror::Error;

use crate::{key::Key, value::Value};

/// A boxed error type for source chain tracking.
pub type BoxError = Arc<dyn std::error::Error + Send + Sync>;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during store operations.
///
/// This enum represents the canonical set of errors that any backend can
/// produce. Backend implementations map their internal error types to these
/// variants.
///
/// # Non-exhaustive
///
/// This enum is marked `#[non_exhaustive]` — new variants may be added in
/// future minor releases without a semver-breaking change. Downstream match
/// expressions must include a wildcard arm (`_ =>`).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    /// The key is not an integer or a string.
    ///
    /// Raised before any backend I/O; retrying is pointless.
    #[error("Expected a key of type integer or string. Got: {type_name}")]
    InvalidKey {
        /// Runtime type name of the rejected key.
        type_name: &'static str,
    },

    /// A value could not be converted into its storable serialized form.
    ///
    /// The caller must change the value; the error is never transient.
    #[error("Serialization failed: {message}")]
    Serialization {
        /// Description of the serialization failure.
        message: String,
        /// The underlying encoder error, if any.
        #[source]
        source: Option<BoxError>,
    },

    /// Stored bytes could not be converted back into a value.
    ///
    /// Indicates data corruption or a format mismatch. The decoder's own
    /// diagnostic is carried in `message` rather than discarded.
    #[error("Deserialization failed: {message}")]
    Deserialization {
        /// Description of the deserialization failure, including the
        /// decoder's diagnostic output.
        message: String,
        /// The underlying decoder error, if any.
        #[source]
        source: Option<BoxError>,
    },

    /// The value is well-formed but rejected by this backend's capability
    /// limits (e.g. raw binary in a JSON-backed store).
    ///
    /// The caller must pick a different backend or transform the value.
    #[error("Unsupported value: {message}")]
    UnsupportedValue {
        /// Description of the capability limit that was hit.
        message: String,
    },

    /// The requested key (or keys) are absent from the store.
    ///
    /// Not an I/O fault. Batch reads report *all* absent keys here, not
    /// just the first, so a failed batch can be diagnosed in one round trip.
    #[error("{}", missing_keys_message(.keys))]
    NoSuchKey {
        /// The keys that were not found.
        keys: Vec<Key>,
    },

    /// The backend could not be read (permission, connectivity, corruption
    /// of the medium). Wraps the backend-native failure as its cause.
    #[error("Read failed: {message}")]
    Read {
        /// Description of the read failure.
        message: String,
        /// The backend-native failure.
        #[source]
        source: Option<BoxError>,
    },

    /// The backend could not be written. Wraps the backend-native failure
    /// as its cause.
    #[error("Write failed: {message}")]
    Write {
        /// Description of the write failure.
        message: String,
        /// The backend-native failure.
        #[source]
        source: Option<BoxError>,
    },
}

fn missing_keys_message(keys: &[Key]) -> String {
    match keys {
        [key] => format!("The key \"{key}\" does not exist."),
        keys => {
            let joined =
                keys.iter().map(ToString::to_string).collect::<Vec<_>>().join("\", \"");
            format!("The keys \"{joined}\" do not exist.")
        },
    }
}

impl StoreError {
    /// Creates an `InvalidKey` error for a value that is not a valid key.
    #[must_use]
    pub fn invalid_key(value: &Value) -> Self {
        Self::InvalidKey { type_name: value.type_name() }
    }

    /// Creates a `Serialization` error with the given message.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization { message: message.into(), source: None }
    }

    /// Creates a `Serialization` error with a message and source error.
    #[must_use]
    pub fn serialization_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Serialization { message: message.into(), source: Some(Arc::new(source)) }
    }

    /// Creates a `Deserialization` error with the given message.
    #[must_use]
    pub fn deserialization(message: impl Into<String>) -> Self {
        Self::Deserialization { message: message.into(), source: None }
    }

    /// Creates a `Deserialization` error with a message and source error.
    #[must_use]
    pub fn deserialization_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Deserialization { message: message.into(), source: Some(Arc::new(source)) }
    }

    /// Creates an `UnsupportedValue` error with the given message.
    #[must_use]
    pub fn unsupported_value(message: impl Into<String>) -> Self {
        Self::UnsupportedValue { message: message.into() }
    }

    /// Creates a `NoSuchKey` error for a single absent key.
    #[must_use]
    pub fn no_such_key(key: Key) -> Self {
        Self::NoSuchKey { keys: vec![key] }
    }

    /// Creates a `NoSuchKey` error naming every absent key of a batch read.
    #[must_use]
    pub fn no_such_keys(keys: Vec<Key>) -> Self {
        Self::NoSuchKey { keys }
    }

    /// Creates a `Read` error with the given message.
    #[must_use]
    pub fn read(message: impl Into<String>) -> Self {
        Self::Read { message: message.into(), source: None }
    }

    /// Creates a `Read` error with a message and the backend-native cause.
    #[must_use]
    pub fn read_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Read { message: message.into(), source: Some(Arc::new(source)) }
    }

    /// Creates a `Write` error with the given message.
    #[must_use]
    pub fn write(message: impl Into<String>) -> Self {
        Self::Write { message: message.into(), source: None }
    }

    /// Creates a `Write` error with a message and the backend-native cause.
    #[must_use]
    pub fn write_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Write { message: message.into(), source: Some(Arc::new(source)) }
    }

    /// Returns the absent keys when this is a `NoSuchKey` error.
    #[must_use]
    pub fn missing_keys(&self) -> Option<&[Key]> {
        match self {
            Self::NoSuchKey { keys } => Some(keys),
            _ => None,
        }
    }
}

/// Construction-time configuration errors.
///
/// These are distinct from [`StoreError`]: they are raised when a store or
/// decorator is assembled with an invalid configuration, before any
/// operation runs.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The secondary cache handed to [`CachedStore`](crate::CachedStore)
    /// advertises neither delete-all nor flush-all invalidation.
    #[error(
        "The cache must support delete-all or flush-all invalidation. Got: {cache_type}"
    )]
    MissingClearCapability {
        /// Type name of the rejected cache.
        cache_type: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_such_key_names_single_key() {
        let err = StoreError::no_such_key(Key::from("missing"));
        assert_eq!(err.to_string(), "The key \"missing\" does not exist.");
    }

    #[test]
    fn no_such_key_names_all_keys() {
        let err = StoreError::no_such_keys(vec![Key::from("a"), Key::from(5), Key::from("b")]);
        assert_eq!(err.to_string(), "The keys \"a\", \"5\", \"b\" do not exist.");
    }

    #[test]
    fn invalid_key_carries_type_name() {
        let err = StoreError::invalid_key(&Value::Float(1.5));
        assert_eq!(err.to_string(), "Expected a key of type integer or string. Got: float");
    }

    #[test]
    fn read_error_preserves_source() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = StoreError::read_with_source("store file unreadable", io);
        let source = std::error::Error::source(&err).expect("source must be attached");
        assert!(source.to_string().contains("denied"));
    }

    #[test]
    fn missing_keys_accessor() {
        let err = StoreError::no_such_keys(vec![Key::from(1), Key::from(2)]);
        assert_eq!(err.missing_keys().map(<[Key]>::len), Some(2));
        assert_eq!(StoreError::read("boom").missing_keys(), None);
    }
}
