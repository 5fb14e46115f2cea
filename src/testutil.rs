//! Shared test utilities for store testing.
//!
//! This module provides common helpers for generating test keys and values
//! and asserting on [`StoreResult`](crate::StoreResult) values. It is
//! feature-gated behind `testutil` to prevent leaking into production
//! builds.
//!
//! # Usage
//!
//! In integration tests, enable the feature in `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! polystore = { path = ".", features = ["testutil"] }
//! ```
//!
//! Then import helpers:
//!
//! ```no_run
//! // Requires the `testutil` feature to be enabled.
//! use polystore::testutil::{make_key, make_value, populated_store};
//! ```

use crate::{key::Key, memory::MemoryStore, store::Store, value::Value};

/// Create a deterministic string key from a prefix and index.
///
/// Produces keys like `"prefix:000042"` (zero-padded to 6 digits) so that
/// lexicographic ordering matches numeric ordering, which matters for
/// sorting tests.
#[must_use]
pub fn make_key(prefix: &str, idx: usize) -> Key {
    Key::from(format!("{prefix}:{idx:06}"))
}

/// Create a test value tagged with a sequence number.
///
/// Produces values like `"val042"`. Useful when a test needs to identify
/// which write produced which entry.
#[must_use]
pub fn make_value(seq: usize) -> Value {
    Value::from(format!("val{seq:03}"))
}

/// Create a nested test value exercising every non-binary value kind.
#[must_use]
pub fn make_structured_value(seq: usize) -> Value {
    Value::Map(
        [
            ("seq".to_owned(), Value::from(seq as i64)),
            ("ratio".to_owned(), Value::Float(seq as f64 / 3.0)),
            ("flags".to_owned(), Value::Array(vec![Value::Bool(seq % 2 == 0), Value::Null])),
        ]
        .into_iter()
        .collect(),
    )
}

/// Create a [`MemoryStore`] pre-populated with `count` keys.
///
/// Keys are formatted as `"{prefix}:{idx:06}"` with tagged string values.
/// The store is ready for immediate use in tests.
///
/// # Panics
///
/// Panics if any `set` fails (should not happen with `MemoryStore`).
#[must_use]
pub fn populated_store(prefix: &str, count: usize) -> MemoryStore {
    let store = MemoryStore::new();
    for i in 0..count {
        store.set(make_key(prefix, i), make_value(i)).expect("populate set failed");
    }
    store
}

/// Assert that a [`StoreResult`](crate::StoreResult) is the given
/// [`StoreError`](crate::StoreError) variant.
///
/// # Examples
///
/// ```no_run
/// // Requires the `testutil` feature to be enabled.
/// use polystore::{assert_store_error, Key, MemoryStore, Store};
///
/// let store = MemoryStore::new();
/// let result = store.get_or_fail(&Key::from("missing"));
/// assert_store_error!(result, NoSuchKey);
/// assert_store_error!(result, NoSuchKey, "fresh store has no entries");
/// ```
#[macro_export]
macro_rules! assert_store_error {
    ($result:expr, $variant:ident) => {
        assert!(
            matches!($result, Err($crate::StoreError::$variant { .. })),
            concat!("expected StoreError::", stringify!($variant), ", got: {:?}"),
            $result,
        );
    };
    ($result:expr, $variant:ident, $msg:expr) => {
        assert!(
            matches!($result, Err($crate::StoreError::$variant { .. })),
            concat!("{}: expected StoreError::", stringify!($variant), ", got: {:?}"),
            $msg,
            $result,
        );
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn make_key_zero_pads() {
        assert_eq!(make_key("p", 42), Key::from("p:000042"));
    }

    #[test]
    fn populated_store_holds_count_entries() {
        let store = populated_store("seed", 5);
        assert_eq!(store.keys().unwrap().len(), 5);
        assert_eq!(store.get_or_fail(&make_key("seed", 3)).unwrap(), make_value(3));
    }

    #[test]
    fn assert_store_error_matches_variant() {
        let store = MemoryStore::new();
        let result = store.get_or_fail(&Key::from("missing"));
        assert_store_error!(result, NoSuchKey);
        assert_store_error!(result, NoSuchKey, "fresh store");
    }
}
