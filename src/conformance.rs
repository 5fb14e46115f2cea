//! Conformance test suite for [`Store`] implementations.
//!
//! This module provides a set of test functions that validate whether a
//! [`Store`] implementation correctly satisfies the trait contract. Every
//! backend and decorator — in-memory, file-backed, or third-party — can run
//! the same suite to ensure interchangeability.
//!
//! # Usage
//!
//! Enable the `testutil` feature and call each conformance function with a
//! store instance, or run the whole suite with [`run_all`]:
//!
//! ```no_run
//! use polystore::{conformance, MemoryStore};
//!
//! #[test]
//! fn memory_store_conforms() {
//!     conformance::run_all(&MemoryStore::new());
//! }
//! ```
//!
//! [`run_all`] clears the store between test functions; hand it a store you
//! do not mind emptying. Values holding raw binary are exercised only by
//! the opt-in [`binary_values_roundtrip`], because backends with a
//! text-based storage format legitimately reject them.
//!
//! # Test Categories
//!
//! | Category | Contract aspect |
//! |----------|-----------------|
//! | CRUD | set/get/remove/exists/clear lifecycle |
//! | Keys | identity, distinctness, enumeration |
//! | Batch | multi-key reads, defaults, failure reporting |
//! | Round-trip | value fidelity through the storage format |

use std::collections::BTreeMap;

use crate::{assert_store_error, key::Key, store::Store, value::Value};

// ============================================================================
// CRUD — set/get/remove/exists/clear lifecycle
// ============================================================================

/// `set` then `get_or_fail` round-trips the value.
pub fn crud_set_then_get_returns_value<S: Store>(store: &S) {
    store.set(Key::from("k1"), Value::from("v1")).expect("set should succeed");
    let val = store.get_or_fail(&Key::from("k1")).expect("get_or_fail should succeed");
    assert_eq!(val, Value::from("v1"));
}

/// `get` on a nonexistent key returns the default.
pub fn crud_get_returns_default_for_missing_key<S: Store>(store: &S) {
    let val = store.get(&Key::from("nonexistent"), Value::from(42)).expect("get should succeed");
    assert_eq!(val, Value::from(42), "missing key should yield the default");
}

/// `get_or_fail` on a nonexistent key fails with `NoSuchKey` naming it.
pub fn crud_get_or_fail_missing_is_no_such_key<S: Store>(store: &S) {
    let result = store.get_or_fail(&Key::from("nonexistent"));
    assert_store_error!(result, NoSuchKey);
    let err = result.err().expect("checked above");
    assert_eq!(err.missing_keys(), Some(&[Key::from("nonexistent")][..]));
}

/// `set` on an existing key overwrites the value.
pub fn crud_set_overwrites_existing<S: Store>(store: &S) {
    store.set(Key::from("k1"), Value::from("original")).expect("set");
    store.set(Key::from("k1"), Value::from("updated")).expect("overwrite");
    let val = store.get_or_fail(&Key::from("k1")).expect("get");
    assert_eq!(val, Value::from("updated"));
}

/// A stored null is a value; it must not be mistaken for absence.
pub fn crud_null_value_is_distinct_from_absence<S: Store>(store: &S) {
    store.set(Key::from("null-key"), Value::Null).expect("set null");
    assert!(store.exists(&Key::from("null-key")).expect("exists"));
    let val = store.get(&Key::from("null-key"), Value::from("default")).expect("get");
    assert_eq!(val, Value::Null, "stored null must win over the default");
    assert_eq!(store.get_or_fail(&Key::from("null-key")).expect("get_or_fail"), Value::Null);
}

/// `remove` reports whether an entry existed, and makes it gone.
pub fn crud_remove_reports_prior_existence<S: Store>(store: &S) {
    store.set(Key::from("k1"), Value::from(1)).expect("set");
    assert!(store.remove(&Key::from("k1")).expect("first remove"), "entry existed");
    assert!(!store.remove(&Key::from("k1")).expect("second remove"), "entry already gone");
    assert!(!store.exists(&Key::from("k1")).expect("exists after remove"));
}

/// `exists` tracks the entry's lifecycle.
pub fn crud_exists_tracks_lifecycle<S: Store>(store: &S) {
    assert!(!store.exists(&Key::from("k1")).expect("exists before set"));
    store.set(Key::from("k1"), Value::from(1)).expect("set");
    assert!(store.exists(&Key::from("k1")).expect("exists after set"));
    store.remove(&Key::from("k1")).expect("remove");
    assert!(!store.exists(&Key::from("k1")).expect("exists after remove"));
}

/// `clear` empties the store.
pub fn crud_clear_empties_the_store<S: Store>(store: &S) {
    store.set(Key::from("a"), Value::from(1)).expect("set a");
    store.set(Key::from(2), Value::from("b")).expect("set 2");
    store.clear().expect("clear");
    assert!(store.keys().expect("keys").is_empty());
    assert!(!store.exists(&Key::from("a")).expect("exists a"));
    assert!(!store.exists(&Key::from(2)).expect("exists 2"));
}

// ============================================================================
// Keys — identity, distinctness, enumeration
// ============================================================================

/// The empty string is a valid key.
pub fn keys_empty_string_key_is_valid<S: Store>(store: &S) {
    store.set(Key::from(""), Value::from("empty")).expect("set empty key");
    assert!(store.exists(&Key::from("")).expect("exists"));
    assert_eq!(store.get_or_fail(&Key::from("")).expect("get"), Value::from("empty"));
}

/// Integer key `1` and string key `"1"` are distinct entries.
pub fn keys_integer_and_string_identities_are_distinct<S: Store>(store: &S) {
    store.set(Key::from(1), Value::from("int")).expect("set int key");
    store.set(Key::from("1"), Value::from("str")).expect("set str key");
    assert_eq!(store.get_or_fail(&Key::from(1)).expect("get int"), Value::from("int"));
    assert_eq!(store.get_or_fail(&Key::from("1")).expect("get str"), Value::from("str"));
    assert!(store.remove(&Key::from(1)).expect("remove int"));
    assert!(store.exists(&Key::from("1")).expect("str key must survive"));
}

/// `keys` lists every stored key exactly once, in no guaranteed order.
pub fn keys_lists_every_entry<S: Store>(store: &S) {
    store.set(Key::from("a"), Value::Null).expect("set a");
    store.set(Key::from(-3), Value::Null).expect("set -3");
    store.set(Key::from("b"), Value::Null).expect("set b");
    let mut keys = store.keys().expect("keys");
    keys.sort();
    let mut expected = vec![Key::from("a"), Key::from(-3), Key::from("b")];
    expected.sort();
    assert_eq!(keys, expected);
}

// ============================================================================
// Batch — multi-key reads, defaults, failure reporting
// ============================================================================

/// `get_multiple` substitutes the default for each absent key.
pub fn batch_get_multiple_substitutes_default<S: Store>(store: &S) {
    store.set(Key::from("a"), Value::from(1)).expect("set");
    let values = store
        .get_multiple(&[Key::from("a"), Key::from("missing")], Value::from("fallback"))
        .expect("get_multiple");
    assert_eq!(values[&Key::from("a")], Value::from(1));
    assert_eq!(values[&Key::from("missing")], Value::from("fallback"));
}

/// Duplicate input keys collapse to a single result entry.
pub fn batch_duplicate_keys_collapse<S: Store>(store: &S) {
    store.set(Key::from("a"), Value::from(1)).expect("set");
    let values = store
        .get_multiple(&[Key::from("a"), Key::from("a"), Key::from("a")], Value::Null)
        .expect("get_multiple");
    assert_eq!(values.len(), 1);
}

/// A failed batch read names every absent key, not just the first.
pub fn batch_get_multiple_or_fail_names_all_missing<S: Store>(store: &S) {
    store.set(Key::from("present"), Value::from(1)).expect("set");
    let result =
        store.get_multiple_or_fail(&[Key::from("present"), Key::from("x"), Key::from(7)]);
    assert_store_error!(result, NoSuchKey);
    let missing = result.err().expect("checked above");
    let missing = missing.missing_keys().expect("NoSuchKey carries its keys");
    assert_eq!(missing, &[Key::from("x"), Key::from(7)]);
}

/// A mixed-key workload behaves end to end.
pub fn batch_mixed_key_scenario<S: Store>(store: &S) {
    store.set(Key::from("a"), Value::from(1234)).expect("set a");
    store.set(Key::from(5), Value::from("x")).expect("set 5");

    let values = store
        .get_multiple(&[Key::from("a"), Key::from(5), Key::from("gone")], Value::Null)
        .expect("get_multiple");
    let expected: BTreeMap<Key, Value> = [
        (Key::from("a"), Value::from(1234)),
        (Key::from(5), Value::from("x")),
        (Key::from("gone"), Value::Null),
    ]
    .into_iter()
    .collect();
    assert_eq!(values, expected);

    assert!(store.remove(&Key::from("a")).expect("remove a"));
    assert!(!store.remove(&Key::from("a")).expect("remove a again"));
    assert!(store.exists(&Key::from(5)).expect("5 must survive"));
}

// ============================================================================
// Round-trip — value fidelity through the storage format
// ============================================================================

/// Scalars survive storage exactly.
pub fn roundtrip_scalar_fidelity<S: Store>(store: &S) {
    let cases = [
        ("null", Value::Null),
        ("bool", Value::Bool(true)),
        ("int", Value::from(i64::MIN)),
        ("float", Value::Float(-2.75)),
        ("string", Value::from("héllo wörld")),
        ("empty-string", Value::from("")),
    ];
    for (name, value) in cases {
        store.set(Key::from(name), value.clone()).expect("set");
        assert_eq!(store.get_or_fail(&Key::from(name)).expect("get"), value, "case {name}");
    }
}

/// Nested arrays and maps survive storage exactly.
pub fn roundtrip_structured_values<S: Store>(store: &S) {
    let value = Value::Array(vec![
        Value::from(1),
        Value::Map(
            [
                ("name".to_owned(), Value::from("nested")),
                ("items".to_owned(), Value::Array(vec![Value::Bool(false), Value::Null])),
            ]
            .into_iter()
            .collect(),
        ),
    ]);
    store.set(Key::from("structured"), value.clone()).expect("set");
    assert_eq!(store.get_or_fail(&Key::from("structured")).expect("get"), value);
}

/// Raw binary values survive storage exactly.
///
/// Not part of [`run_all`]: backends with a text-based storage format
/// reject binary values with
/// [`UnsupportedValue`](crate::StoreError::UnsupportedValue).
pub fn binary_values_roundtrip<S: Store>(store: &S) {
    let value = Value::Bytes(vec![0x00, 0xFF, 0x7F, 0x00, 0x01]);
    store.set(Key::from("blob"), value.clone()).expect("set binary");
    assert_eq!(store.get_or_fail(&Key::from("blob")).expect("get binary"), value);
}

/// Runs the whole suite against one store, clearing it between tests.
///
/// Excludes [`binary_values_roundtrip`]; run it separately for backends
/// whose storage format can hold raw binary.
pub fn run_all<S: Store>(store: &S) {
    macro_rules! fresh {
        ($($test:ident),+ $(,)?) => {
            $(
                store.clear().expect("clear between conformance tests");
                $test(store);
            )+
        };
    }

    fresh!(
        // CRUD
        crud_set_then_get_returns_value,
        crud_get_returns_default_for_missing_key,
        crud_get_or_fail_missing_is_no_such_key,
        crud_set_overwrites_existing,
        crud_null_value_is_distinct_from_absence,
        crud_remove_reports_prior_existence,
        crud_exists_tracks_lifecycle,
        crud_clear_empties_the_store,
        // Keys
        keys_empty_string_key_is_valid,
        keys_integer_and_string_identities_are_distinct,
        keys_lists_every_entry,
        // Batch
        batch_get_multiple_substitutes_default,
        batch_duplicate_keys_collapse,
        batch_get_multiple_or_fail_names_all_missing,
        batch_mixed_key_scenario,
        // Round-trip
        roundtrip_scalar_fidelity,
        roundtrip_structured_values,
    );
    store.clear().expect("final clear");
}
