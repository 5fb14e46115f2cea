//! The store contract.
//!
//! This module defines the [`Store`] trait, the polymorphic interface that
//! every backend and decorator implements with identical observable
//! semantics. Swapping one implementation for another is behavior-preserving
//! by design; the conformance suite (feature `testutil`) verifies exactly
//! that, unmodified, against any implementation.
//!
//! # Design
//!
//! - **Typed keys and values**: [`Key`] makes invalid keys unrepresentable
//!   inside the crate; validation of dynamic inputs happens at the boundary
//!   (see [`key`](crate::key)).
//! - **Synchronous, blocking calls**: no operation in the core blocks on
//!   I/O of its own — all I/O is delegated to the backend, which is
//!   responsible for its own timeout policy and maps timeout failures into
//!   [`Read`](crate::StoreError::Read)/[`Write`](crate::StoreError::Write).
//! - **Default-vs-fail read variants are separate methods** rather than one
//!   method with a strictness flag, so callers statically choose their
//!   error-handling posture.
//! - **Batch reads report every absent key**: [`get_multiple_or_fail`]
//!   raises a single [`NoSuchKey`](crate::StoreError::NoSuchKey) naming all
//!   missing keys, so a failed batch can be diagnosed without repeated
//!   round trips.
//!
//! Shared read semantics live in the trait's default methods, derived from
//! [`get_or_fail`]; backends and decorators override them when they can do
//! better (batching, cache short-circuits).
//!
//! [`get_or_fail`]: Store::get_or_fail
//! [`get_multiple_or_fail`]: Store::get_multiple_or_fail

use std::collections::BTreeMap;

use crate::{
    error::{StoreError, StoreResult},
    key::Key,
    sortable::SortFlags,
    value::Value,
};

/// A key-value store.
///
/// Implementations are expected to be thread-safe (`Send + Sync`). Entries
/// are created by [`set`](Store::set), replaced by a subsequent `set` on the
/// same key, and destroyed by [`remove`](Store::remove) or
/// [`clear`](Store::clear). There is no implicit expiration at this level;
/// a decorator may add TTL semantics.
///
/// # Operations
///
/// | Method | Result | Failure kinds |
/// |--------|--------|---------------|
/// | [`set`](Store::set) | none | `Serialization`, `UnsupportedValue`, `Write` |
/// | [`get`](Store::get) | value, or the default if absent | `Deserialization`, `Read` |
/// | [`get_or_fail`](Store::get_or_fail) | value | as `get`, plus `NoSuchKey` |
/// | [`get_multiple`](Store::get_multiple) | key→value map, default per absent key | `Read` |
/// | [`get_multiple_or_fail`](Store::get_multiple_or_fail) | key→value map | `NoSuchKey` naming *all* absent keys, `Read` |
/// | [`remove`](Store::remove) | `true` iff an entry existed | `Write` |
/// | [`exists`](Store::exists) | boolean | `Read` |
/// | [`clear`](Store::clear) | none | `Write` |
/// | [`keys`](Store::keys) | unordered key sequence | `Read` |
///
/// # Example
///
/// ```
/// use polystore::{Key, MemoryStore, Store, Value};
///
/// let store = MemoryStore::new();
/// store.set(Key::from("a"), Value::from(1234))?;
/// store.set(Key::from(5), Value::from("x"))?;
///
/// assert_eq!(store.get_or_fail(&Key::from("a"))?, Value::from(1234));
/// assert!(store.remove(&Key::from("a"))?);
/// assert!(!store.remove(&Key::from("a"))?);
/// # Ok::<(), polystore::StoreError>(())
/// ```
pub trait Store: Send + Sync {
    /// Sets the value for a key, replacing any existing entry.
    #[must_use = "store operations may fail and errors must be handled"]
    fn set(&self, key: Key, value: Value) -> StoreResult<()>;

    /// Returns the value of a key, failing if the key is absent.
    #[must_use = "store operations may fail and errors must be handled"]
    fn get_or_fail(&self, key: &Key) -> StoreResult<Value>;

    /// Returns the value of a key, or `default` if the key is absent.
    ///
    /// A stored [`Value::Null`] is returned as `Null`, not as the default —
    /// null is a value, absence is not.
    #[must_use = "store operations may fail and errors must be handled"]
    fn get(&self, key: &Key, default: Value) -> StoreResult<Value> {
        match self.get_or_fail(key) {
            Ok(value) => Ok(value),
            Err(StoreError::NoSuchKey { .. }) => Ok(default),
            Err(e) => Err(e),
        }
    }

    /// Returns the values of multiple keys, substituting `default` for each
    /// absent key.
    ///
    /// The result mapping is keyed by key value; duplicate input keys
    /// collapse to a single entry and input order is discarded.
    #[must_use = "store operations may fail and errors must be handled"]
    fn get_multiple(&self, keys: &[Key], default: Value) -> StoreResult<BTreeMap<Key, Value>> {
        let mut values = BTreeMap::new();
        for key in keys {
            match self.get_or_fail(key) {
                Ok(value) => values.insert(key.clone(), value),
                Err(StoreError::NoSuchKey { .. }) => values.insert(key.clone(), default.clone()),
                Err(e) => return Err(e),
            };
        }
        Ok(values)
    }

    /// Returns the values of multiple keys, failing if any is absent.
    ///
    /// The failure names *all* absent keys, not just the first one found.
    #[must_use = "store operations may fail and errors must be handled"]
    fn get_multiple_or_fail(&self, keys: &[Key]) -> StoreResult<BTreeMap<Key, Value>> {
        let mut values = BTreeMap::new();
        let mut missing: Vec<Key> = Vec::new();
        for key in keys {
            match self.get_or_fail(key) {
                Ok(value) => {
                    values.insert(key.clone(), value);
                },
                Err(StoreError::NoSuchKey { .. }) => {
                    if !missing.contains(key) {
                        missing.push(key.clone());
                    }
                },
                Err(e) => return Err(e),
            }
        }
        if missing.is_empty() { Ok(values) } else { Err(StoreError::no_such_keys(missing)) }
    }

    /// Removes a key. Returns `true` iff an entry existed and was removed.
    #[must_use = "store operations may fail and errors must be handled"]
    fn remove(&self, key: &Key) -> StoreResult<bool>;

    /// Returns whether a key exists.
    #[must_use = "store operations may fail and errors must be handled"]
    fn exists(&self, key: &Key) -> StoreResult<bool>;

    /// Removes all entries.
    #[must_use = "store operations may fail and errors must be handled"]
    fn clear(&self) -> StoreResult<()>;

    /// Returns all keys currently stored.
    ///
    /// The order is undefined unless the store is wrapped in a
    /// [`SortableDecorator`](crate::SortableDecorator).
    #[must_use = "store operations may fail and errors must be handled"]
    fn keys(&self) -> StoreResult<Vec<Key>>;
}

/// A store that can report its entry count.
pub trait Countable: Store {
    /// Returns the number of entries in the store.
    ///
    /// Equals `keys()?.len()` at all times.
    #[must_use = "store operations may fail and errors must be handled"]
    fn count(&self) -> StoreResult<usize>;
}

/// A store whose [`keys`](Store::keys) sequence can be ordered on request.
pub trait Sortable: Store {
    /// Requests that the next [`keys`](Store::keys) call return keys in the
    /// order described by `flags`.
    ///
    /// The request is one-shot: any subsequent [`set`](Store::set) clears
    /// it, and callers must re-request sorting after mutation.
    fn sort(&self, flags: SortFlags);
}

impl<S: Store + ?Sized> Store for &S {
    fn set(&self, key: Key, value: Value) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn get_or_fail(&self, key: &Key) -> StoreResult<Value> {
        (**self).get_or_fail(key)
    }

    fn get(&self, key: &Key, default: Value) -> StoreResult<Value> {
        (**self).get(key, default)
    }

    fn get_multiple(&self, keys: &[Key], default: Value) -> StoreResult<BTreeMap<Key, Value>> {
        (**self).get_multiple(keys, default)
    }

    fn get_multiple_or_fail(&self, keys: &[Key]) -> StoreResult<BTreeMap<Key, Value>> {
        (**self).get_multiple_or_fail(keys)
    }

    fn remove(&self, key: &Key) -> StoreResult<bool> {
        (**self).remove(key)
    }

    fn exists(&self, key: &Key) -> StoreResult<bool> {
        (**self).exists(key)
    }

    fn clear(&self) -> StoreResult<()> {
        (**self).clear()
    }

    fn keys(&self) -> StoreResult<Vec<Key>> {
        (**self).keys()
    }
}
