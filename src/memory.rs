//! In-memory store implementation.
//!
//! This module provides [`MemoryStore`], an in-memory implementation of
//! [`Store`] suitable for testing, development, and ephemeral data. The
//! contents are lost when the last clone is dropped.
//!
//! # Cloning
//!
//! `MemoryStore` is cheaply cloneable via [`Arc`]; all clones share the
//! same underlying entries.
//!
//! # Serializing mode
//!
//! [`MemoryStore::serializing`] runs every value through the
//! [`serializer`](crate::serializer) on write and read, mimicking
//! byte-oriented backends. Useful for verifying that values survive a real
//! storage round trip without standing up an external service.

use std::{collections::HashMap, sync::Arc};

use bytes::Bytes;
use parking_lot::RwLock;

use crate::{
    error::{StoreError, StoreResult},
    key::Key,
    serializer,
    store::{Countable, Store},
    value::Value,
};

#[derive(Debug, Clone)]
enum Stored {
    Plain(Value),
    Encoded(Bytes),
}

/// An in-memory key-value store backed by a [`HashMap`].
///
/// # Example
///
/// ```
/// use polystore::{Key, MemoryStore, Store, Value};
///
/// let store = MemoryStore::new();
/// store.set(Key::from("greeting"), Value::from("hello"))?;
/// assert_eq!(store.get_or_fail(&Key::from("greeting"))?, Value::from("hello"));
/// # Ok::<(), polystore::StoreError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<Key, Stored>>>,
    serialize_values: bool,
}

impl MemoryStore {
    /// Creates an empty in-memory store that holds values directly.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty in-memory store that serializes every value into
    /// its byte form on write and deserializes on read.
    #[must_use]
    pub fn serializing() -> Self {
        Self { entries: Arc::default(), serialize_values: true }
    }

    fn encode(&self, value: Value) -> StoreResult<Stored> {
        if self.serialize_values {
            Ok(Stored::Encoded(Bytes::from(serializer::serialize(&value)?)))
        } else {
            Ok(Stored::Plain(value))
        }
    }

    fn decode(stored: &Stored) -> StoreResult<Value> {
        match stored {
            Stored::Plain(value) => Ok(value.clone()),
            Stored::Encoded(bytes) => serializer::deserialize(bytes),
        }
    }
}

impl Store for MemoryStore {
    fn set(&self, key: Key, value: Value) -> StoreResult<()> {
        let stored = self.encode(value)?;
        self.entries.write().insert(key, stored);
        Ok(())
    }

    fn get_or_fail(&self, key: &Key) -> StoreResult<Value> {
        let entries = self.entries.read();
        match entries.get(key) {
            Some(stored) => Self::decode(stored),
            None => Err(StoreError::no_such_key(key.clone())),
        }
    }

    fn remove(&self, key: &Key) -> StoreResult<bool> {
        Ok(self.entries.write().remove(key).is_some())
    }

    fn exists(&self, key: &Key) -> StoreResult<bool> {
        Ok(self.entries.read().contains_key(key))
    }

    fn clear(&self) -> StoreResult<()> {
        self.entries.write().clear();
        Ok(())
    }

    fn keys(&self) -> StoreResult<Vec<Key>> {
        Ok(self.entries.read().keys().cloned().collect())
    }
}

impl Countable for MemoryStore {
    fn count(&self) -> StoreResult<usize> {
        Ok(self.entries.read().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove_lifecycle() {
        let store = MemoryStore::new();
        store.set(Key::from("k"), Value::from(1)).unwrap();
        assert_eq!(store.get_or_fail(&Key::from("k")).unwrap(), Value::from(1));
        assert!(store.remove(&Key::from("k")).unwrap());
        assert!(!store.remove(&Key::from("k")).unwrap());
        assert!(!store.exists(&Key::from("k")).unwrap());
    }

    #[test]
    fn get_returns_default_for_missing_key() {
        let store = MemoryStore::new();
        let value = store.get(&Key::from("absent"), Value::from("fallback")).unwrap();
        assert_eq!(value, Value::from("fallback"));
    }

    #[test]
    fn stored_null_is_not_the_default() {
        let store = MemoryStore::new();
        store.set(Key::from("n"), Value::Null).unwrap();
        assert_eq!(store.get(&Key::from("n"), Value::from(7)).unwrap(), Value::Null);
        assert!(store.exists(&Key::from("n")).unwrap());
    }

    #[test]
    fn integer_and_string_keys_do_not_collide() {
        let store = MemoryStore::new();
        store.set(Key::from(1), Value::from("int")).unwrap();
        store.set(Key::from("1"), Value::from("str")).unwrap();
        assert_eq!(store.get_or_fail(&Key::from(1)).unwrap(), Value::from("int"));
        assert_eq!(store.get_or_fail(&Key::from("1")).unwrap(), Value::from("str"));
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn clones_share_entries() {
        let a = MemoryStore::new();
        let b = a.clone();
        a.set(Key::from("shared"), Value::from(true)).unwrap();
        assert!(b.exists(&Key::from("shared")).unwrap());
    }

    #[test]
    fn serializing_mode_roundtrips_binary_values() {
        let store = MemoryStore::serializing();
        let value = Value::Bytes(vec![0x00, 0xFF, 0x00]);
        store.set(Key::from("bin"), value.clone()).unwrap();
        assert_eq!(store.get_or_fail(&Key::from("bin")).unwrap(), value);
    }

    #[test]
    fn get_multiple_or_fail_reports_every_missing_key() {
        let store = MemoryStore::new();
        store.set(Key::from("k1"), Value::from(1)).unwrap();
        let keys = [Key::from("k1"), Key::from("k2"), Key::from("k3")];
        let err = store.get_multiple_or_fail(&keys).unwrap_err();
        assert_eq!(err.missing_keys(), Some(&[Key::from("k2"), Key::from("k3")][..]));
    }

    #[test]
    fn count_tracks_mutations() {
        let store = MemoryStore::new();
        assert_eq!(store.count().unwrap(), 0);
        store.set(Key::from("a"), Value::from(1)).unwrap();
        store.set(Key::from("a"), Value::from(2)).unwrap();
        assert_eq!(store.count().unwrap(), 1);
        store.clear().unwrap();
        assert_eq!(store.count().unwrap(), 0);
    }
}
