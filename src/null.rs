//! A store that discards everything.

use crate::{
    error::{StoreError, StoreResult},
    key::Key,
    store::{Countable, Store},
    value::Value,
};

/// A key-value store that discards all writes and never holds an entry.
///
/// Useful for disabling storage in configuration or for benchmark
/// baselines. Deliberately non-conforming: `set` succeeds but the entry is
/// never observable afterwards.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStore;

impl NullStore {
    /// Creates a null store.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Store for NullStore {
    fn set(&self, _key: Key, _value: Value) -> StoreResult<()> {
        Ok(())
    }

    fn get_or_fail(&self, key: &Key) -> StoreResult<Value> {
        Err(StoreError::no_such_key(key.clone()))
    }

    fn remove(&self, _key: &Key) -> StoreResult<bool> {
        Ok(false)
    }

    fn exists(&self, _key: &Key) -> StoreResult<bool> {
        Ok(false)
    }

    fn clear(&self) -> StoreResult<()> {
        Ok(())
    }

    fn keys(&self) -> StoreResult<Vec<Key>> {
        Ok(Vec::new())
    }
}

impl Countable for NullStore {
    fn count(&self) -> StoreResult<usize> {
        Ok(0)
    }
}
