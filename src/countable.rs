//! Counting decorator for any store.
//!
//! [`CountableDecorator`] adds a cached [`count`](Countable::count) to any
//! [`Store`]. The count is computed lazily from the wrapped store's
//! [`keys`](Store::keys) and cached with a freshness flag; any mutation
//! through the decorator (`set`, `remove`, `clear`) invalidates the flag
//! without eagerly recomputing. The next `count` after invalidation
//! triggers exactly one recomputation — the cache lock is held across it,
//! so concurrent callers observe the freshly computed value instead of
//! racing their own recomputations.
//!
//! Mutations that bypass the decorator (e.g. through a clone of the
//! wrapped store) are invisible to the cache until the next invalidating
//! call through the decorator.

use std::collections::BTreeMap;

use parking_lot::Mutex;

use crate::{
    error::StoreResult,
    key::Key,
    store::{Countable, Store},
    value::Value,
};

#[derive(Debug, Default)]
struct CountCache {
    count: usize,
    fresh: bool,
}

/// A decorator adding a cached entry count to any store.
///
/// # Example
///
/// ```
/// use polystore::{Countable, CountableDecorator, Key, MemoryStore, Store, Value};
///
/// let store = CountableDecorator::new(MemoryStore::new());
/// assert_eq!(store.count()?, 0);
/// store.set(Key::from("a"), Value::from(1))?;
/// store.set(Key::from("a"), Value::from(2))?; // same key, count unchanged
/// assert_eq!(store.count()?, 1);
/// # Ok::<(), polystore::StoreError>(())
/// ```
#[derive(Debug)]
pub struct CountableDecorator<S> {
    store: S,
    cache: Mutex<CountCache>,
}

impl<S: Store> CountableDecorator<S> {
    /// Wraps a store.
    pub fn new(store: S) -> Self {
        Self { store, cache: Mutex::new(CountCache::default()) }
    }

    /// Returns a reference to the wrapped store.
    pub fn inner(&self) -> &S {
        &self.store
    }

    /// Unwraps the decorator, returning the wrapped store.
    pub fn into_inner(self) -> S {
        self.store
    }

    fn invalidate(&self) {
        self.cache.lock().fresh = false;
    }
}

impl<S: Store> Store for CountableDecorator<S> {
    fn set(&self, key: Key, value: Value) -> StoreResult<()> {
        self.invalidate();
        self.store.set(key, value)
    }

    fn get_or_fail(&self, key: &Key) -> StoreResult<Value> {
        self.store.get_or_fail(key)
    }

    fn get(&self, key: &Key, default: Value) -> StoreResult<Value> {
        self.store.get(key, default)
    }

    fn get_multiple(&self, keys: &[Key], default: Value) -> StoreResult<BTreeMap<Key, Value>> {
        self.store.get_multiple(keys, default)
    }

    fn get_multiple_or_fail(&self, keys: &[Key]) -> StoreResult<BTreeMap<Key, Value>> {
        self.store.get_multiple_or_fail(keys)
    }

    fn remove(&self, key: &Key) -> StoreResult<bool> {
        self.invalidate();
        self.store.remove(key)
    }

    fn exists(&self, key: &Key) -> StoreResult<bool> {
        self.store.exists(key)
    }

    fn clear(&self) -> StoreResult<()> {
        self.invalidate();
        self.store.clear()
    }

    fn keys(&self) -> StoreResult<Vec<Key>> {
        self.store.keys()
    }
}

impl<S: Store> Countable for CountableDecorator<S> {
    fn count(&self) -> StoreResult<usize> {
        let mut cache = self.cache.lock();
        if !cache.fresh {
            cache.count = self.store.keys()?.len();
            cache.fresh = true;
        }
        Ok(cache.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    #[test]
    fn count_tracks_every_mutation_kind() {
        let store = CountableDecorator::new(MemoryStore::new());
        assert_eq!(store.count().unwrap(), 0);

        store.set(Key::from("a"), Value::from(1)).unwrap();
        assert_eq!(store.count().unwrap(), 1);

        store.set(Key::from("a"), Value::from(2)).unwrap();
        assert_eq!(store.count().unwrap(), 1, "duplicate-key set leaves count unchanged");

        store.set(Key::from("b"), Value::from(3)).unwrap();
        assert_eq!(store.count().unwrap(), 2);

        assert!(store.remove(&Key::from("a")).unwrap());
        assert_eq!(store.count().unwrap(), 1);

        assert!(!store.remove(&Key::from("a")).unwrap());
        assert_eq!(store.count().unwrap(), 1, "removing an absent key leaves count unchanged");

        store.clear().unwrap();
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn count_is_cached_between_invalidations() {
        let inner = MemoryStore::new();
        let store = CountableDecorator::new(inner.clone());
        store.set(Key::from("a"), Value::from(1)).unwrap();
        assert_eq!(store.count().unwrap(), 1);

        // Mutate the wrapped store behind the decorator's back: the cached
        // count keeps being served until the next mutation through the
        // decorator invalidates it.
        inner.set(Key::from("b"), Value::from(2)).unwrap();
        assert_eq!(store.count().unwrap(), 1, "stale by design");

        store.set(Key::from("c"), Value::from(3)).unwrap();
        assert_eq!(store.count().unwrap(), 3);
    }

    #[test]
    fn reads_do_not_invalidate() {
        let inner = MemoryStore::new();
        let store = CountableDecorator::new(inner.clone());
        store.set(Key::from("a"), Value::from(1)).unwrap();
        assert_eq!(store.count().unwrap(), 1);

        inner.set(Key::from("b"), Value::from(2)).unwrap();
        let _ = store.get(&Key::from("a"), Value::Null).unwrap();
        let _ = store.exists(&Key::from("b")).unwrap();
        let _ = store.keys().unwrap();
        assert_eq!(store.count().unwrap(), 1, "reads must serve the cached count");
    }

    #[test]
    fn delegates_reads_unchanged() {
        let store = CountableDecorator::new(MemoryStore::new());
        store.set(Key::from("k"), Value::from("v")).unwrap();
        assert_eq!(store.get_or_fail(&Key::from("k")).unwrap(), Value::from("v"));
        assert!(store.exists(&Key::from("k")).unwrap());
        assert_eq!(store.keys().unwrap(), vec![Key::from("k")]);
    }
}
