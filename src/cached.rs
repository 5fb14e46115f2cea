//! Caching decorator combining a store with a [`SecondaryCache`].
//!
//! [`CachedStore`] is write-through and read-through: every write lands in
//! the store first and is mirrored into the cache only after the store
//! accepts it, and every read consults the cache before falling back to
//! the store (populating the cache on the way back). Consistency therefore
//! holds as long as all mutations go through the decorator; mutations
//! applied directly to the wrapped store leave stale cache entries until
//! their TTL expires or the next write through the decorator overwrites
//! them.
//!
//! Construction validates the cache's [`ClearCapability`] once: a cache
//! that supports neither delete-all nor flush-all invalidation cannot
//! honor [`clear`](Store::clear) and is rejected with
//! [`ConfigError::MissingClearCapability`].

use std::{collections::BTreeMap, time::Duration};

use tracing::trace;

use crate::{
    cache::{ClearCapability, SecondaryCache},
    error::{ConfigError, StoreError, StoreResult},
    key::Key,
    store::Store,
    value::Value,
};

/// A decorator serving reads from a [`SecondaryCache`] in front of a store.
///
/// # Example
///
/// ```
/// use polystore::{CachedStore, Key, MemoryCache, MemoryStore, Store, Value};
///
/// let store = CachedStore::new(MemoryStore::new(), MemoryCache::new(), None)?;
/// store.set(Key::from("greeting"), Value::from("hello"))?;
/// assert_eq!(store.get_or_fail(&Key::from("greeting"))?, Value::from("hello"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct CachedStore<S, C> {
    store: S,
    cache: C,
    ttl: Option<Duration>,
    clear: ClearCapability,
}

impl<S: Store, C: SecondaryCache> CachedStore<S, C> {
    /// Wraps a store with a cache.
    ///
    /// Entries mirrored into the cache expire after `ttl`; `None` caches
    /// without expiry.
    ///
    /// # Errors
    ///
    /// Fails with [`ConfigError::MissingClearCapability`] if the cache
    /// advertises no whole-cache invalidation.
    pub fn new(store: S, cache: C, ttl: Option<Duration>) -> Result<Self, ConfigError> {
        let Some(clear) = cache.clear_capability() else {
            return Err(ConfigError::MissingClearCapability {
                cache_type: std::any::type_name::<C>(),
            });
        };
        Ok(Self { store, cache, ttl, clear })
    }

    /// Returns a reference to the wrapped store.
    pub fn inner(&self) -> &S {
        &self.store
    }

    /// Returns a reference to the cache.
    pub fn cache(&self) -> &C {
        &self.cache
    }

    fn save(&self, key: Key, value: Value) {
        self.cache.save(key, value, self.ttl);
    }
}

impl<S: Store, C: SecondaryCache> Store for CachedStore<S, C> {
    /// Writes through: the store first, the cache only on success.
    fn set(&self, key: Key, value: Value) -> StoreResult<()> {
        self.store.set(key.clone(), value.clone())?;
        self.save(key, value);
        Ok(())
    }

    fn get_or_fail(&self, key: &Key) -> StoreResult<Value> {
        if let Some(value) = self.cache.fetch(key) {
            trace!(%key, "cache hit");
            return Ok(value);
        }
        let value = self.store.get_or_fail(key)?;
        self.save(key.clone(), value.clone());
        Ok(value)
    }

    fn get(&self, key: &Key, default: Value) -> StoreResult<Value> {
        if let Some(value) = self.cache.fetch(key) {
            trace!(%key, "cache hit");
            return Ok(value);
        }
        match self.store.get_or_fail(key) {
            Ok(value) => {
                self.save(key.clone(), value.clone());
                Ok(value)
            },
            // Absence is not cached; the default stands in for this call only.
            Err(StoreError::NoSuchKey { .. }) => Ok(default),
            Err(e) => Err(e),
        }
    }

    fn get_multiple(&self, keys: &[Key], default: Value) -> StoreResult<BTreeMap<Key, Value>> {
        let mut values = BTreeMap::new();
        let mut uncached: Vec<Key> = Vec::new();
        for key in keys {
            if values.contains_key(key) || uncached.contains(key) {
                continue;
            }
            match self.cache.fetch(key) {
                Some(value) => {
                    trace!(%key, "cache hit");
                    values.insert(key.clone(), value);
                },
                None => uncached.push(key.clone()),
            }
        }
        if !uncached.is_empty() {
            // One batch read; absent keys come back holding the default.
            // Nothing from this path is mirrored into the cache, since a
            // defaulted entry is indistinguishable from a stored one here.
            for (key, value) in self.store.get_multiple(&uncached, default)? {
                values.insert(key, value);
            }
        }
        Ok(values)
    }

    fn get_multiple_or_fail(&self, keys: &[Key]) -> StoreResult<BTreeMap<Key, Value>> {
        let mut values = BTreeMap::new();
        let mut uncached: Vec<Key> = Vec::new();
        for key in keys {
            if values.contains_key(key) || uncached.contains(key) {
                continue;
            }
            match self.cache.fetch(key) {
                Some(value) => {
                    trace!(%key, "cache hit");
                    values.insert(key.clone(), value);
                },
                None => uncached.push(key.clone()),
            }
        }
        if !uncached.is_empty() {
            // One batch read for everything the cache missed.
            let fetched = self.store.get_multiple_or_fail(&uncached)?;
            for (key, value) in fetched {
                self.save(key.clone(), value.clone());
                values.insert(key, value);
            }
        }
        Ok(values)
    }

    fn remove(&self, key: &Key) -> StoreResult<bool> {
        let removed = self.store.remove(key)?;
        self.cache.delete(key);
        Ok(removed)
    }

    fn exists(&self, key: &Key) -> StoreResult<bool> {
        if self.cache.contains(key) {
            return Ok(true);
        }
        self.store.exists(key)
    }

    fn clear(&self) -> StoreResult<()> {
        self.store.clear()?;
        match self.clear {
            ClearCapability::DeleteAll => self.cache.delete_all(),
            ClearCapability::FlushAll => self.cache.flush_all(),
        }
        Ok(())
    }

    fn keys(&self) -> StoreResult<Vec<Key>> {
        self.store.keys()
    }
}
