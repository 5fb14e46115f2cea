//! Second-level cache collaborator for [`CachedStore`](crate::CachedStore).
//!
//! [`SecondaryCache`] is the capability set the caching decorator needs
//! from a cache: contains-check, fetch, save-with-optional-TTL, delete, and
//! whole-cache invalidation. Instead of probing the cache object for
//! optional interfaces at call time, each implementation advertises its
//! invalidation capability through an explicit [`ClearCapability`]
//! descriptor that [`CachedStore::new`](crate::CachedStore::new) validates
//! once at construction.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use parking_lot::RwLock;

use crate::{key::Key, value::Value};

/// How a [`SecondaryCache`] supports whole-cache invalidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearCapability {
    /// The cache can delete the entries it owns ([`SecondaryCache::delete_all`]).
    DeleteAll,
    /// The cache can only flush its entire storage ([`SecondaryCache::flush_all`]),
    /// possibly affecting co-tenants.
    FlushAll,
}

/// A cache sitting in front of a store.
///
/// Implementations must be infallible at this interface: a cache that
/// loses entries degrades performance, never correctness, so eviction and
/// expiry are invisible here (an expired entry simply stops being
/// contained).
///
/// Implementations override the invalidation method matching their
/// advertised [`ClearCapability`]; the other may be left as the default
/// no-op, since [`CachedStore`](crate::CachedStore) only ever calls the
/// advertised one.
pub trait SecondaryCache: Send + Sync {
    /// The whole-cache invalidation this cache supports, if any.
    ///
    /// Returning `None` makes [`CachedStore::new`](crate::CachedStore::new)
    /// fail with a configuration error: a cache that cannot be invalidated
    /// would serve stale entries forever after `clear`.
    fn clear_capability(&self) -> Option<ClearCapability>;

    /// Returns whether the cache currently holds an entry for the key.
    fn contains(&self, key: &Key) -> bool;

    /// Returns the cached value for the key, if any.
    fn fetch(&self, key: &Key) -> Option<Value>;

    /// Stores a value, optionally expiring after `ttl`.
    fn save(&self, key: Key, value: Value, ttl: Option<Duration>);

    /// Removes a single entry.
    fn delete(&self, key: &Key);

    /// Deletes all entries owned by this cache. See [`ClearCapability::DeleteAll`].
    fn delete_all(&self) {}

    /// Flushes the cache's entire storage. See [`ClearCapability::FlushAll`].
    fn flush_all(&self) {}
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| at <= Instant::now())
    }
}

/// An in-memory [`SecondaryCache`] with per-entry TTL.
///
/// Expiry is evaluated on access; there is no background cleanup task.
/// Cheaply cloneable via [`Arc`]; clones share entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    entries: Arc<RwLock<HashMap<Key, CacheEntry>>>,
}

impl MemoryCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SecondaryCache for MemoryCache {
    fn clear_capability(&self) -> Option<ClearCapability> {
        Some(ClearCapability::DeleteAll)
    }

    fn contains(&self, key: &Key) -> bool {
        self.entries.read().get(key).is_some_and(|entry| !entry.is_expired())
    }

    fn fetch(&self, key: &Key) -> Option<Value> {
        let entries = self.entries.read();
        let entry = entries.get(key)?;
        if entry.is_expired() {
            return None;
        }
        Some(entry.value.clone())
    }

    fn save(&self, key: Key, value: Value, ttl: Option<Duration>) {
        let expires_at = ttl.map(|ttl| Instant::now() + ttl);
        self.entries.write().insert(key, CacheEntry { value, expires_at });
    }

    fn delete(&self, key: &Key) {
        self.entries.write().remove(key);
    }

    fn delete_all(&self) {
        self.entries.write().clear();
    }
}
