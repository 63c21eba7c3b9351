//! A small TTL cache with atomic per-key upsert.
//!
//! The prediction cache is the only shared mutable resource in the engine.
//! Entries expire on read after a fixed time-to-live; nothing else writes
//! appointment data, so there is no write-through invalidation. Stale-read
//! races are acceptable — probabilities are estimates, not ledger state.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Thread-safe map with per-entry expiry.
///
/// `get()` and `insert()` each acquire an internal `Mutex`; clones share the
/// same underlying map. No transactional discipline beyond per-key upsert.
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: Arc<Mutex<HashMap<K, (V, Instant)>>>,
}

impl<K, V> Clone for TtlCache<K, V> {
    fn clone(&self) -> Self {
        Self { ttl: self.ttl, entries: Arc::clone(&self.entries) }
    }
}

impl<K: Eq + Hash + Clone, V: Clone> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entries: Arc::new(Mutex::new(HashMap::new())) }
    }

    // The cache holds no invariants across entries, so a lock poisoned by
    // a panicking holder is still safe to keep using.
    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<K, (V, Instant)>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetch a live entry; expired entries are evicted and report a miss.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.entries();
        match entries.get(key) {
            Some((_, inserted)) if inserted.elapsed() > self.ttl => {
                entries.remove(key);
                None
            }
            Some((value, _)) => Some(value.clone()),
            None => None,
        }
    }

    /// Insert or overwrite, resetting the entry's clock.
    pub fn insert(&self, key: K, value: V) {
        self.entries().insert(key, (value, Instant::now()));
    }

    /// Count of entries still within their TTL.
    pub fn len(&self) -> usize {
        let mut entries = self.entries();
        entries.retain(|_, (_, inserted)| inserted.elapsed() <= self.ttl);
        entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
