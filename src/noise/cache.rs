//! Memoisation table with an explicit growth policy.

use std::collections::HashMap;
use std::hash::Hash;

use lru::LruCache;

use crate::params::CachePolicy;

/// Hit/miss counters and current size of a [`MemoCache`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    /// Fraction of lookups served from the table
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

enum Store<K, V> {
    Disabled,
    Unbounded(HashMap<K, V>),
    Lru(LruCache<K, V>),
}

/// Memo table keyed by `K`, storing small `Copy` values
pub struct MemoCache<K, V> {
    store: Store<K, V>,
    hits: u64,
    misses: u64,
}

impl<K: Hash + Eq, V: Copy> MemoCache<K, V> {
    pub fn new(policy: CachePolicy) -> Self {
        let store = match policy {
            CachePolicy::Disabled => Store::Disabled,
            CachePolicy::Unbounded => Store::Unbounded(HashMap::new()),
            CachePolicy::Lru(capacity) => Store::Lru(LruCache::new(capacity)),
        };
        Self {
            store,
            hits: 0,
            misses: 0,
        }
    }

    /// Return the cached value for `key`, computing and storing it on a miss
    pub fn get_or_insert_with(&mut self, key: K, compute: impl FnOnce() -> V) -> V {
        let cached = match &mut self.store {
            Store::Disabled => None,
            Store::Unbounded(map) => map.get(&key).copied(),
            Store::Lru(lru) => lru.get(&key).copied(),
        };
        if let Some(value) = cached {
            self.hits += 1;
            return value;
        }

        self.misses += 1;
        let value = compute();
        match &mut self.store {
            Store::Disabled => {}
            Store::Unbounded(map) => {
                map.insert(key, value);
            }
            Store::Lru(lru) => {
                lru.put(key, value);
            }
        }
        value
    }

    pub fn len(&self) -> usize {
        match &self.store {
            Store::Disabled => 0,
            Store::Unbounded(map) => map.len(),
            Store::Lru(lru) => lru.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            hits: self.hits,
            misses: self.misses,
        }
    }
}
