//! Timed LRU Cache Module
//!
//! Bounded key-value store combining HashMap storage, an explicit recency
//! tracker, and per-entry TTL expiration.

use std::collections::HashMap;

use crate::cache::{CacheEntry, LruTracker};

// == Timed LRU Cache ==
/// A bounded, time-expiring, least-recently-used cache.
///
/// Keys are request paths; values are whatever the caller wants to memoize
/// (cloned out on every hit). The cache never returns an expired entry, and
/// never holds more than `max_entries` live entries.
///
/// Both `get` hits and `set` count as touches for recency purposes, so the
/// eviction victim is always the entry that has gone longest without being
/// read or written.
#[derive(Debug)]
pub struct TimedLruCache<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Recency tracker, kept in lockstep with `entries`
    lru: LruTracker,
    /// Maximum number of live entries
    max_entries: usize,
}

impl<V: Clone> TimedLruCache<V> {
    // == Constructor ==
    /// Creates an empty cache holding at most `max_entries` entries.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            max_entries,
        }
    }

    // == Get ==
    /// Looks up a key, returning a clone of the value on a live hit.
    ///
    /// An expired entry is treated exactly like an absent one, and is
    /// removed as a side effect. A hit touches the entry.
    pub fn get(&mut self, key: &str) -> Option<V> {
        match self.entries.get(key) {
            Some(entry) if entry.is_expired() => {
                self.entries.remove(key);
                self.lru.remove(key);
                None
            }
            Some(entry) => {
                let value = entry.value.clone();
                self.lru.touch(key);
                Some(value)
            }
            None => None,
        }
    }

    // == Set ==
    /// Stores a value under `key`, expiring `ttl_ms` milliseconds from now.
    ///
    /// Overwriting an existing key replaces the entry in place and counts as
    /// a touch, not a new slot. Inserting a new key into a full cache first
    /// evicts the least recently used entry.
    pub fn set(&mut self, key: String, value: V, ttl_ms: u64) {
        let is_new = !self.entries.contains_key(&key);

        if is_new && self.entries.len() >= self.max_entries {
            if let Some(victim) = self.lru.pop_lru() {
                self.entries.remove(&victim);
                tracing::debug!(key = %victim, "evicted least recently used entry");
            }
        }

        self.entries.insert(key.clone(), CacheEntry::new(value, ttl_ms));
        self.lru.touch(&key);
    }

    // == Cleanup Expired ==
    /// Removes every expired entry, returning how many were dropped.
    pub fn cleanup_expired(&mut self) -> usize {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.entries.remove(key);
            self.lru.remove(key);
        }

        expired.len()
    }

    // == Length ==
    /// Current number of stored entries, expired ones included until they
    /// are observed or swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
