//! LRU Tracker Module
//!
//! Explicit recency ordering of cache keys for eviction decisions.

use std::collections::VecDeque;

// == LRU Tracker ==
/// Tracks the last-touch order of cache keys.
///
/// The deque holds keys ordered by recency:
/// - Front = least recently touched (next eviction candidate)
/// - Back = most recently touched
///
/// A key that was inserted but never touched again keeps its insertion
/// position, so ties between untouched keys resolve to first-inserted-first.
#[derive(Debug, Default)]
pub struct LruTracker {
    /// Keys ordered front-to-back from coldest to hottest
    order: VecDeque<String>,
}

impl LruTracker {
    // == Constructor ==
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Touch ==
    /// Records a touch: the key becomes the most recently used.
    ///
    /// Works for both new and already-tracked keys.
    pub fn touch(&mut self, key: &str) {
        self.remove(key);
        self.order.push_back(key.to_string());
    }

    // == Remove ==
    /// Drops a key from the tracker. No-op for unknown keys.
    pub fn remove(&mut self, key: &str) {
        self.order.retain(|k| k != key);
    }

    // == Pop LRU ==
    /// Removes and returns the least recently used key, if any.
    pub fn pop_lru(&mut self) -> Option<String> {
        self.order.pop_front()
    }

    // == Peek LRU ==
    /// Returns the least recently used key without removing it.
    pub fn peek_lru(&self) -> Option<&String> {
        self.order.front()
    }

    // == Length ==
    /// Number of tracked keys.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
