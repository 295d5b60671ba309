//! Cache Entry Module
//!
//! A stored value together with its absolute expiration time.

use std::time::{SystemTime, UNIX_EPOCH};

// == Cache Entry ==
/// A single cached payload with its expiration timestamp.
///
/// Every entry expires; there is no "forever" variant. Entries are created
/// on a successful upstream fetch and destroyed on eviction, overwrite, or
/// expiry detection.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The cached payload
    pub value: V,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates an entry expiring `ttl_ms` milliseconds from now.
    pub fn new(value: V, ttl_ms: u64) -> Self {
        Self {
            value,
            expires_at: current_timestamp_ms() + ttl_ms,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry's TTL has elapsed.
    ///
    /// Boundary policy: an entry is expired once the current time is greater
    /// than or equal to `expires_at`. A lookup at exactly the expiration
    /// instant is a miss.
    pub fn is_expired(&self) -> bool {
        current_timestamp_ms() >= self.expires_at
    }
}

// == Utility Functions ==
/// Returns the current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}
