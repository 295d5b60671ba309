//! Request Manager Module
//!
//! Front door for upstream fetches: cache lookup first, then a coalesced
//! producer run whose successful result is written back to the cache.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::cache::TimedLruCache;
use crate::error::Result;
use crate::fetch::CoalescingFetcher;

// == Request Manager ==
/// Composes the timed LRU cache with the coalescing fetcher.
///
/// One instance is constructed at startup and handed to the handler layer;
/// tests build their own independent instances.
#[derive(Debug)]
pub struct RequestManager<V> {
    /// Shared response cache
    cache: Arc<RwLock<TimedLruCache<V>>>,
    /// In-flight deduplication
    fetcher: CoalescingFetcher<V>,
    /// TTL applied to every stored entry, in milliseconds
    ttl_ms: u64,
}

impl<V> RequestManager<V>
where
    V: Clone,
{
    // == Constructor ==
    /// Creates a manager with a fresh cache of `max_entries` slots and the
    /// given entry TTL.
    pub fn new(max_entries: usize, ttl_ms: u64) -> Self {
        Self {
            cache: Arc::new(RwLock::new(TimedLruCache::new(max_entries))),
            fetcher: CoalescingFetcher::new(),
            ttl_ms,
        }
    }

    // == Cache Handle ==
    /// Shared handle to the underlying cache, used by the expiry sweeper.
    pub fn cache(&self) -> Arc<RwLock<TimedLruCache<V>>> {
        Arc::clone(&self.cache)
    }

    // == Fetch ==
    /// Returns the value for `key`, producing it at most once per miss wave.
    ///
    /// 1. A live cache hit is returned immediately; the producer is not
    ///    consulted and no in-flight entry is touched.
    /// 2. On a miss the call is delegated to the coalescing fetcher with a
    ///    wrapped producer, so only the leader of a wave runs the real
    ///    producer and stores its successful result under `key`.
    /// 3. A failed producer run is propagated to every coalesced caller and
    ///    leaves the cache untouched.
    pub async fn fetch<F, Fut>(&self, key: &str, producer: F) -> Result<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        // The write lock is required even for lookups: a hit touches the
        // recency order.
        if let Some(value) = self.cache.write().await.get(key) {
            tracing::debug!(key = %key, "cache hit");
            return Ok(value);
        }

        tracing::debug!(key = %key, "cache miss");
        let cache = Arc::clone(&self.cache);
        let ttl_ms = self.ttl_ms;
        let store_key = key.to_string();
        self.fetcher
            .run(key.to_string(), || async move {
                let value = producer().await?;
                cache.write().await.set(store_key, value.clone(), ttl_ms);
                Ok(value)
            })
            .await
    }

    // == In-Flight Count ==
    /// Number of keys with a producer currently in flight.
    pub fn in_flight_count(&self) -> usize {
        self.fetcher.in_flight_count()
    }
}
