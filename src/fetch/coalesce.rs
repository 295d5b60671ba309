//! Request Coalescing Module
//!
//! Deduplicates concurrent fetches for the same key: the first caller runs
//! the producer, everyone else awaits the same settlement.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;

use tokio::sync::broadcast;

use crate::error::{ProxyError, Result};

// == Coalescing Fetcher ==
/// De-duplicates concurrent producer invocations per key.
///
/// The first caller for a key becomes the leader: it registers a broadcast
/// channel under the key, runs the producer, and publishes the settled
/// result to every waiter that subscribed in the meantime. Callers arriving
/// while the key is registered subscribe instead of producing.
///
/// The in-flight registry is guarded by a synchronous `std::sync::Mutex`
/// that is never held across an await, so check-and-register is a single
/// uninterruptible step: two concurrent callers for one key cannot both
/// become the leader.
///
/// Successful values are not retained here; caching is the caller's
/// concern. Failures are broadcast like successes and the key is freed at
/// settlement either way, so a failed key is immediately eligible for a
/// fresh producer run.
#[derive(Debug)]
pub struct CoalescingFetcher<V> {
    /// Keys with a producer currently in flight
    in_flight: Mutex<HashMap<String, broadcast::Sender<Result<V>>>>,
}

impl<V> Default for CoalescingFetcher<V>
where
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V> CoalescingFetcher<V>
where
    V: Clone,
{
    // == Constructor ==
    /// Creates a fetcher with an empty in-flight registry.
    pub fn new() -> Self {
        Self {
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    // == Run ==
    /// Runs `producer` for `key`, or joins an already in-flight run.
    ///
    /// All callers coalesced onto one run observe the identical success
    /// value or the identical failure.
    pub async fn run<F, Fut>(&self, key: String, producer: F) -> Result<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        // Check-and-register without yielding: either subscribe to the
        // current leader or become the leader.
        let mut rx = {
            let mut guard = self.in_flight.lock().expect("in-flight registry poisoned");
            match guard.get(&key) {
                Some(tx) => Some(tx.subscribe()),
                None => {
                    // One result per run, so capacity 1 is enough
                    let (tx, _) = broadcast::channel(1);
                    guard.insert(key.clone(), tx);
                    None
                }
            }
        };

        // Waiter path: await the leader's settlement
        if let Some(rx) = rx.as_mut() {
            return match rx.recv().await {
                Ok(result) => result,
                Err(_) => Err(ProxyError::Internal(
                    "in-flight request dropped before settling".to_string(),
                )),
            };
        }

        // Leader path: produce, unregister at settlement, then publish.
        // Waiters can only subscribe while the entry exists, so none can
        // miss a result sent after removal.
        let result = producer().await;

        let tx = {
            let mut guard = self.in_flight.lock().expect("in-flight registry poisoned");
            guard
                .remove(&key)
                .expect("in-flight entry vanished before settlement")
        };
        let _ = tx.send(result.clone());

        result
    }

    // == In-Flight Count ==
    /// Number of keys currently in flight.
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.lock().expect("in-flight registry poisoned").len()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_single_caller_runs_producer_once() {
        let fetcher: CoalescingFetcher<String> = CoalescingFetcher::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let calls_clone = calls.clone();
        let value = fetcher
            .run("/movie/550".to_string(), || async move {
                calls_clone.fetch_add(1, Ordering::SeqCst);
                Ok("fight club".to_string())
            })
            .await
            .unwrap();

        assert_eq!(value, "fight club");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(fetcher.in_flight_count(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_producer_run() {
        let fetcher = Arc::new(CoalescingFetcher::<String>::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..10 {
            let fetcher = fetcher.clone();
            let calls = calls.clone();
            handles.push(tokio::spawn(async move {
                fetcher
                    .run("/movie/550".to_string(), || async move {
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        calls.fetch_add(1, Ordering::SeqCst);
                        Ok("shared".to_string())
                    })
                    .await
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), "shared");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(fetcher.in_flight_count(), 0);
    }

    #[tokio::test]
    async fn test_distinct_keys_run_independently() {
        let fetcher = Arc::new(CoalescingFetcher::<String>::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for i in 0..5 {
            let fetcher = fetcher.clone();
            let calls = calls.clone();
            handles.push(tokio::spawn(async move {
                fetcher
                    .run(format!("/movie/{i}"), || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Ok(format!("movie {i}"))
                    })
                    .await
            }));
        }

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_failure_is_shared_and_key_is_freed() {
        let fetcher = Arc::new(CoalescingFetcher::<String>::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..3 {
            let fetcher = fetcher.clone();
            let calls = calls.clone();
            handles.push(tokio::spawn(async move {
                fetcher
                    .run("/movie/999".to_string(), || async move {
                        tokio::time::sleep(Duration::from_millis(30)).await;
                        calls.fetch_add(1, Ordering::SeqCst);
                        Err::<String, _>(ProxyError::Upstream {
                            status: 404,
                            body: r#"{"status_message":"not found"}"#.to_string(),
                        })
                    })
                    .await
            }));
        }

        for handle in handles {
            let err = handle.await.unwrap().unwrap_err();
            match err {
                ProxyError::Upstream { status, .. } => assert_eq!(status, 404),
                other => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // the failed key must be immediately retryable
        let calls_clone = calls.clone();
        fetcher
            .run("/movie/999".to_string(), || async move {
                calls_clone.fetch_add(1, Ordering::SeqCst);
                Ok("recovered".to_string())
            })
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_sequential_calls_each_run_the_producer() {
        let fetcher: CoalescingFetcher<u32> = CoalescingFetcher::new();
        let calls = Arc::new(AtomicUsize::new(0));

        for expected in [1, 2] {
            let calls_clone = calls.clone();
            fetcher
                .run("/movie/1".to_string(), || async move {
                    calls_clone.fetch_add(1, Ordering::SeqCst);
                    Ok(0)
                })
                .await
                .unwrap();
            assert_eq!(calls.load(Ordering::SeqCst), expected);
        }
    }

    #[tokio::test]
    async fn test_in_flight_count_during_run() {
        let fetcher = Arc::new(CoalescingFetcher::<u32>::new());

        let fetcher_clone = fetcher.clone();
        let handle = tokio::spawn(async move {
            fetcher_clone
                .run("/slow".to_string(), || async {
                    tokio::time::sleep(Duration::from_millis(80)).await;
                    Ok(7)
                })
                .await
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(fetcher.in_flight_count(), 1);

        handle.await.unwrap().unwrap();
        assert_eq!(fetcher.in_flight_count(), 0);
    }
}
