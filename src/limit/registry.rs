//! Keyed Limiter Registry
//!
//! Composes the expiring cache and the token bucket: every caller key gets
//! its own bucket, created lazily on first sight and reclaimed once idle.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::cache::{CacheStats, EventHook, ExpiringCache};
use crate::error::{AdmissionError, Result};
use crate::limit::TokenBucket;
use crate::tasks::{spawn_reaper_task, ReaperHandle};

// == Keyed Limiter ==
/// Per-caller admission control.
///
/// Buckets live inside a bounded LRU+TTL cache, so the number of tracked
/// callers never exceeds `max_tracked` (cardinality explosions evict the
/// least recently seen callers) and idle callers are reclaimed after the
/// idle TTL regardless of traffic.
#[derive(Clone)]
pub struct KeyedLimiter {
    /// One bucket per caller key, bounded and expiring
    buckets: Arc<RwLock<ExpiringCache<Arc<TokenBucket>>>>,
    /// Tokens per second granted to every new bucket
    rate: u64,
    /// Maximum burst granted to every new bucket
    burst: u64,
    /// How long an idle caller's bucket is retained
    idle_ttl: Duration,
}

impl KeyedLimiter {
    // == Constructor ==
    /// Creates a registry tracking at most `max_tracked` callers, each
    /// limited to `rate` tokens per second with a burst cap of `burst`.
    ///
    /// `idle_ttl` bounds how long an unused bucket is retained; zero means
    /// the cache's default long lifetime. All numeric parameters must be
    /// positive.
    pub fn new(max_tracked: usize, rate: u64, burst: u64, idle_ttl: Duration) -> Result<Self> {
        Self::build(max_tracked, rate, burst, idle_ttl, None)
    }

    /// Same as [`new`](Self::new), subscribing `hook` to the bucket cache's
    /// insert/evict/expire events.
    pub fn with_event_hook(
        max_tracked: usize,
        rate: u64,
        burst: u64,
        idle_ttl: Duration,
        hook: EventHook,
    ) -> Result<Self> {
        Self::build(max_tracked, rate, burst, idle_ttl, Some(hook))
    }

    fn build(
        max_tracked: usize,
        rate: u64,
        burst: u64,
        idle_ttl: Duration,
        hook: Option<EventHook>,
    ) -> Result<Self> {
        if rate == 0 {
            return Err(AdmissionError::InvalidConfig(
                "limiter rate must be positive".to_string(),
            ));
        }
        if burst == 0 {
            return Err(AdmissionError::InvalidConfig(
                "limiter burst must be positive".to_string(),
            ));
        }
        let cache = match hook {
            Some(hook) => ExpiringCache::with_event_hook(max_tracked, hook)?,
            None => ExpiringCache::new(max_tracked)?,
        };
        Ok(Self {
            buckets: Arc::new(RwLock::new(cache)),
            rate,
            burst,
            idle_ttl,
        })
    }

    // == Check ==
    /// Decides whether one request from `key` is admitted.
    ///
    /// A known caller reuses its bucket (promoting it to most recently used;
    /// the TTL set at creation is not extended). An unknown caller gets a
    /// fresh warm bucket stored with the configured idle TTL.
    pub async fn check(&self, key: &str) -> bool {
        let bucket = {
            let mut cache = self.buckets.write().await;
            match cache.get(key) {
                Some(bucket) => bucket,
                None => {
                    let bucket = Arc::new(TokenBucket::from_parts(self.rate, self.burst));
                    cache.set(key.to_string(), Arc::clone(&bucket), self.idle_ttl);
                    bucket
                }
            }
        };

        // The cache lock is released before touching the bucket's own lock,
        // so a slow caller never holds up unrelated keys.
        bucket.accept()
    }

    // == Tracked ==
    /// Returns the number of callers currently tracked.
    pub async fn tracked(&self) -> usize {
        self.buckets.read().await.len()
    }

    // == Stats ==
    /// Returns a snapshot of the bucket cache's activity counters.
    pub async fn stats(&self) -> CacheStats {
        self.buckets.read().await.stats()
    }

    // == Start Reaper ==
    /// Spawns the background sweep that reclaims expired buckets.
    ///
    /// The returned handle owns the task's lifecycle; see [`ReaperHandle`].
    pub fn start_reaper(&self, interval: Duration) -> ReaperHandle {
        spawn_reaper_task(Arc::clone(&self.buckets), interval)
    }
}
