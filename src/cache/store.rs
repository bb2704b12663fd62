//! Cache Store Module
//!
//! The main cache engine: HashMap storage combined with LRU tracking and TTL
//! expiry, bounded by a fixed capacity.

use std::collections::HashMap;
use std::time::Duration;

use crate::cache::{CacheEvent, CacheStats, EventHook, ExpiringEntry, LruTracker};
use crate::error::{AdmissionError, Result};

// == Expiring Cache ==
/// Bounded key-value store with LRU eviction and TTL expiry.
///
/// Absence is an ordinary outcome: `get` returns `None` for unknown and
/// expired keys alike. Capacity overflow is resolved silently by evicting
/// the least recently used entry.
pub struct ExpiringCache<V> {
    /// Key-value storage
    entries: HashMap<String, ExpiringEntry<V>>,
    /// LRU access tracker
    lru: LruTracker,
    /// Activity counters
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
    /// Optional observer for insertions and removals
    hook: Option<EventHook>,
}

impl<V: Clone> ExpiringCache<V> {
    // == Constructor ==
    /// Creates a new cache holding at most `capacity` entries.
    ///
    /// A zero capacity is a programmer error and is rejected eagerly.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(AdmissionError::InvalidConfig(
                "cache capacity must be positive".to_string(),
            ));
        }
        Ok(Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            capacity,
            hook: None,
        })
    }

    /// Creates a new cache that reports structural changes to `hook`.
    pub fn with_event_hook(capacity: usize, hook: EventHook) -> Result<Self> {
        let mut cache = Self::new(capacity)?;
        cache.hook = Some(hook);
        Ok(cache)
    }

    // == Get ==
    /// Retrieves the value stored under `key`, if present and alive.
    ///
    /// A live entry is promoted to most recently used. An entry whose TTL
    /// has elapsed is treated as absent and removed as a side effect, whether
    /// or not the reaper has seen it yet.
    pub fn get(&mut self, key: &str) -> Option<V> {
        if let Some(entry) = self.entries.get(key) {
            if entry.is_expired() {
                self.remove_expired(key);
                self.stats.record_miss();
                return None;
            }

            let value = entry.value.clone();
            self.stats.record_hit();
            self.lru.touch(key);
            Some(value)
        } else {
            self.stats.record_miss();
            None
        }
    }

    // == Set ==
    /// Stores `value` under `key`, expiring `ttl` from now.
    ///
    /// A zero `ttl` is substituted with the default long lifetime. An
    /// existing key has its value and expiry replaced in place and becomes
    /// most recently used; occupancy does not change. A new key is inserted
    /// most recently used, evicting the least recently used entry first if
    /// the cache is full.
    pub fn set(&mut self, key: String, value: V, ttl: Duration) {
        let is_new = !self.entries.contains_key(&key);

        if is_new && self.entries.len() >= self.capacity {
            if let Some(evicted_key) = self.lru.evict_oldest() {
                self.entries.remove(&evicted_key);
                self.stats.record_eviction();
                self.emit(CacheEvent::Evicted { key: evicted_key });
            }
        }

        self.entries
            .insert(key.clone(), ExpiringEntry::new(value, ttl));
        self.lru.touch(&key);
        self.stats.set_total_entries(self.entries.len());

        if is_new {
            self.emit(CacheEvent::Inserted { key });
        }
    }

    // == Remove ==
    /// Removes an entry by key. Returns whether the key was present.
    pub fn remove(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.lru.remove(key);
            self.stats.set_total_entries(self.entries.len());
        }
        removed
    }

    // == Purge Expired ==
    /// Removes every entry whose TTL has elapsed.
    ///
    /// Called periodically by the background reaper so that expired entries
    /// which are never looked up again do not hold memory. Returns the
    /// number of entries removed.
    pub fn purge_expired(&mut self) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();
        for key in expired_keys {
            self.remove_expired(&key);
        }
        count
    }

    // == Stats ==
    /// Returns a snapshot of the activity counters.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops an entry whose TTL has elapsed and records the expiration.
    fn remove_expired(&mut self, key: &str) {
        self.entries.remove(key);
        self.lru.remove(key);
        self.stats.record_expiration();
        self.stats.set_total_entries(self.entries.len());
        self.emit(CacheEvent::Expired {
            key: key.to_string(),
        });
    }

    fn emit(&self, event: CacheEvent) {
        if let Some(hook) = &self.hook {
            hook(&event);
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::thread::sleep;

    const NO_TTL: Duration = Duration::ZERO;

    fn new_cache(capacity: usize) -> ExpiringCache<String> {
        ExpiringCache::new(capacity).unwrap()
    }

    #[test]
    fn test_cache_new() {
        let cache = new_cache(100);
        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_rejects_zero_capacity() {
        let result = ExpiringCache::<String>::new(0);
        assert!(matches!(result, Err(AdmissionError::InvalidConfig(_))));
    }

    #[test]
    fn test_cache_set_and_get() {
        let mut cache = new_cache(100);

        cache.set("key1".to_string(), "value1".to_string(), NO_TTL);

        assert_eq!(cache.get("key1"), Some("value1".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_get_nonexistent() {
        let mut cache = new_cache(100);
        assert_eq!(cache.get("nonexistent"), None);
    }

    #[test]
    fn test_cache_remove() {
        let mut cache = new_cache(100);

        cache.set("key1".to_string(), "value1".to_string(), NO_TTL);
        assert!(cache.remove("key1"));

        assert!(cache.is_empty());
        assert_eq!(cache.get("key1"), None);
        assert!(!cache.remove("key1"));
    }

    #[test]
    fn test_cache_overwrite_keeps_occupancy() {
        let mut cache = new_cache(100);

        cache.set("key1".to_string(), "value1".to_string(), NO_TTL);
        cache.set("key1".to_string(), "value2".to_string(), NO_TTL);

        assert_eq!(cache.get("key1"), Some("value2".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_overwrite_replaces_expiry() {
        let mut cache = new_cache(100);

        cache.set(
            "key1".to_string(),
            "value1".to_string(),
            Duration::from_millis(50),
        );
        // Re-set with a longer TTL before the first one elapses
        cache.set(
            "key1".to_string(),
            "value2".to_string(),
            Duration::from_secs(60),
        );

        sleep(Duration::from_millis(80));
        assert_eq!(cache.get("key1"), Some("value2".to_string()));
    }

    #[test]
    fn test_cache_ttl_expiry_without_reaper() {
        let mut cache = new_cache(100);

        cache.set(
            "key1".to_string(),
            "value1".to_string(),
            Duration::from_millis(50),
        );
        assert_eq!(cache.get("key1"), Some("value1".to_string()));

        sleep(Duration::from_millis(80));

        // No reaper has run; the lazy path must still treat it as absent
        assert_eq!(cache.get("key1"), None);
        assert_eq!(cache.len(), 0, "expired entry is removed as a side effect");
    }

    #[test]
    fn test_cache_lru_eviction() {
        let mut cache = new_cache(2);

        cache.set("a".to_string(), "1".to_string(), NO_TTL);
        cache.set("b".to_string(), "2".to_string(), NO_TTL);
        cache.set("c".to_string(), "3".to_string(), NO_TTL);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a"), None);
        assert!(cache.get("b").is_some());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn test_cache_get_promotes_recency() {
        let mut cache = new_cache(2);

        cache.set("a".to_string(), "1".to_string(), NO_TTL);
        cache.set("b".to_string(), "2".to_string(), NO_TTL);

        // Touch a so that b becomes the eviction candidate
        assert!(cache.get("a").is_some());
        cache.set("c".to_string(), "3".to_string(), NO_TTL);

        assert!(cache.get("a").is_some());
        assert_eq!(cache.get("b"), None);
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn test_cache_purge_expired() {
        let mut cache = new_cache(100);

        cache.set(
            "short".to_string(),
            "v".to_string(),
            Duration::from_millis(50),
        );
        cache.set("long".to_string(), "v".to_string(), Duration::from_secs(60));

        sleep(Duration::from_millis(80));

        let removed = cache.purge_expired();
        assert_eq!(removed, 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("long").is_some());
    }

    #[test]
    fn test_cache_stats() {
        let mut cache = new_cache(1);

        cache.set("a".to_string(), "1".to_string(), NO_TTL);
        assert!(cache.get("a").is_some()); // hit
        assert!(cache.get("missing").is_none()); // miss
        cache.set("b".to_string(), "2".to_string(), NO_TTL); // evicts a

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.evictions, 1);
        assert_eq!(stats.total_entries, 1);
    }

    #[test]
    fn test_cache_event_hook() {
        let events: Arc<Mutex<Vec<CacheEvent>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let mut cache: ExpiringCache<String> = ExpiringCache::with_event_hook(
            1,
            Arc::new(move |event| sink.lock().unwrap().push(event.clone())),
        )
        .unwrap();

        cache.set("a".to_string(), "1".to_string(), NO_TTL);
        cache.set("b".to_string(), "2".to_string(), NO_TTL); // evicts a
        cache.set(
            "b".to_string(),
            "3".to_string(),
            Duration::from_millis(50),
        ); // replace, no event
        sleep(Duration::from_millis(80));
        assert_eq!(cache.get("b"), None); // expired

        let seen = events.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                CacheEvent::Inserted {
                    key: "a".to_string()
                },
                CacheEvent::Evicted {
                    key: "a".to_string()
                },
                CacheEvent::Inserted {
                    key: "b".to_string()
                },
                CacheEvent::Expired {
                    key: "b".to_string()
                },
            ]
        );
    }
}
