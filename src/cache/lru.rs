//! LRU Tracker Module
//!
//! Implements Least Recently Used tracking for cache eviction.

use std::collections::{BTreeMap, HashMap};

// == LRU Tracker ==
/// Tracks access order for LRU eviction.
///
/// Each touch stamps the key with a fresh sequence number; the order index
/// maps sequence numbers to keys, so the smallest stamp is always the least
/// recently used key and touch/evict stay O(log n).
#[derive(Debug, Default)]
pub struct LruTracker {
    /// Monotonic stamp source, incremented on every touch
    next_seq: u64,
    /// Stamp -> key, ordered oldest-first
    by_order: BTreeMap<u64, String>,
    /// Key -> its current stamp
    by_key: HashMap<String, u64>,
}

impl LruTracker {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks a key as most recently used.
    ///
    /// A known key is re-stamped; a new key is added with a fresh stamp.
    pub fn touch(&mut self, key: &str) {
        if let Some(old_seq) = self.by_key.get(key) {
            self.by_order.remove(old_seq);
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.by_order.insert(seq, key.to_string());
        self.by_key.insert(key.to_string(), seq);
    }

    // == Remove ==
    /// Removes a key from the tracker.
    pub fn remove(&mut self, key: &str) {
        if let Some(seq) = self.by_key.remove(key) {
            self.by_order.remove(&seq);
        }
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently used key.
    ///
    /// Returns None if the tracker is empty.
    pub fn evict_oldest(&mut self) -> Option<String> {
        let (_, key) = self.by_order.pop_first()?;
        self.by_key.remove(&key);
        Some(key)
    }

    // == Peek Oldest ==
    /// Returns the least recently used key without removing it.
    #[allow(dead_code)]
    pub fn peek_oldest(&self) -> Option<&String> {
        self.by_order.values().next()
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    // == Is Empty ==
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    // == Contains ==
    /// Checks if a key is being tracked.
    #[allow(dead_code)]
    pub fn contains(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }
}
