//! Cache Module
//!
//! Provides a bounded in-memory key-value store with TTL expiry and LRU
//! eviction. Values are generic; the limiter registry stores token buckets
//! in it, but any clonable type works.

mod entry;
mod lru;
mod stats;
mod store;


use std::sync::Arc;
use std::time::Duration;

// Re-export public types
pub use entry::ExpiringEntry;
pub use lru::LruTracker;
pub use stats::CacheStats;
pub use store::ExpiringCache;

// == Public Constants ==
/// Lifetime substituted when an entry is stored with a zero TTL.
///
/// Deliberately a fixed large duration rather than true infinity, so every
/// entry carries an expiry and the reaper logic stays uniform.
pub const DEFAULT_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

// == Cache Events ==
/// Structural changes a cache reports to its event hook.
///
/// Subscribing is optional; without a hook, insertions and removals are
/// silent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEvent {
    /// A new key was inserted
    Inserted { key: String },
    /// An entry was evicted to make room under the capacity bound
    Evicted { key: String },
    /// An entry was removed because its TTL elapsed
    Expired { key: String },
}

/// Callback invoked for every [`CacheEvent`] on the cache that owns it.
pub type EventHook = Arc<dyn Fn(&CacheEvent) + Send + Sync>;
