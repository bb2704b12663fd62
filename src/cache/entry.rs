//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL expiry.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::cache::DEFAULT_TTL;

// == Expiring Entry ==
/// A single cache slot: a value plus its creation and expiry timestamps.
///
/// Every entry carries an expiry time. A zero TTL at creation is substituted
/// with [`DEFAULT_TTL`] so the expiry logic stays uniform.
#[derive(Debug, Clone)]
pub struct ExpiringEntry<V> {
    /// The stored value
    pub value: V,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Expiry timestamp (Unix milliseconds)
    pub expires_at: u64,
}

impl<V> ExpiringEntry<V> {
    // == Constructor ==
    /// Creates a new entry expiring `ttl` from now.
    ///
    /// A zero `ttl` means "effectively does not expire" and is replaced with
    /// [`DEFAULT_TTL`].
    pub fn new(value: V, ttl: Duration) -> Self {
        let ttl = if ttl.is_zero() { DEFAULT_TTL } else { ttl };
        let now = current_timestamp_ms();
        Self {
            value,
            created_at: now,
            expires_at: now.saturating_add(ttl.as_millis() as u64),
        }
    }

    // == Is Expired ==
    /// Checks whether the entry's lifetime has elapsed.
    ///
    /// Boundary condition: the entry counts as expired once the current time
    /// is greater than or equal to `expires_at`, so a TTL that has fully
    /// elapsed makes the entry absent immediately.
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
