//! Response DTOs for the admission-gated demo API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

/// Response body for the limiter stats endpoint (GET /limiter/stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of callers currently tracked
    pub tracked_callers: usize,
    /// Bucket-cache hits (requests that reused an existing limiter)
    pub hits: u64,
    /// Bucket-cache misses (requests that created a fresh limiter)
    pub misses: u64,
    /// Limiters evicted to keep the tracked-caller bound
    pub evictions: u64,
    /// Limiters reclaimed after their idle TTL elapsed
    pub expirations: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from the limiter's cache statistics
    pub fn new(tracked_callers: usize, stats: &crate::cache::CacheStats) -> Self {
        Self {
            tracked_callers,
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expirations: stats.expirations,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body, including the 429 admission-denied body
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
