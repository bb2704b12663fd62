//! Ratekeeper - per-caller admission control
//!
//! Bounds resource usage per caller identity by holding one token bucket per
//! caller inside an expiring, capacity-bounded LRU cache. Idle callers'
//! limiters are reclaimed by TTL; cardinality explosions are absorbed by
//! LRU eviction.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod limit;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::ExpiringCache;
pub use config::Config;
pub use error::AdmissionError;
pub use limit::{KeyedLimiter, TokenBucket};
pub use tasks::spawn_reaper_task;
