//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of distinct callers tracked at once
    pub max_tracked_callers: usize,
    /// Tokens granted per second to each caller's bucket
    pub limiter_rate: u64,
    /// Maximum burst each caller's bucket can hold
    pub limiter_burst: u64,
    /// Seconds an idle caller's bucket is retained
    pub limiter_idle_ttl: u64,
    /// Background reaper interval in seconds
    pub reaper_interval: u64,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_TRACKED_CALLERS` - Maximum tracked callers (default: 1024)
    /// - `LIMITER_RATE` - Tokens per second per caller (default: 1)
    /// - `LIMITER_BURST` - Maximum burst per caller (default: 10)
    /// - `LIMITER_IDLE_TTL` - Idle retention in seconds (default: 5)
    /// - `REAPER_INTERVAL` - Sweep frequency in seconds (default: 1)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        Self {
            max_tracked_callers: env::var("MAX_TRACKED_CALLERS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1024),
            limiter_rate: env::var("LIMITER_RATE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1),
            limiter_burst: env::var("LIMITER_BURST")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            limiter_idle_ttl: env::var("LIMITER_IDLE_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            reaper_interval: env::var("REAPER_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_tracked_callers: 1024,
            limiter_rate: 1,
            limiter_burst: 10,
            limiter_idle_ttl: 5,
            reaper_interval: 1,
            server_port: 3000,
        }
    }
}
