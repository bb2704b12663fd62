//! API Handlers
//!
//! HTTP request handlers for the demo endpoints, plus the shared state the
//! admission middleware consults.

use axum::{extract::State, Json};

use crate::config::Config;
use crate::error::Result;
use crate::limit::KeyedLimiter;
use crate::models::{HealthResponse, StatsResponse};

/// Application state shared across handlers and the admission middleware.
#[derive(Clone)]
pub struct AppState {
    /// Per-caller admission control
    pub limiter: KeyedLimiter,
}

impl AppState {
    /// Creates a new AppState around an existing limiter.
    pub fn new(limiter: KeyedLimiter) -> Self {
        Self { limiter }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Fails if the configured limits are out of range.
    pub fn from_config(config: &Config) -> Result<Self> {
        let limiter = KeyedLimiter::new(
            config.max_tracked_callers,
            config.limiter_rate,
            config.limiter_burst,
            std::time::Duration::from_secs(config.limiter_idle_ttl),
        )?;
        Ok(Self::new(limiter))
    }
}

/// Handler for GET /
///
/// The admission-gated demo route; reaching it at all means the caller's
/// bucket admitted the request.
pub async fn index_handler() -> &'static str {
    "hello world"
}

/// Handler for GET /limiter/stats
///
/// Returns the limiter registry's activity counters.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let tracked = state.limiter.tracked().await;
    let stats = state.limiter.stats().await;

    Json(StatsResponse::new(tracked, &stats))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
