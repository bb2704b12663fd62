//! API Routes
//!
//! Configures the Axum router: the admission-gated demo route plus the
//! ungated health and stats endpoints.

use axum::{middleware, routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{health_handler, index_handler, stats_handler, AppState};
use super::middleware::admission_layer;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /` - demo route, admission-gated per caller
/// - `GET /limiter/stats` - limiter registry counters
/// - `GET /health` - health check endpoint
///
/// Only `/` passes through the admission middleware; health and stats stay
/// reachable for throttled callers.
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let gated = Router::new()
        .route("/", get(index_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admission_layer,
        ));

    Router::new()
        .merge(gated)
        .route("/limiter/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
