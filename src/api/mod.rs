//! API Module
//!
//! HTTP surface around the admission-control core.
//!
//! # Endpoints
//! - `GET /` - demo route, admission-gated per caller
//! - `GET /limiter/stats` - limiter registry counters
//! - `GET /health` - health check endpoint

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use handlers::AppState;
pub use middleware::admission_layer;
pub use routes::create_router;
