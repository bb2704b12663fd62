//! Response models for the admission-gated demo API
//!
//! Defines the DTOs (Data Transfer Objects) serialized into HTTP response
//! bodies. The API takes no request bodies.

pub mod responses;

// Re-export commonly used types
pub use responses::{ErrorResponse, HealthResponse, StatsResponse};
