//! Error types for the admission-control core
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Admission Error Enum ==
/// Unified error type for the admission-control core.
///
/// Runtime outcomes (cache miss, expired entry, rejected request) are
/// ordinary return values, never errors. The only failures are invalid
/// construction parameters, which are rejected eagerly.
#[derive(Error, Debug)]
pub enum AdmissionError {
    /// A construction parameter is outside its valid range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

// == Result Type Alias ==
/// Convenience Result type for the admission-control core.
pub type Result<T> = std::result::Result<T, AdmissionError>;
