//! Error handling for the LVQ learner

use thiserror::Error;

/// Result type alias for LVQ operations
pub type Result<T> = std::result::Result<T, LvqError>;

/// Comprehensive error type for LVQ operations
#[derive(Error, Debug)]
pub enum LvqError {
    /// Parameter out of its valid range
    #[error("Domain error in {operation}: {details}")]
    Domain { operation: String, details: String },

    /// Vectors of incompatible dimensions
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Missing network, layer or attribute
    #[error("Not initialized: {details}")]
    NotInitialized { details: String },

    /// Training algorithm not recognized or not implemented
    #[error("Unknown LVQ algorithm: {details}")]
    UnknownAlgorithm { details: String },

    /// Training budget or capacity exceeded
    #[error("Exhausted: {details}")]
    Exhausted { details: String },

    /// Error raised by the numeric substrate
    #[error("Statistics error: {0}")]
    Stats(#[from] signal_core::SignalError),
}

impl LvqError {
    /// Convenience constructor for domain errors
    pub fn domain(operation: impl Into<String>, details: impl Into<String>) -> Self {
        LvqError::Domain {
            operation: operation.into(),
            details: details.into(),
        }
    }
}
