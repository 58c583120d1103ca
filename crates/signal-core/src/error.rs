//! Error handling for the signal pipeline
//!
//! This module defines the error types shared by every stage of the
//! pipeline, from file decoding through the FFT engine to the MFCC
//! extraction, providing detailed information for debugging.

use thiserror::Error;

/// Result type alias for signal pipeline operations
pub type Result<T> = std::result::Result<T, SignalError>;

/// Comprehensive error type for signal pipeline operations
#[derive(Error, Debug)]
pub enum SignalError {
    /// Parameter out of its valid range
    #[error("Domain error in {operation}: {details}")]
    Domain { operation: String, details: String },

    /// Lists or vectors of incompatible lengths
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// File format not supported by the decoders
    #[error("Unsupported format: {details}")]
    UnsupportedFormat { details: String },

    /// I/O operation failed
    #[error("I/O operation failed: {reason}")]
    Io { reason: String },

    /// Missing resource or uninitialized state
    #[error("Not initialized: {details}")]
    NotInitialized { details: String },

    /// Wrong argument count for a complex catalogue function
    #[error("{function}: expected {expected} input(s), got {actual}")]
    Arity {
        function: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Wrong real/complex mode for a complex catalogue function
    #[error("{function}: not defined for {mode} mode")]
    Mode {
        function: &'static str,
        mode: &'static str,
    },

    /// Allocation or capacity failure
    #[error("Exhausted: {details}")]
    Exhausted { details: String },
}

impl SignalError {
    /// Convenience constructor for domain errors
    pub fn domain(operation: impl Into<String>, details: impl Into<String>) -> Self {
        SignalError::Domain {
            operation: operation.into(),
            details: details.into(),
        }
    }
}

impl From<std::io::Error> for SignalError {
    fn from(err: std::io::Error) -> Self {
        SignalError::Io {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SignalError::domain("resize_list", "negative size");
        assert_eq!(err.to_string(), "Domain error in resize_list: negative size");

        let err = SignalError::Arity {
            function: "cpx_mod",
            expected: 1,
            actual: 3,
        };
        assert_eq!(err.to_string(), "cpx_mod: expected 1 input(s), got 3");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: SignalError = io.into();
        assert!(err.to_string().contains("no such file"));
    }
}
