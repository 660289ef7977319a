//! Unified error handling for the bridge
//!
//! Every boundary operation returns [`BridgeResult`]. Validation and lookup
//! failures are detected on the calling thread before any native call is made;
//! failures reported by the wrapped engine are carried verbatim in
//! [`BridgeError::NativeExecution`] and are never silently swallowed.

use thiserror::Error;

/// Main error type for bridge operations
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Malformed or missing boundary inputs, detected before any native call
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A handle ID does not resolve in a registry
    #[error("Not found: {0}")]
    NotFound(String),

    /// The wrapped engine reported a failure status
    #[error("Native engine error: {0}")]
    NativeExecution(String),

    /// Configuration parsing or validation errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O related errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invariant violations inside the bridge itself
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for Results using BridgeError
pub type BridgeResult<T> = std::result::Result<T, BridgeError>;

impl BridgeError {
    /// Create an invalid argument error
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        BridgeError::InvalidArgument(msg.into())
    }

    /// Create a not-found error
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        BridgeError::NotFound(msg.into())
    }

    /// Create a native execution error
    pub fn native<S: Into<String>>(msg: S) -> Self {
        BridgeError::NativeExecution(msg.into())
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        BridgeError::Config(msg.into())
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        BridgeError::Internal(msg.into())
    }
}
