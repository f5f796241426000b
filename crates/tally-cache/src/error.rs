//! Error types for the persistent snapshot store.
//!
//! Store failures are always recoverable for the request that hit them: a
//! failed read is treated as a cache miss and a failed write is logged and
//! ignored. Nothing in this module is ever fatal for an invocation.

use thiserror::Error;

/// Errors that can occur while reading or writing the persistent store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to reach the store.
    #[error("connection error: {message}")]
    Connection {
        /// Description of the connection failure.
        message: String,
    },

    /// A cached entry could not be serialized or deserialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The store answered but the operation failed.
    #[error("store backend error: {message}")]
    Backend {
        /// Description of the backend failure.
        message: String,
    },
}

impl StoreError {
    /// Creates a new `Connection` error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a new `Backend` error.
    #[must_use]
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}
