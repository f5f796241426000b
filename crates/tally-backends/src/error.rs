//! Error types for backend fetches.
//!
//! Backend failures are fatal for the invocation that hit them: a failed
//! page aborts the whole fetch, and partial results are never aggregated.

use thiserror::Error;

/// Errors that can occur while querying the user directory or event log.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The request never completed (connect, timeout, TLS, ...).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("{service} returned status {status}")]
    Status {
        /// Which backend call failed.
        service: &'static str,
        /// The HTTP status code received.
        status: u16,
    },

    /// The page body could not be decoded.
    #[error("failed to decode {service} page: {message}")]
    Decode {
        /// Which backend call failed.
        service: &'static str,
        /// Description of the decode failure.
        message: String,
    },

    /// A backend endpoint URL is malformed.
    #[error("invalid backend URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl BackendError {
    /// Creates a new `Status` error.
    #[must_use]
    pub fn status(service: &'static str, status: u16) -> Self {
        Self::Status { service, status }
    }

    /// Creates a new `Decode` error.
    #[must_use]
    pub fn decode(service: &'static str, message: impl Into<String>) -> Self {
        Self::Decode {
            service,
            message: message.into(),
        }
    }
}
