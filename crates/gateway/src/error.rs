//! Gateway error types.

use std::path::PathBuf;

use thiserror::Error;

/// Failure of a backend request.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The HTTP client could not be constructed.
    #[error("failed to create HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    /// The request never produced a response (connect, timeout, DNS).
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        /// Endpoint label for the failing operation
        endpoint: &'static str,
        /// Underlying transport error
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a non-success status. The message is the
    /// backend's own error text, surfaced verbatim when present.
    #[error("{message}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Backend error message, or the raw body when none was given
        message: String,
    },

    /// The response body did not decode as the expected shape.
    #[error("failed to decode {endpoint} response: {source}")]
    Decode {
        /// Endpoint label for the failing operation
        endpoint: &'static str,
        /// Underlying decode error
        #[source]
        source: reqwest::Error,
    },

    /// The response decoded but carried a value outside the contract.
    #[error("unexpected {endpoint} payload: {message}")]
    Payload {
        /// Endpoint label for the failing operation
        endpoint: &'static str,
        /// What was wrong with the payload
        message: String,
    },

    /// A model artifact could not be read from disk before upload.
    #[error("failed to read model artifact {path}: {source}")]
    Artifact {
        /// Path that failed to read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl GatewayError {
    /// HTTP status of a backend rejection, if this error is one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}
