//! Error types for the BlackRoad API client.
//!
//! # Design
//! Three kinds cover every operation uniformly: the request body could not
//! be encoded, the round-trip itself failed, or the response body did not
//! have the expected shape. The client never inspects status codes on the
//! way in, so `Decode` carries the status for the caller to look at.

use thiserror::Error;

/// Errors returned by `BlackRoadClient` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// Connection, TLS, timeout or body-read failure. Nothing is retried.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The response body could not be deserialized into the expected type.
    #[error("decoding HTTP {status} response failed: {message}")]
    Decode { status: u16, message: String },
}

impl From<ureq::Error> for ApiError {
    fn from(err: ureq::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

impl ApiError {
    /// HTTP status of the response that failed to decode, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Decode { status, .. } => Some(*status),
            _ => None,
        }
    }
}
