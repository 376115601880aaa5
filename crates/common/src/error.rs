//! Relay-side error type.

use thiserror::Error;

/// Errors surfaced by the relay's HTTP handlers.
///
/// Variants map to HTTP status codes returned to callers:
/// - [`RelayError::BadRequest`] → 400
/// - [`RelayError::NotFound`] → 404
/// - [`RelayError::PayloadTooLarge`] → 413
/// - [`RelayError::Internal`] → 500
#[derive(Debug, Error)]
pub enum RelayError {
    /// The request was malformed, e.g. a body too short to be a frame.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// No blob is stored under the requested identifier.
    #[error("share not found")]
    NotFound,

    /// The upload exceeds the configured body limit.
    #[error("payload too large: limit is {limit} bytes")]
    PayloadTooLarge { limit: usize },

    /// An unexpected internal error occurred (storage failure, id space exhausted).
    #[error("internal error: {0}")]
    Internal(String),
}

impl RelayError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            RelayError::BadRequest(_) => 400,
            RelayError::NotFound => 404,
            RelayError::PayloadTooLarge { .. } => 413,
            RelayError::Internal(_) => 500,
        }
    }

    /// Short machine-readable code used in JSON error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            RelayError::BadRequest(_) => "bad_request",
            RelayError::NotFound => "not_found",
            RelayError::PayloadTooLarge { .. } => "payload_too_large",
            RelayError::Internal(_) => "internal_error",
        }
    }
}
