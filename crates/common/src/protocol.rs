//! The relay's HTTP contract.
//!
//! The relay only ever sees opaque ciphertext frames and the identifiers it
//! hands out. Frame layout constants live here so that both the client codec
//! and the relay's sanity check agree on the minimum frame size.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Routes
// ---------------------------------------------------------------------------

/// `POST` route accepting a raw frame body; responds with the identifier as plain text.
pub const UPLOAD_ROUTE: &str = "/share";

/// Path segment preceding the identifier on the download route (`GET /get/{id}`).
pub const DOWNLOAD_PREFIX: &str = "get";

/// `GET` route reporting relay liveness.
pub const HEALTH_ROUTE: &str = "/health";

// ---------------------------------------------------------------------------
// Frame layout
// ---------------------------------------------------------------------------

/// Byte length of the random nonce that prefixes every frame.
pub const NONCE_LEN: usize = 12;

/// Byte length of the AEAD authentication tag that ends every frame.
pub const TAG_LEN: usize = 16;

/// Smallest well-formed frame: a nonce and a tag around an empty ciphertext.
pub const MIN_FRAME_LEN: usize = NONCE_LEN + TAG_LEN;

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"not_found"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall relay status: `"ok"` or `"degraded"`.
    pub status: String,
    /// Number of blobs currently held in the share directory.
    pub blobs_stored: usize,
}
