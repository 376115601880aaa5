//! Error taxonomy for the share protocol.

use common::protocol::MIN_FRAME_LEN;
use thiserror::Error;

use crate::crypto::{ENCODED_KEY_LEN, KEY_LEN};

/// Every failure a share operation can surface.
///
/// None of these are retried inside the crate. [`ShareError::is_retryable`]
/// tells a caller which ones a retry could plausibly fix.
#[derive(Debug, Error)]
pub enum ShareError {
    /// The transport string does not decode to exactly [`KEY_LEN`] bytes.
    #[error("malformed key: expected {ENCODED_KEY_LEN} base64url characters encoding {KEY_LEN} bytes")]
    MalformedKey,

    /// The frame is shorter than a nonce plus a tag.
    #[error("malformed frame: {len} bytes is below the {MIN_FRAME_LEN}-byte minimum")]
    MalformedFrame { len: usize },

    /// Tag verification failed. Wrong key and tampered data are deliberately
    /// indistinguishable.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The locator or command string is missing its identifier, key, or origin.
    #[error("invalid link: {0}")]
    InvalidLink(&'static str),

    /// The relay holds no blob for the identifier.
    #[error("share not found")]
    NotFound,

    /// The relay answered with a status other than success or not-found.
    #[error("relay returned HTTP {status}")]
    TransportError { status: u16 },

    /// The exchange with the relay broke off: no response arrived, it timed
    /// out, or the body was cut short.
    #[error("relay unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),

    /// The local HTTP client could not be constructed. Not a relay problem.
    #[error("failed to initialise HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// The OS could not supply secure randomness. Fatal.
    #[error("secure randomness unavailable")]
    RandomnessUnavailable,

    /// The plaintext exceeds what a single AES-GCM invocation can seal.
    #[error("payload of {len} bytes is too large to encrypt")]
    PayloadTooLarge { len: usize },

    /// Reading the input file or writing the output file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ShareError {
    /// Whether re-running the whole operation could succeed.
    ///
    /// Only connection failures and relay-side 5xx answers qualify. A retried
    /// send must run the full pipeline again with a fresh key and nonce.
    pub fn is_retryable(&self) -> bool {
        match self {
            ShareError::Unreachable(_) => true,
            ShareError::TransportError { status } => (500..600).contains(status),
            _ => false,
        }
    }

    /// Message for the presenting layer. Never exposes cryptographic detail.
    pub fn user_message(&self) -> String {
        match self {
            ShareError::AuthenticationFailed | ShareError::MalformedFrame { .. } => {
                "Decryption failed: the key is incorrect or the data is corrupted.".into()
            }
            ShareError::MalformedKey => "The decryption key in the link is not valid.".into(),
            ShareError::InvalidLink(_) => "Invalid share link.".into(),
            ShareError::NotFound => "Share not found.".into(),
            ShareError::TransportError { status } => {
                format!("The server returned an error (HTTP {status}).")
            }
            ShareError::Unreachable(_) => "Could not reach the server.".into(),
            ShareError::HttpClient(_) => "Could not set up the HTTP client.".into(),
            ShareError::RandomnessUnavailable => {
                "No secure random source is available on this system.".into()
            }
            ShareError::PayloadTooLarge { .. } => "The file is too large to share.".into(),
            ShareError::Io(e) => format!("File error: {e}"),
        }
    }
}
