//! The boundary to the relay.
//!
//! [`TransferClient`] is the only component that talks to the network. It is
//! addressed by [`ShareId`] alone, never by a [`ShareLink`](crate::ShareLink),
//! so the key-bearing fragment has no path into a request.

pub mod http;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;

use crate::crypto::CiphertextFrame;
use crate::error::ShareError;

pub use http::HttpTransfer;

/// Relay-assigned identifier for a stored frame. Opaque to the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShareId(String);

impl ShareId {
    /// Wrap a relay-assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ShareError::InvalidLink`] if `id` is empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ShareError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ShareError::InvalidLink("empty share identifier"));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShareId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ShareId {
    type Err = ShareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Upload and download of opaque frames.
///
/// Implementations must not retry on their own; see
/// [`ShareError::is_retryable`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransferClient: Send + Sync {
    /// Store `frame` on the relay and return the identifier it assigned.
    ///
    /// Takes the frame by value so that exactly the bytes `encrypt` produced
    /// are sent.
    async fn upload(&self, frame: CiphertextFrame) -> Result<ShareId, ShareError>;

    /// Fetch the frame stored under `id`.
    ///
    /// A missing identifier is [`ShareError::NotFound`], distinct from
    /// [`ShareError::TransportError`].
    async fn download(&self, id: &ShareId) -> Result<Vec<u8>, ShareError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_id_rejected() {
        assert!(matches!(ShareId::new(""), Err(ShareError::InvalidLink(_))));
    }

    #[test]
    fn id_is_opaque() {
        let id: ShareId = "aB3-x".parse().unwrap();
        assert_eq!(id.as_str(), "aB3-x");
        assert_eq!(id.to_string(), "aB3-x");
    }
}
