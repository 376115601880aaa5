//! [`HttpTransfer`]: the relay client over HTTP(S).

use std::time::Duration;

use async_trait::async_trait;
use common::protocol::{DOWNLOAD_PREFIX, UPLOAD_ROUTE};
use reqwest::{Client, StatusCode};
use tracing::debug;
use url::Url;

use super::{ShareId, TransferClient};
use crate::crypto::CiphertextFrame;
use crate::error::ShareError;

/// Relay client bound to one server origin.
#[derive(Debug, Clone)]
pub struct HttpTransfer {
    origin: Url,
    client: Client,
}

impl HttpTransfer {
    /// Build a client for the relay at `origin`.
    ///
    /// Any path, query, or fragment on `origin` is discarded.
    ///
    /// # Errors
    ///
    /// Returns [`ShareError::InvalidLink`] if `origin` is not an http(s) URL,
    /// or [`ShareError::HttpClient`] if the HTTP client cannot be built.
    pub fn new(origin: &str, timeout: Option<Duration>) -> Result<Self, ShareError> {
        let mut origin =
            Url::parse(origin).map_err(|_| ShareError::InvalidLink("invalid server URL"))?;
        if !matches!(origin.scheme(), "http" | "https") {
            return Err(ShareError::InvalidLink("server URL must be http or https"));
        }
        origin.set_path("");
        origin.set_query(None);
        origin.set_fragment(None);

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ShareError::HttpClient)?;

        Ok(Self { origin, client })
    }

    /// The relay origin requests are sent to.
    pub fn origin(&self) -> &Url {
        &self.origin
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ShareError> {
        let mut url = self.origin.clone();
        url.path_segments_mut()
            .map_err(|_| ShareError::InvalidLink("server URL cannot be a base"))?
            .clear()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl TransferClient for HttpTransfer {
    async fn upload(&self, frame: CiphertextFrame) -> Result<ShareId, ShareError> {
        let url = self.endpoint(&[UPLOAD_ROUTE.trim_start_matches('/')])?;
        debug!(url = %url, bytes = frame.len(), "uploading frame");

        let response = self.client.post(url).body(frame.into_bytes()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ShareError::TransportError {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        // A success without an identifier is a relay contract violation.
        ShareId::new(body.trim()).map_err(|_| ShareError::TransportError {
            status: status.as_u16(),
        })
    }

    async fn download(&self, id: &ShareId) -> Result<Vec<u8>, ShareError> {
        let url = self.endpoint(&[DOWNLOAD_PREFIX, id.as_str()])?;
        debug!(url = %url, "downloading frame");

        let response = self.client.get(url).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(ShareError::NotFound),
            status if status.is_success() => Ok(response.bytes().await?.to_vec()),
            status => Err(ShareError::TransportError {
                status: status.as_u16(),
            }),
        }
    }
}
