//! Sequential send and receive pipelines.
//!
//! ```text
//! send:    Idle → Preparing → Encrypting → Transferring → Done | Failed
//! receive: Idle → Preparing → Transferring → Decrypting → Done | Failed
//! ```
//!
//! Each run owns its key and frame. Dropping an in-flight future drops (and
//! zeroes) the key; a retried send starts over with a new key and nonce.

use tracing::{debug, info, warn};

use crate::crypto::{self, SymmetricKey};
use crate::error::ShareError;
use crate::link::{self, ShareLink};
use crate::transfer::TransferClient;

/// Where a pipeline currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Preparing,
    Encrypting,
    Decrypting,
    Transferring,
    Done,
    Failed,
}

/// Drives one share operation at a time against a [`TransferClient`].
pub struct SharePipeline<T> {
    transfer: T,
    origin: String,
    stage: Stage,
}

impl<T: TransferClient> SharePipeline<T> {
    /// `origin` is the public relay address placed in generated links.
    pub fn new(transfer: T, origin: impl Into<String>) -> Self {
        Self {
            transfer,
            origin: origin.into(),
            stage: Stage::Idle,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Encrypt `plaintext` under a fresh key, upload it, and return the link.
    ///
    /// # Errors
    ///
    /// Propagates the first failing step's [`ShareError`]; the pipeline ends in
    /// [`Stage::Failed`].
    pub async fn send(&mut self, plaintext: &[u8]) -> Result<ShareLink, ShareError> {
        let result = self.run_send(plaintext).await;
        self.finish(result)
    }

    /// Download the frame named by `link` and decrypt it with the link's key.
    ///
    /// The key is decoded before any network traffic, so a malformed key
    /// never costs a download.
    ///
    /// # Errors
    ///
    /// Propagates the first failing step's [`ShareError`]; the pipeline ends in
    /// [`Stage::Failed`].
    pub async fn receive(&mut self, link: &ShareLink) -> Result<Vec<u8>, ShareError> {
        let result = self.run_receive(link).await;
        self.finish(result)
    }

    async fn run_send(&mut self, plaintext: &[u8]) -> Result<ShareLink, ShareError> {
        self.enter(Stage::Preparing);
        // An origin no link can carry must fail before anything is uploaded.
        let origin = link::canonical_origin(&self.origin)?;
        let key = SymmetricKey::generate()?;

        self.enter(Stage::Encrypting);
        let frame = crypto::encrypt(plaintext, &key)?;
        debug!(plaintext_bytes = plaintext.len(), frame_bytes = frame.len(), "sealed");

        self.enter(Stage::Transferring);
        let id = self.transfer.upload(frame).await?;
        info!(id = %id, "share uploaded");

        ShareLink::new(&origin, id, &key)
    }

    async fn run_receive(&mut self, link: &ShareLink) -> Result<Vec<u8>, ShareError> {
        self.enter(Stage::Preparing);
        let key = link.key()?;

        self.enter(Stage::Transferring);
        let frame = self.transfer.download(link.id()).await?;
        debug!(id = %link.id(), frame_bytes = frame.len(), "downloaded");

        self.enter(Stage::Decrypting);
        crypto::decrypt(&frame, &key)
    }

    fn enter(&mut self, stage: Stage) {
        debug!(from = ?self.stage, to = ?stage, "pipeline stage");
        self.stage = stage;
    }

    fn finish<V>(&mut self, result: Result<V, ShareError>) -> Result<V, ShareError> {
        match &result {
            Ok(_) => self.enter(Stage::Done),
            Err(e) => {
                warn!(error = %e, stage = ?self.stage, "share operation failed");
                self.enter(Stage::Failed);
            }
        }
        result
    }
}
