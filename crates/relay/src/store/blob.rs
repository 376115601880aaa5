//! [`BlobStore`]: the share directory.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use common::RelayError;
use thiserror::Error;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::{generate_id, is_valid_id, MAX_ID_ATTEMPTS};

/// Errors produced by the storage layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The identifier contains characters the relay never hands out.
    #[error("invalid share identifier")]
    InvalidId,

    /// Nothing is stored under the identifier.
    #[error("share not found")]
    NotFound,

    /// Every attempted identifier was already taken.
    #[error("no free identifier after {MAX_ID_ATTEMPTS} attempts")]
    IdSpaceExhausted,

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StoreError> for RelayError {
    fn from(e: StoreError) -> Self {
        match e {
            // Identifiers outside the alphabet are never issued, so they are simply absent.
            StoreError::InvalidId | StoreError::NotFound => RelayError::NotFound,
            StoreError::IdSpaceExhausted | StoreError::Io(_) => RelayError::Internal(e.to_string()),
        }
    }
}

/// Handle to the share directory. Cheap to clone.
#[derive(Clone, Debug)]
pub struct BlobStore {
    root: Arc<PathBuf>,
    id_length: usize,
}

impl BlobStore {
    /// Open (creating if needed) the share directory at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory cannot be created.
    pub async fn open(root: impl Into<PathBuf>, id_length: usize) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        Ok(Self {
            root: Arc::new(root),
            id_length,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Store `frame` under a fresh identifier and return it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::IdSpaceExhausted`] after [`MAX_ID_ATTEMPTS`]
    /// collisions, or [`StoreError::Io`] on a filesystem failure.
    pub async fn put(&self, frame: &[u8]) -> Result<String, StoreError> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = generate_id(self.id_length);
            let part = self.root.join(format!(".{id}.part"));

            // A part file that already exists belongs to a concurrent upload.
            let mut file = match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&part)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    debug!(id = %id, "part file collision, retrying");
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            let written = write_synced(&mut file, frame).await;
            drop(file);
            if let Err(e) = written {
                let _ = fs::remove_file(&part).await;
                return Err(e.into());
            }

            let published = fs::hard_link(&part, self.root.join(&id)).await;
            let _ = fs::remove_file(&part).await;
            match published {
                Ok(()) => return Ok(id),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    debug!(id = %id, "identifier collision, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(StoreError::IdSpaceExhausted)
    }

    /// Open the frame stored under `id`, returning the file and its length.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidId`] for identifiers outside the
    /// alphanumeric alphabet and [`StoreError::NotFound`] for unknown ones.
    pub async fn open_blob(&self, id: &str) -> Result<(File, u64), StoreError> {
        if !is_valid_id(id) {
            return Err(StoreError::InvalidId);
        }
        let file = match File::open(self.root.join(id)).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(StoreError::NotFound),
            Err(e) => return Err(e.into()),
        };
        let len = file.metadata().await?.len();
        Ok((file, len))
    }

    /// Number of published frames. Part files are not counted.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory cannot be read.
    pub async fn count(&self) -> Result<usize, StoreError> {
        let mut entries = fs::read_dir(self.root.as_path()).await?;
        let mut count = 0;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_name().to_str().is_some_and(is_valid_id) {
                count += 1;
            }
        }
        Ok(count)
    }
}

async fn write_synced(file: &mut File, bytes: &[u8]) -> std::io::Result<()> {
    file.write_all(bytes).await?;
    file.sync_all().await
}
