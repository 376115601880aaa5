//! Shared application state injected into every Axum handler.

use crate::store::BlobStore;

/// Application state shared across all request handlers.
///
/// Cloned per request; [`BlobStore`] is `Arc`-backed.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Share directory holding one file per frame.
    pub store: BlobStore,
    /// Largest accepted upload body, reported back in 413 responses.
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(store: BlobStore, max_upload_bytes: usize) -> Self {
        Self {
            store,
            max_upload_bytes,
        }
    }
}
