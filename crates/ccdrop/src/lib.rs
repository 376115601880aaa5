//! `ccdrop`: share a file through an untrusted relay without the relay ever
//! holding the key.
//!
//! The sender seals the file with a fresh AES-256-GCM key, uploads only the
//! ciphertext frame, and hands out a link whose fragment carries the key.
//! The receiver decodes the link, downloads the frame by identifier and opens
//! it locally.

pub mod config;
pub mod crypto;
pub mod error;
pub mod link;
pub mod ops;
pub mod pipeline;
pub mod telemetry;
pub mod transfer;

pub use crypto::{CiphertextFrame, SymmetricKey};
pub use error::ShareError;
pub use link::ShareLink;
pub use pipeline::{SharePipeline, Stage};
pub use transfer::{HttpTransfer, ShareId, TransferClient};
