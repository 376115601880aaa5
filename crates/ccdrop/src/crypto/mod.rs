//! AES-256-GCM share encryption and key transport encoding.
//!
//! This module is free of HTTP dependencies. It provides key generation and
//! the frame codec used by the share pipeline.
//!
//! # Frame format
//!
//! ```text
//! nonce (12 bytes) || ciphertext (plaintext length) || tag (16 bytes)
//! ```
//!
//! The associated data is always empty. Every call to [`cipher::encrypt`]
//! draws its own nonce from the OS CSPRNG; callers cannot supply one.

pub mod cipher;
pub mod key;

pub use cipher::{decrypt, encrypt, CiphertextFrame};
pub use key::SymmetricKey;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Length of the unpadded base64url transport encoding of a key.
pub const ENCODED_KEY_LEN: usize = 43;
