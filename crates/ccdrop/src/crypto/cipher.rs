//! AES-256-GCM sealing and opening of whole-file frames.
//!
//! **Nonces are never caller-supplied.** GCM nonce reuse under one key is
//! catastrophic: it breaks both confidentiality and authentication. Every
//! [`encrypt`] call draws 96 fresh bits from the OS CSPRNG.

use aes_gcm::{
    aead::{rand_core::RngCore, Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use common::protocol::{MIN_FRAME_LEN, NONCE_LEN};

use super::SymmetricKey;
use crate::error::ShareError;

/// A sealed share: `nonce || ciphertext || tag`.
///
/// Only [`encrypt`] constructs one, so every frame carries a freshly drawn
/// nonce. The relay stores it as an opaque blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CiphertextFrame(Vec<u8>);

impl CiphertextFrame {
    /// The nonce prefix.
    pub fn nonce(&self) -> &[u8] {
        &self.0[..NONCE_LEN]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; a frame holds at least a nonce and a tag.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CiphertextFrame {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Seal `plaintext` under `key` with a fresh random nonce and empty AAD.
///
/// # Errors
///
/// Returns [`ShareError::RandomnessUnavailable`] if no nonce can be drawn.
/// Returns [`ShareError::PayloadTooLarge`] if the plaintext exceeds the GCM
/// per-message limit.
pub fn encrypt(plaintext: &[u8], key: &SymmetricKey) -> Result<CiphertextFrame, ShareError> {
    let cipher = Aes256Gcm::new(key.as_bytes().into());

    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng
        .try_fill_bytes(&mut nonce_bytes)
        .map_err(|_| ShareError::RandomnessUnavailable)?;
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|_| ShareError::PayloadTooLarge {
            len: plaintext.len(),
        })?;

    let mut frame = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    frame.extend_from_slice(&nonce_bytes);
    frame.extend_from_slice(&ciphertext);
    Ok(CiphertextFrame(frame))
}

/// Open a frame produced by [`encrypt`], returning exactly the original plaintext.
///
/// # Errors
///
/// Returns [`ShareError::MalformedFrame`] if `frame` is shorter than
/// [`MIN_FRAME_LEN`]. Returns [`ShareError::AuthenticationFailed`] if the tag
/// does not verify, whether from a wrong key or from any altered bit.
pub fn decrypt(frame: &[u8], key: &SymmetricKey) -> Result<Vec<u8>, ShareError> {
    if frame.len() < MIN_FRAME_LEN {
        return Err(ShareError::MalformedFrame { len: frame.len() });
    }
    let (nonce, sealed) = frame.split_at(NONCE_LEN);
    let cipher = Aes256Gcm::new(key.as_bytes().into());
    cipher
        .decrypt(Nonce::from_slice(nonce), sealed)
        .map_err(|_| ShareError::AuthenticationFailed)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use common::protocol::TAG_LEN;

    use super::*;

    fn fresh_key() -> SymmetricKey {
        SymmetricKey::generate().unwrap()
    }

    #[test]
    fn encrypt_decrypt_round_trip() {
        let key = fresh_key();
        for plaintext in [&b""[..], &b"hello"[..], &[0u8; 4096][..], &[0xA5; 100_003][..]] {
            let frame = encrypt(plaintext, &key).unwrap();
            let decrypted = decrypt(frame.as_bytes(), &key).unwrap();
            assert_eq!(decrypted, plaintext);
        }
    }

    #[test]
    fn frame_layout() {
        let key = fresh_key();
        let frame = encrypt(b"hello", &key).unwrap();
        assert_eq!(frame.len(), NONCE_LEN + 5 + TAG_LEN);
        assert_eq!(frame.nonce(), &frame.as_bytes()[..NONCE_LEN]);
    }

    #[test]
    fn empty_plaintext_yields_minimal_frame() {
        let key = fresh_key();
        let frame = encrypt(b"", &key).unwrap();
        assert_eq!(frame.len(), MIN_FRAME_LEN);
        assert!(decrypt(frame.as_bytes(), &key).unwrap().is_empty());
    }

    #[test]
    fn every_single_bit_flip_fails_auth() {
        let key = fresh_key();
        let frame = encrypt(b"tamper me", &key).unwrap().into_bytes();
        for byte in 0..frame.len() {
            for bit in 0..8 {
                let mut tampered = frame.clone();
                tampered[byte] ^= 1 << bit;
                assert!(
                    matches!(
                        decrypt(&tampered, &key),
                        Err(ShareError::AuthenticationFailed)
                    ),
                    "flip at byte {byte} bit {bit} was accepted"
                );
            }
        }
    }

    #[test]
    fn wrong_key_fails_auth() {
        let k1 = fresh_key();
        let k2 = fresh_key();
        let frame = encrypt(b"secret", &k1).unwrap();
        assert!(matches!(
            decrypt(frame.as_bytes(), &k2),
            Err(ShareError::AuthenticationFailed)
        ));
    }

    #[test]
    fn nonces_are_unique_across_many_encryptions() {
        let key = fresh_key();
        let mut seen = HashSet::with_capacity(10_000);
        for _ in 0..10_000 {
            let frame = encrypt(b"x", &key).unwrap();
            assert!(seen.insert(frame.nonce().to_vec()), "nonce repeated");
        }
    }

    #[test]
    fn same_plaintext_encrypts_differently() {
        let key = fresh_key();
        let a = encrypt(b"same", &key).unwrap();
        let b = encrypt(b"same", &key).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn short_frame_is_malformed() {
        let key = fresh_key();
        assert!(matches!(
            decrypt(&[0u8; 10], &key),
            Err(ShareError::MalformedFrame { len: 10 })
        ));
        assert!(matches!(
            decrypt(&[0u8; MIN_FRAME_LEN - 1], &key),
            Err(ShareError::MalformedFrame { .. })
        ));
    }

    #[test]
    fn truncated_frame_fails_auth() {
        let key = fresh_key();
        let frame = encrypt(b"hello world", &key).unwrap().into_bytes();
        let truncated = &frame[..frame.len() - 1];
        assert!(matches!(
            decrypt(truncated, &key),
            Err(ShareError::AuthenticationFailed)
        ));
    }
}
