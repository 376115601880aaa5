//! [`SymmetricKey`]: the per-share secret and its transport encoding.

use std::str::FromStr;

use aes_gcm::aead::{rand_core::RngCore, OsRng};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use zeroize::Zeroize;

use super::{ENCODED_KEY_LEN, KEY_LEN};
use crate::error::ShareError;

/// A 256-bit share key.
///
/// Lives only in process memory and, encoded, in the fragment of a share
/// link. The bytes are zeroed on drop and never printed.
#[derive(Clone)]
pub struct SymmetricKey([u8; KEY_LEN]);

impl SymmetricKey {
    /// Draw a fresh key from the OS CSPRNG.
    ///
    /// # Errors
    ///
    /// Returns [`ShareError::RandomnessUnavailable`] if the OS source fails.
    pub fn generate() -> Result<Self, ShareError> {
        let mut bytes = [0u8; KEY_LEN];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|_| ShareError::RandomnessUnavailable)?;
        Ok(Self(bytes))
    }

    /// Wrap raw key bytes, e.g. a known test vector.
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw key bytes for the cipher.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    /// Unpadded base64url encoding; always [`ENCODED_KEY_LEN`] characters.
    pub fn encode(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.0)
    }

    /// Inverse of [`SymmetricKey::encode`].
    ///
    /// Padding, characters outside the URL-safe alphabet, non-canonical
    /// trailing bits and any length other than 32 decoded bytes are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ShareError::MalformedKey`] on any of the above.
    pub fn decode(encoded: &str) -> Result<Self, ShareError> {
        if encoded.len() != ENCODED_KEY_LEN {
            return Err(ShareError::MalformedKey);
        }
        let mut decoded = URL_SAFE_NO_PAD
            .decode(encoded)
            .map_err(|_| ShareError::MalformedKey)?;
        if decoded.len() != KEY_LEN {
            decoded.zeroize();
            return Err(ShareError::MalformedKey);
        }
        let mut bytes = [0u8; KEY_LEN];
        bytes.copy_from_slice(&decoded);
        decoded.zeroize();
        Ok(Self(bytes))
    }
}

impl FromStr for SymmetricKey {
    type Err = ShareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

impl PartialEq for SymmetricKey {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for SymmetricKey {}

impl Drop for SymmetricKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SymmetricKey([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_is_fixed_length_and_url_safe() {
        for _ in 0..64 {
            let key = SymmetricKey::generate().unwrap();
            let encoded = key.encode();
            assert_eq!(encoded.len(), ENCODED_KEY_LEN);
            assert!(encoded
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        }
    }

    #[test]
    fn decode_inverts_encode() {
        for _ in 0..64 {
            let key = SymmetricKey::generate().unwrap();
            let decoded = SymmetricKey::decode(&key.encode()).unwrap();
            assert_eq!(decoded.as_bytes(), key.as_bytes());
        }
    }

    #[test]
    fn generated_keys_differ() {
        let k1 = SymmetricKey::generate().unwrap();
        let k2 = SymmetricKey::generate().unwrap();
        assert_ne!(k1, k2);
    }

    #[test]
    fn known_vector() {
        let key = SymmetricKey::from_bytes([0xFF; KEY_LEN]);
        assert_eq!(key.encode(), format!("{}8", "_".repeat(ENCODED_KEY_LEN - 1)));
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(matches!(
            SymmetricKey::decode(""),
            Err(ShareError::MalformedKey)
        ));
        assert!(matches!(
            SymmetricKey::decode("AAAA"),
            Err(ShareError::MalformedKey)
        ));
        let long = "A".repeat(ENCODED_KEY_LEN + 1);
        assert!(matches!(
            SymmetricKey::decode(&long),
            Err(ShareError::MalformedKey)
        ));
    }

    #[test]
    fn rejects_standard_alphabet_and_padding() {
        let encoded = SymmetricKey::from_bytes([0xFF; KEY_LEN]).encode();
        let standard = encoded.replace('_', "/");
        assert!(matches!(
            SymmetricKey::decode(&standard),
            Err(ShareError::MalformedKey)
        ));
        let padded = format!("{}=", &encoded[..ENCODED_KEY_LEN - 1]);
        assert!(matches!(
            SymmetricKey::decode(&padded),
            Err(ShareError::MalformedKey)
        ));
    }

    #[test]
    fn rejects_non_canonical_trailing_bits() {
        // 43 chars carry 258 bits; the last two must be zero.
        let encoded = format!("{}9", "A".repeat(ENCODED_KEY_LEN - 1));
        assert!(matches!(
            SymmetricKey::decode(&encoded),
            Err(ShareError::MalformedKey)
        ));
    }

    #[test]
    fn from_str_matches_decode() {
        let key = SymmetricKey::generate().unwrap();
        let parsed: SymmetricKey = key.encode().parse().unwrap();
        assert_eq!(parsed, key);
    }

    #[test]
    fn debug_is_redacted() {
        let key = SymmetricKey::from_bytes([0x42; KEY_LEN]);
        let debug = format!("{key:?}");
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains(&key.encode()));
    }
}
