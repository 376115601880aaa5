//! On-disk storage of opaque frames, one file per share identifier.
//!
//! # Lifecycle
//!
//! 1. An upload is written to a hidden `.<id>.part` file in the share directory.
//! 2. It is published by hard-linking the part file to `<id>`. Linking fails if
//!    `<id>` already exists, so a colliding identifier is never overwritten;
//!    the relay draws a new identifier and tries again.
//! 3. Downloads open `<id>` and stream it back unchanged.
//!
//! # Invariants
//!
//! - Frame contents are never inspected or logged.
//! - Identifiers are alphanumeric; anything else is rejected before a path
//!   is built, so requests cannot escape the share directory.

pub mod blob;

pub use blob::{BlobStore, StoreError};

use rand::{distributions::Alphanumeric, Rng};

/// How many identifiers to try before giving up on an upload.
pub const MAX_ID_ATTEMPTS: usize = 16;

/// Draw a random alphanumeric identifier of `len` characters.
pub fn generate_id(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Whether `id` could have been produced by [`generate_id`].
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && id.len() <= 64 && id.bytes().all(|b| b.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_valid() {
        for len in [4, 6, 32] {
            let id = generate_id(len);
            assert_eq!(id.len(), len);
            assert!(is_valid_id(&id));
        }
    }

    #[test]
    fn rejects_path_tricks() {
        assert!(!is_valid_id(""));
        assert!(!is_valid_id(".."));
        assert!(!is_valid_id("a/b"));
        assert!(!is_valid_id(".abc.part"));
        assert!(!is_valid_id("abc%2F"));
        assert!(!is_valid_id(&"a".repeat(65)));
    }
}
