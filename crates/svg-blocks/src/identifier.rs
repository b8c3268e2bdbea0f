//! Identifier generation for extracted SVG elements.
//!
//! Identifiers have the form `<index>_<digest>`: the zero-padded discovery
//! index followed by the first [`DIGEST_LEN`] hex characters of the SHA-256 of
//! the element's bytes, e.g. `0003_9f86d081`.

use sha2::{Digest, Sha256};

/// Number of hex characters of the content digest kept in an identifier.
pub const DIGEST_LEN: usize = 8;

/// Generate the identifier for the SVG element discovered at `index`.
///
/// The result depends only on `index` and `content`, so re-extracting an
/// unmodified document reproduces the same identifiers. Two elements with the
/// same content still get distinct identifiers because their indices differ.
pub fn generate_id(index: usize, content: &str) -> String {
    format!("{index:04}_{}", content_digest(content))
}

/// Truncated SHA-256 hex digest of `content`.
pub fn content_digest(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let mut hex = format!("{:x}", hasher.finalize());
    hex.truncate(DIGEST_LEN);
    hex
}

/// Whether `id` is well-formed: digits, an underscore, then the digest.
pub fn is_valid_id(id: &str) -> bool {
    let Some((index, digest)) = id.split_once('_') else {
        return false;
    };
    !index.is_empty()
        && index.bytes().all(|b| b.is_ascii_digit())
        && digest.len() == DIGEST_LEN
        && digest.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
