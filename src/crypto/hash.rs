//! SHA-256 hashing
//!
//! Block hashes are carried as lowercase hex strings so that the empty
//! genesis hash can share the same representation.

use sha2::{Digest, Sha256};

/// Length of a hex-encoded SHA-256 digest
pub const HASH_HEX_LEN: usize = 64;

/// Hash arbitrary bytes with SHA-256, returning lowercase hex
pub fn hash_hex(data: &[u8]) -> String {
    let digest = Sha256::digest(data);
    hex::encode(digest)
}

/// Check that a string looks like a digest produced by [`hash_hex`]
pub fn is_hash_hex(s: &str) -> bool {
    s.len() == HASH_HEX_LEN && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
