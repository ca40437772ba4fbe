//! Nonce hashing for the login configuration.
//!
//! The provider expects the hex-encoded SHA-256 digest of the caller's nonce,
//! not the nonce itself.

use sha2::{Digest, Sha256};

/// Hashes a nonce into the form the SDK's login configuration expects.
///
/// Computes SHA-256 over the UTF-8 bytes of `nonce` and renders it as 64
/// lowercase hex characters.
#[must_use]
pub fn hash_nonce(nonce: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(nonce.as_bytes());
    hex::encode(hasher.finalize())
}
