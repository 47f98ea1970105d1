//! Random token generation and hashing shared by the token-based flows.
//!
//! Raw tokens leave the system only inside emailed links; storage keeps the
//! SHA-256 hash, so a database leak does not disclose usable tokens.

use std::fmt::Write;

/// Generates a cryptographically random token and its SHA-256 hash.
///
/// Returns `(raw_token_hex, sha256_hash_hex)`.
pub(crate) fn generate_token() -> (String, String) {
    let mut bytes = [0u8; 32];
    // getrandom should not fail on supported platforms.
    // Fallback: this will produce a zero-filled token which will be
    // rejected on validation.
    getrandom::fill(&mut bytes).unwrap_or(());

    let raw_token = hex_encode(&bytes);
    let hash = hash_token(&raw_token);
    (raw_token, hash)
}

/// Generates a random temporary password for provisioned accounts.
///
/// 16 hex characters: long enough to pass password validation, short enough
/// to retype from a welcome email before changing it.
pub(crate) fn generate_temporary_password() -> String {
    let mut bytes = [0u8; 8];
    getrandom::fill(&mut bytes).unwrap_or(());
    hex_encode(&bytes)
}

/// Computes the SHA-256 hash of a token string for storage.
pub(crate) fn hash_token(raw_token: &str) -> String {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(raw_token.as_bytes());
    let result = hasher.finalize();

    hex_encode(&result)
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes
        .iter()
        .fold(String::with_capacity(bytes.len() * 2), |mut acc, byte| {
            let _ = write!(acc, "{byte:02x}");
            acc
        })
}
