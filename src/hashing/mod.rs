//! Input hashing for audit records.
//!
//! Audit trails pin each run to the exact input text via a BLAKE3 digest.
//! The digest is rendered as lowercase hex so the audit record stays a
//! plain JSON-serializable string.

use blake3::Hasher;

/// Hex digest of `input` (64 lowercase hex chars).
#[inline]
pub fn hash_input_text(input: &str) -> String {
    blake3::hash(input.as_bytes()).to_hex().to_string()
}

/// Hex digest of raw bytes, for callers hashing whole input files.
#[inline]
pub fn hash_input_bytes(data: &[u8]) -> String {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize().to_hex().to_string()
}
