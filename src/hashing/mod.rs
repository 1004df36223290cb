//! BLAKE3-based hashing for cache keys and scope components.
//!
//! Two flavors are used throughout the crate:
//!
//! - [`hash_short`] — a 16-hex-char digest used where the hash appears inside
//!   a human-readable key (system prompt hash, question hash).
//! - [`hash_to_u64`] — a 64-bit truncation used as the Qdrant point id. A
//!   collision here resolves to an upsert of the colliding record, which the
//!   verification stage catches downstream, so 64 bits is sufficient.

#[cfg(test)]
mod tests;

/// Computes the first 16 hex characters of the BLAKE3 digest of `s`.
///
/// Used for the scope key's system-prompt hash and for the question hash in
/// the deterministic cache record key.
#[inline]
pub fn hash_short(s: &str) -> String {
    blake3::hash(s.as_bytes()).to_hex()[..16].to_string()
}

/// Computes a 64-bit hash of `data`, truncated from the 256-bit BLAKE3 output.
#[inline]
pub fn hash_to_u64(data: &[u8]) -> u64 {
    let hash = blake3::hash(data);
    let bytes: [u8; 8] = hash.as_bytes()[0..8]
        .try_into()
        .expect("BLAKE3 always produces at least 8 bytes");
    u64::from_le_bytes(bytes)
}

/// Hashes the verbatim system prompt into its scope-key component.
///
/// Changing a single character of the system prompt yields a different hash,
/// which invalidates cache sharing without an explicit version bump.
#[inline]
pub fn sys_prompt_hash(system_prompt: &str) -> String {
    hash_short(system_prompt)
}
