//! Deterministic polynomial hashing for term corpora.
//!
//! Corpus hash codes are cache keys that must be identical across runs and
//! processes, so they cannot use a randomly seeded hasher.

/// Multiplier of the polynomial hash.
pub const HASH_PRIME: u64 = 31;

/// Fold one component hash into a running hash.
#[inline]
pub fn fold(hash: u64, component: u64) -> u64 {
    hash.wrapping_mul(HASH_PRIME).wrapping_add(component)
}

/// Polynomial hash of a byte sequence.
#[inline]
pub fn hash_bytes(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0, |hash, &b| fold(hash, u64::from(b)))
}

/// Polynomial hash of a field name.
#[inline]
pub fn hash_str(s: &str) -> u64 {
    hash_bytes(s.as_bytes())
}
