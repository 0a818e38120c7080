//! SHA-1 hashing of keys and node attributes onto the ring.
//!
//! `spec.md` §4.1 pins SHA-1 specifically — tests assert exact placements,
//! so the digest algorithm is not configurable.

use sha1::{Digest, Sha1};

use crate::identifier::Identifier;

/// Hashes `s` with SHA-1, interprets the digest as a big-endian integer, and
/// reduces it modulo `2^m`.
///
/// Only the low 8 bytes of the 20-byte digest are needed: for `m <= 64`,
/// `x mod 2^m` depends solely on the low `m` bits of `x`, which live
/// entirely within the digest's last 8 bytes under a big-endian reading.
pub fn hash(s: &str, m: u32) -> Identifier {
    debug_assert!((1..=64).contains(&m), "m must be in 1..=64");
    let digest = Sha1::digest(s.as_bytes());
    let mut low8 = [0u8; 8];
    low8.copy_from_slice(&digest[12..20]);
    let value = u64::from_be_bytes(low8);
    let reduced = if m == 64 { value } else { value & ((1u64 << m) - 1) };
    Identifier(reduced as u128)
}
