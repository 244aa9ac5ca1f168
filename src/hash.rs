//! Feature hashing primitives.
//!
//! Three selectable byte-hash algorithms map feature content to 64-bit
//! integers before bucketing:
//!
//! - [`HashKind::Std`]: the standard library's default 64-bit hasher.
//! - [`HashKind::Murmur2`]: MurmurHash2-64A, seeded with the model seed.
//! - [`HashKind::Murmur3`]: MurmurHash3 x64-128, seeded; only the first
//!   64-bit half of the digest is used.
//!
//! The Murmur implementations are bit-reproducible against Austin Appleby's
//! public-domain reference code. Floating-point values are hashed by bit
//! reinterpretation ([`hash_f64`]), not by value.

use std::hash::Hasher as _;

// =============================================================================
// Algorithm Selector
// =============================================================================

/// Byte-hash algorithm used for feature hashing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HashKind {
    /// The language-default 64-bit string hash (`DefaultHasher`).
    ///
    /// Deterministic within and across runs, but not seed-dependent.
    Std,
    /// MurmurHash2, 64-bit variant A.
    #[default]
    Murmur2,
    /// MurmurHash3, x64 128-bit variant; the low half of the digest is used.
    Murmur3,
}

impl HashKind {
    /// Map a numeric hash-type selector to an algorithm.
    ///
    /// `0` selects [`HashKind::Std`], `3` selects [`HashKind::Murmur3`], and
    /// any other value (including the canonical `2`) falls back to
    /// [`HashKind::Murmur2`].
    pub fn from_selector(selector: u32) -> Self {
        match selector {
            0 => HashKind::Std,
            3 => HashKind::Murmur3,
            _ => HashKind::Murmur2,
        }
    }
}

// =============================================================================
// Hasher
// =============================================================================

/// A seeded byte hasher with a selectable algorithm.
///
/// Stateless between calls: hashing the same bytes always yields the same
/// value for a fixed `(kind, seed)` pair.
#[derive(Clone, Copy, Debug)]
pub struct ByteHasher {
    kind: HashKind,
    seed: u64,
}

impl ByteHasher {
    /// Create a hasher for the given algorithm and model seed.
    pub fn new(kind: HashKind, seed: u32) -> Self {
        Self {
            kind,
            seed: u64::from(seed),
        }
    }

    /// Hash a byte string to a 64-bit integer.
    #[inline]
    pub fn hash_bytes(&self, bytes: &[u8]) -> u64 {
        match self.kind {
            HashKind::Std => std_hash(bytes),
            HashKind::Murmur2 => murmur2_64a(bytes, self.seed),
            HashKind::Murmur3 => murmur3_x64_128(bytes, self.seed).0,
        }
    }
}

/// Hash a double by bit reinterpretation.
///
/// Two doubles hash equal iff they are bit-identical: `-0.0` and `0.0` hash
/// differently, and distinct NaN payloads hash differently. This mirrors the
/// original kernel's behavior and keeps the mapping deterministic.
#[inline]
pub fn hash_f64(x: f64) -> u64 {
    x.to_bits()
}

fn std_hash(bytes: &[u8]) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    hasher.write(bytes);
    hasher.finish()
}

// =============================================================================
// MurmurHash2-64A
// =============================================================================

/// MurmurHash2, 64-bit variant A, by Austin Appleby (public domain).
pub fn murmur2_64a(data: &[u8], seed: u64) -> u64 {
    const M: u64 = 0xc6a4a7935bd1e995;
    const R: u32 = 47;

    let mut h = seed ^ (data.len() as u64).wrapping_mul(M);

    let mut blocks = data.chunks_exact(8);
    for block in &mut blocks {
        let mut k = u64::from_le_bytes(block.try_into().unwrap());
        k = k.wrapping_mul(M);
        k ^= k >> R;
        k = k.wrapping_mul(M);
        h ^= k;
        h = h.wrapping_mul(M);
    }

    let tail = blocks.remainder();
    if !tail.is_empty() {
        for (i, &byte) in tail.iter().enumerate() {
            h ^= u64::from(byte) << (8 * i);
        }
        h = h.wrapping_mul(M);
    }

    h ^= h >> R;
    h = h.wrapping_mul(M);
    h ^= h >> R;
    h
}

// =============================================================================
// MurmurHash3 x64-128
// =============================================================================

/// Finalization mix - force all bits of a hash block to avalanche.
#[inline]
fn fmix64(mut k: u64) -> u64 {
    k ^= k >> 33;
    k = k.wrapping_mul(0xff51afd7ed558ccd);
    k ^= k >> 33;
    k = k.wrapping_mul(0xc4ceb9fe1a85ec53);
    k ^= k >> 33;
    k
}

/// MurmurHash3, x64 128-bit variant, by Austin Appleby (public domain).
///
/// Returns the full 128-bit digest as `(h1, h2)`.
pub fn murmur3_x64_128(data: &[u8], seed: u64) -> (u64, u64) {
    const C1: u64 = 0x87c37b91114253d5;
    const C2: u64 = 0x4cf5ad432745937f;

    let len = data.len();
    let n_blocks = len / 16;

    let mut h1 = seed;
    let mut h2 = seed;

    for block in data[..n_blocks * 16].chunks_exact(16) {
        let mut k1 = u64::from_le_bytes(block[..8].try_into().unwrap());
        let mut k2 = u64::from_le_bytes(block[8..].try_into().unwrap());

        k1 = k1.wrapping_mul(C1).rotate_left(31).wrapping_mul(C2);
        h1 ^= k1;
        h1 = h1
            .rotate_left(27)
            .wrapping_add(h2)
            .wrapping_mul(5)
            .wrapping_add(0x52dce729);

        k2 = k2.wrapping_mul(C2).rotate_left(33).wrapping_mul(C1);
        h2 ^= k2;
        h2 = h2
            .rotate_left(31)
            .wrapping_add(h1)
            .wrapping_mul(5)
            .wrapping_add(0x38495ab5);
    }

    let tail = &data[n_blocks * 16..];
    let mut k1 = 0u64;
    let mut k2 = 0u64;

    if tail.len() > 8 {
        for (i, &byte) in tail[8..].iter().enumerate() {
            k2 ^= u64::from(byte) << (8 * i);
        }
        k2 = k2.wrapping_mul(C2).rotate_left(33).wrapping_mul(C1);
        h2 ^= k2;
    }
    if !tail.is_empty() {
        for (i, &byte) in tail[..tail.len().min(8)].iter().enumerate() {
            k1 ^= u64::from(byte) << (8 * i);
        }
        k1 = k1.wrapping_mul(C1).rotate_left(31).wrapping_mul(C2);
        h1 ^= k1;
    }

    h1 ^= len as u64;
    h2 ^= len as u64;
    h1 = h1.wrapping_add(h2);
    h2 = h2.wrapping_add(h1);
    h1 = fmix64(h1);
    h2 = fmix64(h2);
    h1 = h1.wrapping_add(h2);
    h2 = h2.wrapping_add(h1);

    (h1, h2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_mapping() {
        assert_eq!(HashKind::from_selector(0), HashKind::Std);
        assert_eq!(HashKind::from_selector(2), HashKind::Murmur2);
        assert_eq!(HashKind::from_selector(3), HashKind::Murmur3);
        // Unrecognized selectors fall back to Murmur2
        assert_eq!(HashKind::from_selector(1), HashKind::Murmur2);
        assert_eq!(HashKind::from_selector(99), HashKind::Murmur2);
        assert_eq!(HashKind::default(), HashKind::Murmur2);
    }

    #[test]
    fn murmur2_reference_vectors() {
        // Reference values from the public-domain MurmurHash2-64A algorithm.
        assert_eq!(murmur2_64a(b"", 0), 0x0000000000000000);
        assert_eq!(murmur2_64a(b"", 1), 0xc6a4a7935bd064dc);
        assert_eq!(murmur2_64a(b"a", 0), 0x071717d2d36b6b11);
        assert_eq!(murmur2_64a(b"a", 42), 0xf9dac41c2dc20c49);
        assert_eq!(murmur2_64a(b"hello world", 0), 0xd3ba2368a832afce);
        assert_eq!(murmur2_64a(b"hello world", 1), 0x26487f815882e16d);
        // Exactly one 8-byte block, no tail
        assert_eq!(murmur2_64a(b"abcdefgh", 123), 0x581bd4d6a24f37e5);
        // Two full blocks
        assert_eq!(murmur2_64a(b"0123456789abcdef", 7), 0xd799692d1a0b7964);
        // Multi-block with tail
        assert_eq!(
            murmur2_64a(b"The quick brown fox jumps over the lazy dog", 2018),
            0xe13225a7bd980424
        );
    }

    #[test]
    fn murmur3_reference_vectors() {
        // Reference values from the public-domain MurmurHash3 x64-128 algorithm.
        assert_eq!(murmur3_x64_128(b"", 0), (0, 0));
        assert_eq!(
            murmur3_x64_128(b"", 1),
            (0x4610abe56eff5cb5, 0x51622daa78f83583)
        );
        assert_eq!(
            murmur3_x64_128(b"a", 0),
            (0x85555565f6597889, 0xe6b53a48510e895a)
        );
        assert_eq!(
            murmur3_x64_128(b"a", 42),
            (0x28259ca4fdf626b0, 0x25ebca9125f82b15)
        );
        assert_eq!(
            murmur3_x64_128(b"hello world", 0),
            (0x533f6046eb7f610e, 0xab97467d60eb63b1)
        );
        // Tail longer than 8 bytes exercises the k2 path
        assert_eq!(
            murmur3_x64_128(b"hello world", 1),
            (0xd18e465a6a1e2de0, 0xa83512a45e28fd55)
        );
        // Exactly one 16-byte block, no tail
        assert_eq!(
            murmur3_x64_128(b"0123456789abcdef", 7),
            (0x500ca03648b1f185, 0xd5c2a273849b13ab)
        );
        // Multi-block with tail
        assert_eq!(
            murmur3_x64_128(b"The quick brown fox jumps over the lazy dog", 2018),
            (0x7aaf55ba7f423811, 0x42d78d3ab9247dbd)
        );
    }

    #[test]
    fn hasher_is_deterministic() {
        for kind in [HashKind::Std, HashKind::Murmur2, HashKind::Murmur3] {
            let hasher = ByteHasher::new(kind, 1);
            assert_eq!(hasher.hash_bytes(b"feature"), hasher.hash_bytes(b"feature"));
        }
    }

    #[test]
    fn hasher_seed_changes_murmur_output() {
        let a = ByteHasher::new(HashKind::Murmur2, 1).hash_bytes(b"x");
        let b = ByteHasher::new(HashKind::Murmur2, 2).hash_bytes(b"x");
        assert_ne!(a, b);

        let a = ByteHasher::new(HashKind::Murmur3, 1).hash_bytes(b"x");
        let b = ByteHasher::new(HashKind::Murmur3, 2).hash_bytes(b"x");
        assert_ne!(a, b);
    }

    #[test]
    fn murmur3_low_half_is_hash_value() {
        let hasher = ByteHasher::new(HashKind::Murmur3, 5);
        let (h1, _) = murmur3_x64_128(b"payload", 5);
        assert_eq!(hasher.hash_bytes(b"payload"), h1);
    }

    #[test]
    fn f64_hash_is_bitwise() {
        assert_eq!(hash_f64(1.5), 1.5f64.to_bits());
        // -0.0 and 0.0 are distinct bit patterns
        assert_ne!(hash_f64(0.0), hash_f64(-0.0));
        // NaN hashes by payload, equal to itself bit-for-bit
        assert_eq!(hash_f64(f64::NAN), hash_f64(f64::NAN));
    }
}
