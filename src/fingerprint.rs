//! Stable structural fingerprints for memoized regeneration.
//!
//! Uses FNV-1a for fast, dependency-free hashing with good distribution.
//! The hasher fixes byte order and length prefixing, so equal sources hash
//! equally across processes and platforms. The std `RandomState` hasher is
//! seeded per process and cannot be stored in a manifest.

use std::hash::{Hash, Hasher};

use crate::source::EventSource;

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

/// FNV-1a 64-bit hash of one byte slice.
pub const fn fnv1a_64(bytes: &[u8]) -> u64 {
    fnv1a_accumulate(FNV_OFFSET_BASIS, bytes)
}

const fn fnv1a_accumulate(mut hash: u64, bytes: &[u8]) -> u64 {
    let mut i = 0;
    while i < bytes.len() {
        hash ^= bytes[i] as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
        i += 1;
    }
    hash
}

/// A [`Hasher`] over FNV-1a with platform-independent integer encoding.
///
/// All integer writes go through little-endian byte encoding, so derived
/// `Hash` impls (which feed lengths and field values through these methods)
/// produce identical fingerprints on any host.
#[derive(Debug, Clone)]
pub struct Fnv1a {
    state: u64,
}

impl Fnv1a {
    pub fn new() -> Self {
        Self { state: FNV_OFFSET_BASIS }
    }
}

impl Default for Fnv1a {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for Fnv1a {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        self.state = fnv1a_accumulate(self.state, bytes);
    }

    fn write_u8(&mut self, i: u8) {
        self.write(&[i]);
    }

    fn write_u16(&mut self, i: u16) {
        self.write(&i.to_le_bytes());
    }

    fn write_u32(&mut self, i: u32) {
        self.write(&i.to_le_bytes());
    }

    fn write_u64(&mut self, i: u64) {
        self.write(&i.to_le_bytes());
    }

    fn write_u128(&mut self, i: u128) {
        self.write(&i.to_le_bytes());
    }

    fn write_usize(&mut self, i: usize) {
        self.write_u64(i as u64);
    }
}

/// The stable 64-bit structural fingerprint of one source.
///
/// Covers every semantically relevant attribute: name, kind, namespace,
/// root-name override, base path, and the ordered member list. Member
/// order is part of the fingerprint because collision suffixes depend on
/// declaration order.
pub fn source_fingerprint(source: &EventSource) -> u64 {
    let mut hasher = Fnv1a::new();
    source.hash(&mut hasher);
    hasher.finish()
}

// ============================================================================
// Tests
// ============================================================================
