//! Structural hashing.
//!
//! Node hashes must be reproducible across runs and processes so they can key
//! caches, which rules out `RandomState`. FNV-1a over the `Hash` byte stream
//! is used instead.

use std::hash::{Hash, Hasher};

const FNV1A_OFFSET: u64 = 0xcbf29ce484222325;
const FNV1A_PRIME: u64 = 0x100000001b3;

pub type HashValue = u64;

#[derive(Debug, Clone)]
pub struct StructuralHasher {
    state: u64,
}

impl StructuralHasher {
    pub fn new() -> Self {
        Self {
            state: FNV1A_OFFSET,
        }
    }

    pub fn write_value<T: Hash + ?Sized>(&mut self, value: &T) {
        value.hash(self);
    }

    pub fn finish_hash(&self) -> HashValue {
        self.state
    }
}

impl Default for StructuralHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for StructuralHasher {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.state ^= u64::from(*byte);
            self.state = self.state.wrapping_mul(FNV1A_PRIME);
        }
    }
}

pub fn hash_value<T: Hash + ?Sized>(value: &T) -> HashValue {
    let mut hasher = StructuralHasher::new();
    hasher.write_value(value);
    hasher.finish_hash()
}

/// Order-sensitive combination of two hashes.
pub fn hash_combine(seed: HashValue, value: HashValue) -> HashValue {
    let mut hasher = StructuralHasher::new();
    hasher.write_u64(seed);
    hasher.write_u64(value);
    hasher.finish_hash()
}
