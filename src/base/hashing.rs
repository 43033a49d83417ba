//! Stable structural hashing.
//!
//! Request identities are hashed with `FxHasher`, which has no per-process
//! random seed: the same value hashes to the same code in every run.

use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

/// A structural hash code.
pub type HashCode = u64;

/// Hash a single value.
pub fn hash_value<T: Hash + ?Sized>(value: &T) -> HashCode {
    let mut hasher = FxHasher::default();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Fold `value` into an existing hash code.
pub fn hash_combine<T: Hash + ?Sized>(seed: HashCode, value: &T) -> HashCode {
    let mut hasher = FxHasher::default();
    hasher.write_u64(seed);
    value.hash(&mut hasher);
    hasher.finish()
}
