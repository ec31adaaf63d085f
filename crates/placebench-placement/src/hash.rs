//! Hash functions for placement.
//!
//! Every oracle derives its decisions from these functions. The hash must be:
//! - Deterministic: same input and seed always produce the same output
//! - Uniform: output is uniformly distributed
//! - Fast: called several times per object and replica

use std::hash::{Hash, Hasher};

use siphasher::sip::SipHasher13;

/// Base key for all placement hashes. The run seed is folded into the first
/// half so that different seeds produce unrelated placements.
const PLACEMENT_HASH_KEY: (u64, u64) = (0x0706_0504_0302_0100, 0x0f0e_0d0c_0b0a_0908);

#[inline]
fn hasher(seed: u64) -> SipHasher13 {
    SipHasher13::new_with_keys(PLACEMENT_HASH_KEY.0 ^ seed, PLACEMENT_HASH_KEY.1)
}

/// Compute a placement hash for a single input.
#[inline]
#[must_use]
pub fn placement_hash(seed: u64, input: u64) -> u64 {
    let mut hasher = hasher(seed);
    input.hash(&mut hasher);
    hasher.finish()
}

/// Compute a placement hash combining two inputs.
///
/// Used to combine an object id with a retry round, or a node with a
/// virtual node number.
#[inline]
#[must_use]
pub fn placement_hash2(seed: u64, a: u64, b: u64) -> u64 {
    let mut hasher = hasher(seed);
    a.hash(&mut hasher);
    b.hash(&mut hasher);
    hasher.finish()
}

/// Compute a placement hash combining three inputs.
#[inline]
#[must_use]
pub fn placement_hash3(seed: u64, a: u64, b: u64, c: u64) -> u64 {
    let mut hasher = hasher(seed);
    a.hash(&mut hasher);
    b.hash(&mut hasher);
    c.hash(&mut hasher);
    hasher.finish()
}

/// Map a hash onto the open interval (0, 1].
#[inline]
#[must_use]
pub fn unit_interval(hash: u64) -> f64 {
    // Shift by one so that a zero hash never feeds ln(0).
    ((hash >> 11) as f64 + 1.0) / (1u64 << 53) as f64
}
