//! Hash derivation for VI-CBF slot indices and variable increments
//!
//! Implements spec §4.1: for a key `x` and hash-function index `i`,
//! derive
//!
//! ```text
//! slot(x, i)  = H(encode(x) || encode(i))  mod m
//! dl(x, i)    = H(encode(-i) || encode(x)) mod L
//! delta(x, i) = L + dl(x, i)                       (so delta in [L, 2L))
//! ```
//!
//! `H` is treated as a uniform random oracle (spec §1 calls the hash
//! primitive an external collaborator); this crate uses SHA-256. The two
//! sub-derivations deliberately concatenate their inputs in different
//! orders - key-then-index for the slot, negated-index-then-key for the
//! increment - so that the slot and the increment are independent even
//! though they are derived from the same (key, i) pair.

use crate::key::{encode_index, Key};
use sha2::{Digest, Sha256};

/// The `(slot, delta)` pair produced by hash-function `i` for a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Derivation {
    pub slot: u32,
    pub delta: u16,
}

/// Reduces a big-endian digest modulo `modulus` without materializing a
/// bignum: process the digest one byte at a time, `rem = (rem * 256 +
/// byte) mod modulus`. Correct for any modulus that fits in `u64`, which
/// both `m` (< 2^32) and `L` (<= 16) do with room to spare.
fn digest_mod(digest: &[u8], modulus: u64) -> u64 {
    let mut rem: u64 = 0;
    for &byte in digest {
        rem = (rem * 256 + byte as u64) % modulus;
    }
    rem
}

fn hash_bytes(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Derives the slot index and variable increment for hash-function index
/// `i` (`0 <= i < k`) applied to `key`.
///
/// # Panics
///
/// Never panics for valid `m > 0` and `vibase > 0`; both are enforced at
/// filter construction time by [`crate::validation`].
pub(crate) fn derive<K: Key + ?Sized>(key: &K, i: u32, m: u32, vibase: u32) -> Derivation {
    let encoded_key = key.encode();
    let encoded_index = encode_index(i as i64);
    let encoded_neg_index = encode_index(-(i as i64));

    let mut slot_input = Vec::with_capacity(encoded_key.len() + encoded_index.len());
    slot_input.extend_from_slice(&encoded_key);
    slot_input.extend_from_slice(&encoded_index);
    let slot = digest_mod(&hash_bytes(&slot_input), m as u64) as u32;

    let mut delta_input = Vec::with_capacity(encoded_neg_index.len() + encoded_key.len());
    delta_input.extend_from_slice(&encoded_neg_index);
    delta_input.extend_from_slice(&encoded_key);
    let dl = digest_mod(&hash_bytes(&delta_input), vibase as u64);
    let delta = (vibase as u64 + dl) as u16;

    Derivation { slot, delta }
}
