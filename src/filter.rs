//! Variable-Increment Counting Bloom Filter: Bloom filter with variable,
//! key-dependent increments and deletion support
//!
//! A VI-CBF is a Counting Bloom Filter where each insert contributes a
//! pseudorandom increment in `[L, 2L)` to each of its `k` counters,
//! instead of the constant `+1` a standard Counting Bloom Filter uses.
//! Because the increment depends on the key, two different keys that
//! collide on a slot leave a combined counter value that is less likely
//! to look like a single legitimate contribution, which lowers the false
//! positive rate at equal counter width (Rottenstreich et al., INFOCOM
//! 2012).
//!
//! # Algorithm overview
//!
//! - Insert: for each of `k` hash functions, add a derived delta in
//!   `[L, 2L)` to the counter, saturating at `2^b - 1`.
//! - Remove: for each of `k` hash functions, subtract the same delta -
//!   but only after confirming every slot can absorb the subtraction,
//!   and never touching a saturated slot (§ saturation discipline).
//! - Query: a key is definitely absent if any counter is too small to
//!   have received a matching contribution, or its residue after
//!   subtracting the delta falls in the forbidden gap `(0, L)`.
//!
//! # Time complexity
//!
//! Insert, remove, and query are all `O(k)`. Serialization is `O(m)` for
//! `DUMP_ALL` payloads or `O(|counters|)` for `SELECTIVE` ones.
//!
//! # References
//!
//! - Rottenstreich, Kanizo, Keslassy, "The Variable-Increment Counting
//!   Bloom Filter", IEEE INFOCOM 2012.
//!
//! # Examples
//!
//! ```
//! use vicbf::VicbFilter;
//!
//! let mut filter = VicbFilter::new(10_000, 3, 4).unwrap();
//! filter.insert(&123i64).unwrap();
//! assert!(filter.query(&123i64).unwrap());
//! assert!(!filter.query(&4567i64).unwrap());
//!
//! filter.remove(&123i64).unwrap();
//! assert!(!filter.query(&123i64).unwrap());
//! ```

use crate::counters::CounterStore;
use crate::error::{Result, SlotAction, VicbfError};
use crate::fpr;
use crate::hash::{self, Derivation};
use crate::key::Key;
use crate::validation;
use crate::wire;

/// A Variable-Increment Counting Bloom Filter.
///
/// # Invariants
///
/// - Every stored counter satisfies `1 <= counters[s] <= 2^b - 1`.
/// - `MAX = 2^b - 1` is sticky: once a counter reaches `MAX` it is never
///   decremented (see [`VicbFilter::remove`]).
/// - `m`, `k`, `vibase` (`L`), and `b` are immutable after construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VicbFilter {
    m: u32,
    k: u32,
    vibase: u32,
    b: u32,
    /// Logical element count. May briefly go negative when a `remove`
    /// decrements through a saturated slot without being able to undo
    /// the corresponding insert's counter contribution (spec §4.3).
    n: i64,
    counters: CounterStore,
}

impl VicbFilter {
    /// Creates a new filter with the default counter width (`b = 8`).
    ///
    /// # Errors
    ///
    /// Returns [`VicbfError::InvalidArgument`] if `m < 1`, `k` is
    /// outside `[1, 7]`, or `vibase` is not one of `{2, 4, 8, 16}`.
    pub fn new(m: u32, k: u32, vibase: u32) -> Result<Self> {
        Self::with_params(m, k, vibase, 8)
    }

    /// Creates a new filter with an explicit counter width `b`.
    ///
    /// # Errors
    ///
    /// Returns [`VicbfError::InvalidArgument`] if any parameter is
    /// outside its domain (spec §3: `m` positive and `<= 2^32 - 1`, `k`
    /// in `[1, 7]`, `vibase` in `{2, 4, 8, 16}`, `b` in `[1, 15]`).
    pub fn with_params(m: u32, k: u32, vibase: u32, b: u32) -> Result<Self> {
        validation::validate_slots(m as u64)?;
        validation::validate_hash_functions(k)?;
        validation::validate_vibase(vibase)?;
        validation::validate_bits_per_counter(b)?;

        Ok(Self {
            m,
            k,
            vibase,
            b,
            n: 0,
            counters: CounterStore::new(),
        })
    }

    /// Maximum counter value `2^b - 1`, the saturation point.
    #[inline]
    fn max_counter(&self) -> u16 {
        ((1u32 << self.b) - 1) as u16
    }

    /// Number of counter slots (`m`).
    pub fn num_slots(&self) -> u32 {
        self.m
    }

    /// Alias for [`VicbFilter::num_slots`].
    pub fn capacity(&self) -> u32 {
        self.num_slots()
    }

    /// Number of hash functions (`k`).
    pub fn num_hash_functions(&self) -> u32 {
        self.k
    }

    /// The variable-increment base (`L`).
    pub fn vibase(&self) -> u32 {
        self.vibase
    }

    /// Counter width in bits (`b`).
    pub fn bits_per_counter(&self) -> u32 {
        self.b
    }

    fn derivations<K: Key + ?Sized>(&self, key: &K) -> Vec<Derivation> {
        (0..self.k)
            .map(|i| hash::derive(key, i, self.m, self.vibase))
            .collect()
    }

    /// Inserts `key` into the filter.
    ///
    /// For each of the `k` hash functions, adds the derived delta
    /// (`[L, 2L)`) to the corresponding counter, clamping at `MAX`
    /// rather than wrapping. Always succeeds once past validation -
    /// saturation is absorbed silently, trading FPR for the elimination
    /// of false negatives.
    ///
    /// # Errors
    ///
    /// Returns [`VicbfError::InvalidArgument`] if `key` encodes to an
    /// empty byte string (the crate's stand-in for "null key", since
    /// Rust's `Key` types are otherwise non-nullable - see DESIGN.md).
    pub fn insert<K: Key + ?Sized>(&mut self, key: &K) -> Result<()> {
        reject_null(key)?;
        let max = self.max_counter();
        for d in self.derivations(key) {
            let current = self.counters.get_or_zero(d.slot);
            let updated = current.saturating_add(d.delta).min(max);
            self.counters.set(d.slot, updated);
        }
        self.n += 1;
        Ok(())
    }

    /// Removes `key` from the filter.
    ///
    /// Computes all `k` (slot, delta) pairs and plans a per-slot action
    /// before mutating anything: a saturated slot is left untouched, a
    /// slot whose counter equals the delta is deleted, and any other
    /// slot is decremented by the delta. If any non-saturated slot's
    /// counter is smaller than its delta, the whole operation aborts
    /// with [`VicbfError::NotPresent`] and the filter is left bitwise
    /// unchanged - no partial mutation, unlike an approach that
    /// decrements slots as it goes and only discovers the problem on a
    /// later slot.
    ///
    /// # Errors
    ///
    /// - [`VicbfError::InvalidArgument`] if `key` is null (see
    ///   [`VicbFilter::insert`]).
    /// - [`VicbfError::NotPresent`] if the key's counters cannot
    ///   accommodate the removal.
    pub fn remove<K: Key + ?Sized>(&mut self, key: &K) -> Result<()> {
        reject_null(key)?;
        let max = self.max_counter();
        let derivations = self.derivations(key);

        let mut actions = Vec::with_capacity(derivations.len());
        for d in &derivations {
            let current = self.counters.get_or_zero(d.slot);
            let action = if current == max {
                SlotAction::Saturated
            } else if current < d.delta {
                return Err(VicbfError::NotPresent {
                    key: key_display(key),
                });
            } else if current == d.delta {
                SlotAction::Delete
            } else {
                SlotAction::Decrement(d.delta)
            };
            actions.push((d.slot, action));
        }

        for (slot, action) in actions {
            match action {
                SlotAction::Saturated => {}
                SlotAction::Delete => self.counters.set(slot, 0),
                SlotAction::Decrement(delta) => {
                    let current = self.counters.get_or_zero(slot);
                    self.counters.set(slot, current - delta);
                }
            }
        }

        self.n -= 1;
        Ok(())
    }

    /// Returns `true` if `key` is possibly present, `false` if it is
    /// definitely absent.
    ///
    /// A key is definitely absent at hash-function `i` if its counter
    /// is smaller than the derived delta, is zero, or its value minus
    /// the delta falls in the forbidden gap `(0, L)` - a residue no
    /// legitimate insert could have produced, since every insert
    /// contributes at least `L`.
    ///
    /// # Errors
    ///
    /// Returns [`VicbfError::InvalidArgument`] if `key` is null.
    pub fn query<K: Key + ?Sized>(&self, key: &K) -> Result<bool> {
        reject_null(key)?;
        for d in self.derivations(key) {
            let v = self.counters.get_or_zero(d.slot);
            if v == 0 || v < d.delta {
                return Ok(false);
            }
            let residue = v - d.delta;
            if residue > 0 && residue < self.vibase as u16 {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Alias for [`VicbFilter::query`], returning `false` on an
    /// [`VicbfError::InvalidArgument`] rather than propagating it - use
    /// `query` directly to observe null-key errors.
    pub fn contains<K: Key + ?Sized>(&self, key: &K) -> bool {
        self.query(key).unwrap_or(false)
    }

    /// Logical element count. May drift below the true multiset size:
    /// a `remove` through a saturated slot decrements `n` without
    /// reverting any counter, so `n` can undercount.
    pub fn size(&self) -> i64 {
        self.n
    }

    /// Alias for [`VicbFilter::size`].
    pub fn len(&self) -> i64 {
        self.size()
    }

    /// Returns `true` if no elements have ever been inserted (`n == 0`).
    /// Note this does not imply the counter store is empty: a filter
    /// that inserted and then removed the same key can have `n == 0`
    /// while still holding saturated counters from elsewhere.
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Estimated false positive rate, per spec §4.4, evaluated at the
    /// filter's current `(m, max(n, 0), k, L)`.
    pub fn fpr(&self) -> f64 {
        fpr::estimate(self.m as u64, self.n.max(0) as u64, self.k, self.vibase)
    }

    /// Serializes the filter to a compact binary buffer (spec §4.5).
    pub fn serialize(&self) -> Vec<u8> {
        wire::serialize(self.k, self.m, self.vibase, self.b, self.n, &self.counters)
    }

    /// Deserializes a filter previously produced by
    /// [`VicbFilter::serialize`].
    ///
    /// # Errors
    ///
    /// Returns [`VicbfError::MalformedInput`] on a truncated header, an
    /// unsupported `L_tag` or counter width, an out-of-range or
    /// duplicate selective index, or an out-of-range counter value.
    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        let (header, counters) = wire::deserialize(bytes)?;
        Ok(Self {
            m: header.m,
            k: header.k,
            vibase: header.vibase,
            b: header.b,
            n: header.n,
            counters,
        })
    }
}

fn reject_null<K: Key + ?Sized>(key: &K) -> Result<()> {
    if key.encode().is_empty() {
        return Err(VicbfError::InvalidArgument {
            param: "key".to_string(),
            value: String::new(),
            constraint: "must not be null/empty".to_string(),
        });
    }
    Ok(())
}

fn key_display<K: Key + ?Sized>(key: &K) -> String {
    String::from_utf8_lossy(&key.encode()).into_owned()
}
