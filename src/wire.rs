//! Binary wire format: adaptive dense/sparse serialization
//!
//! Implements spec §4.5. The header (extended per spec §9's resolution
//! of the "does the header persist `n`" open question, plus a pair-count
//! field explained below) is:
//!
//! | field      | width    | meaning                                    |
//! |------------|----------|---------------------------------------------|
//! | mode       | 1 bit    | `0 = DUMP_ALL`, `1 = SELECTIVE`              |
//! | k          | 3 bits   | hash function count, `[1, 7]`                |
//! | m          | 32 bits  | slot count                                   |
//! | l_tag      | 4 bits   | `log2(L)`, `L in {2,4,8,16}` (see below)     |
//! | b          | 4 bits   | bits per counter, `[1, 15]`                  |
//! | n          | 32 bits  | logical element count, clamped to `>= 0`    |
//! | pair_count | 32 bits  | selective-mode pair count (0 in DUMP_ALL)   |
//!
//! 108 bits total. `l_tag` stores `log2(L)` rather than `L` itself: the
//! spec prose names the field width 4 bits and says it "encodes L as its
//! literal integer value", but `L = 16` does not fit in 4 bits (max 15);
//! storing the log keeps the 4-bit width spec names while fixing that
//! inconsistency (see DESIGN.md Open Questions).
//!
//! Payload:
//! - `DUMP_ALL`: `m` counter values, `b` bits each, slot order.
//! - `SELECTIVE`: exactly `pair_count` concatenated `(index, counter)`
//!   pairs, index width `ceil(log2(m))` bits, counter width `b` bits.
//!   Spec §4.5 describes this stream as running "until the buffer is
//!   exhausted", but `BitWriter` zero-pads its final byte, so whenever
//!   `index_bits + b` does not evenly divide the byte-aligned payload
//!   length, the trailing pad bits decode as a spurious `(0, 0)` pair -
//!   which looks like a real, duplicate slot-0 entry if slot 0 is
//!   genuinely occupied. Persisting the pair count removes the
//!   ambiguity: the reader stops after exactly that many pairs instead
//!   of reading until it runs out of bits.

use crate::bitio::{BitReader, BitWriter};
use crate::counters::CounterStore;
use crate::error::{Result, VicbfError};
use crate::validation::VALID_VIBASES;

const HEADER_BITS_WITHOUT_N: u8 = 1 + 3 + 32 + 4 + 4;
const N_FIELD_BITS: u8 = 32;
const PAIR_COUNT_FIELD_BITS: u8 = 32;

/// Number of bits needed to address `[0, m)`. Zero for `m <= 1`, since a
/// single-valued range carries no information.
fn index_bits(m: u32) -> u8 {
    if m <= 1 {
        0
    } else {
        32 - (m - 1).leading_zeros() as u8
    }
}

fn log2_exact(value: u32) -> Option<u8> {
    if value == 0 || !value.is_power_of_two() {
        return None;
    }
    Some(value.trailing_zeros() as u8)
}

pub(crate) struct Header {
    pub selective: bool,
    pub k: u32,
    pub m: u32,
    pub vibase: u32,
    pub b: u32,
    pub n: i64,
}

/// Serializes `(k, m, vibase, b, n, counters)` into a byte buffer,
/// choosing `DUMP_ALL` or `SELECTIVE` by whichever payload is smaller
/// (ties go to `DUMP_ALL`, per spec §4.5).
pub(crate) fn serialize(
    k: u32,
    m: u32,
    vibase: u32,
    b: u32,
    n: i64,
    counters: &CounterStore,
) -> Vec<u8> {
    let idx_bits = index_bits(m);
    let occupied = counters.occupied() as u64;
    let cost_sel = occupied * (idx_bits as u64 + b as u64);
    let cost_all = m as u64 * b as u64;
    let selective = cost_sel < cost_all;

    let mut w = BitWriter::new();
    w.write_bits(selective as u64, 1);
    w.write_bits(k as u64, 3);
    w.write_bits(m as u64, 32);
    let l_tag = log2_exact(vibase).expect("vibase validated at construction");
    w.write_bits(l_tag as u64, 4);
    w.write_bits(b as u64, 4);
    w.write_bits(n.max(0) as u64, N_FIELD_BITS);
    w.write_bits(if selective { occupied } else { 0 }, PAIR_COUNT_FIELD_BITS);

    if selective {
        for (slot, value) in counters.iter() {
            if idx_bits > 0 {
                w.write_bits(slot as u64, idx_bits);
            }
            w.write_bits(value as u64, b as u8);
        }
    } else {
        for slot in 0..m {
            w.write_bits(counters.get_or_zero(slot) as u64, b as u8);
        }
    }

    w.into_bytes()
}

/// Parses the header and payload back into `(Header, CounterStore)`.
pub(crate) fn deserialize(bytes: &[u8]) -> Result<(Header, CounterStore)> {
    let mut r = BitReader::new(bytes);

    let total_header_bits =
        HEADER_BITS_WITHOUT_N as usize + N_FIELD_BITS as usize + PAIR_COUNT_FIELD_BITS as usize;
    if r.bits_remaining() < total_header_bits {
        return Err(VicbfError::MalformedInput(
            "truncated header".to_string(),
        ));
    }

    let selective = r.read_bits(1).unwrap() == 1;
    let k = r.read_bits(3).unwrap() as u32;
    let m = r.read_bits(32).unwrap() as u32;
    let l_tag = r.read_bits(4).unwrap() as u32;
    let b = r.read_bits(4).unwrap() as u32;
    let n = r.read_bits(N_FIELD_BITS).unwrap() as i64;
    let pair_count = r.read_bits(PAIR_COUNT_FIELD_BITS).unwrap();

    if k == 0 {
        return Err(VicbfError::MalformedInput(format!(
            "hash function count {} out of range [1, 7]",
            k
        )));
    }
    if m == 0 {
        return Err(VicbfError::MalformedInput("slot count is 0".to_string()));
    }
    let vibase = 1u32 << l_tag;
    if !VALID_VIBASES.contains(&vibase) {
        return Err(VicbfError::MalformedInput(format!(
            "L_tag {} does not decode to one of {{2,4,8,16}}",
            l_tag
        )));
    }
    if b == 0 || b > 15 {
        return Err(VicbfError::MalformedInput(format!(
            "counter width {} out of range [1, 15]",
            b
        )));
    }

    let mut store = CounterStore::new();
    let max_counter: u64 = (1u64 << b) - 1;

    if selective {
        let idx_bits = index_bits(m);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..pair_count {
            let slot = if idx_bits > 0 {
                r.read_bits(idx_bits)
                    .ok_or_else(|| VicbfError::MalformedInput("truncated payload".to_string()))?
                    as u32
            } else {
                0
            };
            let value = r
                .read_bits(b as u8)
                .ok_or_else(|| VicbfError::MalformedInput("truncated payload".to_string()))?;

            if slot >= m {
                return Err(VicbfError::MalformedInput(format!(
                    "selective index {} >= m ({})",
                    slot, m
                )));
            }
            if value > max_counter {
                return Err(VicbfError::MalformedInput(format!(
                    "counter value {} exceeds 2^b - 1 ({})",
                    value, max_counter
                )));
            }
            if !seen.insert(slot) {
                return Err(VicbfError::MalformedInput(format!(
                    "duplicate selective index {}",
                    slot
                )));
            }
            store.set(slot, value as u16);
        }
    } else {
        for slot in 0..m {
            let value = r
                .read_bits(b as u8)
                .ok_or_else(|| VicbfError::MalformedInput("truncated payload".to_string()))?;
            if value > max_counter {
                return Err(VicbfError::MalformedInput(format!(
                    "counter value {} exceeds 2^b - 1 ({})",
                    value, max_counter
                )));
            }
            store.set(slot, value as u16);
        }
    }

    Ok((
        Header {
            selective,
            k,
            m,
            vibase,
            b,
            n,
        },
        store,
    ))
}
