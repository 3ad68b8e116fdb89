//! Validation utilities for VI-CBF constructor parameters

use crate::error::{Result, VicbfError};

/// Maximum number of slots (`m`), per spec: at most `2^32 - 1`.
pub const MAX_SLOTS: u64 = u32::MAX as u64;

/// Maximum number of hash functions (`k`), per spec: `[1, 7]`.
pub const MAX_HASH_FUNCTIONS: u32 = 7;

/// Maximum counter width in bits (`b`), per spec: `[1, 15]`.
pub const MAX_BITS_PER_COUNTER: u32 = 15;

/// The only valid variable-increment bases (`L`).
pub const VALID_VIBASES: [u32; 4] = [2, 4, 8, 16];

/// Validates the slot count `m`.
pub fn validate_slots(m: u64) -> Result<()> {
    if m == 0 {
        return Err(VicbfError::InvalidArgument {
            param: "m".to_string(),
            value: m.to_string(),
            constraint: "must be greater than 0".to_string(),
        });
    }
    if m > MAX_SLOTS {
        return Err(VicbfError::InvalidArgument {
            param: "m".to_string(),
            value: m.to_string(),
            constraint: format!("must not exceed {}", MAX_SLOTS),
        });
    }
    Ok(())
}

/// Validates the hash function count `k`.
pub fn validate_hash_functions(k: u32) -> Result<()> {
    if k == 0 {
        return Err(VicbfError::InvalidArgument {
            param: "k".to_string(),
            value: k.to_string(),
            constraint: "must be greater than 0".to_string(),
        });
    }
    if k > MAX_HASH_FUNCTIONS {
        return Err(VicbfError::InvalidArgument {
            param: "k".to_string(),
            value: k.to_string(),
            constraint: format!("must not exceed {}", MAX_HASH_FUNCTIONS),
        });
    }
    Ok(())
}

/// Validates the variable-increment base `L`.
pub fn validate_vibase(vibase: u32) -> Result<()> {
    if !VALID_VIBASES.contains(&vibase) {
        return Err(VicbfError::InvalidArgument {
            param: "L".to_string(),
            value: vibase.to_string(),
            constraint: "must be one of {2, 4, 8, 16}".to_string(),
        });
    }
    Ok(())
}

/// Validates the counter width `b`.
pub fn validate_bits_per_counter(b: u32) -> Result<()> {
    if b == 0 {
        return Err(VicbfError::InvalidArgument {
            param: "b".to_string(),
            value: b.to_string(),
            constraint: "must be greater than 0".to_string(),
        });
    }
    if b > MAX_BITS_PER_COUNTER {
        return Err(VicbfError::InvalidArgument {
            param: "b".to_string(),
            value: b.to_string(),
            constraint: format!("must not exceed {}", MAX_BITS_PER_COUNTER),
        });
    }
    Ok(())
}
