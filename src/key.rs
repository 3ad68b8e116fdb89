//! Canonical key encoding
//!
//! The hash derivation in [`crate::hash`] needs a byte representation of a
//! key that is stable across processes (so `insert(123)` on one machine
//! agrees with `query(123)` on another, and with a value round-tripped
//! through [`crate::wire`]). Integers are encoded as their decimal ASCII
//! representation rather than native byte order, exactly as spec §4.1
//! requires.

/// A value that can be inserted into, removed from, or queried against a
/// [`crate::VicbFilter`].
///
/// Implemented for integers, strings, and raw byte slices. All three
/// encode to bytes canonically: integers as decimal ASCII text, strings
/// and byte slices as themselves.
pub trait Key {
    /// Canonical byte encoding of this key.
    fn encode(&self) -> Vec<u8>;
}

macro_rules! impl_key_for_int {
    ($($t:ty),*) => {
        $(
            impl Key for $t {
                fn encode(&self) -> Vec<u8> {
                    self.to_string().into_bytes()
                }
            }
        )*
    };
}

impl_key_for_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl Key for str {
    fn encode(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }
}

impl Key for String {
    fn encode(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }
}

impl Key for [u8] {
    fn encode(&self) -> Vec<u8> {
        self.to_vec()
    }
}

impl Key for Vec<u8> {
    fn encode(&self) -> Vec<u8> {
        self.clone()
    }
}

impl<T: Key + ?Sized> Key for &T {
    fn encode(&self) -> Vec<u8> {
        (**self).encode()
    }
}

/// Canonical encoding of a (possibly negative) hash-function index, used
/// by the `dl(x, i)` sub-derivation in spec §4.1, which hashes `-i`
/// alongside the key.
pub(crate) fn encode_index(i: i64) -> Vec<u8> {
    i.to_string().into_bytes()
}
