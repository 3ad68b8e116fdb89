//! vicbf: Variable-Increment Counting Bloom Filter
//!
//! An approximate-membership data structure supporting insertion,
//! deletion, and membership query over a stream of keys, with a lower
//! false-positive rate than a standard Counting Bloom Filter at equal
//! counter width. Follows Rottenstreich, Kanizo, Keslassy, "The
//! Variable-Increment Counting Bloom Filter", IEEE INFOCOM 2012.
//!
//! The filter is **not thread-safe** - wrap it in a mutex or
//! `RwLock` for concurrent access. It performs no I/O; the only
//! external surface is producing and consuming a byte buffer via
//! [`VicbFilter::serialize`] / [`VicbFilter::deserialize`].

#![warn(missing_docs)]
#![warn(clippy::all)]

mod bitio;
mod counters;
pub mod error;
mod filter;
pub mod fpr;
mod hash;
mod key;
mod validation;
mod wire;

pub use error::{Result, VicbfError};
pub use filter::VicbFilter;
pub use key::Key;
