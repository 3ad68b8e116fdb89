//! Error types for VI-CBF operations

use std::fmt;

/// Errors that can occur during VI-CBF construction or operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VicbfError {
    /// Invalid parameter provided to a constructor, or a null/empty key
    /// passed to `insert`/`remove`/`query`
    InvalidArgument {
        /// Parameter or argument name
        param: String,
        /// Invalid value provided
        value: String,
        /// Constraint that was violated
        constraint: String,
    },

    /// `remove` was called for a key whose counters cannot accommodate
    /// the required decrement at some non-saturated slot
    NotPresent {
        /// Textual form of the key that was not present
        key: String,
    },

    /// Error while deserializing a filter from a byte buffer
    MalformedInput(String),
}

impl fmt::Display for VicbfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VicbfError::InvalidArgument {
                param,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "invalid argument '{}': value '{}' {}",
                    param, value, constraint
                )
            }
            VicbfError::NotPresent { key } => {
                write!(f, "key '{}' is not present in the filter", key)
            }
            VicbfError::MalformedInput(msg) => write!(f, "malformed input: {}", msg),
        }
    }
}

impl std::error::Error for VicbfError {}

/// Result type alias for VI-CBF operations
pub type Result<T> = std::result::Result<T, VicbfError>;

/// Internal flag consulted while planning a `remove`. Never surfaced to
/// callers - a saturated slot makes the corresponding counter action a
/// no-op rather than a [`VicbfError::NotPresent`] failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SlotAction {
    /// Counter was saturated at `MAX`; leave it untouched.
    Saturated,
    /// Delete the slot entirely (counter equals the derived delta).
    Delete,
    /// Decrement the counter by the derived delta.
    Decrement(u16),
}
