//! Error types for fallible insertion.
//!
//! Node allocation is the only step of any tree operation that can fail. Every other
//! outcome that a caller might think of as an error is an ordinary return value:
//!
//! - inserting a key that is already present returns the existing position and `false`;
//! - erasing a key that is absent returns `0`;
//! - erasing the end position is a no-op that returns the end position.
//!
//! Allocation always happens before any link is touched, so when one of the `try_*`
//! methods returns an [`Error`] the tree is exactly as it was before the call.

use thiserror::Error;

/// Errors returned by [`RBTreeMap::try_insert`](crate::RBTreeMap::try_insert) and friends.
#[derive(Error, Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// The tree already holds as many entries as its configured maximum length allows.
    ///
    /// See [`RBTreeMap::with_max_len`](crate::RBTreeMap::with_max_len).
    #[error("tree is at its maximum length of {max_len} entries")]
    MaxLenExceeded {
        /// The configured limit.
        max_len: usize,
    },

    /// The node arena cannot mint another handle.
    #[error("node arena is exhausted at {capacity} slots")]
    ArenaExhausted {
        /// The number of slots a single arena can address.
        capacity: usize,
    },
}

/// A `Result` alias using the crate's [`Error`].
pub type Result<T> = core::result::Result<T, Error>;
