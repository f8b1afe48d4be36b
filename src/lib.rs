//! Arena-backed red-black tree collections for Rust.
//!
//! This crate provides [`RBTreeMap`] and [`RBTreeSet`], ordered collections with unique keys
//! built on a classic red-black tree. Beyond the familiar `BTreeMap`-style API they expose
//! [`Cursor`]s, stable positions that survive every insertion and every removal except that of
//! the entry they name:
//!
//! - [`find`](RBTreeMap::find), [`lower_bound`](RBTreeMap::lower_bound),
//!   [`upper_bound`](RBTreeMap::upper_bound) and [`equal_range`](RBTreeMap::equal_range)
//!   return cursors;
//! - [`next`](RBTreeMap::next) and [`prev`](RBTreeMap::prev) move them in key order;
//! - [`erase`](RBTreeMap::erase), [`erase_range`](RBTreeMap::erase_range) and
//!   [`insert_hint`](RBTreeMap::insert_hint) take them.
//!
//! # Example
//!
//! ```
//! use sumi_tree::RBTreeMap;
//!
//! let mut scores = RBTreeMap::new();
//! scores.insert("Alice", 100);
//! scores.insert("Bob", 85);
//! scores.insert("Carol", 92);
//!
//! assert_eq!(scores.get(&"Bob"), Some(&85));
//! assert_eq!(scores.len(), 3);
//!
//! // Keys are unique: a second insert reports the existing entry.
//! let (bob, inserted) = scores.insert("Bob", 0);
//! assert!(!inserted);
//! assert_eq!(scores.value_at(bob), Some(&85));
//!
//! // Cursors stay put while other entries come and go.
//! scores.remove(&"Alice");
//! scores.insert("Dave", 77);
//! assert_eq!(scores.key_at(scores.next(bob)), Some(&"Carol"));
//! ```
//!
//! # Implementation
//!
//! Nodes live in a slot arena and link to each other by index. Slot zero holds a black
//! sentinel that stands in for every missing child, parents the root, and doubles as the
//! end position; both of its child links point at the root. Insertion and removal restore
//! the red-black invariants with the textbook recoloring and rotation passes, so the height
//! never exceeds `2 * log2(n + 1)`.
//!
//! Orderings come from the [`compare`] crate: the default is [`compare::Natural`], and any
//! [`compare::Compare`] implementation (including plain closures) can be supplied through
//! `with_cmp`.
//!
//! Diagnostics go through the [`log`] facade: rotations and fixups at `trace` level, bulk
//! operations and refused inserts at `debug` level.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod cursor;
mod error;
mod raw;

pub mod rbtree_map;
pub mod rbtree_set;

pub use cursor::Cursor;
pub use error::{Error, Result};
pub use rbtree_map::RBTreeMap;
pub use rbtree_set::RBTreeSet;
