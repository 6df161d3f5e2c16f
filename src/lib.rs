//! An unbalanced binary search tree ordered by a caller-supplied comparator.
//!
//! This crate provides [`OrderedTree`], an ordered collection of records in which records
//! comparing equal are merged rather than stored twice. It supports:
//!
//! - [`insert`](OrderedTree::insert) with a merge callback for duplicates
//! - [`get`](OrderedTree::get) and [`remove`](OrderedTree::remove) by key
//! - ascending and descending traversal ([`traverse`](OrderedTree::traverse),
//!   [`traverse_rev`](OrderedTree::traverse_rev), [`iter`](OrderedTree::iter))
//! - a sideways dump of the tree's shape ([`sideways`](OrderedTree::sideways))
//!
//! # Example
//!
//! ```
//! use sapling::OrderedTree;
//!
//! // (word, frequency), ordered by word only.
//! let mut freq = OrderedTree::with_comparator(|a: &(&str, u32), b: &(&str, u32)| a.0.cmp(b.0));
//!
//! for word in ["b", "a", "c", "b"] {
//!     freq.insert((word, 1), |(_, n)| *n += 1).unwrap();
//! }
//!
//! assert_eq!(freq.count(), 3);
//! assert_eq!(freq.get(&("b", 0)), Some(&("b", 2)));
//!
//! let order: Vec<&str> = freq.iter().rev().map(|(w, _)| *w).collect();
//! assert_eq!(order, ["c", "b", "a"]);
//!
//! assert_eq!(freq.remove(&("b", 0)), Some(("b", 2)));
//! assert_eq!(freq.get(&("b", 0)), None);
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Fallible allocation** - Running out of node storage is reported, never an abort
//! - **No recursion** - Deep, degenerate trees cannot overflow the call stack
//!
//! # Implementation
//!
//! Nodes live in an arena and refer to their children by index. There are no parent links;
//! every operation walks down from the root, remembering the link it arrived through so the
//! node can be replaced in place. The tree is never rebalanced.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod error;
mod raw;

pub mod ordered_tree;

pub use error::{AllocError, InsertError};
pub use ordered_tree::{Insert, OrderedTree};
