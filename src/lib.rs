//! An ordered dictionary for Rust.
//!
//! [`SortedDict`] maps unique, totally ordered keys to values and always
//! iterates in ascending key order, regardless of insertion order. On top of
//! the usual map operations it offers:
//!
//! - [`get`](SortedDict::get) / [`delete`](SortedDict::delete) returning
//!   [`Error::KeyNotFound`] for missing keys, with fallback variants
//!   [`get_or`](SortedDict::get_or) / [`delete_or`](SortedDict::delete_or)
//! - [`pop`](SortedDict::pop) to remove the value under the greatest key, and
//!   [`pop_item`](SortedDict::pop_item) to remove the smallest entry
//! - [`update`](SortedDict::update) for bulk assignment
//! - order-independent equality and a deterministic `{k: v, ...}` rendering
//!
//! # Example
//!
//! ```
//! use sorted_dict::{Error, SortedDict};
//!
//! let mut scores = SortedDict::new();
//! scores.set("Carol", 92);
//! scores.set("Alice", 100);
//! scores.set("Bob", 85);
//!
//! assert_eq!(scores.get("Bob"), Ok(&85));
//! assert_eq!(scores.get("Dave"), Err(Error::KeyNotFound));
//! assert_eq!(scores.render(), "{Alice: 100, Bob: 85, Carol: 92}");
//!
//! // the greatest key goes first
//! assert_eq!(scores.pop(), Ok(92));
//! assert_eq!(scores.len(), 2);
//! ```
//!
//! # Implementation
//!
//! Entries are stored in bounded, sorted leaves kept in key order. Lookups
//! binary search the leaves and then the leaf, inserts split a full leaf in
//! two, and removals borrow from or merge with a neighbouring leaf, following
//! the leaf rules of a B+tree. Structural changes are reported as `trace`
//! events through [`tracing`].
//!
//! The crate is `no_std` and only requires `alloc`.

#![no_std]
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
#[cfg(test)]
extern crate std;

mod error;
mod raw;

pub mod sorted_dict;

pub use error::{Error, Result};
pub use sorted_dict::SortedDict;
