#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// A key-value map over the chained table engine.
///
/// This module provides a `HashMap` with per-instance hash and equality
/// callbacks, pooled entry storage, two-way bucket resizing, and
/// multi-table set algebra.
pub mod hash_map;

/// A key-only set over the chained table engine.
///
/// This module provides a `HashSet` sharing the map's storage layout with
/// the value slot suppressed.
pub mod hash_set;

mod hash_table;

pub mod key_hash;

mod pool;

pub use hash_map::HashMap;
pub use hash_set::HashSet;
pub use hash_table::EqFn;
pub use hash_table::Flags;
pub use hash_table::HashFn;
pub use key_hash::KeyPair;
