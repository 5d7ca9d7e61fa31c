//! chain-hashmap: a single-owner, separate-chaining hash map keyed by
//! strings, with stable handles to entries.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a small, fully predictable hash table whose bucket layout can be
//!   reasoned about (and tested) directly.
//! - Layers:
//!   - `hasher::bucket_index`: polynomial rolling hash (multiplier 31) over
//!     the key's UTF-16 code units, reduced modulo the bucket count after
//!     every step.
//!   - `ChainedHashMap<K, V>`: an array of lazily created bucket chains.
//!     Chains hold generational slot keys; the entries themselves live in a
//!     `SlotMap` and never move.
//!   - `TableConfig` / `TableError`: construction parameters and the error
//!     taxonomy.
//!
//! Constraints
//! - Keys are string-like (`K: Borrow<str>`); lookups take `&str`.
//! - Unique keys: inserting an existing key replaces its value in place.
//! - After every insert, removal and grow, each entry sits in bucket
//!   `bucket_index(key, capacity)`.
//! - Capacity only grows, by doubling, once `len > capacity * load_factor`.
//!   Removals and `clear()` never shrink it.
//!
//! Hashing and rehashing
//! - Because the hash is reduced against the current capacity at every
//!   step, a bucket index is only meaningful for the capacity it was
//!   computed with. Nothing stores it; grow hashes every key again.
//! - Grow builds the new bucket array separately and swaps it in, so no
//!   caller can observe a half-rehashed table.
//!
//! Handles
//! - `find` returns a `Handle` wrapping the entry's slot key. Handles stay
//!   valid across growth and overwrites, and stop resolving once the entry
//!   is removed or the map is cleared, even if the slot is reused.
//!
//! Notes and non-goals
//! - No internal synchronization: mutation takes `&mut self`; share behind a
//!   `Mutex` if needed.
//! - No shrinking, no persistence, no arbitrary `Hash` keys.
//! - `keys()`, `values()` and `iter()` walk buckets in ascending index order
//!   and chains in insertion order. That order is unrelated to global
//!   insertion order once the table has grown. `iter_mut()` uses storage
//!   order.

mod chained_hash_map;
mod chained_hash_map_proptest;
pub mod config;
pub mod error;
pub mod hasher;

// Public surface
pub use chained_hash_map::{ChainedHashMap, Handle, Iter, IterMut, Keys, Values};
pub use config::TableConfig;
pub use error::{Result, TableError};
