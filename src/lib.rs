//! # Probechain
//!
//! String-keyed hash maps with two interchangeable collision-resolution strategies.
//!
//! This crate provides:
//!
//! - `OpenAddressingMap`: quadratic probing over a prime-sized slot array, tombstone deletion
//!   and automatic doubling once the load factor reaches one half
//! - `ChainedMap`: separate chaining over a prime-sized bucket array, resized only on request
//! - `find_mode`: a single-pass frequency mode built on top of `ChainedMap`
//!
//! Both maps implement the `StringMap` trait and take their hash function as a plain
//! `fn(&str) -> u64` at construction. Capacities are always prime.
//!
//! ## Basic Usage
//!
//! ```rust
//! use probechain::{OpenAddressingMap, hash_function_1};
//!
//! let mut map = OpenAddressingMap::new(23, hash_function_1)?;
//!
//! // Insert values
//! map.put("key1".to_string(), 10);
//! assert_eq!(map.get("key1"), Some(&10));
//!
//! // Resizing rounds the requested capacity up to a prime
//! map.resize_table(30);
//! assert_eq!(map.capacity(), 31);
//! assert_eq!(map.get("key1"), Some(&10));
//!
//! // Remove values
//! map.remove("key1");
//! assert_eq!(map.get("key1"), None);
//! # Ok::<(), probechain::MapError>(())
//! ```
//!
//! ## Separate Chaining
//!
//! ```rust
//! use probechain::ChainedMap;
//!
//! let mut map = ChainedMap::new();
//! map.put("1".to_string(), 10);
//! map.put("2".to_string(), 20);
//! map.put("1".to_string(), 30);
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get("1"), Some(&30));
//!
//! // The table never grows by itself
//! map.extend((0..100).map(|i| (format!("key{i}"), i)));
//! assert_eq!(map.capacity(), 11);
//! ```

/// Owned entry chains backing the separate-chaining buckets
mod chain;
/// Module implementing the separate-chaining hash map
mod chained;
/// Error definitions
mod error;
/// Hash functions accepted by both maps
mod hashing;
/// The contract shared by both maps
mod map;
/// Frequency mode built on the separate-chaining hash map
mod mode;
/// Module implementing the quadratic-probing hash map
mod open_addressing;
/// Prime capacity selection
mod sizing;

pub use chained::{ChainedMap, DEFAULT_CAPACITY, Iter as ChainedIter};
pub use error::MapError;
pub use hashing::{HashFunction, hash_function_1, hash_function_2};
pub use map::StringMap;
pub use mode::{Mode, find_mode};
pub use open_addressing::{Iter as OpenAddressingIter, MAX_LOAD_FACTOR, OpenAddressingMap};
pub use sizing::{is_prime, next_prime};
