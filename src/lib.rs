#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// A string-to-string dictionary built on [`HashMap`].
///
/// [`Dictionary`] behaves like `HashMap<String, String>` except that removing
/// an absent key is an error rather than a `false` return.
pub mod dictionary;

/// Error types shared by every container in this crate.
pub mod error;

/// A HashMap implementation using separate chaining.
///
/// This module provides a `HashMap` that wraps the `HashTable` and provides
/// a keyed interface with configurable hashers.
pub mod hash_map;

/// The untyped chaining engine behind [`HashMap`].
pub mod hash_table;

pub use dictionary::Dictionary;
pub use error::Error;
pub use error::InvalidKey;
pub use error::Result;
pub use hash_map::Entry;
pub use hash_map::HashMap;
pub use hash_table::HashTable;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// Hasher builder used when a map is created without one.
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else if #[cfg(feature = "std")] {
        /// Hasher builder used when a map is created without one.
        pub type DefaultHashBuilder = std::collections::hash_map::RandomState;
    } else {
        compile_error!("either the `foldhash` or the `std` feature must be enabled");
    }
}
