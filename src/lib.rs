#![doc = include_str!("../README.md")]

pub mod algebra;
mod bloom;
mod error;
mod map;
mod raw;
mod set;

#[cfg(feature = "serde")]
mod serde_impls;

pub use bloom::BloomFilter;
pub use error::Error;
pub use map::{Dictionary, DictionaryBuilder, Iter as DictionaryIter, Keys, Values};
pub use set::{HashTable, HashTableBuilder, Iter};
