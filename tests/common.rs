#![allow(dead_code)]

use linprobe::HashTable;

use std::collections::hash_map::{DefaultHasher, RandomState};
use std::hash::{BuildHasher, Hash, Hasher};

// A hasher that can be switched between random, predictable, and degenerate placement.
#[derive(Clone)]
pub enum Hashing {
    // The standard library's randomly seeded hasher.
    Random(RandomState),
    // Integers hash to themselves, so the origin of `n` is `n % capacity`.
    Identity,
    // Everything hashes to zero, so every key collides.
    Zero,
}

impl BuildHasher for Hashing {
    type Hasher = TestHasher;

    fn build_hasher(&self) -> TestHasher {
        match self {
            Hashing::Random(state) => TestHasher::Std(state.build_hasher()),
            Hashing::Identity => TestHasher::Identity(0),
            Hashing::Zero => TestHasher::Zero,
        }
    }
}

pub enum TestHasher {
    Std(DefaultHasher),
    Identity(u64),
    Zero,
}

impl TestHasher {
    fn set(&mut self, n: u64) {
        if let TestHasher::Identity(state) = self {
            *state = n;
        }
    }
}

impl Hasher for TestHasher {
    fn write(&mut self, bytes: &[u8]) {
        match self {
            TestHasher::Std(hasher) => hasher.write(bytes),
            TestHasher::Identity(state) => {
                for byte in bytes {
                    *state = state.wrapping_mul(31).wrapping_add(*byte as u64);
                }
            }
            TestHasher::Zero => {}
        }
    }

    fn write_u32(&mut self, n: u32) {
        match self {
            TestHasher::Std(hasher) => hasher.write_u32(n),
            _ => self.set(n as u64),
        }
    }

    fn write_u64(&mut self, n: u64) {
        match self {
            TestHasher::Std(hasher) => hasher.write_u64(n),
            _ => self.set(n),
        }
    }

    fn write_usize(&mut self, n: usize) {
        match self {
            TestHasher::Std(hasher) => hasher.write_usize(n),
            _ => self.set(n as u64),
        }
    }

    fn finish(&self) -> u64 {
        match self {
            TestHasher::Std(hasher) => hasher.finish(),
            TestHasher::Identity(state) => *state,
            TestHasher::Zero => 0,
        }
    }
}

// Every hashing mode, from best to worst distribution.
pub fn modes() -> [Hashing; 3] {
    [
        Hashing::Random(RandomState::new()),
        Hashing::Identity,
        Hashing::Zero,
    ]
}

// Run the test on a fresh table of `capacity` slots for every hashing mode.
pub fn with_table<T>(capacity: usize, mut test: impl FnMut(HashTable<T, Hashing>)) {
    for hashing in modes() {
        test(table(capacity, hashing));
    }
}

pub fn table<T>(capacity: usize, hashing: Hashing) -> HashTable<T, Hashing> {
    HashTable::builder()
        .capacity(capacity)
        .hasher(hashing)
        .build()
}

// Builds a table holding exactly `values`, with a slot to spare.
pub fn table_of<T>(values: &[T], hashing: Hashing) -> HashTable<T, Hashing>
where
    T: Hash + Eq + Clone,
{
    let mut table = table(values.len() + 1, hashing);
    for value in values {
        table.insert(value.clone()).unwrap();
    }
    table
}

// Returns the sorted elements of a table.
pub fn sorted<T: Ord + Clone>(table: &HashTable<T, Hashing>) -> Vec<T> {
    let mut values: Vec<T> = table.iter().cloned().collect();
    values.sort_unstable();
    values
}

// Asserts that every stored element is found by probing from its origin.
pub fn assert_reachable<T>(table: &HashTable<T, Hashing>)
where
    T: Hash + Eq + std::fmt::Debug,
{
    let mut count = 0;
    for value in table.iter() {
        assert!(table.contains(value), "{value:?} is unreachable");
        count += 1;
    }
    assert_eq!(count, table.len());
    assert!(table.len() <= table.capacity());
}

pub fn init_logger() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Trace)
        .is_test(true)
        .try_init();
}
