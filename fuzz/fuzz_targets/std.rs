#![no_main]

use libfuzzer_sys::fuzz_target;

use arbitrary::Arbitrary;
use linprobe::{algebra, Dictionary, Error, HashTable};
use std::collections::hash_map::RandomState;
use std::collections::{HashMap as StdHashMap, HashSet as StdHashSet};
use std::hash::{BuildHasher, Hasher};

#[derive(Debug, Arbitrary)]
enum Operation<K, V> {
    Insert(K, V),
    Remove(K),
    Get(K),
    Contains(K),
    Clear,
    Len,
    IsEmpty,
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    capacity: u8,
    step: u8,
    collide: bool,
    operations: Vec<Operation<u8, u32>>,
    other: Vec<u8>,
}

// Folds keys onto a handful of origins to force long clusters.
#[derive(Clone, Default)]
struct Collide;

impl BuildHasher for Collide {
    type Hasher = CollideHasher;

    fn build_hasher(&self) -> CollideHasher {
        CollideHasher(0)
    }
}

struct CollideHasher(u64);

impl Hasher for CollideHasher {
    fn write(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.0 = self.0.wrapping_add((*byte % 4) as u64);
        }
    }

    fn finish(&self) -> u64 {
        self.0
    }
}

fn fuzz_table<S: BuildHasher + Clone>(input: &FuzzInput, hasher: S) {
    let capacity = input.capacity as usize % 64;
    let mut std_set = StdHashSet::new();
    let mut table = HashTable::builder()
        .capacity(capacity)
        .hasher(hasher)
        .build();

    for op in &input.operations {
        match *op {
            Operation::Insert(k, _) => {
                let expected = if std_set.len() == capacity {
                    Err(Error::CapacityExhausted { capacity })
                } else if std_set.contains(&k) {
                    Ok(false)
                } else {
                    std_set.insert(k);
                    Ok(true)
                };
                assert_eq!(table.insert(k), expected);
            }
            Operation::Remove(k) => {
                let expected = if std_set.remove(&k) { Ok(k) } else { Err(Error::NotFound) };
                assert_eq!(table.remove(&k), expected);
            }
            Operation::Get(k) => {
                assert_eq!(table.get(&k), std_set.get(&k));
            }
            Operation::Contains(k) => {
                assert_eq!(table.contains(&k), std_set.contains(&k));
            }
            Operation::Clear => {
                std_set.clear();
                table.clear();
            }
            Operation::Len => {
                assert_eq!(std_set.len(), table.len());
            }
            Operation::IsEmpty => {
                assert_eq!(std_set.is_empty(), table.is_empty());
            }
        }
    }

    // Final consistency checks
    for k in std_set.iter() {
        assert!(table.contains(k));
    }
    assert_eq!(std_set.len(), table.len());

    let mut other = HashTable::with_hasher(input.other.len(), table.hasher().clone());
    for k in &input.other {
        other.insert(*k).unwrap();
    }
    let other_set: StdHashSet<u8> = input.other.iter().copied().collect();

    let union = algebra::union(&table, &other);
    let intersection = algebra::intersection(&table, &other);
    let difference = algebra::difference(&table, &other);
    for k in 0..=u8::MAX {
        let (a, b) = (std_set.contains(&k), other_set.contains(&k));
        assert_eq!(union.contains(&k), a || b);
        assert_eq!(intersection.contains(&k), a && b);
        assert_eq!(difference.contains(&k), a && !b);
    }
    assert_eq!(algebra::is_subset(&table, &other), std_set.is_subset(&other_set));
}

fn fuzz_dictionary(input: &FuzzInput) {
    let capacity = input.capacity as usize % 64;
    let step = input.step as usize % 8 + 1;
    let mut std_map = StdHashMap::new();
    let mut dict = Dictionary::builder().capacity(capacity).step(step).build();

    for op in &input.operations {
        match *op {
            Operation::Insert(k, v) => {
                let key = k.to_string();
                let result = dict.insert(key.as_str(), v);
                match result {
                    Ok(previous) => assert_eq!(std_map.insert(key, v), previous),
                    Err(Error::CapacityExhausted { .. }) if std_map.len() == capacity => {}
                    // no free slot reachable with a stride sharing a factor with the capacity
                    Err(Error::CapacityExhausted { .. }) => assert!(!std_map.contains_key(&key)),
                    Err(err) => panic!("unexpected error: {err}"),
                }
            }
            Operation::Remove(k) => {
                let key = k.to_string();
                assert_eq!(dict.remove(&key), std_map.remove(&key).ok_or(Error::NotFound));
            }
            Operation::Get(k) | Operation::Contains(k) => {
                let key = k.to_string();
                assert_eq!(dict.get(&key), std_map.get(&key));
            }
            Operation::Clear => {
                std_map.clear();
                dict.clear();
            }
            Operation::Len => {
                assert_eq!(std_map.len(), dict.len());
            }
            Operation::IsEmpty => {
                assert_eq!(std_map.is_empty(), dict.is_empty());
            }
        }
    }

    for (k, v) in std_map.iter() {
        assert_eq!(dict.get(k), Some(v));
    }
    assert_eq!(std_map.len(), dict.len());
}

fuzz_target!(|data: FuzzInput| {
    if data.collide {
        fuzz_table(&data, Collide);
    } else {
        fuzz_table(&data, RandomState::new());
    }
    fuzz_dictionary(&data);
});
