//! Set algebra over [`HashTable`]s.
//!
//! Every operation borrows its operands and allocates a fresh result table,
//! working only through the public iteration and membership methods of the
//! operands. Results use a probe stride of 1 and a clone of the first
//! operand's hasher.

use std::hash::{BuildHasher, Hash};

use crate::HashTable;

/// Returns a new table holding every element of `a` and `b`.
///
/// The result has a capacity of `a.len() + b.len()`. Elements present in
/// both operands are stored once, so `union(a, b).len() <= a.len() + b.len()`.
///
/// # Examples
///
/// ```
/// use linprobe::{algebra, HashTable};
///
/// let mut a = HashTable::new(4);
/// let mut b = HashTable::new(4);
/// for x in [1, 2, 3] { a.insert(x).unwrap(); }
/// for x in [3, 4] { b.insert(x).unwrap(); }
///
/// let both = algebra::union(&a, &b);
/// assert_eq!(both.len(), 4);
/// assert_eq!(both.capacity(), 5);
/// ```
pub fn union<T, S>(a: &HashTable<T, S>, b: &HashTable<T, S>) -> HashTable<T, S>
where
    T: Hash + Eq + Clone,
    S: BuildHasher + Clone,
{
    collect(a.len() + b.len(), a, a.iter().chain(b.iter()))
}

/// Returns a new table holding the elements present in both `a` and `b`.
///
/// The smaller operand is iterated and probed against the larger one, so the
/// work is bounded by `min(a.len(), b.len())` membership checks. The result
/// has a capacity of `min(a.len(), b.len())`.
///
/// # Examples
///
/// ```
/// use linprobe::{algebra, HashTable};
///
/// let mut a = HashTable::new(4);
/// let mut b = HashTable::new(4);
/// for x in [1, 2, 3] { a.insert(x).unwrap(); }
/// for x in [3, 4] { b.insert(x).unwrap(); }
///
/// let common = algebra::intersection(&a, &b);
/// assert!(common.contains(&3));
/// assert_eq!(common.len(), 1);
/// ```
pub fn intersection<T, S>(a: &HashTable<T, S>, b: &HashTable<T, S>) -> HashTable<T, S>
where
    T: Hash + Eq + Clone,
    S: BuildHasher + Clone,
{
    let (smaller, larger) = if a.len() <= b.len() { (a, b) } else { (b, a) };

    collect(
        smaller.len(),
        a,
        smaller.iter().filter(|value| larger.contains(*value)),
    )
}

/// Returns a new table holding the elements of `a` that are not in `b`.
///
/// The result has a capacity of `a.len()`.
///
/// # Examples
///
/// ```
/// use linprobe::{algebra, HashTable};
///
/// let mut a = HashTable::new(4);
/// let mut b = HashTable::new(4);
/// for x in [1, 2, 3] { a.insert(x).unwrap(); }
/// for x in [3, 4] { b.insert(x).unwrap(); }
///
/// let only_a = algebra::difference(&a, &b);
/// assert!(only_a.contains(&1) && only_a.contains(&2));
/// assert_eq!(only_a.len(), 2);
/// ```
pub fn difference<T, S>(a: &HashTable<T, S>, b: &HashTable<T, S>) -> HashTable<T, S>
where
    T: Hash + Eq + Clone,
    S: BuildHasher + Clone,
{
    collect(a.len(), a, a.iter().filter(|value| !b.contains(*value)))
}

/// Returns `true` if every element of `small` is also in `big`.
///
/// Returns `false` without probing if `small` holds more elements than `big`,
/// and stops at the first element of `small` missing from `big`.
///
/// # Examples
///
/// ```
/// use linprobe::{algebra, HashTable};
///
/// let mut a = HashTable::new(4);
/// let mut b = HashTable::new(4);
/// for x in [1, 2, 3] { a.insert(x).unwrap(); }
/// for x in [2, 3] { b.insert(x).unwrap(); }
///
/// assert!(algebra::is_subset(&b, &a));
/// assert!(!algebra::is_subset(&a, &b));
/// ```
pub fn is_subset<T, S>(small: &HashTable<T, S>, big: &HashTable<T, S>) -> bool
where
    T: Hash + Eq,
    S: BuildHasher,
{
    if small.len() > big.len() {
        return false;
    }

    small.iter().all(|value| big.contains(value))
}

// Builds a table of `capacity` slots from `values`, hashed like `like`.
//
// There are never more than `capacity` distinct values, and the table only
// fills up once every distinct value is in, so with a stride of 1 every insert
// succeeds, duplicates included.
fn collect<'a, T, S>(
    capacity: usize,
    like: &HashTable<T, S>,
    values: impl Iterator<Item = &'a T>,
) -> HashTable<T, S>
where
    T: Hash + Eq + Clone + 'a,
    S: BuildHasher + Clone,
{
    let mut result = HashTable::with_hasher(capacity, like.hasher().clone());

    for value in values {
        let inserted = result.insert(value.clone());
        debug_assert!(inserted.is_ok(), "result table sized below its operands");
    }

    result
}
