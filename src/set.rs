use crate::raw::{self, InsertResult};
use crate::{algebra, Error};

use std::borrow::Borrow;
use std::collections::hash_map::RandomState;
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::marker::PhantomData;

/// A fixed-capacity hash set with linear probing.
///
/// The table holds at most [`capacity`](HashTable::capacity) elements for its
/// whole lifetime: it never grows, and any insert into a full table fails with
/// [`Error::CapacityExhausted`]. Removing an element repairs
/// the probe cluster behind it, so every remaining element stays reachable.
///
/// Elements are probed with a stride of 1 by default. A different stride can
/// be set through the [`HashTableBuilder`]; it must be coprime with the
/// capacity for every slot to be reachable.
pub struct HashTable<T, S = RandomState> {
    raw: raw::Table<T, ()>,
    hasher: S,
}

/// A builder for a [`HashTable`].
///
/// # Examples
///
/// ```rust
/// use linprobe::HashTable;
/// use std::collections::hash_map::RandomState;
///
/// let table: HashTable<i32> = HashTable::builder()
///     // Set the fixed capacity.
///     .capacity(11)
///     // Set the probe stride.
///     .step(3)
///     // Set the hasher.
///     .hasher(RandomState::new())
///     // Construct the hash table.
///     .build();
///
/// assert_eq!(table.capacity(), 11);
/// ```
pub struct HashTableBuilder<T, S = RandomState> {
    hasher: S,
    capacity: usize,
    step: usize,
    _t: PhantomData<T>,
}

impl<T> HashTableBuilder<T> {
    /// Set the hash builder used to hash elements.
    ///
    /// The origin slot of an element is its hash modulo the capacity of the
    /// table, so a deterministic hasher makes slot placement predictable.
    pub fn hasher<S>(self, hasher: S) -> HashTableBuilder<T, S> {
        HashTableBuilder {
            hasher,
            capacity: self.capacity,
            step: self.step,
            _t: PhantomData,
        }
    }
}

impl<T, S> HashTableBuilder<T, S> {
    /// Set the fixed capacity of the table.
    pub fn capacity(self, capacity: usize) -> HashTableBuilder<T, S> {
        HashTableBuilder { capacity, ..self }
    }

    /// Set the probe stride of the table.
    ///
    /// # Panics
    ///
    /// Building the table panics if `step` is zero.
    pub fn step(self, step: usize) -> HashTableBuilder<T, S> {
        HashTableBuilder { step, ..self }
    }

    /// Construct a [`HashTable`] from the builder, using the configured options.
    pub fn build(self) -> HashTable<T, S> {
        HashTable {
            raw: raw::Table::new(self.capacity, self.step),
            hasher: self.hasher,
        }
    }
}

impl<T, S> fmt::Debug for HashTableBuilder<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashTableBuilder")
            .field("capacity", &self.capacity)
            .field("step", &self.step)
            .finish()
    }
}

impl<T> HashTable<T> {
    /// The default probe stride.
    pub const STEP: usize = 1;

    /// Creates an empty `HashTable` with room for exactly `capacity` elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use linprobe::HashTable;
    /// let table: HashTable<&str> = HashTable::new(16);
    /// assert_eq!(table.capacity(), 16);
    /// ```
    pub fn new(capacity: usize) -> HashTable<T> {
        HashTable::with_hasher(capacity, RandomState::new())
    }

    /// Returns a builder for a `HashTable`.
    pub fn builder() -> HashTableBuilder<T> {
        HashTableBuilder {
            capacity: 0,
            step: HashTable::<T>::STEP,
            hasher: RandomState::default(),
            _t: PhantomData,
        }
    }
}

impl<T, S> HashTable<T, S> {
    /// Creates an empty `HashTable` with room for exactly `capacity` elements,
    /// using `hasher` to hash them.
    ///
    /// # Examples
    ///
    /// ```
    /// use linprobe::HashTable;
    /// use std::collections::hash_map::RandomState;
    ///
    /// let mut table = HashTable::with_hasher(4, RandomState::new());
    /// table.insert(1).unwrap();
    /// ```
    pub fn with_hasher(capacity: usize, hasher: S) -> HashTable<T, S> {
        HashTable {
            raw: raw::Table::new(capacity, HashTable::<T>::STEP),
            hasher,
        }
    }

    /// Returns the number of elements in the table.
    #[inline]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the table holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the fixed number of slots in the table.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Returns the probe stride of the table.
    #[inline]
    pub fn step(&self) -> usize {
        self.raw.step()
    }

    /// Returns a reference to the table's [`BuildHasher`].
    #[inline]
    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Removes every element, keeping the capacity.
    ///
    /// # Examples
    ///
    /// ```
    /// use linprobe::HashTable;
    ///
    /// let mut table = HashTable::new(2);
    /// table.insert(1).unwrap();
    /// table.clear();
    /// assert!(table.is_empty());
    /// assert_eq!(table.capacity(), 2);
    /// ```
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// An iterator visiting all elements in arbitrary order.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            raw: self.raw.iter(),
        }
    }
}

impl<T, S> HashTable<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    /// Returns `true` if the table contains the value.
    ///
    /// The value may be any borrowed form of the table's element type, but
    /// [`Hash`] and [`Eq`] on the borrowed form *must* match those for the
    /// element type.
    ///
    /// # Examples
    ///
    /// ```
    /// use linprobe::HashTable;
    ///
    /// let mut table = HashTable::new(3);
    /// table.insert(1).unwrap();
    /// assert_eq!(table.contains(&1), true);
    /// assert_eq!(table.contains(&2), false);
    /// ```
    #[inline]
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(value).is_some()
    }

    /// Returns a reference to the element equal to the value, if present.
    #[inline]
    pub fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let i = self.raw.find(self.hash(value), |k| value.eq(k.borrow()))?;
        self.raw.get(i).map(|(k, _)| k)
    }

    /// Inserts a value into the table.
    ///
    /// Returns `Ok(true)` if the value was not present. If an equal value is
    /// already present, `Ok(false)` is returned and the table is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExhausted`] if the table is full, even when an
    /// equal value is already present, or if the value is new and no free slot
    /// is reachable from its origin. The value is dropped and the table is
    /// left unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use linprobe::{Error, HashTable};
    ///
    /// let mut table = HashTable::new(2);
    /// assert_eq!(table.insert(37), Ok(true));
    /// assert_eq!(table.insert(37), Ok(false));
    /// assert_eq!(table.insert(42), Ok(true));
    ///
    /// // the table is full
    /// assert_eq!(table.insert(37), Err(Error::CapacityExhausted { capacity: 2 }));
    /// assert_eq!(table.len(), 2);
    /// ```
    pub fn insert(&mut self, value: T) -> Result<bool, Error> {
        let hash = self.hash(&value);

        match self.raw.insert(hash, value, (), |a, b| a == b)? {
            InsertResult::Inserted => Ok(true),
            InsertResult::Replaced(()) => Ok(false),
        }
    }

    /// Removes a value from the table, returning the stored element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no equal value is present.
    ///
    /// # Examples
    ///
    /// ```
    /// use linprobe::{Error, HashTable};
    ///
    /// let mut table = HashTable::new(2);
    /// table.insert(1).unwrap();
    /// assert_eq!(table.remove(&1), Ok(1));
    /// assert_eq!(table.remove(&1), Err(Error::NotFound));
    /// ```
    pub fn remove<Q>(&mut self, value: &Q) -> Result<T, Error>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hasher = &self.hasher;

        match self.raw.remove(
            hash_with(hasher, value),
            |k| value.eq(k.borrow()),
            |k| hash_with(hasher, k),
        ) {
            Some((k, ())) => Ok(k),
            None => Err(Error::NotFound),
        }
    }

    #[inline]
    fn hash<Q>(&self, value: &Q) -> u64
    where
        Q: Hash + ?Sized,
    {
        hash_with(&self.hasher, value)
    }
}

impl<T, S> HashTable<T, S>
where
    T: Hash + Eq + Clone,
    S: BuildHasher + Clone,
{
    /// Returns a new table holding every element of `self` and `other`.
    ///
    /// See [`algebra::union`] for details.
    pub fn union(&self, other: &HashTable<T, S>) -> HashTable<T, S> {
        algebra::union(self, other)
    }

    /// Returns a new table holding the elements present in both `self` and `other`.
    ///
    /// See [`algebra::intersection`] for details.
    pub fn intersection(&self, other: &HashTable<T, S>) -> HashTable<T, S> {
        algebra::intersection(self, other)
    }

    /// Returns a new table holding the elements of `self` that are not in `other`.
    ///
    /// See [`algebra::difference`] for details.
    pub fn difference(&self, other: &HashTable<T, S>) -> HashTable<T, S> {
        algebra::difference(self, other)
    }

    /// Returns `true` if every element of `other` is in `self`.
    ///
    /// See [`algebra::is_subset`] for details.
    pub fn is_superset(&self, other: &HashTable<T, S>) -> bool {
        algebra::is_subset(other, self)
    }

    /// Returns `true` if every element of `self` is in `other`.
    ///
    /// See [`algebra::is_subset`] for details.
    pub fn is_subset(&self, other: &HashTable<T, S>) -> bool {
        algebra::is_subset(self, other)
    }
}

#[inline]
fn hash_with<S, Q>(hasher: &S, value: &Q) -> u64
where
    S: BuildHasher,
    Q: Hash + ?Sized,
{
    hasher.hash_one(value)
}

impl<T, S> PartialEq for HashTable<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }

        self.iter().all(|value| other.contains(value))
    }
}

impl<T, S> Eq for HashTable<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
}

impl<T, S> fmt::Debug for HashTable<T, S>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, S> Clone for HashTable<T, S>
where
    T: Clone,
    S: Clone,
{
    fn clone(&self) -> HashTable<T, S> {
        HashTable {
            raw: self.raw.clone(),
            hasher: self.hasher.clone(),
        }
    }
}

impl<'a, T, S> IntoIterator for &'a HashTable<T, S> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over a table's elements.
///
/// This struct is created by the [`iter`](HashTable::iter) method on [`HashTable`]. See its documentation for details.
pub struct Iter<'t, T> {
    raw: raw::Iter<'t, T, ()>,
}

impl<'t, T: 't> Iterator for Iter<'t, T> {
    type Item = &'t T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.raw.next().map(|(k, _)| k)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.raw.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(Iter {
                raw: self.raw.clone(),
            })
            .finish()
    }
}
