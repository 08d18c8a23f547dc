use crate::raw::{self, InsertResult};
use crate::Error;

use std::fmt;
use std::marker::PhantomData;

/// A fixed-capacity dictionary from string keys to values.
///
/// Keys are placed by the sum of their UTF-16 code units modulo the capacity,
/// and probed with a stride of 3 by default. The stride must be coprime with
/// the capacity for every slot to be reachable: with the default stride,
/// avoid capacities that are multiples of 3.
///
/// Like [`HashTable`](crate::HashTable), the dictionary never grows and
/// repairs probe clusters on removal.
pub struct Dictionary<V> {
    raw: raw::Table<String, V>,
}

/// A builder for a [`Dictionary`].
///
/// # Examples
///
/// ```rust
/// use linprobe::Dictionary;
///
/// let dict: Dictionary<u32> = Dictionary::builder()
///     // Set the fixed capacity.
///     .capacity(17)
///     // Set the probe stride.
///     .step(5)
///     // Construct the dictionary.
///     .build();
///
/// assert_eq!(dict.step(), 5);
/// ```
pub struct DictionaryBuilder<V> {
    capacity: usize,
    step: usize,
    _v: PhantomData<V>,
}

impl<V> DictionaryBuilder<V> {
    /// Set the fixed capacity of the dictionary.
    pub fn capacity(self, capacity: usize) -> DictionaryBuilder<V> {
        DictionaryBuilder { capacity, ..self }
    }

    /// Set the probe stride of the dictionary.
    ///
    /// # Panics
    ///
    /// Building the dictionary panics if `step` is zero.
    pub fn step(self, step: usize) -> DictionaryBuilder<V> {
        DictionaryBuilder { step, ..self }
    }

    /// Construct a [`Dictionary`] from the builder, using the configured options.
    pub fn build(self) -> Dictionary<V> {
        Dictionary {
            raw: raw::Table::new(self.capacity, self.step),
        }
    }
}

impl<V> fmt::Debug for DictionaryBuilder<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DictionaryBuilder")
            .field("capacity", &self.capacity)
            .field("step", &self.step)
            .finish()
    }
}

impl<V> Dictionary<V> {
    /// The default probe stride.
    pub const STEP: usize = 3;

    /// Creates an empty `Dictionary` with room for exactly `capacity` entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use linprobe::Dictionary;
    /// let dict: Dictionary<i32> = Dictionary::new(17);
    /// assert!(dict.is_empty());
    /// ```
    pub fn new(capacity: usize) -> Dictionary<V> {
        Dictionary::builder().capacity(capacity).build()
    }

    /// Returns a builder for a `Dictionary`.
    pub fn builder() -> DictionaryBuilder<V> {
        DictionaryBuilder {
            capacity: 0,
            step: Dictionary::<V>::STEP,
            _v: PhantomData,
        }
    }

    /// Returns the number of entries in the dictionary.
    #[inline]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the dictionary holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the fixed number of slots in the dictionary.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Returns the probe stride of the dictionary.
    #[inline]
    pub fn step(&self) -> usize {
        self.raw.step()
    }

    /// Returns `true` if the dictionary contains a value for the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use linprobe::Dictionary;
    ///
    /// let mut dict = Dictionary::new(7);
    /// dict.insert("a", 1).unwrap();
    /// assert_eq!(dict.contains_key("a"), true);
    /// assert_eq!(dict.contains_key("b"), false);
    /// ```
    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Returns a reference to the value for the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use linprobe::Dictionary;
    ///
    /// let mut dict = Dictionary::new(7);
    /// dict.insert("a", 1).unwrap();
    /// assert_eq!(dict.get("a"), Some(&1));
    /// assert_eq!(dict.get("b"), None);
    /// ```
    #[inline]
    pub fn get(&self, key: &str) -> Option<&V> {
        let i = self.find(key)?;
        self.raw.get(i).map(|(_, v)| v)
    }

    /// Returns a mutable reference to the value for the key.
    #[inline]
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let i = self.find(key)?;
        self.raw.get_mut(i)
    }

    /// Associates `value` with `key`.
    ///
    /// If the dictionary already held the key, its value is replaced in place
    /// and the old value is returned. Otherwise `Ok(None)` is returned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExhausted`] if the dictionary is full, even
    /// when it already holds the key, or if the key is new and no free slot is
    /// reachable from its origin. The dictionary is left unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use linprobe::{Dictionary, Error};
    ///
    /// let mut dict = Dictionary::new(2);
    /// assert_eq!(dict.insert("key", "a"), Ok(None));
    /// assert_eq!(dict.insert("key", "b"), Ok(Some("a")));
    /// assert_eq!(dict.get("key"), Some(&"b"));
    /// assert_eq!(dict.len(), 1);
    ///
    /// dict.insert("other", "c").unwrap();
    /// assert_eq!(dict.insert("key", "d"), Err(Error::CapacityExhausted { capacity: 2 }));
    /// assert_eq!(dict.get("key"), Some(&"b"));
    /// ```
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Result<Option<V>, Error> {
        let key = key.into();
        let hash = hash(&key);

        match self.raw.insert(hash, key, value, |a, b| a == b)? {
            InsertResult::Inserted => Ok(None),
            InsertResult::Replaced(value) => Ok(Some(value)),
        }
    }

    /// Removes a key from the dictionary, returning its value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the key is not present.
    ///
    /// # Examples
    ///
    /// ```
    /// use linprobe::{Dictionary, Error};
    ///
    /// let mut dict = Dictionary::new(7);
    /// dict.insert("a", 1).unwrap();
    /// assert_eq!(dict.remove("a"), Ok(1));
    /// assert_eq!(dict.remove("a"), Err(Error::NotFound));
    /// ```
    pub fn remove(&mut self, key: &str) -> Result<V, Error> {
        match self.raw.remove(hash(key), |k| k == key, |k| hash(k)) {
            Some((_, value)) => Ok(value),
            None => Err(Error::NotFound),
        }
    }

    /// Removes every entry, keeping the capacity.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// An iterator visiting all key-value pairs in arbitrary order.
    #[inline]
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            raw: self.raw.iter(),
        }
    }

    /// An iterator visiting all keys in arbitrary order.
    #[inline]
    pub fn keys(&self) -> Keys<'_, V> {
        Keys { iter: self.iter() }
    }

    /// An iterator visiting all values in arbitrary order.
    #[inline]
    pub fn values(&self) -> Values<'_, V> {
        Values { iter: self.iter() }
    }

    #[inline]
    fn find(&self, key: &str) -> Option<usize> {
        self.raw.find(hash(key), |k| k == key)
    }
}

// Sums the UTF-16 code units of the key.
#[inline]
fn hash(key: &str) -> u64 {
    key.encode_utf16().map(u64::from).sum()
}

impl<V: PartialEq> PartialEq for Dictionary<V> {
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }

        self.iter()
            .all(|(key, value)| other.get(key).map_or(false, |v| *value == *v))
    }
}

impl<V: Eq> Eq for Dictionary<V> {}

impl<V: fmt::Debug> fmt::Debug for Dictionary<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<V: Clone> Clone for Dictionary<V> {
    fn clone(&self) -> Dictionary<V> {
        Dictionary {
            raw: self.raw.clone(),
        }
    }
}

impl<'a, V> IntoIterator for &'a Dictionary<V> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over a dictionary's entries.
///
/// This struct is created by the [`iter`](Dictionary::iter) method on [`Dictionary`]. See its documentation for details.
pub struct Iter<'t, V> {
    raw: raw::Iter<'t, String, V>,
}

impl<'t, V: 't> Iterator for Iter<'t, V> {
    type Item = (&'t str, &'t V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.raw.next().map(|(k, v)| (k.as_str(), v))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.raw.size_hint()
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<V: fmt::Debug> fmt::Debug for Iter<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(Iter {
                raw: self.raw.clone(),
            })
            .finish()
    }
}

/// An iterator over a dictionary's keys.
///
/// This struct is created by the [`keys`](Dictionary::keys) method on [`Dictionary`]. See its documentation for details.
pub struct Keys<'t, V> {
    iter: Iter<'t, V>,
}

impl<'t, V: 't> Iterator for Keys<'t, V> {
    type Item = &'t str;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let (key, _) = self.iter.next()?;
        Some(key)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<V> ExactSizeIterator for Keys<'_, V> {}

/// An iterator over a dictionary's values.
///
/// This struct is created by the [`values`](Dictionary::values) method on [`Dictionary`]. See its documentation for details.
pub struct Values<'t, V> {
    iter: Iter<'t, V>,
}

impl<'t, V: 't> Iterator for Values<'t, V> {
    type Item = &'t V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let (_, value) = self.iter.next()?;
        Some(value)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<V> ExactSizeIterator for Values<'_, V> {}

impl<V> fmt::Debug for Keys<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(Keys {
                iter: Iter {
                    raw: self.iter.raw.clone(),
                },
            })
            .finish()
    }
}

impl<V: fmt::Debug> fmt::Debug for Values<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(Values {
                iter: Iter {
                    raw: self.iter.raw.clone(),
                },
            })
            .finish()
    }
}
