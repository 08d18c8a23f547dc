mod probe;

use std::{fmt, mem};

use self::probe::Probe;
use crate::Error;

pub(crate) use self::probe::gcd;

// A fixed-capacity, open-addressing hash table with linear probing.
//
// The table does not know how to hash its keys. Every operation takes the
// hash of the key it is looking for and an equality predicate, and removal
// takes a hash function used to relocate the entries it displaces. The
// element set and the dictionary layer their own hashing policy on top.
pub struct Table<K, V> {
    slots: Box<[Slot<K, V>]>,
    len: usize,
    step: usize,
}

// A single cell in the table.
#[derive(Clone)]
pub enum Slot<K, V> {
    Empty,
    Occupied(K, V),
}

impl<K, V> Slot<K, V> {
    #[inline]
    fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }

    #[inline]
    fn key(&self) -> Option<&K> {
        match self {
            Slot::Occupied(key, _) => Some(key),
            Slot::Empty => None,
        }
    }
}

// The outcome of a successful insertion.
#[derive(Debug, PartialEq, Eq)]
pub enum InsertResult<V> {
    // the key was not present and now occupies a slot
    Inserted,
    // the key was present, its previous value was replaced
    Replaced(V),
}

impl<K, V> Table<K, V> {
    // Creates an empty table with `capacity` slots, probed with the given stride.
    pub fn new(capacity: usize, step: usize) -> Table<K, V> {
        assert!(step > 0, "probe step must be non-zero");

        if capacity > 1 && gcd(step, capacity) != 1 {
            log::warn!(
                "probe step {step} shares a factor with capacity {capacity}, \
                 not every slot is reachable"
            );
        }

        Table {
            slots: (0..capacity).map(|_| Slot::Empty).collect(),
            len: 0,
            step,
        }
    }

    // Returns the number of slots in the table.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    // Returns the number of occupied slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn step(&self) -> usize {
        self.step
    }

    // Returns the index of the slot holding the key matching `eq`.
    //
    // The walk starts at the origin of `hash` and stops at the first empty
    // slot, or after returning to the origin.
    #[inline]
    pub fn find(&self, hash: u64, eq: impl FnMut(&K) -> bool) -> Option<usize> {
        self.find_or_seek(hash, eq).ok()
    }

    // Walks the probe sequence of `hash` once, returning `Ok` with the index of
    // the key matching `eq`, or `Err` with the first empty slot of the walk.
    //
    // The key cannot be stored past an empty slot, so the first empty slot
    // both ends the lookup and is where a new key belongs.
    fn find_or_seek(
        &self,
        hash: u64,
        mut eq: impl FnMut(&K) -> bool,
    ) -> Result<usize, Option<usize>> {
        let Some(mut probe) = Probe::start(hash, self.step, self.capacity()) else {
            return Err(None);
        };

        loop {
            match &self.slots[probe.i] {
                // an empty slot terminates the cluster, the key cannot be further along
                Slot::Empty => return Err(Some(probe.i)),
                Slot::Occupied(key, _) if eq(key) => return Ok(probe.i),
                // the slot contained a different key, keep searching
                Slot::Occupied(..) => {}
            }

            if !probe.next() {
                // scanned the whole probe sequence without a match or a free slot
                return Err(None);
            }
        }
    }

    // Returns the entry at index `i`, if the slot is occupied.
    #[inline]
    pub fn get(&self, i: usize) -> Option<(&K, &V)> {
        match self.slots.get(i)? {
            Slot::Occupied(key, value) => Some((key, value)),
            Slot::Empty => None,
        }
    }

    // Returns a mutable reference to the value at index `i`, if the slot is occupied.
    #[inline]
    pub fn get_mut(&mut self, i: usize) -> Option<&mut V> {
        match self.slots.get_mut(i)? {
            Slot::Occupied(_, value) => Some(value),
            Slot::Empty => None,
        }
    }

    // Inserts a key-value pair, replacing the value of an equal key that is
    // already present.
    //
    // `eq` compares a stored key against the one being inserted. A full table
    // rejects every insert, including updates of keys it already holds. Fails
    // without modifying the table.
    pub fn insert(
        &mut self,
        hash: u64,
        key: K,
        value: V,
        eq: impl Fn(&K, &K) -> bool,
    ) -> Result<InsertResult<V>, Error> {
        if self.len == self.capacity() {
            log::debug!("insert into a full table ({} slots)", self.capacity());
            return Err(self.exhausted());
        }

        match self.find_or_seek(hash, |k| eq(k, &key)) {
            // the key is already present, update it in place
            Ok(i) => match &mut self.slots[i] {
                Slot::Occupied(_, current) => {
                    Ok(InsertResult::Replaced(mem::replace(current, value)))
                }
                Slot::Empty => unreachable!(),
            },
            Err(Some(i)) => {
                self.slots[i] = Slot::Occupied(key, value);
                self.len += 1;
                Ok(InsertResult::Inserted)
            }
            // the remaining free slots are outside of this key's probe sequence
            Err(None) => {
                log::debug!(
                    "no free slot reachable with {} of {} slots occupied",
                    self.len,
                    self.capacity()
                );
                Err(self.exhausted())
            }
        }
    }

    // Removes the entry for the key matching `eq`.
    //
    // Clearing a slot can disconnect entries further along the cluster from
    // their origin, so every occupied slot after the removed one, up to the
    // next empty slot, is taken out and placed again from its own origin
    // using `rehash`.
    pub fn remove(
        &mut self,
        hash: u64,
        eq: impl FnMut(&K) -> bool,
        rehash: impl Fn(&K) -> u64,
    ) -> Option<(K, V)> {
        let i = self.find(hash, eq)?;

        let removed = match mem::replace(&mut self.slots[i], Slot::Empty) {
            Slot::Occupied(key, value) => (key, value),
            Slot::Empty => return None,
        };
        self.len -= 1;

        let capacity = self.capacity();
        let mut j = (i + self.step) % capacity;
        let mut relocated = 0;

        // there is always at least one empty slot (the one just cleared, or
        // wherever the gap has since moved to), so this terminates
        while !self.slots[j].is_empty() {
            let slot = mem::replace(&mut self.slots[j], Slot::Empty);

            // the walk from the entry's origin reaches `j` at the latest,
            // since every slot on the way there was occupied before
            let target = slot
                .key()
                .and_then(|key| self.seek(rehash(key)))
                .unwrap_or(j);

            if target != j {
                relocated += 1;
            }

            self.slots[target] = slot;
            j = (j + self.step) % capacity;
        }

        log::trace!("removed slot {i}, relocated {relocated} entries");

        Some(removed)
    }

    // Removes every entry, keeping the capacity and stride.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = Slot::Empty;
        }

        self.len = 0;
    }

    // Returns an iterator over the occupied slots, in slot order.
    #[inline]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.len,
        }
    }

    // Returns the index of the first empty slot in the probe sequence of `hash`.
    fn seek(&self, hash: u64) -> Option<usize> {
        let mut probe = Probe::start(hash, self.step, self.capacity())?;

        loop {
            if self.slots[probe.i].is_empty() {
                return Some(probe.i);
            }

            if !probe.next() {
                return None;
            }
        }
    }

    #[inline]
    fn exhausted(&self) -> Error {
        Error::CapacityExhausted {
            capacity: self.capacity(),
        }
    }
}

impl<K: Clone, V: Clone> Clone for Table<K, V> {
    fn clone(&self) -> Self {
        Table {
            slots: self.slots.clone(),
            len: self.len,
            step: self.step,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Table<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("capacity", &self.capacity())
            .field("len", &self.len)
            .field("step", &self.step)
            .finish()
    }
}

// An iterator over the entries of a table.
pub struct Iter<'t, K, V> {
    slots: std::slice::Iter<'t, Slot<K, V>>,
    remaining: usize,
}

impl<'t, K, V> Iterator for Iter<'t, K, V> {
    type Item = (&'t K, &'t V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.slots.by_ref() {
            if let Slot::Occupied(key, value) = slot {
                self.remaining -= 1;
                return Some((key, value));
            }
        }

        None
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            slots: self.slots.clone(),
            remaining: self.remaining,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Keys hash to themselves.
    fn identity(key: &u64) -> u64 {
        *key
    }

    fn insert(table: &mut Table<u64, ()>, key: u64) -> Result<InsertResult<()>, Error> {
        table.insert(identity(&key), key, (), |a, b| a == b)
    }

    fn remove(table: &mut Table<u64, ()>, key: u64) -> Option<(u64, ())> {
        table.remove(identity(&key), |k| *k == key, identity)
    }

    fn position(table: &Table<u64, ()>, key: u64) -> Option<usize> {
        table.find(identity(&key), |k| *k == key)
    }

    fn assert_reachable(table: &Table<u64, ()>) {
        for (key, _) in table.iter() {
            assert!(position(table, *key).is_some(), "{key} is unreachable");
        }
    }

    #[test]
    fn colliding_keys_fill_the_cluster() {
        let mut table = Table::new(5, 1);
        for key in [0, 5, 10] {
            assert_eq!(insert(&mut table, key), Ok(InsertResult::Inserted));
        }

        assert_eq!(position(&table, 0), Some(0));
        assert_eq!(position(&table, 5), Some(1));
        assert_eq!(position(&table, 10), Some(2));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn remove_repairs_cluster() {
        let mut table = Table::new(5, 1);
        for key in [0, 5, 10] {
            insert(&mut table, key).unwrap();
        }

        assert_eq!(remove(&mut table, 0), Some((0, ())));
        assert_eq!(table.len(), 2);

        let b = position(&table, 5).unwrap();
        let c = position(&table, 10).unwrap();
        assert!(b <= 1);
        assert!(c <= 2);

        // the gap moved to the end of the cluster
        assert_eq!(position(&table, 5), Some(0));
        assert_eq!(position(&table, 10), Some(1));
        assert!(table.get(2).is_none());
    }

    #[test]
    fn remove_keeps_entries_at_their_origin() {
        let mut table = Table::new(7, 1);
        // 3 and 10 share origin 3, 4 lives at its own origin after them
        for key in [3, 10, 4] {
            insert(&mut table, key).unwrap();
        }
        assert_eq!(position(&table, 4), Some(5));

        remove(&mut table, 3).unwrap();

        assert_eq!(position(&table, 10), Some(3));
        assert_eq!(position(&table, 4), Some(4));
        assert_reachable(&table);
    }

    #[test]
    fn remove_wraps_around() {
        let mut table = Table::new(5, 1);
        for key in [4, 9, 14] {
            insert(&mut table, key).unwrap();
        }
        assert_eq!(position(&table, 9), Some(0));
        assert_eq!(position(&table, 14), Some(1));

        remove(&mut table, 4).unwrap();

        assert_eq!(position(&table, 9), Some(4));
        assert_eq!(position(&table, 14), Some(0));
        assert_reachable(&table);
    }

    #[test]
    fn remove_from_full_table() {
        let mut table = Table::new(4, 1);
        for key in [0, 4, 8, 1] {
            insert(&mut table, key).unwrap();
        }
        assert_eq!(table.len(), 4);

        remove(&mut table, 4).unwrap();

        assert_eq!(table.len(), 3);
        assert_reachable(&table);
        assert!(position(&table, 4).is_none());
    }

    #[test]
    fn strided_cluster_repair() {
        let mut table = Table::new(7, 3);
        // origin 1 for all three, probed at 1, 4, 0
        for key in [1, 8, 15] {
            insert(&mut table, key).unwrap();
        }
        assert_eq!(position(&table, 8), Some(4));
        assert_eq!(position(&table, 15), Some(0));

        remove(&mut table, 1).unwrap();

        assert_eq!(position(&table, 8), Some(1));
        assert_eq!(position(&table, 15), Some(4));
        assert_reachable(&table);
    }

    #[test]
    fn remove_missing() {
        let mut table = Table::new(5, 1);
        insert(&mut table, 1).unwrap();

        assert_eq!(remove(&mut table, 6), None);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn replace_does_not_grow() {
        let mut table: Table<u64, &str> = Table::new(2, 1);
        assert_eq!(table.insert(0, 7, "a", |a, b| a == b), Ok(InsertResult::Inserted));
        assert_eq!(
            table.insert(0, 7, "b", |a, b| a == b),
            Ok(InsertResult::Replaced("a"))
        );
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(0), Some((&7, &"b")));
    }

    #[test]
    fn replace_finds_key_past_colliding_entries() {
        let mut table: Table<u64, u32> = Table::new(4, 1);
        for key in [0, 4, 8] {
            table.insert(0, key, 0, |a, b| a == b).unwrap();
        }

        // the key sits at the end of the cluster, the free slot after it is not used
        assert_eq!(
            table.insert(0, 8, 1, |a, b| a == b),
            Ok(InsertResult::Replaced(0))
        );
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(2), Some((&8, &1)));
        assert!(table.get(3).is_none());
    }

    #[test]
    fn full_table_rejects_existing_keys() {
        let mut table: Table<u64, &str> = Table::new(1, 1);
        table.insert(0, 7, "a", |a, b| a == b).unwrap();

        assert_eq!(
            table.insert(0, 7, "b", |a, b| a == b),
            Err(Error::CapacityExhausted { capacity: 1 })
        );
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(0), Some((&7, &"a")));
    }

    #[test]
    fn full_table_rejects_new_keys() {
        let mut table = Table::new(2, 1);
        insert(&mut table, 0).unwrap();
        insert(&mut table, 1).unwrap();

        assert_eq!(
            insert(&mut table, 2),
            Err(Error::CapacityExhausted { capacity: 2 })
        );
        assert_eq!(table.len(), 2);
        // lookups of absent keys in a full table still terminate
        assert_eq!(position(&table, 2), None);
    }

    #[test]
    fn unreachable_slots_exhaust() {
        // step 2 over 4 slots only reaches the even or the odd slots
        let mut table = Table::new(4, 2);
        insert(&mut table, 0).unwrap();
        insert(&mut table, 2).unwrap();

        assert!(matches!(
            insert(&mut table, 4),
            Err(Error::CapacityExhausted { .. })
        ));
        assert_eq!(table.len(), 2);
        assert!(insert(&mut table, 1).is_ok());
    }

    #[test]
    fn zero_capacity() {
        let mut table = Table::new(0, 1);
        assert_eq!(
            insert(&mut table, 1),
            Err(Error::CapacityExhausted { capacity: 0 })
        );
        assert_eq!(position(&table, 1), None);
        assert_eq!(remove(&mut table, 1), None);
        assert_eq!(table.iter().count(), 0);
    }

    #[test]
    fn clear_keeps_shape() {
        let mut table = Table::new(3, 1);
        insert(&mut table, 1).unwrap();
        insert(&mut table, 2).unwrap();

        table.clear();

        assert_eq!(table.len(), 0);
        assert_eq!(table.capacity(), 3);
        assert_eq!(table.iter().len(), 0);
        assert!(insert(&mut table, 1).is_ok());
    }
}
