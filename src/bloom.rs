use std::collections::hash_map::RandomState;
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::marker::PhantomData;

const WORD: usize = u64::BITS as usize;

/// A bloom filter over a fixed number of bits.
///
/// Every value sets two bits, chosen by two independently seeded hashers.
/// [`contains`](BloomFilter::contains) may report values that were never
/// added, but never misses a value that was.
pub struct BloomFilter<T: ?Sized, S = RandomState> {
    bits: Box<[u64]>,
    len: usize,
    hashers: [S; 2],
    _t: PhantomData<fn(&T)>,
}

impl<T: ?Sized> BloomFilter<T> {
    /// Creates an empty filter of `len` bits.
    ///
    /// # Panics
    ///
    /// Panics if `len` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use linprobe::BloomFilter;
    ///
    /// let mut filter = BloomFilter::new(32);
    /// filter.add("hello");
    /// assert!(filter.contains("hello"));
    /// ```
    pub fn new(len: usize) -> BloomFilter<T> {
        BloomFilter::with_hashers(len, [RandomState::new(), RandomState::new()])
    }
}

impl<T: ?Sized, S> BloomFilter<T, S> {
    /// Creates an empty filter of `len` bits, probed by the two given hashers.
    ///
    /// The hashers should be seeded differently, otherwise both probes land on
    /// the same bit and the filter degrades to a single hash function.
    ///
    /// # Panics
    ///
    /// Panics if `len` is zero.
    pub fn with_hashers(len: usize, hashers: [S; 2]) -> BloomFilter<T, S> {
        assert!(len > 0, "bloom filter must have at least one bit");

        BloomFilter {
            bits: vec![0; len.div_ceil(WORD)].into_boxed_slice(),
            len,
            hashers,
            _t: PhantomData,
        }
    }

    /// Returns the number of bits in the filter.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if nothing has been added since creation or the last clear.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|word| *word == 0)
    }

    /// Resets every bit.
    pub fn clear(&mut self) {
        self.bits.fill(0);
    }
}

impl<T, S> BloomFilter<T, S>
where
    T: Hash + ?Sized,
    S: BuildHasher,
{
    /// Records `value` in the filter.
    pub fn add(&mut self, value: &T) {
        for bit in self.probes(value) {
            self.bits[bit / WORD] |= 1 << (bit % WORD);
        }
    }

    /// Returns `true` if `value` may have been added.
    pub fn contains(&self, value: &T) -> bool {
        self.probes(value)
            .into_iter()
            .all(|bit| self.bits[bit / WORD] & (1 << (bit % WORD)) != 0)
    }

    #[inline]
    fn probes(&self, value: &T) -> [usize; 2] {
        self.hashers
            .each_ref()
            .map(|hasher| (hasher.hash_one(value) % self.len as u64) as usize)
    }
}

impl<T: ?Sized, S> fmt::Debug for BloomFilter<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BloomFilter")
            .field("len", &self.len)
            .field("ones", &self.bits.iter().map(|w| w.count_ones()).sum::<u32>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::hash::{BuildHasherDefault, Hasher};

    // Hashes integers to themselves, offset by a per-hasher seed.
    struct Seeded(u64);

    impl BuildHasher for Seeded {
        type Hasher = SeededHasher;

        fn build_hasher(&self) -> SeededHasher {
            SeededHasher(self.0)
        }
    }

    #[derive(Default)]
    struct SeededHasher(u64);

    impl Hasher for SeededHasher {
        fn write(&mut self, _: &[u8]) {
            unimplemented!()
        }

        fn write_u32(&mut self, n: u32) {
            self.0 = self.0.wrapping_add(n as u64);
        }

        fn finish(&self) -> u64 {
            self.0
        }
    }

    #[test]
    fn no_false_negatives() {
        let mut filter = BloomFilter::new(100);
        for i in 0..50u32 {
            filter.add(&i);
        }

        for i in 0..50u32 {
            assert!(filter.contains(&i));
        }
    }

    #[test]
    fn independent_probes() {
        let mut filter = BloomFilter::with_hashers(16, [Seeded(0), Seeded(5)]);
        filter.add(&1u32);

        // bits 1 and 6 are set
        assert!(filter.contains(&1));
        // 6 probes bits 6 and 11, only one of them is set
        assert!(!filter.contains(&6));
        // 0 probes bits 0 and 5, neither is set
        assert!(!filter.contains(&0));
    }

    #[test]
    fn identical_hashers_collapse_to_one_probe() {
        let mut filter: BloomFilter<u32, BuildHasherDefault<SeededHasher>> =
            BloomFilter::with_hashers(8, Default::default());
        filter.add(&3);

        let ones: u32 = filter.bits.iter().map(|w| w.count_ones()).sum();
        assert_eq!(ones, 1);
    }

    #[test]
    fn bits_span_words() {
        let mut filter = BloomFilter::with_hashers(130, [Seeded(0), Seeded(64)]);
        filter.add(&65u32);

        assert!(filter.contains(&65));
        assert_eq!(filter.bits.len(), 3);
        // bits 65 and 129
        assert_eq!(filter.bits[0], 0);
        assert_eq!(filter.bits[1], 0b10);
        assert_eq!(filter.bits[2], 0b10);
    }

    #[test]
    fn clear_resets() {
        let mut filter = BloomFilter::new(10);
        assert!(filter.is_empty());
        filter.add("a");
        assert!(!filter.is_empty());
        filter.clear();
        assert!(filter.is_empty());
        assert!(!filter.contains("a"));
    }
}
