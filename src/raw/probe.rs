// A linear probe sequence over a fixed-length slot array.
//
// The sequence starts at the origin slot and advances by a constant stride
// modulo the table length. It makes at most one probe per slot: once the walk
// returns to the origin every reachable slot has been visited.
#[derive(Debug, Clone, Copy)]
pub struct Probe {
    // The current index in the probe sequence.
    pub i: usize,
    // The slot the sequence started at.
    origin: usize,
    // The distance between consecutive probes.
    step: usize,
    // The length of the table.
    modulus: usize,
}

impl Probe {
    // Initialize the probe sequence at the origin of `hash`.
    //
    // Returns `None` for a zero-length table, which has no origin.
    #[inline]
    pub fn start(hash: u64, step: usize, modulus: usize) -> Option<Probe> {
        let origin = origin(hash, modulus)?;

        Some(Probe {
            i: origin,
            origin,
            step,
            modulus,
        })
    }

    // Increment the probe sequence.
    //
    // Returns `false` once the sequence has wrapped back around to its origin.
    #[inline]
    pub fn next(&mut self) -> bool {
        self.i = (self.i + self.step) % self.modulus;
        self.i != self.origin
    }
}

// Reduces a full hash to a slot index.
#[inline]
pub fn origin(hash: u64, modulus: usize) -> Option<usize> {
    if modulus == 0 {
        return None;
    }

    Some((hash % modulus as u64) as usize)
}

// Returns the greatest common divisor of `a` and `b`.
pub fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        (a, b) = (b, a % b);
    }

    a
}
