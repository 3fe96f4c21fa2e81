// Copyright (c) 2024 Mike Tsao

//! Provides the random-number generator behind shuffling and progression
//! generation.

use byteorder::{BigEndian, ByteOrder};
use delegate::delegate;

/// A pseudorandom number generator (PRNG). Nothing here needs
/// cryptographically secure numbers, but tests do need to replay a sequence,
/// so every [Rng] can be rebuilt from its seed.
#[derive(Debug)]
pub struct Rng(oorandom::Rand64);
impl Default for Rng {
    fn default() -> Self {
        let seed = Self::generate_seed().unwrap_or_else(|e| {
            log::warn!("Couldn't get a random seed from the OS ({e}); using a fixed one");
            0x5eed
        });
        Self::new_with_seed(seed)
    }
}
impl Rng {
    /// Pass the same number to [Rng::new_with_seed()] to get the same stream
    /// back again. Good for reproducing test failures.
    pub fn new_with_seed(seed: u128) -> Self {
        Self(oorandom::Rand64::new(seed))
    }

    /// Create a sufficiently high-quality random number that's suitable for
    /// [Rng].
    pub fn generate_seed() -> anyhow::Result<u128> {
        let mut bytes = [0u8; 16];

        getrandom::getrandom(&mut bytes)?;
        Ok(BigEndian::read_u128(&bytes))
    }

    delegate! {
        to self.0 {
            #[allow(missing_docs)]
            pub fn rand_u64(&mut self) -> u64;
            #[allow(missing_docs)]
            pub fn rand_range(&mut self, range: core::ops::Range<u64>) -> u64;
        }
    }

    /// Returns a uniformly chosen index below `len`, or [None] if `len` is
    /// zero.
    pub fn choose_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            None
        } else {
            Some(self.rand_range(0..len as u64) as usize)
        }
    }

    /// Fisher-Yates shuffle in place.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.rand_range(0..(i as u64 + 1)) as usize;
            items.swap(i, j);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mainline() {
        let mut r = Rng::default();
        assert_ne!(r.rand_u64(), r.rand_u64());
    }

    #[test]
    fn reproducible_stream() {
        let mut r1 = Rng::new_with_seed(1);
        let mut r2 = Rng::new_with_seed(2);
        assert!(
            (0..100).any(|_| r1.rand_u64() != r2.rand_u64()),
            "RNGs with different seeds should produce different streams"
        );

        let mut r1 = Rng::new_with_seed(1);
        let mut r2 = Rng::new_with_seed(1);
        assert!(
            (0..100).all(|_| r1.rand_u64() == r2.rand_u64()),
            "RNGs with same seeds should produce same streams."
        );
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut r = Rng::new_with_seed(42);
        let mut items: Vec<usize> = (0..32).collect();
        r.shuffle(&mut items);
        assert_ne!(items, (0..32).collect::<Vec<_>>(), "32! says this moved");
        items.sort();
        assert_eq!(items, (0..32).collect::<Vec<_>>());

        let mut empty: Vec<usize> = Vec::default();
        r.shuffle(&mut empty);
        let mut one = vec![7];
        r.shuffle(&mut one);
        assert_eq!(one, vec![7]);
    }

    #[test]
    fn choose_index_stays_in_bounds() {
        let mut r = Rng::new_with_seed(3);
        assert_eq!(r.choose_index(0), None);
        assert!((0..100).all(|_| r.choose_index(5).is_some_and(|i| i < 5)));
    }
}
