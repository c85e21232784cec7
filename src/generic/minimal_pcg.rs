//! A simple pseudorandom number generator.
//!
//! Specifically, a translation of the *really* minimal C PCG32 implementation from <https://www.pcg-random.org/>.
//!
//! PCG(32) was chosen as the source of (pseudo)random numbers as it is simple, fast, and --- crucially for the determinism guarantees of the extractor --- entirely reproducible from a seed.
//! The random scheduling order draws from an instance of [MinimalPCG32] seeded with a fixed default, so two runs with identical configuration shuffle the groups identically.

use rand::SeedableRng;
use rand_core::{impls, Error, RngCore};

/// State and increment.
#[derive(Default)]
pub struct MinimalPCG32 {
    state: u64,
    inc: u64,
}

impl RngCore for MinimalPCG32 {
    fn next_u32(&mut self) -> u32 {
        let old_state = self.state;

        self.state = old_state
            .wrapping_mul(6364136223846793005_u64)
            .wrapping_add(self.inc);

        let xorshifted = ((old_state >> 18) ^ old_state) >> 27;
        let rot = (old_state >> 59) as u32;
        xorshifted.rotate_right(rot) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.next_u32() as u64
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for MinimalPCG32 {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        const INCREMENT: u64 = 6829111647563213867;
        Self {
            state: (u64::from_le_bytes(seed)).wrapping_add(INCREMENT),
            inc: INCREMENT,
        }
    }
}

#[cfg(test)]
mod pcg_tests {
    use super::*;

    #[test]
    fn reproducible() {
        let mut a = MinimalPCG32::from_seed(7u64.to_le_bytes());
        let mut b = MinimalPCG32::from_seed(7u64.to_le_bytes());
        for _ in 0..32 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn seed_sensitive() {
        let mut a = MinimalPCG32::from_seed(7u64.to_le_bytes());
        let mut b = MinimalPCG32::from_seed(8u64.to_le_bytes());
        let draws_a: Vec<u32> = (0..8).map(|_| a.next_u32()).collect();
        let draws_b: Vec<u32> = (0..8).map(|_| b.next_u32()).collect();
        assert_ne!(draws_a, draws_b);
    }
}
