//! A simple pseudorandom number generator.
//!
//! Specifically, the minimal C PCG32 generator from <https://www.pcg-random.org/>, written against the [RngCore] and [SeedableRng] traits.
//!
//! The SAT core of the bundled oracle uses the generator to break ties when freely choosing the value of an atom, and when making a random decision.
//! A fixed seed is used, so solves are deterministic.

use rand::SeedableRng;
use rand_core::{impls, RngCore};

/// State and increment of the generator.
#[derive(Default)]
pub struct MinimalPCG32 {
    state: u64,
    increment: u64,
}

impl MinimalPCG32 {
    const MULTIPLIER: u64 = 6364136223846793005;

    /// Any odd increment gives a full period.
    const INCREMENT: u64 = 1442695040888963407;
}

impl RngCore for MinimalPCG32 {
    fn next_u32(&mut self) -> u32 {
        let previous = self.state;

        self.state = previous
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(self.increment | 1);

        let shifted = (((previous >> 18) ^ previous) >> 27) as u32;
        let rotation = (previous >> 59) as u32;
        shifted.rotate_right(rotation)
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_u32(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest)
    }
}

impl SeedableRng for MinimalPCG32 {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        let mut rng = Self {
            state: 0,
            increment: Self::INCREMENT,
        };
        rng.next_u32();
        rng.state = rng.state.wrapping_add(u64::from_le_bytes(seed));
        rng.next_u32();
        rng
    }
}
