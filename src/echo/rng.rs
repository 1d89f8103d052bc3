//! Fast PRNG for trial simulation. Uses SplitMix64 for throughput and good statistical quality.
//! Deterministic: same seed produces the same sequence. Not cryptographically secure.

const SPLITMIX64_GOLDEN: u64 = 0x9e3779b97f4a7c15;
const SPLITMIX64_M1: u64 = 0xbf58476d1ce4e5b9;
const SPLITMIX64_M2: u64 = 0x94d049bb133111eb;

#[derive(Debug, Clone, Copy)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Independent stream for batch `index` of a run seeded with `seed`.
    /// The pair is mixed so neighbouring batches do not start on overlapping sequences.
    pub fn for_batch(seed: u64, index: u64) -> Self {
        let mut mixer = Self::new(seed ^ index.wrapping_mul(SPLITMIX64_M2));
        Self::new(mixer.next_u64())
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(SPLITMIX64_GOLDEN);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(SPLITMIX64_M1);
        z = (z ^ (z >> 27)).wrapping_mul(SPLITMIX64_M2);
        z ^ (z >> 31)
    }

    /// Uniform integer in `[0, bound)` using Lemire's widening multiply with rejection.
    /// `bound` must be non-zero.
    #[inline]
    pub fn below(&mut self, bound: u32) -> u32 {
        debug_assert!(bound > 0, "Rng::below called with zero bound");
        let bound = u64::from(bound);
        let threshold = (u32::MAX as u64 + 1 - bound) % bound;
        loop {
            let x = self.next_u64() >> 32;
            let m = x * bound;
            if (m & 0xffff_ffff) >= threshold {
                return (m >> 32) as u32;
            }
        }
    }
}
