//! Explicit random generator handles.
//!
//! No function in the core touches a process wide generator. Every operation
//! that draws randomness receives a `Seeding`, which states whether it must
//! start a fresh deterministic stream, start an unpredictable one or keep
//! drawing from a stream owned by the caller.

use rand::{Rng, RngCore, SeedableRng, rngs::StdRng};

/// Entropy chosen seeds are drawn from `[0, MAX_ENTROPY_SEED)`.
pub const MAX_ENTROPY_SEED: u64 = (1 << 31) - 1;

const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

/// Chooses a fresh seed from operating system entropy.
///
/// # Returns
/// A seed that callers can log and record to reproduce the run.
pub fn entropy_seed() -> u64 {
    StdRng::from_os_rng().random_range(0..MAX_ENTROPY_SEED)
}

/// Derives the seed of an independent sub-stream.
///
/// The result only depends on `master` and `index`, never on the order in
/// which sub-streams are requested, so parallel consumers stay reproducible.
///
/// # Arguments
/// * `master` - The seed shared by every sub-stream of a computation.
/// * `index` - The sub-stream's index, e.g. a resample index.
pub fn derive_seed(master: u64, index: u64) -> u64 {
    // splitmix64 finalizer over a gamma spaced counter.
    let mut z = master.wrapping_add(GOLDEN_GAMMA.wrapping_mul(index.wrapping_add(1)));
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Creates the generator of sub-stream `index` under `master`.
pub fn substream(master: u64, index: u64) -> StdRng {
    StdRng::seed_from_u64(derive_seed(master, index))
}

/// A seeded random stream owned by the caller.
///
/// Its lifecycle is explicit: it is created seeded, advances with every draw
/// and only restarts when `reseed` is called.
#[derive(Debug, Clone)]
pub struct RandomSource {
    seed: u64,
    rng: StdRng,
}

impl RandomSource {
    /// Creates a new `RandomSource` deterministically seeded with `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Creates a new `RandomSource` seeded with an `entropy_seed`.
    pub fn from_entropy() -> Self {
        Self::new(entropy_seed())
    }

    /// Returns the seed this stream was last (re)started with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Restarts the stream from `seed`, discarding its current position.
    pub fn reseed(&mut self, seed: u64) {
        *self = Self::new(seed);
    }

    /// Draws a seed for a derived computation, advancing this stream.
    pub fn next_seed(&mut self) -> u64 {
        self.rng.next_u64()
    }

    /// Exposes the underlying generator.
    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

/// How an operation obtains its randomness.
#[derive(Debug)]
pub enum Seeding<'a> {
    /// Start a fresh stream deterministically initialized with this seed.
    Reseed(u64),
    /// Start a fresh stream from an `entropy_seed`.
    Entropy,
    /// Keep drawing from the caller's stream, advancing it.
    Continue(&'a mut RandomSource),
}

impl Seeding<'_> {
    /// Runs `f` on the generator selected by this seeding.
    ///
    /// # Arguments
    /// * `f` - A closure drawing values from the generator.
    pub(crate) fn with_rng<T>(self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        match self {
            Seeding::Reseed(seed) => f(&mut StdRng::seed_from_u64(seed)),
            Seeding::Entropy => f(&mut StdRng::seed_from_u64(entropy_seed())),
            Seeding::Continue(source) => f(source.rng_mut()),
        }
    }

    /// Resolves the master seed for a computation split into sub-streams.
    pub(crate) fn master_seed(self) -> u64 {
        match self {
            Seeding::Reseed(seed) => seed,
            Seeding::Entropy => entropy_seed(),
            Seeding::Continue(source) => source.next_seed(),
        }
    }
}

impl From<Option<u64>> for Seeding<'_> {
    fn from(value: Option<u64>) -> Self {
        match value {
            Some(seed) => Seeding::Reseed(seed),
            None => Seeding::Entropy,
        }
    }
}

impl<'a> From<&'a mut RandomSource> for Seeding<'a> {
    fn from(value: &'a mut RandomSource) -> Self {
        Seeding::Continue(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reseed_restarts_stream() {
        let mut source = RandomSource::new(7);
        let first = source.next_seed();
        let second = source.next_seed();
        assert_ne!(first, second);

        source.reseed(7);
        assert_eq!(source.next_seed(), first);
        assert_eq!(source.seed(), 7);
    }

    #[test]
    fn derived_seeds_are_stable_and_distinct() {
        assert_eq!(derive_seed(17, 3), derive_seed(17, 3));
        assert_ne!(derive_seed(17, 3), derive_seed(17, 4));
        assert_ne!(derive_seed(17, 3), derive_seed(18, 3));

        let a: u64 = substream(17, 0).random();
        let b: u64 = substream(17, 0).random();
        assert_eq!(a, b);
    }

    #[test]
    fn entropy_seed_in_range() {
        for _ in 0..32 {
            assert!(entropy_seed() < MAX_ENTROPY_SEED);
        }
    }

    #[test]
    fn entropy_source_is_replayable() {
        let mut source = RandomSource::from_entropy();
        assert!(source.seed() < MAX_ENTROPY_SEED);

        let drawn = source.next_seed();
        let mut replay = RandomSource::new(source.seed());
        assert_eq!(replay.next_seed(), drawn);
    }

    #[test]
    fn option_conversion() {
        assert!(matches!(Seeding::from(Some(3)), Seeding::Reseed(3)));
        assert!(matches!(Seeding::from(None), Seeding::Entropy));
    }

    #[test]
    fn continue_advances_source() {
        let mut source = RandomSource::new(1);
        let a = Seeding::Continue(&mut source).master_seed();
        let b = Seeding::Continue(&mut source).master_seed();
        assert_ne!(a, b);
    }
}
