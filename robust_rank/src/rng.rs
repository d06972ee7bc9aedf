// Seeded uniform generators for the null simulation.
//
// The generator state is always owned by the caller and passed explicitly, so
// that two runs with the same seed draw the same sequence.

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::config::{NullGenerator, RraError};

/// A stateful source of uniform draws.
pub trait UniformSource {
    /// Draws a value uniformly in `[lo, hi)`. Advances the state.
    fn uniform(&mut self, lo: f64, hi: f64) -> f64;
}

const MODULUS: u64 = 2147483647;
const MULTIPLIER: u64 = 48271;

/// The Park-Miller "minimal standard" Lehmer generator, with multiplier 48271.
///
/// Seeding it with `x` and drawing reproduces the first stream of the classic
/// multi-stream Lehmer library.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct LehmerRng {
    state: u64,
}

impl LehmerRng {
    /// The seed must be positive. Seeds larger than the modulus are reduced.
    pub fn seed(seed: u64) -> Result<LehmerRng, RraError> {
        let state = seed % MODULUS;
        if state == 0 {
            return Err(RraError::InvalidSeed(seed));
        }
        Ok(LehmerRng { state })
    }

    /// Advances the generator and returns a value in (0, 1).
    pub fn next_f64(&mut self) -> f64 {
        self.state = (self.state * MULTIPLIER) % MODULUS;
        self.state as f64 / MODULUS as f64
    }

    pub fn state(&self) -> u64 {
        self.state
    }
}

impl UniformSource for LehmerRng {
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

/// xoshiro256++, driven through the `rand` traits.
#[derive(Debug, Clone)]
pub struct XoshiroSource {
    rng: Xoshiro256PlusPlus,
}

impl XoshiroSource {
    pub fn seed(seed: u64) -> XoshiroSource {
        XoshiroSource {
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }
}

impl UniformSource for XoshiroSource {
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.rng.random::<f64>()
    }
}

/// Builds the generator selected in the options.
pub fn make_source(
    generator: NullGenerator,
    seed: u64,
) -> Result<Box<dyn UniformSource>, RraError> {
    match generator {
        NullGenerator::Lehmer => Ok(Box::new(LehmerRng::seed(seed)?)),
        NullGenerator::Xoshiro => Ok(Box::new(XoshiroSource::seed(seed))),
    }
}

impl<T: UniformSource + ?Sized> UniformSource for Box<T> {
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        (**self).uniform(lo, hi)
    }
}
