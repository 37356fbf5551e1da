//! Random draws for the popularity and engagement terms
//!
//! The ranker only asks for uniform samples; production uses `rand`
//! generators, tests substitute scripted values.

use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

/// Source of uniform samples in `[low, high)`
pub trait RandomSource {
    fn uniform(&mut self, low: f64, high: f64) -> f64;
}

impl RandomSource for ThreadRng {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        self.gen_range(low..high)
    }
}

impl RandomSource for StdRng {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        self.gen_range(low..high)
    }
}

/// Generator for one request: seeded when `seed` is set, entropy otherwise
pub fn request_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
