//! Random number generation for reproducible weight initialization.
//!
//! Layers take any `rand::Rng`; this module picks the concrete generator so
//! that a fixed seed always reproduces the same parameters.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Seeded `StdRng` when `seed` is given, entropy-seeded otherwise.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Overwrite `values` with samples from N(0, 1) scaled by `scale`.
pub fn fill_scaled_normal<R: Rng + ?Sized>(rng: &mut R, values: &mut [f32], scale: f32) {
    for value in values.iter_mut() {
        *value = rng.sample::<f32, _>(StandardNormal) * scale;
    }
}
