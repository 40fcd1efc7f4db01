//! Deterministic run-scoped RNG using PCG32.
//!
//! A single generator is created per run and threaded through every
//! generation call. Draws happen in a fixed order (fundamentals, drift seeds
//! in voice order, sweep envelope, pan positions in voice order) so a seed
//! reproduces a run exactly.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Creates a PCG32 RNG from a 32-bit seed.
///
/// The 32-bit seed is expanded to 64 bits by duplicating the value in both
/// halves, as required by PCG32's state initialization.
pub fn create_rng(seed: u32) -> Pcg32 {
    let seed64 = (seed as u64) | ((seed as u64) << 32);
    Pcg32::seed_from_u64(seed64)
}

/// Draws a float uniformly from `[min, max)`.
pub fn rrand<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    rng.gen::<f64>() * (max - min) + min
}

/// Draws a seed for an engine-side noise generator.
pub fn noise_seed<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    rng.gen()
}
