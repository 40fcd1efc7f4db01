//! Fundamental and final pitch generation.
//!
//! Fundamentals are the random starting frequencies of a run. Final pitches
//! are the fixed target chord: one pitch class (MIDI 14.5) stacked across six
//! octaves, with voices assigned to octave bands in index order.

use rand::Rng;

use crate::rng::rrand;

/// MIDI note every voice converges on, before octave transposition.
pub const TARGET_MIDI: f64 = 14.5;

/// Number of octave bands in the target chord.
pub const OCTAVE_BANDS: usize = 6;

/// Converts a (possibly fractional) MIDI note number to Hz.
pub fn midi_to_hz(midi: f64) -> f64 {
    440.0 * 2f64.powf((midi - 69.0) / 12.0)
}

/// Draws `n` fundamentals uniformly from `[min, max)`, sorted ascending.
///
/// Consumes exactly `n` draws from `rng`.
pub fn fundamentals<R: Rng + ?Sized>(rng: &mut R, n: usize, min: f64, max: f64) -> Vec<f64> {
    let mut freqs: Vec<f64> = (0..n).map(|_| rrand(rng, min, max)).collect();
    freqs.sort_by(|a, b| a.total_cmp(b));
    freqs
}

/// Octave band (0..=5) of voice `index` out of `n`.
///
/// Bands hold `n / 6` voices each. When `n` is not a multiple of six the
/// highest band absorbs the remainder, and when `n < 6` every voice gets its
/// own band starting from the lowest.
pub fn octave_band(index: usize, n: usize) -> usize {
    let band_size = (n / OCTAVE_BANDS).max(1);
    (index / band_size).min(OCTAVE_BANDS - 1)
}

/// Final target pitches for `n` voices, in Hz.
///
/// Deterministic; draws nothing from the run's random source.
pub fn final_pitches(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| midi_to_hz(12.0 * octave_band(i, n) as f64 + TARGET_MIDI))
        .collect()
}
