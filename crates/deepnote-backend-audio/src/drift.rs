//! Per-voice frequency drift.
//!
//! A drift is quadratic low-frequency noise scaled by an index-dependent
//! amount. The noise itself runs inside the engine; generation only decides
//! its rate, its amount, and the seed it starts from.

use deepnote_spec::graph::{GraphBuilder, Input, NodeKind, NoiseInterpolation, Rate};
use rand::Rng;

use crate::rng::noise_seed;

/// How the drift amount scales with voice index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DriftScaling {
    /// `k * (i + 1)`: higher indices wobble more.
    Ascending { k: f64 },
    /// `k * (n - (i + 1))`: lower indices wobble more.
    Descending { k: f64 },
    /// `i / divisor`: used for the slow drift on target pitches.
    Fractional { divisor: f64 },
}

impl DriftScaling {
    /// Drift amount in Hz for voice `index` out of `n`.
    pub fn amount(&self, index: usize, n: usize) -> f64 {
        match *self {
            DriftScaling::Ascending { k } => k * (index + 1) as f64,
            DriftScaling::Descending { k } => k * n.saturating_sub(index + 1) as f64,
            DriftScaling::Fractional { divisor } => index as f64 / divisor,
        }
    }
}

/// A drift generator shared by every voice of a variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriftPolicy {
    /// Noise rate in Hz.
    pub rate_hz: f64,
    /// Engine rate of the noise node.
    pub rate: Rate,
    /// Amount scaling.
    pub scaling: DriftScaling,
}

impl DriftPolicy {
    /// Fast audio-rate drift on the starting frequency.
    pub const fn voice(scaling: DriftScaling) -> Self {
        Self {
            rate_hz: 0.5,
            rate: Rate::Audio,
            scaling,
        }
    }

    /// Slow control-rate drift on the target pitch.
    pub const fn target(divisor: f64) -> Self {
        Self {
            rate_hz: 0.1,
            rate: Rate::Control,
            scaling: DriftScaling::Fractional { divisor },
        }
    }

    /// Instantiates the drift for one voice, drawing its noise seed.
    pub fn signal<R: Rng + ?Sized>(&self, rng: &mut R, index: usize, n: usize) -> DriftSignal {
        DriftSignal {
            amount: self.scaling.amount(index, n),
            rate_hz: self.rate_hz,
            rate: self.rate,
            seed: noise_seed(rng),
        }
    }
}

/// Drift attached to a single voice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriftSignal {
    /// Peak deviation in Hz.
    pub amount: f64,
    /// Noise rate in Hz.
    pub rate_hz: f64,
    /// Engine rate of the noise node.
    pub rate: Rate,
    /// Noise seed.
    pub seed: u32,
}

impl DriftSignal {
    /// Appends `noise * amount` and returns its output.
    pub fn build(&self, b: &mut GraphBuilder) -> Input {
        let noise = b.add(
            self.rate,
            NodeKind::LfNoise {
                interpolation: NoiseInterpolation::Quadratic,
                freq: self.rate_hz.into(),
                seed: self.seed,
            },
        );
        b.mul(self.rate, noise, self.amount.into())
    }

    /// Value of the drift when its noise sits at `noise` (in [-1, 1]).
    pub fn value(&self, noise: f64) -> f64 {
        noise * self.amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::create_rng;
    use deepnote_spec::graph::probe::probe;

    #[test]
    fn test_ascending_scaling() {
        let scaling = DriftScaling::Ascending { k: 3.0 };
        let amounts: Vec<f64> = (0..4).map(|i| scaling.amount(i, 4)).collect();
        assert_eq!(amounts, vec![3.0, 6.0, 9.0, 12.0]);
    }

    #[test]
    fn test_descending_scaling_reaches_zero() {
        let scaling = DriftScaling::Descending { k: 6.0 };
        let amounts: Vec<f64> = (0..4).map(|i| scaling.amount(i, 4)).collect();
        assert_eq!(amounts, vec![18.0, 12.0, 6.0, 0.0]);
    }

    #[test]
    fn test_fractional_scaling() {
        let scaling = DriftScaling::Fractional { divisor: 4.0 };
        assert_eq!(scaling.amount(0, 10), 0.0);
        assert_eq!(scaling.amount(6, 10), 1.5);
    }

    #[test]
    fn test_signal_draws_one_seed() {
        let policy = DriftPolicy::voice(DriftScaling::Ascending { k: 3.0 });
        let mut a = create_rng(5);
        let mut b = create_rng(5);
        let signal = policy.signal(&mut a, 2, 8);
        assert_eq!(signal.seed, noise_seed(&mut b));
        assert_eq!(signal.amount, 9.0);
        assert_eq!(signal.rate, Rate::Audio);
        assert_eq!(noise_seed(&mut a), noise_seed(&mut b));
    }

    #[test]
    fn test_build_scales_noise() {
        let signal = DriftSignal {
            amount: 4.0,
            rate_hz: 0.1,
            rate: Rate::Control,
            seed: 11,
        };
        let mut b = GraphBuilder::new("DRIFT");
        let out = signal.build(&mut b);
        let graph = b.finish();
        assert_eq!(graph.count("lf_noise"), 1);
        assert_eq!(probe(&graph, out, 0.0, &|_| -0.5).unwrap(), signal.value(-0.5));
    }
}
