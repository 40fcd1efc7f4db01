//! Envelope construction.
//!
//! Three envelope kinds are used: the sweep that crossfades each voice from
//! its starting frequency to its target, the outer envelope that opens the
//! master filter, and the amplitude envelope whose completion frees the graph.

use deepnote_spec::graph::{CurveShape, EnvelopeSpec};
use rand::Rng;

use crate::rng::rrand;

/// A `[min, max)` range for a randomized envelope parameter.
pub type Span = (f64, f64);

/// Shape of the sweep envelope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SweepShape {
    /// Straight line from 0 to 1.
    Linear {
        /// Total duration in seconds.
        time: f64,
    },
    /// 0 to `knee` to 1 with custom curvature per segment.
    Curved {
        /// Intermediate level.
        knee: f64,
        /// Segment durations in seconds.
        times: [f64; 2],
        /// Segment curvatures.
        curves: [f64; 2],
    },
    /// [`SweepShape::Curved`] with every parameter drawn per run.
    Randomized {
        /// Range of the intermediate level.
        knee: Span,
        /// Ranges of the segment durations.
        times: [Span; 2],
        /// Ranges of the segment curvatures.
        curves: [Span; 2],
    },
}

impl SweepShape {
    /// Builds the sweep envelope.
    ///
    /// Only [`SweepShape::Randomized`] draws from `rng`, in the order knee,
    /// first time, second time, first curve, second curve.
    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> EnvelopeSpec {
        match *self {
            SweepShape::Linear { time } => {
                EnvelopeSpec::starting_at(0.0).segment(1.0, time, CurveShape::Linear)
            }
            SweepShape::Curved {
                knee,
                times,
                curves,
            } => curved_sweep(knee, times, curves),
            SweepShape::Randomized {
                knee,
                times,
                curves,
            } => {
                let knee = rrand(rng, knee.0, knee.1);
                let times = [
                    rrand(rng, times[0].0, times[0].1),
                    rrand(rng, times[1].0, times[1].1),
                ];
                let curves = [
                    rrand(rng, curves[0].0, curves[0].1),
                    rrand(rng, curves[1].0, curves[1].1),
                ];
                curved_sweep(knee, times, curves)
            }
        }
    }
}

fn curved_sweep(knee: f64, times: [f64; 2], curves: [f64; 2]) -> EnvelopeSpec {
    EnvelopeSpec::starting_at(0.0)
        .segment(knee, times[0], CurveShape::Custom(curves[0]))
        .segment(1.0, times[1], CurveShape::Custom(curves[1]))
}

/// Master filter envelope: 0 to 0.1 over 8 s (exponential), then to 1 over
/// 4 s (welch).
pub fn outer_envelope() -> EnvelopeSpec {
    EnvelopeSpec::starting_at(0.0)
        .segment(0.1, 8.0, CurveShape::Exponential)
        .segment(1.0, 4.0, CurveShape::Welch)
}

/// Master amplitude envelope: 3 s attack, 21 s sustain, 3 s release.
pub fn amplitude_envelope() -> EnvelopeSpec {
    EnvelopeSpec::starting_at(0.0)
        .segment(1.0, 3.0, CurveShape::Custom(2.0))
        .segment(1.0, 21.0, CurveShape::Linear)
        .segment(0.0, 3.0, CurveShape::Custom(-4.0))
}

/// Linear crossfade between `initial` and `target` by `weight`.
///
/// This is the frequency composition every sweeping voice uses.
pub fn crossfade(initial: f64, target: f64, weight: f64) -> f64 {
    initial * (1.0 - weight) + target * weight
}
