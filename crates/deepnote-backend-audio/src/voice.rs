//! Voice parameters and per-voice signal chains.

use deepnote_spec::graph::{GraphBuilder, Input, NodeKind, Rate};

use crate::drift::DriftSignal;
use crate::envelope::crossfade;
use crate::variant::VoiceFilter;

/// Everything that distinguishes one voice from another in a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Voice {
    /// Voice index in `[0, n)`.
    pub index: usize,
    /// Starting frequency in Hz.
    pub fundamental: f64,
    /// Drift on the starting frequency.
    pub drift: Option<DriftSignal>,
    /// Target pitch in Hz, present when the variant sweeps.
    pub target: Option<f64>,
    /// Drift on the target pitch.
    pub target_drift: Option<DriftSignal>,
    /// Constant output level.
    pub amplitude: f64,
    /// Stereo position in `[-0.5, 0.5)`.
    pub pan: f64,
}

impl Voice {
    /// Starting frequency with its drift noise at `noise`.
    pub fn initial_frequency(&self, noise: f64) -> f64 {
        self.fundamental + self.drift.map_or(0.0, |d| d.value(noise))
    }

    /// Target frequency with its drift noise at `noise`, or `None` when the
    /// voice does not sweep.
    pub fn target_frequency(&self, noise: f64) -> Option<f64> {
        self.target
            .map(|target| target + self.target_drift.map_or(0.0, |d| d.value(noise)))
    }

    /// Reference frequency for a sweep weight, with both drifts held at the
    /// given noise values.
    pub fn frequency_at(&self, weight: f64, drift_noise: f64, target_noise: f64) -> f64 {
        let initial = self.initial_frequency(drift_noise);
        match self.target_frequency(target_noise) {
            Some(target) => crossfade(initial, target, weight),
            None => initial,
        }
    }
}

/// Shared signals each voice chain reads.
#[derive(Debug, Clone, Copy)]
pub struct SweepSignals {
    /// Sweep weight, 0 to 1.
    pub sweep: Input,
    /// `1 - sweep`.
    pub inverse: Input,
}

/// Nodes of one built voice chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceChain {
    /// Instantaneous frequency.
    pub freq: Input,
    /// Oscillator output.
    pub oscillator: Input,
    /// Filter output, when the variant filters per voice.
    pub filter: Option<Input>,
    /// Panned stereo output.
    pub output: Input,
}

/// Builds voice chains into a graph.
pub struct VoiceGraphBuilder<'a> {
    builder: &'a mut GraphBuilder,
    sweep: Option<SweepSignals>,
    filter: Option<VoiceFilter>,
}

impl<'a> VoiceGraphBuilder<'a> {
    /// Creates a voice builder appending to `builder`.
    pub fn new(builder: &'a mut GraphBuilder) -> Self {
        Self {
            builder,
            sweep: None,
            filter: None,
        }
    }

    /// Crossfades every voice along `signals`.
    pub fn with_sweep(mut self, signals: Option<SweepSignals>) -> Self {
        self.sweep = signals;
        self
    }

    /// Filters every voice.
    pub fn with_filter(mut self, filter: Option<VoiceFilter>) -> Self {
        self.filter = filter;
        self
    }

    /// Appends the chain for `voice`: frequency, sawtooth, optional lowpass
    /// at a multiple of the frequency, then pan at the voice's amplitude.
    pub fn build(&mut self, voice: &Voice) -> VoiceChain {
        let freq = self.frequency(voice);
        let b = &mut *self.builder;

        let oscillator = b.add(Rate::Audio, NodeKind::Saw { freq });

        let filter = self.filter.map(|filter| {
            let cutoff = b.mul(Rate::Audio, freq, filter.cutoff_ratio.into());
            b.add(
                Rate::Audio,
                NodeKind::LowPass {
                    input: oscillator,
                    freq: cutoff,
                    rq: filter.rq.into(),
                },
            )
        });

        let output = b.add(
            Rate::Audio,
            NodeKind::Pan2 {
                input: filter.unwrap_or(oscillator),
                pos: voice.pan.into(),
                level: voice.amplitude.into(),
            },
        );

        VoiceChain {
            freq,
            oscillator,
            filter,
            output,
        }
    }

    fn frequency(&mut self, voice: &Voice) -> Input {
        let b = &mut *self.builder;

        let initial = match voice.drift {
            Some(drift) => {
                let wobble = drift.build(b);
                b.add_signals(drift.rate, voice.fundamental.into(), wobble)
            }
            None => voice.fundamental.into(),
        };

        let (signals, target) = match (self.sweep, voice.target) {
            (Some(signals), Some(target)) => (signals, target),
            _ => return initial,
        };

        let target = match voice.target_drift {
            Some(drift) => {
                let wobble = drift.build(b);
                b.add_signals(drift.rate, target.into(), wobble)
            }
            None => target.into(),
        };

        let from = b.mul(Rate::Audio, initial, signals.inverse);
        let to = b.mul(Rate::Audio, target, signals.sweep);
        b.add_signals(Rate::Audio, from, to)
    }
}
