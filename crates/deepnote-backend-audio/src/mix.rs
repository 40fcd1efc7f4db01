//! Voice summation, master stage and output.

use deepnote_spec::graph::{DoneAction, GraphBuilder, Input, NodeKind, Rate};

use crate::envelope::{amplitude_envelope, outer_envelope};
use crate::variant::MasterStage;

/// Output bus every variant writes to.
pub const OUTPUT_BUS: u32 = 0;

/// Nodes created by [`MixBuilder::build`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixOutput {
    /// Sum of all voices.
    pub mix: Input,
    /// Outer envelope driving the master filter.
    pub outer: Option<Input>,
    /// Master filter output.
    pub filtered: Option<Input>,
    /// Limiter output.
    pub limited: Option<Input>,
    /// The output node.
    pub out: Input,
}

/// Sums voice outputs and applies the master stage.
pub struct MixBuilder<'a> {
    builder: &'a mut GraphBuilder,
    master: MasterStage,
}

impl<'a> MixBuilder<'a> {
    /// Creates a mix builder with the given master stage.
    pub fn new(builder: &'a mut GraphBuilder, master: MasterStage) -> Self {
        Self { builder, master }
    }

    /// Sums `voices` and writes the result to [`OUTPUT_BUS`].
    ///
    /// Without a master filter the mix is written as-is. With one, the
    /// filtered signal (optionally scaled by `(outer + offset) * amp` and
    /// limited) is duplicated to two channels.
    pub fn build(self, voices: Vec<Input>) -> MixOutput {
        let b = self.builder;
        let mix = b.add(Rate::Audio, NodeKind::Mix { inputs: voices });

        let Some(filter) = self.master.filter else {
            let out = b.add(
                Rate::Audio,
                NodeKind::Out {
                    bus: OUTPUT_BUS,
                    channels: vec![mix],
                },
            );
            return MixOutput {
                mix,
                outer: None,
                filtered: None,
                limited: None,
                out,
            };
        };

        let outer = b.add(
            Rate::Control,
            NodeKind::Envelope {
                envelope: outer_envelope(),
                done: DoneAction::None,
            },
        );
        let cutoff = b.mul_add(
            Rate::Control,
            outer,
            filter.span_hz.into(),
            filter.floor_hz.into(),
        );
        let filtered = b.add(
            Rate::Audio,
            NodeKind::LowPass {
                input: mix,
                freq: cutoff,
                rq: filter.rq.into(),
            },
        );

        let (signal, limited) = match self.master.dynamics {
            Some(dynamics) => {
                let amp_env = b.add(
                    Rate::Audio,
                    NodeKind::Envelope {
                        envelope: amplitude_envelope(),
                        done: DoneAction::FreeEnclosing,
                    },
                );
                let lifted = b.add_signals(Rate::Control, outer, dynamics.outer_offset.into());
                let amp = b.mul(Rate::Audio, lifted, amp_env);
                let scaled = b.mul(Rate::Audio, filtered, amp);
                let limited = b.add(
                    Rate::Audio,
                    NodeKind::Limiter {
                        input: scaled,
                        level: dynamics.limit.into(),
                        lookahead: dynamics.lookahead,
                    },
                );
                (limited, Some(limited))
            }
            None => (filtered, None),
        };

        let out = b.add(
            Rate::Audio,
            NodeKind::Out {
                bus: OUTPUT_BUS,
                channels: vec![signal, signal],
            },
        );

        MixOutput {
            mix,
            outer: Some(outer),
            filtered: Some(filtered),
            limited,
            out,
        }
    }
}
