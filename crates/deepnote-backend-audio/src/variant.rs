//! Variant strategy table.
//!
//! Each variant is a declarative composition of generation policies. The six
//! profiles are strictly additive: every entry differs from the previous one
//! only in the features that variant introduces.

use deepnote_spec::Variant;

use crate::drift::{DriftPolicy, DriftScaling};
use crate::envelope::SweepShape;

/// Order in which sorted fundamentals are assigned to voice indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ordering {
    /// Lowest fundamental on voice 0.
    Ascending,
    /// Highest fundamental on voice 0.
    Reversed,
}

/// Per-voice amplitude policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmplitudePolicy {
    /// `1 / n` for every voice.
    Normalized,
    /// `(1 - 1/(i+1)) + 1.5`, growing with index.
    Tapered,
}

impl AmplitudePolicy {
    /// Amplitude of voice `index` out of `n`.
    pub fn amplitude(&self, index: usize, n: usize) -> f64 {
        match self {
            AmplitudePolicy::Normalized => 1.0 / n as f64,
            AmplitudePolicy::Tapered => (1.0 - 1.0 / (index + 1) as f64) + 1.5,
        }
    }
}

/// Resonant lowpass that tracks a voice's frequency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceFilter {
    /// Cutoff as a multiple of the voice frequency.
    pub cutoff_ratio: f64,
    /// Reciprocal of Q.
    pub rq: f64,
}

/// Master lowpass swept by the outer envelope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MasterFilter {
    /// Cutoff when the outer envelope is at 0, in Hz.
    pub floor_hz: f64,
    /// Cutoff added when the outer envelope is at 1, in Hz.
    pub span_hz: f64,
    /// Reciprocal of Q.
    pub rq: f64,
}

/// Final limiter and amplitude envelope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MasterDynamics {
    /// Offset added to the outer envelope before it scales the signal.
    pub outer_offset: f64,
    /// Limiter ceiling.
    pub limit: f64,
    /// Limiter lookahead in seconds.
    pub lookahead: f64,
}

/// Master stage applied after summing the voices.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MasterStage {
    /// Master lowpass; when present the output is duplicated to two channels.
    pub filter: Option<MasterFilter>,
    /// Limiter and amplitude envelope, applied after the filter.
    pub dynamics: Option<MasterDynamics>,
}

/// Complete recipe for one variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariantProfile {
    /// Variant this profile builds.
    pub variant: Variant,
    /// Fundamental ordering.
    pub ordering: Ordering,
    /// Drift on the starting frequency.
    pub voice_drift: Option<DriftPolicy>,
    /// Drift on the target pitch.
    pub target_drift: Option<DriftPolicy>,
    /// Sweep toward the target chord. Without it voices stay on their
    /// starting frequency.
    pub sweep: Option<SweepShape>,
    /// Per-voice lowpass.
    pub filter: Option<VoiceFilter>,
    /// Per-voice amplitude.
    pub amplitude: AmplitudePolicy,
    /// Master stage.
    pub master: MasterStage,
}

const MASTER_FILTER: MasterFilter = MasterFilter {
    floor_hz: 2000.0,
    span_hz: 18000.0,
    rq: 0.5,
};

const THX1: VariantProfile = VariantProfile {
    variant: Variant::Thx1,
    ordering: Ordering::Ascending,
    voice_drift: None,
    target_drift: None,
    sweep: None,
    filter: None,
    amplitude: AmplitudePolicy::Normalized,
    master: MasterStage {
        filter: None,
        dynamics: None,
    },
};

const THX2: VariantProfile = VariantProfile {
    variant: Variant::Thx2,
    voice_drift: Some(DriftPolicy::voice(DriftScaling::Ascending { k: 3.0 })),
    filter: Some(VoiceFilter {
        cutoff_ratio: 5.0,
        rq: 0.5,
    }),
    ..THX1
};

const THX3: VariantProfile = VariantProfile {
    variant: Variant::Thx3,
    sweep: Some(SweepShape::Linear { time: 13.0 }),
    ..THX2
};

const THX4: VariantProfile = VariantProfile {
    variant: Variant::Thx4,
    target_drift: Some(DriftPolicy::target(4.0)),
    sweep: Some(SweepShape::Curved {
        knee: 0.1,
        times: [5.0, 8.0],
        curves: [2.0, 5.0],
    }),
    filter: Some(VoiceFilter {
        cutoff_ratio: 8.0,
        rq: 0.5,
    }),
    ..THX3
};

const THX5: VariantProfile = VariantProfile {
    variant: Variant::Thx5,
    sweep: Some(SweepShape::Randomized {
        knee: (0.1, 0.2),
        times: [(5.0, 6.0), (8.0, 9.0)],
        curves: [(2.0, 3.0), (4.0, 5.0)],
    }),
    master: MasterStage {
        filter: Some(MASTER_FILTER),
        dynamics: None,
    },
    ..THX4
};

const THX6: VariantProfile = VariantProfile {
    variant: Variant::Thx6,
    ordering: Ordering::Reversed,
    voice_drift: Some(DriftPolicy::voice(DriftScaling::Descending { k: 6.0 })),
    target_drift: Some(DriftPolicy::target(3.0)),
    sweep: Some(SweepShape::Randomized {
        knee: (0.1, 0.2),
        times: [(5.5, 6.0), (8.5, 9.0)],
        curves: [(2.0, 3.0), (4.0, 5.0)],
    }),
    filter: Some(VoiceFilter {
        cutoff_ratio: 6.0,
        rq: 0.6,
    }),
    amplitude: AmplitudePolicy::Tapered,
    master: MasterStage {
        filter: Some(MASTER_FILTER),
        dynamics: Some(MasterDynamics {
            outer_offset: 2.0,
            limit: 1.0,
            lookahead: 0.01,
        }),
    },
    ..THX5
};

/// Returns the generation profile for a variant.
pub fn profile(variant: Variant) -> &'static VariantProfile {
    match variant {
        Variant::Thx1 => &THX1,
        Variant::Thx2 => &THX2,
        Variant::Thx3 => &THX3,
        Variant::Thx4 => &THX4,
        Variant::Thx5 => &THX5,
        Variant::Thx6 => &THX6,
    }
}
