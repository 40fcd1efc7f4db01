//! Variant identifiers.

use serde::{Deserialize, Serialize};

/// The six deep note variants, each adding to the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Variant {
    /// Bare panned sawtooth oscillators at random fundamentals.
    #[serde(rename = "THX1")]
    Thx1,
    /// Per-voice frequency drift and a resonant lowpass per voice.
    #[serde(rename = "THX2")]
    Thx2,
    /// Pitch-convergence sweep toward the six-octave target chord.
    #[serde(rename = "THX3")]
    Thx3,
    /// Drift on the final pitch and a curved sweep envelope.
    #[serde(rename = "THX4")]
    Thx4,
    /// Master filter with a cutoff envelope and randomized sweep timing.
    #[serde(rename = "THX5")]
    Thx5,
    /// Reversed fundamentals, inverted drift, limiter and amplitude envelope.
    #[serde(rename = "THX6")]
    Thx6,
}

impl Variant {
    /// Returns the literal variant name, e.g. `"THX3"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Thx1 => "THX1",
            Variant::Thx2 => "THX2",
            Variant::Thx3 => "THX3",
            Variant::Thx4 => "THX4",
            Variant::Thx5 => "THX5",
            Variant::Thx6 => "THX6",
        }
    }

    /// One-line summary of what this variant adds over the previous one.
    pub fn adds(&self) -> &'static str {
        match self {
            Variant::Thx1 => "bare panned sawtooth oscillators, random fundamentals, no convergence",
            Variant::Thx2 => "per-voice frequency drift; resonant lowpass per voice",
            Variant::Thx3 => "pitch-convergence sweep envelope toward 6-octave target chord",
            Variant::Thx4 => "drift on the final pitch too; curved (non-linear) sweep envelope",
            Variant::Thx5 => "master filter + cutoff envelope; per-run randomized envelope timing/curvature",
            Variant::Thx6 => "reversed fundamental ordering with inverted drift scaling; master limiter + amplitude envelope with release-triggered graph teardown",
        }
    }

    /// Returns all variants in ascending order.
    pub fn all() -> &'static [Variant] {
        &[
            Variant::Thx1,
            Variant::Thx2,
            Variant::Thx3,
            Variant::Thx4,
            Variant::Thx5,
            Variant::Thx6,
        ]
    }
}

impl Default for Variant {
    fn default() -> Self {
        Variant::Thx6
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "THX1" => Ok(Variant::Thx1),
            "THX2" => Ok(Variant::Thx2),
            "THX3" => Ok(Variant::Thx3),
            "THX4" => Ok(Variant::Thx4),
            "THX5" => Ok(Variant::Thx5),
            "THX6" => Ok(Variant::Thx6),
            _ => Err(format!(
                "unknown variant: {} (expected one of THX1, THX2, THX3, THX4, THX5, THX6)",
                s
            )),
        }
    }
}
