//! Piecewise breakpoint envelopes.
//!
//! An envelope is a start level followed by segments, each with a target
//! level, a duration in seconds and a curve shape. The engine evaluates
//! envelopes at render time; [`EnvelopeSpec::level_at`] is a reference
//! evaluation used for inspection and tests.

use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};

/// Curve shape of one envelope segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveShape {
    /// Straight line.
    Linear,
    /// Exponential interpolation between levels.
    Exponential,
    /// Half-cosine S-curve.
    Sine,
    /// Quarter-sine, fast start when rising and slow finish when falling.
    Welch,
    /// Custom curvature; 0 is linear, positive bends late, negative bends early.
    Custom(f64),
}

impl CurveShape {
    /// Interpolates between `start` and `end` at `pos` in [0, 1].
    pub fn interpolate(&self, start: f64, end: f64, pos: f64) -> f64 {
        let pos = pos.clamp(0.0, 1.0);
        match *self {
            CurveShape::Linear => start + (end - start) * pos,
            CurveShape::Exponential => {
                // Undefined through or at zero; the engine clamps, we fall back to linear.
                if start <= 0.0 || end <= 0.0 {
                    start + (end - start) * pos
                } else {
                    start * (end / start).powf(pos)
                }
            }
            CurveShape::Sine => start + (end - start) * (0.5 - 0.5 * (PI * pos).cos()),
            CurveShape::Welch => {
                if start < end {
                    start + (end - start) * (FRAC_PI_2 * pos).sin()
                } else {
                    end - (end - start) * (FRAC_PI_2 - FRAC_PI_2 * pos).sin()
                }
            }
            CurveShape::Custom(curve) => {
                if curve.abs() < 1e-4 {
                    start + (end - start) * pos
                } else {
                    let denom = 1.0 - curve.exp();
                    start + (end - start) * (1.0 - (pos * curve).exp()) / denom
                }
            }
        }
    }
}

/// What the engine should do when an envelope completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoneAction {
    /// Hold the final level.
    #[default]
    None,
    /// Free the enclosing graph instance.
    FreeEnclosing,
}

/// A breakpoint envelope description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvelopeSpec {
    /// Breakpoint levels; one more than `times`.
    pub levels: Vec<f64>,
    /// Segment durations in seconds.
    pub times: Vec<f64>,
    /// Segment curve shapes; one per segment.
    pub curves: Vec<CurveShape>,
}

impl EnvelopeSpec {
    /// Starts an envelope at `level`.
    pub fn starting_at(level: f64) -> Self {
        Self {
            levels: vec![level],
            times: Vec::new(),
            curves: Vec::new(),
        }
    }

    /// Appends a segment moving to `level` over `time` seconds.
    pub fn segment(mut self, level: f64, time: f64, curve: CurveShape) -> Self {
        self.levels.push(level);
        self.times.push(time);
        self.curves.push(curve);
        self
    }

    /// Total duration in seconds.
    pub fn duration(&self) -> f64 {
        self.times.iter().sum()
    }

    /// Number of segments.
    pub fn segment_count(&self) -> usize {
        self.times.len()
    }

    /// Returns true if levels, times and curves agree in length and all
    /// durations are finite and non-negative.
    pub fn is_well_formed(&self) -> bool {
        !self.levels.is_empty()
            && self.levels.len() == self.times.len() + 1
            && self.curves.len() == self.times.len()
            && self.times.iter().all(|t| t.is_finite() && *t >= 0.0)
            && self.levels.iter().all(|l| l.is_finite())
    }

    /// First level.
    pub fn start_level(&self) -> f64 {
        self.levels.first().copied().unwrap_or(0.0)
    }

    /// Last level.
    pub fn end_level(&self) -> f64 {
        self.levels.last().copied().unwrap_or(0.0)
    }

    /// Reference evaluation at `seconds` from the envelope start.
    ///
    /// Before the start this is the first level, after the end the last.
    pub fn level_at(&self, seconds: f64) -> f64 {
        if seconds <= 0.0 || self.times.is_empty() {
            return self.start_level();
        }

        let mut elapsed = 0.0;
        for (i, &time) in self.times.iter().enumerate() {
            let start = self.levels[i];
            let end = self.levels[i + 1];
            if seconds < elapsed + time {
                let pos = if time > 0.0 { (seconds - elapsed) / time } else { 1.0 };
                return self.curves[i].interpolate(start, end, pos);
            }
            elapsed += time;
        }

        self.end_level()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_linear_ramp() {
        let env = EnvelopeSpec::starting_at(0.0).segment(1.0, 13.0, CurveShape::Linear);
        assert!(env.is_well_formed());
        assert!(approx(env.duration(), 13.0));
        assert!(approx(env.level_at(0.0), 0.0));
        assert!(approx(env.level_at(6.5), 0.5));
        assert!(approx(env.level_at(13.0), 1.0));
        assert!(approx(env.level_at(100.0), 1.0));
        assert!(approx(env.level_at(-1.0), 0.0));
    }

    #[test]
    fn test_custom_curve_hits_endpoints() {
        let shape = CurveShape::Custom(5.0);
        assert!(approx(shape.interpolate(0.1, 1.0, 0.0), 0.1));
        assert!(approx(shape.interpolate(0.1, 1.0, 1.0), 1.0));
        // positive curvature stays below the straight line
        assert!(shape.interpolate(0.0, 1.0, 0.5) < 0.5);
    }

    #[test]
    fn test_negative_curve_bends_early() {
        let shape = CurveShape::Custom(-4.0);
        assert!(shape.interpolate(1.0, 0.0, 0.5) < 0.5);
    }

    #[test]
    fn test_near_zero_custom_is_linear() {
        let shape = CurveShape::Custom(0.0);
        assert!(approx(shape.interpolate(0.0, 1.0, 0.25), 0.25));
    }

    #[test]
    fn test_exponential_from_zero_falls_back_to_linear() {
        let shape = CurveShape::Exponential;
        assert!(approx(shape.interpolate(0.0, 0.1, 0.5), 0.05));
        assert!(approx(shape.interpolate(0.1, 1.0, 0.5), 0.1f64.sqrt()));
    }

    #[test]
    fn test_welch_and_sine_endpoints() {
        for shape in [CurveShape::Welch, CurveShape::Sine] {
            assert!(approx(shape.interpolate(0.1, 1.0, 0.0), 0.1));
            assert!(approx(shape.interpolate(0.1, 1.0, 1.0), 1.0));
            assert!(approx(shape.interpolate(1.0, 0.0, 1.0), 0.0));
        }
    }

    #[test]
    fn test_multi_segment_breakpoints() {
        let env = EnvelopeSpec::starting_at(0.0)
            .segment(1.0, 3.0, CurveShape::Custom(2.0))
            .segment(1.0, 21.0, CurveShape::Linear)
            .segment(0.0, 3.0, CurveShape::Custom(-4.0));
        assert_eq!(env.segment_count(), 3);
        assert!(approx(env.duration(), 27.0));
        assert!(approx(env.level_at(3.0), 1.0));
        assert!(approx(env.level_at(15.0), 1.0));
        assert!(approx(env.level_at(27.0), 0.0));
    }

    #[test]
    fn test_malformed_envelope_detected() {
        let env = EnvelopeSpec {
            levels: vec![0.0, 1.0],
            times: vec![1.0, 2.0],
            curves: vec![CurveShape::Linear],
        };
        assert!(!env.is_well_formed());
    }

    #[test]
    fn test_curve_serde_shape() {
        let json = serde_json::to_string(&vec![CurveShape::Welch, CurveShape::Custom(2.5)]).unwrap();
        assert_eq!(json, r#"["welch",{"custom":2.5}]"#);
    }
}
