//! Variants command implementation
//!
//! Lists the six variants and, optionally, what each one builds.

use anyhow::Result;
use colored::Colorize;
use deepnote_backend_audio::drift::DriftScaling;
use deepnote_backend_audio::envelope::SweepShape;
use deepnote_backend_audio::profile;
use deepnote_backend_audio::variant::{AmplitudePolicy, Ordering, VariantProfile};
use deepnote_spec::Variant;
use std::process::ExitCode;

/// Run the variants command
pub fn run(describe: bool) -> Result<ExitCode> {
    for &variant in Variant::all() {
        let marker = if variant == Variant::default() {
            " (default)".dimmed().to_string()
        } else {
            String::new()
        };
        println!("{}{}  {}", variant.as_str().cyan().bold(), marker, variant.adds());
        if describe {
            for line in describe_profile(profile(variant)) {
                println!("      {}", line);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Human-readable description of a variant profile, one fact per line.
pub fn describe_profile(p: &VariantProfile) -> Vec<String> {
    let mut lines = Vec::new();

    if p.ordering == Ordering::Reversed {
        lines.push("fundamentals: sorted, highest first".to_string());
    } else {
        lines.push("fundamentals: sorted, lowest first".to_string());
    }

    if let Some(drift) = p.voice_drift {
        lines.push(format!(
            "drift: {} Hz noise, {}",
            drift.rate_hz,
            describe_scaling(drift.scaling)
        ));
    }
    if let Some(drift) = p.target_drift {
        lines.push(format!(
            "target drift: {} Hz noise, {}",
            drift.rate_hz,
            describe_scaling(drift.scaling)
        ));
    }

    match p.sweep {
        Some(SweepShape::Linear { time }) => lines.push(format!("sweep: linear over {}s", time)),
        Some(SweepShape::Curved { knee, times, .. }) => lines.push(format!(
            "sweep: 0 -> {} -> 1 over {}s, curved",
            knee,
            times[0] + times[1]
        )),
        Some(SweepShape::Randomized { times, .. }) => lines.push(format!(
            "sweep: randomized per run, {}-{}s",
            times[0].0 + times[1].0,
            times[0].1 + times[1].1
        )),
        None => {}
    }

    if let Some(filter) = p.filter {
        lines.push(format!(
            "voice filter: lowpass at freq x {}, rq {}",
            filter.cutoff_ratio, filter.rq
        ));
    }

    lines.push(match p.amplitude {
        AmplitudePolicy::Normalized => "amplitude: 1/N".to_string(),
        AmplitudePolicy::Tapered => "amplitude: (1 - 1/(i+1)) + 1.5".to_string(),
    });

    if let Some(filter) = p.master.filter {
        lines.push(format!(
            "master filter: {}-{} Hz following the outer envelope",
            filter.floor_hz,
            filter.floor_hz + filter.span_hz
        ));
    }
    if let Some(dynamics) = p.master.dynamics {
        lines.push(format!(
            "master dynamics: amplitude envelope, limiter at {}, frees graph when done",
            dynamics.limit
        ));
    }

    lines
}

fn describe_scaling(scaling: DriftScaling) -> String {
    match scaling {
        DriftScaling::Ascending { k } => format!("{} x (i+1) Hz", k),
        DriftScaling::Descending { k } => format!("{} x (N-(i+1)) Hz", k),
        DriftScaling::Fractional { divisor } => format!("i/{} Hz", divisor),
    }
}
