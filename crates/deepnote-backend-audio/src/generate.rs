//! Main entry point for graph generation.
//!
//! Takes a configuration and a seed and produces a graph description
//! deterministically.

use deepnote_spec::graph::{DoneAction, EnvelopeSpec, GraphBuilder, GraphDef, NodeKind, Rate};
use deepnote_spec::{canonical_graph_hash, validate_config, Configuration, Variant};
use tracing::debug;

use crate::drift::DriftSignal;
use crate::error::{GraphError, GraphResult};
use crate::frequency::{final_pitches, fundamentals};
use crate::mix::{MixBuilder, MixOutput};
use crate::rng::{create_rng, rrand};
use crate::variant::{profile, Ordering, VariantProfile};
use crate::voice::{SweepSignals, Voice, VoiceChain, VoiceGraphBuilder};

/// Pan positions are drawn from `[-PAN_WIDTH, PAN_WIDTH)`.
pub const PAN_WIDTH: f64 = 0.5;

/// Result of graph generation.
#[derive(Debug, Clone)]
pub struct GenerateResult {
    /// The generated graph, named after the variant.
    pub graph: GraphDef,
    /// Canonical BLAKE3 hash of `graph`.
    pub hash: String,
    /// Variant that was built.
    pub variant: Variant,
    /// Seed the run was generated from.
    pub seed: u32,
    /// Per-voice parameters, in index order.
    pub voices: Vec<Voice>,
    /// Per-voice chain nodes, in index order.
    pub chains: Vec<VoiceChain>,
    /// Sweep envelope, for variants that converge.
    pub sweep: Option<EnvelopeSpec>,
    /// Mix and master stage nodes.
    pub mix: MixOutput,
}

/// Generates the graph for a configuration.
///
/// The configuration is validated first; any validation error aborts the
/// run before a random draw is made.
///
/// # Arguments
/// * `config` - Voice count, frequency bounds and variant
/// * `seed` - Seed for the run-scoped random source
pub fn generate(config: &Configuration, seed: u32) -> GraphResult<GenerateResult> {
    validate_config(config)
        .into_result()
        .map_err(GraphError::InvalidConfig)?;

    let variant = config
        .parse_variant()
        .map_err(|e| GraphError::InvalidConfig(vec![e]))?;

    generate_from_profile(
        profile(variant),
        config.num_voices,
        config.freq_min,
        config.freq_max,
        seed,
    )
}

/// Generates a graph from a variant profile directly.
///
/// Random draws happen in a fixed order: fundamentals, drift seeds in voice
/// order (starting drift before target drift), sweep envelope, then pan
/// positions in voice order.
pub fn generate_from_profile(
    profile: &VariantProfile,
    num_voices: usize,
    freq_min: f64,
    freq_max: f64,
    seed: u32,
) -> GraphResult<GenerateResult> {
    check_params(num_voices, freq_min, freq_max)?;

    let n = num_voices;
    let variant = profile.variant;
    debug!(variant = %variant, voices = n, seed, "generating graph");

    let mut rng = create_rng(seed);

    let mut fundamentals = fundamentals(&mut rng, n, freq_min, freq_max);
    if profile.ordering == Ordering::Reversed {
        fundamentals.reverse();
    }

    let mut drifts: Vec<(Option<DriftSignal>, Option<DriftSignal>)> = Vec::with_capacity(n);
    for i in 0..n {
        let drift = profile.voice_drift.map(|p| p.signal(&mut rng, i, n));
        let target_drift = profile.target_drift.map(|p| p.signal(&mut rng, i, n));
        drifts.push((drift, target_drift));
    }

    let targets = profile.sweep.map(|_| final_pitches(n));
    let sweep = profile.sweep.map(|shape| shape.build(&mut rng));
    debug!(
        sweep_seconds = sweep.as_ref().map(EnvelopeSpec::duration),
        "built sweep envelope"
    );

    let voices: Vec<Voice> = fundamentals
        .into_iter()
        .zip(drifts)
        .enumerate()
        .map(|(index, (fundamental, (drift, target_drift)))| Voice {
            index,
            fundamental,
            drift,
            target: targets.as_ref().map(|t| t[index]),
            target_drift,
            amplitude: profile.amplitude.amplitude(index, n),
            pan: rrand(&mut rng, -PAN_WIDTH, PAN_WIDTH),
        })
        .collect();

    let mut builder = GraphBuilder::new(variant.as_str());

    let signals = sweep.as_ref().map(|envelope| {
        let sweep = builder.add(
            Rate::Control,
            NodeKind::Envelope {
                envelope: envelope.clone(),
                done: DoneAction::None,
            },
        );
        let inverse = builder.mul_add(Rate::Control, sweep, (-1.0).into(), 1.0.into());
        SweepSignals { sweep, inverse }
    });

    let chains: Vec<VoiceChain> = {
        let mut voice_builder = VoiceGraphBuilder::new(&mut builder)
            .with_sweep(signals)
            .with_filter(profile.filter);
        voices.iter().map(|v| voice_builder.build(v)).collect()
    };

    let outputs = chains.iter().map(|c| c.output).collect();
    let mix = MixBuilder::new(&mut builder, profile.master).build(outputs);

    let graph = builder.finish();
    let hash = canonical_graph_hash(&graph)?;
    debug!(nodes = graph.nodes.len(), hash = %hash, "generated graph");

    Ok(GenerateResult {
        graph,
        hash,
        variant,
        seed,
        voices,
        chains,
        sweep,
        mix,
    })
}

fn check_params(num_voices: usize, freq_min: f64, freq_max: f64) -> GraphResult<()> {
    if num_voices == 0 {
        return Err(GraphError::invalid_param("num_voices", "must be at least 1"));
    }
    if !freq_min.is_finite() || !freq_max.is_finite() {
        return Err(GraphError::invalid_param(
            "freq_min",
            format!("bounds must be finite, got [{}, {})", freq_min, freq_max),
        ));
    }
    if freq_min >= freq_max {
        return Err(GraphError::invalid_param(
            "freq_max",
            format!("must exceed freq_min ({}), got {}", freq_min, freq_max),
        ));
    }
    Ok(())
}
