//! Shared configurations and graph helpers for integration tests.

use deepnote_spec::graph::{GraphDef, GraphNode, Input, NodeKind};
use deepnote_spec::{Configuration, Variant};

/// Seed used by fixtures unless a test needs another.
pub const FIXTURE_SEED: u32 = 20_240_401;

/// Configuration with the default frequency bounds.
pub fn config(variant: Variant, num_voices: usize) -> Configuration {
    Configuration::for_variant(variant)
        .num_voices(num_voices)
        .freq_range(200.0, 400.0)
        .seed(FIXTURE_SEED)
}

/// Resolves an input to the node it refers to.
pub fn node<'a>(graph: &'a GraphDef, input: Input) -> Option<&'a GraphNode> {
    input.as_node().and_then(|id| graph.node(id))
}

/// Constant `level` of every `pan2` node, in graph order.
pub fn pan_levels(graph: &GraphDef) -> Vec<Option<f64>> {
    graph
        .nodes_named("pan2")
        .map(|n| match &n.kind {
            NodeKind::Pan2 { level, .. } => level.as_const(),
            _ => None,
        })
        .collect()
}

/// Channels of the graph's `out` node and its bus.
pub fn out_channels(graph: &GraphDef) -> Option<(u32, Vec<Input>)> {
    match &graph.out_node()?.kind {
        NodeKind::Out { bus, channels } => Some((*bus, channels.clone())),
        _ => None,
    }
}
