//! Engine-agnostic signal graph descriptions.
//!
//! A [`GraphDef`] is a flat arena of nodes. Every node input is either a
//! constant or a reference to an earlier node, so a well-formed graph is
//! acyclic by construction and can be realized by walking `nodes` in order.
//!
//! ```
//! use deepnote_spec::graph::{GraphBuilder, NodeKind, Rate};
//!
//! let mut b = GraphBuilder::new("SINGLE");
//! let saw = b.add(Rate::Audio, NodeKind::Saw { freq: 220.0.into() });
//! let out = b.add(Rate::Audio, NodeKind::Out { bus: 0, channels: vec![saw] });
//! let graph = b.finish();
//! assert_eq!(graph.nodes.len(), 2);
//! assert!(graph.validate_structure().is_ok());
//! # let _ = out;
//! ```

mod builder;
mod envelope;
pub mod probe;

pub use builder::GraphBuilder;
pub use envelope::{CurveShape, DoneAction, EnvelopeSpec};

use serde::{Deserialize, Serialize};

use crate::error::SpecError;

/// Current graph description format version.
pub const GRAPH_FORMAT_VERSION: u32 = 1;

/// Index of a node within its graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node input: a constant or another node's output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Input {
    /// Constant scalar.
    Const(f64),
    /// Output of an earlier node.
    Node(NodeId),
}

impl Input {
    /// Returns the constant value, if this input is a constant.
    pub fn as_const(&self) -> Option<f64> {
        match self {
            Input::Const(v) => Some(*v),
            Input::Node(_) => None,
        }
    }

    /// Returns the referenced node, if any.
    pub fn as_node(&self) -> Option<NodeId> {
        match self {
            Input::Const(_) => None,
            Input::Node(id) => Some(*id),
        }
    }
}

impl From<f64> for Input {
    fn from(value: f64) -> Self {
        Input::Const(value)
    }
}

impl From<NodeId> for Input {
    fn from(id: NodeId) -> Self {
        Input::Node(id)
    }
}

/// Calculation rate requested from the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rate {
    /// Audio rate.
    Audio,
    /// Control rate.
    Control,
}

/// Interpolation used by low-frequency noise sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseInterpolation {
    /// Step between random values.
    Step,
    /// Straight lines between random values.
    Linear,
    /// Quadratic interpolation between random values (smoothed random walk).
    Quadratic,
}

/// Two-input arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOperator {
    /// a + b
    Add,
    /// a * b
    Mul,
}

impl BinaryOperator {
    /// Applies the operator to two scalars.
    pub fn apply(&self, a: f64, b: f64) -> f64 {
        match self {
            BinaryOperator::Add => a + b,
            BinaryOperator::Mul => a * b,
        }
    }
}

/// Signal node kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    /// Band-limited sawtooth oscillator.
    Saw {
        /// Frequency in Hz.
        freq: Input,
    },
    /// Low-frequency noise in [-1, 1].
    LfNoise {
        /// Interpolation between random values.
        interpolation: NoiseInterpolation,
        /// Rate at which new random values are chosen, in Hz.
        freq: Input,
        /// Seed for the engine's noise generator.
        seed: u32,
    },
    /// Breakpoint envelope generator.
    Envelope {
        /// Envelope shape.
        envelope: EnvelopeSpec,
        /// Action on completion.
        #[serde(default)]
        done: DoneAction,
    },
    /// Resonant lowpass filter.
    LowPass {
        /// Signal to filter.
        input: Input,
        /// Cutoff frequency in Hz.
        freq: Input,
        /// Reciprocal of Q.
        rq: Input,
    },
    /// Equal-power stereo panner.
    Pan2 {
        /// Mono input.
        input: Input,
        /// Position in [-1, 1].
        pos: Input,
        /// Output level.
        level: Input,
    },
    /// Sum of inputs.
    Mix {
        /// Signals to sum.
        inputs: Vec<Input>,
    },
    /// Peak limiter.
    Limiter {
        /// Signal to limit.
        input: Input,
        /// Peak output level.
        level: Input,
        /// Lookahead in seconds.
        lookahead: f64,
    },
    /// Two-input arithmetic.
    BinaryOp {
        /// Operator.
        op: BinaryOperator,
        /// Left operand.
        a: Input,
        /// Right operand.
        b: Input,
    },
    /// `input * mul + add`.
    MulAdd {
        /// Signal.
        input: Input,
        /// Multiplier.
        mul: Input,
        /// Offset.
        add: Input,
    },
    /// Write channels to consecutive output buses starting at `bus`.
    Out {
        /// First output bus.
        bus: u32,
        /// Channels to write.
        channels: Vec<Input>,
    },
}

impl NodeKind {
    /// Short name of the node kind, matching the serialized `type` tag.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Saw { .. } => "saw",
            NodeKind::LfNoise { .. } => "lf_noise",
            NodeKind::Envelope { .. } => "envelope",
            NodeKind::LowPass { .. } => "low_pass",
            NodeKind::Pan2 { .. } => "pan2",
            NodeKind::Mix { .. } => "mix",
            NodeKind::Limiter { .. } => "limiter",
            NodeKind::BinaryOp { .. } => "binary_op",
            NodeKind::MulAdd { .. } => "mul_add",
            NodeKind::Out { .. } => "out",
        }
    }

    /// All inputs of this node, in declaration order.
    pub fn inputs(&self) -> Vec<Input> {
        match self {
            NodeKind::Saw { freq } => vec![*freq],
            NodeKind::LfNoise { freq, .. } => vec![*freq],
            NodeKind::Envelope { .. } => Vec::new(),
            NodeKind::LowPass { input, freq, rq } => vec![*input, *freq, *rq],
            NodeKind::Pan2 { input, pos, level } => vec![*input, *pos, *level],
            NodeKind::Mix { inputs } => inputs.clone(),
            NodeKind::Limiter { input, level, .. } => vec![*input, *level],
            NodeKind::BinaryOp { a, b, .. } => vec![*a, *b],
            NodeKind::MulAdd { input, mul, add } => vec![*input, *mul, *add],
            NodeKind::Out { channels, .. } => channels.clone(),
        }
    }
}

/// A node in a graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Node index; equals its position in [`GraphDef::nodes`].
    pub id: NodeId,
    /// Calculation rate.
    pub rate: Rate,
    /// What the node does.
    #[serde(flatten)]
    pub kind: NodeKind,
}

/// A named, immutable graph description handed to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GraphDef {
    /// Format version; must be [`GRAPH_FORMAT_VERSION`].
    pub format_version: u32,
    /// Graph name, e.g. `THX6`.
    pub name: String,
    /// Nodes in evaluation order.
    pub nodes: Vec<GraphNode>,
}

impl GraphDef {
    /// Parses a graph from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serializes the graph to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the graph to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Serializes the graph to a JSON value.
    pub fn to_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Looks up a node by id.
    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.nodes.get(id.0 as usize).filter(|n| n.id == id)
    }

    /// Iterates nodes whose kind has the given name.
    pub fn nodes_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a GraphNode> + 'a {
        self.nodes.iter().filter(move |n| n.kind.name() == name)
    }

    /// Counts nodes whose kind has the given name.
    pub fn count(&self, name: &str) -> usize {
        self.nodes_named(name).count()
    }

    /// Returns the single output node.
    pub fn out_node(&self) -> Option<&GraphNode> {
        self.nodes_named("out").next()
    }

    /// Checks that ids are dense, every reference points backwards, there is
    /// exactly one `out` node, and all envelopes are well formed.
    pub fn validate_structure(&self) -> Result<(), SpecError> {
        let malformed = |message: String| SpecError::MalformedGraph {
            name: self.name.clone(),
            message,
        };

        if self.format_version != GRAPH_FORMAT_VERSION {
            return Err(malformed(format!(
                "format_version must be {}, got {}",
                GRAPH_FORMAT_VERSION, self.format_version
            )));
        }

        for (index, node) in self.nodes.iter().enumerate() {
            if node.id.0 as usize != index {
                return Err(malformed(format!(
                    "node at position {} has id {}",
                    index, node.id
                )));
            }
            for input in node.kind.inputs() {
                if let Input::Node(target) = input {
                    if target >= node.id {
                        return Err(malformed(format!(
                            "node {} references {} which is not an earlier node",
                            node.id, target
                        )));
                    }
                }
            }
            if let NodeKind::Envelope { envelope, .. } = &node.kind {
                if !envelope.is_well_formed() {
                    return Err(malformed(format!("envelope {} is malformed", node.id)));
                }
            }
        }

        match self.count("out") {
            1 => Ok(()),
            n => Err(malformed(format!("expected exactly one out node, found {}", n))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tiny_graph() -> GraphDef {
        let mut b = GraphBuilder::new("TINY");
        let saw = b.add(Rate::Audio, NodeKind::Saw { freq: 110.0.into() });
        let pan = b.add(
            Rate::Audio,
            NodeKind::Pan2 {
                input: saw,
                pos: 0.25.into(),
                level: 0.5.into(),
            },
        );
        b.add(
            Rate::Audio,
            NodeKind::Out {
                bus: 0,
                channels: vec![pan],
            },
        );
        b.finish()
    }

    #[test]
    fn test_json_round_trip() {
        let graph = tiny_graph();
        let json = graph.to_json_pretty().unwrap();
        let parsed = GraphDef::from_json(&json).unwrap();
        assert_eq!(graph, parsed);
    }

    #[test]
    fn test_node_serialization_shape() {
        let graph = tiny_graph();
        let value = graph.to_value().unwrap();
        let pan = &value["nodes"][1];
        assert_eq!(pan["id"], 1);
        assert_eq!(pan["rate"], "audio");
        assert_eq!(pan["type"], "pan2");
        assert_eq!(pan["input"]["node"], 0);
        assert_eq!(pan["pos"]["const"], 0.25);
    }

    #[test]
    fn test_structure_ok() {
        assert!(tiny_graph().validate_structure().is_ok());
    }

    #[test]
    fn test_forward_reference_rejected() {
        let mut graph = tiny_graph();
        graph.nodes[0].kind = NodeKind::Saw {
            freq: Input::Node(NodeId(2)),
        };
        assert!(matches!(
            graph.validate_structure(),
            Err(SpecError::MalformedGraph { .. })
        ));
    }

    #[test]
    fn test_missing_out_rejected() {
        let mut graph = tiny_graph();
        graph.nodes.pop();
        let err = graph.validate_structure().unwrap_err();
        assert!(err.to_string().contains("exactly one out node"));
    }

    #[test]
    fn test_counts_and_lookup() {
        let graph = tiny_graph();
        assert_eq!(graph.count("saw"), 1);
        assert_eq!(graph.count("low_pass"), 0);
        assert_eq!(graph.node(NodeId(1)).unwrap().kind.name(), "pan2");
        assert!(graph.node(NodeId(9)).is_none());
        assert!(graph.out_node().is_some());
    }
}
