//! Incremental graph construction.

use super::{BinaryOperator, GraphDef, GraphNode, Input, NodeId, NodeKind, Rate, GRAPH_FORMAT_VERSION};

/// Appends nodes to a graph in evaluation order.
///
/// Each `add` returns an [`Input`] referring to the new node, so later nodes
/// can only reference earlier ones.
#[derive(Debug)]
pub struct GraphBuilder {
    name: String,
    nodes: Vec<GraphNode>,
}

impl GraphBuilder {
    /// Creates an empty builder for a graph called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: Vec::new(),
        }
    }

    /// Appends a node and returns a reference to its output.
    pub fn add(&mut self, rate: Rate, kind: NodeKind) -> Input {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(GraphNode { id, rate, kind });
        Input::Node(id)
    }

    /// Appends `a + b`.
    pub fn add_signals(&mut self, rate: Rate, a: Input, b: Input) -> Input {
        self.add(
            rate,
            NodeKind::BinaryOp {
                op: BinaryOperator::Add,
                a,
                b,
            },
        )
    }

    /// Appends `a * b`.
    pub fn mul(&mut self, rate: Rate, a: Input, b: Input) -> Input {
        self.add(
            rate,
            NodeKind::BinaryOp {
                op: BinaryOperator::Mul,
                a,
                b,
            },
        )
    }

    /// Appends `input * mul + add`.
    pub fn mul_add(&mut self, rate: Rate, input: Input, mul: Input, add: Input) -> Input {
        self.add(rate, NodeKind::MulAdd { input, mul, add })
    }

    /// Number of nodes added so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if no nodes have been added.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Finishes the graph.
    pub fn finish(self) -> GraphDef {
        GraphDef {
            format_version: GRAPH_FORMAT_VERSION,
            name: self.name,
            nodes: self.nodes,
        }
    }
}
