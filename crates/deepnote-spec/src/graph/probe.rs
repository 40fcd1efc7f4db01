//! Point evaluation of control signals.
//!
//! Evaluates the arithmetic part of a graph at a moment in time: constants,
//! binary operators, multiply-adds and envelopes. Noise sources are held at
//! values supplied by the caller. Oscillators, filters, panners and other
//! audio processors cannot be probed.

use super::{GraphDef, Input, NodeId, NodeKind};
use crate::error::SpecError;

/// Evaluates `input` at `seconds` after graph start.
///
/// `noise` supplies the current value of each `lf_noise` node.
pub fn probe<F>(graph: &GraphDef, input: Input, seconds: f64, noise: &F) -> Result<f64, SpecError>
where
    F: Fn(NodeId) -> f64,
{
    let id = match input {
        Input::Const(value) => return Ok(value),
        Input::Node(id) => id,
    };

    let node = graph.node(id).ok_or(SpecError::Unprobeable {
        id: id.0,
        reason: "node does not exist",
    })?;

    match &node.kind {
        NodeKind::BinaryOp { op, a, b } => {
            let a = probe(graph, *a, seconds, noise)?;
            let b = probe(graph, *b, seconds, noise)?;
            Ok(op.apply(a, b))
        }
        NodeKind::MulAdd { input, mul, add } => {
            let input = probe(graph, *input, seconds, noise)?;
            let mul = probe(graph, *mul, seconds, noise)?;
            let add = probe(graph, *add, seconds, noise)?;
            Ok(input * mul + add)
        }
        NodeKind::Envelope { envelope, .. } => Ok(envelope.level_at(seconds)),
        NodeKind::LfNoise { .. } => Ok(noise(id)),
        _ => Err(SpecError::Unprobeable {
            id: id.0,
            reason: "audio processors have no point value",
        }),
    }
}
