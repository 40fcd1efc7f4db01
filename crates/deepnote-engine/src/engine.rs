//! The renderer interface.

use deepnote_spec::GraphDef;

use crate::error::EngineResult;

/// Acknowledgement that the renderer accepted a graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ack {
    /// Name of the accepted graph.
    pub graph: String,
    /// Number of nodes in the accepted graph.
    pub nodes: usize,
}

impl Ack {
    /// Acknowledges `graph`.
    pub fn for_graph(graph: &GraphDef) -> Self {
        Self {
            graph: graph.name.clone(),
            nodes: graph.nodes.len(),
        }
    }
}

/// Something that can realize and play a graph description.
///
/// Calls happen in the order `start`, `send`, `wait`; `stop` may be called
/// at any point and must be safe to repeat.
pub trait Engine {
    /// Brings the renderer up.
    fn start(&mut self) -> EngineResult<()>;

    /// Hands a graph to the renderer and blocks until it is acknowledged.
    fn send(&mut self, graph: &GraphDef) -> EngineResult<Ack>;

    /// Blocks until the renderer finishes playing.
    fn wait(&mut self) -> EngineResult<()>;

    /// Shuts the renderer down.
    fn stop(&mut self) -> EngineResult<()>;
}
