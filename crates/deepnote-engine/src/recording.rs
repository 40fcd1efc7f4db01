//! In-memory engine for dry runs and tests.

use deepnote_spec::GraphDef;
use tracing::info;

use crate::engine::{Ack, Engine};
use crate::error::{EngineError, EngineResult};

/// An engine that keeps every graph it is sent and plays nothing.
#[derive(Debug, Default)]
pub struct RecordingEngine {
    started: bool,
    waited: bool,
    stops: usize,
    sent: Vec<GraphDef>,
}

impl RecordingEngine {
    /// Creates a stopped recording engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Graphs sent so far, in order.
    pub fn sent(&self) -> &[GraphDef] {
        &self.sent
    }

    /// Returns true between `start` and `stop`.
    pub fn is_running(&self) -> bool {
        self.started
    }

    /// Returns true once `wait` has completed.
    pub fn waited(&self) -> bool {
        self.waited
    }

    /// Number of `stop` calls.
    pub fn stop_count(&self) -> usize {
        self.stops
    }
}

impl Engine for RecordingEngine {
    fn start(&mut self) -> EngineResult<()> {
        self.started = true;
        Ok(())
    }

    fn send(&mut self, graph: &GraphDef) -> EngineResult<Ack> {
        if !self.started {
            return Err(EngineError::NotStarted);
        }
        info!(graph = %graph.name, nodes = graph.nodes.len(), "recorded graph");
        self.sent.push(graph.clone());
        Ok(Ack::for_graph(graph))
    }

    fn wait(&mut self) -> EngineResult<()> {
        if !self.started {
            return Err(EngineError::NotStarted);
        }
        self.waited = true;
        Ok(())
    }

    fn stop(&mut self) -> EngineResult<()> {
        self.started = false;
        self.stops += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deepnote_spec::graph::GraphBuilder;

    #[test]
    fn test_records_in_order() {
        let mut engine = RecordingEngine::new();
        engine.start().unwrap();
        let ack = engine.send(&GraphBuilder::new("A").finish()).unwrap();
        engine.send(&GraphBuilder::new("B").finish()).unwrap();
        engine.wait().unwrap();

        assert_eq!(ack, Ack { graph: "A".to_string(), nodes: 0 });
        let names: Vec<&str> = engine.sent().iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert!(engine.waited());
    }

    #[test]
    fn test_send_before_start_fails() {
        let mut engine = RecordingEngine::new();
        let err = engine.send(&GraphBuilder::new("A").finish()).unwrap_err();
        assert!(matches!(err, EngineError::NotStarted));
        assert!(engine.sent().is_empty());
    }

    #[test]
    fn test_stop_is_repeatable() {
        let mut engine = RecordingEngine::new();
        engine.start().unwrap();
        engine.stop().unwrap();
        engine.stop().unwrap();
        assert!(!engine.is_running());
        assert_eq!(engine.stop_count(), 2);
    }
}
