//! Deep Note Engine Integration
//!
//! The external collaborators of a deep note run: the renderer that realizes
//! and plays a graph description, and durable storage for graph files.
//!
//! - [`Engine`] - start, send-and-acknowledge, wait, stop
//! - [`ProcessEngine`] - a renderer subprocess driven through a spool directory
//! - [`RecordingEngine`] - keeps graphs in memory, for dry runs and tests
//! - [`persist_graph`] - writes `<NAME>.deepnote.json`
//!
//! Failures are never retried here; they propagate to the caller.

pub mod engine;
pub mod error;
pub mod persist;
pub mod process;
pub mod recording;

pub use engine::{Ack, Engine};
pub use error::{EngineError, EngineResult};
pub use persist::{graph_file_name, persist_graph};
pub use process::{ProcessEngine, ProcessEngineConfig};
pub use recording::RecordingEngine;
