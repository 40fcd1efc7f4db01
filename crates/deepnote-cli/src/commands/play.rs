//! Play command implementation
//!
//! Generates a graph, hands it to the renderer, persists it, and waits for
//! playback to finish.

use anyhow::{Context, Result};
use colored::Colorize;
use deepnote_backend_audio::generate;
use deepnote_engine::{persist_graph, Engine, ProcessEngine, ProcessEngineConfig, RecordingEngine};
use deepnote_spec::Configuration;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

use super::generate::print_summary;
use super::reporting::prepare;
use crate::input::ConfigArgs;

/// Run the play command
///
/// # Arguments
/// * `args` - Configuration flags
/// * `out_dir` - Directory the graph file is written to
/// * `dry_run` - Use an in-memory engine instead of the renderer
pub fn run(args: &ConfigArgs, out_dir: &Path, dry_run: bool) -> Result<ExitCode> {
    let run = prepare(args)?;

    if dry_run {
        let mut engine = RecordingEngine::new();
        play(&run.config, run.seed, &mut engine, out_dir)?;
    } else {
        let mut engine = ProcessEngine::new(ProcessEngineConfig::from(&run.config.engine));
        play(&run.config, run.seed, &mut engine, out_dir)?;
    }

    println!("{} playback finished", "Done:".green().bold());
    Ok(ExitCode::SUCCESS)
}

/// Runs one graph through `engine`.
///
/// The graph is sent before it is persisted and the engine is stopped on
/// any failure. Returns the persisted file path.
pub fn play<E: Engine>(
    config: &Configuration,
    seed: u32,
    engine: &mut E,
    out_dir: &Path,
) -> Result<PathBuf> {
    let result = generate(config, seed).context("generating graph")?;
    info!(graph = %result.graph.name, hash = %result.hash, "generated graph");

    let outcome = drive(engine, &result.graph, out_dir);
    if outcome.is_err() {
        let _ = engine.stop();
    }
    let path = outcome?;

    print_summary(&result, &path);
    Ok(path)
}

fn drive<E: Engine>(
    engine: &mut E,
    graph: &deepnote_spec::GraphDef,
    out_dir: &Path,
) -> Result<PathBuf> {
    engine.start().context("starting engine")?;
    let ack = engine.send(graph).context("sending graph")?;
    info!(graph = %ack.graph, nodes = ack.nodes, "graph acknowledged");
    let path = persist_graph(graph, out_dir).context("persisting graph")?;
    engine.wait().context("waiting for engine")?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use deepnote_spec::Variant;

    #[test]
    fn test_play_with_recording_engine() {
        let dir = tempfile::tempdir().unwrap();
        let config = Configuration::for_variant(Variant::Thx5).num_voices(12);
        let mut engine = RecordingEngine::new();

        let path = play(&config, 42, &mut engine, dir.path()).unwrap();

        assert_eq!(path, dir.path().join("THX5.deepnote.json"));
        assert_eq!(engine.sent().len(), 1);
        assert_eq!(engine.sent()[0].name, "THX5");
        assert!(engine.waited());
        assert_eq!(engine.stop_count(), 0);
    }

    #[test]
    fn test_persist_failure_stops_engine() {
        let dir = tempfile::tempdir().unwrap();
        let config = Configuration::for_variant(Variant::Thx1).num_voices(6);
        let mut engine = RecordingEngine::new();

        let err = play(&config, 1, &mut engine, &dir.path().join("missing")).unwrap_err();

        assert!(format!("{:#}", err).starts_with("persisting graph"));
        assert_eq!(engine.sent().len(), 1);
        assert!(!engine.waited());
        assert_eq!(engine.stop_count(), 1);
    }
}
