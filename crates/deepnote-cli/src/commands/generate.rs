//! Generate command implementation
//!
//! Builds a graph and persists it without involving the renderer.

use anyhow::{Context, Result};
use colored::Colorize;
use deepnote_backend_audio::{generate, GenerateResult};
use deepnote_engine::persist_graph;
use std::path::Path;
use std::process::ExitCode;

use super::reporting::prepare;
use crate::input::ConfigArgs;

/// Run the generate command
///
/// # Arguments
/// * `args` - Configuration flags
/// * `out_dir` - Directory the graph file is written to
/// * `print` - Also print the graph JSON to stdout
pub fn run(args: &ConfigArgs, out_dir: &Path, print: bool) -> Result<ExitCode> {
    let run = prepare(args)?;

    let result = generate(&run.config, run.seed).context("generating graph")?;
    let path = persist_graph(&result.graph, out_dir).context("persisting graph")?;

    print_summary(&result, &path);

    if print {
        let json = result
            .graph
            .to_json_pretty()
            .context("serializing graph")?;
        println!("{}", json);
    }

    Ok(ExitCode::SUCCESS)
}

/// Prints the one-screen summary of a generated graph.
pub(crate) fn print_summary(result: &GenerateResult, path: &Path) {
    eprintln!(
        "{} {} ({} voices, {} nodes)",
        "Generated:".green().bold(),
        result.graph.name,
        result.voices.len(),
        result.graph.nodes.len()
    );
    eprintln!("  {} {}", "seed:".dimmed(), result.seed);
    eprintln!("  {} {}", "hash:".dimmed(), &result.hash[..16]);
    if let Some(ref sweep) = result.sweep {
        eprintln!("  {} {:.2}s", "sweep:".dimmed(), sweep.duration());
    }
    eprintln!("  {} {}", "file:".dimmed(), path.display());
}

#[cfg(test)]
mod tests {
    use super::*;
    use deepnote_spec::GraphDef;

    #[test]
    fn test_generate_writes_graph_file() {
        let dir = tempfile::tempdir().unwrap();
        let args = ConfigArgs {
            num_voices: Some(6),
            variant: Some("THX4".to_string()),
            seed: Some(3),
            ..Default::default()
        };

        run(&args, dir.path(), false).unwrap();

        let written = std::fs::read_to_string(dir.path().join("THX4.deepnote.json")).unwrap();
        let graph = GraphDef::from_json(&written).unwrap();
        assert_eq!(graph.name, "THX4");
        assert_eq!(graph.count("saw"), 6);
    }

    #[test]
    fn test_generate_rejects_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let args = ConfigArgs {
            variant: Some("THX0".to_string()),
            ..Default::default()
        };

        let err = run(&args, dir.path(), false).unwrap_err();
        assert!(err.to_string().contains("1 error(s)"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
