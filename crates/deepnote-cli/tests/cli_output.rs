//! Output-stream tests for the `deepnote` binary.
//!
//! Graph JSON is the only thing written to stdout by `generate --print`;
//! summaries, validation messages and errors go to stderr.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p deepnote-cli --test cli_output
//! ```

use std::process::{Command, Output};

use deepnote_spec::GraphDef;
use tempfile::tempdir;

fn deepnote(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_deepnote"))
        .args(args)
        .env("NO_COLOR", "1")
        .env_remove("DEEPNOTE_LOG")
        .output()
        .expect("Failed to execute deepnote")
}

#[test]
fn test_generate_print_keeps_stdout_pure_json() {
    let tmp = tempdir().unwrap();
    let out_dir = tmp.path().to_str().unwrap();

    // 7 voices is not a multiple of 6, so validation emits a warning.
    let output = deepnote(&[
        "generate",
        "--variant",
        "THX3",
        "--num-voices",
        "7",
        "--seed",
        "4",
        "--out-dir",
        out_dir,
        "--print",
    ]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "stderr: {}", stderr);

    let graph = GraphDef::from_json(&stdout).unwrap();
    assert_eq!(graph.name, "THX3");
    assert_eq!(graph.count("saw"), 7);

    assert!(stderr.contains("W001"), "stderr: {}", stderr);
    assert!(stderr.contains("Generated:"), "stderr: {}", stderr);
    assert!(tmp.path().join("THX3.deepnote.json").exists());
}

#[test]
fn test_invalid_config_reports_on_stderr() {
    let tmp = tempdir().unwrap();

    let output = deepnote(&[
        "generate",
        "--freq-min",
        "400",
        "--freq-max",
        "200",
        "--out-dir",
        tmp.path().to_str().unwrap(),
        "--print",
    ]);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(stderr.contains("E003"), "stderr: {}", stderr);
    assert!(stderr.contains("1 error(s)"), "stderr: {}", stderr);
}
