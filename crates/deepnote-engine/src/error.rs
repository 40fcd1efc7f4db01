//! Error types for the engine crate.

use deepnote_spec::BackendError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while driving the external renderer or persisting
/// graphs.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Renderer executable not found.
    #[error("renderer executable not found. Set engine.executable, the DEEPNOTE_ENGINE_PATH environment variable, or put `deepnote-engine` in PATH")]
    EngineNotFound,

    /// Failed to spawn the renderer process.
    #[error("failed to spawn renderer: {0}")]
    SpawnFailed(#[source] std::io::Error),

    /// The renderer did not respond in time.
    #[error("renderer timed out after {timeout_secs} seconds while {phase}")]
    Timeout {
        /// What we were waiting for.
        phase: &'static str,
        /// Timeout that elapsed.
        timeout_secs: u64,
    },

    /// The renderer exited with a non-zero status.
    #[error("renderer exited with status {exit_code}: {stderr}")]
    ProcessFailed {
        /// Exit code, or -1 when killed by a signal.
        exit_code: i32,
        /// Captured standard error.
        stderr: String,
    },

    /// The renderer exited successfully before it signalled the current phase.
    #[error("renderer exited prematurely while {phase}")]
    ExitedEarly {
        /// What we were waiting for.
        phase: &'static str,
        /// Captured standard error.
        stderr: String,
    },

    /// An operation that needs a running renderer was called before `start`.
    #[error("renderer has not been started")]
    NotStarted,

    /// Failed to write a graph file.
    #[error("failed to persist graph to {path}: {source}")]
    Persist {
        /// Destination path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize a graph.
    #[error("failed to serialize graph: {0}")]
    Serialize(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Creates a process failed error.
    pub fn process_failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self::ProcessFailed {
            exit_code,
            stderr: stderr.into(),
        }
    }
}

impl BackendError for EngineError {
    fn code(&self) -> &'static str {
        match self {
            EngineError::EngineNotFound => "ENGINE_001",
            EngineError::SpawnFailed(_) => "ENGINE_002",
            EngineError::Timeout { .. } => "ENGINE_003",
            EngineError::ProcessFailed { .. } => "ENGINE_004",
            EngineError::NotStarted => "ENGINE_005",
            EngineError::Persist { .. } => "ENGINE_006",
            EngineError::Serialize(_) => "ENGINE_007",
            EngineError::Io(_) => "ENGINE_008",
            EngineError::ExitedEarly { .. } => "ENGINE_009",
        }
    }

    fn category(&self) -> &'static str {
        match self {
            EngineError::Persist { .. } | EngineError::Serialize(_) => "persist",
            _ => "engine",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_unique() {
        let errors = [
            EngineError::EngineNotFound,
            EngineError::SpawnFailed(std::io::Error::other("x")),
            EngineError::Timeout {
                phase: "starting",
                timeout_secs: 5,
            },
            EngineError::process_failed(1, "boom"),
            EngineError::NotStarted,
            EngineError::Persist {
                path: PathBuf::from("a"),
                source: std::io::Error::other("x"),
            },
            EngineError::Io(std::io::Error::other("x")),
            EngineError::ExitedEarly {
                phase: "starting",
                stderr: String::new(),
            },
        ];
        let mut codes: Vec<&str> = errors.iter().map(|e| e.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_timeout_names_phase() {
        let err = EngineError::Timeout {
            phase: "waiting for acknowledgement",
            timeout_secs: 5,
        };
        assert_eq!(
            err.to_string(),
            "renderer timed out after 5 seconds while waiting for acknowledgement"
        );
        assert_eq!(err.category(), "engine");
    }
}
