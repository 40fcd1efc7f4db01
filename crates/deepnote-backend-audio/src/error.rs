//! Error types for graph generation.

use deepnote_spec::{BackendError, SpecError, ValidationError};
use thiserror::Error;

/// Result type for generation operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors that can occur during graph generation.
///
/// Generation has no transient failure modes; configuration problems are
/// caught before any node is built.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Configuration failed validation.
    #[error("invalid configuration: {}", format_errors(.0))]
    InvalidConfig(Vec<ValidationError>),

    /// Invalid parameter value passed to a generator.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Error message.
        message: String,
    },

    /// The generated graph could not be serialized for hashing.
    #[error("graph serialization failed: {0}")]
    Spec(#[from] SpecError),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl GraphError {
    /// Creates an invalid parameter error.
    pub fn invalid_param(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }
}

impl BackendError for GraphError {
    fn code(&self) -> &'static str {
        match self {
            GraphError::InvalidConfig(_) => "GRAPH_001",
            GraphError::InvalidParameter { .. } => "GRAPH_002",
            GraphError::Spec(_) => "GRAPH_003",
        }
    }

    fn category(&self) -> &'static str {
        "graph"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deepnote_spec::ErrorCode;

    #[test]
    fn test_invalid_param_helper() {
        let err = GraphError::invalid_param("num_voices", "must be at least 1");
        assert!(err.to_string().contains("num_voices"));
        assert_eq!(err.code(), "GRAPH_002");
    }

    #[test]
    fn test_invalid_config_lists_every_error() {
        let err = GraphError::InvalidConfig(vec![
            ValidationError::new(ErrorCode::UnknownVariant, "unknown variant: THX9"),
            ValidationError::new(ErrorCode::InvalidVoiceCount, "num_voices must be at least 1"),
        ]);
        let msg = err.to_string();
        assert!(msg.contains("E001"));
        assert!(msg.contains("E002"));
        assert_eq!(err.category(), "graph");
    }
}
