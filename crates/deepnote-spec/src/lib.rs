//! Deep Note Spec Library
//!
//! Types shared by every stage of a deep note run: the run configuration,
//! the variant identifiers, configuration validation, and the
//! engine-agnostic graph description that generation produces.
//!
//! # Example
//!
//! ```
//! use deepnote_spec::{Configuration, Variant};
//! use deepnote_spec::validation::validate_config;
//!
//! let config = Configuration::for_variant(Variant::Thx1)
//!     .num_voices(30)
//!     .freq_range(200.0, 400.0)
//!     .seed(42);
//!
//! let result = validate_config(&config);
//! assert!(result.is_ok());
//! ```
//!
//! # Modules
//!
//! - [`config`]: Run configuration and engine settings
//! - [`error`]: Error and warning types
//! - [`graph`]: Graph description, builder, envelopes and control probing
//! - [`hash`]: Canonical graph hashing
//! - [`validation`]: Configuration validation
//! - [`variant`]: The six variant identifiers

pub mod config;
pub mod error;
pub mod graph;
pub mod hash;
pub mod validation;
pub mod variant;

pub use config::{Configuration, EngineSettings};
pub use error::{
    BackendError, ErrorCode, SpecError, ValidationError, ValidationResult, ValidationWarning,
    WarningCode,
};
pub use graph::{GraphDef, GraphNode, Input, NodeId, NodeKind, Rate};
pub use hash::canonical_graph_hash;
pub use validation::validate_config;
pub use variant::Variant;
