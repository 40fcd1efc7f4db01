//! Integration test support for deep note generation.
//!
//! - [`determinism`]: byte-level determinism verification
//! - [`fixtures`]: shared configurations and graph helpers

pub mod determinism;
pub mod fixtures;
