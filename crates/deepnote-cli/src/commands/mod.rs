//! CLI command implementations.

pub mod generate;
pub mod play;
pub mod reporting;
pub mod validate;
pub mod variants;
