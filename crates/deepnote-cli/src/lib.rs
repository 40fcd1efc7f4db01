//! Deep note CLI library.
//!
//! Configuration loading, logging setup and the command implementations
//! behind the `deepnote` binary.

pub mod commands;
pub mod input;
pub mod logging;
