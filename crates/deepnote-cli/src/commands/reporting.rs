//! Shared console output for commands.

use anyhow::{Context, Result};
use colored::Colorize;
use deepnote_spec::{validate_config, Configuration, SpecError, ValidationResult};

use crate::input::{load_config, resolve_seed, ConfigArgs};

/// Prints validation errors and warnings, one per line.
pub fn print_validation(result: &ValidationResult) {
    for error in &result.errors {
        let path = error
            .path
            .as_ref()
            .map(|p| format!(" ({})", p))
            .unwrap_or_default();
        eprintln!(
            "  {} [{}]{}: {}",
            "x".red(),
            error.code,
            path.dimmed(),
            error.message
        );
    }
    for warning in &result.warnings {
        let path = warning
            .path
            .as_ref()
            .map(|p| format!(" ({})", p))
            .unwrap_or_default();
        eprintln!(
            "  {} [{}]{}: {}",
            "!".yellow(),
            warning.code,
            path.dimmed(),
            warning.message
        );
    }
}

/// A validated configuration and the seed to run it with.
#[derive(Debug, Clone)]
pub struct PreparedRun {
    /// The configuration.
    pub config: Configuration,
    /// Seed for generation.
    pub seed: u32,
}

/// Loads and validates the configuration, then settles the seed.
///
/// Warnings are printed and the run continues; any error aborts it.
pub fn prepare(args: &ConfigArgs) -> Result<PreparedRun> {
    let config = load_config(args).context("loading config")?;

    let validation = validate_config(&config);
    if !validation.errors.is_empty() || !validation.warnings.is_empty() {
        print_validation(&validation);
    }
    if !validation.is_ok() {
        return Err(SpecError::ValidationFailed(validation.errors.len()).into());
    }

    let (seed, chosen) = resolve_seed(&config);
    if chosen {
        eprintln!(
            "{} {} (pass --seed {} to reproduce)",
            "Seed:".dimmed(),
            seed,
            seed
        );
    }

    Ok(PreparedRun { config, seed })
}
