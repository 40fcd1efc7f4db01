//! Validate command implementation
//!
//! Checks a configuration without generating anything.

use anyhow::{Context, Result};
use colored::Colorize;
use deepnote_spec::validate_config;
use std::process::ExitCode;

use super::reporting::print_validation;
use crate::input::{load_config, ConfigArgs};

/// Run the validate command
///
/// # Returns
/// Exit code: 0 if valid, 1 if invalid
pub fn run(args: &ConfigArgs) -> Result<ExitCode> {
    let config = load_config(args).context("loading config")?;

    println!(
        "{} {} voices, [{}, {}) Hz, {}",
        "Validating:".cyan().bold(),
        config.num_voices,
        config.freq_min,
        config.freq_max,
        config.variant
    );

    let result = validate_config(&config);
    print_validation(&result);

    if result.is_ok() {
        println!(
            "\n{} Configuration is valid ({} warning(s))",
            "SUCCESS".green().bold(),
            result.warnings.len()
        );
        Ok(ExitCode::SUCCESS)
    } else {
        println!(
            "\n{} Configuration has {} error(s)",
            "FAILED".red().bold(),
            result.errors.len()
        );
        Ok(ExitCode::from(1))
    }
}
