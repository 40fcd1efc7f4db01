//! Configuration loading for CLI commands.
//!
//! A run configuration comes from an optional JSON file, with command-line
//! flags layered on top.

use anyhow::{Context, Result};
use clap::Args;
use deepnote_spec::Configuration;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Flags shared by every command that builds a configuration.
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigArgs {
    /// JSON configuration file; flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of voices
    #[arg(long)]
    pub num_voices: Option<usize>,

    /// Lower bound for random fundamentals, in Hz
    #[arg(long)]
    pub freq_min: Option<f64>,

    /// Upper bound for random fundamentals, in Hz
    #[arg(long)]
    pub freq_max: Option<f64>,

    /// Variant to build (THX1..THX6)
    #[arg(long, visible_alias = "synthdef")]
    pub variant: Option<String>,

    /// Seed for the run; chosen from the clock when absent
    #[arg(long)]
    pub seed: Option<u32>,

    /// Local address the renderer replies to
    #[arg(long)]
    pub local_addr: Option<String>,

    /// Address the renderer listens on
    #[arg(long)]
    pub engine_addr: Option<String>,

    /// Renderer executable
    #[arg(long)]
    pub engine_path: Option<String>,
}

/// Loads the configuration file (if any) and applies flag overrides.
pub fn load_config(args: &ConfigArgs) -> Result<Configuration> {
    let mut config = match &args.config {
        Some(path) => read_config_file(path)?,
        None => Configuration::default(),
    };
    apply_overrides(&mut config, args);
    Ok(config)
}

fn read_config_file(path: &Path) -> Result<Configuration> {
    Configuration::from_file(path)
        .with_context(|| format!("Failed to load config file: {}", path.display()))
}

/// Overwrites configuration values with any flags that were given.
pub fn apply_overrides(config: &mut Configuration, args: &ConfigArgs) {
    if let Some(n) = args.num_voices {
        config.num_voices = n;
    }
    if let Some(min) = args.freq_min {
        config.freq_min = min;
    }
    if let Some(max) = args.freq_max {
        config.freq_max = max;
    }
    if let Some(ref variant) = args.variant {
        config.variant = variant.clone();
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(ref addr) = args.local_addr {
        config.engine.local_addr = addr.clone();
    }
    if let Some(ref addr) = args.engine_addr {
        config.engine.engine_addr = addr.clone();
    }
    if let Some(ref path) = args.engine_path {
        config.engine.executable = Some(path.clone());
    }
}

/// Seed for the run and whether it was chosen rather than configured.
pub fn resolve_seed(config: &Configuration) -> (u32, bool) {
    match config.seed {
        Some(seed) => (seed, false),
        None => (clock_seed(), true),
    }
}

/// A seed derived from the wall clock.
pub fn clock_seed() -> u32 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    (nanos ^ (nanos >> 32)) as u32
}
