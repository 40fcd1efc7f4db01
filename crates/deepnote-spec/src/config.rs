//! Run configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ErrorCode, SpecError, ValidationError};
use crate::variant::Variant;

/// Default number of voices.
pub const DEFAULT_NUM_VOICES: usize = 30;

/// Default lower bound for random fundamentals, in Hz.
pub const DEFAULT_FREQ_MIN: f64 = 200.0;

/// Default upper bound for random fundamentals, in Hz.
pub const DEFAULT_FREQ_MAX: f64 = 400.0;

/// Configuration for a single deep note run.
///
/// Immutable once validated. `variant` stays a string so an unknown name is
/// reported as a validation error rather than a parse error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Configuration {
    /// Number of voices (N).
    #[serde(default = "default_num_voices")]
    pub num_voices: usize,

    /// Lower bound (inclusive) for random fundamentals, in Hz.
    #[serde(default = "default_freq_min")]
    pub freq_min: f64,

    /// Upper bound (exclusive) for random fundamentals, in Hz.
    #[serde(default = "default_freq_max")]
    pub freq_max: f64,

    /// Variant name, `THX1` through `THX6`.
    #[serde(default = "default_variant")]
    pub variant: String,

    /// Seed for the run-scoped random source. Chosen by the caller when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,

    /// External engine settings.
    #[serde(default)]
    pub engine: EngineSettings,
}

fn default_num_voices() -> usize {
    DEFAULT_NUM_VOICES
}

fn default_freq_min() -> f64 {
    DEFAULT_FREQ_MIN
}

fn default_freq_max() -> f64 {
    DEFAULT_FREQ_MAX
}

fn default_variant() -> String {
    Variant::default().as_str().to_string()
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            num_voices: DEFAULT_NUM_VOICES,
            freq_min: DEFAULT_FREQ_MIN,
            freq_max: DEFAULT_FREQ_MAX,
            variant: default_variant(),
            seed: None,
            engine: EngineSettings::default(),
        }
    }
}

impl Configuration {
    /// Creates a configuration for the given variant with default bounds.
    pub fn for_variant(variant: Variant) -> Self {
        Self {
            variant: variant.as_str().to_string(),
            ..Default::default()
        }
    }

    /// Sets the voice count.
    pub fn num_voices(mut self, num_voices: usize) -> Self {
        self.num_voices = num_voices;
        self
    }

    /// Sets the fundamental frequency range `[min, max)`.
    pub fn freq_range(mut self, min: f64, max: f64) -> Self {
        self.freq_min = min;
        self.freq_max = max;
        self
    }

    /// Sets the seed.
    pub fn seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Parses the configured variant name.
    pub fn parse_variant(&self) -> Result<Variant, ValidationError> {
        self.variant
            .parse()
            .map_err(|msg: String| ValidationError::with_path(ErrorCode::UnknownVariant, msg, "variant"))
    }

    /// Parses a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_file(path: &Path) -> Result<Self, SpecError> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }

    /// Serializes the configuration to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Settings for the external rendering engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineSettings {
    /// Local listening address handed to the engine for acknowledgements.
    #[serde(default = "default_local_addr")]
    pub local_addr: String,

    /// Address the engine listens on.
    #[serde(default = "default_engine_addr")]
    pub engine_addr: String,

    /// Path to the engine executable. Falls back to `DEEPNOTE_ENGINE_PATH`
    /// and then a `PATH` lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executable: Option<String>,

    /// Seconds to wait for the engine to start.
    #[serde(default = "default_start_timeout_secs")]
    pub start_timeout_secs: u64,

    /// Seconds to wait for playback to finish. Unbounded when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait_timeout_secs: Option<u64>,
}

fn default_local_addr() -> String {
    "127.0.0.1:0".to_string()
}

fn default_engine_addr() -> String {
    "127.0.0.1:57120".to_string()
}

fn default_start_timeout_secs() -> u64 {
    5
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            local_addr: default_local_addr(),
            engine_addr: default_engine_addr(),
            executable: None,
            start_timeout_secs: default_start_timeout_secs(),
            wait_timeout_secs: None,
        }
    }
}
