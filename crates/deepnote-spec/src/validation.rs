//! Configuration validation logic.

use crate::config::Configuration;
use crate::error::{ErrorCode, ValidationError, ValidationResult, ValidationWarning, WarningCode};

/// Voice counts above this produce a warning.
const LARGE_VOICE_COUNT_THRESHOLD: usize = 256;

/// Validates a configuration and returns a validation result.
///
/// # Example
/// ```
/// use deepnote_spec::{Configuration, Variant};
/// use deepnote_spec::validation::validate_config;
///
/// let config = Configuration::for_variant(Variant::Thx3).num_voices(12);
/// assert!(validate_config(&config).is_ok());
/// ```
pub fn validate_config(config: &Configuration) -> ValidationResult {
    let mut result = ValidationResult::default();

    validate_variant(config, &mut result);
    validate_voice_count(config, &mut result);
    validate_frequency_bounds(config, &mut result);
    validate_engine(config, &mut result);

    check_warnings(config, &mut result);

    result
}

fn validate_variant(config: &Configuration, result: &mut ValidationResult) {
    if let Err(err) = config.parse_variant() {
        result.add_error(err);
    }
}

fn validate_voice_count(config: &Configuration, result: &mut ValidationResult) {
    if config.num_voices == 0 {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidVoiceCount,
            "num_voices must be at least 1",
            "num_voices",
        ));
    }
}

fn validate_frequency_bounds(config: &Configuration, result: &mut ValidationResult) {
    let mut finite = true;
    for (name, value) in [("freq_min", config.freq_min), ("freq_max", config.freq_max)] {
        if !value.is_finite() {
            finite = false;
            result.add_error(ValidationError::with_path(
                ErrorCode::NonFiniteFrequency,
                format!("{} must be a finite frequency, got {}", name, value),
                name,
            ));
        }
    }

    if finite && config.freq_min >= config.freq_max {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidFrequencyBounds,
            format!(
                "freq_min ({}) must be less than freq_max ({})",
                config.freq_min, config.freq_max
            ),
            "freq_min",
        ));
    }
}

fn validate_engine(config: &Configuration, result: &mut ValidationResult) {
    for (name, value) in [
        ("engine.local_addr", &config.engine.local_addr),
        ("engine.engine_addr", &config.engine.engine_addr),
    ] {
        if value.trim().is_empty() {
            result.add_error(ValidationError::with_path(
                ErrorCode::EmptyEngineAddress,
                format!("{} must not be empty", name),
                name,
            ));
        }
    }
}

fn check_warnings(config: &Configuration, result: &mut ValidationResult) {
    if config.num_voices > 0 && config.num_voices % 6 != 0 {
        result.add_warning(ValidationWarning::with_path(
            WarningCode::UnevenOctaveBands,
            format!(
                "num_voices ({}) is not a multiple of 6; the highest octave band absorbs the remainder",
                config.num_voices
            ),
            "num_voices",
        ));
    }

    if config.num_voices > LARGE_VOICE_COUNT_THRESHOLD {
        result.add_warning(ValidationWarning::with_path(
            WarningCode::LargeVoiceCount,
            format!(
                "num_voices ({}) exceeds {}; the engine may struggle",
                config.num_voices, LARGE_VOICE_COUNT_THRESHOLD
            ),
            "num_voices",
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::Variant;

    fn codes(result: &ValidationResult) -> Vec<ErrorCode> {
        result.errors.iter().map(|e| e.code).collect()
    }

    #[test]
    fn test_default_config_is_valid() {
        let result = validate_config(&Configuration::default());
        assert!(result.is_ok(), "errors: {:?}", result.errors);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_zero_voices_rejected() {
        let config = Configuration::default().num_voices(0);
        let result = validate_config(&config);
        assert_eq!(codes(&result), vec![ErrorCode::InvalidVoiceCount]);
    }

    #[test]
    fn test_min_equal_max_rejected() {
        let config = Configuration::default().freq_range(300.0, 300.0);
        let result = validate_config(&config);
        assert_eq!(codes(&result), vec![ErrorCode::InvalidFrequencyBounds]);
    }

    #[test]
    fn test_min_above_max_rejected() {
        let config = Configuration::default().freq_range(400.0, 200.0);
        assert!(!validate_config(&config).is_ok());
    }

    #[test]
    fn test_nan_bound_rejected_without_bounds_error() {
        let config = Configuration::default().freq_range(f64::NAN, 200.0);
        let result = validate_config(&config);
        assert_eq!(codes(&result), vec![ErrorCode::NonFiniteFrequency]);
    }

    #[test]
    fn test_zero_and_negative_bounds_accepted() {
        let config = Configuration::default().freq_range(0.0, 100.0);
        assert!(validate_config(&config).is_ok());

        let config = Configuration::default().freq_range(-20.0, 20.0);
        assert!(validate_config(&config).is_ok());

        let config = Configuration::default().freq_range(-20.0, -30.0);
        assert_eq!(codes(&validate_config(&config)), vec![ErrorCode::InvalidFrequencyBounds]);
    }

    #[test]
    fn test_unknown_variant_rejected() {
        let config = Configuration {
            variant: "THX0".to_string(),
            ..Default::default()
        };
        assert_eq!(codes(&validate_config(&config)), vec![ErrorCode::UnknownVariant]);
    }

    #[test]
    fn test_empty_engine_address_rejected() {
        let mut config = Configuration::default();
        config.engine.engine_addr = "  ".to_string();
        assert_eq!(
            codes(&validate_config(&config)),
            vec![ErrorCode::EmptyEngineAddress]
        );
    }

    #[test]
    fn test_multiple_errors_collected() {
        let config = Configuration {
            variant: "nope".to_string(),
            num_voices: 0,
            freq_min: 10.0,
            freq_max: 5.0,
            ..Default::default()
        };
        assert_eq!(validate_config(&config).errors.len(), 3);
    }

    #[test]
    fn test_uneven_voice_count_warns() {
        let config = Configuration::for_variant(Variant::Thx3).num_voices(32);
        let result = validate_config(&config);
        assert!(result.is_ok());
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].code, WarningCode::UnevenOctaveBands);
    }

    #[test]
    fn test_large_voice_count_warns() {
        let config = Configuration::default().num_voices(300);
        let result = validate_config(&config);
        assert!(result
            .warnings
            .iter()
            .any(|w| w.code == WarningCode::LargeVoiceCount));
    }
}
