//! Filter and preset validation.
//!
//! Graph construction only rejects unknown kinds; everything else a biquad is
//! given is used as is. These checks catch parameters that would build a
//! graph with useless or unstable coefficients before it reaches the audio
//! thread.
//!
//! # Example
//!
//! ```rust
//! use filtra_config::{BiquadConfig, validate_filter};
//!
//! validate_filter(&BiquadConfig::new("lowpass", 1000.0), 48000).expect("valid");
//! assert!(validate_filter(&BiquadConfig::new("lowpass", 30000.0), 48000).is_err());
//! ```

use filtra_core::{BiquadKind, FilterSpec, normalize};
use thiserror::Error;

use crate::error::ConfigError;
use crate::filter_config::BiquadConfig;
use crate::preset::Preset;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Unknown biquad kind.
    #[error("unknown filter kind: {0}")]
    UnknownKind(String),

    /// Frequency outside `(0, sample_rate / 2)`.
    #[error("{kind}: frequency {frequency} Hz out of range (0, {nyquist})")]
    FrequencyOutOfRange {
        /// Kind of the offending filter.
        kind: String,
        /// The rejected frequency.
        frequency: f32,
        /// Nyquist frequency for the preset's sample rate.
        nyquist: f32,
    },

    /// Non-positive or non-finite Q.
    #[error("{kind}: q must be positive, got {q}")]
    InvalidQ {
        /// Kind of the offending filter.
        kind: String,
        /// The rejected quality factor.
        q: f32,
    },

    /// Non-finite gain.
    #[error("{kind}: gain must be finite, got {gain}")]
    InvalidGain {
        /// Kind of the offending filter.
        kind: String,
        /// The rejected gain.
        gain: f32,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", join_errors(.0))]
    Multiple(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate one biquad against a sample rate.
///
/// Returns the first problem found.
pub fn validate_filter(config: &BiquadConfig, sample_rate: u32) -> ValidationResult<()> {
    match filter_problems(config, sample_rate).into_iter().next() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn filter_problems(config: &BiquadConfig, sample_rate: u32) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let kind = &config.kind;

    if kind.parse::<BiquadKind>().is_err() {
        errors.push(ValidationError::UnknownKind(kind.clone()));
    }

    let nyquist = sample_rate as f32 / 2.0;
    if !(config.frequency > 0.0 && config.frequency < nyquist) {
        errors.push(ValidationError::FrequencyOutOfRange {
            kind: kind.clone(),
            frequency: config.frequency,
            nyquist,
        });
    }

    if !(config.q > 0.0 && config.q.is_finite()) {
        errors.push(ValidationError::InvalidQ {
            kind: kind.clone(),
            q: config.q,
        });
    }

    if !config.gain.is_finite() {
        errors.push(ValidationError::InvalidGain {
            kind: kind.clone(),
            gain: config.gain,
        });
    }

    errors
}

/// Validate every biquad of a preset against its sample rate.
///
/// All problems are collected; more than one is reported as
/// [`ValidationError::Multiple`].
///
/// # Example
///
/// ```rust,no_run
/// use filtra_config::{Preset, validate_preset};
///
/// let preset = Preset::load("telephone.toml").unwrap();
/// validate_preset(&preset).expect("preset should be valid");
/// ```
pub fn validate_preset(preset: &Preset) -> ValidationResult<()> {
    let mut errors = Vec::new();
    for filter in &preset.filters {
        filter.for_each_biquad(&mut |config| {
            errors.extend(filter_problems(config, preset.sample_rate));
        });
    }

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}

/// Build `spec` and negotiate `subchannels` through it.
///
/// Returns the output subchannel count the graph would produce.
pub fn check_graph(spec: impl Into<FilterSpec>, subchannels: usize) -> Result<usize, ConfigError> {
    let graph = normalize(spec.into())?;
    Ok(graph.check_subchannels(subchannels)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FilterConfig;

    #[test]
    fn test_valid_filters() {
        for kind in BiquadKind::ALL {
            let config = BiquadConfig::new(kind.name(), 1000.0).with_gain(-6.0);
            assert_eq!(validate_filter(&config, 44100), Ok(()), "{kind}");
        }
    }

    #[test]
    fn test_frequency_bounds() {
        let at_nyquist = BiquadConfig::new("lowpass", 22050.0);
        assert!(matches!(
            validate_filter(&at_nyquist, 44100),
            Err(ValidationError::FrequencyOutOfRange { nyquist, .. }) if nyquist == 22050.0
        ));

        let zero = BiquadConfig::new("lowpass", 0.0);
        assert!(validate_filter(&zero, 44100).is_err());

        let nan = BiquadConfig::new("lowpass", f32::NAN);
        assert!(validate_filter(&nan, 44100).is_err());
    }

    #[test]
    fn test_q_and_gain() {
        let config = BiquadConfig::new("peaking", 1000.0).with_q(0.0);
        assert!(matches!(
            validate_filter(&config, 48000),
            Err(ValidationError::InvalidQ { .. })
        ));

        let config = BiquadConfig::new("peaking", 1000.0).with_gain(f32::INFINITY);
        assert!(matches!(
            validate_filter(&config, 48000),
            Err(ValidationError::InvalidGain { .. })
        ));
    }

    #[test]
    fn test_unknown_kind_reported_first() {
        let config = BiquadConfig::new("bandstop", -1.0);
        assert_eq!(
            validate_filter(&config, 48000),
            Err(ValidationError::UnknownKind("bandstop".to_string()))
        );
    }

    #[test]
    fn test_validate_preset_collects_nested_problems() {
        let preset = Preset::new("Broken")
            .with_sample_rate(8000)
            .with_filter(BiquadConfig::new("highpass", 100.0))
            .with_filter(FilterConfig::List(vec![
                BiquadConfig::new("lowpass", 5000.0).into(),
                BiquadConfig::new("shelf", 200.0).into(),
            ]));

        let Err(ValidationError::Multiple(errors)) = validate_preset(&preset) else {
            panic!("expected multiple errors");
        };
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors[0], ValidationError::FrequencyOutOfRange { .. }));
        assert!(matches!(errors[1], ValidationError::UnknownKind(_)));
    }

    #[test]
    fn test_validate_preset_single_error_is_unwrapped() {
        let preset =
            Preset::new("One").with_filter(BiquadConfig::new("notch", 1000.0).with_q(-1.0));
        assert!(matches!(
            validate_preset(&preset),
            Err(ValidationError::InvalidQ { .. })
        ));
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::FrequencyOutOfRange {
            kind: "lowpass".to_string(),
            frequency: 30000.0,
            nyquist: 24000.0,
        };
        assert_eq!(
            err.to_string(),
            "lowpass: frequency 30000 Hz out of range (0, 24000)"
        );

        let multi = ValidationError::Multiple(vec![
            ValidationError::UnknownKind("a".to_string()),
            ValidationError::UnknownKind("b".to_string()),
        ]);
        assert_eq!(
            multi.to_string(),
            "multiple validation errors: unknown filter kind: a; unknown filter kind: b"
        );
    }

    #[test]
    fn test_check_graph() {
        let spec = FilterConfig::List(vec![BiquadConfig::new("lowpass", 1000.0).into()]).to_spec();
        assert_eq!(check_graph(spec, 2).unwrap(), 2);

        let spec = BiquadConfig::new("lowpass", 1000.0).to_params();
        assert!(matches!(check_graph(spec, 17), Err(ConfigError::Filter(_))));

        let spec = BiquadConfig::new("nope", 1000.0).to_params();
        assert!(matches!(check_graph(spec, 1), Err(ConfigError::Filter(_))));
    }
}
