//! Compact chain strings for the command line.
//!
//! A chain is a `|`-separated list of biquads, each written as
//! `kind:param=value,param=value`:
//!
//! ```rust
//! use filtra_config::parse_chain;
//!
//! let chain = parse_chain("highpass:frequency=300,q=0.7|lowpass:frequency=3.4kHz").unwrap();
//!
//! assert_eq!(chain.len(), 2);
//! assert_eq!(chain[1].frequency, 3400.0);
//! ```

use filtra_core::BiquadKind;

use crate::error::ConfigError;
use crate::filter_config::BiquadConfig;

/// Parse a chain string into biquad configurations.
///
/// Recognized parameters are `frequency` (alias `freq`), `q` and `gain`.
/// `frequency` is required; `q` and `gain` default like [`BiquadConfig::new`].
/// Empty segments are skipped, so an empty string is an empty chain.
pub fn parse_chain(chain: &str) -> Result<Vec<BiquadConfig>, ConfigError> {
    let mut filters = Vec::new();

    for segment in chain.split('|') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        filters.push(parse_filter(segment)?);
    }

    Ok(filters)
}

/// Parse a single `kind:param=value,...` segment.
fn parse_filter(segment: &str) -> Result<BiquadConfig, ConfigError> {
    let (kind, params) = match segment.split_once(':') {
        Some((kind, params)) => (kind.trim(), params),
        None => (segment, ""),
    };

    if kind.parse::<BiquadKind>().is_err() {
        return Err(ConfigError::UnknownKind(kind.to_string()));
    }

    let mut frequency = None;
    let mut config = BiquadConfig::new(kind, 0.0);

    for param in params.split(',') {
        let param = param.trim();
        if param.is_empty() {
            continue;
        }

        let Some((key, raw)) = param.split_once('=') else {
            return Err(ConfigError::invalid_parameter(
                kind,
                param,
                "expected key=value",
            ));
        };
        let key = key.trim();
        let value = parse_param_value(raw).ok_or_else(|| {
            let reason = format!("'{}' is not a valid number", raw.trim());
            ConfigError::invalid_parameter(kind, key, reason)
        })?;

        match key {
            "frequency" | "freq" => frequency = Some(value),
            "q" => config.q = value,
            "gain" => config.gain = value,
            _ => {
                return Err(ConfigError::invalid_parameter(
                    kind,
                    key,
                    "unknown parameter",
                ));
            }
        }
    }

    config.frequency =
        frequency.ok_or_else(|| ConfigError::invalid_parameter(kind, "frequency", "missing"))?;
    Ok(config)
}

/// Parse a parameter value string into an f32.
///
/// Supports:
/// - Plain numbers: "0.707", "-3"
/// - Frequency in Hz: "440Hz"
/// - Frequency in kHz: "3.4kHz" (converted to Hz)
/// - Decibels: "-6dB" (kept in dB, as biquad gains are specified)
pub fn parse_param_value(value: &str) -> Option<f32> {
    let value = value.trim();

    // Kilohertz
    if let Some(khz) = value
        .strip_suffix("kHz")
        .or_else(|| value.strip_suffix("khz"))
    {
        return khz.trim().parse::<f32>().ok().map(|v| v * 1000.0);
    }

    // Hertz
    if let Some(hz) = value
        .strip_suffix("Hz")
        .or_else(|| value.strip_suffix("hz"))
    {
        return hz.trim().parse::<f32>().ok();
    }

    // Decibels
    if let Some(db) = value
        .strip_suffix("dB")
        .or_else(|| value.strip_suffix("db"))
    {
        return db.trim().parse::<f32>().ok();
    }

    value.parse::<f32>().ok()
}
