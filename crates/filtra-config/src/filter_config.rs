//! Serializable filter descriptions.

use std::fmt;

use filtra_core::{BiquadParams, DEFAULT_Q, FilterSpec};
use serde::de::{self, Deserializer, MapAccess, SeqAccess, Unexpected, Visitor};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration for a single biquad.
///
/// # Example
///
/// ```rust
/// use filtra_config::BiquadConfig;
///
/// let config = BiquadConfig::new("peaking", 2500.0).with_q(1.4).with_gain(3.0);
///
/// assert_eq!(config.kind, "peaking");
/// assert_eq!(config.gain, 3.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BiquadConfig {
    /// Kind name, e.g. `"lowpass"`.
    pub kind: String,

    /// Cutoff or center frequency in Hz.
    pub frequency: f32,

    /// Quality factor (defaults to 0.707).
    #[serde(default = "default_q")]
    pub q: f32,

    /// Gain in dB, used by shelving and peaking kinds.
    #[serde(default)]
    pub gain: f32,
}

fn default_q() -> f32 {
    DEFAULT_Q
}

impl BiquadConfig {
    /// Create a biquad configuration with default Q and 0 dB gain.
    pub fn new(kind: impl Into<String>, frequency: f32) -> Self {
        Self {
            kind: kind.into(),
            frequency,
            q: DEFAULT_Q,
            gain: 0.0,
        }
    }

    /// Set the quality factor.
    pub fn with_q(mut self, q: f32) -> Self {
        self.q = q;
        self
    }

    /// Set the gain in dB.
    pub fn with_gain(mut self, gain: f32) -> Self {
        self.gain = gain;
        self
    }

    /// Convert into the core parameter set.
    pub fn to_params(&self) -> BiquadParams {
        BiquadParams::new(self.kind.clone(), self.frequency)
            .with_q(self.q)
            .with_gain(self.gain)
    }
}

/// One element of a preset's filter list: a biquad or a nested list.
///
/// In TOML a biquad is a table and a nested list is an array:
///
/// ```toml
/// filters = [
///   { kind = "highpass", frequency = 80.0 },
///   [ { kind = "lowpass", frequency = 8000.0 } ],
/// ]
/// ```
///
/// Any other value is rejected with [`ConfigError::InvalidSpecType`].
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum FilterConfig {
    /// A single biquad.
    Biquad(BiquadConfig),
    /// A nested list, applied in order.
    List(Vec<FilterConfig>),
}

impl FilterConfig {
    /// Convert into a core [`FilterSpec`].
    pub fn to_spec(&self) -> FilterSpec {
        match self {
            FilterConfig::Biquad(config) => FilterSpec::Biquad(config.to_params()),
            FilterConfig::List(items) => {
                FilterSpec::List(items.iter().map(FilterConfig::to_spec).collect())
            }
        }
    }

    /// Visit every biquad in order, depth first.
    pub fn for_each_biquad<'a>(&'a self, f: &mut impl FnMut(&'a BiquadConfig)) {
        match self {
            FilterConfig::Biquad(config) => f(config),
            FilterConfig::List(items) => {
                for item in items {
                    item.for_each_biquad(f);
                }
            }
        }
    }
}

impl From<BiquadConfig> for FilterConfig {
    fn from(config: BiquadConfig) -> Self {
        FilterConfig::Biquad(config)
    }
}

impl From<Vec<FilterConfig>> for FilterConfig {
    fn from(items: Vec<FilterConfig>) -> Self {
        FilterConfig::List(items)
    }
}

impl<'de> Deserialize<'de> for FilterConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(FilterConfigVisitor)
    }
}

struct FilterConfigVisitor;

fn invalid_type<E: de::Error>(found: Unexpected<'_>) -> E {
    E::custom(ConfigError::InvalidSpecType {
        found: found.to_string(),
    })
}

impl<'de> Visitor<'de> for FilterConfigVisitor {
    type Value = FilterConfig;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a filter table or a list of filters")
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<FilterConfig, A::Error> {
        BiquadConfig::deserialize(de::value::MapAccessDeserializer::new(map))
            .map(FilterConfig::Biquad)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<FilterConfig, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(FilterConfig::List(items))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<FilterConfig, E> {
        Err(invalid_type(Unexpected::Bool(v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<FilterConfig, E> {
        Err(invalid_type(Unexpected::Signed(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<FilterConfig, E> {
        Err(invalid_type(Unexpected::Unsigned(v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<FilterConfig, E> {
        Err(invalid_type(Unexpected::Float(v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<FilterConfig, E> {
        Err(invalid_type(Unexpected::Str(v)))
    }

    fn visit_unit<E: de::Error>(self) -> Result<FilterConfig, E> {
        Err(invalid_type(Unexpected::Unit))
    }
}
