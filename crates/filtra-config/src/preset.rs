//! Preset file format and operations.

use serde::{Deserialize, Serialize};
use std::path::Path;

use filtra_core::{FilterSpec, Pipeline};

use crate::error::ConfigError;
use crate::filter_config::FilterConfig;

/// A named filter graph stored as TOML (or JSON).
///
/// # TOML Format
///
/// ```toml
/// name = "Telephone"
/// description = "Band-limited voice"
/// sample_rate = 44100
/// filters = [
///   { kind = "highpass", frequency = 300.0, q = 0.707 },
///   [ { kind = "peaking", frequency = 1800.0, q = 1.2, gain = 4.0 },
///     { kind = "lowpass", frequency = 3400.0 } ],
/// ]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Preset {
    /// Name of the preset.
    pub name: String,

    /// Optional description of the preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Sample rate the parameters were designed for (defaults to 48000).
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Top-level filter list, applied in order.
    #[serde(default)]
    pub filters: Vec<FilterConfig>,
}

fn default_sample_rate() -> u32 {
    48000
}

impl Preset {
    /// Create a new empty preset.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            sample_rate: default_sample_rate(),
            filters: Vec::new(),
        }
    }

    /// Create a preset with a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the sample rate hint.
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Append a filter or nested list.
    pub fn with_filter(mut self, filter: impl Into<FilterConfig>) -> Self {
        self.filters.push(filter.into());
        self
    }

    /// Load a preset from a file; `.json` files are read as JSON, anything
    /// else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;

        if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")) {
            Self::from_json(&content)
        } else {
            Self::from_toml(&content)
        }
    }

    /// Load a preset from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Load a preset from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Save the preset to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the preset to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Number of top-level entries.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Check if the preset has no filters.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Total number of biquads, including nested ones.
    pub fn biquad_count(&self) -> usize {
        let mut count = 0;
        for filter in &self.filters {
            filter.for_each_biquad(&mut |_| count += 1);
        }
        count
    }

    /// The filter list as a core specification.
    pub fn to_spec(&self) -> FilterSpec {
        FilterSpec::List(self.filters.iter().map(FilterConfig::to_spec).collect())
    }

    /// Build a pipeline prepared for the preset's sample rate.
    pub fn build(&self) -> Result<Pipeline, ConfigError> {
        self.build_at(self.sample_rate)
    }

    /// Build a pipeline prepared for `sample_rate`, e.g. the rate of the
    /// audio actually being processed.
    pub fn build_at(&self, sample_rate: u32) -> Result<Pipeline, ConfigError> {
        let mut pipeline = Pipeline::new(self.to_spec())?;
        pipeline.prepare(sample_rate);
        Ok(pipeline)
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::new("Untitled")
    }
}
