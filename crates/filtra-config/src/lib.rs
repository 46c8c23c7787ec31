//! Configuration and preset management for filtra filter graphs.
//!
//! This crate turns human-edited descriptions of filter graphs into
//! [`filtra_core`] pipelines.
//!
//! # Features
//!
//! - **Preset System**: Load and save nested filter lists as TOML or JSON
//! - **Chain Strings**: Parse compact `kind:param=value|...` chains
//! - **Validation**: Check kinds and parameter ranges before building
//!
//! # Example
//!
//! ```rust,no_run
//! use filtra_config::{BiquadConfig, FilterConfig, Preset, validate_preset};
//!
//! let preset = Preset::new("Telephone")
//!     .with_description("Band-limited voice")
//!     .with_sample_rate(44100)
//!     .with_filter(BiquadConfig::new("highpass", 300.0))
//!     .with_filter(FilterConfig::List(vec![
//!         BiquadConfig::new("peaking", 1800.0).with_q(1.2).with_gain(4.0).into(),
//!         BiquadConfig::new("lowpass", 3400.0).into(),
//!     ]));
//!
//! validate_preset(&preset).unwrap();
//! preset.save("presets/telephone.toml").unwrap();
//!
//! let mut pipeline = Preset::load("presets/telephone.toml").unwrap().build().unwrap();
//! let mut block = vec![0.0f32; 512];
//! pipeline.process(&mut block, 1);
//! ```

mod chain;
mod error;
mod filter_config;
mod preset;

/// Filter and preset validation.
pub mod validation;

pub use chain::{parse_chain, parse_param_value};
pub use error::ConfigError;
pub use filter_config::{BiquadConfig, FilterConfig};
pub use preset::Preset;
pub use validation::{
    ValidationError, ValidationResult, check_graph, validate_filter, validate_preset,
};
