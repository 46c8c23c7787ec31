//! Turning filter specifications into executable graphs.
//!
//! A [`FilterSpec`] is either an already built filter, a biquad parameter set,
//! or an ordered (possibly nested) list of specifications. [`normalize`] is the
//! single entry point that turns one into a `Box<dyn Filter + Send>`:
//!
//! ```rust
//! use filtra_core::{BiquadParams, Filter, FilterSpec, normalize};
//!
//! let spec = FilterSpec::List(vec![
//!     BiquadParams::new("highpass", 80.0).into(),
//!     FilterSpec::List(vec![
//!         BiquadParams::new("peaking", 2500.0).with_q(1.4).with_gain(3.0).into(),
//!         BiquadParams::new("lowpass", 12000.0).into(),
//!     ]),
//! ]);
//!
//! let graph = normalize(spec).unwrap();
//! assert_eq!(graph.check_subchannels(2), Ok(2));
//! ```

#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, string::String, vec::Vec};

use crate::biquad::Biquad;
use crate::error::FilterError;
use crate::filter::Filter;
use crate::sequence::Sequence;

/// Default Q for biquad parameter sets (Butterworth).
pub const DEFAULT_Q: f32 = 0.707;

/// User-level description of a biquad, validated when normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct BiquadParams {
    /// Kind name, e.g. `"lowpass"`.
    pub kind: String,
    /// Cutoff or center frequency in Hz.
    pub frequency: f32,
    /// Quality factor.
    pub q: f32,
    /// Gain in dB (shelving and peaking kinds).
    pub gain: f32,
}

impl BiquadParams {
    /// Creates a parameter set with [`DEFAULT_Q`] and 0 dB gain.
    pub fn new(kind: impl Into<String>, frequency: f32) -> Self {
        Self {
            kind: kind.into(),
            frequency,
            q: DEFAULT_Q,
            gain: 0.0,
        }
    }

    /// Sets the quality factor.
    pub fn with_q(mut self, q: f32) -> Self {
        self.q = q;
        self
    }

    /// Sets the gain in dB.
    pub fn with_gain(mut self, gain: f32) -> Self {
        self.gain = gain;
        self
    }

    /// Builds the biquad.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidKind`] for an unknown kind name.
    pub fn build(&self) -> Result<Biquad, FilterError> {
        Biquad::from_name(&self.kind, self.frequency, self.q, self.gain)
    }
}

/// A filter specification: a built node, a biquad description, or a list.
pub enum FilterSpec {
    /// An already constructed filter, used as is.
    Node(Box<dyn Filter + Send>),
    /// A biquad to construct.
    Biquad(BiquadParams),
    /// An ordered list, wrapped in a [`Sequence`].
    List(Vec<FilterSpec>),
}

impl core::fmt::Debug for FilterSpec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Node(_) => f.write_str("Node(..)"),
            Self::Biquad(params) => f.debug_tuple("Biquad").field(params).finish(),
            Self::List(items) => f.debug_tuple("List").field(items).finish(),
        }
    }
}

impl From<Box<dyn Filter + Send>> for FilterSpec {
    fn from(filter: Box<dyn Filter + Send>) -> Self {
        Self::Node(filter)
    }
}

impl From<Biquad> for FilterSpec {
    fn from(biquad: Biquad) -> Self {
        Self::Node(Box::new(biquad))
    }
}

impl From<Sequence> for FilterSpec {
    fn from(sequence: Sequence) -> Self {
        Self::Node(Box::new(sequence))
    }
}

impl From<BiquadParams> for FilterSpec {
    fn from(params: BiquadParams) -> Self {
        Self::Biquad(params)
    }
}

impl From<Vec<FilterSpec>> for FilterSpec {
    fn from(items: Vec<FilterSpec>) -> Self {
        Self::List(items)
    }
}

/// Normalizes a specification into an executable filter graph.
///
/// Nodes are returned as they are, biquad parameter sets are constructed, and
/// lists become [`Sequence`]s whose elements are normalized recursively.
///
/// # Errors
///
/// Returns the first construction error in the specification, such as
/// [`FilterError::InvalidKind`].
pub fn normalize(spec: FilterSpec) -> Result<Box<dyn Filter + Send>, FilterError> {
    match spec {
        FilterSpec::Node(filter) => Ok(filter),
        FilterSpec::Biquad(params) => Ok(Box::new(params.build()?)),
        FilterSpec::List(items) => {
            #[cfg(feature = "tracing")]
            tracing::debug!("graph_normalize: sequence of {} elements", items.len());
            Ok(Box::new(Sequence::new(items)?))
        }
    }
}
