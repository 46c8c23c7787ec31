//! Validation errors surfaced at graph construction and channel-count checks.
//!
//! Runtime processing (`apply`, [`run`](crate::run)) has no recoverable error
//! path: an out-of-contract call there is a programming error and panics.

#[cfg(not(feature = "std"))]
use alloc::string::String;

/// Errors produced while building or validating a filter graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// The biquad kind name is not one of the eight supported kinds.
    InvalidKind(String),
    /// A filter cannot process the given number of subchannels.
    UnsupportedSubchannels {
        /// Requested subchannel count.
        subchannels: usize,
        /// Smallest count the filter accepts.
        min: usize,
        /// Largest count the filter accepts.
        max: usize,
    },
}

impl core::fmt::Display for FilterError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidKind(kind) => write!(f, "invalid biquad kind '{kind}'"),
            Self::UnsupportedSubchannels {
                subchannels,
                min,
                max,
            } => write!(
                f,
                "unsupported subchannel count {subchannels} (expected {min}..={max})"
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FilterError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_kind_display() {
        let err = FilterError::InvalidKind("foo".to_string());
        assert_eq!(err.to_string(), "invalid biquad kind 'foo'");
    }

    #[test]
    fn unsupported_subchannels_display() {
        let err = FilterError::UnsupportedSubchannels {
            subchannels: 17,
            min: 1,
            max: 16,
        };
        assert_eq!(
            err.to_string(),
            "unsupported subchannel count 17 (expected 1..=16)"
        );
    }
}
