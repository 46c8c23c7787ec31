//! Core Filter trait.
//!
//! The [`Filter`] trait is the contract every node of a filter graph
//! implements: a channel-count check, a one-time sample-rate preparation, and
//! block processing over pooled [`SampleBuffer`]s.
//!
//! ## Design Decisions
//!
//! - **Borrowed input**: `apply` receives its input by shared reference, so a
//!   filter can neither mutate nor release a buffer it does not own.
//!
//! - **Owned output**: a filter either passes its input through (`None`) or
//!   hands ownership of a new pooled buffer to the caller (`Some`). Whoever
//!   holds the returned buffer releases it to the pool once it is superseded.
//!
//! - **Object-safe**: graphs store `Box<dyn Filter + Send>` so that sequences
//!   can mix any node types chosen at runtime.

#[cfg(not(feature = "std"))]
use alloc::boxed::Box;

use crate::buffer::{BufferPool, SampleBuffer};
use crate::error::FilterError;

/// A node in a filter graph.
///
/// # Example
///
/// ```rust
/// use filtra_core::{BufferPool, Filter, FilterError, SampleBuffer};
///
/// /// Multiplies every sample by a constant.
/// struct Gain(f32);
///
/// impl Filter for Gain {
///     fn check_subchannels(&self, subchannels: usize) -> Result<usize, FilterError> {
///         Ok(subchannels)
///     }
///
///     fn prepare(&mut self, _sample_rate: u32) {}
///
///     fn apply(&mut self, input: &SampleBuffer, pool: &mut BufferPool) -> Option<SampleBuffer> {
///         let mut out = pool.allocate(input.subchannels(), input.len());
///         for (o, i) in out.samples_mut().iter_mut().zip(input.samples()) {
///             *o = i * self.0;
///         }
///         Some(out)
///     }
/// }
/// ```
pub trait Filter {
    /// Returns the subchannel count this filter produces for `subchannels` on input.
    ///
    /// Pure and deterministic: it depends only on the graph structure and the
    /// argument, never on earlier `apply` calls. Fails if the count is unsupported.
    fn check_subchannels(&self, subchannels: usize) -> Result<usize, FilterError>;

    /// Computes sample-rate-dependent state.
    ///
    /// Must be called on every node before the first [`apply`](Self::apply).
    /// Idempotent: once a filter has been prepared, further calls do not
    /// change its behavior.
    fn prepare(&mut self, sample_rate: u32);

    /// Processes one block.
    ///
    /// Returns `None` to pass the input through unchanged, or `Some(buffer)`
    /// with a buffer now owned by the caller. Buffers allocated internally and
    /// not returned must be released to `pool` before returning.
    ///
    /// # Panics
    ///
    /// Implementations may panic when called out of contract (before
    /// [`prepare`](Self::prepare), or with a subchannel count that
    /// [`check_subchannels`](Self::check_subchannels) rejects).
    fn apply(&mut self, input: &SampleBuffer, pool: &mut BufferPool) -> Option<SampleBuffer>;
}

impl<F: Filter + ?Sized> Filter for Box<F> {
    #[inline]
    fn check_subchannels(&self, subchannels: usize) -> Result<usize, FilterError> {
        (**self).check_subchannels(subchannels)
    }

    #[inline]
    fn prepare(&mut self, sample_rate: u32) {
        (**self).prepare(sample_rate);
    }

    #[inline]
    fn apply(&mut self, input: &SampleBuffer, pool: &mut BufferPool) -> Option<SampleBuffer> {
        (**self).apply(input, pool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Passthrough;

    impl Filter for Passthrough {
        fn check_subchannels(&self, subchannels: usize) -> Result<usize, FilterError> {
            Ok(subchannels)
        }
        fn prepare(&mut self, _: u32) {}
        fn apply(&mut self, _: &SampleBuffer, _: &mut BufferPool) -> Option<SampleBuffer> {
            None
        }
    }

    #[test]
    fn boxed_filter_forwards() {
        let mut filter: Box<dyn Filter + Send> = Box::new(Passthrough);
        let mut pool = BufferPool::new();
        let input = SampleBuffer::new(2, 4);
        assert_eq!(filter.check_subchannels(2), Ok(2));
        filter.prepare(48000);
        assert!(filter.apply(&input, &mut pool).is_none());
    }
}
