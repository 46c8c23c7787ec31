//! Bridge between a caller-owned flat sample array and the pooled pipeline.
//!
//! [`run`] is the per-block entry point an audio engine calls: it copies the
//! caller's interleaved samples into a pooled buffer, applies the filter graph,
//! copies the result back in place and returns every buffer to the pool.
//!
//! [`Pipeline`] bundles a root filter with the [`BufferPool`] it draws from, so
//! each processing context owns its buffers and independent pipelines never
//! share state.

use crate::buffer::{BufferPool, MAX_SUBCHANNELS, SampleBuffer};
use crate::error::FilterError;
use crate::filter::Filter;
use crate::graph::{FilterSpec, normalize};

#[cfg(not(feature = "std"))]
use alloc::boxed::Box;

/// Filters `length` interleaved frames of `samples` in place.
///
/// # Panics
///
/// Panics if `samples` holds fewer than `length * subchannels` values, if
/// `subchannels` exceeds [`MAX_SUBCHANNELS`], or if the
/// filter returns a block of a different shape (an out-of-contract graph).
pub fn run(
    filter: &mut dyn Filter,
    pool: &mut BufferPool,
    samples: &mut [f32],
    subchannels: usize,
    length: usize,
) {
    let count = length * subchannels;
    assert!(
        samples.len() >= count,
        "sample array holds {} values, block needs {count}",
        samples.len()
    );

    let mut input = pool.allocate(subchannels, length);
    input.copy_from_slice(samples);

    if let Some(output) = filter.apply(&input, pool) {
        assert!(
            output.subchannels() == subchannels && output.len() == length,
            "filter changed block shape from {subchannels}x{length} to {}x{}",
            output.subchannels(),
            output.len()
        );
        samples[..count].copy_from_slice(output.samples());
        pool.release(output);
    }

    pool.release(input);
}

/// A filter graph together with the buffer pool it processes from.
pub struct Pipeline {
    root: Box<dyn Filter + Send>,
    pool: BufferPool,
    sample_rate: Option<u32>,
}

impl Pipeline {
    /// Normalizes `spec` into a graph with an empty pool.
    ///
    /// # Errors
    ///
    /// Returns the first construction error in the specification.
    pub fn new(spec: impl Into<FilterSpec>) -> Result<Self, FilterError> {
        Ok(Self::from_filter(normalize(spec.into())?))
    }

    /// Wraps an already built graph.
    pub fn from_filter(root: Box<dyn Filter + Send>) -> Self {
        Self {
            root,
            pool: BufferPool::new(),
            sample_rate: None,
        }
    }

    /// Output subchannel count for `subchannels` input channels.
    ///
    /// Counts above [`MAX_SUBCHANNELS`] are rejected whatever the root
    /// accepts, since [`process`](Self::process) could not pool them.
    pub fn check_subchannels(&self, subchannels: usize) -> Result<usize, FilterError> {
        if subchannels > MAX_SUBCHANNELS {
            return Err(FilterError::UnsupportedSubchannels {
                subchannels,
                min: 0,
                max: MAX_SUBCHANNELS,
            });
        }
        self.root.check_subchannels(subchannels)
    }

    /// Prepares every node of the graph for `sample_rate`.
    pub fn prepare(&mut self, sample_rate: u32) {
        #[cfg(feature = "tracing")]
        tracing::debug!("pipeline_prepare: {sample_rate} Hz");
        self.root.prepare(sample_rate);
        self.sample_rate.get_or_insert(sample_rate);
    }

    /// Sample rate of the first [`prepare`](Self::prepare) call.
    pub fn sample_rate(&self) -> Option<u32> {
        self.sample_rate
    }

    /// Filters a whole interleaved block in place.
    ///
    /// The frame count is `samples.len() / subchannels`; trailing values that
    /// do not form a full frame are left untouched.
    ///
    /// # Panics
    ///
    /// Panics if `subchannels` is zero or exceeds [`MAX_SUBCHANNELS`], and
    /// under the same
    /// conditions as [`run`].
    pub fn process(&mut self, samples: &mut [f32], subchannels: usize) {
        assert!(subchannels > 0, "cannot infer frame count for 0 subchannels");
        let length = samples.len() / subchannels;
        run(self.root.as_mut(), &mut self.pool, samples, subchannels, length);
    }

    /// Applies the graph to a buffer, returning the caller-owned result.
    ///
    /// `None` means the graph passed `input` through.
    pub fn apply(&mut self, input: &SampleBuffer) -> Option<SampleBuffer> {
        self.root.apply(input, &mut self.pool)
    }

    /// Returns a buffer obtained from [`apply`](Self::apply) to the pool.
    pub fn release(&mut self, buffer: SampleBuffer) {
        self.pool.release(buffer);
    }

    /// The pool backing this pipeline.
    pub fn pool(&self) -> &BufferPool {
        &self.pool
    }
}
