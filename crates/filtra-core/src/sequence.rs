//! Serial composition of filters.
//!
//! A [`Sequence`] runs its children in order, feeding each child's output into
//! the next. Lists longer than [`MAX_CHILDREN`] are split at the midpoint into
//! two nested sequences, recursively, so every node dispatches over at most
//! eight children. The split changes the shape of the graph, never its output.

#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, vec, vec::Vec};

use crate::buffer::{BufferPool, MAX_SUBCHANNELS, SampleBuffer};
use crate::error::FilterError;
use crate::filter::Filter;
use crate::graph::{FilterSpec, normalize};

/// Maximum number of direct children of one [`Sequence`] node.
pub const MAX_CHILDREN: usize = 8;

/// Filters applied one after another.
///
/// An empty sequence passes its input through.
pub struct Sequence {
    children: Vec<Box<dyn Filter + Send>>,
    /// Levels of sequence nodes introduced by splitting, this one included.
    depth: usize,
}

impl Sequence {
    /// Builds a sequence from filter specifications, normalizing each element.
    ///
    /// # Errors
    ///
    /// Returns the first error raised while normalizing an element.
    pub fn new(specs: Vec<FilterSpec>) -> Result<Self, FilterError> {
        let filters = specs
            .into_iter()
            .map(normalize)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_filters(filters))
    }

    /// Builds a sequence from already constructed filters.
    pub fn from_filters(mut filters: Vec<Box<dyn Filter + Send>>) -> Self {
        if filters.len() <= MAX_CHILDREN {
            return Self {
                children: filters,
                depth: 1,
            };
        }

        let back = filters.split_off(filters.len() / 2);
        #[cfg(feature = "tracing")]
        tracing::debug!("sequence_split: {} + {} children", filters.len(), back.len());
        let front = Self::from_filters(filters);
        let back = Self::from_filters(back);
        Self {
            depth: 1 + front.depth.max(back.depth),
            children: vec![Box::new(front), Box::new(back)],
        }
    }

    /// Number of direct children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Returns true if the sequence has no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Nesting depth created by splitting; 1 for a list of at most
    /// [`MAX_CHILDREN`] filters.
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl Filter for Sequence {
    fn check_subchannels(&self, subchannels: usize) -> Result<usize, FilterError> {
        // Buffers wider than the pool supports cannot pass even an empty sequence.
        if subchannels > MAX_SUBCHANNELS {
            return Err(FilterError::UnsupportedSubchannels {
                subchannels,
                min: 0,
                max: MAX_SUBCHANNELS,
            });
        }
        self.children
            .iter()
            .try_fold(subchannels, |n, child| child.check_subchannels(n))
    }

    fn prepare(&mut self, sample_rate: u32) {
        for child in &mut self.children {
            child.prepare(sample_rate);
        }
    }

    fn apply(&mut self, input: &SampleBuffer, pool: &mut BufferPool) -> Option<SampleBuffer> {
        // `None` while every child so far has passed through.
        let mut current: Option<SampleBuffer> = None;

        for child in &mut self.children {
            let source = current.as_ref().unwrap_or(input);
            if let Some(next) = child.apply(source, pool)
                && let Some(superseded) = current.replace(next)
            {
                pool.release(superseded);
            }
        }

        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Adds a constant to every sample.
    struct Offset(f32);

    impl Filter for Offset {
        fn check_subchannels(&self, subchannels: usize) -> Result<usize, FilterError> {
            Ok(subchannels)
        }
        fn prepare(&mut self, _: u32) {}
        fn apply(&mut self, input: &SampleBuffer, pool: &mut BufferPool) -> Option<SampleBuffer> {
            let mut out = pool.allocate(input.subchannels(), input.len());
            for (o, i) in out.samples_mut().iter_mut().zip(input.samples()) {
                *o = i + self.0;
            }
            Some(out)
        }
    }

    /// Multiplies every sample by a constant.
    struct Scale(f32);

    impl Filter for Scale {
        fn check_subchannels(&self, subchannels: usize) -> Result<usize, FilterError> {
            Ok(subchannels)
        }
        fn prepare(&mut self, _: u32) {}
        fn apply(&mut self, input: &SampleBuffer, pool: &mut BufferPool) -> Option<SampleBuffer> {
            let mut out = pool.allocate(input.subchannels(), input.len());
            for (o, i) in out.samples_mut().iter_mut().zip(input.samples()) {
                *o = i * self.0;
            }
            Some(out)
        }
    }

    /// Passes input through.
    struct Through;

    impl Filter for Through {
        fn check_subchannels(&self, subchannels: usize) -> Result<usize, FilterError> {
            Ok(subchannels)
        }
        fn prepare(&mut self, _: u32) {}
        fn apply(&mut self, _: &SampleBuffer, _: &mut BufferPool) -> Option<SampleBuffer> {
            None
        }
    }

    /// Collapses any input to mono.
    struct Downmix;

    impl Filter for Downmix {
        fn check_subchannels(&self, subchannels: usize) -> Result<usize, FilterError> {
            if subchannels == 0 {
                Err(FilterError::UnsupportedSubchannels {
                    subchannels,
                    min: 1,
                    max: 16,
                })
            } else {
                Ok(1)
            }
        }
        fn prepare(&mut self, _: u32) {}
        fn apply(&mut self, _: &SampleBuffer, _: &mut BufferPool) -> Option<SampleBuffer> {
            unimplemented!()
        }
    }

    fn boxed<F: Filter + Send + 'static>(f: F) -> Box<dyn Filter + Send> {
        Box::new(f)
    }

    fn block(samples: &[f32]) -> SampleBuffer {
        let mut buf = SampleBuffer::new(1, samples.len());
        buf.copy_from_slice(samples);
        buf
    }

    #[test]
    fn children_run_in_order() {
        let mut seq = Sequence::from_filters(vec![boxed(Offset(1.0)), boxed(Scale(10.0))]);
        let mut pool = BufferPool::new();
        let out = seq.apply(&block(&[0.0, 1.0]), &mut pool).unwrap();
        assert_eq!(out.samples(), &[10.0, 20.0]);
    }

    #[test]
    fn superseded_buffers_return_to_pool() {
        let mut seq = Sequence::from_filters(vec![
            boxed(Offset(1.0)),
            boxed(Offset(1.0)),
            boxed(Offset(1.0)),
        ]);
        let mut pool = BufferPool::new();
        let input = block(&[0.0; 4]);
        let out = seq.apply(&input, &mut pool).unwrap();

        assert_eq!(out.samples(), &[3.0; 4]);
        assert_eq!(pool.available(1), 2);
        assert_eq!(input.samples(), &[0.0; 4], "input must be untouched");
    }

    #[test]
    fn all_passthrough_children_pass_through() {
        let mut seq = Sequence::from_filters(vec![boxed(Through), boxed(Through)]);
        let mut pool = BufferPool::new();
        assert!(seq.apply(&block(&[1.0]), &mut pool).is_none());
        assert_eq!(pool.stats().fresh_allocations, 0);
    }

    #[test]
    fn passthrough_after_processing_keeps_current() {
        let mut seq = Sequence::from_filters(vec![boxed(Scale(2.0)), boxed(Through)]);
        let mut pool = BufferPool::new();
        let out = seq.apply(&block(&[1.5]), &mut pool).unwrap();
        assert_eq!(out.samples(), &[3.0]);
        assert_eq!(pool.available(1), 0);
    }

    #[test]
    fn empty_sequence_is_passthrough() {
        let mut seq = Sequence::from_filters(Vec::new());
        let mut pool = BufferPool::new();
        assert!(seq.is_empty());
        assert_eq!(seq.check_subchannels(5), Ok(5));
        assert!(seq.apply(&block(&[1.0]), &mut pool).is_none());
    }

    #[test]
    fn empty_sequence_rejects_more_than_max_subchannels() {
        let seq = Sequence::from_filters(Vec::new());
        assert_eq!(seq.check_subchannels(0), Ok(0));
        assert_eq!(seq.check_subchannels(MAX_SUBCHANNELS), Ok(MAX_SUBCHANNELS));
        assert_eq!(
            seq.check_subchannels(MAX_SUBCHANNELS + 1),
            Err(FilterError::UnsupportedSubchannels {
                subchannels: MAX_SUBCHANNELS + 1,
                min: 0,
                max: MAX_SUBCHANNELS,
            })
        );

        let through = Sequence::from_filters(vec![boxed(Through)]);
        assert!(through.check_subchannels(17).is_err());
    }

    #[test]
    fn check_subchannels_threads_through_children() {
        let seq = Sequence::from_filters(vec![boxed(Through), boxed(Downmix), boxed(Through)]);
        assert_eq!(seq.check_subchannels(6), Ok(1));
        assert!(seq.check_subchannels(0).is_err());
    }

    #[test]
    fn long_lists_split_at_midpoint() {
        let eight = Sequence::from_filters((0..8).map(|_| boxed(Through)).collect());
        assert_eq!(eight.len(), 8);

        let nine = Sequence::from_filters((0..9).map(|_| boxed(Through)).collect());
        assert_eq!(nine.len(), 2);

        let many = Sequence::from_filters((0..100).map(|_| boxed(Through)).collect());
        assert_eq!(many.len(), 2);
    }

    #[test]
    fn depth_counts_split_levels() {
        let flat = |n: usize| Sequence::from_filters((0..n).map(|_| boxed(Through)).collect());
        assert_eq!(flat(0).depth(), 1);
        assert_eq!(flat(8).depth(), 1);
        assert_eq!(flat(9).depth(), 2);
        assert_eq!(flat(16).depth(), 2);
        assert_eq!(flat(17).depth(), 3);
        assert_eq!(flat(100).depth(), 5);
    }

    #[test]
    fn split_preserves_order() {
        // (((x + 1) * 2 + 1) * 2 ...) depends on order at every step.
        let filters: Vec<_> = (0..20)
            .map(|i| if i % 2 == 0 { boxed(Offset(1.0)) } else { boxed(Scale(2.0)) })
            .collect();
        let mut seq = Sequence::from_filters(filters);
        let mut pool = BufferPool::new();
        let out = seq.apply(&block(&[0.0]), &mut pool).unwrap();

        let mut expected = 0.0f32;
        for i in 0..20 {
            if i % 2 == 0 {
                expected += 1.0;
            } else {
                expected *= 2.0;
            }
        }
        assert_eq!(out.samples(), &[expected]);
    }
}
