//! Interleaved sample buffers and the pool that recycles them.
//!
//! A [`SampleBuffer`] owns a flat array of interleaved `f32` samples:
//! `samples[i * subchannels + j]` is frame `i` of channel `j`. Buffers are
//! move-only values, so exactly one pipeline stage owns a buffer at any time.
//!
//! The [`BufferPool`] keeps one free list per subchannel count (`0..=16`).
//! Released buffers are handed out again by later [`allocate`](BufferPool::allocate)
//! calls of the same subchannel class, and their storage is only replaced when
//! a request needs more frames than the buffer can hold. Once every class in use
//! has a buffer of sufficient capacity, processing performs no heap allocation.

#[cfg(not(feature = "std"))]
use alloc::vec;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// Largest subchannel count a buffer (and the pool) supports.
pub const MAX_SUBCHANNELS: usize = 16;

/// An owned block of interleaved multi-channel samples.
///
/// `len` frames are logically valid; `capacity` frames are allocated.
/// `len <= capacity` always holds.
#[derive(Debug)]
pub struct SampleBuffer {
    data: Vec<f32>,
    subchannels: usize,
    capacity: usize,
    len: usize,
}

impl SampleBuffer {
    /// Allocates a zeroed buffer outside any pool.
    ///
    /// # Panics
    ///
    /// Panics if `subchannels > MAX_SUBCHANNELS`.
    pub fn new(subchannels: usize, length: usize) -> Self {
        assert!(
            subchannels <= MAX_SUBCHANNELS,
            "subchannel count {subchannels} exceeds {MAX_SUBCHANNELS}"
        );
        Self {
            data: vec![0.0; length * subchannels],
            subchannels,
            capacity: length,
            len: length,
        }
    }

    /// Number of interleaved channels.
    #[inline]
    pub fn subchannels(&self) -> usize {
        self.subchannels
    }

    /// Number of valid frames (samples per channel).
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the buffer holds no frames.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of frames the storage can hold without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The `len * subchannels` valid samples.
    #[inline]
    pub fn samples(&self) -> &[f32] {
        &self.data[..self.len * self.subchannels]
    }

    /// Mutable view of the `len * subchannels` valid samples.
    #[inline]
    pub fn samples_mut(&mut self) -> &mut [f32] {
        let end = self.len * self.subchannels;
        &mut self.data[..end]
    }

    /// The interleaved samples of frame `index`, one per subchannel.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    #[inline]
    pub fn frame(&self, index: usize) -> &[f32] {
        assert!(index < self.len, "frame {index} out of range");
        let start = index * self.subchannels;
        &self.data[start..start + self.subchannels]
    }

    /// Iterates over the samples of one channel.
    ///
    /// # Panics
    ///
    /// Panics if `channel >= subchannels()`.
    pub fn channel_iter(&self, channel: usize) -> impl Iterator<Item = f32> + '_ {
        assert!(channel < self.subchannels, "channel {channel} out of range");
        self.samples()
            .iter()
            .skip(channel)
            .step_by(self.subchannels)
            .copied()
    }

    /// Overwrites the valid samples with the first `len * subchannels` values of `src`.
    ///
    /// # Panics
    ///
    /// Panics if `src` is shorter than `len * subchannels`.
    pub fn copy_from_slice(&mut self, src: &[f32]) {
        let n = self.len * self.subchannels;
        self.data[..n].copy_from_slice(&src[..n]);
    }

    /// Replaces the storage with a zeroed allocation of `length` frames.
    fn grow(&mut self, length: usize) {
        self.data = vec![0.0; length * self.subchannels];
        self.capacity = length;
    }
}

/// Allocation counters for a [`BufferPool`].
///
/// In steady state only `reuses` and `releases` keep increasing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Buffers created because no free buffer of that class existed.
    pub fresh_allocations: usize,
    /// Reused buffers whose storage had to grow.
    pub reallocations: usize,
    /// Reused buffers whose storage was already large enough.
    pub reuses: usize,
    /// Buffers returned to the pool.
    pub releases: usize,
}

/// Free lists of [`SampleBuffer`]s keyed by subchannel count.
///
/// The pool is owned by the processing context and passed by `&mut` into every
/// stage, so independent pipelines never share buffers. It is not synchronized:
/// one thread drives it at a time.
#[derive(Debug)]
pub struct BufferPool {
    /// One lazily created free list per subchannel class.
    slots: [Option<Vec<SampleBuffer>>; MAX_SUBCHANNELS + 1],
    stats: PoolStats,
}

impl BufferPool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self {
            slots: core::array::from_fn(|_| None),
            stats: PoolStats::default(),
        }
    }

    /// Returns a buffer with the given shape.
    ///
    /// The most recently released buffer of the same subchannel class is reused
    /// when available; its storage is replaced only if its capacity is smaller
    /// than `length`. Sample contents of a reused buffer are unspecified.
    ///
    /// # Panics
    ///
    /// Panics if `subchannels > MAX_SUBCHANNELS`.
    pub fn allocate(&mut self, subchannels: usize, length: usize) -> SampleBuffer {
        assert!(
            subchannels <= MAX_SUBCHANNELS,
            "subchannel count {subchannels} exceeds {MAX_SUBCHANNELS}"
        );
        let reused = self.slots[subchannels].get_or_insert_with(Vec::new).pop();
        match reused {
            Some(mut buffer) => {
                if buffer.capacity < length {
                    buffer.grow(length);
                    self.stats.reallocations += 1;
                } else {
                    self.stats.reuses += 1;
                }
                buffer.len = length;
                buffer
            }
            None => {
                self.stats.fresh_allocations += 1;
                SampleBuffer::new(subchannels, length)
            }
        }
    }

    /// Returns a buffer to the free list of its subchannel class.
    pub fn release(&mut self, buffer: SampleBuffer) {
        self.stats.releases += 1;
        self.slots[buffer.subchannels]
            .get_or_insert_with(Vec::new)
            .push(buffer);
    }

    /// Number of free buffers waiting in the given subchannel class.
    pub fn available(&self, subchannels: usize) -> usize {
        self.slots
            .get(subchannels)
            .and_then(Option::as_ref)
            .map_or(0, Vec::len)
    }

    /// Allocation counters since the pool was created.
    pub fn stats(&self) -> PoolStats {
        self.stats
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new()
    }
}
