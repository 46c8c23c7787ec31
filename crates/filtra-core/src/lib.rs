//! Filtra Core - real-time filter graphs over pooled sample buffers
//!
//! This crate provides a composable graph of digital filters that transforms
//! blocks of interleaved multi-channel `f32` audio, plus the buffer pool that
//! keeps the transformation allocation-free once warmed up.
//!
//! # Core Abstractions
//!
//! ## Buffers
//!
//! - [`SampleBuffer`] - Owned, move-only block of interleaved samples
//! - [`BufferPool`] - Free lists of buffers keyed by subchannel count
//!
//! ## Filter Graph
//!
//! - [`Filter`] - Object-safe trait every graph node implements
//! - [`Biquad`] - Second-order IIR filter with RBJ cookbook coefficients (8 kinds)
//! - [`Sequence`] - Serial composition of filters
//! - [`FilterSpec`] / [`normalize`] - Builds a graph from nested specifications
//!
//! ## Entry Points
//!
//! - [`run`] - Filters a caller-owned flat sample array in place
//! - [`Pipeline`] - A graph bundled with the pool it processes from
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible (with `alloc`).
//! Disable the default `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! filtra-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use filtra_core::{BiquadParams, FilterSpec, Pipeline};
//!
//! let mut pipeline = Pipeline::new(FilterSpec::List(vec![
//!     BiquadParams::new("highpass", 80.0).into(),
//!     BiquadParams::new("lowshelf", 200.0).with_gain(-3.0).into(),
//! ]))
//! .unwrap();
//!
//! assert_eq!(pipeline.check_subchannels(2), Ok(2));
//! pipeline.prepare(48000);
//!
//! // Once per audio callback: 256 stereo frames, filtered in place.
//! let mut block = vec![0.0f32; 256 * 2];
//! pipeline.process(&mut block, 2);
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: No allocations in steady-state processing
//! - **Single owner**: Buffers move between stages; the compiler enforces release rules
//! - **Explicit pools**: No process-wide state; each pipeline owns its pool
//! - **Object-safe traits**: Graphs mix node types behind `Box<dyn Filter>`

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod biquad;
pub mod buffer;
pub mod error;
pub mod filter;
pub mod graph;
pub mod pipeline;
pub mod sequence;

// Re-export main types at crate root
pub use biquad::{Biquad, BiquadKind, Coefficients};
pub use buffer::{BufferPool, MAX_SUBCHANNELS, PoolStats, SampleBuffer};
pub use error::FilterError;
pub use filter::Filter;
pub use graph::{BiquadParams, DEFAULT_Q, FilterSpec, normalize};
pub use pipeline::{Pipeline, run};
pub use sequence::{MAX_CHILDREN, Sequence};
