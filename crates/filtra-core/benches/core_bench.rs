//! Criterion benchmarks for filtra-core
//!
//! Run with: cargo bench -p filtra-core
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use filtra_core::{
    Biquad, BiquadKind, BiquadParams, BufferPool, Coefficients, Filter, FilterSpec, Pipeline, run,
};

const SAMPLE_RATE: u32 = 48000;
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512, 1024];

fn generate_test_signal(frames: usize, subchannels: usize) -> Vec<f32> {
    (0..frames * subchannels)
        .map(|i| {
            let t = (i / subchannels) as f32 / SAMPLE_RATE as f32;
            (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5
        })
        .collect()
}

fn bench_biquad(c: &mut Criterion) {
    let mut group = c.benchmark_group("Biquad");

    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size, 2);

        group.bench_with_input(
            BenchmarkId::new("run_stereo", block_size),
            &block_size,
            |b, &frames| {
                let mut biquad = Biquad::new(BiquadKind::Lowpass, 1000.0, 0.707, 0.0);
                biquad.prepare(SAMPLE_RATE);
                let mut pool = BufferPool::new();
                let mut block = input.clone();
                b.iter(|| {
                    run(&mut biquad, &mut pool, black_box(&mut block), 2, frames);
                });
            },
        );
    }

    // Coefficient calculation cost
    group.bench_function("coefficient_calc", |b| {
        b.iter(|| {
            black_box(Coefficients::design(
                black_box(BiquadKind::Highshelf),
                black_box(1000.0),
                black_box(0.707),
                black_box(6.0),
                black_box(SAMPLE_RATE),
            ))
        });
    });

    group.finish();
}

/// Sequence overhead: a long chain exercises the midpoint split.
fn bench_sequence(c: &mut Criterion) {
    let mut group = c.benchmark_group("Sequence");

    for &length in &[1usize, 4, 8, 9, 32] {
        let input = generate_test_signal(256, 2);

        group.bench_with_input(BenchmarkId::new("chain", length), &length, |b, &n| {
            let spec = FilterSpec::List(
                (0..n)
                    .map(|i| {
                        BiquadParams::new("peaking", 100.0 * (i + 1) as f32)
                            .with_gain(1.0)
                            .into()
                    })
                    .collect(),
            );
            let mut pipeline = Pipeline::new(spec).unwrap();
            pipeline.prepare(SAMPLE_RATE);
            let mut block = input.clone();
            b.iter(|| pipeline.process(black_box(&mut block), 2));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_biquad, bench_sequence);
criterion_main!(benches);
