//! Criterion benchmarks for the stereo saturator
//!
//! Run with: cargo bench -p ember-effects
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use ember_core::{Algorithm, FilterSlope, OversampleQuality};
use ember_effects::{Saturator, SaturatorParams};

const SAMPLE_RATE: f64 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 256, 1024];

fn generate_test_signal(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5
        })
        .collect()
}

fn bench_quality(c: &mut Criterion) {
    let mut group = c.benchmark_group("Saturator/quality");

    for quality in OversampleQuality::ALL {
        let mut sat = Saturator::new(SAMPLE_RATE);
        sat.set_params(SaturatorParams {
            algorithm: Algorithm::Tape,
            drive_db: 12.0,
            pre_low_cut_hz: 40.0,
            post_high_cut_hz: 12000.0,
            post_slope: FilterSlope::Slope24dB,
            quality,
            ..SaturatorParams::default()
        });
        let input = generate_test_signal(256);

        group.bench_with_input(
            BenchmarkId::from_parameter(quality.factor()),
            &quality,
            |b, _| {
                let mut left = input.clone();
                let mut right = input.clone();
                b.iter(|| {
                    left.copy_from_slice(&input);
                    right.copy_from_slice(&input);
                    sat.process_block(black_box(&mut left), black_box(&mut right));
                    black_box(left[0])
                })
            },
        );
    }

    group.finish();
}

fn bench_block_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("Saturator/block");

    for &block_size in BLOCK_SIZES {
        let mut sat = Saturator::new(SAMPLE_RATE);
        sat.set_params(SaturatorParams {
            algorithm: Algorithm::Triode,
            drive_db: 9.0,
            ..SaturatorParams::default()
        });
        let input = generate_test_signal(block_size);

        group.bench_with_input(
            BenchmarkId::from_parameter(block_size),
            &block_size,
            |b, _| {
                let mut left = input.clone();
                let mut right = input.clone();
                b.iter(|| {
                    left.copy_from_slice(&input);
                    right.copy_from_slice(&input);
                    sat.process_block(black_box(&mut left), black_box(&mut right));
                    black_box(left[0])
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_quality, bench_block_size);
criterion_main!(benches);
