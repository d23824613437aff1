//! Criterion benchmarks for ember-core DSP primitives
//!
//! Run with: cargo bench -p ember-core
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use ember_core::{
    Algorithm, FilterSlope, FilterType, HighPrecisionFilter, MAX_OVERSAMPLE_FACTOR,
    OversampleQuality, Oversampler, SaturationCore,
};

const SAMPLE_RATE: f64 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 256, 1024];

fn generate_test_signal(size: usize) -> Vec<f64> {
    (0..size)
        .map(|i| {
            let t = i as f64 / SAMPLE_RATE;
            (2.0 * std::f64::consts::PI * 440.0 * t).sin() * 0.5
        })
        .collect()
}

fn bench_saturation(c: &mut Criterion) {
    let mut group = c.benchmark_group("SaturationCore");
    let input = generate_test_signal(256);

    for algo in Algorithm::ALL {
        group.bench_with_input(BenchmarkId::new("process", algo.id()), &algo, |b, &algo| {
            let mut core = SaturationCore::new();
            core.prepare(SAMPLE_RATE);
            b.iter(|| {
                for &sample in &input {
                    black_box(core.process(black_box(sample), algo, 12.0, 0.5));
                }
            });
        });
    }

    group.finish();
}

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("HighPrecisionFilter");

    for slope in FilterSlope::ALL {
        for &block_size in BLOCK_SIZES {
            let input = generate_test_signal(block_size);
            group.bench_with_input(
                BenchmarkId::new(format!("lowpass_{}db", slope.db()), block_size),
                &block_size,
                |b, _| {
                    let mut filter = HighPrecisionFilter::new();
                    filter.prepare(SAMPLE_RATE);
                    filter.set_params(FilterType::LowPass, 2000.0, slope);
                    b.iter(|| {
                        for &sample in &input {
                            black_box(filter.process(black_box(sample)));
                        }
                    });
                },
            );
        }
    }

    // Cache hit: the per-sample cost when the processor re-sends unchanged params
    group.bench_function("set_params_cached", |b| {
        let mut filter = HighPrecisionFilter::new();
        filter.prepare(SAMPLE_RATE);
        filter.set_params(FilterType::HighPass, 80.0, FilterSlope::Slope48dB);
        b.iter(|| {
            filter.set_params(FilterType::HighPass, black_box(80.001), FilterSlope::Slope48dB);
        });
    });

    group.finish();
}

fn bench_oversampler(c: &mut Criterion) {
    let mut group = c.benchmark_group("Oversampler");
    let input = generate_test_signal(256);

    for quality in OversampleQuality::ALL {
        group.bench_with_input(
            BenchmarkId::new("tape_roundtrip", quality.factor()),
            &quality,
            |b, &quality| {
                let mut os = Oversampler::new(quality);
                let mut core = SaturationCore::new();
                core.prepare(SAMPLE_RATE * quality.factor() as f64);
                let mut work = [0.0; MAX_OVERSAMPLE_FACTOR];
                let n = os.factor();
                b.iter(|| {
                    for &sample in &input {
                        os.upsample_into(black_box(sample), &mut work);
                        for s in &mut work[..n] {
                            *s = core.process(*s, Algorithm::Tape, 12.0, 0.5);
                        }
                        black_box(os.downsample_from(&work[..n]));
                    }
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_saturation, bench_filter, bench_oversampler);
criterion_main!(benches);
