//! Sine/cosine throughput: std scalar loop against the slice kernels.
//!
//! Sizes step through the cache hierarchy:
//! - L1 Cache: 4 KiB vectors (raw compute performance)
//! - L2 Cache: 64 KiB vectors
//! - L3 Cache: 1-4 MiB vectors
//! - Main Memory: 16 MiB vectors (memory bandwidth bound)

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use lanewise::simd::{F32x8, SimdFloat, SimdMath, SimdVector};

const VECTOR_SIZES: &[usize] = &[
    1_024,     // 4 KiB - L1 cache
    16_384,    // 64 KiB - L1→L2 transition
    262_144,   // 1 MiB - L2 cache, above the parallel threshold
    1_048_576, // 4 MiB - L3 cache
    4_194_304, // 16 MiB - L3→RAM transition
];

/// Reproducible inputs in `[0, 2π)`.
fn generate_test_data(len: usize) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(42);

    (0..len)
        .map(|_| rng.random::<f32>() * std::f32::consts::TAU)
        .collect()
}

fn format_size(elements: usize) -> String {
    let bytes = elements * std::mem::size_of::<f32>();

    if bytes >= 1_048_576 {
        format!("{:.1} MiB", bytes as f64 / 1_048_576.0)
    } else if bytes >= 1024 {
        format!("{:.1} KiB", bytes as f64 / 1024.0)
    } else {
        format!("{bytes} B")
    }
}

fn benchmark_sincos(c: &mut Criterion) {
    for &size in VECTOR_SIZES {
        let mut group = c.benchmark_group(format!("SinCos {}", format_size(size)));
        group.throughput(Throughput::Bytes((size * std::mem::size_of::<f32>()) as u64));

        let input = generate_test_data(size);
        let input = input.as_slice();

        group.bench_with_input(BenchmarkId::new("Scalar", size), input, |b, input| {
            b.iter(|| {
                black_box(
                    input
                        .iter()
                        .map(|x| x.sin_cos())
                        .collect::<Vec<(f32, f32)>>(),
                )
            })
        });

        group.bench_with_input(BenchmarkId::new("SIMD", size), input, |b, input| {
            b.iter(|| black_box(input.sincos()))
        });

        group.bench_with_input(
            BenchmarkId::new("Parallel SIMD", size),
            input,
            |b, input| b.iter(|| black_box(black_box(input).par_sincos())),
        );

        group.finish();
    }
}

/// One register's worth of work, without memory traffic.
fn benchmark_register(c: &mut Criterion) {
    let mut group = c.benchmark_group("SinCos register");
    let lanes = F32x8::from_slice(&generate_test_data(8));

    group.bench_function("F32x8::sincos", |b| b.iter(|| black_box(black_box(lanes).sincos())));
    group.bench_function("F32x8::sin", |b| b.iter(|| black_box(black_box(lanes).sin())));
    group.finish();
}

criterion_group!(benches, benchmark_sincos, benchmark_register);
criterion_main!(benches);
