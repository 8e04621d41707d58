//! Exponential and logarithm throughput: std scalar loop against the slice
//! kernels, for `f32` and `f64`.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use lanewise::simd::SimdMath;

const VECTOR_SIZES: &[usize] = &[
    1_024,     // L1 cache
    65_536,    // L2 cache
    1_048_576, // L3 cache, parallel path
];

fn generate_f32(len: usize, low: f32, high: f32) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..len).map(|_| rng.random_range(low..high)).collect()
}

fn generate_f64(len: usize, low: f64, high: f64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..len).map(|_| rng.random_range(low..high)).collect()
}

fn benchmark_exp(c: &mut Criterion) {
    for &size in VECTOR_SIZES {
        let mut group = c.benchmark_group(format!("Exp {size}"));
        group.throughput(Throughput::Elements(size as u64));

        let single = generate_f32(size, -20.0, 20.0);
        let double = generate_f64(size, -200.0, 200.0);

        group.bench_with_input(BenchmarkId::new("Scalar f32", size), &single, |b, input| {
            b.iter(|| black_box(input.iter().map(|x| x.exp()).collect::<Vec<f32>>()))
        });
        group.bench_with_input(BenchmarkId::new("SIMD f32", size), &single, |b, input| {
            b.iter(|| black_box(input.exp()))
        });
        group.bench_with_input(BenchmarkId::new("Parallel SIMD f32", size), &single, |b, input| {
            b.iter(|| black_box(input.par_exp()))
        });
        group.bench_with_input(BenchmarkId::new("Scalar f64", size), &double, |b, input| {
            b.iter(|| black_box(input.iter().map(|x| x.exp()).collect::<Vec<f64>>()))
        });
        group.bench_with_input(BenchmarkId::new("SIMD f64", size), &double, |b, input| {
            b.iter(|| black_box(input.exp()))
        });

        group.finish();
    }
}

fn benchmark_log(c: &mut Criterion) {
    for &size in VECTOR_SIZES {
        let mut group = c.benchmark_group(format!("Log {size}"));
        group.throughput(Throughput::Elements(size as u64));

        let single = generate_f32(size, 1e-3, 1e3);
        let double = generate_f64(size, 1e-3, 1e3);

        group.bench_with_input(BenchmarkId::new("Scalar f32", size), &single, |b, input| {
            b.iter(|| black_box(input.iter().map(|x| x.ln()).collect::<Vec<f32>>()))
        });
        group.bench_with_input(BenchmarkId::new("SIMD f32", size), &single, |b, input| {
            b.iter(|| black_box(input.log()))
        });
        group.bench_with_input(BenchmarkId::new("Parallel SIMD f32", size), &single, |b, input| {
            b.iter(|| black_box(input.par_log()))
        });
        group.bench_with_input(BenchmarkId::new("Scalar f64", size), &double, |b, input| {
            b.iter(|| black_box(input.iter().map(|x| x.ln()).collect::<Vec<f64>>()))
        });
        group.bench_with_input(BenchmarkId::new("SIMD f64", size), &double, |b, input| {
            b.iter(|| black_box(input.log()))
        });

        group.finish();
    }
}

fn benchmark_pow(c: &mut Criterion) {
    let size = 65_536;
    let base = generate_f32(size, 0.1, 10.0);
    let exponent = generate_f32(size, -3.0, 3.0);

    let mut group = c.benchmark_group("Pow");
    group.throughput(Throughput::Elements(size as u64));
    group.bench_function("Scalar f32", |b| {
        b.iter(|| {
            black_box(
                base.iter()
                    .zip(&exponent)
                    .map(|(x, e)| x.powf(*e))
                    .collect::<Vec<f32>>(),
            )
        })
    });
    group.bench_function("SIMD f32", |b| b.iter(|| black_box(base.pow(&exponent))));
    group.finish();
}

criterion_group!(benches, benchmark_exp, benchmark_log, benchmark_pow);
criterion_main!(benches);
