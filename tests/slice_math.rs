//! Slice-level math: sequential, caller-buffer and parallel variants.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use lanewise::simd::slice::{PARALLEL_CHUNK_SIZE, PARALLEL_THRESHOLD};
use lanewise::simd::SimdMath;
use lanewise::LanewiseError;

fn random_f32(seed: u64, len: usize, low: f32, high: f32) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.random_range(low..=high)).collect()
}

#[test]
fn test_parallel_abs_small_array() {
    let data = vec![1.0f32, -2.0, 3.0, -4.0];
    let result = data.as_slice().par_abs();

    assert_eq!(result, vec![1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn test_parallel_abs_large_array() {
    let data: Vec<f32> = (0..100_000)
        .map(|i| if i % 2 == 0 { i as f32 } else { -(i as f32) })
        .collect();
    let result = data.par_abs();

    for (i, &value) in result.iter().enumerate() {
        assert_eq!(value, i as f32, "par_abs failed at index {i}");
    }
}

#[test]
fn test_parallel_matches_sequential_around_threshold() {
    for len in [
        PARALLEL_THRESHOLD - 1,
        PARALLEL_THRESHOLD,
        PARALLEL_THRESHOLD + 1,
        PARALLEL_THRESHOLD + PARALLEL_CHUNK_SIZE + 7,
    ] {
        let data = random_f32(len as u64, len, -50.0, 50.0);

        assert_eq!(data.par_sin(), data.sin(), "sin, len {len}");
        assert_eq!(data.par_cos(), data.cos(), "cos, len {len}");
        assert_eq!(data.par_exp(), data.exp(), "exp, len {len}");
        assert_eq!(data.par_sqrt().len(), len);
    }
}

#[test]
fn test_parallel_f64_kernels() {
    let len = PARALLEL_THRESHOLD * 2 + 3;
    let data: Vec<f64> = (0..len).map(|i| 1.0 + i as f64 * 1e-3).collect();

    let log = data.par_log();
    let rsqrt = data.par_rsqrt();
    let recip = data.par_recip();
    let (sin, cos) = data.par_sincos();

    assert_eq!(log, data.log());
    for i in (0..len).step_by(4099) {
        let x = data[i];
        assert!((log[i] - x.ln()).abs() <= 1e-13 * x.ln().abs().max(1.0));
        assert_eq!(rsqrt[i], 1.0 / x.sqrt());
        assert_eq!(recip[i], 1.0 / x);
        assert!((sin[i] - x.sin()).abs() <= 1e-12);
        assert!((cos[i] - x.cos()).abs() <= 1e-12);
    }
}

#[test]
fn test_into_variants_fill_caller_buffers() {
    let data = random_f32(3, 37, 0.1, 10.0);
    let mut out = vec![f32::NAN; 37];

    data.log_into(&mut out).expect("same length");
    assert_eq!(out, data.log());

    data.recip_into(&mut out).expect("same length");
    assert_eq!(out, data.recip());

    let mut sin = vec![0.0; 37];
    let mut cos = vec![0.0; 37];
    data.sincos_into(&mut sin, &mut cos).expect("same length");
    assert_eq!((sin, cos), data.sincos());

    let exponent = vec![0.5f32; 37];
    data.pow_into(&exponent, &mut out).expect("same length");
    for (x, y) in data.iter().zip(&out) {
        assert!((y - x.sqrt()).abs() <= 1e-5 * x.sqrt());
    }
}

#[test]
fn test_length_mismatch_reported() {
    let data = [1.0f64; 10];
    let mut short = [0.0f64; 9];

    let error = data.exp_into(&mut short).unwrap_err();
    assert_eq!(
        error,
        LanewiseError::LengthMismatch {
            expected: 10,
            actual: 9
        }
    );
    assert_eq!(error.to_string(), "Length mismatch: expected 10 elements, got 9");
    assert!(short.iter().all(|&v| v == 0.0));

    assert!(data.pow(&[2.0; 11]).is_err());
    assert!(data.pow_into(&[2.0; 10], &mut short).is_err());
}

#[test]
fn test_empty_slices() {
    let empty: [f32; 0] = [];

    assert!(empty.sin().is_empty());
    assert!(empty.par_exp().is_empty());
    assert_eq!(empty.pow(&[]), Ok(Vec::new()));
    assert!(empty.abs_into(&mut []).is_ok());
}

#[test]
fn test_tails_match_full_vectors() {
    let data = random_f32(17, 64, -3.0, 3.0);
    let full = data.exp();

    for len in 1..24 {
        let partial = data[..len].exp();
        assert_eq!(&partial[..], &full[..len], "prefix of {len}");
    }
}
