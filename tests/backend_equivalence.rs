//! The selected backend against the always-compiled scalar-array fallback.
//!
//! Arithmetic, bitwise, comparison and the `sincos`/`exp`/`log` kernels must
//! agree bit for bit. Only the `f32` `rsqrt`/`recip` estimates are allowed to
//! differ, within their documented relative error.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use lanewise::simd::fallback::ScalarVec;
use lanewise::simd::{
    BackendReport, Element, F32x4, F32x8, F64x2, F64x4, I32x4, I32x8, SimdArith, SimdFloat,
    SimdInt, SimdMask, SimdVector, U32x4,
};

const ROUNDS: usize = 256;

fn bits<V: SimdVector>(v: V) -> Vec<<V::Scalar as Element>::Bits> {
    (0..V::LANES).map(|lane| v.extract(lane).to_bits()).collect()
}

fn random_array<T, const N: usize>(rng: &mut StdRng, sample: impl Fn(&mut StdRng) -> T) -> [T; N] {
    std::array::from_fn(|_| sample(rng))
}

/// Asserts that `$native` and `$scalar` agree bit for bit.
macro_rules! assert_same {
    ($native:expr, $scalar:expr, $what:expr, $input:expr) => {
        assert_eq!(
            bits($native),
            bits($scalar),
            "{} differs for input {:?}",
            $what,
            $input
        );
    };
}

fn check_float<V, const N: usize>(a: [V::Scalar; N], b: [V::Scalar; N])
where
    V: SimdFloat,
    V::Scalar: lanewise::simd::LaneWidth<N, Vector = V> + lanewise::simd::Float,
    ScalarVec<V::Scalar, N>: SimdFloat<Scalar = V::Scalar, Mask = V::Mask>,
{
    let (na, nb) = (V::from_slice(&a), V::from_slice(&b));
    let (sa, sb) = (ScalarVec::from_array(a), ScalarVec::from_array(b));

    assert_same!(na + nb, sa + sb, "add", (a, b));
    assert_same!(na - nb, sa - sb, "sub", (a, b));
    assert_same!(na * nb, sa * sb, "mul", (a, b));
    assert_same!(na / nb, sa / sb, "div", (a, b));
    assert_same!(na % nb, sa % sb, "rem", (a, b));
    assert_same!(-na, -sa, "neg", a);
    assert_same!(SimdArith::min(na, nb), SimdArith::min(sa, sb), "min", (a, b));
    assert_same!(SimdArith::max(na, nb), SimdArith::max(sa, sb), "max", (a, b));
    assert_same!(na.abs(), sa.abs(), "abs", a);
    assert_same!(na.abs().sqrt(), sa.abs().sqrt(), "sqrt", a);
    assert_same!(na.sincos().0, sa.sincos().0, "sin", a);
    assert_same!(na.sincos().1, sa.sincos().1, "cos", a);
    assert_same!(na.exp(), sa.exp(), "exp", a);
    assert_same!(na.log(), sa.log(), "log", a);
    assert_same!(na.abs().log(), sa.abs().log(), "log |x|", a);

    assert_same!(na.less(nb), sa.less(sb), "less", (a, b));
    assert_same!(na.less_equal(nb), sa.less_equal(sb), "less_equal", (a, b));
    assert_same!(na.greater(nb), sa.greater(sb), "greater", (a, b));
    assert_same!(na.greater_equal(nb), sa.greater_equal(sb), "greater_equal", (a, b));
    assert_same!(na.equal(nb), sa.equal(sb), "equal", (a, b));
    assert_same!(na.not_equal(nb), sa.not_equal(sb), "not_equal", (a, b));

    let condition = na.less(nb);
    assert_same!(
        V::select(condition, na, nb),
        ScalarVec::select(condition, sa, sb),
        "select",
        (a, b)
    );
    assert_same!(V::mask(condition, na), ScalarVec::mask(condition, sa), "mask", a);
}

fn check_int<V, const N: usize>(a: [V::Scalar; N], b: [V::Scalar; N], count: u32)
where
    V: SimdInt,
    V::Scalar: lanewise::simd::LaneWidth<N, Vector = V> + lanewise::simd::Integer,
    ScalarVec<V::Scalar, N>: SimdInt<Scalar = V::Scalar, Mask = V::Mask>,
{
    let (na, nb) = (V::from_slice(&a), V::from_slice(&b));
    let (sa, sb) = (ScalarVec::from_array(a), ScalarVec::from_array(b));

    assert_same!(na + nb, sa + sb, "add", (a, b));
    assert_same!(na - nb, sa - sb, "sub", (a, b));
    assert_same!(na * nb, sa * sb, "mul", (a, b));
    assert_same!(na / nb, sa / sb, "div", (a, b));
    assert_same!(na % nb, sa % sb, "rem", (a, b));
    assert_same!(na & nb, sa & sb, "and", (a, b));
    assert_same!(na | nb, sa | sb, "or", (a, b));
    assert_same!(na ^ nb, sa ^ sb, "xor", (a, b));
    assert_same!(!na, !sa, "not", a);
    assert_same!(na << count, sa << count, "shl", (a, count));
    assert_same!(na >> count, sa >> count, "shr", (a, count));
    assert_same!(SimdArith::min(na, nb), SimdArith::min(sa, sb), "min", (a, b));
    assert_same!(SimdArith::max(na, nb), SimdArith::max(sa, sb), "max", (a, b));

    assert_same!(na.less(nb), sa.less(sb), "less", (a, b));
    assert_same!(na.less_equal(nb), sa.less_equal(sb), "less_equal", (a, b));
    assert_same!(na.greater(nb), sa.greater(sb), "greater", (a, b));
    assert_same!(na.greater_equal(nb), sa.greater_equal(sb), "greater_equal", (a, b));
    assert_same!(na.equal(nb), sa.equal(sb), "equal", (a, b));
    assert_same!(na.not_equal(nb), sa.not_equal(sb), "not_equal", (a, b));
}

fn nonzero_i32(rng: &mut StdRng) -> i32 {
    match rng.random_range(-1000..=1000) {
        0 => 1,
        value => value,
    }
}

#[test]
fn test_f32_equivalence() {
    let mut rng = StdRng::seed_from_u64(1);
    let sample = |rng: &mut StdRng| rng.random_range(-100.0f32..=100.0);

    for _ in 0..ROUNDS {
        check_float::<F32x4, 4>(random_array(&mut rng, sample), random_array(&mut rng, sample));
        check_float::<F32x8, 8>(random_array(&mut rng, sample), random_array(&mut rng, sample));
    }
}

#[test]
fn test_f64_equivalence() {
    let mut rng = StdRng::seed_from_u64(2);
    let sample = |rng: &mut StdRng| rng.random_range(-700.0f64..=700.0);

    for _ in 0..ROUNDS {
        check_float::<F64x2, 2>(random_array(&mut rng, sample), random_array(&mut rng, sample));
        check_float::<F64x4, 4>(random_array(&mut rng, sample), random_array(&mut rng, sample));
    }
}

#[test]
fn test_float_special_values_equivalence() {
    let a = [0.0f32, -0.0, f32::INFINITY, f32::NEG_INFINITY];
    let b = [1.0f32, -1.0, 2.0, f32::MAX];
    check_float::<F32x4, 4>(a, b);

    let a = [f64::MIN_POSITIVE, -1.0e6];
    let b = [f64::INFINITY, 0.5];
    check_float::<F64x2, 2>(a, b);

    // Range edges of exp and subnormal log inputs.
    check_float::<F32x4, 4>([1.0e-40, 88.5, -100.0, 88.72], [2.0, -0.5, 3.0, 1.0]);
    check_float::<F64x2, 2>([1.0e-310, 709.5], [-740.0, 2.0]);
    check_float::<F64x2, 2>([-740.0, 5.0e-324], [1.0, 1.0]);
}

#[test]
fn test_i32_equivalence() {
    let mut rng = StdRng::seed_from_u64(3);
    let any = |rng: &mut StdRng| rng.random::<i32>();

    for round in 0..ROUNDS {
        let count = (round % 40) as u32;
        check_int::<I32x4, 4>(
            random_array(&mut rng, any),
            random_array(&mut rng, nonzero_i32),
            count,
        );
        check_int::<I32x8, 8>(
            random_array(&mut rng, any),
            random_array(&mut rng, nonzero_i32),
            count,
        );
    }
}

#[test]
fn test_u32_equivalence() {
    let mut rng = StdRng::seed_from_u64(4);
    let any = |rng: &mut StdRng| rng.random::<u32>();
    let nonzero = |rng: &mut StdRng| rng.random_range(1..=u32::MAX);

    for round in 0..ROUNDS {
        let count = (round % 40) as u32;
        check_int::<U32x4, 4>(random_array(&mut rng, any), random_array(&mut rng, nonzero), count);
    }
}

#[test]
fn test_f32_estimates_within_tolerance() {
    let mut rng = StdRng::seed_from_u64(5);

    for _ in 0..ROUNDS {
        let lanes: [f32; 4] = random_array(&mut rng, |rng| rng.random_range(1e-6f32..=1e6));
        let native = F32x4::from_slice(&lanes);
        let scalar = ScalarVec::<f32, 4>::from_array(lanes);

        for (n, s) in [(native.rsqrt(), scalar.rsqrt()), (native.recip(), scalar.recip())] {
            for (lane, expected) in s.to_array().into_iter().enumerate() {
                let error = ((n.extract(lane) - expected) / expected).abs();
                assert!(error <= 1e-4, "estimate for {} off by {error:.3e}", lanes[lane]);
            }
        }
    }
}

#[test]
fn test_mask_reductions_equivalence() {
    let mut rng = StdRng::seed_from_u64(6);

    for _ in 0..ROUNDS {
        let a: [f32; 4] = random_array(&mut rng, |rng| rng.random_range(-1.0f32..=1.0));
        let native = F32x4::from_slice(&a).less(F32x4::splat(0.0));
        let scalar = ScalarVec::<f32, 4>::from_array(a).less(ScalarVec::splat(0.0));

        let expected = a
            .iter()
            .enumerate()
            .fold(0u64, |acc, (lane, x)| acc | (u64::from(*x < 0.0) << lane));

        assert_eq!(native.bitmask(), expected);
        assert_eq!(scalar.bitmask(), expected);
        assert_eq!(native.all(), expected == 0b1111);
        assert_eq!(native.any(), expected != 0);
    }
}

#[test]
fn test_report_lists_every_alias() {
    let report = BackendReport::collect();

    assert_eq!(report.entries.len(), 42);
    assert_eq!(report.backend_of("F32x4"), Some(F32x4::BACKEND));
    assert_eq!(report.backend_of("F32x8"), Some(F32x8::BACKEND));
    assert_eq!(report.backend_of("F32x5"), None);
    assert!(report.native_count() <= report.entries.len());
}
