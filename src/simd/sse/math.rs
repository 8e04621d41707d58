//! SSE kernel implementations.
//!
//! These are the register-level forms of the scalar reference kernels in
//! `fallback::math`: the same clamps, reduction constants and evaluation
//! order, four (or two) lanes at a time. Data-dependent choices are made with
//! compare masks and [`blend_ps`] / [`blend_pd`], never with branches.
//!
//! | Kernel        | Needs | Method                                         |
//! |---------------|-------|------------------------------------------------|
//! | `rsqrt_ps`    | SSE   | `_mm_rsqrt_ps` + one Newton-Raphson step       |
//! | `recip_ps`    | SSE   | `_mm_rcp_ps` + one Newton-Raphson step         |
//! | `sincos_ps`   | SSE2  | Cephes quadrant reduction, two polynomials     |
//! | `exp_ps`      | SSE2  | `n = floor(x log2 e + 1/2)`, `2^n` from bits   |
//! | `log_ps`      | SSE2  | exponent/mantissa split, Cephes polynomial     |
//! | `sincos_pd`   | SSE2  | double-precision Cephes reduction              |
//! | `exp_pd`      | SSE2  | Taylor series to degree 13                     |
//! | `log_pd`      | SSE2  | `2 atanh((m - 1) / (m + 1))` series            |
//!
//! # Safety
//!
//! Every function here is `unsafe` only because it calls SSE intrinsics; the
//! module is compiled solely for targets that enable the required extension.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

#[cfg(simd_sse2)]
use crate::simd::consts::{f32 as c32, f64 as c64};

/// `(mask & a) | (!mask & b)`.
#[inline(always)]
pub unsafe fn blend_ps(mask: __m128, a: __m128, b: __m128) -> __m128 {
    _mm_or_ps(_mm_and_ps(mask, a), _mm_andnot_ps(mask, b))
}

/// Reciprocal square root: hardware estimate refined once.
///
/// Lanes equal to `0` or `+inf` keep the estimate (`inf` and `0`), which is
/// already exact and which the refinement step would turn into NaN.
#[inline(always)]
pub unsafe fn rsqrt_ps(x: __m128) -> __m128 {
    let est = _mm_rsqrt_ps(x);
    let half_x = _mm_mul_ps(_mm_set1_ps(0.5), x);
    let refined = _mm_mul_ps(
        est,
        _mm_sub_ps(_mm_set1_ps(1.5), _mm_mul_ps(_mm_mul_ps(half_x, est), est)),
    );

    let keep = _mm_or_ps(
        _mm_cmpeq_ps(x, _mm_setzero_ps()),
        _mm_cmpeq_ps(x, _mm_set1_ps(f32::INFINITY)),
    );
    blend_ps(keep, est, refined)
}

/// Reciprocal: hardware estimate refined once. `0` and `inf` lanes keep the
/// estimate.
#[inline(always)]
pub unsafe fn recip_ps(x: __m128) -> __m128 {
    let est = _mm_rcp_ps(x);
    let refined = _mm_mul_ps(est, _mm_sub_ps(_mm_set1_ps(2.0), _mm_mul_ps(x, est)));

    let abs = _mm_andnot_ps(_mm_set1_ps(-0.0), x);
    let keep = _mm_or_ps(
        _mm_cmpeq_ps(x, _mm_setzero_ps()),
        _mm_cmpeq_ps(abs, _mm_set1_ps(f32::INFINITY)),
    );
    blend_ps(keep, est, refined)
}

/// `(sin x, cos x)` for 4 lanes.
///
/// Accurate to about `1e-7` absolute for `|x| <= 8192`; NaN and infinite
/// lanes produce NaN in both outputs.
#[cfg(simd_sse2)]
#[inline(always)]
pub unsafe fn sincos_ps(x: __m128) -> (__m128, __m128) {
    let sign_mask = _mm_set1_ps(-0.0);
    let mut sign_sin = _mm_and_ps(x, sign_mask);
    let ax = _mm_andnot_ps(sign_mask, x);
    let invalid = _mm_cmpnle_ps(ax, _mm_set1_ps(f32::MAX));

    // Quadrant: j = (trunc(|x| * 4/pi) + 1) & !1
    let mut j = _mm_cvttps_epi32(_mm_mul_ps(ax, _mm_set1_ps(c32::FOPI)));
    j = _mm_and_si128(_mm_add_epi32(j, _mm_set1_epi32(1)), _mm_set1_epi32(!1));
    let y = _mm_cvtepi32_ps(j);

    let sin_poly = _mm_castsi128_ps(_mm_cmpeq_epi32(
        _mm_and_si128(j, _mm_set1_epi32(2)),
        _mm_setzero_si128(),
    ));
    sign_sin = _mm_xor_ps(
        sign_sin,
        _mm_castsi128_ps(_mm_slli_epi32::<29>(_mm_and_si128(j, _mm_set1_epi32(4)))),
    );
    let sign_cos = _mm_castsi128_ps(_mm_slli_epi32::<29>(_mm_andnot_si128(
        _mm_sub_epi32(j, _mm_set1_epi32(2)),
        _mm_set1_epi32(4),
    )));

    let mut r = _mm_sub_ps(ax, _mm_mul_ps(y, _mm_set1_ps(c32::DP1)));
    r = _mm_sub_ps(r, _mm_mul_ps(y, _mm_set1_ps(c32::DP2)));
    r = _mm_sub_ps(r, _mm_mul_ps(y, _mm_set1_ps(c32::DP3)));
    let z = _mm_mul_ps(r, r);

    let mut yc = _mm_add_ps(_mm_mul_ps(_mm_set1_ps(c32::COS_P0), z), _mm_set1_ps(c32::COS_P1));
    yc = _mm_add_ps(_mm_mul_ps(yc, z), _mm_set1_ps(c32::COS_P2));
    yc = _mm_mul_ps(yc, z);
    yc = _mm_mul_ps(yc, z);
    yc = _mm_sub_ps(yc, _mm_mul_ps(z, _mm_set1_ps(0.5)));
    yc = _mm_add_ps(yc, _mm_set1_ps(1.0));

    let mut ys = _mm_add_ps(_mm_mul_ps(_mm_set1_ps(c32::SIN_P0), z), _mm_set1_ps(c32::SIN_P1));
    ys = _mm_add_ps(_mm_mul_ps(ys, z), _mm_set1_ps(c32::SIN_P2));
    ys = _mm_mul_ps(ys, z);
    ys = _mm_mul_ps(ys, r);
    ys = _mm_add_ps(ys, r);

    let s = blend_ps(sin_poly, ys, yc);
    let c = blend_ps(sin_poly, yc, ys);

    (
        _mm_or_ps(_mm_xor_ps(s, sign_sin), invalid),
        _mm_or_ps(_mm_xor_ps(c, sign_cos), invalid),
    )
}

/// `2^n` for integral `n` lanes in the normal exponent range.
#[cfg(simd_sse2)]
#[inline(always)]
unsafe fn pow2_ps(n: __m128) -> __m128 {
    let biased = _mm_add_epi32(_mm_cvttps_epi32(n), _mm_set1_epi32(c32::EXP_BIAS));
    _mm_castsi128_ps(_mm_slli_epi32::<23>(biased))
}

/// `e^x` for 4 lanes. Overflow gives `+inf`, results below the smallest
/// subnormal give `0`, NaN stays NaN.
#[cfg(simd_sse2)]
#[inline(always)]
pub unsafe fn exp_ps(x: __m128) -> __m128 {
    let hi = _mm_set1_ps(c32::EXP_HI);
    let lo = _mm_set1_ps(c32::EXP_LO);
    let one = _mm_set1_ps(1.0);

    let nan = _mm_cmpunord_ps(x, x);
    let overflow = _mm_cmpgt_ps(x, hi);
    let underflow = _mm_cmplt_ps(x, lo);

    // _mm_min_ps(a, b) is a < b ? a : b, which also maps NaN to the bound.
    let x = _mm_min_ps(x, hi);
    let x = _mm_max_ps(x, lo);

    let fx = _mm_add_ps(_mm_mul_ps(x, _mm_set1_ps(c32::LOG2E)), _mm_set1_ps(0.5));
    let t = _mm_cvtepi32_ps(_mm_cvttps_epi32(fx));
    let n = _mm_sub_ps(t, _mm_and_ps(_mm_cmpgt_ps(t, fx), one));

    let x = _mm_sub_ps(x, _mm_mul_ps(n, _mm_set1_ps(c32::EXP_C1)));
    let x = _mm_sub_ps(x, _mm_mul_ps(n, _mm_set1_ps(c32::EXP_C2)));
    let z = _mm_mul_ps(x, x);

    let mut y = _mm_add_ps(_mm_mul_ps(_mm_set1_ps(c32::EXP_P0), x), _mm_set1_ps(c32::EXP_P1));
    y = _mm_add_ps(_mm_mul_ps(y, x), _mm_set1_ps(c32::EXP_P2));
    y = _mm_add_ps(_mm_mul_ps(y, x), _mm_set1_ps(c32::EXP_P3));
    y = _mm_add_ps(_mm_mul_ps(y, x), _mm_set1_ps(c32::EXP_P4));
    y = _mm_add_ps(_mm_mul_ps(y, x), _mm_set1_ps(c32::EXP_P5));
    y = _mm_mul_ps(y, z);
    y = _mm_add_ps(y, x);
    y = _mm_add_ps(y, one);

    let n_hi = _mm_min_ps(n, _mm_set1_ps(c32::EXP_N_MAX));
    let n_hi = _mm_max_ps(n_hi, _mm_set1_ps(c32::EXP_N_MIN));
    let n_lo = _mm_sub_ps(n, n_hi);
    let mut result = _mm_mul_ps(y, pow2_ps(n_hi));
    result = _mm_mul_ps(result, pow2_ps(n_lo));

    result = blend_ps(overflow, _mm_set1_ps(f32::INFINITY), result);
    result = _mm_andnot_ps(underflow, result);
    _mm_or_ps(result, nan)
}

/// Natural logarithm for 4 lanes. Lanes `<= 0` and NaN lanes give the
/// all-ones NaN pattern; `+inf` gives `+inf`.
#[cfg(simd_sse2)]
#[inline(always)]
pub unsafe fn log_ps(x: __m128) -> __m128 {
    let one = _mm_set1_ps(1.0);
    let invalid = _mm_cmpngt_ps(x, _mm_setzero_ps());
    let infinite = _mm_cmpeq_ps(x, _mm_set1_ps(f32::INFINITY));

    let tiny = _mm_cmplt_ps(x, _mm_set1_ps(f32::MIN_POSITIVE));
    let x = blend_ps(tiny, _mm_mul_ps(x, _mm_set1_ps(c32::SUBNORMAL_SCALE)), x);
    let bits = _mm_castps_si128(x);

    let exponent = _mm_sub_epi32(_mm_srli_epi32::<23>(bits), _mm_set1_epi32(c32::EXP_BIAS));
    let mut e = _mm_cvtepi32_ps(_mm_add_epi32(exponent, _mm_set1_epi32(1)));
    e = _mm_sub_ps(e, _mm_and_ps(tiny, _mm_set1_ps(c32::SUBNORMAL_SHIFT)));
    let m = _mm_castsi128_ps(_mm_or_si128(
        _mm_andnot_si128(_mm_set1_epi32(c32::EXP_MASK as i32), bits),
        _mm_set1_epi32(c32::HALF_BITS as i32),
    ));

    let below = _mm_cmplt_ps(m, _mm_set1_ps(c32::SQRTHF));
    let mut x = _mm_sub_ps(m, one);
    e = _mm_sub_ps(e, _mm_and_ps(below, one));
    x = _mm_add_ps(x, _mm_and_ps(below, m));
    let z = _mm_mul_ps(x, x);

    let mut y = _mm_add_ps(_mm_mul_ps(_mm_set1_ps(c32::LOG_P0), x), _mm_set1_ps(c32::LOG_P1));
    y = _mm_add_ps(_mm_mul_ps(y, x), _mm_set1_ps(c32::LOG_P2));
    y = _mm_add_ps(_mm_mul_ps(y, x), _mm_set1_ps(c32::LOG_P3));
    y = _mm_add_ps(_mm_mul_ps(y, x), _mm_set1_ps(c32::LOG_P4));
    y = _mm_add_ps(_mm_mul_ps(y, x), _mm_set1_ps(c32::LOG_P5));
    y = _mm_add_ps(_mm_mul_ps(y, x), _mm_set1_ps(c32::LOG_P6));
    y = _mm_add_ps(_mm_mul_ps(y, x), _mm_set1_ps(c32::LOG_P7));
    y = _mm_add_ps(_mm_mul_ps(y, x), _mm_set1_ps(c32::LOG_P8));
    y = _mm_mul_ps(y, x);
    y = _mm_mul_ps(y, z);

    y = _mm_add_ps(y, _mm_mul_ps(e, _mm_set1_ps(c32::LOG_Q1)));
    y = _mm_sub_ps(y, _mm_mul_ps(z, _mm_set1_ps(0.5)));
    x = _mm_add_ps(x, y);
    x = _mm_add_ps(x, _mm_mul_ps(e, _mm_set1_ps(c32::LOG_Q2)));

    x = blend_ps(infinite, _mm_set1_ps(f32::INFINITY), x);
    _mm_or_ps(x, invalid)
}

/// `(mask & a) | (!mask & b)`.
#[cfg(simd_sse2)]
#[inline(always)]
pub unsafe fn blend_pd(mask: __m128d, a: __m128d, b: __m128d) -> __m128d {
    _mm_or_pd(_mm_and_pd(mask, a), _mm_andnot_pd(mask, b))
}

/// `(sin x, cos x)` for 2 lanes.
#[cfg(simd_sse2)]
#[inline(always)]
pub unsafe fn sincos_pd(x: __m128d) -> (__m128d, __m128d) {
    let sign_mask = _mm_set1_pd(-0.0);
    let mut sign_sin = _mm_and_pd(x, sign_mask);
    let ax = _mm_andnot_pd(sign_mask, x);
    let invalid = _mm_cmpnle_pd(ax, _mm_set1_pd(f64::MAX));

    // Quadrant arithmetic runs on two i32 lanes, then each is widened to a
    // 64-bit lane as [j, j] so 32-bit compares and 64-bit shifts both apply.
    let mut j = _mm_cvttpd_epi32(_mm_mul_pd(ax, _mm_set1_pd(c64::FOPI)));
    j = _mm_and_si128(_mm_add_epi32(j, _mm_set1_epi32(1)), _mm_set1_epi32(!1));
    let y = _mm_cvtepi32_pd(j);
    let j = _mm_shuffle_epi32::<0x50>(j);

    let sin_poly = _mm_castsi128_pd(_mm_cmpeq_epi32(
        _mm_and_si128(j, _mm_set1_epi32(2)),
        _mm_setzero_si128(),
    ));
    sign_sin = _mm_xor_pd(
        sign_sin,
        _mm_castsi128_pd(_mm_slli_epi64::<61>(_mm_and_si128(j, _mm_set1_epi32(4)))),
    );
    let sign_cos = _mm_castsi128_pd(_mm_slli_epi64::<61>(_mm_andnot_si128(
        _mm_sub_epi32(j, _mm_set1_epi32(2)),
        _mm_set1_epi32(4),
    )));

    let mut r = _mm_sub_pd(ax, _mm_mul_pd(y, _mm_set1_pd(c64::DP1)));
    r = _mm_sub_pd(r, _mm_mul_pd(y, _mm_set1_pd(c64::DP2)));
    r = _mm_sub_pd(r, _mm_mul_pd(y, _mm_set1_pd(c64::DP3)));
    let z = _mm_mul_pd(r, r);

    let mut yc = _mm_add_pd(_mm_mul_pd(_mm_set1_pd(c64::COS_P0), z), _mm_set1_pd(c64::COS_P1));
    yc = _mm_add_pd(_mm_mul_pd(yc, z), _mm_set1_pd(c64::COS_P2));
    yc = _mm_add_pd(_mm_mul_pd(yc, z), _mm_set1_pd(c64::COS_P3));
    yc = _mm_add_pd(_mm_mul_pd(yc, z), _mm_set1_pd(c64::COS_P4));
    yc = _mm_add_pd(_mm_mul_pd(yc, z), _mm_set1_pd(c64::COS_P5));
    yc = _mm_mul_pd(yc, z);
    yc = _mm_mul_pd(yc, z);
    yc = _mm_sub_pd(yc, _mm_mul_pd(z, _mm_set1_pd(0.5)));
    yc = _mm_add_pd(yc, _mm_set1_pd(1.0));

    let mut ys = _mm_add_pd(_mm_mul_pd(_mm_set1_pd(c64::SIN_P0), z), _mm_set1_pd(c64::SIN_P1));
    ys = _mm_add_pd(_mm_mul_pd(ys, z), _mm_set1_pd(c64::SIN_P2));
    ys = _mm_add_pd(_mm_mul_pd(ys, z), _mm_set1_pd(c64::SIN_P3));
    ys = _mm_add_pd(_mm_mul_pd(ys, z), _mm_set1_pd(c64::SIN_P4));
    ys = _mm_add_pd(_mm_mul_pd(ys, z), _mm_set1_pd(c64::SIN_P5));
    ys = _mm_mul_pd(ys, z);
    ys = _mm_mul_pd(ys, r);
    ys = _mm_add_pd(ys, r);

    let s = blend_pd(sin_poly, ys, yc);
    let c = blend_pd(sin_poly, yc, ys);

    (
        _mm_or_pd(_mm_xor_pd(s, sign_sin), invalid),
        _mm_or_pd(_mm_xor_pd(c, sign_cos), invalid),
    )
}

/// `2^n` for integral `n` lanes in the normal exponent range.
#[cfg(simd_sse2)]
#[inline(always)]
unsafe fn pow2_pd(n: __m128d) -> __m128d {
    // n fits in i32; widen the two low i32 lanes to 64-bit lanes before
    // shifting into the exponent field.
    let biased = _mm_add_epi32(_mm_cvttpd_epi32(n), _mm_set1_epi32(c64::EXP_BIAS as i32));
    _mm_castsi128_pd(_mm_slli_epi64::<52>(_mm_unpacklo_epi32(
        biased,
        _mm_setzero_si128(),
    )))
}

/// `e^x` for 2 lanes.
#[cfg(simd_sse2)]
#[inline(always)]
pub unsafe fn exp_pd(x: __m128d) -> __m128d {
    let hi = _mm_set1_pd(c64::EXP_HI);
    let lo = _mm_set1_pd(c64::EXP_LO);
    let one = _mm_set1_pd(1.0);

    let nan = _mm_cmpunord_pd(x, x);
    let overflow = _mm_cmpgt_pd(x, hi);
    let underflow = _mm_cmplt_pd(x, lo);

    let x = _mm_min_pd(x, hi);
    let x = _mm_max_pd(x, lo);

    let fx = _mm_add_pd(_mm_mul_pd(x, _mm_set1_pd(c64::LOG2E)), _mm_set1_pd(0.5));
    let t = _mm_cvtepi32_pd(_mm_cvttpd_epi32(fx));
    let n = _mm_sub_pd(t, _mm_and_pd(_mm_cmpgt_pd(t, fx), one));

    let x = _mm_sub_pd(x, _mm_mul_pd(n, _mm_set1_pd(c64::EXP_C1)));
    let x = _mm_sub_pd(x, _mm_mul_pd(n, _mm_set1_pd(c64::EXP_C2)));
    let z = _mm_mul_pd(x, x);

    let mut y = _mm_set1_pd(c64::EXP_TAYLOR[0]);
    for &c in &c64::EXP_TAYLOR[1..] {
        y = _mm_add_pd(_mm_mul_pd(y, x), _mm_set1_pd(c));
    }
    y = _mm_mul_pd(y, z);
    y = _mm_add_pd(y, x);
    y = _mm_add_pd(y, one);

    let n_hi = _mm_min_pd(n, _mm_set1_pd(c64::EXP_N_MAX));
    let n_hi = _mm_max_pd(n_hi, _mm_set1_pd(c64::EXP_N_MIN));
    let n_lo = _mm_sub_pd(n, n_hi);
    let mut result = _mm_mul_pd(y, pow2_pd(n_hi));
    result = _mm_mul_pd(result, pow2_pd(n_lo));

    result = blend_pd(overflow, _mm_set1_pd(f64::INFINITY), result);
    result = _mm_andnot_pd(underflow, result);
    _mm_or_pd(result, nan)
}

/// Natural logarithm for 2 lanes.
#[cfg(simd_sse2)]
#[inline(always)]
pub unsafe fn log_pd(x: __m128d) -> __m128d {
    let one = _mm_set1_pd(1.0);
    let invalid = _mm_cmpngt_pd(x, _mm_setzero_pd());
    let infinite = _mm_cmpeq_pd(x, _mm_set1_pd(f64::INFINITY));

    let tiny = _mm_cmplt_pd(x, _mm_set1_pd(f64::MIN_POSITIVE));
    let x = blend_pd(tiny, _mm_mul_pd(x, _mm_set1_pd(c64::SUBNORMAL_SCALE)), x);
    let bits = _mm_castpd_si128(x);

    // Biased exponents fit in the low 32 bits of each lane; pack them into
    // i32 lanes 0 and 1 for the conversion.
    let biased = _mm_shuffle_epi32::<0x08>(_mm_srli_epi64::<52>(bits));
    let exponent = _mm_sub_epi32(biased, _mm_set1_epi32(c64::EXP_BIAS as i32));
    let mut e = _mm_cvtepi32_pd(_mm_add_epi32(exponent, _mm_set1_epi32(1)));
    e = _mm_sub_pd(e, _mm_and_pd(tiny, _mm_set1_pd(c64::SUBNORMAL_SHIFT)));
    let mut m = _mm_castsi128_pd(_mm_or_si128(
        _mm_andnot_si128(_mm_set1_epi64x(c64::EXP_MASK as i64), bits),
        _mm_set1_epi64x(c64::HALF_BITS as i64),
    ));

    let below = _mm_cmplt_pd(m, _mm_set1_pd(c64::SQRTHF));
    m = _mm_add_pd(m, _mm_and_pd(below, m));
    e = _mm_sub_pd(e, _mm_and_pd(below, one));

    let y = _mm_div_pd(_mm_sub_pd(m, one), _mm_add_pd(m, one));
    let z = _mm_mul_pd(y, y);

    let mut p = _mm_set1_pd(c64::LOG_ATANH[0]);
    for &c in &c64::LOG_ATANH[1..] {
        p = _mm_add_pd(_mm_mul_pd(p, z), _mm_set1_pd(c));
    }
    p = _mm_mul_pd(p, z);

    let s = _mm_add_pd(y, y);
    let log_m = _mm_add_pd(s, _mm_mul_pd(s, p));
    let mut result = _mm_add_pd(
        _mm_mul_pd(e, _mm_set1_pd(c64::LN2_HI)),
        _mm_add_pd(log_m, _mm_mul_pd(e, _mm_set1_pd(c64::LN2_LO))),
    );

    result = blend_pd(infinite, _mm_set1_pd(f64::INFINITY), result);
    _mm_or_pd(result, invalid)
}
