//! ARM NEON kernel implementations.
//!
//! Register-level forms of the scalar reference kernels in `fallback::math`.
//! Each kernel evaluates the same clamps, reduction constants and polynomial
//! steps in the same order with separate multiply and add instructions, so its
//! lanes reproduce the scalar results bit for bit inside the reduction range.
//!
//! `vminq`/`vmaxq` are avoided on purpose in the clamps: they propagate NaN,
//! while the reference clamp `x < hi ? x : hi` maps NaN to the bound.
//! Compare-and-`vbslq` reproduces the reference exactly.

use std::arch::aarch64::*;

use crate::simd::consts::{f32 as c32, f64 as c64};

#[inline(always)]
unsafe fn and_f32(mask: uint32x4_t, v: float32x4_t) -> float32x4_t {
    vreinterpretq_f32_u32(vandq_u32(mask, vreinterpretq_u32_f32(v)))
}

#[inline(always)]
unsafe fn and_f64(mask: uint64x2_t, v: float64x2_t) -> float64x2_t {
    vreinterpretq_f64_u64(vandq_u64(mask, vreinterpretq_u64_f64(v)))
}

#[inline(always)]
unsafe fn not_u64(m: uint64x2_t) -> uint64x2_t {
    veorq_u64(m, vdupq_n_u64(u64::MAX))
}

/// `2^n` for integral `n` lanes in the normal exponent range.
#[inline(always)]
unsafe fn pow2_f32(n: float32x4_t) -> float32x4_t {
    let biased = vaddq_s32(vcvtq_s32_f32(n), vdupq_n_s32(c32::EXP_BIAS));
    vreinterpretq_f32_s32(vshlq_n_s32::<23>(biased))
}

#[inline(always)]
unsafe fn pow2_f64(n: float64x2_t) -> float64x2_t {
    let biased = vaddq_s64(vcvtq_s64_f64(n), vdupq_n_s64(c64::EXP_BIAS));
    vreinterpretq_f64_s64(vshlq_n_s64::<52>(biased))
}

/// Reciprocal square root: `vrsqrteq` estimate refined by one `vrsqrtsq`
/// step. Lanes equal to `0` or `+inf` keep the estimate.
#[inline(always)]
pub unsafe fn vrsqrtq_f32(x: float32x4_t) -> float32x4_t {
    let est = vrsqrteq_f32(x);
    let refined = vmulq_f32(est, vrsqrtsq_f32(vmulq_f32(x, est), est));

    let keep = vorrq_u32(
        vceqq_f32(x, vdupq_n_f32(0.0)),
        vceqq_f32(x, vdupq_n_f32(f32::INFINITY)),
    );
    vbslq_f32(keep, est, refined)
}

/// Reciprocal: `vrecpeq` estimate refined by one `vrecpsq` step. Lanes equal
/// to `0` or `inf` keep the estimate.
#[inline(always)]
pub unsafe fn vrecipq_f32(x: float32x4_t) -> float32x4_t {
    let est = vrecpeq_f32(x);
    let refined = vmulq_f32(vrecpsq_f32(x, est), est);

    let keep = vorrq_u32(
        vceqq_f32(x, vdupq_n_f32(0.0)),
        vceqq_f32(vabsq_f32(x), vdupq_n_f32(f32::INFINITY)),
    );
    vbslq_f32(keep, est, refined)
}

/// `(sin x, cos x)` for 4 lanes.
#[inline(always)]
pub unsafe fn vsincosq_f32(x: float32x4_t) -> (float32x4_t, float32x4_t) {
    let bits = vreinterpretq_u32_f32(x);
    let sign_mask = vdupq_n_u32(c32::SIGN_MASK);
    let mut sign_sin = vandq_u32(bits, sign_mask);
    let ax = vreinterpretq_f32_u32(vbicq_u32(bits, sign_mask));
    let invalid = vmvnq_u32(vcleq_f32(ax, vdupq_n_f32(f32::MAX)));

    let mut j = vcvtq_s32_f32(vmulq_f32(ax, vdupq_n_f32(c32::FOPI)));
    j = vandq_s32(vaddq_s32(j, vdupq_n_s32(1)), vdupq_n_s32(!1));
    let y = vcvtq_f32_s32(j);

    let sin_poly = vceqq_s32(vandq_s32(j, vdupq_n_s32(2)), vdupq_n_s32(0));
    sign_sin = veorq_u32(
        sign_sin,
        vshlq_n_u32::<29>(vreinterpretq_u32_s32(vandq_s32(j, vdupq_n_s32(4)))),
    );
    let sign_cos = vshlq_n_u32::<29>(vreinterpretq_u32_s32(vbicq_s32(
        vdupq_n_s32(4),
        vsubq_s32(j, vdupq_n_s32(2)),
    )));

    let mut r = vsubq_f32(ax, vmulq_f32(y, vdupq_n_f32(c32::DP1)));
    r = vsubq_f32(r, vmulq_f32(y, vdupq_n_f32(c32::DP2)));
    r = vsubq_f32(r, vmulq_f32(y, vdupq_n_f32(c32::DP3)));
    let z = vmulq_f32(r, r);

    let mut yc = vaddq_f32(vmulq_f32(vdupq_n_f32(c32::COS_P0), z), vdupq_n_f32(c32::COS_P1));
    yc = vaddq_f32(vmulq_f32(yc, z), vdupq_n_f32(c32::COS_P2));
    yc = vmulq_f32(yc, z);
    yc = vmulq_f32(yc, z);
    yc = vsubq_f32(yc, vmulq_f32(z, vdupq_n_f32(0.5)));
    yc = vaddq_f32(yc, vdupq_n_f32(1.0));

    let mut ys = vaddq_f32(vmulq_f32(vdupq_n_f32(c32::SIN_P0), z), vdupq_n_f32(c32::SIN_P1));
    ys = vaddq_f32(vmulq_f32(ys, z), vdupq_n_f32(c32::SIN_P2));
    ys = vmulq_f32(ys, z);
    ys = vmulq_f32(ys, r);
    ys = vaddq_f32(ys, r);

    let s = vreinterpretq_u32_f32(vbslq_f32(sin_poly, ys, yc));
    let c = vreinterpretq_u32_f32(vbslq_f32(sin_poly, yc, ys));

    (
        vreinterpretq_f32_u32(vorrq_u32(veorq_u32(s, sign_sin), invalid)),
        vreinterpretq_f32_u32(vorrq_u32(veorq_u32(c, sign_cos), invalid)),
    )
}

/// `e^x` for 4 lanes.
#[inline(always)]
pub unsafe fn vexpq_f32(x: float32x4_t) -> float32x4_t {
    let hi = vdupq_n_f32(c32::EXP_HI);
    let lo = vdupq_n_f32(c32::EXP_LO);
    let one = vdupq_n_f32(1.0);

    let nan = vmvnq_u32(vceqq_f32(x, x));
    let overflow = vcgtq_f32(x, hi);
    let underflow = vcltq_f32(x, lo);

    let x = vbslq_f32(vcltq_f32(x, hi), x, hi);
    let x = vbslq_f32(vcgtq_f32(x, lo), x, lo);

    let fx = vaddq_f32(vmulq_f32(x, vdupq_n_f32(c32::LOG2E)), vdupq_n_f32(0.5));
    let t = vcvtq_f32_s32(vcvtq_s32_f32(fx));
    let n = vsubq_f32(t, and_f32(vcgtq_f32(t, fx), one));

    let x = vsubq_f32(x, vmulq_f32(n, vdupq_n_f32(c32::EXP_C1)));
    let x = vsubq_f32(x, vmulq_f32(n, vdupq_n_f32(c32::EXP_C2)));
    let z = vmulq_f32(x, x);

    let mut y = vaddq_f32(vmulq_f32(vdupq_n_f32(c32::EXP_P0), x), vdupq_n_f32(c32::EXP_P1));
    y = vaddq_f32(vmulq_f32(y, x), vdupq_n_f32(c32::EXP_P2));
    y = vaddq_f32(vmulq_f32(y, x), vdupq_n_f32(c32::EXP_P3));
    y = vaddq_f32(vmulq_f32(y, x), vdupq_n_f32(c32::EXP_P4));
    y = vaddq_f32(vmulq_f32(y, x), vdupq_n_f32(c32::EXP_P5));
    y = vmulq_f32(y, z);
    y = vaddq_f32(y, x);
    y = vaddq_f32(y, one);

    let n_max = vdupq_n_f32(c32::EXP_N_MAX);
    let n_min = vdupq_n_f32(c32::EXP_N_MIN);
    let n_hi = vbslq_f32(vcltq_f32(n, n_max), n, n_max);
    let n_hi = vbslq_f32(vcgtq_f32(n_hi, n_min), n_hi, n_min);
    let n_lo = vsubq_f32(n, n_hi);
    let mut result = vmulq_f32(y, pow2_f32(n_hi));
    result = vmulq_f32(result, pow2_f32(n_lo));

    result = vbslq_f32(overflow, vdupq_n_f32(f32::INFINITY), result);
    let bits = vbicq_u32(vreinterpretq_u32_f32(result), underflow);
    vreinterpretq_f32_u32(vorrq_u32(bits, nan))
}

/// Natural logarithm for 4 lanes.
#[inline(always)]
pub unsafe fn vlogq_f32(x: float32x4_t) -> float32x4_t {
    let one = vdupq_n_f32(1.0);
    let invalid = vmvnq_u32(vcgtq_f32(x, vdupq_n_f32(0.0)));
    let infinite = vceqq_f32(x, vdupq_n_f32(f32::INFINITY));

    let tiny = vcltq_f32(x, vdupq_n_f32(f32::MIN_POSITIVE));
    let x = vbslq_f32(tiny, vmulq_f32(x, vdupq_n_f32(c32::SUBNORMAL_SCALE)), x);
    let bits = vreinterpretq_u32_f32(x);

    let exponent = vsubq_s32(
        vreinterpretq_s32_u32(vshrq_n_u32::<23>(bits)),
        vdupq_n_s32(c32::EXP_BIAS),
    );
    let mut e = vcvtq_f32_s32(vaddq_s32(exponent, vdupq_n_s32(1)));
    e = vsubq_f32(e, and_f32(tiny, vdupq_n_f32(c32::SUBNORMAL_SHIFT)));
    let m = vreinterpretq_f32_u32(vorrq_u32(
        vbicq_u32(bits, vdupq_n_u32(c32::EXP_MASK)),
        vdupq_n_u32(c32::HALF_BITS),
    ));

    let below = vcltq_f32(m, vdupq_n_f32(c32::SQRTHF));
    let mut x = vsubq_f32(m, one);
    e = vsubq_f32(e, and_f32(below, one));
    x = vaddq_f32(x, and_f32(below, m));
    let z = vmulq_f32(x, x);

    let mut y = vaddq_f32(vmulq_f32(vdupq_n_f32(c32::LOG_P0), x), vdupq_n_f32(c32::LOG_P1));
    for c in [
        c32::LOG_P2,
        c32::LOG_P3,
        c32::LOG_P4,
        c32::LOG_P5,
        c32::LOG_P6,
        c32::LOG_P7,
        c32::LOG_P8,
    ] {
        y = vaddq_f32(vmulq_f32(y, x), vdupq_n_f32(c));
    }
    y = vmulq_f32(y, x);
    y = vmulq_f32(y, z);

    y = vaddq_f32(y, vmulq_f32(e, vdupq_n_f32(c32::LOG_Q1)));
    y = vsubq_f32(y, vmulq_f32(z, vdupq_n_f32(0.5)));
    x = vaddq_f32(x, y);
    x = vaddq_f32(x, vmulq_f32(e, vdupq_n_f32(c32::LOG_Q2)));

    x = vbslq_f32(infinite, vdupq_n_f32(f32::INFINITY), x);
    vreinterpretq_f32_u32(vorrq_u32(vreinterpretq_u32_f32(x), invalid))
}

/// `(sin x, cos x)` for 2 lanes.
#[inline(always)]
pub unsafe fn vsincosq_f64(x: float64x2_t) -> (float64x2_t, float64x2_t) {
    let bits = vreinterpretq_u64_f64(x);
    let sign_mask = vdupq_n_u64(c64::SIGN_MASK);
    let mut sign_sin = vandq_u64(bits, sign_mask);
    let ax = vreinterpretq_f64_u64(vbicq_u64(bits, sign_mask));
    let invalid = not_u64(vcleq_f64(ax, vdupq_n_f64(f64::MAX)));

    let mut j = vcvtq_s64_f64(vmulq_f64(ax, vdupq_n_f64(c64::FOPI)));
    j = vandq_s64(vaddq_s64(j, vdupq_n_s64(1)), vdupq_n_s64(!1));
    let y = vcvtq_f64_s64(j);

    let sin_poly = vceqq_s64(vandq_s64(j, vdupq_n_s64(2)), vdupq_n_s64(0));
    sign_sin = veorq_u64(
        sign_sin,
        vshlq_n_u64::<61>(vreinterpretq_u64_s64(vandq_s64(j, vdupq_n_s64(4)))),
    );
    let sign_cos = vreinterpretq_u64_s64(vshlq_n_s64::<61>(vbicq_s64(
        vdupq_n_s64(4),
        vsubq_s64(j, vdupq_n_s64(2)),
    )));

    let mut r = vsubq_f64(ax, vmulq_f64(y, vdupq_n_f64(c64::DP1)));
    r = vsubq_f64(r, vmulq_f64(y, vdupq_n_f64(c64::DP2)));
    r = vsubq_f64(r, vmulq_f64(y, vdupq_n_f64(c64::DP3)));
    let z = vmulq_f64(r, r);

    let mut yc = vaddq_f64(vmulq_f64(vdupq_n_f64(c64::COS_P0), z), vdupq_n_f64(c64::COS_P1));
    for c in [c64::COS_P2, c64::COS_P3, c64::COS_P4, c64::COS_P5] {
        yc = vaddq_f64(vmulq_f64(yc, z), vdupq_n_f64(c));
    }
    yc = vmulq_f64(yc, z);
    yc = vmulq_f64(yc, z);
    yc = vsubq_f64(yc, vmulq_f64(z, vdupq_n_f64(0.5)));
    yc = vaddq_f64(yc, vdupq_n_f64(1.0));

    let mut ys = vaddq_f64(vmulq_f64(vdupq_n_f64(c64::SIN_P0), z), vdupq_n_f64(c64::SIN_P1));
    for c in [c64::SIN_P2, c64::SIN_P3, c64::SIN_P4, c64::SIN_P5] {
        ys = vaddq_f64(vmulq_f64(ys, z), vdupq_n_f64(c));
    }
    ys = vmulq_f64(ys, z);
    ys = vmulq_f64(ys, r);
    ys = vaddq_f64(ys, r);

    let s = vreinterpretq_u64_f64(vbslq_f64(sin_poly, ys, yc));
    let c = vreinterpretq_u64_f64(vbslq_f64(sin_poly, yc, ys));

    (
        vreinterpretq_f64_u64(vorrq_u64(veorq_u64(s, sign_sin), invalid)),
        vreinterpretq_f64_u64(vorrq_u64(veorq_u64(c, sign_cos), invalid)),
    )
}

/// `e^x` for 2 lanes.
#[inline(always)]
pub unsafe fn vexpq_f64(x: float64x2_t) -> float64x2_t {
    let hi = vdupq_n_f64(c64::EXP_HI);
    let lo = vdupq_n_f64(c64::EXP_LO);
    let one = vdupq_n_f64(1.0);

    let nan = not_u64(vceqq_f64(x, x));
    let overflow = vcgtq_f64(x, hi);
    let underflow = vcltq_f64(x, lo);

    let x = vbslq_f64(vcltq_f64(x, hi), x, hi);
    let x = vbslq_f64(vcgtq_f64(x, lo), x, lo);

    let fx = vaddq_f64(vmulq_f64(x, vdupq_n_f64(c64::LOG2E)), vdupq_n_f64(0.5));
    let t = vcvtq_f64_s64(vcvtq_s64_f64(fx));
    let n = vsubq_f64(t, and_f64(vcgtq_f64(t, fx), one));

    let x = vsubq_f64(x, vmulq_f64(n, vdupq_n_f64(c64::EXP_C1)));
    let x = vsubq_f64(x, vmulq_f64(n, vdupq_n_f64(c64::EXP_C2)));
    let z = vmulq_f64(x, x);

    let mut y = vdupq_n_f64(c64::EXP_TAYLOR[0]);
    for &c in &c64::EXP_TAYLOR[1..] {
        y = vaddq_f64(vmulq_f64(y, x), vdupq_n_f64(c));
    }
    y = vmulq_f64(y, z);
    y = vaddq_f64(y, x);
    y = vaddq_f64(y, one);

    let n_max = vdupq_n_f64(c64::EXP_N_MAX);
    let n_min = vdupq_n_f64(c64::EXP_N_MIN);
    let n_hi = vbslq_f64(vcltq_f64(n, n_max), n, n_max);
    let n_hi = vbslq_f64(vcgtq_f64(n_hi, n_min), n_hi, n_min);
    let n_lo = vsubq_f64(n, n_hi);
    let mut result = vmulq_f64(y, pow2_f64(n_hi));
    result = vmulq_f64(result, pow2_f64(n_lo));

    result = vbslq_f64(overflow, vdupq_n_f64(f64::INFINITY), result);
    let bits = vbicq_u64(vreinterpretq_u64_f64(result), underflow);
    vreinterpretq_f64_u64(vorrq_u64(bits, nan))
}

/// Natural logarithm for 2 lanes.
#[inline(always)]
pub unsafe fn vlogq_f64(x: float64x2_t) -> float64x2_t {
    let one = vdupq_n_f64(1.0);
    let invalid = not_u64(vcgtq_f64(x, vdupq_n_f64(0.0)));
    let infinite = vceqq_f64(x, vdupq_n_f64(f64::INFINITY));

    let tiny = vcltq_f64(x, vdupq_n_f64(f64::MIN_POSITIVE));
    let x = vbslq_f64(tiny, vmulq_f64(x, vdupq_n_f64(c64::SUBNORMAL_SCALE)), x);
    let bits = vreinterpretq_u64_f64(x);

    let exponent = vsubq_s64(
        vreinterpretq_s64_u64(vshrq_n_u64::<52>(bits)),
        vdupq_n_s64(c64::EXP_BIAS),
    );
    let mut e = vcvtq_f64_s64(vaddq_s64(exponent, vdupq_n_s64(1)));
    e = vsubq_f64(e, and_f64(tiny, vdupq_n_f64(c64::SUBNORMAL_SHIFT)));
    let mut m = vreinterpretq_f64_u64(vorrq_u64(
        vbicq_u64(bits, vdupq_n_u64(c64::EXP_MASK)),
        vdupq_n_u64(c64::HALF_BITS),
    ));

    let below = vcltq_f64(m, vdupq_n_f64(c64::SQRTHF));
    m = vaddq_f64(m, and_f64(below, m));
    e = vsubq_f64(e, and_f64(below, one));

    let y = vdivq_f64(vsubq_f64(m, one), vaddq_f64(m, one));
    let z = vmulq_f64(y, y);

    let mut p = vdupq_n_f64(c64::LOG_ATANH[0]);
    for &c in &c64::LOG_ATANH[1..] {
        p = vaddq_f64(vmulq_f64(p, z), vdupq_n_f64(c));
    }
    p = vmulq_f64(p, z);

    let s = vaddq_f64(y, y);
    let log_m = vaddq_f64(s, vmulq_f64(s, p));
    let mut result = vaddq_f64(
        vmulq_f64(e, vdupq_n_f64(c64::LN2_HI)),
        vaddq_f64(log_m, vmulq_f64(e, vdupq_n_f64(c64::LN2_LO))),
    );

    result = vbslq_f64(infinite, vdupq_n_f64(f64::INFINITY), result);
    vreinterpretq_f64_u64(vorrq_u64(vreinterpretq_u64_f64(result), invalid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::fallback::math::{exp_f64, log_f64, sincos_f32, sincos_f64};

    fn lanes_f32(v: float32x4_t) -> [f32; 4] {
        let mut out = [0.0f32; 4];
        unsafe { vst1q_f32(out.as_mut_ptr(), v) };
        out
    }

    fn lanes_f64(v: float64x2_t) -> [f64; 2] {
        let mut out = [0.0f64; 2];
        unsafe { vst1q_f64(out.as_mut_ptr(), v) };
        out
    }

    #[test]
    fn test_estimates_after_one_step() {
        let x = [0.25f32, 2.0, 1.0e6, 3.0e-5];
        let r = lanes_f32(unsafe { vrsqrtq_f32(vld1q_f32(x.as_ptr())) });
        let q = lanes_f32(unsafe { vrecipq_f32(vld1q_f32(x.as_ptr())) });

        for i in 0..4 {
            let rsqrt = 1.0 / x[i].sqrt();
            let recip = 1.0 / x[i];
            assert!(((r[i] - rsqrt) / rsqrt).abs() < 1e-4, "rsqrt({})", x[i]);
            assert!(((q[i] - recip) / recip).abs() < 1e-4, "recip({})", x[i]);
        }

        let edges = [0.0f32, f32::INFINITY, 1.0, 4.0];
        let r = lanes_f32(unsafe { vrsqrtq_f32(vld1q_f32(edges.as_ptr())) });
        assert_eq!(r[0], f32::INFINITY);
        assert_eq!(r[1], 0.0);
    }

    #[test]
    fn test_sincos_f32_bits() {
        let x = [-3.5f32, 0.0, 1.2, 8191.0];
        let (s, c) = unsafe { vsincosq_f32(vld1q_f32(x.as_ptr())) };
        let (s, c) = (lanes_f32(s), lanes_f32(c));

        for i in 0..4 {
            let (rs, rc) = sincos_f32(x[i]);
            assert_eq!(s[i].to_bits(), rs.to_bits());
            assert_eq!(c[i].to_bits(), rc.to_bits());
        }
    }

    #[test]
    fn test_f64_kernels_bits() {
        for x in [[1.2f64, -740.0], [709.5, 1.0e-310]] {
            let v = unsafe { vld1q_f64(x.as_ptr()) };
            let (s, c) = unsafe { vsincosq_f64(v) };
            let e = lanes_f64(unsafe { vexpq_f64(v) });
            let l = lanes_f64(unsafe { vlogq_f64(v) });
            let (s, c) = (lanes_f64(s), lanes_f64(c));

            for i in 0..2 {
                let (rs, rc) = sincos_f64(x[i]);
                assert_eq!(s[i].to_bits(), rs.to_bits());
                assert_eq!(c[i].to_bits(), rc.to_bits());
                assert_eq!(e[i].to_bits(), exp_f64(x[i]).to_bits(), "exp({})", x[i]);
                assert_eq!(l[i].to_bits(), log_f64(x[i]).to_bits(), "log({})", x[i]);
            }
        }
    }
}
