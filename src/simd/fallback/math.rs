//! Scalar reference kernels.
//!
//! Each function is the one-lane form of the matching vector kernel: same
//! clamps, same reduction constants, same evaluation order, and no fused
//! multiply-add anywhere. A vector backend that follows the same steps lane by
//! lane therefore produces the same bits for inputs inside the reduction range
//! (`|x| <= 8192` for the trigonometric kernels).
//!
//! Branches here stand in for the vector `select`; each one picks between two
//! values that were both computed, never skips work.

use crate::simd::consts::{f32 as c32, f64 as c64};
use crate::simd::traits::Float;

/// Sine and cosine of one `f32` from a shared quadrant reduction.
#[inline]
pub fn sincos_f32(x: f32) -> (f32, f32) {
    let bits = x.to_bits();
    let mut sign_sin = bits & c32::SIGN_MASK;
    let ax = f32::from_bits(bits & !c32::SIGN_MASK);
    let invalid = !ax.is_finite();

    let mut j = (ax * c32::FOPI) as i32;
    j = j.wrapping_add(1) & !1;
    let y = j as f32;

    let sin_poly = (j & 2) == 0;
    sign_sin ^= ((j & 4) as u32) << 29;
    let sign_cos = ((!j.wrapping_sub(2) & 4) as u32) << 29;

    let r = ((ax - y * c32::DP1) - y * c32::DP2) - y * c32::DP3;
    let z = r * r;

    let mut yc = c32::COS_P0;
    yc = yc * z + c32::COS_P1;
    yc = yc * z + c32::COS_P2;
    yc = yc * z;
    yc = yc * z;
    yc = yc - z * 0.5;
    yc = yc + 1.0;

    let mut ys = c32::SIN_P0;
    ys = ys * z + c32::SIN_P1;
    ys = ys * z + c32::SIN_P2;
    ys = ys * z;
    ys = ys * r;
    ys = ys + r;

    let (s, c) = if sin_poly { (ys, yc) } else { (yc, ys) };
    let nan = if invalid { u32::MAX } else { 0 };

    (
        f32::from_bits((s.to_bits() ^ sign_sin) | nan),
        f32::from_bits((c.to_bits() ^ sign_cos) | nan),
    )
}

/// Sine and cosine of one `f64` from a shared quadrant reduction.
#[inline]
pub fn sincos_f64(x: f64) -> (f64, f64) {
    let bits = x.to_bits();
    let mut sign_sin = bits & c64::SIGN_MASK;
    let ax = f64::from_bits(bits & !c64::SIGN_MASK);
    let invalid = !ax.is_finite();

    let mut j = (ax * c64::FOPI) as i64;
    j = j.wrapping_add(1) & !1;
    let y = j as f64;

    let sin_poly = (j & 2) == 0;
    sign_sin ^= ((j & 4) as u64) << 61;
    let sign_cos = ((!j.wrapping_sub(2) & 4) as u64) << 61;

    let r = ((ax - y * c64::DP1) - y * c64::DP2) - y * c64::DP3;
    let z = r * r;

    let mut yc = c64::COS_P0;
    yc = yc * z + c64::COS_P1;
    yc = yc * z + c64::COS_P2;
    yc = yc * z + c64::COS_P3;
    yc = yc * z + c64::COS_P4;
    yc = yc * z + c64::COS_P5;
    yc = yc * z;
    yc = yc * z;
    yc = yc - z * 0.5;
    yc = yc + 1.0;

    let mut ys = c64::SIN_P0;
    ys = ys * z + c64::SIN_P1;
    ys = ys * z + c64::SIN_P2;
    ys = ys * z + c64::SIN_P3;
    ys = ys * z + c64::SIN_P4;
    ys = ys * z + c64::SIN_P5;
    ys = ys * z;
    ys = ys * r;
    ys = ys + r;

    let (s, c) = if sin_poly { (ys, yc) } else { (yc, ys) };
    let nan = if invalid { u64::MAX } else { 0 };

    (
        f64::from_bits((s.to_bits() ^ sign_sin) | nan),
        f64::from_bits((c.to_bits() ^ sign_cos) | nan),
    )
}

/// `2^n` for an integral `n` in the normal exponent range.
#[inline(always)]
fn pow2_f32(n: f32) -> f32 {
    f32::from_bits(((n as i32 + c32::EXP_BIAS) as u32) << c32::MANTISSA_BITS)
}

/// `2^n` for an integral `n` in the normal exponent range.
#[inline(always)]
fn pow2_f64(n: f64) -> f64 {
    f64::from_bits(((n as i64 + c64::EXP_BIAS) as u64) << c64::MANTISSA_BITS)
}

/// `e^x` for one `f32`.
#[inline]
pub fn exp_f32(x: f32) -> f32 {
    let nan = x.is_nan();
    let overflow = x > c32::EXP_HI;
    let underflow = x < c32::EXP_LO;

    let x = if x < c32::EXP_HI { x } else { c32::EXP_HI };
    let x = if x > c32::EXP_LO { x } else { c32::EXP_LO };

    let fx = x * c32::LOG2E + 0.5;
    let mut n = (fx as i32) as f32;
    n = n - if n > fx { 1.0 } else { 0.0 };

    let x = x - n * c32::EXP_C1;
    let x = x - n * c32::EXP_C2;
    let z = x * x;

    let mut y = c32::EXP_P0;
    y = y * x + c32::EXP_P1;
    y = y * x + c32::EXP_P2;
    y = y * x + c32::EXP_P3;
    y = y * x + c32::EXP_P4;
    y = y * x + c32::EXP_P5;
    y = y * z;
    y = y + x;
    y = y + 1.0;

    // 2^n as two normal factors, so results near f32::MAX and subnormal
    // results are each rounded once.
    let n_hi = if n < c32::EXP_N_MAX { n } else { c32::EXP_N_MAX };
    let n_hi = if n_hi > c32::EXP_N_MIN { n_hi } else { c32::EXP_N_MIN };
    let n_lo = n - n_hi;
    let mut result = y * pow2_f32(n_hi);
    result = result * pow2_f32(n_lo);

    if overflow {
        result = f32::INFINITY;
    }
    if underflow {
        result = 0.0;
    }
    if nan {
        result = f32::from_bits(u32::MAX);
    }
    result
}

/// `e^x` for one `f64`.
#[inline]
pub fn exp_f64(x: f64) -> f64 {
    let nan = x.is_nan();
    let overflow = x > c64::EXP_HI;
    let underflow = x < c64::EXP_LO;

    let x = if x < c64::EXP_HI { x } else { c64::EXP_HI };
    let x = if x > c64::EXP_LO { x } else { c64::EXP_LO };

    let fx = x * c64::LOG2E + 0.5;
    let mut n = (fx as i32) as f64;
    n = n - if n > fx { 1.0 } else { 0.0 };

    let x = x - n * c64::EXP_C1;
    let x = x - n * c64::EXP_C2;
    let z = x * x;

    let mut y = c64::EXP_TAYLOR[0];
    for &c in &c64::EXP_TAYLOR[1..] {
        y = y * x + c;
    }
    y = y * z;
    y = y + x;
    y = y + 1.0;

    let n_hi = if n < c64::EXP_N_MAX { n } else { c64::EXP_N_MAX };
    let n_hi = if n_hi > c64::EXP_N_MIN { n_hi } else { c64::EXP_N_MIN };
    let n_lo = n - n_hi;
    let mut result = y * pow2_f64(n_hi);
    result = result * pow2_f64(n_lo);

    if overflow {
        result = f64::INFINITY;
    }
    if underflow {
        result = 0.0;
    }
    if nan {
        result = f64::from_bits(u64::MAX);
    }
    result
}

/// Natural logarithm of one `f32`. Non-positive and NaN inputs give NaN.
#[inline]
pub fn log_f32(x: f32) -> f32 {
    let invalid = !(x > 0.0);
    let infinite = x == f32::INFINITY;

    // Subnormals are scaled into the normal range first, then the scale is
    // taken back out of the exponent.
    let tiny = x < f32::MIN_POSITIVE;
    let x = if tiny { x * c32::SUBNORMAL_SCALE } else { x };
    let bits = x.to_bits();

    let mut e = ((bits >> c32::MANTISSA_BITS) as i32 - c32::EXP_BIAS + 1) as f32;
    e = e - if tiny { c32::SUBNORMAL_SHIFT } else { 0.0 };
    let m = f32::from_bits((bits & !c32::EXP_MASK) | c32::HALF_BITS);

    let below = m < c32::SQRTHF;
    let mut x = m - 1.0;
    e = e - if below { 1.0 } else { 0.0 };
    x = x + if below { m } else { 0.0 };
    let z = x * x;

    let mut y = c32::LOG_P0;
    y = y * x + c32::LOG_P1;
    y = y * x + c32::LOG_P2;
    y = y * x + c32::LOG_P3;
    y = y * x + c32::LOG_P4;
    y = y * x + c32::LOG_P5;
    y = y * x + c32::LOG_P6;
    y = y * x + c32::LOG_P7;
    y = y * x + c32::LOG_P8;
    y = y * x;
    y = y * z;

    y = y + e * c32::LOG_Q1;
    y = y - z * 0.5;
    x = x + y;
    x = x + e * c32::LOG_Q2;

    if infinite {
        x = f32::INFINITY;
    }
    if invalid {
        x = f32::from_bits(u32::MAX);
    }
    x
}

/// Natural logarithm of one `f64`. Non-positive and NaN inputs give NaN.
#[inline]
pub fn log_f64(x: f64) -> f64 {
    let invalid = !(x > 0.0);
    let infinite = x == f64::INFINITY;

    let tiny = x < f64::MIN_POSITIVE;
    let x = if tiny { x * c64::SUBNORMAL_SCALE } else { x };
    let bits = x.to_bits();

    let mut e = ((bits >> c64::MANTISSA_BITS) as i32 - c64::EXP_BIAS as i32 + 1) as f64;
    e = e - if tiny { c64::SUBNORMAL_SHIFT } else { 0.0 };
    let mut m = f64::from_bits((bits & !c64::EXP_MASK) | c64::HALF_BITS);

    let below = m < c64::SQRTHF;
    m = m + if below { m } else { 0.0 };
    e = e - if below { 1.0 } else { 0.0 };

    let y = (m - 1.0) / (m + 1.0);
    let z = y * y;

    let mut p = c64::LOG_ATANH[0];
    for &c in &c64::LOG_ATANH[1..] {
        p = p * z + c;
    }
    p = p * z;

    let s = y + y;
    let log_m = s + s * p;
    let mut result = e * c64::LN2_HI + (log_m + e * c64::LN2_LO);

    if infinite {
        result = f64::INFINITY;
    }
    if invalid {
        result = f64::from_bits(u64::MAX);
    }
    result
}

impl Float for f32 {
    #[inline(always)]
    fn kernel_sincos(self) -> (Self, Self) {
        sincos_f32(self)
    }

    #[inline(always)]
    fn kernel_exp(self) -> Self {
        exp_f32(self)
    }

    #[inline(always)]
    fn kernel_log(self) -> Self {
        log_f32(self)
    }

    #[inline(always)]
    fn kernel_sqrt(self) -> Self {
        self.sqrt()
    }

    #[inline(always)]
    fn kernel_rsqrt(self) -> Self {
        1.0 / self.sqrt()
    }

    #[inline(always)]
    fn kernel_recip(self) -> Self {
        1.0 / self
    }
}

impl Float for f64 {
    #[inline(always)]
    fn kernel_sincos(self) -> (Self, Self) {
        sincos_f64(self)
    }

    #[inline(always)]
    fn kernel_exp(self) -> Self {
        exp_f64(self)
    }

    #[inline(always)]
    fn kernel_log(self) -> Self {
        log_f64(self)
    }

    #[inline(always)]
    fn kernel_sqrt(self) -> Self {
        self.sqrt()
    }

    #[inline(always)]
    fn kernel_rsqrt(self) -> Self {
        1.0 / self.sqrt()
    }

    #[inline(always)]
    fn kernel_recip(self) -> Self {
        1.0 / self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sincos_f32_reference_point() {
        let (s, c) = sincos_f32(1.2);
        println!("sincos(1.2) = ({s}, {c})");
        assert!((s - 0.932_039).abs() < 1e-3);
        assert!((c - 0.362_358).abs() < 1e-3);
    }

    #[test]
    fn test_sincos_f32_matches_std() {
        let mut x = -100.0f32;
        while x < 100.0 {
            let (s, c) = sincos_f32(x);
            assert!((s - x.sin()).abs() < 1e-5, "sin({x}) = {s}, std {}", x.sin());
            assert!((c - x.cos()).abs() < 1e-5, "cos({x}) = {c}, std {}", x.cos());
            x += 0.173;
        }
    }

    #[test]
    fn test_sincos_f64_matches_std() {
        let mut x = -100.0f64;
        while x < 100.0 {
            let (s, c) = sincos_f64(x);
            assert!((s - x.sin()).abs() < 1e-13, "sin({x}) = {s}, std {}", x.sin());
            assert!((c - x.cos()).abs() < 1e-13, "cos({x}) = {c}, std {}", x.cos());
            x += 0.173;
        }
    }

    #[test]
    fn test_sincos_non_finite_is_nan() {
        for x in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            let (s, c) = sincos_f32(x);
            assert!(s.is_nan() && c.is_nan());
        }
        let (s, c) = sincos_f64(f64::INFINITY);
        assert!(s.is_nan() && c.is_nan());
    }

    #[test]
    fn test_exp_special_values() {
        assert_eq!(exp_f32(0.0), 1.0);
        assert_eq!(exp_f32(100.0), f32::INFINITY);
        assert_eq!(exp_f32(-110.0), 0.0);
        assert!(exp_f32(f32::NAN).is_nan());

        assert_eq!(exp_f64(0.0), 1.0);
        assert_eq!(exp_f64(1000.0), f64::INFINITY);
        assert_eq!(exp_f64(-1000.0), 0.0);
        assert!(exp_f64(f64::NAN).is_nan());
    }

    #[test]
    fn test_exp_edges() {
        assert!(exp_f32(c32::EXP_HI).is_finite());
        assert_eq!(exp_f32(f32::from_bits(c32::EXP_HI.to_bits() + 1)), f32::INFINITY);
        assert!(exp_f64(709.78).is_finite());

        // Gradual underflow down to the smallest subnormal.
        assert!(exp_f32(-100.0) > 0.0 && exp_f32(-100.0) < f32::MIN_POSITIVE);
        assert!(exp_f64(-740.0) > 0.0 && exp_f64(-740.0) < f64::MIN_POSITIVE);
        assert_eq!(exp_f32(c32::EXP_LO - 1.0), 0.0);
    }

    #[test]
    fn test_exp_f32_near_overflow_matches_std() {
        let mut x = 88.0f32;
        while x <= 88.72 {
            let (got, want) = (exp_f32(x), x.exp());
            assert!(((got - want) / want).abs() < 1e-6, "exp({x}) = {got}, std {want}");
            x += 0.003;
        }
    }

    #[test]
    fn test_log_subnormal_matches_std() {
        let mut bits = 1u32;
        while bits < f32::MIN_POSITIVE.to_bits() {
            let x = f32::from_bits(bits);
            let (got, want) = (log_f32(x), (x as f64).ln());
            assert!((got as f64 - want).abs() < 1e-5 * want.abs(), "log({x:e}) = {got}");
            bits = bits * 3 + 1;
        }

        for x in [5e-324f64, 1e-310, 2.0e-308] {
            let (got, want) = (log_f64(x), x.ln());
            assert!((got - want).abs() < 1e-13 * want.abs(), "log({x:e}) = {got}, std {want}");
        }
    }

    #[test]
    fn test_log_special_values() {
        assert_eq!(log_f32(1.0), 0.0);
        assert!(log_f32(0.0).is_nan());
        assert!(log_f32(-1.0).is_nan());
        assert!(log_f32(f32::NAN).is_nan());
        assert_eq!(log_f32(f32::INFINITY), f32::INFINITY);
        assert_eq!(log_f32(-0.0).to_bits(), u32::MAX);

        assert_eq!(log_f64(1.0), 0.0);
        assert!(log_f64(0.0).is_nan());
        assert_eq!(log_f64(f64::INFINITY), f64::INFINITY);
    }

    #[test]
    fn test_exp_log_inverse() {
        for &x in &[0.001f32, 0.5, 1.2, 3.0, 42.0, 1.0e6] {
            let back = exp_f32(log_f32(x));
            assert!(((back - x) / x).abs() < 1e-5, "exp(log({x})) = {back}");
        }
        for &x in &[0.001f64, 0.5, 1.2, 3.0, 42.0, 1.0e6] {
            let back = exp_f64(log_f64(x));
            assert!(((back - x) / x).abs() < 1e-13, "exp(log({x})) = {back}");
        }
    }
}
