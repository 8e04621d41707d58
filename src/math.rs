//! Math functions generic over scalars and vectors.
//!
//! [`Real`] is implemented for `f32` and `f64` (delegating to `std`) and for
//! every [`SimdFloat`] vector (delegating to the lane kernels), so code that
//! is written once against `Real` runs on a single value or on a whole
//! vector of lanes:
//!
//! ```
//! use lanewise::math::{self, Real};
//! use lanewise::simd::{F64x4, SimdVector};
//!
//! fn softplus<R: Real>(x: R) -> R {
//!     math::log(R::from_f64(1.0) + math::exp(x))
//! }
//!
//! let scalar = softplus(0.5f64);
//! let lanes = softplus(F64x4::splat(0.5));
//! assert!((lanes.extract(3) - scalar).abs() < 1e-12);
//! ```
//!
//! `min` and `max` use the vector rule `a < b ? a : b` (and `a > b ? a : b`)
//! for scalars too, so a NaN in the first argument selects the second and a
//! NaN in the second argument is returned as is.

use std::ops::{Add, Div, Mul, Neg, Sub};

use num::traits::AsPrimitive;

use crate::simd::traits::{SimdArith, SimdFloat, SimdVector};

/// A floating point value: one `f32`/`f64` or a vector of them.
pub trait Real:
    Copy
    + Send
    + Sync
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    /// `value` converted to the element type (every lane for vectors).
    fn from_f64(value: f64) -> Self;

    fn abs(self) -> Self;

    fn min(self, rhs: Self) -> Self;

    fn max(self, rhs: Self) -> Self;

    fn sqrt(self) -> Self;

    fn rsqrt(self) -> Self;

    fn recip(self) -> Self;

    fn sin(self) -> Self;

    fn cos(self) -> Self;

    fn sincos(self) -> (Self, Self);

    fn exp(self) -> Self;

    fn log(self) -> Self;

    fn pow(self, exponent: Self) -> Self;
}

macro_rules! std_real {
    ($($t:ty),+) => {
        $(
            impl Real for $t {
                #[inline(always)]
                fn from_f64(value: f64) -> Self {
                    value as $t
                }

                #[inline(always)]
                fn abs(self) -> Self {
                    <$t>::abs(self)
                }

                #[inline(always)]
                fn min(self, rhs: Self) -> Self {
                    if self < rhs { self } else { rhs }
                }

                #[inline(always)]
                fn max(self, rhs: Self) -> Self {
                    if self > rhs { self } else { rhs }
                }

                #[inline(always)]
                fn sqrt(self) -> Self {
                    <$t>::sqrt(self)
                }

                #[inline(always)]
                fn rsqrt(self) -> Self {
                    1.0 / <$t>::sqrt(self)
                }

                #[inline(always)]
                fn recip(self) -> Self {
                    <$t>::recip(self)
                }

                #[inline(always)]
                fn sin(self) -> Self {
                    <$t>::sin(self)
                }

                #[inline(always)]
                fn cos(self) -> Self {
                    <$t>::cos(self)
                }

                #[inline(always)]
                fn sincos(self) -> (Self, Self) {
                    <$t>::sin_cos(self)
                }

                #[inline(always)]
                fn exp(self) -> Self {
                    <$t>::exp(self)
                }

                #[inline(always)]
                fn log(self) -> Self {
                    <$t>::ln(self)
                }

                #[inline(always)]
                fn pow(self, exponent: Self) -> Self {
                    <$t>::powf(self, exponent)
                }
            }
        )+
    };
}

std_real!(f32, f64);

impl<V> Real for V
where
    V: SimdFloat,
    f64: AsPrimitive<V::Scalar>,
{
    #[inline(always)]
    fn from_f64(value: f64) -> Self {
        SimdVector::splat(value.as_())
    }

    #[inline(always)]
    fn abs(self) -> Self {
        SimdFloat::abs(self)
    }

    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        SimdArith::min(self, rhs)
    }

    #[inline(always)]
    fn max(self, rhs: Self) -> Self {
        SimdArith::max(self, rhs)
    }

    #[inline(always)]
    fn sqrt(self) -> Self {
        SimdFloat::sqrt(self)
    }

    #[inline(always)]
    fn rsqrt(self) -> Self {
        SimdFloat::rsqrt(self)
    }

    #[inline(always)]
    fn recip(self) -> Self {
        SimdFloat::recip(self)
    }

    #[inline(always)]
    fn sin(self) -> Self {
        SimdFloat::sin(self)
    }

    #[inline(always)]
    fn cos(self) -> Self {
        SimdFloat::cos(self)
    }

    #[inline(always)]
    fn sincos(self) -> (Self, Self) {
        SimdFloat::sincos(self)
    }

    #[inline(always)]
    fn exp(self) -> Self {
        SimdFloat::exp(self)
    }

    #[inline(always)]
    fn log(self) -> Self {
        SimdFloat::log(self)
    }

    #[inline(always)]
    fn pow(self, exponent: Self) -> Self {
        SimdFloat::pow(self, exponent)
    }
}

#[inline(always)]
pub fn abs<R: Real>(x: R) -> R {
    x.abs()
}

#[inline(always)]
pub fn min<R: Real>(a: R, b: R) -> R {
    a.min(b)
}

#[inline(always)]
pub fn max<R: Real>(a: R, b: R) -> R {
    a.max(b)
}

#[inline(always)]
pub fn sqrt<R: Real>(x: R) -> R {
    x.sqrt()
}

/// `1 / sqrt(x)`. Vector lanes may use a refined hardware estimate.
#[inline(always)]
pub fn rsqrt<R: Real>(x: R) -> R {
    x.rsqrt()
}

/// `1 / x`. Vector lanes may use a refined hardware estimate.
#[inline(always)]
pub fn recip<R: Real>(x: R) -> R {
    x.recip()
}

#[inline(always)]
pub fn sin<R: Real>(x: R) -> R {
    x.sin()
}

#[inline(always)]
pub fn cos<R: Real>(x: R) -> R {
    x.cos()
}

#[inline(always)]
pub fn sincos<R: Real>(x: R) -> (R, R) {
    x.sincos()
}

#[inline(always)]
pub fn exp<R: Real>(x: R) -> R {
    x.exp()
}

/// Natural logarithm.
///
/// Scalars follow `std` (`log(0) == -inf`); vector lanes `<= 0` produce NaN.
#[inline(always)]
pub fn log<R: Real>(x: R) -> R {
    x.log()
}

#[inline(always)]
pub fn pow<R: Real>(base: R, exponent: R) -> R {
    base.pow(exponent)
}
