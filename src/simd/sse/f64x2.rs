//! SSE2 2-lane `f64` vector and its 2-lane mask.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use std::fmt;
use std::ops::{
    Add, AddAssign, BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Div,
    DivAssign, Mul, MulAssign, Neg, Not, Rem, RemAssign, Sub, SubAssign,
};

use crate::simd::backend::Backend;
use crate::simd::bools::Bool64;
use crate::simd::sse::math::{blend_pd, exp_pd, log_pd, sincos_pd};
use crate::simd::sse::SSE_ALIGNMENT;
use crate::simd::traits::{SimdArith, SimdBits, SimdFloat, SimdMask, SimdVector};

pub(crate) const LANE_COUNT: usize = 2;

/// Two packed `f64` values in an SSE register.
#[derive(Copy, Clone)]
pub struct F64x2 {
    pub elements: __m128d,
}

/// Two 64-bit lane masks in an SSE register.
#[derive(Copy, Clone)]
pub struct Bool64x2 {
    pub elements: __m128i,
}

impl F64x2 {
    #[inline(always)]
    pub fn new(a: f64, b: f64) -> Self {
        Self {
            elements: unsafe { _mm_setr_pd(a, b) },
        }
    }

    #[inline(always)]
    pub fn from_array(lanes: [f64; LANE_COUNT]) -> Self {
        Self {
            elements: unsafe { _mm_loadu_pd(lanes.as_ptr()) },
        }
    }

    #[inline(always)]
    pub fn to_array(self) -> [f64; LANE_COUNT] {
        let mut lanes = [0.0f64; LANE_COUNT];
        unsafe { _mm_storeu_pd(lanes.as_mut_ptr(), self.elements) };
        lanes
    }

    #[inline(always)]
    fn from_mask(mask: __m128d) -> Bool64x2 {
        Bool64x2 {
            elements: unsafe { _mm_castpd_si128(mask) },
        }
    }
}

impl Bool64x2 {
    #[inline(always)]
    pub fn new(a: Bool64, b: Bool64) -> Self {
        Self::from_array([a, b])
    }

    #[inline(always)]
    pub fn from_array(lanes: [Bool64; LANE_COUNT]) -> Self {
        let bits = lanes.map(Bool64::to_bits);
        Self {
            elements: unsafe { _mm_loadu_si128(bits.as_ptr().cast::<__m128i>()) },
        }
    }

    #[inline(always)]
    pub fn to_array(self) -> [Bool64; LANE_COUNT] {
        let mut bits = [0u64; LANE_COUNT];
        unsafe { _mm_storeu_si128(bits.as_mut_ptr().cast::<__m128i>(), self.elements) };
        bits.map(Bool64::from_bits_unchecked)
    }

    #[inline(always)]
    fn as_pd(self) -> __m128d {
        unsafe { _mm_castsi128_pd(self.elements) }
    }
}

impl Default for F64x2 {
    #[inline(always)]
    fn default() -> Self {
        Self {
            elements: unsafe { _mm_setzero_pd() },
        }
    }
}

impl Default for Bool64x2 {
    #[inline(always)]
    fn default() -> Self {
        Self {
            elements: unsafe { _mm_setzero_si128() },
        }
    }
}

impl fmt::Debug for F64x2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("F64x2").field(&self.to_array()).finish()
    }
}

impl fmt::Debug for Bool64x2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Bool64x2").field(&self.to_array()).finish()
    }
}

impl PartialEq for F64x2 {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.equal(*other).all()
    }
}

impl PartialEq for Bool64x2 {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.to_array() == other.to_array()
    }
}

impl From<[f64; LANE_COUNT]> for F64x2 {
    #[inline(always)]
    fn from(lanes: [f64; LANE_COUNT]) -> Self {
        Self::from_array(lanes)
    }
}

impl From<F64x2> for [f64; LANE_COUNT] {
    #[inline(always)]
    fn from(vector: F64x2) -> Self {
        vector.to_array()
    }
}

impl SimdVector for F64x2 {
    type Scalar = f64;
    type Mask = Bool64x2;

    const LANES: usize = LANE_COUNT;
    const BACKEND: Backend = Backend::Sse2;

    #[inline(always)]
    fn splat(value: f64) -> Self {
        Self {
            elements: unsafe { _mm_set1_pd(value) },
        }
    }

    #[inline(always)]
    unsafe fn load(ptr: *const f64) -> Self {
        debug_assert!(Self::is_aligned(ptr), "Pointer must be aligned to {SSE_ALIGNMENT} bytes");
        Self {
            elements: _mm_load_pd(ptr),
        }
    }

    #[inline(always)]
    unsafe fn loadu(ptr: *const f64) -> Self {
        Self {
            elements: _mm_loadu_pd(ptr),
        }
    }

    #[inline(always)]
    unsafe fn store(self, ptr: *mut f64) {
        debug_assert!(Self::is_aligned(ptr), "Pointer must be aligned to {SSE_ALIGNMENT} bytes");
        _mm_store_pd(ptr, self.elements)
    }

    #[inline(always)]
    unsafe fn storeu(self, ptr: *mut f64) {
        _mm_storeu_pd(ptr, self.elements)
    }

    #[inline(always)]
    fn extract(self, lane: usize) -> f64 {
        self.to_array()[lane]
    }

    #[inline(always)]
    fn replace(self, lane: usize, value: f64) -> Self {
        let mut lanes = self.to_array();
        lanes[lane] = value;
        Self::from_array(lanes)
    }

    #[inline(always)]
    fn equal(self, rhs: Self) -> Bool64x2 {
        Self::from_mask(unsafe { _mm_cmpeq_pd(self.elements, rhs.elements) })
    }

    #[inline(always)]
    fn not_equal(self, rhs: Self) -> Bool64x2 {
        Self::from_mask(unsafe { _mm_cmpneq_pd(self.elements, rhs.elements) })
    }

    #[inline(always)]
    fn select(condition: Bool64x2, if_true: Self, if_false: Self) -> Self {
        Self {
            elements: unsafe { blend_pd(condition.as_pd(), if_true.elements, if_false.elements) },
        }
    }

    #[inline(always)]
    fn mask(condition: Bool64x2, values: Self) -> Self {
        Self {
            elements: unsafe { _mm_and_pd(condition.as_pd(), values.elements) },
        }
    }
}

impl SimdVector for Bool64x2 {
    type Scalar = Bool64;
    type Mask = Bool64x2;

    const LANES: usize = LANE_COUNT;
    const BACKEND: Backend = Backend::Sse2;

    #[inline(always)]
    fn splat(value: Bool64) -> Self {
        Self {
            elements: unsafe { _mm_set1_epi64x(value.to_bits() as i64) },
        }
    }

    #[inline(always)]
    unsafe fn load(ptr: *const Bool64) -> Self {
        debug_assert!(Self::is_aligned(ptr), "Pointer must be aligned to {SSE_ALIGNMENT} bytes");
        Self {
            elements: _mm_load_si128(ptr.cast::<__m128i>()),
        }
    }

    #[inline(always)]
    unsafe fn loadu(ptr: *const Bool64) -> Self {
        Self {
            elements: _mm_loadu_si128(ptr.cast::<__m128i>()),
        }
    }

    #[inline(always)]
    unsafe fn store(self, ptr: *mut Bool64) {
        debug_assert!(Self::is_aligned(ptr), "Pointer must be aligned to {SSE_ALIGNMENT} bytes");
        _mm_store_si128(ptr.cast::<__m128i>(), self.elements)
    }

    #[inline(always)]
    unsafe fn storeu(self, ptr: *mut Bool64) {
        _mm_storeu_si128(ptr.cast::<__m128i>(), self.elements)
    }

    #[inline(always)]
    fn extract(self, lane: usize) -> Bool64 {
        self.to_array()[lane]
    }

    #[inline(always)]
    fn replace(self, lane: usize, value: Bool64) -> Self {
        let mut lanes = self.to_array();
        lanes[lane] = value;
        Self::from_array(lanes)
    }

    /// Bit-level equality: `!(a ^ b)`.
    #[inline(always)]
    fn equal(self, rhs: Self) -> Self {
        !(self ^ rhs)
    }

    #[inline(always)]
    fn not_equal(self, rhs: Self) -> Self {
        self ^ rhs
    }

    #[inline(always)]
    fn select(condition: Self, if_true: Self, if_false: Self) -> Self {
        (condition & if_true) | Self {
            elements: unsafe { _mm_andnot_si128(condition.elements, if_false.elements) },
        }
    }

    #[inline(always)]
    fn mask(condition: Self, values: Self) -> Self {
        condition & values
    }
}

macro_rules! sse2_binary_op {
    (
        $ty:ident,
        $intrinsic:ident,
        $($op:ident::$method:ident, $assign:ident::$assign_method:ident),+
    ) => {
        $(
            impl $op for $ty {
                type Output = Self;

                #[inline(always)]
                fn $method(self, rhs: Self) -> Self {
                    Self {
                        elements: unsafe { $intrinsic(self.elements, rhs.elements) },
                    }
                }
            }

            impl $assign for $ty {
                #[inline(always)]
                fn $assign_method(&mut self, rhs: Self) {
                    *self = $op::$method(*self, rhs);
                }
            }
        )+
    };
}

sse2_binary_op!(F64x2, _mm_add_pd, Add::add, AddAssign::add_assign);
sse2_binary_op!(F64x2, _mm_sub_pd, Sub::sub, SubAssign::sub_assign);
sse2_binary_op!(F64x2, _mm_mul_pd, Mul::mul, MulAssign::mul_assign);
sse2_binary_op!(F64x2, _mm_div_pd, Div::div, DivAssign::div_assign);

sse2_binary_op!(Bool64x2, _mm_and_si128, BitAnd::bitand, BitAndAssign::bitand_assign);
sse2_binary_op!(Bool64x2, _mm_or_si128, BitOr::bitor, BitOrAssign::bitor_assign);
sse2_binary_op!(Bool64x2, _mm_xor_si128, BitXor::bitxor, BitXorAssign::bitxor_assign);

impl Rem for F64x2 {
    type Output = Self;

    #[inline(always)]
    fn rem(self, rhs: Self) -> Self {
        let mut lanes = self.to_array();
        for (lane, divisor) in lanes.iter_mut().zip(rhs.to_array()) {
            *lane %= divisor;
        }
        Self::from_array(lanes)
    }
}

impl RemAssign for F64x2 {
    #[inline(always)]
    fn rem_assign(&mut self, rhs: Self) {
        *self = *self % rhs;
    }
}

impl Neg for F64x2 {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self {
        Self {
            elements: unsafe { _mm_xor_pd(self.elements, _mm_set1_pd(-0.0)) },
        }
    }
}

impl Not for Bool64x2 {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self {
        Self {
            elements: unsafe { _mm_xor_si128(self.elements, _mm_set1_epi32(-1)) },
        }
    }
}

impl SimdBits for Bool64x2 {}

impl SimdMask for Bool64x2 {
    #[inline(always)]
    fn splat_bool(value: bool) -> Self {
        Self::splat(Bool64::from_bool(value))
    }

    #[inline(always)]
    fn all(self) -> bool {
        self.bitmask() == 0b11
    }

    #[inline(always)]
    fn any(self) -> bool {
        self.bitmask() != 0
    }

    #[inline(always)]
    fn bitmask(self) -> u64 {
        unsafe { _mm_movemask_pd(self.as_pd()) as u64 }
    }
}

impl SimdArith for F64x2 {
    #[inline(always)]
    fn less(self, rhs: Self) -> Bool64x2 {
        Self::from_mask(unsafe { _mm_cmplt_pd(self.elements, rhs.elements) })
    }

    #[inline(always)]
    fn less_equal(self, rhs: Self) -> Bool64x2 {
        Self::from_mask(unsafe { _mm_cmple_pd(self.elements, rhs.elements) })
    }

    #[inline(always)]
    fn greater(self, rhs: Self) -> Bool64x2 {
        Self::from_mask(unsafe { _mm_cmpgt_pd(self.elements, rhs.elements) })
    }

    #[inline(always)]
    fn greater_equal(self, rhs: Self) -> Bool64x2 {
        Self::from_mask(unsafe { _mm_cmpge_pd(self.elements, rhs.elements) })
    }

    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm_min_pd(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn max(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm_max_pd(self.elements, rhs.elements) },
        }
    }
}

impl SimdFloat for F64x2 {
    #[inline(always)]
    fn abs(self) -> Self {
        Self {
            elements: unsafe { _mm_andnot_pd(_mm_set1_pd(-0.0), self.elements) },
        }
    }

    #[inline(always)]
    fn sqrt(self) -> Self {
        Self {
            elements: unsafe { _mm_sqrt_pd(self.elements) },
        }
    }

    // No double-precision estimate instruction; divide exactly.
    #[inline(always)]
    fn rsqrt(self) -> Self {
        Self::splat(1.0) / self.sqrt()
    }

    #[inline(always)]
    fn recip(self) -> Self {
        Self::splat(1.0) / self
    }

    #[inline(always)]
    fn sincos(self) -> (Self, Self) {
        let (s, c) = unsafe { sincos_pd(self.elements) };
        (Self { elements: s }, Self { elements: c })
    }

    #[inline(always)]
    fn exp(self) -> Self {
        Self {
            elements: unsafe { exp_pd(self.elements) },
        }
    }

    #[inline(always)]
    fn log(self) -> Self {
        Self {
            elements: unsafe { log_pd(self.elements) },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::fallback::math::{exp_f64, log_f64, sincos_f64};

    #[test]
    fn test_lanes_and_arithmetic() {
        let a = F64x2::new(7.5, -3.0);
        let b = F64x2::splat(2.0);

        assert_eq!((a + b).to_array(), [9.5, -1.0]);
        assert_eq!((a * b).to_array(), [15.0, -6.0]);
        assert_eq!((a % b).to_array(), [1.5, -1.0]);
        assert_eq!((-a).abs(), F64x2::new(7.5, 3.0));
        assert_eq!(a.replace(1, 0.5).extract(1), 0.5);
        assert_eq!(std::mem::size_of::<F64x2>(), 16);
        assert_eq!(std::mem::align_of::<F64x2>(), SSE_ALIGNMENT);
    }

    #[test]
    fn test_comparisons_produce_full_width_masks() {
        let a = F64x2::new(1.0, f64::NAN);
        let b = F64x2::new(1.0, 0.0);

        let eq = a.equal(b).to_array();
        assert_eq!(eq[0].to_bits(), u64::MAX);
        assert_eq!(eq[1].to_bits(), 0);
        assert_eq!(a.not_equal(b).bitmask(), 0b10);
        assert_eq!(a.less_equal(b).bitmask(), 0b01);
        assert_eq!(a.greater(b).bitmask(), 0);
    }

    #[test]
    fn test_mask_vector() {
        let m = Bool64x2::new(Bool64::TRUE, Bool64::FALSE);
        let v = F64x2::new(3.0, 4.0);

        assert_eq!(F64x2::select(m, v, F64x2::splat(9.0)).to_array(), [3.0, 9.0]);
        assert_eq!(F64x2::mask(m, v).to_array(), [3.0, 0.0]);
        assert_eq!(Bool64x2::select(m, !m, m), Bool64x2::splat_bool(false));
        assert_eq!(m.equal(m), Bool64x2::splat_bool(true));
        assert!(!m.all() && m.any());
        assert_eq!((!m).bitmask(), 0b10);
    }

    #[test]
    fn test_kernels_match_scalar_reference() {
        for values in [[-2.0, 0.5], [1.2, 30.0], [700.0, -745.5], [0.0, 1.0e-300]] {
            let x = F64x2::from_array(values);
            let (s, c) = x.sincos();
            let e = x.exp();
            let l = x.log();

            for (i, value) in values.into_iter().enumerate() {
                let (rs, rc) = sincos_f64(value);
                assert_eq!(s.extract(i).to_bits(), rs.to_bits(), "sin({value})");
                assert_eq!(c.extract(i).to_bits(), rc.to_bits(), "cos({value})");
                assert_eq!(e.extract(i).to_bits(), exp_f64(value).to_bits(), "exp({value})");
                assert_eq!(l.extract(i).to_bits(), log_f64(value).to_bits(), "log({value})");
            }
        }
    }
}
