//! SSE 4-lane `f32` vector and its 4-lane mask.
//!
//! `F32x4` wraps `__m128` and maps every contract operation to one or two
//! SSE instructions. `Bool32x4` is the comparison result of every 4-lane
//! 32-bit vector; it is kept in an `__m128` register so that it stays usable
//! on targets with SSE but without SSE2 integer instructions.
//!
//! Mask bits never travel through scalar `f32` values: an all-ones lane is a
//! NaN pattern and must reach memory unchanged, so constructors and lane access
//! go through `[u32; 4]` buffers.

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
use crate::simd::bools::Bool32;
use crate::simd::sse::math::{blend_ps, recip_ps, rsqrt_ps};
use crate::simd::sse::SSE_ALIGNMENT;
use crate::simd::traits::{SimdArith, SimdBits, SimdFloat, SimdMask, SimdVector};

/// Number of lanes in an SSE 128-bit register of 32-bit elements.
pub(crate) const LANE_COUNT: usize = 4;

/// Four packed `f32` values in an SSE register.
#[derive(Copy, Clone)]
pub struct F32x4 {
    pub elements: __m128,
}

/// Four 32-bit lane masks in an SSE register.
#[derive(Copy, Clone)]
pub struct Bool32x4 {
    pub elements: __m128,
}

impl F32x4 {
    #[inline(always)]
    pub fn new(a: f32, b: f32, c: f32, d: f32) -> Self {
        Self {
            elements: unsafe { _mm_setr_ps(a, b, c, d) },
        }
    }

    #[inline(always)]
    pub fn from_array(lanes: [f32; LANE_COUNT]) -> Self {
        Self {
            elements: unsafe { _mm_loadu_ps(lanes.as_ptr()) },
        }
    }

    #[inline(always)]
    pub fn to_array(self) -> [f32; LANE_COUNT] {
        let mut lanes = [0.0f32; LANE_COUNT];
        unsafe { _mm_storeu_ps(lanes.as_mut_ptr(), self.elements) };
        lanes
    }

    #[cfg(not(simd_sse2))]
    #[inline(always)]
    fn map_lanes(self, f: impl Fn(f32) -> f32) -> Self {
        Self::from_array(self.to_array().map(f))
    }
}

impl Bool32x4 {
    #[inline(always)]
    pub fn new(a: Bool32, b: Bool32, c: Bool32, d: Bool32) -> Self {
        Self::from_array([a, b, c, d])
    }

    #[inline(always)]
    pub fn from_array(lanes: [Bool32; LANE_COUNT]) -> Self {
        let bits = lanes.map(Bool32::to_bits);
        Self {
            elements: unsafe { _mm_loadu_ps(bits.as_ptr().cast::<f32>()) },
        }
    }

    #[inline(always)]
    pub fn to_array(self) -> [Bool32; LANE_COUNT] {
        let mut bits = [0u32; LANE_COUNT];
        unsafe { _mm_storeu_ps(bits.as_mut_ptr().cast::<f32>(), self.elements) };
        bits.map(Bool32::from_bits_unchecked)
    }

    #[inline(always)]
    fn all_ones() -> __m128 {
        unsafe {
            let zero = _mm_setzero_ps();
            _mm_cmpeq_ps(zero, zero)
        }
    }
}

impl Default for F32x4 {
    #[inline(always)]
    fn default() -> Self {
        Self {
            elements: unsafe { _mm_setzero_ps() },
        }
    }
}

impl Default for Bool32x4 {
    #[inline(always)]
    fn default() -> Self {
        Self {
            elements: unsafe { _mm_setzero_ps() },
        }
    }
}

impl fmt::Debug for F32x4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("F32x4").field(&self.to_array()).finish()
    }
}

impl fmt::Debug for Bool32x4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Bool32x4").field(&self.to_array()).finish()
    }
}

impl PartialEq for F32x4 {
    /// IEEE equality in every lane.
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.equal(*other).all()
    }
}

impl PartialEq for Bool32x4 {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.to_array() == other.to_array()
    }
}

impl From<[f32; LANE_COUNT]> for F32x4 {
    #[inline(always)]
    fn from(lanes: [f32; LANE_COUNT]) -> Self {
        Self::from_array(lanes)
    }
}

impl From<F32x4> for [f32; LANE_COUNT] {
    #[inline(always)]
    fn from(vector: F32x4) -> Self {
        vector.to_array()
    }
}

impl SimdVector for F32x4 {
    type Scalar = f32;
    type Mask = Bool32x4;

    const LANES: usize = LANE_COUNT;
    const BACKEND: Backend = Backend::Sse;

    #[inline(always)]
    fn splat(value: f32) -> Self {
        Self {
            elements: unsafe { _mm_set1_ps(value) },
        }
    }

    #[inline(always)]
    unsafe fn load(ptr: *const f32) -> Self {
        debug_assert!(Self::is_aligned(ptr), "Pointer must be aligned to {SSE_ALIGNMENT} bytes");
        Self {
            elements: _mm_load_ps(ptr),
        }
    }

    #[inline(always)]
    unsafe fn loadu(ptr: *const f32) -> Self {
        Self {
            elements: _mm_loadu_ps(ptr),
        }
    }

    #[inline(always)]
    unsafe fn store(self, ptr: *mut f32) {
        debug_assert!(Self::is_aligned(ptr), "Pointer must be aligned to {SSE_ALIGNMENT} bytes");
        _mm_store_ps(ptr, self.elements)
    }

    #[inline(always)]
    unsafe fn storeu(self, ptr: *mut f32) {
        _mm_storeu_ps(ptr, self.elements)
    }

    #[inline(always)]
    fn extract(self, lane: usize) -> f32 {
        self.to_array()[lane]
    }

    #[inline(always)]
    fn replace(self, lane: usize, value: f32) -> Self {
        let mut lanes = self.to_array();
        lanes[lane] = value;
        Self::from_array(lanes)
    }

    #[inline(always)]
    fn equal(self, rhs: Self) -> Bool32x4 {
        Bool32x4 {
            elements: unsafe { _mm_cmpeq_ps(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn not_equal(self, rhs: Self) -> Bool32x4 {
        Bool32x4 {
            elements: unsafe { _mm_cmpneq_ps(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn select(condition: Bool32x4, if_true: Self, if_false: Self) -> Self {
        Self {
            elements: unsafe { blend_ps(condition.elements, if_true.elements, if_false.elements) },
        }
    }

    #[inline(always)]
    fn mask(condition: Bool32x4, values: Self) -> Self {
        Self {
            elements: unsafe { _mm_and_ps(condition.elements, values.elements) },
        }
    }
}

impl SimdVector for Bool32x4 {
    type Scalar = Bool32;
    type Mask = Bool32x4;

    const LANES: usize = LANE_COUNT;
    const BACKEND: Backend = Backend::Sse;

    #[inline(always)]
    fn splat(value: Bool32) -> Self {
        Self::from_array([value; LANE_COUNT])
    }

    #[inline(always)]
    unsafe fn load(ptr: *const Bool32) -> Self {
        debug_assert!(Self::is_aligned(ptr), "Pointer must be aligned to {SSE_ALIGNMENT} bytes");
        Self {
            elements: _mm_load_ps(ptr.cast::<f32>()),
        }
    }

    #[inline(always)]
    unsafe fn loadu(ptr: *const Bool32) -> Self {
        Self {
            elements: _mm_loadu_ps(ptr.cast::<f32>()),
        }
    }

    #[inline(always)]
    unsafe fn store(self, ptr: *mut Bool32) {
        debug_assert!(Self::is_aligned(ptr), "Pointer must be aligned to {SSE_ALIGNMENT} bytes");
        _mm_store_ps(ptr.cast::<f32>(), self.elements)
    }

    #[inline(always)]
    unsafe fn storeu(self, ptr: *mut Bool32) {
        _mm_storeu_ps(ptr.cast::<f32>(), self.elements)
    }

    #[inline(always)]
    fn extract(self, lane: usize) -> Bool32 {
        self.to_array()[lane]
    }

    #[inline(always)]
    fn replace(self, lane: usize, value: Bool32) -> Self {
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
        Self {
            elements: unsafe { blend_ps(condition.elements, if_true.elements, if_false.elements) },
        }
    }

    #[inline(always)]
    fn mask(condition: Self, values: Self) -> Self {
        condition & values
    }
}

macro_rules! sse_binary_op {
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

sse_binary_op!(F32x4, _mm_add_ps, Add::add, AddAssign::add_assign);
sse_binary_op!(F32x4, _mm_sub_ps, Sub::sub, SubAssign::sub_assign);
sse_binary_op!(F32x4, _mm_mul_ps, Mul::mul, MulAssign::mul_assign);
sse_binary_op!(F32x4, _mm_div_ps, Div::div, DivAssign::div_assign);

sse_binary_op!(Bool32x4, _mm_and_ps, BitAnd::bitand, BitAndAssign::bitand_assign);
sse_binary_op!(Bool32x4, _mm_or_ps, BitOr::bitor, BitOrAssign::bitor_assign);
sse_binary_op!(Bool32x4, _mm_xor_ps, BitXor::bitxor, BitXorAssign::bitxor_assign);

// No SSE remainder instruction; `%` keeps Rust's scalar definition per lane.
impl Rem for F32x4 {
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

impl RemAssign for F32x4 {
    #[inline(always)]
    fn rem_assign(&mut self, rhs: Self) {
        *self = *self % rhs;
    }
}

impl Neg for F32x4 {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self {
        Self {
            elements: unsafe { _mm_xor_ps(self.elements, _mm_set1_ps(-0.0)) },
        }
    }
}

impl Not for Bool32x4 {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self {
        Self {
            elements: unsafe { _mm_xor_ps(self.elements, Self::all_ones()) },
        }
    }
}

impl SimdBits for Bool32x4 {}

impl SimdMask for Bool32x4 {
    #[inline(always)]
    fn splat_bool(value: bool) -> Self {
        if value {
            Self {
                elements: Self::all_ones(),
            }
        } else {
            Self::default()
        }
    }

    #[inline(always)]
    fn all(self) -> bool {
        self.bitmask() == 0b1111
    }

    #[inline(always)]
    fn any(self) -> bool {
        self.bitmask() != 0
    }

    #[inline(always)]
    fn bitmask(self) -> u64 {
        unsafe { _mm_movemask_ps(self.elements) as u64 }
    }
}

impl SimdArith for F32x4 {
    #[inline(always)]
    fn less(self, rhs: Self) -> Bool32x4 {
        Bool32x4 {
            elements: unsafe { _mm_cmplt_ps(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn less_equal(self, rhs: Self) -> Bool32x4 {
        Bool32x4 {
            elements: unsafe { _mm_cmple_ps(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn greater(self, rhs: Self) -> Bool32x4 {
        Bool32x4 {
            elements: unsafe { _mm_cmpgt_ps(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn greater_equal(self, rhs: Self) -> Bool32x4 {
        Bool32x4 {
            elements: unsafe { _mm_cmpge_ps(self.elements, rhs.elements) },
        }
    }

    // minps/maxps return the second operand when either is NaN, which is
    // exactly `a < b ? a : b` / `a > b ? a : b`.
    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm_min_ps(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn max(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm_max_ps(self.elements, rhs.elements) },
        }
    }
}

impl SimdFloat for F32x4 {
    #[inline(always)]
    fn abs(self) -> Self {
        Self {
            elements: unsafe { _mm_andnot_ps(_mm_set1_ps(-0.0), self.elements) },
        }
    }

    #[inline(always)]
    fn sqrt(self) -> Self {
        Self {
            elements: unsafe { _mm_sqrt_ps(self.elements) },
        }
    }

    #[inline(always)]
    fn rsqrt(self) -> Self {
        Self {
            elements: unsafe { rsqrt_ps(self.elements) },
        }
    }

    #[inline(always)]
    fn recip(self) -> Self {
        Self {
            elements: unsafe { recip_ps(self.elements) },
        }
    }

    #[cfg(simd_sse2)]
    #[inline(always)]
    fn sincos(self) -> (Self, Self) {
        let (s, c) = unsafe { crate::simd::sse::math::sincos_ps(self.elements) };
        (Self { elements: s }, Self { elements: c })
    }

    #[cfg(not(simd_sse2))]
    #[inline(always)]
    fn sincos(self) -> (Self, Self) {
        let pairs = self.to_array().map(crate::simd::fallback::math::sincos_f32);
        (
            Self::from_array(pairs.map(|(s, _)| s)),
            Self::from_array(pairs.map(|(_, c)| c)),
        )
    }

    #[cfg(simd_sse2)]
    #[inline(always)]
    fn exp(self) -> Self {
        Self {
            elements: unsafe { crate::simd::sse::math::exp_ps(self.elements) },
        }
    }

    #[cfg(not(simd_sse2))]
    #[inline(always)]
    fn exp(self) -> Self {
        self.map_lanes(crate::simd::fallback::math::exp_f32)
    }

    #[cfg(simd_sse2)]
    #[inline(always)]
    fn log(self) -> Self {
        Self {
            elements: unsafe { crate::simd::sse::math::log_ps(self.elements) },
        }
    }

    #[cfg(not(simd_sse2))]
    #[inline(always)]
    fn log(self) -> Self {
        self.map_lanes(crate::simd::fallback::math::log_f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::fallback::math::{exp_f32, log_f32, sincos_f32};

    #[test]
    fn test_construction_and_lane_access() {
        let v = F32x4::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(v.to_array(), [1.0, 2.0, 3.0, 4.0]);
        assert_eq!(v.extract(2), 3.0);
        assert_eq!(v.replace(0, -1.0).to_array(), [-1.0, 2.0, 3.0, 4.0]);
        assert_eq!(F32x4::default().to_array(), [0.0; 4]);
        assert_eq!(F32x4::splat(2.5).to_array(), [2.5; 4]);
        assert_eq!(std::mem::align_of::<F32x4>(), SSE_ALIGNMENT);
        assert_eq!(std::mem::align_of::<Bool32x4>(), SSE_ALIGNMENT);
    }

    #[test]
    fn test_aligned_and_unaligned_round_trip() {
        #[repr(align(16))]
        struct Aligned([f32; 8]);

        let mut buffer = Aligned([0.0; 8]);
        let v = F32x4::new(1.0, -2.0, 3.0, -4.0);

        unsafe {
            v.store(buffer.0.as_mut_ptr());
            assert_eq!(F32x4::load(buffer.0.as_ptr()), v);

            v.storeu(buffer.0.as_mut_ptr().add(1));
            assert_eq!(F32x4::loadu(buffer.0.as_ptr().add(1)), v);
        }
    }

    #[test]
    fn test_arithmetic_matches_scalar() {
        let a = F32x4::new(5.5, -5.5, 1.0, 9.0);
        let b = F32x4::new(2.0, 2.0, -4.0, 3.0);

        assert_eq!((a + b).to_array(), [7.5, -3.5, -3.0, 12.0]);
        assert_eq!((a - b).to_array(), [3.5, -7.5, 5.0, 6.0]);
        assert_eq!((a * b).to_array(), [11.0, -11.0, -4.0, 27.0]);
        assert_eq!((a / b).to_array(), [2.75, -2.75, -0.25, 3.0]);
        assert_eq!((a % b).to_array(), [1.5, -1.5, 1.0, 0.0]);
        assert_eq!((-a).to_array(), [-5.5, 5.5, -1.0, -9.0]);
        assert_eq!(a.inc().to_array(), [6.5, -4.5, 2.0, 10.0]);
    }

    #[test]
    fn test_comparisons_and_masks() {
        let a = F32x4::new(1.0, f32::NAN, 3.0, -0.0);
        let b = F32x4::new(2.0, f32::NAN, 3.0, 0.0);

        assert_eq!(a.less(b).bitmask(), 0b0001);
        assert_eq!(a.less_equal(b).bitmask(), 0b1101);
        assert_eq!(a.greater(b).bitmask(), 0);
        assert_eq!(a.equal(b).bitmask(), 0b1100);
        assert_eq!(a.not_equal(b).bitmask(), 0b0011);

        let lanes = a.equal(b).to_array();
        assert_eq!(lanes.map(|m| m.to_bits()), [0, 0, u32::MAX, u32::MAX]);
    }

    #[test]
    fn test_select_and_mask_use_raw_bits() {
        let m = Bool32x4::new(Bool32::TRUE, Bool32::FALSE, Bool32::TRUE, Bool32::FALSE);
        let a = F32x4::new(1.0, 2.0, 3.0, 4.0);
        let b = F32x4::splat(-1.0);

        assert_eq!(F32x4::select(m, a, b).to_array(), [1.0, -1.0, 3.0, -1.0]);
        assert_eq!(F32x4::mask(m, a).to_array(), [1.0, 0.0, 3.0, 0.0]);
        assert_eq!(F32x4::mask(!m, a).to_array(), [0.0, 2.0, 0.0, 4.0]);
    }

    #[test]
    fn test_mask_vector_operations() {
        let t = Bool32x4::splat_bool(true);
        let f = Bool32x4::splat_bool(false);

        assert!(t.all() && !f.any() && f.none());
        assert_eq!(t.to_array(), [Bool32::TRUE; 4]);
        assert_eq!(!t, f);
        assert_eq!(t.equal(t), t);
        assert_eq!(t.not_equal(f), t);

        let mixed = t.replace(1, Bool32::FALSE);
        assert_eq!(mixed.bitmask(), 0b1101);
        assert_eq!(Bool32x4::splat(Bool32::TRUE), t);
    }

    #[test]
    fn test_min_max_and_abs() {
        let a = F32x4::new(f32::NAN, 1.0, -3.0, 2.0);
        let b = F32x4::new(0.0, f32::NAN, 4.0, -2.0);

        let min = a.min(b).to_array();
        assert_eq!(min[0], 0.0);
        assert!(min[1].is_nan());
        assert_eq!(&min[2..], &[-3.0, -2.0]);

        assert_eq!(F32x4::new(-1.0, 2.0, -0.0, -4.5).abs().to_array(), [1.0, 2.0, 0.0, 4.5]);
    }

    #[test]
    fn test_kernels_match_scalar_reference() {
        let x = F32x4::new(-2.0, 0.5, 1.2, 30.0);
        let (s, c) = x.sincos();
        let e = x.exp();
        let l = x.log();

        for (i, value) in x.to_array().into_iter().enumerate() {
            let (rs, rc) = sincos_f32(value);
            assert_eq!(s.extract(i).to_bits(), rs.to_bits());
            assert_eq!(c.extract(i).to_bits(), rc.to_bits());
            assert_eq!(e.extract(i).to_bits(), exp_f32(value).to_bits());
            assert_eq!(l.extract(i).to_bits(), log_f32(value).to_bits());
        }

        assert_eq!(F32x4::splat(16.0).sqrt(), F32x4::splat(4.0));
    }
}
