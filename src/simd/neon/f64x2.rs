//! NEON 2-lane `f64` vector and its 2-lane mask.

use std::arch::aarch64::*;
use std::fmt;
use std::ops::{
    Add, AddAssign, BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Div,
    DivAssign, Mul, MulAssign, Neg, Not, Rem, RemAssign, Sub, SubAssign,
};

use crate::simd::backend::Backend;
use crate::simd::bools::Bool64;
use crate::simd::neon::math::{vexpq_f64, vlogq_f64, vsincosq_f64};
use crate::simd::neon::NEON_ALIGNMENT;
use crate::simd::traits::{SimdArith, SimdBits, SimdFloat, SimdMask, SimdVector};

pub(crate) const LANE_COUNT: usize = 2;

/// Two packed `f64` values in a NEON register.
#[derive(Copy, Clone)]
pub struct F64x2 {
    pub elements: float64x2_t,
}

/// Two 64-bit lane masks in a NEON register.
#[derive(Copy, Clone)]
pub struct Bool64x2 {
    pub elements: uint64x2_t,
}

impl F64x2 {
    #[inline(always)]
    pub fn new(a: f64, b: f64) -> Self {
        Self::from_array([a, b])
    }

    #[inline(always)]
    pub fn from_array(lanes: [f64; LANE_COUNT]) -> Self {
        Self {
            elements: unsafe { vld1q_f64(lanes.as_ptr()) },
        }
    }

    #[inline(always)]
    pub fn to_array(self) -> [f64; LANE_COUNT] {
        let mut lanes = [0.0f64; LANE_COUNT];
        unsafe { vst1q_f64(lanes.as_mut_ptr(), self.elements) };
        lanes
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
            elements: unsafe { vld1q_u64(bits.as_ptr()) },
        }
    }

    #[inline(always)]
    pub fn to_array(self) -> [Bool64; LANE_COUNT] {
        let mut bits = [0u64; LANE_COUNT];
        unsafe { vst1q_u64(bits.as_mut_ptr(), self.elements) };
        bits.map(Bool64::from_bits_unchecked)
    }
}

impl Default for F64x2 {
    #[inline(always)]
    fn default() -> Self {
        Self {
            elements: unsafe { vdupq_n_f64(0.0) },
        }
    }
}

impl Default for Bool64x2 {
    #[inline(always)]
    fn default() -> Self {
        Self {
            elements: unsafe { vdupq_n_u64(0) },
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
    const BACKEND: Backend = Backend::Neon;

    #[inline(always)]
    fn splat(value: f64) -> Self {
        Self {
            elements: unsafe { vdupq_n_f64(value) },
        }
    }

    #[inline(always)]
    unsafe fn load(ptr: *const f64) -> Self {
        debug_assert!(Self::is_aligned(ptr), "Pointer must be aligned to {NEON_ALIGNMENT} bytes");
        Self::loadu(ptr)
    }

    #[inline(always)]
    unsafe fn loadu(ptr: *const f64) -> Self {
        Self {
            elements: vld1q_f64(ptr),
        }
    }

    #[inline(always)]
    unsafe fn store(self, ptr: *mut f64) {
        debug_assert!(Self::is_aligned(ptr), "Pointer must be aligned to {NEON_ALIGNMENT} bytes");
        self.storeu(ptr)
    }

    #[inline(always)]
    unsafe fn storeu(self, ptr: *mut f64) {
        vst1q_f64(ptr, self.elements)
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
        Bool64x2 {
            elements: unsafe { vceqq_f64(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn not_equal(self, rhs: Self) -> Bool64x2 {
        !self.equal(rhs)
    }

    #[inline(always)]
    fn select(condition: Bool64x2, if_true: Self, if_false: Self) -> Self {
        Self {
            elements: unsafe { vbslq_f64(condition.elements, if_true.elements, if_false.elements) },
        }
    }

    #[inline(always)]
    fn mask(condition: Bool64x2, values: Self) -> Self {
        Self {
            elements: unsafe {
                vreinterpretq_f64_u64(vandq_u64(
                    condition.elements,
                    vreinterpretq_u64_f64(values.elements),
                ))
            },
        }
    }
}

impl SimdVector for Bool64x2 {
    type Scalar = Bool64;
    type Mask = Bool64x2;

    const LANES: usize = LANE_COUNT;
    const BACKEND: Backend = Backend::Neon;

    #[inline(always)]
    fn splat(value: Bool64) -> Self {
        Self {
            elements: unsafe { vdupq_n_u64(value.to_bits()) },
        }
    }

    #[inline(always)]
    unsafe fn load(ptr: *const Bool64) -> Self {
        debug_assert!(Self::is_aligned(ptr), "Pointer must be aligned to {NEON_ALIGNMENT} bytes");
        Self::loadu(ptr)
    }

    #[inline(always)]
    unsafe fn loadu(ptr: *const Bool64) -> Self {
        Self {
            elements: vld1q_u64(ptr.cast::<u64>()),
        }
    }

    #[inline(always)]
    unsafe fn store(self, ptr: *mut Bool64) {
        debug_assert!(Self::is_aligned(ptr), "Pointer must be aligned to {NEON_ALIGNMENT} bytes");
        self.storeu(ptr)
    }

    #[inline(always)]
    unsafe fn storeu(self, ptr: *mut Bool64) {
        vst1q_u64(ptr.cast::<u64>(), self.elements)
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
            elements: unsafe { vbslq_u64(condition.elements, if_true.elements, if_false.elements) },
        }
    }

    #[inline(always)]
    fn mask(condition: Self, values: Self) -> Self {
        condition & values
    }
}

macro_rules! neon_binary_op {
    (
        $ty:ident,
        $intrinsic:ident,
        $op:ident::$method:ident,
        $assign:ident::$assign_method:ident
    ) => {
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
    };
}

neon_binary_op!(F64x2, vaddq_f64, Add::add, AddAssign::add_assign);
neon_binary_op!(F64x2, vsubq_f64, Sub::sub, SubAssign::sub_assign);
neon_binary_op!(F64x2, vmulq_f64, Mul::mul, MulAssign::mul_assign);
neon_binary_op!(F64x2, vdivq_f64, Div::div, DivAssign::div_assign);

neon_binary_op!(Bool64x2, vandq_u64, BitAnd::bitand, BitAndAssign::bitand_assign);
neon_binary_op!(Bool64x2, vorrq_u64, BitOr::bitor, BitOrAssign::bitor_assign);
neon_binary_op!(Bool64x2, veorq_u64, BitXor::bitxor, BitXorAssign::bitxor_assign);

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
            elements: unsafe { vnegq_f64(self.elements) },
        }
    }
}

// AArch64 has no 64-bit `vmvnq`.
impl Not for Bool64x2 {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self {
        Self {
            elements: unsafe { veorq_u64(self.elements, vdupq_n_u64(u64::MAX)) },
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
        unsafe {
            let bits = vshrq_n_u64::<63>(self.elements);
            vgetq_lane_u64::<0>(bits) | (vgetq_lane_u64::<1>(bits) << 1)
        }
    }
}

impl SimdArith for F64x2 {
    #[inline(always)]
    fn less(self, rhs: Self) -> Bool64x2 {
        Bool64x2 {
            elements: unsafe { vcltq_f64(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn less_equal(self, rhs: Self) -> Bool64x2 {
        Bool64x2 {
            elements: unsafe { vcleq_f64(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn greater(self, rhs: Self) -> Bool64x2 {
        Bool64x2 {
            elements: unsafe { vcgtq_f64(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn greater_equal(self, rhs: Self) -> Bool64x2 {
        Bool64x2 {
            elements: unsafe { vcgeq_f64(self.elements, rhs.elements) },
        }
    }
}

impl SimdFloat for F64x2 {
    #[inline(always)]
    fn abs(self) -> Self {
        Self {
            elements: unsafe { vabsq_f64(self.elements) },
        }
    }

    #[inline(always)]
    fn sqrt(self) -> Self {
        Self {
            elements: unsafe { vsqrtq_f64(self.elements) },
        }
    }

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
        let (s, c) = unsafe { vsincosq_f64(self.elements) };
        (Self { elements: s }, Self { elements: c })
    }

    #[inline(always)]
    fn exp(self) -> Self {
        Self {
            elements: unsafe { vexpq_f64(self.elements) },
        }
    }

    #[inline(always)]
    fn log(self) -> Self {
        Self {
            elements: unsafe { vlogq_f64(self.elements) },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lanes_and_masks() {
        let a = F64x2::new(1.0, f64::NAN);
        let b = F64x2::new(1.0, 0.0);

        assert_eq!(a.equal(b).bitmask(), 0b01);
        assert_eq!(a.not_equal(b).bitmask(), 0b10);
        assert_eq!(a.equal(b).to_array()[0].to_bits(), u64::MAX);
        assert_eq!((!a.equal(b)).bitmask(), 0b10);
        assert_eq!(std::mem::align_of::<F64x2>(), NEON_ALIGNMENT);
        assert_eq!(F64x2::mask(a.equal(b), F64x2::splat(3.0)).to_array(), [3.0, 0.0]);
    }

    #[test]
    fn test_arithmetic() {
        let a = F64x2::new(7.5, -3.0);
        let b = F64x2::splat(2.0);

        assert_eq!((a * b).to_array(), [15.0, -6.0]);
        assert_eq!((a % b).to_array(), [1.5, -1.0]);
        assert_eq!(b.recip().to_array(), [0.5, 0.5]);
        assert_eq!(F64x2::splat(4.0).rsqrt().to_array(), [0.5, 0.5]);
    }
}
