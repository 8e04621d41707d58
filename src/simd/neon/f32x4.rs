//! NEON 4-lane `f32` vector and its 4-lane mask.
//!
//! Lane masks live in `uint32x4_t`, which is what every NEON comparison
//! returns and what `vbslq` consumes.

use std::arch::aarch64::*;
use std::fmt;
use std::ops::{
    Add, AddAssign, BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Div,
    DivAssign, Mul, MulAssign, Neg, Not, Rem, RemAssign, Sub, SubAssign,
};

use crate::simd::backend::Backend;
use crate::simd::bools::Bool32;
use crate::simd::neon::math::{vexpq_f32, vlogq_f32, vrecipq_f32, vrsqrtq_f32, vsincosq_f32};
use crate::simd::neon::NEON_ALIGNMENT;
use crate::simd::traits::{SimdArith, SimdBits, SimdFloat, SimdMask, SimdVector};

pub(crate) const LANE_COUNT: usize = 4;

/// Lane weights folded by `vaddvq_u32` into a bitmask.
const LANE_BITS: [u32; LANE_COUNT] = [1, 2, 4, 8];

/// Four packed `f32` values in a NEON register.
#[derive(Copy, Clone)]
pub struct F32x4 {
    pub elements: float32x4_t,
}

/// Four 32-bit lane masks in a NEON register.
#[derive(Copy, Clone)]
pub struct Bool32x4 {
    pub elements: uint32x4_t,
}

impl F32x4 {
    #[inline(always)]
    pub fn new(a: f32, b: f32, c: f32, d: f32) -> Self {
        Self::from_array([a, b, c, d])
    }

    #[inline(always)]
    pub fn from_array(lanes: [f32; LANE_COUNT]) -> Self {
        Self {
            elements: unsafe { vld1q_f32(lanes.as_ptr()) },
        }
    }

    #[inline(always)]
    pub fn to_array(self) -> [f32; LANE_COUNT] {
        let mut lanes = [0.0f32; LANE_COUNT];
        unsafe { vst1q_f32(lanes.as_mut_ptr(), self.elements) };
        lanes
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
            elements: unsafe { vld1q_u32(bits.as_ptr()) },
        }
    }

    #[inline(always)]
    pub fn to_array(self) -> [Bool32; LANE_COUNT] {
        let mut bits = [0u32; LANE_COUNT];
        unsafe { vst1q_u32(bits.as_mut_ptr(), self.elements) };
        bits.map(Bool32::from_bits_unchecked)
    }
}

impl Default for F32x4 {
    #[inline(always)]
    fn default() -> Self {
        Self {
            elements: unsafe { vdupq_n_f32(0.0) },
        }
    }
}

impl Default for Bool32x4 {
    #[inline(always)]
    fn default() -> Self {
        Self {
            elements: unsafe { vdupq_n_u32(0) },
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
    const BACKEND: Backend = Backend::Neon;

    #[inline(always)]
    fn splat(value: f32) -> Self {
        Self {
            elements: unsafe { vdupq_n_f32(value) },
        }
    }

    // NEON loads have no alignment requirement; the aligned forms only
    // check the contract in debug builds.
    #[inline(always)]
    unsafe fn load(ptr: *const f32) -> Self {
        debug_assert!(Self::is_aligned(ptr), "Pointer must be aligned to {NEON_ALIGNMENT} bytes");
        Self::loadu(ptr)
    }

    #[inline(always)]
    unsafe fn loadu(ptr: *const f32) -> Self {
        Self {
            elements: vld1q_f32(ptr),
        }
    }

    #[inline(always)]
    unsafe fn store(self, ptr: *mut f32) {
        debug_assert!(Self::is_aligned(ptr), "Pointer must be aligned to {NEON_ALIGNMENT} bytes");
        self.storeu(ptr)
    }

    #[inline(always)]
    unsafe fn storeu(self, ptr: *mut f32) {
        vst1q_f32(ptr, self.elements)
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
            elements: unsafe { vceqq_f32(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn not_equal(self, rhs: Self) -> Bool32x4 {
        !self.equal(rhs)
    }

    #[inline(always)]
    fn select(condition: Bool32x4, if_true: Self, if_false: Self) -> Self {
        Self {
            elements: unsafe { vbslq_f32(condition.elements, if_true.elements, if_false.elements) },
        }
    }

    #[inline(always)]
    fn mask(condition: Bool32x4, values: Self) -> Self {
        Self {
            elements: unsafe {
                vreinterpretq_f32_u32(vandq_u32(
                    condition.elements,
                    vreinterpretq_u32_f32(values.elements),
                ))
            },
        }
    }
}

impl SimdVector for Bool32x4 {
    type Scalar = Bool32;
    type Mask = Bool32x4;

    const LANES: usize = LANE_COUNT;
    const BACKEND: Backend = Backend::Neon;

    #[inline(always)]
    fn splat(value: Bool32) -> Self {
        Self {
            elements: unsafe { vdupq_n_u32(value.to_bits()) },
        }
    }

    #[inline(always)]
    unsafe fn load(ptr: *const Bool32) -> Self {
        debug_assert!(Self::is_aligned(ptr), "Pointer must be aligned to {NEON_ALIGNMENT} bytes");
        Self::loadu(ptr)
    }

    #[inline(always)]
    unsafe fn loadu(ptr: *const Bool32) -> Self {
        Self {
            elements: vld1q_u32(ptr.cast::<u32>()),
        }
    }

    #[inline(always)]
    unsafe fn store(self, ptr: *mut Bool32) {
        debug_assert!(Self::is_aligned(ptr), "Pointer must be aligned to {NEON_ALIGNMENT} bytes");
        self.storeu(ptr)
    }

    #[inline(always)]
    unsafe fn storeu(self, ptr: *mut Bool32) {
        vst1q_u32(ptr.cast::<u32>(), self.elements)
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
            elements: unsafe { vbslq_u32(condition.elements, if_true.elements, if_false.elements) },
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

neon_binary_op!(F32x4, vaddq_f32, Add::add, AddAssign::add_assign);
neon_binary_op!(F32x4, vsubq_f32, Sub::sub, SubAssign::sub_assign);
neon_binary_op!(F32x4, vmulq_f32, Mul::mul, MulAssign::mul_assign);
neon_binary_op!(F32x4, vdivq_f32, Div::div, DivAssign::div_assign);

neon_binary_op!(Bool32x4, vandq_u32, BitAnd::bitand, BitAndAssign::bitand_assign);
neon_binary_op!(Bool32x4, vorrq_u32, BitOr::bitor, BitOrAssign::bitor_assign);
neon_binary_op!(Bool32x4, veorq_u32, BitXor::bitxor, BitXorAssign::bitxor_assign);

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
            elements: unsafe { vnegq_f32(self.elements) },
        }
    }
}

impl Not for Bool32x4 {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self {
        Self {
            elements: unsafe { vmvnq_u32(self.elements) },
        }
    }
}

impl SimdBits for Bool32x4 {}

impl SimdMask for Bool32x4 {
    #[inline(always)]
    fn splat_bool(value: bool) -> Self {
        Self::splat(Bool32::from_bool(value))
    }

    #[inline(always)]
    fn all(self) -> bool {
        unsafe { vminvq_u32(self.elements) == u32::MAX }
    }

    #[inline(always)]
    fn any(self) -> bool {
        unsafe { vmaxvq_u32(self.elements) != 0 }
    }

    #[inline(always)]
    fn bitmask(self) -> u64 {
        unsafe {
            let weights = vld1q_u32(LANE_BITS.as_ptr());
            let bits = vandq_u32(vshrq_n_u32::<31>(self.elements), vdupq_n_u32(1));
            u64::from(vaddvq_u32(vmulq_u32(bits, weights)))
        }
    }
}

impl SimdArith for F32x4 {
    #[inline(always)]
    fn less(self, rhs: Self) -> Bool32x4 {
        Bool32x4 {
            elements: unsafe { vcltq_f32(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn less_equal(self, rhs: Self) -> Bool32x4 {
        Bool32x4 {
            elements: unsafe { vcleq_f32(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn greater(self, rhs: Self) -> Bool32x4 {
        Bool32x4 {
            elements: unsafe { vcgtq_f32(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn greater_equal(self, rhs: Self) -> Bool32x4 {
        Bool32x4 {
            elements: unsafe { vcgeq_f32(self.elements, rhs.elements) },
        }
    }
}

impl SimdFloat for F32x4 {
    #[inline(always)]
    fn abs(self) -> Self {
        Self {
            elements: unsafe { vabsq_f32(self.elements) },
        }
    }

    #[inline(always)]
    fn sqrt(self) -> Self {
        Self {
            elements: unsafe { vsqrtq_f32(self.elements) },
        }
    }

    #[inline(always)]
    fn rsqrt(self) -> Self {
        Self {
            elements: unsafe { vrsqrtq_f32(self.elements) },
        }
    }

    #[inline(always)]
    fn recip(self) -> Self {
        Self {
            elements: unsafe { vrecipq_f32(self.elements) },
        }
    }

    #[inline(always)]
    fn sincos(self) -> (Self, Self) {
        let (s, c) = unsafe { vsincosq_f32(self.elements) };
        (Self { elements: s }, Self { elements: c })
    }

    #[inline(always)]
    fn exp(self) -> Self {
        Self {
            elements: unsafe { vexpq_f32(self.elements) },
        }
    }

    #[inline(always)]
    fn log(self) -> Self {
        Self {
            elements: unsafe { vlogq_f32(self.elements) },
        }
    }
}
