//! NEON 4-lane 32-bit integer vectors.
//!
//! Shifts use the register form `vshlq` with a broadcast count: a positive
//! count shifts left, a negative one shifts right. Counts are clamped to 32,
//! which already clears the lane (or fills it with the sign for `i32`).

use std::arch::aarch64::*;
use std::fmt;
use std::ops::{
    Add, AddAssign, BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Div,
    DivAssign, Mul, MulAssign, Neg, Not, Rem, RemAssign, Shl, ShlAssign, Shr, ShrAssign, Sub,
    SubAssign,
};

use crate::simd::backend::Backend;
use crate::simd::neon::f32x4::Bool32x4;
use crate::simd::neon::NEON_ALIGNMENT;
use crate::simd::traits::{Number, SimdArith, SimdBits, SimdInt, SimdVector};

pub(crate) const LANE_COUNT: usize = 4;

#[inline(always)]
fn shift_count(count: u32) -> i32 {
    count.min(32) as i32
}

macro_rules! neon_int_vector {
    (
        $(#[$meta:meta])*
        $name:ident, $scalar:ty, $reg:ty,
        dup = $dup:ident, ld = $ld:ident, st = $st:ident,
        add = $add:ident, sub = $sub:ident, mul = $mul:ident,
        and = $and:ident, orr = $orr:ident, eor = $eor:ident, mvn = $mvn:ident,
        shl = $shl:ident, bsl = $bsl:ident,
        ceq = $ceq:ident, clt = $clt:ident, cle = $cle:ident, cgt = $cgt:ident, cge = $cge:ident,
        to_bits = $to_bits:ident, from_bits = $from_bits:ident
    ) => {
        $(#[$meta])*
        #[derive(Copy, Clone)]
        pub struct $name {
            pub elements: $reg,
        }

        impl $name {
            #[inline(always)]
            pub fn new(a: $scalar, b: $scalar, c: $scalar, d: $scalar) -> Self {
                Self::from_array([a, b, c, d])
            }

            #[inline(always)]
            pub fn from_array(lanes: [$scalar; LANE_COUNT]) -> Self {
                Self {
                    elements: unsafe { $ld(lanes.as_ptr()) },
                }
            }

            #[inline(always)]
            pub fn to_array(self) -> [$scalar; LANE_COUNT] {
                let mut lanes = [0 as $scalar; LANE_COUNT];
                unsafe { $st(lanes.as_mut_ptr(), self.elements) };
                lanes
            }

            #[inline(always)]
            fn lane_wise(self, rhs: Self, f: impl Fn($scalar, $scalar) -> $scalar) -> Self {
                let mut lanes = self.to_array();
                for (lane, other) in lanes.iter_mut().zip(rhs.to_array()) {
                    *lane = f(*lane, other);
                }
                Self::from_array(lanes)
            }
        }

        impl Default for $name {
            #[inline(always)]
            fn default() -> Self {
                Self {
                    elements: unsafe { $dup(0) },
                }
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.to_array()).finish()
            }
        }

        impl PartialEq for $name {
            #[inline(always)]
            fn eq(&self, other: &Self) -> bool {
                self.to_array() == other.to_array()
            }
        }

        impl From<[$scalar; LANE_COUNT]> for $name {
            #[inline(always)]
            fn from(lanes: [$scalar; LANE_COUNT]) -> Self {
                Self::from_array(lanes)
            }
        }

        impl From<$name> for [$scalar; LANE_COUNT] {
            #[inline(always)]
            fn from(vector: $name) -> Self {
                vector.to_array()
            }
        }

        impl SimdVector for $name {
            type Scalar = $scalar;
            type Mask = Bool32x4;

            const LANES: usize = LANE_COUNT;
            const BACKEND: Backend = Backend::Neon;

            #[inline(always)]
            fn splat(value: $scalar) -> Self {
                Self {
                    elements: unsafe { $dup(value) },
                }
            }

            #[inline(always)]
            unsafe fn load(ptr: *const $scalar) -> Self {
                debug_assert!(
                    Self::is_aligned(ptr),
                    "Pointer must be aligned to {NEON_ALIGNMENT} bytes"
                );
                Self::loadu(ptr)
            }

            #[inline(always)]
            unsafe fn loadu(ptr: *const $scalar) -> Self {
                Self { elements: $ld(ptr) }
            }

            #[inline(always)]
            unsafe fn store(self, ptr: *mut $scalar) {
                debug_assert!(
                    Self::is_aligned(ptr),
                    "Pointer must be aligned to {NEON_ALIGNMENT} bytes"
                );
                self.storeu(ptr)
            }

            #[inline(always)]
            unsafe fn storeu(self, ptr: *mut $scalar) {
                $st(ptr, self.elements)
            }

            #[inline(always)]
            fn extract(self, lane: usize) -> $scalar {
                self.to_array()[lane]
            }

            #[inline(always)]
            fn replace(self, lane: usize, value: $scalar) -> Self {
                let mut lanes = self.to_array();
                lanes[lane] = value;
                Self::from_array(lanes)
            }

            #[inline(always)]
            fn equal(self, rhs: Self) -> Bool32x4 {
                Bool32x4 {
                    elements: unsafe { $ceq(self.elements, rhs.elements) },
                }
            }

            #[inline(always)]
            fn not_equal(self, rhs: Self) -> Bool32x4 {
                !self.equal(rhs)
            }

            #[inline(always)]
            fn select(condition: Bool32x4, if_true: Self, if_false: Self) -> Self {
                Self {
                    elements: unsafe {
                        $bsl(condition.elements, if_true.elements, if_false.elements)
                    },
                }
            }

            #[inline(always)]
            fn mask(condition: Bool32x4, values: Self) -> Self {
                Self {
                    elements: unsafe {
                        $from_bits(vandq_u32(condition.elements, $to_bits(values.elements)))
                    },
                }
            }
        }

        neon_int_vector!(@binary $name,
            Add::add, AddAssign::add_assign => $add;
            Sub::sub, SubAssign::sub_assign => $sub;
            Mul::mul, MulAssign::mul_assign => $mul;
            BitAnd::bitand, BitAndAssign::bitand_assign => $and;
            BitOr::bitor, BitOrAssign::bitor_assign => $orr;
            BitXor::bitxor, BitXorAssign::bitxor_assign => $eor
        );

        impl Div for $name {
            type Output = Self;

            #[inline(always)]
            fn div(self, rhs: Self) -> Self {
                self.lane_wise(rhs, <$scalar as Number>::lane_div)
            }
        }

        impl Rem for $name {
            type Output = Self;

            #[inline(always)]
            fn rem(self, rhs: Self) -> Self {
                self.lane_wise(rhs, <$scalar as Number>::lane_rem)
            }
        }

        impl DivAssign for $name {
            #[inline(always)]
            fn div_assign(&mut self, rhs: Self) {
                *self = *self / rhs;
            }
        }

        impl RemAssign for $name {
            #[inline(always)]
            fn rem_assign(&mut self, rhs: Self) {
                *self = *self % rhs;
            }
        }

        impl Not for $name {
            type Output = Self;

            #[inline(always)]
            fn not(self) -> Self {
                Self {
                    elements: unsafe { $mvn(self.elements) },
                }
            }
        }

        impl Shl<u32> for $name {
            type Output = Self;

            #[inline(always)]
            fn shl(self, count: u32) -> Self {
                Self {
                    elements: unsafe { $shl(self.elements, vdupq_n_s32(shift_count(count))) },
                }
            }
        }

        impl Shr<u32> for $name {
            type Output = Self;

            #[inline(always)]
            fn shr(self, count: u32) -> Self {
                Self {
                    elements: unsafe { $shl(self.elements, vdupq_n_s32(-shift_count(count))) },
                }
            }
        }

        impl ShlAssign<u32> for $name {
            #[inline(always)]
            fn shl_assign(&mut self, count: u32) {
                *self = *self << count;
            }
        }

        impl ShrAssign<u32> for $name {
            #[inline(always)]
            fn shr_assign(&mut self, count: u32) {
                *self = *self >> count;
            }
        }

        impl SimdBits for $name {}

        impl SimdArith for $name {
            #[inline(always)]
            fn less(self, rhs: Self) -> Bool32x4 {
                Bool32x4 {
                    elements: unsafe { $clt(self.elements, rhs.elements) },
                }
            }

            #[inline(always)]
            fn less_equal(self, rhs: Self) -> Bool32x4 {
                Bool32x4 {
                    elements: unsafe { $cle(self.elements, rhs.elements) },
                }
            }

            #[inline(always)]
            fn greater(self, rhs: Self) -> Bool32x4 {
                Bool32x4 {
                    elements: unsafe { $cgt(self.elements, rhs.elements) },
                }
            }

            #[inline(always)]
            fn greater_equal(self, rhs: Self) -> Bool32x4 {
                Bool32x4 {
                    elements: unsafe { $cge(self.elements, rhs.elements) },
                }
            }
        }

        impl SimdInt for $name {}
    };

    (
        @binary $name:ident,
        $($op:ident::$method:ident, $assign:ident::$assign_method:ident => $intrinsic:ident);+
    ) => {
        $(
            impl $op for $name {
                type Output = Self;

                #[inline(always)]
                fn $method(self, rhs: Self) -> Self {
                    Self {
                        elements: unsafe { $intrinsic(self.elements, rhs.elements) },
                    }
                }
            }

            impl $assign for $name {
                #[inline(always)]
                fn $assign_method(&mut self, rhs: Self) {
                    *self = $op::$method(*self, rhs);
                }
            }
        )+
    };
}

#[inline(always)]
unsafe fn u32_bits(v: uint32x4_t) -> uint32x4_t {
    v
}

neon_int_vector!(
    /// Four packed `i32` values in a NEON register.
    I32x4, i32, int32x4_t,
    dup = vdupq_n_s32, ld = vld1q_s32, st = vst1q_s32,
    add = vaddq_s32, sub = vsubq_s32, mul = vmulq_s32,
    and = vandq_s32, orr = vorrq_s32, eor = veorq_s32, mvn = vmvnq_s32,
    shl = vshlq_s32, bsl = vbslq_s32,
    ceq = vceqq_s32, clt = vcltq_s32, cle = vcleq_s32, cgt = vcgtq_s32, cge = vcgeq_s32,
    to_bits = vreinterpretq_u32_s32, from_bits = vreinterpretq_s32_u32
);

neon_int_vector!(
    /// Four packed `u32` values in a NEON register.
    U32x4, u32, uint32x4_t,
    dup = vdupq_n_u32, ld = vld1q_u32, st = vst1q_u32,
    add = vaddq_u32, sub = vsubq_u32, mul = vmulq_u32,
    and = vandq_u32, orr = vorrq_u32, eor = veorq_u32, mvn = vmvnq_u32,
    shl = vshlq_u32, bsl = vbslq_u32,
    ceq = vceqq_u32, clt = vcltq_u32, cle = vcleq_u32, cgt = vcgtq_u32, cge = vcgeq_u32,
    to_bits = u32_bits, from_bits = u32_bits
);

impl Neg for I32x4 {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self {
        Self {
            elements: unsafe { vnegq_s32(self.elements) },
        }
    }
}
