//! SSE2 4-lane 32-bit integer vectors.
//!
//! Both types share one register layout and one set of bit operations; they
//! differ in comparison (unsigned lanes are biased by `0x8000_0000` so the
//! signed compare instructions order them correctly) and in the right shift
//! (arithmetic for `I32x4`, logical for `U32x4`).
//!
//! SSE2 has no 32-bit low multiply or integer divide. `*` is assembled from
//! two `pmuludq` on the even and odd lanes; `/` and `%` run the scalar
//! operation per lane and keep its divide-by-zero panic.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use std::fmt;
use std::ops::{
    Add, AddAssign, BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Div,
    DivAssign, Mul, MulAssign, Neg, Not, Rem, RemAssign, Shl, ShlAssign, Shr, ShrAssign, Sub,
    SubAssign,
};

use crate::simd::backend::Backend;
use crate::simd::sse::f32x4::Bool32x4;
use crate::simd::sse::SSE_ALIGNMENT;
use crate::simd::traits::{Number, SimdArith, SimdBits, SimdInt, SimdVector};

pub(crate) const LANE_COUNT: usize = 4;

#[inline(always)]
unsafe fn mul_lo_epi32(a: __m128i, b: __m128i) -> __m128i {
    let even = _mm_mul_epu32(a, b);
    let odd = _mm_mul_epu32(_mm_srli_si128::<4>(a), _mm_srli_si128::<4>(b));
    _mm_unpacklo_epi32(
        _mm_shuffle_epi32::<0x08>(even),
        _mm_shuffle_epi32::<0x08>(odd),
    )
}

#[inline(always)]
fn to_mask(bits: __m128i) -> Bool32x4 {
    Bool32x4 {
        elements: unsafe { _mm_castsi128_ps(bits) },
    }
}

#[inline(always)]
fn from_mask(mask: Bool32x4) -> __m128i {
    unsafe { _mm_castps_si128(mask.elements) }
}

macro_rules! sse2_int_vector {
    (
        $(#[$meta:meta])*
        $name:ident, $scalar:ty, bias = $bias:expr, shr = $shr:ident
    ) => {
        $(#[$meta])*
        #[derive(Copy, Clone)]
        pub struct $name {
            pub elements: __m128i,
        }

        impl $name {
            #[inline(always)]
            pub fn new(a: $scalar, b: $scalar, c: $scalar, d: $scalar) -> Self {
                Self::from_array([a, b, c, d])
            }

            #[inline(always)]
            pub fn from_array(lanes: [$scalar; LANE_COUNT]) -> Self {
                Self {
                    elements: unsafe { _mm_loadu_si128(lanes.as_ptr().cast::<__m128i>()) },
                }
            }

            #[inline(always)]
            pub fn to_array(self) -> [$scalar; LANE_COUNT] {
                let mut lanes = [0 as $scalar; LANE_COUNT];
                unsafe { _mm_storeu_si128(lanes.as_mut_ptr().cast::<__m128i>(), self.elements) };
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

            /// Lanes mapped so that signed compares order them as `$scalar`.
            #[inline(always)]
            fn ordered(self) -> __m128i {
                unsafe { _mm_xor_si128(self.elements, _mm_set1_epi32($bias)) }
            }
        }

        impl Default for $name {
            #[inline(always)]
            fn default() -> Self {
                Self {
                    elements: unsafe { _mm_setzero_si128() },
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
            const BACKEND: Backend = Backend::Sse2;

            #[inline(always)]
            fn splat(value: $scalar) -> Self {
                Self {
                    elements: unsafe { _mm_set1_epi32(value as i32) },
                }
            }

            #[inline(always)]
            unsafe fn load(ptr: *const $scalar) -> Self {
                debug_assert!(
                    Self::is_aligned(ptr),
                    "Pointer must be aligned to {SSE_ALIGNMENT} bytes"
                );
                Self {
                    elements: _mm_load_si128(ptr.cast::<__m128i>()),
                }
            }

            #[inline(always)]
            unsafe fn loadu(ptr: *const $scalar) -> Self {
                Self {
                    elements: _mm_loadu_si128(ptr.cast::<__m128i>()),
                }
            }

            #[inline(always)]
            unsafe fn store(self, ptr: *mut $scalar) {
                debug_assert!(
                    Self::is_aligned(ptr),
                    "Pointer must be aligned to {SSE_ALIGNMENT} bytes"
                );
                _mm_store_si128(ptr.cast::<__m128i>(), self.elements)
            }

            #[inline(always)]
            unsafe fn storeu(self, ptr: *mut $scalar) {
                _mm_storeu_si128(ptr.cast::<__m128i>(), self.elements)
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
                to_mask(unsafe { _mm_cmpeq_epi32(self.elements, rhs.elements) })
            }

            #[inline(always)]
            fn not_equal(self, rhs: Self) -> Bool32x4 {
                !self.equal(rhs)
            }

            #[inline(always)]
            fn select(condition: Bool32x4, if_true: Self, if_false: Self) -> Self {
                let m = from_mask(condition);
                Self {
                    elements: unsafe {
                        _mm_or_si128(
                            _mm_and_si128(m, if_true.elements),
                            _mm_andnot_si128(m, if_false.elements),
                        )
                    },
                }
            }

            #[inline(always)]
            fn mask(condition: Bool32x4, values: Self) -> Self {
                Self {
                    elements: unsafe { _mm_and_si128(from_mask(condition), values.elements) },
                }
            }
        }

        impl Add for $name {
            type Output = Self;

            #[inline(always)]
            fn add(self, rhs: Self) -> Self {
                Self {
                    elements: unsafe { _mm_add_epi32(self.elements, rhs.elements) },
                }
            }
        }

        impl Sub for $name {
            type Output = Self;

            #[inline(always)]
            fn sub(self, rhs: Self) -> Self {
                Self {
                    elements: unsafe { _mm_sub_epi32(self.elements, rhs.elements) },
                }
            }
        }

        impl Mul for $name {
            type Output = Self;

            #[inline(always)]
            fn mul(self, rhs: Self) -> Self {
                Self {
                    elements: unsafe { mul_lo_epi32(self.elements, rhs.elements) },
                }
            }
        }

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

        impl BitAnd for $name {
            type Output = Self;

            #[inline(always)]
            fn bitand(self, rhs: Self) -> Self {
                Self {
                    elements: unsafe { _mm_and_si128(self.elements, rhs.elements) },
                }
            }
        }

        impl BitOr for $name {
            type Output = Self;

            #[inline(always)]
            fn bitor(self, rhs: Self) -> Self {
                Self {
                    elements: unsafe { _mm_or_si128(self.elements, rhs.elements) },
                }
            }
        }

        impl BitXor for $name {
            type Output = Self;

            #[inline(always)]
            fn bitxor(self, rhs: Self) -> Self {
                Self {
                    elements: unsafe { _mm_xor_si128(self.elements, rhs.elements) },
                }
            }
        }

        impl Not for $name {
            type Output = Self;

            #[inline(always)]
            fn not(self) -> Self {
                Self {
                    elements: unsafe { _mm_xor_si128(self.elements, _mm_set1_epi32(-1)) },
                }
            }
        }

        sse2_int_vector!(@assign $name,
            AddAssign::add_assign => Add::add,
            SubAssign::sub_assign => Sub::sub,
            MulAssign::mul_assign => Mul::mul,
            DivAssign::div_assign => Div::div,
            RemAssign::rem_assign => Rem::rem,
            BitAndAssign::bitand_assign => BitAnd::bitand,
            BitOrAssign::bitor_assign => BitOr::bitor,
            BitXorAssign::bitxor_assign => BitXor::bitxor
        );

        // The count register is 64 bits wide; any count of 32 or more clears
        // the lane (or fills it with the sign for the arithmetic shift).
        impl Shl<u32> for $name {
            type Output = Self;

            #[inline(always)]
            fn shl(self, count: u32) -> Self {
                Self {
                    elements: unsafe {
                        _mm_sll_epi32(self.elements, _mm_cvtsi32_si128(count as i32))
                    },
                }
            }
        }

        impl Shr<u32> for $name {
            type Output = Self;

            #[inline(always)]
            fn shr(self, count: u32) -> Self {
                Self {
                    elements: unsafe { $shr(self.elements, _mm_cvtsi32_si128(count as i32)) },
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
                to_mask(unsafe { _mm_cmplt_epi32(self.ordered(), rhs.ordered()) })
            }

            #[inline(always)]
            fn less_equal(self, rhs: Self) -> Bool32x4 {
                !self.greater(rhs)
            }

            #[inline(always)]
            fn greater(self, rhs: Self) -> Bool32x4 {
                to_mask(unsafe { _mm_cmpgt_epi32(self.ordered(), rhs.ordered()) })
            }

            #[inline(always)]
            fn greater_equal(self, rhs: Self) -> Bool32x4 {
                !self.less(rhs)
            }
        }

        impl SimdInt for $name {}
    };

    (@assign $name:ident, $($assign:ident::$assign_method:ident => $op:ident::$method:ident),+) => {
        $(
            impl $assign for $name {
                #[inline(always)]
                fn $assign_method(&mut self, rhs: Self) {
                    *self = $op::$method(*self, rhs);
                }
            }
        )+
    };
}

sse2_int_vector!(
    /// Four packed `i32` values in an SSE register.
    I32x4, i32, bias = 0, shr = _mm_sra_epi32
);

sse2_int_vector!(
    /// Four packed `u32` values in an SSE register.
    U32x4, u32, bias = i32::MIN, shr = _mm_srl_epi32
);

impl Neg for I32x4 {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self {
        Self {
            elements: unsafe { _mm_sub_epi32(_mm_setzero_si128(), self.elements) },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::traits::SimdMask;

    #[test]
    fn test_register_alignment() {
        assert_eq!(std::mem::align_of::<I32x4>(), SSE_ALIGNMENT);
        assert_eq!(std::mem::align_of::<U32x4>(), SSE_ALIGNMENT);
    }

    #[test]
    fn test_multiply_keeps_low_bits() {
        let a = I32x4::new(3, -7, i32::MAX, 65_536);
        let b = I32x4::new(5, 9, 2, 65_536);

        assert_eq!((a * b).to_array(), [15, -63, -2, 0]);

        let u = U32x4::new(u32::MAX, 3, 0x8000_0000, 12_345);
        assert_eq!(
            (u * U32x4::splat(3)).to_array(),
            [u32::MAX.wrapping_mul(3), 9, 0x8000_0000, 37_035]
        );
    }

    #[test]
    fn test_division_matches_scalar() {
        let a = I32x4::new(7, -7, i32::MIN, 9);
        let b = I32x4::new(2, 2, -1, -4);

        assert_eq!((a / b).to_array(), [3, -3, i32::MIN, -2]);
        assert_eq!((a % b).to_array(), [1, -1, 0, 1]);
    }

    #[test]
    #[should_panic]
    fn test_division_by_zero_panics() {
        let _ = U32x4::splat(1) / U32x4::new(1, 1, 0, 1);
    }

    #[test]
    fn test_shift_counts() {
        let a = I32x4::new(1, -8, i32::MIN, 0x4000_0000);

        assert_eq!((a << 1).to_array(), [2, -16, 0, i32::MIN]);
        assert_eq!((a >> 2).to_array(), [0, -2, i32::MIN >> 2, 0x1000_0000]);
        assert_eq!((a << 32).to_array(), [0; 4]);
        assert_eq!((a >> 40).to_array(), [0, -1, -1, 0]);

        let u = U32x4::splat(0x8000_0001);
        assert_eq!((u >> 31).to_array(), [1; 4]);
        assert_eq!((u >> 32).to_array(), [0; 4]);
        assert_eq!((u << u32::MAX).to_array(), [0; 4]);
    }

    #[test]
    fn test_unsigned_ordering() {
        let a = U32x4::new(0, 1, 0x8000_0000, u32::MAX);
        let b = U32x4::splat(0x7FFF_FFFF);

        assert_eq!(a.less(b).bitmask(), 0b0011);
        assert_eq!(a.greater(b).bitmask(), 0b1100);
        assert_eq!(a.less_equal(a).bitmask(), 0b1111);
        assert_eq!(a.max(b).to_array(), [0x7FFF_FFFF, 0x7FFF_FFFF, 0x8000_0000, u32::MAX]);
    }

    #[test]
    fn test_signed_ordering_and_select() {
        let a = I32x4::new(-5, 0, 5, i32::MIN);
        let b = I32x4::splat(0);

        let negative = a.less(b);
        assert_eq!(negative.bitmask(), 0b1001);
        assert_eq!(a.greater_equal(b).bitmask(), 0b0110);
        assert_eq!(a.not_equal(b).bitmask(), 0b1101);
        assert_eq!(I32x4::select(negative, -a, a).to_array(), [5, 0, 5, i32::MIN]);
        assert_eq!(I32x4::mask(negative, a).to_array(), [-5, 0, 0, i32::MIN]);
        assert!(!negative.all() && negative.any());
    }

    #[test]
    fn test_bitwise_and_wrapping() {
        let a = U32x4::splat(0b1100);
        let b = U32x4::splat(0b1010);

        assert_eq!((a & b).to_array(), [0b1000; 4]);
        assert_eq!((a | b).to_array(), [0b1110; 4]);
        assert_eq!((a ^ b).to_array(), [0b0110; 4]);
        assert_eq!((!a).to_array(), [!0b1100u32; 4]);
        assert_eq!(U32x4::splat(u32::MAX).inc().to_array(), [0; 4]);
        assert_eq!(I32x4::splat(i32::MIN).dec().to_array(), [i32::MAX; 4]);
    }
}
