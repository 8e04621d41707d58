//! Element and vector contracts shared by every backend.
//!
//! A backend is any type implementing [`SimdVector`] plus the capability traits
//! that apply to its element type:
//!
//! | Trait        | Elements                  | Operations                               |
//! |--------------|---------------------------|------------------------------------------|
//! | `SimdVector` | all                       | construct, load/store, `equal`, `select` |
//! | `SimdBits`   | integers, lane masks      | `& \| ^ !`                               |
//! | `SimdMask`   | lane masks                | `all`, `any`, `bitmask`                  |
//! | `SimdArith`  | integers, floats          | `+ - * / %`, ordering comparisons        |
//! | `SimdInt`    | integers                  | `<< >>` by a scalar count                |
//! | `SimdFloat`  | `f32`, `f64`              | transcendental kernels                   |
//!
//! Every implementation must be interchangeable at this contract: integer,
//! bitwise and comparison results are bit-identical across backends, floating
//! point kernels agree with the scalar reference within the documented bound.

use std::fmt::Debug;
use std::ops::{
    Add, AddAssign, BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Div,
    DivAssign, Mul, MulAssign, Neg, Not, Rem, RemAssign, Shl, ShlAssign, Shr, ShrAssign, Sub,
    SubAssign,
};

use num::traits::{One, PrimInt, Unsigned, Zero};

use crate::simd::backend::Backend;
use crate::simd::bools::{Bool16, Bool32, Bool64, Bool8};

mod sealed {
    pub trait Sealed {}
}

/// A scalar type that can occupy one SIMD lane.
///
/// Sealed: the lane-mask mapping and the bit-level helpers are part of the
/// layout contract and are only provided for the primitive numbers and the
/// sized booleans.
pub trait Element:
    sealed::Sealed + Copy + Default + Debug + PartialEq + Send + Sync + 'static
{
    /// Unsigned integer with the same width as the lane.
    type Bits: PrimInt + Unsigned + Debug + Send + Sync + 'static;

    /// Lane-mask type produced when two lanes of this type are compared.
    type Mask: SizedBool<Bits = Self::Bits>;

    /// Short name used in backend reports (`"f32"`, `"bool64"`, ...).
    const NAME: &'static str;

    fn to_bits(self) -> Self::Bits;

    fn from_bits(bits: Self::Bits) -> Self;
}

/// Bit-pattern boolean: all ones for `true`, all zeros for `false`.
pub trait SizedBool:
    Element<Mask = Self>
    + Eq
    + Not<Output = Self>
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitXor<Output = Self>
{
    const TRUE: Self;
    const FALSE: Self;

    fn from_bool(value: bool) -> Self;

    fn to_bool(self) -> bool;
}

/// Scalar arithmetic with the semantics a SIMD lane has.
///
/// Integer arithmetic wraps, as the vector instructions do. Division and
/// remainder by zero keep Rust's own rule for the scalar type (a panic for
/// integers, IEEE results for floats).
pub trait Number: Element + PartialOrd + Zero + One {
    fn lane_add(self, rhs: Self) -> Self;

    fn lane_sub(self, rhs: Self) -> Self;

    fn lane_mul(self, rhs: Self) -> Self;

    fn lane_div(self, rhs: Self) -> Self;

    fn lane_rem(self, rhs: Self) -> Self;

    /// `self < rhs ? self : rhs`. Returns `rhs` when either side is NaN.
    #[inline(always)]
    fn lane_min(self, rhs: Self) -> Self {
        if self < rhs {
            self
        } else {
            rhs
        }
    }

    /// `self > rhs ? self : rhs`. Returns `rhs` when either side is NaN.
    #[inline(always)]
    fn lane_max(self, rhs: Self) -> Self {
        if self > rhs {
            self
        } else {
            rhs
        }
    }
}

/// Integer lanes.
pub trait Integer:
    Number
    + Eq
    + Not<Output = Self>
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitXor<Output = Self>
{
    const BITS: u32;

    /// Left shift; counts of `BITS` or more clear the lane.
    fn lane_shl(self, count: u32) -> Self;

    /// Right shift; arithmetic for signed lanes (counts of `BITS` or more fill
    /// with the sign), logical for unsigned lanes (counts of `BITS` or more
    /// clear the lane).
    fn lane_shr(self, count: u32) -> Self;
}

/// Lanes with a sign.
pub trait Signed: Number {
    fn lane_neg(self) -> Self;

    fn lane_abs(self) -> Self;
}

/// Floating point lanes and their scalar reference kernels.
///
/// The scalar kernels follow exactly the same range reduction, polynomial and
/// reconstruction steps as the vector kernels, one lane at a time. They are
/// what the fallback backend executes.
pub trait Float: Signed {
    fn kernel_sincos(self) -> (Self, Self);

    fn kernel_exp(self) -> Self;

    fn kernel_log(self) -> Self;

    fn kernel_sqrt(self) -> Self;

    fn kernel_rsqrt(self) -> Self;

    fn kernel_recip(self) -> Self;
}

macro_rules! bool_element {
    ($($name:ident => $bits:ty, $label:literal);+ $(;)?) => {
        $(
            impl sealed::Sealed for $name {}

            impl Element for $name {
                type Bits = $bits;
                type Mask = $name;

                const NAME: &'static str = $label;

                #[inline(always)]
                fn to_bits(self) -> $bits {
                    $name::to_bits(self)
                }

                #[inline(always)]
                fn from_bits(bits: $bits) -> Self {
                    $name::from_bits_unchecked(bits)
                }
            }

            impl SizedBool for $name {
                const TRUE: Self = $name::TRUE;
                const FALSE: Self = $name::FALSE;

                #[inline(always)]
                fn from_bool(value: bool) -> Self {
                    $name::from_bool(value)
                }

                #[inline(always)]
                fn to_bool(self) -> bool {
                    $name::to_bool(self)
                }
            }
        )+
    };
}

bool_element! {
    Bool8 => u8, "bool8";
    Bool16 => u16, "bool16";
    Bool32 => u32, "bool32";
    Bool64 => u64, "bool64";
}

macro_rules! int_element {
    ($($ty:ty => $bits:ty, $mask:ident, $label:literal, $shr:ident);+ $(;)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl Element for $ty {
                type Bits = $bits;
                type Mask = $mask;

                const NAME: &'static str = $label;

                #[inline(always)]
                fn to_bits(self) -> $bits {
                    self as $bits
                }

                #[inline(always)]
                fn from_bits(bits: $bits) -> Self {
                    bits as $ty
                }
            }

            impl Number for $ty {
                #[inline(always)]
                fn lane_add(self, rhs: Self) -> Self {
                    self.wrapping_add(rhs)
                }

                #[inline(always)]
                fn lane_sub(self, rhs: Self) -> Self {
                    self.wrapping_sub(rhs)
                }

                #[inline(always)]
                fn lane_mul(self, rhs: Self) -> Self {
                    self.wrapping_mul(rhs)
                }

                #[inline(always)]
                fn lane_div(self, rhs: Self) -> Self {
                    self.wrapping_div(rhs)
                }

                #[inline(always)]
                fn lane_rem(self, rhs: Self) -> Self {
                    self.wrapping_rem(rhs)
                }
            }

            impl Integer for $ty {
                const BITS: u32 = <$ty>::BITS;

                #[inline(always)]
                fn lane_shl(self, count: u32) -> Self {
                    self.checked_shl(count).unwrap_or(0)
                }

                #[inline(always)]
                fn lane_shr(self, count: u32) -> Self {
                    $shr(self, count)
                }
            }
        )+
    };
}

macro_rules! signed_int {
    ($($ty:ty),+) => {
        $(
            impl Signed for $ty {
                #[inline(always)]
                fn lane_neg(self) -> Self {
                    self.wrapping_neg()
                }

                #[inline(always)]
                fn lane_abs(self) -> Self {
                    self.wrapping_abs()
                }
            }
        )+
    };
}

#[inline(always)]
fn arithmetic_shr<T: PrimInt>(value: T, count: u32) -> T {
    let max = (std::mem::size_of::<T>() * 8 - 1) as u32;
    value.signed_shr(count.min(max))
}

#[inline(always)]
fn logical_shr<T: PrimInt>(value: T, count: u32) -> T {
    if count as usize >= std::mem::size_of::<T>() * 8 {
        T::zero()
    } else {
        value.unsigned_shr(count)
    }
}

int_element! {
    i8 => u8, Bool8, "i8", arithmetic_shr;
    u8 => u8, Bool8, "u8", logical_shr;
    i16 => u16, Bool16, "i16", arithmetic_shr;
    u16 => u16, Bool16, "u16", logical_shr;
    i32 => u32, Bool32, "i32", arithmetic_shr;
    u32 => u32, Bool32, "u32", logical_shr;
    i64 => u64, Bool64, "i64", arithmetic_shr;
    u64 => u64, Bool64, "u64", logical_shr;
}

signed_int!(i8, i16, i32, i64);

macro_rules! float_element {
    ($($ty:ty => $bits:ty, $mask:ident, $label:literal, $sign:expr);+ $(;)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl Element for $ty {
                type Bits = $bits;
                type Mask = $mask;

                const NAME: &'static str = $label;

                #[inline(always)]
                fn to_bits(self) -> $bits {
                    <$ty>::to_bits(self)
                }

                #[inline(always)]
                fn from_bits(bits: $bits) -> Self {
                    <$ty>::from_bits(bits)
                }
            }

            impl Number for $ty {
                #[inline(always)]
                fn lane_add(self, rhs: Self) -> Self {
                    self + rhs
                }

                #[inline(always)]
                fn lane_sub(self, rhs: Self) -> Self {
                    self - rhs
                }

                #[inline(always)]
                fn lane_mul(self, rhs: Self) -> Self {
                    self * rhs
                }

                #[inline(always)]
                fn lane_div(self, rhs: Self) -> Self {
                    self / rhs
                }

                #[inline(always)]
                fn lane_rem(self, rhs: Self) -> Self {
                    self % rhs
                }
            }

            impl Signed for $ty {
                #[inline(always)]
                fn lane_neg(self) -> Self {
                    -self
                }

                #[inline(always)]
                fn lane_abs(self) -> Self {
                    <$ty>::from_bits(<$ty>::to_bits(self) & !$sign)
                }
            }
        )+
    };
}

float_element! {
    f32 => u32, Bool32, "f32", 0x8000_0000u32;
    f64 => u64, Bool64, "f64", 0x8000_0000_0000_0000u64;
}

/// The operation set every `(element, width)` specialization provides.
pub trait SimdVector: Copy + Debug + Default + PartialEq + Send + Sync + 'static {
    type Scalar: Element;

    /// Same-width vector of lane masks returned by comparisons.
    type Mask: SimdMask<Scalar = <Self::Scalar as Element>::Mask>;

    const LANES: usize;

    const BACKEND: Backend;

    /// Backend of the narrowest building block; differs from `BACKEND` only
    /// for composed widths.
    const LEAF_BACKEND: Backend = Self::BACKEND;

    /// Every lane set to `value`.
    fn splat(value: Self::Scalar) -> Self;

    /// Loads `LANES` elements.
    ///
    /// # Safety
    ///
    /// `ptr` must satisfy the alignment of `Self` and point to at least
    /// `LANES` readable elements.
    unsafe fn load(ptr: *const Self::Scalar) -> Self;

    /// Loads `LANES` elements from any address.
    ///
    /// # Safety
    ///
    /// `ptr` must point to at least `LANES` readable elements.
    unsafe fn loadu(ptr: *const Self::Scalar) -> Self;

    /// Stores `LANES` elements.
    ///
    /// # Safety
    ///
    /// `ptr` must satisfy the alignment of `Self` and point to at least
    /// `LANES` writable elements.
    unsafe fn store(self, ptr: *mut Self::Scalar);

    /// Stores `LANES` elements to any address.
    ///
    /// # Safety
    ///
    /// `ptr` must point to at least `LANES` writable elements.
    unsafe fn storeu(self, ptr: *mut Self::Scalar);

    /// Reads lane `lane`. Panics when `lane >= LANES`.
    fn extract(self, lane: usize) -> Self::Scalar;

    /// Returns a copy with lane `lane` set to `value`. Panics when `lane >= LANES`.
    fn replace(self, lane: usize, value: Self::Scalar) -> Self;

    /// Lane-wise `==` (floating lanes: IEEE equality, NaN is never equal).
    fn equal(self, rhs: Self) -> Self::Mask;

    /// Lane-wise `!=` (floating lanes: NaN is always unequal).
    fn not_equal(self, rhs: Self) -> Self::Mask;

    /// `(condition & if_true) | (!condition & if_false)` on the raw lane bits.
    fn select(condition: Self::Mask, if_true: Self, if_false: Self) -> Self;

    /// `condition & values` on the raw lane bits: `values` where the condition
    /// holds, all-zero bits elsewhere.
    fn mask(condition: Self::Mask, values: Self) -> Self;

    /// Whether `ptr` satisfies the alignment `load` and `store` require.
    #[inline(always)]
    fn is_aligned(ptr: *const Self::Scalar) -> bool {
        (ptr as usize) % std::mem::align_of::<Self>() == 0
    }

    /// Loads the first `LANES` elements of `slice`.
    ///
    /// # Panics
    ///
    /// Panics if `slice` holds fewer than `LANES` elements.
    #[inline(always)]
    fn from_slice(slice: &[Self::Scalar]) -> Self {
        assert!(
            slice.len() >= Self::LANES,
            "Slice must hold at least {} elements, got {}",
            Self::LANES,
            slice.len()
        );

        // SAFETY: the slice holds at least LANES readable elements.
        unsafe { Self::loadu(slice.as_ptr()) }
    }

    /// Stores every lane into the first `LANES` elements of `slice`.
    ///
    /// # Panics
    ///
    /// Panics if `slice` holds fewer than `LANES` elements.
    #[inline(always)]
    fn write_to_slice(self, slice: &mut [Self::Scalar]) {
        assert!(
            slice.len() >= Self::LANES,
            "Slice must hold at least {} elements, got {}",
            Self::LANES,
            slice.len()
        );

        // SAFETY: the slice holds at least LANES writable elements.
        unsafe { self.storeu(slice.as_mut_ptr()) }
    }
}

/// Bitwise operators on the raw lane bits.
pub trait SimdBits:
    SimdVector
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitXor<Output = Self>
    + Not<Output = Self>
    + BitAndAssign
    + BitOrAssign
    + BitXorAssign
{
}

/// Vector of lane masks.
pub trait SimdMask: SimdBits<Mask = Self> {
    /// Every lane set to the canonical pattern for `value`.
    fn splat_bool(value: bool) -> Self;

    /// Whether every lane is true.
    fn all(self) -> bool;

    /// Whether at least one lane is true.
    fn any(self) -> bool;

    /// Whether no lane is true.
    #[inline(always)]
    fn none(self) -> bool {
        !self.any()
    }

    /// Bit `i` is set when lane `i` is true.
    fn bitmask(self) -> u64;
}

/// Lane-wise arithmetic and ordering.
pub trait SimdArith:
    SimdVector<Scalar: Number>
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Rem<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
    + RemAssign
{
    fn less(self, rhs: Self) -> Self::Mask;

    fn less_equal(self, rhs: Self) -> Self::Mask;

    fn greater(self, rhs: Self) -> Self::Mask;

    fn greater_equal(self, rhs: Self) -> Self::Mask;

    /// Every lane plus one (the `++` form).
    #[inline(always)]
    fn inc(self) -> Self {
        self + Self::splat(<Self::Scalar as One>::one())
    }

    /// Every lane minus one (the `--` form).
    #[inline(always)]
    fn dec(self) -> Self {
        self - Self::splat(<Self::Scalar as One>::one())
    }

    /// Lane-wise `self < rhs ? self : rhs`.
    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        Self::select(self.less(rhs), self, rhs)
    }

    /// Lane-wise `self > rhs ? self : rhs`.
    #[inline(always)]
    fn max(self, rhs: Self) -> Self {
        Self::select(self.greater(rhs), self, rhs)
    }
}

/// Integer vectors: arithmetic, bitwise operators and uniform shifts.
///
/// The shift count is one scalar applied to every lane.
pub trait SimdInt:
    SimdArith
    + SimdBits
    + Shl<u32, Output = Self>
    + Shr<u32, Output = Self>
    + ShlAssign<u32>
    + ShrAssign<u32>
{
}

/// Floating point vectors and the transcendental kernel set.
pub trait SimdFloat: SimdArith + Neg<Output = Self> {
    /// Clears the sign bit of every lane.
    fn abs(self) -> Self;

    fn sqrt(self) -> Self;

    /// `1 / sqrt(x)`.
    fn rsqrt(self) -> Self;

    /// `1 / x`.
    fn recip(self) -> Self;

    /// `(sin(x), cos(x))` from one shared range reduction.
    fn sincos(self) -> (Self, Self);

    fn exp(self) -> Self;

    /// Natural logarithm. Lanes `<= 0` and NaN lanes produce NaN.
    fn log(self) -> Self;

    #[inline(always)]
    fn sin(self) -> Self {
        self.sincos().0
    }

    #[inline(always)]
    fn cos(self) -> Self {
        self.sincos().1
    }

    /// `exp(exponent * log(self))`.
    #[inline(always)]
    fn pow(self, exponent: Self) -> Self {
        (exponent * self.log()).exp()
    }
}
