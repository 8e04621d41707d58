//! Scalar-array backend.
//!
//! [`ScalarVec`] stores `N` lanes as a plain `[T; N]` and applies the scalar
//! lane operation of [`Number`], [`Integer`] or [`Float`] to each of them. It
//! implements the whole contract for every element type and width, so it is
//! both the backend of last resort and the reference the native backends are
//! tested against.

pub mod math;

use std::ops::{
    Add, AddAssign, BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Div,
    DivAssign, Mul, MulAssign, Neg, Not, Rem, RemAssign, Shl, ShlAssign, Shr, ShrAssign, Sub,
    SubAssign,
};

use crate::simd::backend::{Backend, LaneWidth};
use crate::simd::traits::{
    Element, Float, Integer, Number, Signed, SimdArith, SimdBits, SimdFloat, SimdInt, SimdMask,
    SimdVector, SizedBool,
};

/// `N` lanes of `T` with the layout and alignment of `[T; N]`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[repr(transparent)]
pub struct ScalarVec<T, const N: usize>(pub(crate) [T; N]);

impl<T: Element, const N: usize> ScalarVec<T, N> {
    #[inline(always)]
    pub const fn from_array(lanes: [T; N]) -> Self {
        Self(lanes)
    }

    #[inline(always)]
    pub const fn to_array(self) -> [T; N] {
        self.0
    }

    #[inline(always)]
    fn map(self, f: impl Fn(T) -> T) -> Self {
        Self(self.0.map(f))
    }

    #[inline(always)]
    fn zip_map(mut self, rhs: Self, f: impl Fn(T, T) -> T) -> Self {
        for (lane, other) in self.0.iter_mut().zip(rhs.0) {
            *lane = f(*lane, other);
        }
        self
    }

    #[inline(always)]
    fn compare(self, rhs: Self, f: impl Fn(T, T) -> bool) -> <T as LaneWidth<N>>::MaskVector
    where
        T: LaneWidth<N>,
    {
        let mut lanes = [<T::Mask as SizedBool>::FALSE; N];
        for ((lane, a), b) in lanes.iter_mut().zip(self.0).zip(rhs.0) {
            *lane = <T::Mask as SizedBool>::from_bool(f(a, b));
        }
        <<T as LaneWidth<N>>::MaskVector as SimdVector>::from_slice(&lanes)
    }

    /// Raw bits of every lane of a mask vector of the same width.
    #[inline(always)]
    fn mask_bits(condition: <T as LaneWidth<N>>::MaskVector) -> [T::Bits; N]
    where
        T: LaneWidth<N>,
    {
        let mut lanes = [<T::Mask as SizedBool>::FALSE; N];
        condition.write_to_slice(&mut lanes);
        lanes.map(|lane| lane.to_bits())
    }
}

impl<T: Element> ScalarVec<T, 2> {
    #[inline(always)]
    pub const fn new(a: T, b: T) -> Self {
        Self([a, b])
    }
}

impl<T: Element> ScalarVec<T, 4> {
    #[inline(always)]
    pub const fn new(a: T, b: T, c: T, d: T) -> Self {
        Self([a, b, c, d])
    }
}

impl<T: Element> ScalarVec<T, 8> {
    #[allow(clippy::too_many_arguments)]
    #[inline(always)]
    pub const fn new(a: T, b: T, c: T, d: T, e: T, f: T, g: T, h: T) -> Self {
        Self([a, b, c, d, e, f, g, h])
    }
}

impl<T: Element> ScalarVec<T, 16> {
    #[allow(clippy::too_many_arguments)]
    #[inline(always)]
    pub const fn new(
        a0: T,
        a1: T,
        a2: T,
        a3: T,
        a4: T,
        a5: T,
        a6: T,
        a7: T,
        a8: T,
        a9: T,
        a10: T,
        a11: T,
        a12: T,
        a13: T,
        a14: T,
        a15: T,
    ) -> Self {
        Self([
            a0, a1, a2, a3, a4, a5, a6, a7, a8, a9, a10, a11, a12, a13, a14, a15,
        ])
    }
}

impl<T: Element, const N: usize> Default for ScalarVec<T, N> {
    #[inline(always)]
    fn default() -> Self {
        Self([T::default(); N])
    }
}

impl<T: Element, const N: usize> From<[T; N]> for ScalarVec<T, N> {
    #[inline(always)]
    fn from(lanes: [T; N]) -> Self {
        Self(lanes)
    }
}

impl<T: Element, const N: usize> From<ScalarVec<T, N>> for [T; N] {
    #[inline(always)]
    fn from(vector: ScalarVec<T, N>) -> Self {
        vector.0
    }
}

impl<T: LaneWidth<N>, const N: usize> SimdVector for ScalarVec<T, N> {
    type Scalar = T;
    type Mask = <T as LaneWidth<N>>::MaskVector;

    const LANES: usize = N;
    const BACKEND: Backend = Backend::Fallback;

    #[inline(always)]
    fn splat(value: T) -> Self {
        Self([value; N])
    }

    #[inline(always)]
    unsafe fn load(ptr: *const T) -> Self {
        debug_assert!(
            Self::is_aligned(ptr),
            "Pointer must be aligned to {}",
            std::mem::align_of::<Self>()
        );
        Self(ptr.cast::<[T; N]>().read())
    }

    #[inline(always)]
    unsafe fn loadu(ptr: *const T) -> Self {
        Self(ptr.cast::<[T; N]>().read_unaligned())
    }

    #[inline(always)]
    unsafe fn store(self, ptr: *mut T) {
        debug_assert!(
            Self::is_aligned(ptr),
            "Pointer must be aligned to {}",
            std::mem::align_of::<Self>()
        );
        ptr.cast::<[T; N]>().write(self.0)
    }

    #[inline(always)]
    unsafe fn storeu(self, ptr: *mut T) {
        ptr.cast::<[T; N]>().write_unaligned(self.0)
    }

    #[inline(always)]
    fn extract(self, lane: usize) -> T {
        self.0[lane]
    }

    #[inline(always)]
    fn replace(mut self, lane: usize, value: T) -> Self {
        self.0[lane] = value;
        self
    }

    #[inline(always)]
    fn equal(self, rhs: Self) -> Self::Mask {
        self.compare(rhs, |a, b| a == b)
    }

    #[inline(always)]
    fn not_equal(self, rhs: Self) -> Self::Mask {
        self.compare(rhs, |a, b| a != b)
    }

    #[inline(always)]
    fn select(condition: Self::Mask, if_true: Self, if_false: Self) -> Self {
        let bits = Self::mask_bits(condition);
        let mut lanes = if_false.0;
        for ((lane, m), value) in lanes.iter_mut().zip(bits).zip(if_true.0) {
            *lane = T::from_bits((m & value.to_bits()) | (!m & lane.to_bits()));
        }
        Self(lanes)
    }

    #[inline(always)]
    fn mask(condition: Self::Mask, values: Self) -> Self {
        let bits = Self::mask_bits(condition);
        let mut lanes = values.0;
        for (lane, m) in lanes.iter_mut().zip(bits) {
            *lane = T::from_bits(m & lane.to_bits());
        }
        Self(lanes)
    }
}

macro_rules! lane_binary_op {
    ($(
        $op:ident::$method:ident, $assign:ident::$assign_method:ident => $bound:ident::$lane:ident;
    )+) => {
        $(
            impl<T: $bound, const N: usize> $op for ScalarVec<T, N> {
                type Output = Self;

                #[inline(always)]
                fn $method(self, rhs: Self) -> Self {
                    self.zip_map(rhs, T::$lane)
                }
            }

            impl<T: $bound, const N: usize> $assign for ScalarVec<T, N> {
                #[inline(always)]
                fn $assign_method(&mut self, rhs: Self) {
                    *self = self.zip_map(rhs, T::$lane);
                }
            }
        )+
    };
}

lane_binary_op! {
    Add::add, AddAssign::add_assign => Number::lane_add;
    Sub::sub, SubAssign::sub_assign => Number::lane_sub;
    Mul::mul, MulAssign::mul_assign => Number::lane_mul;
    Div::div, DivAssign::div_assign => Number::lane_div;
    Rem::rem, RemAssign::rem_assign => Number::lane_rem;
}

macro_rules! lane_bit_op {
    ($($op:ident::$method:ident, $assign:ident::$assign_method:ident;)+) => {
        $(
            impl<T: Element + $op<Output = T>, const N: usize> $op for ScalarVec<T, N> {
                type Output = Self;

                #[inline(always)]
                fn $method(self, rhs: Self) -> Self {
                    self.zip_map(rhs, T::$method)
                }
            }

            impl<T: Element + $op<Output = T>, const N: usize> $assign for ScalarVec<T, N> {
                #[inline(always)]
                fn $assign_method(&mut self, rhs: Self) {
                    *self = self.zip_map(rhs, T::$method);
                }
            }
        )+
    };
}

lane_bit_op! {
    BitAnd::bitand, BitAndAssign::bitand_assign;
    BitOr::bitor, BitOrAssign::bitor_assign;
    BitXor::bitxor, BitXorAssign::bitxor_assign;
}

impl<T: Element + Not<Output = T>, const N: usize> Not for ScalarVec<T, N> {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self {
        self.map(T::not)
    }
}

impl<T: Signed, const N: usize> Neg for ScalarVec<T, N> {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self {
        self.map(T::lane_neg)
    }
}

impl<T: Integer, const N: usize> Shl<u32> for ScalarVec<T, N> {
    type Output = Self;

    #[inline(always)]
    fn shl(self, count: u32) -> Self {
        self.map(|lane| lane.lane_shl(count))
    }
}

impl<T: Integer, const N: usize> Shr<u32> for ScalarVec<T, N> {
    type Output = Self;

    #[inline(always)]
    fn shr(self, count: u32) -> Self {
        self.map(|lane| lane.lane_shr(count))
    }
}

impl<T: Integer, const N: usize> ShlAssign<u32> for ScalarVec<T, N> {
    #[inline(always)]
    fn shl_assign(&mut self, count: u32) {
        *self = *self << count;
    }
}

impl<T: Integer, const N: usize> ShrAssign<u32> for ScalarVec<T, N> {
    #[inline(always)]
    fn shr_assign(&mut self, count: u32) {
        *self = *self >> count;
    }
}

impl<T, const N: usize> SimdBits for ScalarVec<T, N> where
    T: LaneWidth<N>
        + BitAnd<Output = T>
        + BitOr<Output = T>
        + BitXor<Output = T>
        + Not<Output = T>
{
}

impl<T, const N: usize> SimdMask for ScalarVec<T, N>
where
    T: SizedBool + LaneWidth<N, MaskVector = Self>,
{
    #[inline(always)]
    fn splat_bool(value: bool) -> Self {
        Self([T::from_bool(value); N])
    }

    #[inline(always)]
    fn all(self) -> bool {
        self.0.iter().all(|lane| lane.to_bool())
    }

    #[inline(always)]
    fn any(self) -> bool {
        self.0.iter().any(|lane| lane.to_bool())
    }

    #[inline(always)]
    fn bitmask(self) -> u64 {
        self.0
            .iter()
            .enumerate()
            .fold(0, |acc, (i, lane)| acc | (u64::from(lane.to_bool()) << i))
    }
}

impl<T: Number + LaneWidth<N>, const N: usize> SimdArith for ScalarVec<T, N> {
    #[inline(always)]
    fn less(self, rhs: Self) -> Self::Mask {
        self.compare(rhs, |a, b| a < b)
    }

    #[inline(always)]
    fn less_equal(self, rhs: Self) -> Self::Mask {
        self.compare(rhs, |a, b| a <= b)
    }

    #[inline(always)]
    fn greater(self, rhs: Self) -> Self::Mask {
        self.compare(rhs, |a, b| a > b)
    }

    #[inline(always)]
    fn greater_equal(self, rhs: Self) -> Self::Mask {
        self.compare(rhs, |a, b| a >= b)
    }

    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        self.zip_map(rhs, T::lane_min)
    }

    #[inline(always)]
    fn max(self, rhs: Self) -> Self {
        self.zip_map(rhs, T::lane_max)
    }
}

impl<T: Integer + LaneWidth<N>, const N: usize> SimdInt for ScalarVec<T, N> {}

impl<T: Float + LaneWidth<N>, const N: usize> SimdFloat for ScalarVec<T, N> {
    #[inline(always)]
    fn abs(self) -> Self {
        self.map(T::lane_abs)
    }

    #[inline(always)]
    fn sqrt(self) -> Self {
        self.map(T::kernel_sqrt)
    }

    #[inline(always)]
    fn rsqrt(self) -> Self {
        self.map(T::kernel_rsqrt)
    }

    #[inline(always)]
    fn recip(self) -> Self {
        self.map(T::kernel_recip)
    }

    #[inline(always)]
    fn sincos(self) -> (Self, Self) {
        let mut sin = self.0;
        let mut cos = self.0;
        for ((s, c), x) in sin.iter_mut().zip(cos.iter_mut()).zip(self.0) {
            (*s, *c) = x.kernel_sincos();
        }
        (Self(sin), Self(cos))
    }

    #[inline(always)]
    fn exp(self) -> Self {
        self.map(T::kernel_exp)
    }

    #[inline(always)]
    fn log(self) -> Self {
        self.map(T::kernel_log)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::bools::{Bool16, Bool32, Bool8};

    #[test]
    fn test_integer_arithmetic_wraps() {
        let a = ScalarVec::<i32, 4>::new(i32::MAX, i32::MIN, 7, -7);
        let b = ScalarVec::<i32, 4>::splat(1);

        assert_eq!((a + b).to_array(), [i32::MIN, i32::MIN + 1, 8, -6]);
        assert_eq!((a - b).to_array(), [i32::MAX - 1, i32::MAX, 6, -8]);
        assert_eq!((a * ScalarVec::splat(2)).to_array(), [-2, 0, 14, -14]);
    }

    #[test]
    fn test_division_and_remainder_truncate() {
        let a = ScalarVec::<i32, 4>::new(7, -7, 7, -7);
        let b = ScalarVec::<i32, 4>::new(2, 2, -2, -2);

        assert_eq!((a / b).to_array(), [3, -3, -3, 3]);
        assert_eq!((a % b).to_array(), [1, -1, 1, -1]);

        let x = ScalarVec::<f32, 4>::new(5.5, -5.5, 1.0, 0.0);
        let y = ScalarVec::<f32, 4>::splat(2.0);
        assert_eq!((x % y).to_array(), [1.5, -1.5, 1.0, 0.0]);
    }

    #[test]
    #[should_panic]
    fn test_integer_division_by_zero_panics_like_scalar() {
        let a = ScalarVec::<u32, 4>::splat(1);
        let _ = a / ScalarVec::splat(0);
    }

    #[test]
    fn test_increment_and_decrement() {
        let a = ScalarVec::<u8, 16>::splat(255);
        assert_eq!(a.inc().to_array(), [0; 16]);
        assert_eq!(ScalarVec::<i16, 8>::default().dec().to_array(), [-1; 8]);
    }

    #[test]
    fn test_shifts_saturate_past_lane_width() {
        let a = ScalarVec::<i16, 8>::new(1, -1, 0x4000, -0x4000, 3, -3, 0, i16::MIN);

        assert_eq!((a << 1).to_array(), [2, -2, -0x8000, -0x8000, 6, -6, 0, 0]);
        assert_eq!((a << 16).to_array(), [0; 8]);
        assert_eq!((a >> 1).to_array(), [0, -1, 0x2000, -0x2000, 1, -2, 0, -0x4000]);
        assert_eq!((a >> 40).to_array(), [0, -1, 0, -1, 0, -1, 0, -1]);

        let u = ScalarVec::<u16, 8>::splat(0x8001);
        assert_eq!((u >> 15).to_array(), [1; 8]);
        assert_eq!((u >> 16).to_array(), [0; 8]);

        let mut v = ScalarVec::<u8, 16>::splat(1);
        v <<= 7;
        assert_eq!(v.to_array(), [0x80; 16]);
        v >>= 3;
        assert_eq!(v.to_array(), [0x10; 16]);
    }

    #[test]
    fn test_bitwise_ops_on_raw_bits() {
        let a = ScalarVec::<u16, 8>::splat(0b1100);
        let b = ScalarVec::<u16, 8>::splat(0b1010);

        assert_eq!((a & b).to_array(), [0b1000; 8]);
        assert_eq!((a | b).to_array(), [0b1110; 8]);
        assert_eq!((a ^ b).to_array(), [0b0110; 8]);
        assert_eq!((!a).to_array(), [!0b1100u16; 8]);
    }

    #[test]
    fn test_comparisons_produce_canonical_masks() {
        let a = ScalarVec::<i16, 8>::new(1, 2, 3, 4, 5, 6, 7, 8);
        let b = ScalarVec::<i16, 8>::splat(4);

        let mut lanes = [Bool16::FALSE; 8];
        a.less(b).write_to_slice(&mut lanes);
        assert_eq!(lanes.map(|m| m.to_bits()), [0xFFFF, 0xFFFF, 0xFFFF, 0, 0, 0, 0, 0]);

        assert_eq!(a.less_equal(b).bitmask(), 0b0000_1111);
        assert_eq!(a.greater(b).bitmask(), 0b1111_0000);
        assert_eq!(a.greater_equal(b).bitmask(), 0b1111_1000);
        assert_eq!(a.equal(b).bitmask(), 0b0000_1000);
        assert_eq!(a.not_equal(b).bitmask(), 0b1111_0111);
    }

    #[test]
    fn test_float_comparisons_follow_ieee() {
        let a = ScalarVec::<f32, 4>::new(f32::NAN, 1.0, -0.0, 2.0);
        let b = ScalarVec::<f32, 4>::new(f32::NAN, 1.0, 0.0, f32::NAN);

        assert_eq!(a.equal(b).bitmask(), 0b0110);
        assert_eq!(a.not_equal(b).bitmask(), 0b1001);
        assert_eq!(a.less(b).bitmask(), 0);
        assert_ne!(a, b);
        assert_eq!(ScalarVec::<f32, 4>::splat(-0.0), ScalarVec::splat(0.0));
    }

    #[test]
    fn test_select_and_mask() {
        let condition = ScalarVec::<i32, 4>::new(1, 0, 1, 0).equal(ScalarVec::splat(1));
        let a = ScalarVec::<i32, 4>::new(1, 2, 3, 4);
        let b = ScalarVec::<i32, 4>::new(10, 20, 30, 40);

        assert_eq!(ScalarVec::select(condition, a, b).to_array(), [1, 20, 3, 40]);
        assert_eq!(ScalarVec::mask(condition, a).to_array(), [1, 0, 3, 0]);

        let f = ScalarVec::<f32, 4>::new(1.5, -2.5, 3.5, -4.5);
        assert_eq!(ScalarVec::mask(condition, f).to_array(), [1.5, 0.0, 3.5, 0.0]);
    }

    #[test]
    fn test_min_max_prefer_rhs_on_nan() {
        let a = ScalarVec::<f64, 2>::new(f64::NAN, 1.0);
        let b = ScalarVec::<f64, 2>::new(3.0, f64::NAN);

        let min = a.min(b).to_array();
        assert_eq!(min[0], 3.0);
        assert!(min[1].is_nan());

        let max = a.max(b).to_array();
        assert_eq!(max[0], 3.0);
        assert!(max[1].is_nan());
    }

    #[test]
    fn test_mask_vectors() {
        let t = ScalarVec::<Bool8, 16>::splat_bool(true);
        let f = ScalarVec::<Bool8, 16>::splat_bool(false);

        assert!(t.all() && t.any() && !t.none());
        assert!(!f.all() && !f.any() && f.none());
        assert_eq!(t.bitmask(), 0xFFFF);
        assert_eq!((t ^ t).bitmask(), 0);
        assert_eq!(!!t, t);

        let mixed = t.replace(3, Bool8::FALSE);
        assert!(!mixed.all() && mixed.any());
        assert_eq!(mixed.bitmask(), 0xFFF7);
    }

    #[test]
    fn test_extract_replace_and_layout() {
        let v = ScalarVec::<u64, 2>::new(1, 2).replace(1, 9);
        assert_eq!(v.extract(0), 1);
        assert_eq!(v.extract(1), 9);

        assert_eq!(std::mem::size_of::<ScalarVec<Bool32, 4>>(), 16);
        assert_eq!(std::mem::align_of::<ScalarVec<Bool32, 4>>(), 4);
        assert_eq!(ScalarVec::<Bool32, 4>::BACKEND, Backend::Fallback);
    }

    #[test]
    #[should_panic(expected = "Slice must hold at least 4 elements")]
    fn test_from_slice_rejects_short_input() {
        let _ = ScalarVec::<f32, 4>::from_slice(&[1.0, 2.0]);
    }

    #[test]
    fn test_float_kernels_apply_per_lane() {
        let x = ScalarVec::<f64, 2>::new(-4.0, 0.25);

        assert_eq!(x.abs().to_array(), [4.0, 0.25]);
        assert_eq!(x.abs().sqrt().to_array(), [2.0, 0.5]);
        assert_eq!(x.recip().to_array(), [-0.25, 4.0]);
        assert_eq!((-x).to_array(), [4.0, -0.25]);

        let (s, c) = ScalarVec::<f64, 2>::splat(1.2).sincos();
        assert!((s.extract(0) - 1.2f64.sin()).abs() < 1e-12);
        assert!((c.extract(1) - 1.2f64.cos()).abs() < 1e-12);
    }
}
