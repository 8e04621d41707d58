//! Widths reached by composition.
//!
//! `Halves<H>` is a `2 * H::LANES` wide vector stored as two `H` values side
//! by side. Every operation is the `H` operation applied to the low half and
//! then to the high half, so a composed vector computes exactly what its
//! building block computes, lane for lane. Nesting (`Halves<Halves<H>>`)
//! gives the four-times widths.

use std::ops::{
    Add, AddAssign, BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Div,
    DivAssign, Mul, MulAssign, Neg, Not, Rem, RemAssign, Shl, ShlAssign, Shr, ShrAssign, Sub,
    SubAssign,
};

use crate::simd::backend::Backend;
use crate::simd::traits::{SimdArith, SimdBits, SimdFloat, SimdInt, SimdMask, SimdVector};

/// Two half-width vectors; lanes `0..H::LANES` live in the low half.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[repr(C)]
pub struct Halves<H>([H; 2]);

impl<H: SimdVector> Halves<H> {
    #[inline(always)]
    pub const fn from_halves(lo: H, hi: H) -> Self {
        Self([lo, hi])
    }

    #[inline(always)]
    pub fn into_halves(self) -> (H, H) {
        let [lo, hi] = self.0;
        (lo, hi)
    }

    #[inline(always)]
    pub const fn lo(&self) -> &H {
        &self.0[0]
    }

    #[inline(always)]
    pub const fn hi(&self) -> &H {
        &self.0[1]
    }

    #[inline(always)]
    fn map(self, f: impl Fn(H) -> H) -> Self {
        let [lo, hi] = self.0;
        Self([f(lo), f(hi)])
    }

    #[inline(always)]
    fn zip_map<R>(self, rhs: Self, f: impl Fn(H, H) -> R) -> Halves<R> {
        let [a, b] = self.0;
        let [c, d] = rhs.0;
        Halves([f(a, c), f(b, d)])
    }
}

impl<H: SimdVector> SimdVector for Halves<H> {
    type Scalar = H::Scalar;
    type Mask = Halves<H::Mask>;

    const LANES: usize = 2 * H::LANES;
    const BACKEND: Backend = Backend::Composed;
    const LEAF_BACKEND: Backend = H::LEAF_BACKEND;

    #[inline(always)]
    fn splat(value: H::Scalar) -> Self {
        let half = H::splat(value);
        Self([half, half])
    }

    #[inline(always)]
    unsafe fn load(ptr: *const H::Scalar) -> Self {
        Self([H::load(ptr), H::load(ptr.add(H::LANES))])
    }

    #[inline(always)]
    unsafe fn loadu(ptr: *const H::Scalar) -> Self {
        Self([H::loadu(ptr), H::loadu(ptr.add(H::LANES))])
    }

    #[inline(always)]
    unsafe fn store(self, ptr: *mut H::Scalar) {
        let [lo, hi] = self.0;
        lo.store(ptr);
        hi.store(ptr.add(H::LANES));
    }

    #[inline(always)]
    unsafe fn storeu(self, ptr: *mut H::Scalar) {
        let [lo, hi] = self.0;
        lo.storeu(ptr);
        hi.storeu(ptr.add(H::LANES));
    }

    #[inline(always)]
    fn extract(self, lane: usize) -> H::Scalar {
        if lane < H::LANES {
            self.0[0].extract(lane)
        } else {
            self.0[1].extract(lane - H::LANES)
        }
    }

    #[inline(always)]
    fn replace(mut self, lane: usize, value: H::Scalar) -> Self {
        if lane < H::LANES {
            self.0[0] = self.0[0].replace(lane, value);
        } else {
            self.0[1] = self.0[1].replace(lane - H::LANES, value);
        }
        self
    }

    #[inline(always)]
    fn equal(self, rhs: Self) -> Self::Mask {
        self.zip_map(rhs, H::equal)
    }

    #[inline(always)]
    fn not_equal(self, rhs: Self) -> Self::Mask {
        self.zip_map(rhs, H::not_equal)
    }

    #[inline(always)]
    fn select(condition: Self::Mask, if_true: Self, if_false: Self) -> Self {
        let [c0, c1] = condition.0;
        let [t0, t1] = if_true.0;
        let [f0, f1] = if_false.0;
        Self([H::select(c0, t0, f0), H::select(c1, t1, f1)])
    }

    #[inline(always)]
    fn mask(condition: Self::Mask, values: Self) -> Self {
        let [c0, c1] = condition.0;
        let [v0, v1] = values.0;
        Self([H::mask(c0, v0), H::mask(c1, v1)])
    }
}

macro_rules! halves_binary_op {
    ($($op:ident::$method:ident, $assign:ident::$assign_method:ident;)+) => {
        $(
            impl<H: SimdVector + $op<Output = H>> $op for Halves<H> {
                type Output = Self;

                #[inline(always)]
                fn $method(self, rhs: Self) -> Self {
                    self.zip_map(rhs, H::$method)
                }
            }

            impl<H: SimdVector + $op<Output = H>> $assign for Halves<H> {
                #[inline(always)]
                fn $assign_method(&mut self, rhs: Self) {
                    *self = self.zip_map(rhs, H::$method);
                }
            }
        )+
    };
}

halves_binary_op! {
    Add::add, AddAssign::add_assign;
    Sub::sub, SubAssign::sub_assign;
    Mul::mul, MulAssign::mul_assign;
    Div::div, DivAssign::div_assign;
    Rem::rem, RemAssign::rem_assign;
    BitAnd::bitand, BitAndAssign::bitand_assign;
    BitOr::bitor, BitOrAssign::bitor_assign;
    BitXor::bitxor, BitXorAssign::bitxor_assign;
}

impl<H: SimdVector + Not<Output = H>> Not for Halves<H> {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self {
        self.map(H::not)
    }
}

impl<H: SimdVector + Neg<Output = H>> Neg for Halves<H> {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self {
        self.map(H::neg)
    }
}

impl<H: SimdVector + Shl<u32, Output = H>> Shl<u32> for Halves<H> {
    type Output = Self;

    #[inline(always)]
    fn shl(self, count: u32) -> Self {
        self.map(|half| half << count)
    }
}

impl<H: SimdVector + Shr<u32, Output = H>> Shr<u32> for Halves<H> {
    type Output = Self;

    #[inline(always)]
    fn shr(self, count: u32) -> Self {
        self.map(|half| half >> count)
    }
}

impl<H: SimdVector + Shl<u32, Output = H>> ShlAssign<u32> for Halves<H> {
    #[inline(always)]
    fn shl_assign(&mut self, count: u32) {
        *self = *self << count;
    }
}

impl<H: SimdVector + Shr<u32, Output = H>> ShrAssign<u32> for Halves<H> {
    #[inline(always)]
    fn shr_assign(&mut self, count: u32) {
        *self = *self >> count;
    }
}

impl<H: SimdBits> SimdBits for Halves<H> {}

impl<H: SimdMask> SimdMask for Halves<H> {
    #[inline(always)]
    fn splat_bool(value: bool) -> Self {
        let half = H::splat_bool(value);
        Self([half, half])
    }

    #[inline(always)]
    fn all(self) -> bool {
        self.0[0].all() && self.0[1].all()
    }

    #[inline(always)]
    fn any(self) -> bool {
        self.0[0].any() || self.0[1].any()
    }

    #[inline(always)]
    fn bitmask(self) -> u64 {
        self.0[0].bitmask() | (self.0[1].bitmask() << H::LANES)
    }
}

impl<H: SimdArith> SimdArith for Halves<H> {
    #[inline(always)]
    fn less(self, rhs: Self) -> Self::Mask {
        self.zip_map(rhs, H::less)
    }

    #[inline(always)]
    fn less_equal(self, rhs: Self) -> Self::Mask {
        self.zip_map(rhs, H::less_equal)
    }

    #[inline(always)]
    fn greater(self, rhs: Self) -> Self::Mask {
        self.zip_map(rhs, H::greater)
    }

    #[inline(always)]
    fn greater_equal(self, rhs: Self) -> Self::Mask {
        self.zip_map(rhs, H::greater_equal)
    }

    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        self.zip_map(rhs, H::min)
    }

    #[inline(always)]
    fn max(self, rhs: Self) -> Self {
        self.zip_map(rhs, H::max)
    }
}

impl<H: SimdInt> SimdInt for Halves<H> {}

impl<H: SimdFloat> SimdFloat for Halves<H> {
    #[inline(always)]
    fn abs(self) -> Self {
        self.map(H::abs)
    }

    #[inline(always)]
    fn sqrt(self) -> Self {
        self.map(H::sqrt)
    }

    #[inline(always)]
    fn rsqrt(self) -> Self {
        self.map(H::rsqrt)
    }

    #[inline(always)]
    fn recip(self) -> Self {
        self.map(H::recip)
    }

    #[inline(always)]
    fn sincos(self) -> (Self, Self) {
        let [lo, hi] = self.0;
        let (s0, c0) = lo.sincos();
        let (s1, c1) = hi.sincos();
        (Self([s0, s1]), Self([c0, c1]))
    }

    #[inline(always)]
    fn exp(self) -> Self {
        self.map(H::exp)
    }

    #[inline(always)]
    fn log(self) -> Self {
        self.map(H::log)
    }

    #[inline(always)]
    fn pow(self, exponent: Self) -> Self {
        self.zip_map(exponent, H::pow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::backend::Simd;

    type Half = Simd<f32, 4>;

    fn half(values: [f32; 4]) -> Half {
        Half::from_slice(&values)
    }

    #[test]
    fn test_halves_round_trip() {
        let lo = half([1.0, 2.0, 3.0, 4.0]);
        let hi = half([5.0, 6.0, 7.0, 8.0]);
        let wide = Halves::from_halves(lo, hi);

        assert_eq!(*wide.lo(), lo);
        assert_eq!(*wide.hi(), hi);
        assert_eq!(wide.into_halves(), (lo, hi));
        assert_eq!(wide.extract(5), 6.0);
        assert_eq!(wide.replace(7, -1.0).extract(7), -1.0);
    }

    #[test]
    fn test_memory_order_is_lo_then_hi() {
        let values: Vec<f32> = (0..8).map(|i| i as f32).collect();
        let wide = Halves::<Half>::from_slice(&values);

        assert_eq!(wide.lo().extract(0), 0.0);
        assert_eq!(wide.hi().extract(0), 4.0);

        let mut out = [0.0f32; 8];
        wide.write_to_slice(&mut out);
        assert_eq!(out.to_vec(), values);
    }

    #[test]
    fn test_operations_apply_per_half() {
        let a = Halves::from_halves(half([1.0, 2.0, 3.0, 4.0]), half([5.0, 6.0, 7.0, 8.0]));
        let b = Halves::<Half>::splat(2.0);

        let (lo, hi) = (a * b - b).into_halves();
        assert_eq!(lo, half([1.0, 2.0, 3.0, 4.0]) * Half::splat(2.0) - Half::splat(2.0));
        assert_eq!(hi, half([5.0, 6.0, 7.0, 8.0]) * Half::splat(2.0) - Half::splat(2.0));
    }

    #[test]
    fn test_mask_bits_concatenate() {
        let a = Halves::from_halves(half([1.0, 5.0, 1.0, 5.0]), half([5.0, 5.0, 1.0, 1.0]));
        let m = a.less(Halves::splat(2.0));

        assert_eq!(m.bitmask(), 0b1100_0101);
        assert!(m.any() && !m.all());
        assert_eq!(Halves::<Half>::select(m, a, Halves::splat(0.0)).extract(6), 1.0);
    }

    #[test]
    fn test_backend_is_composed() {
        assert_eq!(Halves::<Half>::BACKEND, Backend::Composed);
        assert_eq!(Halves::<Half>::LEAF_BACKEND, Half::BACKEND);
        assert_eq!(Halves::<Halves<Half>>::LANES, 16);
    }
}
