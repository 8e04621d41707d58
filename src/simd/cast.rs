//! Explicit per-lane conversion between element types.
//!
//! Nothing in this crate converts lanes implicitly. [`cast`] applies Rust's
//! `as` conversion (through [`AsPrimitive`]) to every lane: floats truncate
//! toward zero and saturate when converted to integers, integers wrap when
//! narrowed, and lane masks keep their truth value across widths.

use num::traits::AsPrimitive;

use crate::simd::backend::{LaneWidth, Simd};
use crate::simd::traits::SimdVector;

/// Copies every lane into an array.
#[inline(always)]
pub fn to_array<T: LaneWidth<N>, const N: usize>(vector: Simd<T, N>) -> [T; N] {
    let mut lanes = [T::default(); N];
    vector.write_to_slice(&mut lanes);
    lanes
}

/// Builds a vector from an array of lanes.
#[inline(always)]
pub fn from_array<T: LaneWidth<N>, const N: usize>(lanes: [T; N]) -> Simd<T, N> {
    <Simd<T, N> as SimdVector>::from_slice(&lanes)
}

/// `N` lanes of `T` converted to `N` lanes of `U` with `as` semantics.
///
/// ```
/// use lanewise::simd::cast::{cast, to_array};
/// use lanewise::simd::F32x4;
/// use lanewise::simd::traits::SimdVector;
///
/// let x = F32x4::from_slice(&[1.9, -1.9, 3.0e10, f32::NAN]);
/// let n = cast::<f32, i32, 4>(x);
/// assert_eq!(to_array::<i32, 4>(n), [1, -1, i32::MAX, 0]);
/// ```
#[inline(always)]
pub fn cast<T, U, const N: usize>(vector: Simd<T, N>) -> Simd<U, N>
where
    T: LaneWidth<N> + AsPrimitive<U>,
    U: LaneWidth<N>,
{
    from_array::<U, N>(to_array::<T, N>(vector).map(|lane| lane.as_()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::bools::{Bool32, Bool64, Bool8};
    use crate::simd::traits::SimdMask;

    #[test]
    fn test_float_to_int_truncates_and_saturates() {
        let x = from_array::<f32, 8>([0.5, -0.5, 2.99, -2.99, 1.0e12, -1.0e12, f32::NAN, 7.0]);
        let n = to_array::<i32, 8>(cast::<f32, i32, 8>(x));

        assert_eq!(n, [0, 0, 2, -2, i32::MAX, i32::MIN, 0, 7]);
    }

    #[test]
    fn test_integer_narrowing_wraps() {
        let x = from_array::<i32, 16>(std::array::from_fn(|i| 250 + i as i32));
        let n = to_array::<u8, 16>(cast::<i32, u8, 16>(x));

        assert_eq!(n[0], 250);
        assert_eq!(n[5], 255);
        assert_eq!(n[6], 0);
        assert_eq!(n[15], 9);
    }

    #[test]
    fn test_widening_to_f64() {
        let x = from_array::<i64, 2>([i64::MAX, -3]);
        let f = to_array::<f64, 2>(cast::<i64, f64, 2>(x));

        assert_eq!(f, [i64::MAX as f64, -3.0]);
    }

    #[test]
    fn test_mask_resizing_keeps_truth() {
        let m = from_array::<Bool32, 4>([Bool32::TRUE, Bool32::FALSE, Bool32::FALSE, Bool32::TRUE]);
        let wide = cast::<Bool32, Bool64, 4>(m);
        let narrow = cast::<Bool32, Bool8, 16>(from_array::<Bool32, 16>([Bool32::TRUE; 16]));

        assert_eq!(wide.bitmask(), 0b1001);
        assert_eq!(to_array::<Bool64, 4>(wide)[0].to_bits(), u64::MAX);
        assert!(narrow.all());
    }
}
