//! Lane mask behavior: canonical bit patterns, reductions, `select` and `mask`.

use lanewise::simd::{
    Bool32, Bool32x4, Bool32x8, Bool64, Bool64x2, Bool8x16, F32x4, F32x8, F64x2, I32x4, I64x4,
    SimdArith, SimdMask, SimdVector, U16x8,
};

fn mask_bits<M: SimdVector<Scalar = Bool32>>(mask: M) -> Vec<u32> {
    (0..M::LANES).map(|lane| mask.extract(lane).to_bits()).collect()
}

#[test]
fn test_xor_with_itself_clears_every_lane() {
    let pattern = [Bool32::TRUE, Bool32::FALSE, Bool32::TRUE, Bool32::FALSE];
    let mask = Bool32x4::from_slice(&pattern);
    let cleared = mask ^ mask;

    assert_eq!(mask_bits(cleared), vec![0, 0, 0, 0]);
    assert!(cleared.none());
    assert_eq!(mask.bitmask(), 0b0101);
}

#[test]
fn test_comparisons_produce_canonical_patterns() {
    let a = F32x4::from_slice(&[1.0, 2.0, 3.0, 4.0]);
    let b = F32x4::from_slice(&[4.0, 2.0, 1.0, 4.0]);

    assert_eq!(mask_bits(a.less(b)), vec![u32::MAX, 0, 0, 0]);
    assert_eq!(mask_bits(a.less_equal(b)), vec![u32::MAX, u32::MAX, 0, u32::MAX]);
    assert_eq!(mask_bits(a.greater(b)), vec![0, 0, u32::MAX, 0]);
    assert_eq!(mask_bits(a.greater_equal(b)), vec![0, u32::MAX, u32::MAX, u32::MAX]);
    assert_eq!(mask_bits(a.equal(b)), vec![0, u32::MAX, 0, u32::MAX]);
    assert_eq!(mask_bits(a.not_equal(b)), vec![u32::MAX, 0, u32::MAX, 0]);

    for lane in 0..4 {
        assert!(a.less(b).extract(lane).is_canonical());
    }
}

#[test]
fn test_nan_comparisons() {
    let nan = F64x2::from_slice(&[f64::NAN, 1.0]);
    let one = F64x2::splat(1.0);

    assert_eq!(nan.equal(nan).bitmask(), 0b10);
    assert_eq!(nan.not_equal(nan).bitmask(), 0b01);
    assert_eq!(nan.less(one).bitmask(), 0);
    assert_eq!(nan.greater_equal(one).bitmask(), 0b10);
    assert_eq!(nan.less_equal(one).bitmask(), 0b10);
}

#[test]
fn test_reductions() {
    let all = Bool32x8::splat_bool(true);
    let none = Bool32x8::splat_bool(false);
    let one = none.replace(5, Bool32::TRUE);

    assert!(all.all() && all.any() && !all.none());
    assert!(!none.all() && !none.any() && none.none());
    assert!(!one.all() && one.any());
    assert_eq!(one.bitmask(), 1 << 5);
    assert_eq!(all.bitmask(), 0xFF);

    let wide = Bool8x16::splat_bool(true);
    assert_eq!(wide.bitmask(), 0xFFFF);
}

#[test]
fn test_select_and_mask() {
    let a = F32x8::from_slice(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
    let b = F32x8::splat(-1.0);
    let condition = a.greater(F32x8::splat(4.5));

    let picked = F32x8::select(condition, a, b);
    let masked = F32x8::mask(condition, a);

    for lane in 0..8 {
        let expected = if lane >= 4 { a.extract(lane) } else { -1.0 };
        assert_eq!(picked.extract(lane), expected);
        let expected = if lane >= 4 { a.extract(lane) } else { 0.0 };
        assert_eq!(masked.extract(lane).to_bits(), expected.to_bits());
    }
}

#[test]
fn test_integer_masks_drive_float_selects() {
    let index = I32x4::from_slice(&[0, 1, 2, 3]);
    let odd = (index & I32x4::splat(1)).equal(I32x4::splat(1));

    let values = F32x4::from_slice(&[10.0, 11.0, 12.0, 13.0]);
    let negated = F32x4::splat(0.0) - values;
    let result = F32x4::select(odd, negated, values);

    assert_eq!(odd.bitmask(), 0b1010);
    assert_eq!(
        [0, 1, 2, 3].map(|lane| result.extract(lane)),
        [10.0, -11.0, 12.0, -13.0]
    );
}

#[test]
fn test_bitwise_identities() {
    let a = Bool64x2::from_slice(&[Bool64::TRUE, Bool64::FALSE]);
    let b = Bool64x2::from_slice(&[Bool64::TRUE, Bool64::TRUE]);

    assert_eq!((a & b).bitmask(), 0b01);
    assert_eq!((a | b).bitmask(), 0b11);
    assert_eq!((a ^ b).bitmask(), 0b10);
    assert_eq!((!a).bitmask(), 0b10);
    assert_eq!(!!a, a);
    assert_eq!((!a).extract(1).to_bits(), u64::MAX);

    let mut c = a;
    c |= b;
    c &= a;
    c ^= b;
    assert_eq!(c.bitmask(), 0b10);
}

#[test]
fn test_other_widths_share_the_contract() {
    let a = I64x4::from_slice(&[i64::MIN, -1, 0, i64::MAX]);
    let b = I64x4::splat(0);
    assert_eq!(a.less(b).bitmask(), 0b0011);
    assert_eq!(a.greater_equal(b).bitmask(), 0b1100);

    let c = U16x8::from_slice(&[0, 1, 2, 3, 4, 5, u16::MAX, 7]);
    let d = U16x8::splat(4);
    assert_eq!(c.less(d).bitmask(), 0b0000_1111);
    assert_eq!(c.greater(d).bitmask(), 0b1110_0000);
    assert!(c.less(d).extract(0).is_canonical());
}
