//! Public names for every supported `(element, width)` pair.
//!
//! Consumers should name vectors through these aliases (or [`Simd`]) and the
//! trait contract, never through a backend module, so the same source builds
//! on every target.

use crate::simd::backend::Simd;
use crate::simd::bools::{Bool16, Bool32, Bool64, Bool8};

pub type F32x4 = Simd<f32, 4>;
pub type F32x8 = Simd<f32, 8>;
pub type F32x16 = Simd<f32, 16>;

pub type F64x2 = Simd<f64, 2>;
pub type F64x4 = Simd<f64, 4>;
pub type F64x8 = Simd<f64, 8>;

pub type I32x4 = Simd<i32, 4>;
pub type I32x8 = Simd<i32, 8>;
pub type I32x16 = Simd<i32, 16>;

pub type U32x4 = Simd<u32, 4>;
pub type U32x8 = Simd<u32, 8>;
pub type U32x16 = Simd<u32, 16>;

pub type I64x2 = Simd<i64, 2>;
pub type I64x4 = Simd<i64, 4>;
pub type I64x8 = Simd<i64, 8>;

pub type U64x2 = Simd<u64, 2>;
pub type U64x4 = Simd<u64, 4>;
pub type U64x8 = Simd<u64, 8>;

pub type I16x8 = Simd<i16, 8>;
pub type I16x16 = Simd<i16, 16>;
pub type I16x32 = Simd<i16, 32>;

pub type U16x8 = Simd<u16, 8>;
pub type U16x16 = Simd<u16, 16>;
pub type U16x32 = Simd<u16, 32>;

pub type I8x16 = Simd<i8, 16>;
pub type I8x32 = Simd<i8, 32>;
pub type I8x64 = Simd<i8, 64>;

pub type U8x16 = Simd<u8, 16>;
pub type U8x32 = Simd<u8, 32>;
pub type U8x64 = Simd<u8, 64>;

pub type Bool8x16 = Simd<Bool8, 16>;
pub type Bool8x32 = Simd<Bool8, 32>;
pub type Bool8x64 = Simd<Bool8, 64>;

pub type Bool16x8 = Simd<Bool16, 8>;
pub type Bool16x16 = Simd<Bool16, 16>;
pub type Bool16x32 = Simd<Bool16, 32>;

pub type Bool32x4 = Simd<Bool32, 4>;
pub type Bool32x8 = Simd<Bool32, 8>;
pub type Bool32x16 = Simd<Bool32, 16>;

pub type Bool64x2 = Simd<Bool64, 2>;
pub type Bool64x4 = Simd<Bool64, 4>;
pub type Bool64x8 = Simd<Bool64, 8>;
