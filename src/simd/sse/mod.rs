//! x86 SSE/SSE2 specializations.
//!
//! | Type       | Register  | Gate   |
//! |------------|-----------|--------|
//! | `F32x4`    | `__m128`  | SSE    |
//! | `Bool32x4` | `__m128`  | SSE    |
//! | `F64x2`    | `__m128d` | SSE2   |
//! | `Bool64x2` | `__m128i` | SSE2   |
//! | `I32x4`    | `__m128i` | SSE2   |
//! | `U32x4`    | `__m128i` | SSE2   |
//!
//! The f32 kernels need SSE2 integer lanes for their quadrant and exponent
//! arithmetic. Without SSE2, `F32x4` runs the scalar reference kernels on
//! each lane.
//!
//! Every intrinsic used here is covered by the `simd_sse` / `simd_sse2` cfg,
//! which `build.rs` only sets when the target enables the extension, so the
//! `unsafe` blocks below only discharge the intrinsics' target-feature
//! requirement.

pub mod f32x4;
pub mod math;

#[cfg(simd_sse2)]
pub mod f64x2;

#[cfg(simd_sse2)]
pub mod int;

pub use f32x4::{Bool32x4, F32x4};

#[cfg(simd_sse2)]
pub use f64x2::{Bool64x2, F64x2};

#[cfg(simd_sse2)]
pub use int::{I32x4, U32x4};

/// Byte alignment of every SSE register type.
pub const SSE_ALIGNMENT: usize = 16;
