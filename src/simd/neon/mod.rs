//! ARM NEON specializations for 128-bit vector operations.
//!
//! | Type       | Register      |
//! |------------|---------------|
//! | `F32x4`    | `float32x4_t` |
//! | `Bool32x4` | `uint32x4_t`  |
//! | `F64x2`    | `float64x2_t` |
//! | `Bool64x2` | `uint64x2_t`  |
//! | `I32x4`    | `int32x4_t`   |
//! | `U32x4`    | `uint32x4_t`  |
//!
//! This module is only compiled when `build.rs` sets `simd_neon`, which it
//! does for AArch64 targets with the `neon` feature enabled. Loads and stores
//! have no alignment requirement on this architecture, so the aligned forms
//! only assert the contract in debug builds.

#[allow(clippy::excessive_precision)]
pub mod math;

pub mod f32x4;

pub mod f64x2;

pub mod int;

pub use f32x4::{Bool32x4, F32x4};
pub use f64x2::{Bool64x2, F64x2};
pub use int::{I32x4, U32x4};

/// Byte alignment of every NEON register type.
pub const NEON_ALIGNMENT: usize = 16;
