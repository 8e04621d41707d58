//! Portable fixed-width SIMD vectors with per-target backends.
//!
//! `lanewise` gives every `(element, width)` pair a single vector type,
//! [`simd::Simd<T, N>`](simd::Simd), with the same operation set on every
//! target. The implementation behind each type is chosen when the crate is
//! built: native SSE/SSE2 or NEON registers where the target has them, two
//! native halves glued together for wider vectors, and a lane-by-lane array
//! fallback for everything else.
//!
//! ```
//! use lanewise::simd::{Bool32x4, F32x4, F32x8, SimdArith, SimdFloat, SimdMask, SimdVector};
//!
//! let x = F32x8::from_slice(&[0.0, 0.5, 1.0, 1.5, 2.0, 2.5, 3.0, 3.5]);
//! let (sin, cos) = x.sincos();
//! let one = sin * sin + cos * cos;
//!
//! for lane in 0..8 {
//!     assert!((one.extract(lane) - 1.0).abs() < 1e-5);
//! }
//!
//! let positive: Bool32x4 = F32x4::from_slice(&[1.0, -2.0, 3.0, -4.0]).greater(F32x4::splat(0.0));
//! assert_eq!(positive.bitmask(), 0b0101);
//! ```
//!
//! # Modules
//!
//! - [`simd`]: vector types, lane masks, backend selection, slice helpers.
//! - [`math`]: free functions over [`math::Real`], covering `f32`, `f64` and
//!   every floating point vector.
//! - [`error`]: errors returned by the slice helpers.
//!
//! # Build configuration
//!
//! | Cargo feature    | Effect                                              |
//! |------------------|-----------------------------------------------------|
//! | `force-fallback` | ignore the target and use the array fallback only   |
//! | `no-sse2`        | on x86, keep the SSE `f32` path but drop SSE2 types |
//!
//! Native backends follow the target's enabled features, so
//! `RUSTFLAGS="-C target-feature=-sse2"` or a cross build changes the
//! selection without any code change.

pub mod error;
pub mod math;
pub mod simd;

pub use error::{LanewiseError, Result};
