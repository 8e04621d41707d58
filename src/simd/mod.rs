//! Portable fixed-width SIMD vectors.
//!
//! Name vectors through the aliases ([`F32x8`], [`I32x4`], [`Bool64x2`], ...)
//! or through [`Simd<T, N>`](Simd), and use them through the traits in
//! [`traits`]. Which implementation backs an alias is decided when the crate
//! is built:
//!
//! - `sse` / `neon`: native 128-bit register types for the element families
//!   the target can hold in one register,
//! - `halves`: wider vectors composed from two (or four) native halves,
//! - `fallback`: `[T; N]` arrays computed lane by lane, for everything else
//!   and for every type when no native backend is enabled.
//!
//! All three give the same results for the same inputs; see [`backend`] for
//! the selection table and the `lanewise-report` binary for the resolved map
//! of the current build.

pub mod aliases;
pub mod backend;
pub mod bools;
pub mod cast;
pub mod consts;
pub mod fallback;
pub mod halves;
pub mod slice;
pub mod traits;

#[cfg(simd_sse)]
pub mod sse;

#[cfg(simd_neon)]
pub mod neon;

pub use aliases::*;
pub use backend::{Backend, BackendReport, LaneWidth, Simd, HAS_NEON, HAS_SSE, HAS_SSE2};
pub use bools::{Bool16, Bool32, Bool64, Bool8};
pub use slice::SimdMath;
pub use traits::{
    Element, Float, Integer, Number, Signed, SimdArith, SimdBits, SimdFloat, SimdInt, SimdMask,
    SimdVector, SizedBool,
};
