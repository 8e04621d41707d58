//! Compile-time backend selection.
//!
//! `build.rs` turns the target's enabled instruction-set extensions into the
//! `simd_sse`, `simd_sse2`, `simd_neon` or `simd_fallback` cfg flags. This
//! module maps every supported `(element, width)` pair to exactly one vector
//! type through [`LaneWidth`]:
//!
//! | Element               | Native width | Composed widths | Native when        |
//! |-----------------------|--------------|-----------------|--------------------|
//! | `f32`, `Bool32`       | 4            | 8, 16           | SSE or NEON        |
//! | `f64`, `Bool64`       | 2            | 4, 8            | SSE2 or NEON       |
//! | `i32`, `u32`          | 4            | 8, 16           | SSE2 or NEON       |
//! | `i64`, `u64`          | 2            | 4, 8            | never (fallback)   |
//! | `i16`, `u16`, `Bool16`| 8            | 16, 32          | never (fallback)   |
//! | `i8`, `u8`, `Bool8`   | 16           | 32, 64          | never (fallback)   |
//!
//! A pair without an impl (for example `Simd<f32, 6>`) does not compile.
//! The choice is made once per build; nothing here branches at run time.

use std::fmt;

use log::{debug, info};

use crate::simd::aliases::*;
use crate::simd::bools::{Bool16, Bool32, Bool64, Bool8};
use crate::simd::fallback::ScalarVec;
use crate::simd::halves::Halves;
use crate::simd::traits::{Element, SimdMask, SimdVector};

/// Implementation strategy behind one vector type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Backend {
    /// x86 SSE, 128-bit single precision.
    Sse,
    /// x86 SSE2, 128-bit double precision and 32-bit integer lanes.
    Sse2,
    /// AArch64 Advanced SIMD.
    Neon,
    /// `[T; N]` with one scalar operation per lane.
    Fallback,
    /// Two half-width vectors side by side.
    Composed,
}

impl Backend {
    pub const fn name(self) -> &'static str {
        match self {
            Backend::Sse => "sse",
            Backend::Sse2 => "sse2",
            Backend::Neon => "neon",
            Backend::Fallback => "fallback",
            Backend::Composed => "composed",
        }
    }

    /// Whether the backend executes vector instructions.
    pub const fn is_native(self) -> bool {
        matches!(self, Backend::Sse | Backend::Sse2 | Backend::Neon)
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The SSE specializations are compiled in.
pub const HAS_SSE: bool = cfg!(simd_sse);

/// The SSE2 specializations are compiled in.
pub const HAS_SSE2: bool = cfg!(simd_sse2);

/// The NEON specializations are compiled in.
pub const HAS_NEON: bool = cfg!(simd_neon);

/// Comma-separated cfg flags `build.rs` applied to this build.
pub const BUILD_FLAGS: &str = env!("LANEWISE_BACKENDS");

/// Binds `(Self, N)` to its one vector implementation.
///
/// `Vector::Mask` is always `MaskVector`, so comparison results of every
/// element type with the same lane width share one mask type.
pub trait LaneWidth<const N: usize>: Element {
    type Vector: SimdVector<Scalar = Self, Mask = Self::MaskVector>;

    type MaskVector: SimdMask<Scalar = Self::Mask>;
}

/// `N` lanes of `T` on the backend selected for this build.
pub type Simd<T, const N: usize> = <T as LaneWidth<N>>::Vector;

/// The atomic (non-composed) vector type of each element family.
mod select {
    #[allow(unused_imports)]
    use crate::simd::bools::{Bool32, Bool64};
    #[allow(unused_imports)]
    use crate::simd::fallback::ScalarVec;

    #[cfg(simd_neon)]
    pub type F32x4 = crate::simd::neon::F32x4;
    #[cfg(simd_sse)]
    pub type F32x4 = crate::simd::sse::F32x4;
    #[cfg(not(any(simd_neon, simd_sse)))]
    pub type F32x4 = ScalarVec<f32, 4>;

    #[cfg(simd_neon)]
    pub type Bool32x4 = crate::simd::neon::Bool32x4;
    #[cfg(simd_sse)]
    pub type Bool32x4 = crate::simd::sse::Bool32x4;
    #[cfg(not(any(simd_neon, simd_sse)))]
    pub type Bool32x4 = ScalarVec<Bool32, 4>;

    #[cfg(simd_neon)]
    pub type F64x2 = crate::simd::neon::F64x2;
    #[cfg(simd_sse2)]
    pub type F64x2 = crate::simd::sse::F64x2;
    #[cfg(not(any(simd_neon, simd_sse2)))]
    pub type F64x2 = ScalarVec<f64, 2>;

    #[cfg(simd_neon)]
    pub type Bool64x2 = crate::simd::neon::Bool64x2;
    #[cfg(simd_sse2)]
    pub type Bool64x2 = crate::simd::sse::Bool64x2;
    #[cfg(not(any(simd_neon, simd_sse2)))]
    pub type Bool64x2 = ScalarVec<Bool64, 2>;

    #[cfg(simd_neon)]
    pub type I32x4 = crate::simd::neon::I32x4;
    #[cfg(simd_sse2)]
    pub type I32x4 = crate::simd::sse::I32x4;
    #[cfg(not(any(simd_neon, simd_sse2)))]
    pub type I32x4 = ScalarVec<i32, 4>;

    #[cfg(simd_neon)]
    pub type U32x4 = crate::simd::neon::U32x4;
    #[cfg(simd_sse2)]
    pub type U32x4 = crate::simd::sse::U32x4;
    #[cfg(not(any(simd_neon, simd_sse2)))]
    pub type U32x4 = ScalarVec<u32, 4>;
}

macro_rules! lane_widths {
    ($($elem:ty: $n:literal, $n2:literal, $n4:literal => $vector:ty, $mask:ty;)+) => {
        $(
            impl LaneWidth<$n> for $elem {
                type Vector = $vector;
                type MaskVector = $mask;
            }

            impl LaneWidth<$n2> for $elem {
                type Vector = Halves<$vector>;
                type MaskVector = Halves<$mask>;
            }

            impl LaneWidth<$n4> for $elem {
                type Vector = Halves<Halves<$vector>>;
                type MaskVector = Halves<Halves<$mask>>;
            }
        )+
    };
}

lane_widths! {
    f32: 4, 8, 16 => select::F32x4, select::Bool32x4;
    i32: 4, 8, 16 => select::I32x4, select::Bool32x4;
    u32: 4, 8, 16 => select::U32x4, select::Bool32x4;
    Bool32: 4, 8, 16 => select::Bool32x4, select::Bool32x4;

    f64: 2, 4, 8 => select::F64x2, select::Bool64x2;
    i64: 2, 4, 8 => ScalarVec<i64, 2>, select::Bool64x2;
    u64: 2, 4, 8 => ScalarVec<u64, 2>, select::Bool64x2;
    Bool64: 2, 4, 8 => select::Bool64x2, select::Bool64x2;

    i16: 8, 16, 32 => ScalarVec<i16, 8>, ScalarVec<Bool16, 8>;
    u16: 8, 16, 32 => ScalarVec<u16, 8>, ScalarVec<Bool16, 8>;
    Bool16: 8, 16, 32 => ScalarVec<Bool16, 8>, ScalarVec<Bool16, 8>;

    i8: 16, 32, 64 => ScalarVec<i8, 16>, ScalarVec<Bool8, 16>;
    u8: 16, 32, 64 => ScalarVec<u8, 16>, ScalarVec<Bool8, 16>;
    Bool8: 16, 32, 64 => ScalarVec<Bool8, 16>, ScalarVec<Bool8, 16>;
}

/// How one public alias resolved in this build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AliasReport {
    pub alias: &'static str,
    pub element: &'static str,
    pub lanes: usize,
    pub backend: Backend,
    /// Backend of the building block a composed alias is made of.
    pub leaf: Backend,
}

impl AliasReport {
    fn of<V: SimdVector>(alias: &'static str) -> Self {
        Self {
            alias,
            element: <V::Scalar as Element>::NAME,
            lanes: V::LANES,
            backend: V::BACKEND,
            leaf: V::LEAF_BACKEND,
        }
    }
}

impl fmt::Display for AliasReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.backend == self.leaf {
            write!(f, "{} -> {}", self.alias, self.backend)
        } else {
            write!(f, "{} -> {}({})", self.alias, self.backend, self.leaf)
        }
    }
}

/// Which backend every public alias resolved to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackendReport {
    pub entries: Vec<AliasReport>,
}

macro_rules! report {
    ($($alias:ident),+ $(,)?) => {
        vec![$(AliasReport::of::<$alias>(stringify!($alias))),+]
    };
}

impl BackendReport {
    pub fn collect() -> Self {
        let entries = report![
            F32x4, F32x8, F32x16, F64x2, F64x4, F64x8, I32x4, I32x8, I32x16, U32x4, U32x8,
            U32x16, I64x2, I64x4, I64x8, U64x2, U64x4, U64x8, I16x8, I16x16, I16x32, U16x8,
            U16x16, U16x32, I8x16, I8x32, I8x64, U8x16, U8x32, U8x64, Bool8x16, Bool8x32,
            Bool8x64, Bool16x8, Bool16x16, Bool16x32, Bool32x4, Bool32x8, Bool32x16, Bool64x2,
            Bool64x4, Bool64x8,
        ];

        Self { entries }
    }

    /// Resolved backend of `alias` (for example `"F32x8"`).
    pub fn backend_of(&self, alias: &str) -> Option<Backend> {
        self.entries
            .iter()
            .find(|entry| entry.alias == alias)
            .map(|entry| entry.backend)
    }

    /// Number of aliases backed by vector instructions, directly or through
    /// composition.
    pub fn native_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.leaf.is_native())
            .count()
    }

    /// One `info` line per element family, one `debug` line per alias.
    pub fn log(&self) {
        info!(
            "lanewise build flags: {} (sse: {}, sse2: {}, neon: {})",
            BUILD_FLAGS, HAS_SSE, HAS_SSE2, HAS_NEON
        );

        let mut families: Vec<&'static str> = Vec::new();
        for entry in &self.entries {
            if !families.contains(&entry.element) {
                families.push(entry.element);
            }
        }

        for family in families {
            let members: Vec<String> = self
                .entries
                .iter()
                .filter(|entry| entry.element == family)
                .map(|entry| entry.to_string())
                .collect();
            info!("{family}: {}", members.join(", "));
        }

        for entry in &self.entries {
            debug!(
                "{} = {} x {} on {} (leaf {})",
                entry.alias, entry.lanes, entry.element, entry.backend, entry.leaf
            );
        }
    }
}
