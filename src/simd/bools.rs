//! Bit-pattern booleans used as SIMD lane masks.
//!
//! A lane mask is an unsigned integer that is either all ones (`TRUE`) or all
//! zeros (`FALSE`). Keeping this representation lets `mask` and `select` be
//! plain bitwise operations on the raw lane bits, whatever the element type.
//!
//! | Type     | Storage | `TRUE`                 | `FALSE` |
//! |----------|---------|------------------------|---------|
//! | `Bool8`  | `u8`    | `0xFF`                 | `0x00`  |
//! | `Bool16` | `u16`   | `0xFFFF`               | `0x0000`|
//! | `Bool32` | `u32`   | `0xFFFF_FFFF`          | `0`     |
//! | `Bool64` | `u64`   | `0xFFFF_FFFF_FFFF_FFFF`| `0`     |
//!
//! Values produced by this crate are always one of the two canonical
//! patterns. Bits read from foreign memory through
//! [`Bool32::from_bits_unchecked`] (and friends) are not checked; callers own
//! that risk.

use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

macro_rules! sized_bool {
    ($(#[$meta:meta])* $name:ident, $bits:ty) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
        #[repr(transparent)]
        pub struct $name($bits);

        impl $name {
            /// All bits set.
            pub const TRUE: Self = Self(<$bits>::MAX);

            /// All bits clear.
            pub const FALSE: Self = Self(0);

            /// Converts a native boolean into its canonical bit pattern.
            #[inline(always)]
            pub const fn from_bool(value: bool) -> Self {
                if value {
                    Self::TRUE
                } else {
                    Self::FALSE
                }
            }

            /// Returns `true` when any bit is set.
            ///
            /// Canonical values have either every bit or no bit set, so this is
            /// exact for everything this crate produces.
            #[inline(always)]
            pub const fn to_bool(self) -> bool {
                self.0 != 0
            }

            /// Raw lane bits.
            #[inline(always)]
            pub const fn to_bits(self) -> $bits {
                self.0
            }

            /// Wraps raw bits without checking that they form a canonical pattern.
            ///
            /// Use this only at the boundary with untrusted memory: a
            /// non-canonical value makes `select` blend bits from both operands.
            #[inline(always)]
            pub const fn from_bits_unchecked(bits: $bits) -> Self {
                Self(bits)
            }

            /// Whether the stored bits are one of the two canonical patterns.
            #[inline(always)]
            pub const fn is_canonical(self) -> bool {
                self.0 == 0 || self.0 == <$bits>::MAX
            }
        }

        impl From<bool> for $name {
            #[inline(always)]
            fn from(value: bool) -> Self {
                Self::from_bool(value)
            }
        }

        impl From<$name> for bool {
            #[inline(always)]
            fn from(value: $name) -> bool {
                value.to_bool()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_canonical() {
                    write!(f, "{}", self.to_bool())
                } else {
                    write!(f, "{}({:#x})", stringify!($name), self.0)
                }
            }
        }

        impl Not for $name {
            type Output = Self;

            #[inline(always)]
            fn not(self) -> Self {
                Self(!self.0)
            }
        }

        impl BitAnd for $name {
            type Output = Self;

            #[inline(always)]
            fn bitand(self, rhs: Self) -> Self {
                Self(self.0 & rhs.0)
            }
        }

        impl BitOr for $name {
            type Output = Self;

            #[inline(always)]
            fn bitor(self, rhs: Self) -> Self {
                Self(self.0 | rhs.0)
            }
        }

        impl BitXor for $name {
            type Output = Self;

            #[inline(always)]
            fn bitxor(self, rhs: Self) -> Self {
                Self(self.0 ^ rhs.0)
            }
        }

        impl BitAndAssign for $name {
            #[inline(always)]
            fn bitand_assign(&mut self, rhs: Self) {
                self.0 &= rhs.0;
            }
        }

        impl BitOrAssign for $name {
            #[inline(always)]
            fn bitor_assign(&mut self, rhs: Self) {
                self.0 |= rhs.0;
            }
        }

        impl BitXorAssign for $name {
            #[inline(always)]
            fn bitxor_assign(&mut self, rhs: Self) {
                self.0 ^= rhs.0;
            }
        }
    };
}

sized_bool!(
    /// One-byte lane mask.
    Bool8,
    u8
);
sized_bool!(
    /// Two-byte lane mask.
    Bool16,
    u16
);
sized_bool!(
    /// Four-byte lane mask, produced by comparisons on `f32`, `i32` and `u32` lanes.
    Bool32,
    u32
);
sized_bool!(
    /// Eight-byte lane mask, produced by comparisons on `f64`, `i64` and `u64` lanes.
    Bool64,
    u64
);

/// Conversion between mask widths that keeps the truth value.
///
/// Narrowing or widening a canonical mask always yields a canonical mask.
pub trait Resize<To> {
    fn resize(self) -> To;
}

macro_rules! resize {
    ($($from:ident => $($to:ident),+);+ $(;)?) => {
        $($(
            impl Resize<$to> for $from {
                #[inline(always)]
                fn resize(self) -> $to {
                    $to::from_bool(self.to_bool())
                }
            }

            impl num::traits::AsPrimitive<$to> for $from {
                #[inline(always)]
                fn as_(self) -> $to {
                    $to::from_bool(self.to_bool())
                }
            }
        )+)+
    };
}

resize! {
    Bool8 => Bool8, Bool16, Bool32, Bool64;
    Bool16 => Bool8, Bool16, Bool32, Bool64;
    Bool32 => Bool8, Bool16, Bool32, Bool64;
    Bool64 => Bool8, Bool16, Bool32, Bool64;
}
