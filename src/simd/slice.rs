//! Vectorized math over whole slices.
//!
//! [`SimdMath`] is implemented for `[f32]` (processed as [`F32x8`]) and
//! `[f64]` (processed as [`F64x4`]). Every element goes through the same
//! vector kernel, including the tail: the last partial block is copied into a
//! zero-padded stack buffer, computed as a full vector, and only the live
//! lanes are copied back. Nothing is ever read past the end of the input.
//!
//! # Execution tiers
//!
//! | Method family | Strategy                                                    |
//! |---------------|-------------------------------------------------------------|
//! | `x()`         | allocate the output, single thread                          |
//! | `x_into()`    | caller-provided output, single thread                       |
//! | `par_x()`     | rayon above [`PARALLEL_THRESHOLD`] elements, else as `x()`  |
//!
//! The parallel path splits the output into [`PARALLEL_CHUNK_SIZE`] element
//! chunks rounded down to a multiple of the vector width, so every chunk but
//! the last is made of complete vectors.
//!
//! ```
//! use lanewise::simd::slice::SimdMath;
//!
//! let x = [0.0f32, 1.0, 2.0, 3.0, 4.0];
//! let y = x.exp();
//!
//! assert_eq!(y.len(), 5);
//! assert!((y[1] - std::f32::consts::E).abs() < 1e-5);
//! ```

use rayon::prelude::*;

use crate::error::{ensure_len, Result};
use crate::simd::aliases::{F32x8, F64x4};
use crate::simd::traits::{Float, SimdFloat, SimdVector};

/// Inputs longer than this many elements are split across the rayon pool by
/// the `par_*` methods.
pub const PARALLEL_THRESHOLD: usize = 1 << 16;

/// Target number of elements handled by one rayon task.
pub const PARALLEL_CHUNK_SIZE: usize = 1 << 14;

/// Stack buffer length for the zero-padded tail; at least the widest vector
/// used by this module.
const TAIL_CAPACITY: usize = 16;

/// Element-wise transcendental functions on slices.
///
/// `*_into` methods return [`LengthMismatch`](crate::error::LanewiseError::LengthMismatch)
/// when an output (or the exponent slice of `pow`) is not exactly as long as
/// `self`; the output is left untouched in that case.
pub trait SimdMath {
    type Scalar: Float;

    fn abs(&self) -> Vec<Self::Scalar>;

    fn sqrt(&self) -> Vec<Self::Scalar>;

    fn rsqrt(&self) -> Vec<Self::Scalar>;

    fn recip(&self) -> Vec<Self::Scalar>;

    fn sin(&self) -> Vec<Self::Scalar>;

    fn cos(&self) -> Vec<Self::Scalar>;

    /// Sine and cosine from one range reduction per block.
    fn sincos(&self) -> (Vec<Self::Scalar>, Vec<Self::Scalar>);

    fn exp(&self) -> Vec<Self::Scalar>;

    /// Natural logarithm; non-positive and NaN elements produce NaN.
    fn log(&self) -> Vec<Self::Scalar>;

    /// `self[i]` raised to `exponent[i]`.
    fn pow(&self, exponent: &[Self::Scalar]) -> Result<Vec<Self::Scalar>>;

    fn abs_into(&self, out: &mut [Self::Scalar]) -> Result<()>;

    fn sqrt_into(&self, out: &mut [Self::Scalar]) -> Result<()>;

    fn rsqrt_into(&self, out: &mut [Self::Scalar]) -> Result<()>;

    fn recip_into(&self, out: &mut [Self::Scalar]) -> Result<()>;

    fn sin_into(&self, out: &mut [Self::Scalar]) -> Result<()>;

    fn cos_into(&self, out: &mut [Self::Scalar]) -> Result<()>;

    fn sincos_into(&self, sin: &mut [Self::Scalar], cos: &mut [Self::Scalar]) -> Result<()>;

    fn exp_into(&self, out: &mut [Self::Scalar]) -> Result<()>;

    fn log_into(&self, out: &mut [Self::Scalar]) -> Result<()>;

    fn pow_into(&self, exponent: &[Self::Scalar], out: &mut [Self::Scalar]) -> Result<()>;

    fn par_abs(&self) -> Vec<Self::Scalar>;

    fn par_sqrt(&self) -> Vec<Self::Scalar>;

    fn par_rsqrt(&self) -> Vec<Self::Scalar>;

    fn par_recip(&self) -> Vec<Self::Scalar>;

    fn par_sin(&self) -> Vec<Self::Scalar>;

    fn par_cos(&self) -> Vec<Self::Scalar>;

    fn par_sincos(&self) -> (Vec<Self::Scalar>, Vec<Self::Scalar>);

    fn par_exp(&self) -> Vec<Self::Scalar>;

    fn par_log(&self) -> Vec<Self::Scalar>;

    fn par_pow(&self, exponent: &[Self::Scalar]) -> Result<Vec<Self::Scalar>>;
}

/// Chunk length for the parallel path: a multiple of the vector width.
#[inline(always)]
fn parallel_chunk<V: SimdVector>() -> usize {
    ((PARALLEL_CHUNK_SIZE / V::LANES) * V::LANES).max(V::LANES)
}

/// Runs `op` over `input` one vector at a time, writing into `out`.
#[inline(always)]
fn map_into<V: SimdVector>(input: &[V::Scalar], out: &mut [V::Scalar], op: impl Fn(V) -> V) {
    debug_assert_eq!(input.len(), out.len());
    debug_assert!(V::LANES <= TAIL_CAPACITY);

    let lanes = V::LANES;
    let split = input.len() - input.len() % lanes;

    for (src, dst) in input[..split]
        .chunks_exact(lanes)
        .zip(out[..split].chunks_exact_mut(lanes))
    {
        op(V::from_slice(src)).write_to_slice(dst);
    }

    let tail = input.len() - split;
    if tail > 0 {
        let mut buffer = [<V::Scalar as Default>::default(); TAIL_CAPACITY];
        buffer[..tail].copy_from_slice(&input[split..]);
        op(V::from_slice(&buffer)).write_to_slice(&mut buffer);
        out[split..].copy_from_slice(&buffer[..tail]);
    }
}

/// Two-input form of [`map_into`].
#[inline(always)]
fn zip_map_into<V: SimdVector>(
    lhs: &[V::Scalar],
    rhs: &[V::Scalar],
    out: &mut [V::Scalar],
    op: impl Fn(V, V) -> V,
) {
    debug_assert_eq!(lhs.len(), rhs.len());
    debug_assert_eq!(lhs.len(), out.len());

    let lanes = V::LANES;
    let split = lhs.len() - lhs.len() % lanes;

    for ((a, b), dst) in lhs[..split]
        .chunks_exact(lanes)
        .zip(rhs[..split].chunks_exact(lanes))
        .zip(out[..split].chunks_exact_mut(lanes))
    {
        op(V::from_slice(a), V::from_slice(b)).write_to_slice(dst);
    }

    let tail = lhs.len() - split;
    if tail > 0 {
        let mut a = [<V::Scalar as Default>::default(); TAIL_CAPACITY];
        let mut b = [<V::Scalar as Default>::default(); TAIL_CAPACITY];
        a[..tail].copy_from_slice(&lhs[split..]);
        b[..tail].copy_from_slice(&rhs[split..]);
        op(V::from_slice(&a), V::from_slice(&b)).write_to_slice(&mut a);
        out[split..].copy_from_slice(&a[..tail]);
    }
}

/// Two-output form of [`map_into`].
#[inline(always)]
fn map_pair_into<V: SimdVector>(
    input: &[V::Scalar],
    first: &mut [V::Scalar],
    second: &mut [V::Scalar],
    op: impl Fn(V) -> (V, V),
) {
    debug_assert_eq!(input.len(), first.len());
    debug_assert_eq!(input.len(), second.len());

    let lanes = V::LANES;
    let split = input.len() - input.len() % lanes;

    for ((src, a), b) in input[..split]
        .chunks_exact(lanes)
        .zip(first[..split].chunks_exact_mut(lanes))
        .zip(second[..split].chunks_exact_mut(lanes))
    {
        let (x, y) = op(V::from_slice(src));
        x.write_to_slice(a);
        y.write_to_slice(b);
    }

    let tail = input.len() - split;
    if tail > 0 {
        let mut a = [<V::Scalar as Default>::default(); TAIL_CAPACITY];
        let mut b = [<V::Scalar as Default>::default(); TAIL_CAPACITY];
        a[..tail].copy_from_slice(&input[split..]);
        let (x, y) = op(V::from_slice(&a));
        x.write_to_slice(&mut a);
        y.write_to_slice(&mut b);
        first[split..].copy_from_slice(&a[..tail]);
        second[split..].copy_from_slice(&b[..tail]);
    }
}

fn par_map_into<V: SimdVector>(
    input: &[V::Scalar],
    out: &mut [V::Scalar],
    op: impl Fn(V) -> V + Sync,
) {
    if input.len() <= PARALLEL_THRESHOLD {
        return map_into(input, out, op);
    }

    let chunk_size = parallel_chunk::<V>();
    out.par_chunks_mut(chunk_size)
        .zip(input.par_chunks(chunk_size))
        .for_each(|(dst, src)| map_into(src, dst, &op));
}

fn par_zip_map_into<V: SimdVector>(
    lhs: &[V::Scalar],
    rhs: &[V::Scalar],
    out: &mut [V::Scalar],
    op: impl Fn(V, V) -> V + Sync,
) {
    if lhs.len() <= PARALLEL_THRESHOLD {
        return zip_map_into(lhs, rhs, out, op);
    }

    let chunk_size = parallel_chunk::<V>();
    out.par_chunks_mut(chunk_size)
        .zip(lhs.par_chunks(chunk_size))
        .zip(rhs.par_chunks(chunk_size))
        .for_each(|((dst, a), b)| zip_map_into(a, b, dst, &op));
}

fn par_map_pair_into<V: SimdVector>(
    input: &[V::Scalar],
    first: &mut [V::Scalar],
    second: &mut [V::Scalar],
    op: impl Fn(V) -> (V, V) + Sync,
) {
    if input.len() <= PARALLEL_THRESHOLD {
        return map_pair_into(input, first, second, op);
    }

    let chunk_size = parallel_chunk::<V>();
    first
        .par_chunks_mut(chunk_size)
        .zip(second.par_chunks_mut(chunk_size))
        .zip(input.par_chunks(chunk_size))
        .for_each(|((a, b), src)| map_pair_into(src, a, b, &op));
}

macro_rules! unary_methods {
    ($vector:ty; $($name:ident, $into:ident, $par:ident => $kernel:ident;)+) => {
        $(
            #[inline]
            fn $name(&self) -> Vec<Self::Scalar> {
                let mut out = vec![Default::default(); self.len()];
                map_into::<$vector>(self, &mut out, <$vector as SimdFloat>::$kernel);
                out
            }

            #[inline]
            fn $into(&self, out: &mut [Self::Scalar]) -> Result<()> {
                ensure_len(self.len(), out.len())?;
                map_into::<$vector>(self, out, <$vector as SimdFloat>::$kernel);
                Ok(())
            }

            fn $par(&self) -> Vec<Self::Scalar> {
                let mut out = vec![Default::default(); self.len()];
                par_map_into::<$vector>(self, &mut out, <$vector as SimdFloat>::$kernel);
                out
            }
        )+
    };
}

macro_rules! impl_simd_math {
    ($($scalar:ty => $vector:ty),+ $(,)?) => {
        $(
            impl SimdMath for [$scalar] {
                type Scalar = $scalar;

                unary_methods! {
                    $vector;
                    abs, abs_into, par_abs => abs;
                    sqrt, sqrt_into, par_sqrt => sqrt;
                    rsqrt, rsqrt_into, par_rsqrt => rsqrt;
                    recip, recip_into, par_recip => recip;
                    sin, sin_into, par_sin => sin;
                    cos, cos_into, par_cos => cos;
                    exp, exp_into, par_exp => exp;
                    log, log_into, par_log => log;
                }

                fn sincos(&self) -> (Vec<$scalar>, Vec<$scalar>) {
                    let mut sin = vec![0.0; self.len()];
                    let mut cos = vec![0.0; self.len()];
                    map_pair_into::<$vector>(
                        self,
                        &mut sin,
                        &mut cos,
                        <$vector as SimdFloat>::sincos,
                    );
                    (sin, cos)
                }

                fn sincos_into(&self, sin: &mut [$scalar], cos: &mut [$scalar]) -> Result<()> {
                    ensure_len(self.len(), sin.len())?;
                    ensure_len(self.len(), cos.len())?;
                    map_pair_into::<$vector>(self, sin, cos, <$vector as SimdFloat>::sincos);
                    Ok(())
                }

                fn par_sincos(&self) -> (Vec<$scalar>, Vec<$scalar>) {
                    let mut sin = vec![0.0; self.len()];
                    let mut cos = vec![0.0; self.len()];
                    par_map_pair_into::<$vector>(
                        self,
                        &mut sin,
                        &mut cos,
                        <$vector as SimdFloat>::sincos,
                    );
                    (sin, cos)
                }

                fn pow(&self, exponent: &[$scalar]) -> Result<Vec<$scalar>> {
                    ensure_len(self.len(), exponent.len())?;
                    let mut out = vec![0.0; self.len()];
                    zip_map_into::<$vector>(self, exponent, &mut out, <$vector as SimdFloat>::pow);
                    Ok(out)
                }

                fn pow_into(&self, exponent: &[$scalar], out: &mut [$scalar]) -> Result<()> {
                    ensure_len(self.len(), exponent.len())?;
                    ensure_len(self.len(), out.len())?;
                    zip_map_into::<$vector>(self, exponent, out, <$vector as SimdFloat>::pow);
                    Ok(())
                }

                fn par_pow(&self, exponent: &[$scalar]) -> Result<Vec<$scalar>> {
                    ensure_len(self.len(), exponent.len())?;
                    let mut out = vec![0.0; self.len()];
                    par_zip_map_into::<$vector>(
                        self,
                        exponent,
                        &mut out,
                        <$vector as SimdFloat>::pow,
                    );
                    Ok(out)
                }
            }
        )+
    };
}

impl_simd_math! {
    f32 => F32x8,
    f64 => F64x4,
}
