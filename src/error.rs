//! Error types for the bulk slice layer.
//!
//! Vector operations themselves never fail. Only the slice helpers, which
//! take caller-provided buffers, can be handed inputs they cannot process.

use std::fmt;

/// Errors reported by the slice layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanewiseError {
    /// Two buffers that must have the same length do not.
    LengthMismatch {
        /// Length of the input slice.
        expected: usize,
        /// Length of the offending buffer.
        actual: usize,
    },
}

impl fmt::Display for LanewiseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LanewiseError::LengthMismatch { expected, actual } => {
                write!(
                    f,
                    "Length mismatch: expected {expected} elements, got {actual}"
                )
            }
        }
    }
}

impl std::error::Error for LanewiseError {}

/// Result type for fallible slice operations.
pub type Result<T> = std::result::Result<T, LanewiseError>;

/// Creates a length mismatch error.
pub fn length_mismatch(expected: usize, actual: usize) -> LanewiseError {
    LanewiseError::LengthMismatch { expected, actual }
}

/// `Ok(())` when `actual == expected`.
pub(crate) fn ensure_len(expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(length_mismatch(expected, actual))
    }
}
