// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Error types for matrix and parity-check operations
//!
//! Field-level failures (membership, mismatched fields, division by zero) are
//! wrapped from [`gf_field::FieldError`]. Shape problems are reported here.
//! A linear system without a unique solution is not an error; see
//! [`crate::matrix::Solution`].

use gf_field::FieldError;
use thiserror::Error;

/// Main error type for matrix operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParityMatrixError {
    /// Field arithmetic errors
    #[error(transparent)]
    Field(#[from] FieldError),

    /// Dimension mismatch for addition, multiplication or solve
    #[error("Shape mismatch: {message}")]
    ShapeMismatch { message: String },

    /// Row or column index outside the matrix
    #[error("Index out of bounds: {message}")]
    IndexOutOfBounds { message: String },
}

/// Result type alias for matrix operations
pub type ParityMatrixResult<T> = Result<T, ParityMatrixError>;

// Helper functions for creating errors with context
impl ParityMatrixError {
    /// Create a shape mismatch error
    pub fn shape_mismatch(message: impl Into<String>) -> Self {
        ParityMatrixError::ShapeMismatch {
            message: message.into(),
        }
    }

    /// Create a dimension mismatch error
    pub fn dimension_mismatch(expected: usize, actual: usize, context: impl Into<String>) -> Self {
        ParityMatrixError::ShapeMismatch {
            message: format!(
                "Dimension mismatch in {}: expected {}, got {}",
                context.into(),
                expected,
                actual
            ),
        }
    }

    /// Create an index error
    pub fn out_of_bounds(index: usize, len: usize, context: impl Into<String>) -> Self {
        ParityMatrixError::IndexOutOfBounds {
            message: format!("{} index {} out of range 0..{}", context.into(), index, len),
        }
    }
}
