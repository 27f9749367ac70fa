// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Error types for erasure reconciliation
//!
//! A failed decode is not an error: it is reported through
//! [`crate::protocol::DecodeOutcome::Failed`].

use gf_field::FieldError;
use gf_parity_matrix::ParityMatrixError;
use thiserror::Error;

/// Main error type for erasure reconciliation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErasureError {
    /// Field arithmetic errors
    #[error(transparent)]
    Field(#[from] FieldError),

    /// Matrix errors
    #[error(transparent)]
    Matrix(#[from] ParityMatrixError),

    /// Seed does not fit the generator
    #[error("Invalid seed: {message}")]
    InvalidSeed { message: String },

    /// Parameter outside its valid range
    #[error("Invalid parameter: {message}")]
    InvalidParameter { message: String },
}

/// Result type alias for erasure operations
pub type ErasureResult<T> = Result<T, ErasureError>;

impl ErasureError {
    pub fn invalid_seed(message: impl Into<String>) -> Self {
        ErasureError::InvalidSeed {
            message: message.into(),
        }
    }

    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        ErasureError::InvalidParameter {
            message: message.into(),
        }
    }
}
