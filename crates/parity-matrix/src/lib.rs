// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Matrices over finite fields and Reed-Solomon parity-check construction.
//!
//! This crate provides Gaussian-elimination linear algebra over any
//! [`gf_field::FiniteField`]: rank, determinant, cofactor inverse and a
//! single-column solver that reports rank deficiency as a value rather than an
//! error. A packed XOR rank test covers the binary case without field overhead.
//!
//! ## Reed-Solomon parity checks
//!
//! For a primitive element `alpha` of GF(q), the `t × n` matrix
//! `H[i][j] = alpha^(i*j)` has every set of `t` columns linearly independent
//! when `n ≤ q - 1`. A word `x` sent with its redundancy `s = H · x` can then be
//! recovered from any `t` erasures by solving for the erased positions.

pub mod errors;
pub mod math;
pub mod matrix;
pub mod matrix_type;
pub mod reed_solomon;
pub mod utils;

// Re-export commonly used types for convenience
pub use errors::{ParityMatrixError, ParityMatrixResult};
pub use math::{bits_have_full_rank, has_full_rank};
pub use matrix::{solve, Deficiency, Solution};
pub use matrix_type::Matrix;
pub use reed_solomon::{
    build_parity_check_matrix, build_parity_check_matrix_for_order, ReedSolomonConfig,
};
