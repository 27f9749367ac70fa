// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Full-rank test for binary matrices using packed XOR elimination.

use crate::errors::{ParityMatrixError, ParityMatrixResult};
use crate::matrix_type::Matrix;
use gf_field::FieldError;

const WORD: usize = u64::BITS as usize;

fn pack(bits: impl Iterator<Item = bool>, cols: usize) -> Vec<u64> {
    let mut words = vec![0u64; cols.div_ceil(WORD)];
    for (j, bit) in bits.enumerate() {
        if bit {
            words[j / WORD] |= 1 << (j % WORD);
        }
    }
    words
}

fn packed_full_rank(mut rows: Vec<Vec<u64>>, cols: usize) -> bool {
    for col in 0..cols {
        let (word, mask) = (col / WORD, 1u64 << (col % WORD));
        let Some(found) = (col..rows.len()).find(|&r| rows[r][word] & mask != 0) else {
            return false;
        };
        rows.swap(col, found);
        let pivot = rows[col].clone();
        for row in rows.iter_mut().skip(col + 1) {
            if row[word] & mask != 0 {
                for (a, b) in row.iter_mut().zip(&pivot) {
                    *a ^= b;
                }
            }
        }
    }
    true
}

/// Whether rows of 0/1 bits have rank `min(rows, cols)`.
///
/// Wide inputs are transposed first so elimination runs over the shorter side.
/// Every row must have the length of the first row.
pub fn bits_have_full_rank(rows: &[Vec<u8>]) -> ParityMatrixResult<bool> {
    let height = rows.len();
    let width = rows.first().map_or(0, Vec::len);
    if let Some(row) = rows.iter().find(|row| row.len() != width) {
        return Err(ParityMatrixError::dimension_mismatch(
            width,
            row.len(),
            "binary full-rank test row length",
        ));
    }
    let packed = if height < width {
        (0..width)
            .map(|j| pack(rows.iter().map(|row| row[j] & 1 == 1), height))
            .collect()
    } else {
        rows.iter()
            .map(|row| pack(row.iter().map(|&b| b & 1 == 1), width))
            .collect()
    };
    Ok(packed_full_rank(packed, height.min(width)))
}

/// Binary-only full-rank test for a matrix over GF(2).
///
/// Equivalent to `rank() == min(rows, cols)` without going through field
/// arithmetic.
pub fn has_full_rank(matrix: &Matrix) -> ParityMatrixResult<bool> {
    if matrix.field().order() != 2 {
        return Err(FieldError::incompatible(
            "binary full-rank test",
            matrix.field().as_ref(),
            "GF(2)",
        )
        .into());
    }
    let rows: Vec<Vec<u8>> = matrix
        .data()
        .iter()
        .map(|row| row.iter().map(|v| u8::from(!v.is_zero())).collect())
        .collect();
    bits_have_full_rank(&rows)
}
