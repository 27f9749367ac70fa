// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Erasure decoding against a parity-check matrix.
//!
//! The sender publishes the redundancy `s = H · x`. The receiver zero-fills the
//! erased positions of what arrived to get `X`, computes the discrepancy
//! `z = s - H · X` and solves `h · e = z` where `h` keeps only the erased
//! columns of `H`. The solution `e` is written back into the erased positions.

use crate::channel::erased_positions;
use crate::errors::ErasureResult;
use gf_field::FieldElement;
use gf_parity_matrix::{solve, Deficiency, Matrix, ParityMatrixError, Solution};
use tracing::{debug, trace};

/// Outcome of an erasure decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeOutcome<T> {
    /// Every erased position was filled in.
    Recovered(Vec<T>),
    /// The erased columns did not determine the missing values; the received
    /// word is handed back unchanged.
    Failed {
        received: Vec<Option<T>>,
        reason: Deficiency,
    },
}

impl<T> DecodeOutcome<T> {
    pub fn is_recovered(&self) -> bool {
        matches!(self, DecodeOutcome::Recovered(_))
    }

    pub fn recovered(&self) -> Option<&[T]> {
        match self {
            DecodeOutcome::Recovered(word) => Some(word),
            DecodeOutcome::Failed { .. } => None,
        }
    }

    pub fn into_recovered(self) -> Option<Vec<T>> {
        match self {
            DecodeOutcome::Recovered(word) => Some(word),
            DecodeOutcome::Failed { .. } => None,
        }
    }
}

/// `H · v` for a word `v` of length `H.cols()`.
fn apply(h: &Matrix, word: &[FieldElement]) -> ErasureResult<Vec<FieldElement>> {
    if word.len() != h.cols() {
        return Err(
            ParityMatrixError::dimension_mismatch(h.cols(), word.len(), "word length").into(),
        );
    }
    let field = h.field();
    let mut out = Vec::with_capacity(h.rows());
    for row in h.data() {
        let mut acc = field.zero();
        for (coefficient, value) in row.iter().zip(word) {
            if coefficient.is_zero() || value.is_zero() {
                continue;
            }
            acc = field.add(&acc, &field.mul(coefficient, value)?)?;
        }
        out.push(acc);
    }
    Ok(out)
}

/// Redundancy `s = H · x` the sender transmits alongside the word.
pub fn redundancy(h: &Matrix, word: &[FieldElement]) -> ErasureResult<Vec<FieldElement>> {
    for value in word {
        h.field().ensure_contains(value)?;
    }
    apply(h, word)
}

/// Recover the erased positions of `received` from the sender's redundancy.
///
/// Recovery succeeds exactly when the erased columns of `h` have full column
/// rank. Mismatched lengths are errors.
pub fn decode(
    h: &Matrix,
    sketch: &[FieldElement],
    received: &[Option<FieldElement>],
) -> ErasureResult<DecodeOutcome<FieldElement>> {
    if sketch.len() != h.rows() {
        return Err(
            ParityMatrixError::dimension_mismatch(h.rows(), sketch.len(), "redundancy length")
                .into(),
        );
    }
    if received.len() != h.cols() {
        return Err(
            ParityMatrixError::dimension_mismatch(h.cols(), received.len(), "word length").into(),
        );
    }
    let field = h.field();
    let erased = erased_positions(received);
    let provisional: Vec<FieldElement> = received
        .iter()
        .map(|v| v.clone().unwrap_or_else(|| field.zero()))
        .collect();
    if erased.is_empty() {
        return Ok(DecodeOutcome::Recovered(provisional));
    }

    let fail = |reason: Deficiency| -> ErasureResult<DecodeOutcome<FieldElement>> {
        debug!("decode of {} erasures failed: {}", erased.len(), reason);
        Ok(DecodeOutcome::Failed {
            received: received.to_vec(),
            reason,
        })
    };
    if h.rows() < erased.len() {
        return fail(Deficiency::Underdetermined {
            rows: h.rows(),
            cols: erased.len(),
        });
    }

    let observed = apply(h, &provisional)?;
    let discrepancy = sketch
        .iter()
        .zip(&observed)
        .map(|(s, o)| field.sub(s, o))
        .collect::<Result<Vec<_>, _>>()?;
    trace!("discrepancy {:?} over erased columns {:?}", discrepancy, erased);

    let restricted = h.select_columns(&erased)?;
    let rhs = Matrix::column(field.clone(), discrepancy)?;
    match solve(&restricted, &rhs)? {
        Solution::Unique(values) => {
            let mut word = provisional;
            for (position, value) in erased.iter().zip(values) {
                word[*position] = value;
            }
            Ok(DecodeOutcome::Recovered(word))
        }
        Solution::NoSolution(reason) => fail(reason),
    }
}
