// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Reconciling a bit word after erasures.
//!
//! [`ReedSolomonReconciler`] groups bits into GF(2^m) symbols and uses one fixed
//! Reed-Solomon parity-check matrix. [`RandomReconciler`] works directly over
//! GF(2) with a parity-check matrix drawn from a shared [`BitStream`].

use crate::bitstream::BitStream;
use crate::cost::optimal_slack;
use crate::errors::{ErasureError, ErasureResult};
use crate::protocol::{decode, redundancy, DecodeOutcome};
use crate::word::{bits_to_symbols, received_symbols, symbols_to_bits};
use gf_field::{FieldElement, FieldRegistry, FiniteField};
use gf_parity_matrix::{build_parity_check_matrix, Matrix, ReedSolomonConfig};
use std::sync::Arc;
use tracing::debug;

/// Smallest `m` with `n <= m * (2^m - 1)`, so `ceil(n / m)` symbols fit the code.
pub fn symbol_width(word_bits: usize) -> usize {
    let mut m = 1usize;
    while m < 63 && word_bits > m * ((1usize << m) - 1) {
        m += 1;
    }
    m
}

fn ensure_length(expected: usize, actual: usize, what: &str) -> ErasureResult<()> {
    if expected != actual {
        return Err(ErasureError::invalid_parameter(format!(
            "{what} has {actual} bits, expected {expected}"
        )));
    }
    Ok(())
}

/// Reed-Solomon reconciliation of `n`-bit words with up to `t` erased bits.
#[derive(Debug, Clone)]
pub struct ReedSolomonReconciler {
    word_bits: usize,
    max_erasures: usize,
    symbol_width: usize,
    field: Arc<FiniteField>,
    parity: Matrix,
}

impl ReedSolomonReconciler {
    pub fn new(
        registry: &FieldRegistry,
        word_bits: usize,
        max_erasures: usize,
    ) -> ErasureResult<Self> {
        if word_bits == 0 {
            return Err(ErasureError::invalid_parameter("word must hold at least one bit"));
        }
        let m = symbol_width(word_bits);
        let field = registry.get(1u64 << m)?;
        let symbols = word_bits.div_ceil(m);
        // t erased bits touch at most t symbols
        let rows = max_erasures.min(symbols);
        let parity = build_parity_check_matrix(&field, ReedSolomonConfig { t: rows, n: symbols })?;
        debug!(
            "Reed-Solomon reconciler: {} bits as {} symbols over {}, {} parity rows",
            word_bits, symbols, field, rows
        );
        Ok(Self {
            word_bits,
            max_erasures,
            symbol_width: m,
            field,
            parity,
        })
    }

    pub fn word_bits(&self) -> usize {
        self.word_bits
    }

    pub fn max_erasures(&self) -> usize {
        self.max_erasures
    }

    /// Bits per symbol.
    pub fn symbol_width(&self) -> usize {
        self.symbol_width
    }

    pub fn field(&self) -> &Arc<FiniteField> {
        &self.field
    }

    pub fn parity_matrix(&self) -> &Matrix {
        &self.parity
    }

    /// Redundancy for `bits`, one GF(2^m) value per parity row.
    pub fn sketch(&self, bits: &[u8]) -> ErasureResult<Vec<FieldElement>> {
        ensure_length(self.word_bits, bits.len(), "word")?;
        let symbols = bits_to_symbols(bits, self.symbol_width, &self.field)?;
        redundancy(&self.parity, &symbols)
    }

    /// Recover the erased bits of `received`. A symbol with any erased bit is
    /// treated as erased.
    pub fn reconcile(
        &self,
        sketch: &[FieldElement],
        received: &[Option<u8>],
    ) -> ErasureResult<DecodeOutcome<u8>> {
        ensure_length(self.word_bits, received.len(), "received word")?;
        let symbols = received_symbols(received, self.symbol_width, &self.field)?;
        Ok(match decode(&self.parity, sketch, &symbols)? {
            DecodeOutcome::Recovered(symbols) => DecodeOutcome::Recovered(symbols_to_bits(
                &symbols,
                self.symbol_width,
                self.word_bits,
            )),
            DecodeOutcome::Failed { reason, .. } => DecodeOutcome::Failed {
                received: received.to_vec(),
                reason,
            },
        })
    }
}

/// Randomized reconciliation over GF(2) with `c = t + d` parity rows.
#[derive(Debug, Clone)]
pub struct RandomReconciler {
    max_erasures: usize,
    slack: usize,
    field: Arc<FiniteField>,
}

impl RandomReconciler {
    pub fn new(max_erasures: usize, slack: usize) -> ErasureResult<Self> {
        Ok(Self {
            max_erasures,
            slack,
            field: FiniteField::new(2)?,
        })
    }

    /// Slack chosen to minimize the expected excess communication.
    pub fn with_optimal_slack(max_erasures: usize) -> ErasureResult<Self> {
        Self::new(max_erasures, optimal_slack(max_erasures))
    }

    pub fn max_erasures(&self) -> usize {
        self.max_erasures
    }

    pub fn slack(&self) -> usize {
        self.slack
    }

    /// Parity rows `c = t + d`.
    pub fn rows(&self) -> usize {
        self.max_erasures + self.slack
    }

    /// Draw a `c × width` parity-check matrix from the generator.
    ///
    /// Both sides must draw from identically seeded generators.
    pub fn draw_parity<G: BitStream + ?Sized>(&self, generator: &mut G) -> ErasureResult<Matrix> {
        if self.rows() == 0 {
            return Ok(Matrix::zeros(self.field.clone(), 0, generator.width()));
        }
        let rows: Vec<Vec<u64>> = (0..self.rows())
            .map(|_| generator.next_block().into_iter().map(|b| u64::from(b & 1)).collect())
            .collect();
        Ok(Matrix::from_integers(self.field.clone(), &rows)?)
    }

    fn to_elements(bits: &[u8]) -> Vec<FieldElement> {
        bits.iter().map(|&b| FieldElement::Prime(u64::from(b & 1))).collect()
    }

    /// Redundancy `H · x` over GF(2).
    pub fn sketch(&self, parity: &Matrix, bits: &[u8]) -> ErasureResult<Vec<FieldElement>> {
        ensure_length(parity.cols(), bits.len(), "word")?;
        redundancy(parity, &Self::to_elements(bits))
    }

    pub fn reconcile(
        &self,
        parity: &Matrix,
        sketch: &[FieldElement],
        received: &[Option<u8>],
    ) -> ErasureResult<DecodeOutcome<u8>> {
        ensure_length(parity.cols(), received.len(), "received word")?;
        let symbols: Vec<Option<FieldElement>> = received
            .iter()
            .map(|b| b.map(|b| FieldElement::Prime(u64::from(b & 1))))
            .collect();
        Ok(match decode(parity, sketch, &symbols)? {
            DecodeOutcome::Recovered(values) => DecodeOutcome::Recovered(
                values
                    .iter()
                    .map(|v| v.as_prime().unwrap_or(0) as u8)
                    .collect(),
            ),
            DecodeOutcome::Failed { reason, .. } => DecodeOutcome::Failed {
                received: received.to_vec(),
                reason,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitstream::Lfsr;
    use crate::channel::erase_positions;

    #[test]
    fn test_symbol_width() {
        assert_eq!(symbol_width(1), 1);
        assert_eq!(symbol_width(6), 2);
        assert_eq!(symbol_width(7), 3);
        assert_eq!(symbol_width(21), 3);
        assert_eq!(symbol_width(22), 4);
    }

    #[test]
    fn test_reed_solomon_shape() {
        let registry = FieldRegistry::new();
        let rs = ReedSolomonReconciler::new(&registry, 10, 2).unwrap();
        assert_eq!(rs.symbol_width(), 3);
        assert_eq!(rs.field().order(), 8);
        assert_eq!(rs.parity_matrix().rows(), 2);
        assert_eq!(rs.parity_matrix().cols(), 4);

        // t capped by the number of symbols
        let small = ReedSolomonReconciler::new(&registry, 3, 5).unwrap();
        assert_eq!(small.parity_matrix().rows(), 2);
    }

    #[test]
    fn test_reed_solomon_same_symbol_erasures() {
        let registry = FieldRegistry::new();
        let rs = ReedSolomonReconciler::new(&registry, 8, 2).unwrap();
        let bits = vec![0, 1, 1, 0, 1, 0, 0, 1];
        let sketch = rs.sketch(&bits).unwrap();
        let received = erase_positions(&bits, &[3, 4]).unwrap();
        assert_eq!(
            rs.reconcile(&sketch, &received).unwrap(),
            DecodeOutcome::Recovered(bits)
        );
    }

    #[test]
    fn test_reed_solomon_rejects_wrong_length() {
        let registry = FieldRegistry::new();
        let rs = ReedSolomonReconciler::new(&registry, 4, 1).unwrap();
        assert!(rs.sketch(&[1, 0]).is_err());
        assert!(ReedSolomonReconciler::new(&registry, 0, 1).is_err());
    }

    #[test]
    fn test_random_reconciler_recovers_with_lfsr() {
        let bits = vec![1, 0, 0, 1, 1, 0, 1, 0, 1, 1, 0, 0, 1, 0, 1, 1];
        let seed = [1, 0, 1, 1, 0, 0, 1, 0, 1, 0, 0, 1, 1, 1, 0, 1];
        let reconciler = RandomReconciler::new(2, 3).unwrap();
        assert_eq!(reconciler.rows(), 5);

        let mut sender = Lfsr::new(16, &seed).unwrap();
        let mut receiver = Lfsr::new(16, &seed).unwrap();
        let h_sender = reconciler.draw_parity(&mut sender).unwrap();
        let h_receiver = reconciler.draw_parity(&mut receiver).unwrap();
        assert_eq!(h_sender, h_receiver);

        let sketch = reconciler.sketch(&h_sender, &bits).unwrap();
        let received = erase_positions(&bits, &[2, 9]).unwrap();
        let outcome = reconciler.reconcile(&h_receiver, &sketch, &received).unwrap();
        let erased = h_receiver.select_columns(&[2, 9]).unwrap();
        assert_eq!(outcome.is_recovered(), erased.rank().unwrap() == 2);
        if let Some(recovered) = outcome.recovered() {
            assert_eq!(recovered, bits.as_slice());
        }
    }

    #[test]
    fn test_optimal_slack_constructor() {
        let reconciler = RandomReconciler::with_optimal_slack(3).unwrap();
        assert_eq!(reconciler.slack(), 2);
        assert_eq!(reconciler.rows(), 5);
    }
}
