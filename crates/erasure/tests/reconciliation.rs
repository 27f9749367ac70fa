// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::Result;
use gf_erasure::channel::{erase_exact, erase_positions, erased_positions};
use gf_erasure::word::{bits_to_symbols, random_bits, received_symbols};
use gf_erasure::{
    decode, redundancy, BitStream, ChaChaStream, DecodeOutcome, RandomReconciler,
    ReedSolomonReconciler,
};
use gf_field::{FieldRegistry, FiniteField};
use gf_parity_matrix::{
    bits_have_full_rank, build_parity_check_matrix, solve, Deficiency, Matrix, ReedSolomonConfig,
    Solution,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

/// Replays fixed rows, then zeros.
struct FixedRows {
    width: usize,
    rows: Vec<Vec<u8>>,
}

impl BitStream for FixedRows {
    fn width(&self) -> usize {
        self.width
    }

    fn next_block(&mut self) -> Vec<u8> {
        if self.rows.is_empty() {
            vec![0; self.width]
        } else {
            self.rows.remove(0)
        }
    }
}

#[test]
fn test_reed_solomon_round_trip_gf8() -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let subscriber = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let gf8 = FiniteField::new(8)?;
    let bits = vec![1, 0, 1, 1, 1, 0, 0];
    let word = bits_to_symbols(&bits, 3, &gf8)?;
    let h = build_parity_check_matrix(&gf8, ReedSolomonConfig { t: 2, n: word.len() })?;
    let sketch = redundancy(&h, &word)?;

    // bits 1 and 6 sit in symbols 0 and 2
    let received_bits = erase_positions(&bits, &[1, 6])?;
    let received = received_symbols(&received_bits, 3, &gf8)?;
    assert_eq!(erased_positions(&received), vec![0, 2]);
    assert_eq!(h.select_columns(&[0, 2])?.rank()?, 2);

    let outcome = decode(&h, &sketch, &received)?;
    assert_eq!(outcome, DecodeOutcome::Recovered(word));

    let registry = FieldRegistry::new();
    let reconciler = ReedSolomonReconciler::new(&registry, bits.len(), 2)?;
    let sketch = reconciler.sketch(&bits)?;
    assert_eq!(
        reconciler.reconcile(&sketch, &received_bits)?,
        DecodeOutcome::Recovered(bits)
    );
    Ok(())
}

#[test]
fn test_zero_row_with_nonzero_target_has_no_solution() -> Result<()> {
    let gf2 = FiniteField::new(2)?;
    let a = Matrix::from_integers(gf2.clone(), &[vec![1, 0], vec![0, 0]])?;
    let b = Matrix::from_integers(gf2, &[vec![1], vec![1]])?;
    assert!(matches!(solve(&a, &b)?, Solution::NoSolution(_)));
    Ok(())
}

#[test]
fn test_random_reconciler_failure_returns_received_word() -> Result<()> {
    let bits = vec![1, 0, 1, 1];
    let mut stream = FixedRows {
        width: 4,
        rows: vec![vec![1, 1, 0, 0], vec![1, 1, 1, 1]],
    };
    let reconciler = RandomReconciler::new(2, 0)?;
    let parity = reconciler.draw_parity(&mut stream)?;
    let sketch = reconciler.sketch(&parity, &bits)?;
    let received = erase_positions(&bits, &[0, 1])?;

    match reconciler.reconcile(&parity, &sketch, &received)? {
        DecodeOutcome::Failed {
            received: back,
            reason,
        } => {
            assert_eq!(back, received);
            assert_eq!(reason, Deficiency::RankDeficient { column: 1 });
        }
        other => panic!("dependent columns should not decode, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_erasures_beyond_row_count_fail() -> Result<()> {
    let bits = vec![0, 1, 1, 0, 1];
    let reconciler = RandomReconciler::new(1, 0)?;
    let mut stream = ChaChaStream::new(5, &[0, 1, 0, 1, 0])?;
    let parity = reconciler.draw_parity(&mut stream)?;
    let sketch = reconciler.sketch(&parity, &bits)?;
    let received = erase_positions(&bits, &[2, 3])?;
    assert!(!reconciler
        .reconcile(&parity, &sketch, &received)?
        .is_recovered());
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_random_decode_matches_rank(
        n in 2usize..24,
        t_share in 0.0f64..1.0,
        slack in 0usize..4,
        seed in any::<u64>(),
    ) {
        let t = ((n as f64) * t_share) as usize;
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let bits = random_bits(n, &mut rng);
        let stream_seed = random_bits(n, &mut rng);
        let mut stream = ChaChaStream::new(n, &stream_seed).unwrap();

        let reconciler = RandomReconciler::new(t, slack).unwrap();
        let parity = reconciler.draw_parity(&mut stream).unwrap();
        let sketch = reconciler.sketch(&parity, &bits).unwrap();
        let received = erase_exact(&bits, t, &mut rng).unwrap();
        let erased = erased_positions(&received);

        let columns: Vec<Vec<u8>> = parity
            .select_columns(&erased)
            .unwrap()
            .data()
            .iter()
            .map(|row| row.iter().map(|v| u8::from(!v.is_zero())).collect())
            .collect();
        let full_rank = erased.is_empty()
            || (parity.rows() >= erased.len() && bits_have_full_rank(&columns).unwrap());

        let outcome = reconciler.reconcile(&parity, &sketch, &received).unwrap();
        prop_assert_eq!(outcome.is_recovered(), full_rank);
        if let Some(recovered) = outcome.recovered() {
            prop_assert_eq!(recovered, bits.as_slice());
        }
    }

    #[test]
    fn prop_reed_solomon_recovers_up_to_t(
        n in 1usize..40,
        t_share in 0.0f64..1.0,
        seed in any::<u64>(),
    ) {
        let t = ((n as f64) * t_share) as usize;
        let registry = FieldRegistry::new();
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let bits = random_bits(n, &mut rng);
        let received = erase_exact(&bits, t, &mut rng).unwrap();

        let reconciler = ReedSolomonReconciler::new(&registry, n, t).unwrap();
        let sketch = reconciler.sketch(&bits).unwrap();
        let outcome = reconciler.reconcile(&sketch, &received).unwrap();
        prop_assert_eq!(outcome.into_recovered(), Some(bits));
    }
}
