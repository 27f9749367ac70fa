// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Erasure channel: positions are lost in transit and arrive as `None`.

use crate::errors::{ErasureError, ErasureResult};
use rand::seq::index::sample;
use rand::Rng;
use tracing::trace;

/// Erase the given positions.
pub fn erase_positions<T: Clone>(word: &[T], positions: &[usize]) -> ErasureResult<Vec<Option<T>>> {
    let mut received: Vec<Option<T>> = word.iter().cloned().map(Some).collect();
    for &p in positions {
        let slot = received.get_mut(p).ok_or_else(|| {
            ErasureError::invalid_parameter(format!(
                "erasure position {p} outside word of length {}",
                word.len()
            ))
        })?;
        *slot = None;
    }
    Ok(received)
}

/// Erase exactly `t` distinct positions chosen uniformly.
pub fn erase_exact<T: Clone, R: Rng + ?Sized>(
    word: &[T],
    t: usize,
    rng: &mut R,
) -> ErasureResult<Vec<Option<T>>> {
    if t > word.len() {
        return Err(ErasureError::invalid_parameter(format!(
            "cannot erase {t} positions of a word of length {}",
            word.len()
        )));
    }
    let positions = sample(rng, word.len(), t).into_vec();
    trace!("erasing positions {:?}", positions);
    erase_positions(word, &positions)
}

/// Erase each position independently with probability `p`.
pub fn erase_with_probability<T: Clone, R: Rng + ?Sized>(
    word: &[T],
    p: f64,
    rng: &mut R,
) -> ErasureResult<Vec<Option<T>>> {
    if !(0.0..=1.0).contains(&p) {
        return Err(ErasureError::invalid_parameter(format!(
            "erasure probability {p} is not in [0, 1]"
        )));
    }
    Ok(word
        .iter()
        .map(|v| {
            if rng.gen::<f64>() < p {
                None
            } else {
                Some(v.clone())
            }
        })
        .collect())
}

/// Indices of erased positions.
pub fn erased_positions<T>(received: &[Option<T>]) -> Vec<usize> {
    received
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.is_none().then_some(i))
        .collect()
}
