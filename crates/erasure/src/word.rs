// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Bit words and their grouping into GF(2^m) symbols.

use crate::errors::{ErasureError, ErasureResult};
use gf_field::{FieldElement, FieldError, FiniteField, Polynomial};
use rand::Rng;
use std::sync::Arc;

/// `n` uniform bits.
pub fn random_bits<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<u8> {
    (0..n).map(|_| rng.gen_range(0..=1u8)).collect()
}

/// Weight of the word modulo 2.
pub fn parity(bits: &[u8]) -> u8 {
    (bits.iter().filter(|&&b| b > 0).count() & 1) as u8
}

/// Render bits as `0`/`1`, with `X` for an erasure.
pub fn format_bits(bits: &[Option<u8>]) -> String {
    bits.iter()
        .map(|b| match b {
            Some(0) => '0',
            Some(_) => '1',
            None => 'X',
        })
        .collect()
}

/// Inverse of [`format_bits`]; `X` or `x` marks an erasure.
pub fn parse_bits(text: &str) -> ErasureResult<Vec<Option<u8>>> {
    text.chars()
        .map(|c| match c {
            '0' => Ok(Some(0)),
            '1' => Ok(Some(1)),
            'X' | 'x' => Ok(None),
            other => Err(ErasureError::invalid_parameter(format!(
                "unexpected character {other:?} in bit string"
            ))),
        })
        .collect()
}

/// Hex rendering of each symbol's canonical value, zero-padded to `digits`.
///
/// Erased symbols print as `digits` dashes. Multi-digit symbols are separated by
/// a leading space.
pub fn hexify(symbols: &[Option<FieldElement>], digits: usize) -> String {
    let mut out = String::new();
    for symbol in symbols {
        if digits > 1 {
            out.push(' ');
        }
        match symbol {
            None => out.push_str(&"-".repeat(digits)),
            Some(value) => {
                let hex = value.canonical_value().to_str_radix(16);
                out.push_str(&"0".repeat(digits.saturating_sub(hex.len())));
                out.push_str(&hex);
            }
        }
    }
    out
}

fn ensure_binary_extension(m: usize, field: &FiniteField) -> ErasureResult<()> {
    if m == 0 || field.characteristic() != 2 || field.degree() as usize != m {
        return Err(FieldError::incompatible(
            format!("grouping bits into {m}-bit symbols"),
            field,
            format!("GF(2^{m})"),
        )
        .into());
    }
    Ok(())
}

fn block_to_symbol(block: &[u8], field: &Arc<FiniteField>) -> ErasureResult<FieldElement> {
    let Some(base) = field.base() else {
        return Ok(FieldElement::Prime(u64::from(block.first().copied().unwrap_or(0) & 1)));
    };
    let coefficients = block
        .iter()
        .map(|&b| FieldElement::Prime(u64::from(b & 1)))
        .collect();
    let poly = Polynomial::new(base.clone(), coefficients)?;
    Ok(field.element_from_polynomial(poly)?)
}

/// Group bits into `m`-bit blocks read as elements of GF(2^m).
///
/// The tail is zero-padded. Bit `i` of a block is the coefficient of `x^i`;
/// with `m = 1` the symbols are the bits themselves in GF(2).
pub fn bits_to_symbols(
    bits: &[u8],
    m: usize,
    field: &Arc<FiniteField>,
) -> ErasureResult<Vec<FieldElement>> {
    ensure_binary_extension(m, field)?;
    bits.chunks(m)
        .map(|chunk| {
            let mut block = chunk.to_vec();
            block.resize(m, 0);
            block_to_symbol(&block, field)
        })
        .collect()
}

/// As [`bits_to_symbols`] for a received word: a symbol is erased when any of
/// its bits is.
pub fn received_symbols(
    bits: &[Option<u8>],
    m: usize,
    field: &Arc<FiniteField>,
) -> ErasureResult<Vec<Option<FieldElement>>> {
    ensure_binary_extension(m, field)?;
    bits.chunks(m)
        .map(|chunk| {
            let block: Option<Vec<u8>> = chunk.iter().copied().collect();
            match block {
                Some(mut block) => {
                    block.resize(m, 0);
                    block_to_symbol(&block, field).map(Some)
                }
                None => Ok(None),
            }
        })
        .collect()
}

/// Unpack symbols into `m` bits each and keep the first `n` bits.
pub fn symbols_to_bits(symbols: &[FieldElement], m: usize, n: usize) -> Vec<u8> {
    let mut bits: Vec<u8> = symbols.iter().flat_map(|s| s.to_bits(m)).collect();
    bits.truncate(n);
    bits
}
