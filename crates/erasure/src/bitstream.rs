// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Pseudorandom bit streams driving the randomized parity check.
//!
//! Every generator is built from a block width and a seed, and produces one
//! block of `width` bits (each `0` or `1`) per call.

use crate::errors::{ErasureError, ErasureResult};
use gf_field::search::{next_primitive, primitive_taps};
use gf_field::{FiniteField, Polynomial, SearchConfig};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::collections::VecDeque;
use tracing::debug;

/// Source of fixed-width blocks of bits.
pub trait BitStream {
    /// Bits per block.
    fn width(&self) -> usize;

    /// Next block of exactly [`BitStream::width`] bits.
    fn next_block(&mut self) -> Vec<u8>;
}

impl<T: BitStream + ?Sized> BitStream for Box<T> {
    fn width(&self) -> usize {
        (**self).width()
    }

    fn next_block(&mut self) -> Vec<u8> {
        (**self).next_block()
    }
}

fn ensure_width(width: usize) -> ErasureResult<()> {
    if width == 0 {
        return Err(ErasureError::invalid_parameter(
            "bit stream width must be positive",
        ));
    }
    Ok(())
}

/// Fibonacci shift register over a primitive feedback polynomial.
///
/// Each step appends `parity(state & pattern)` and drops the oldest bit; the
/// whole register is the emitted block.
#[derive(Debug, Clone)]
pub struct Lfsr {
    pattern: Vec<u8>,
    state: Vec<u8>,
}

impl Lfsr {
    /// The seed is the initial register and must hold `width` bits, not all zero.
    pub fn new(width: usize, seed: &[u8]) -> ErasureResult<Self> {
        ensure_width(width)?;
        if seed.len() != width {
            return Err(ErasureError::invalid_seed(format!(
                "shift register of width {width} needs {width} seed bits, got {}",
                seed.len()
            )));
        }
        if seed.iter().any(|&b| b > 1) {
            return Err(ErasureError::invalid_seed("seed bits must be 0 or 1"));
        }
        if seed.iter().all(|&b| b == 0) {
            return Err(ErasureError::invalid_seed(
                "an all-zero register never leaves zero",
            ));
        }

        let mut pattern = vec![0u8; width];
        pattern[0] = 1;
        for tap in feedback_taps(width)? {
            pattern[tap] = 1;
        }
        Ok(Self {
            pattern,
            state: seed.to_vec(),
        })
    }
}

/// Middle exponents of a degree-`width` primitive polynomial over GF(2).
fn feedback_taps(width: usize) -> ErasureResult<Vec<usize>> {
    if let Some(taps) = primitive_taps(width as u32) {
        return Ok(taps.iter().map(|&t| t as usize).collect());
    }
    let gf2 = FiniteField::new(2)?;
    let start = Polynomial::x(gf2.clone()).shift(width - 1);
    let primitive = next_primitive(&start, &SearchConfig::default())?;
    debug!("searched feedback polynomial {} for width {}", primitive, width);
    Ok(primitive
        .terms()
        .keys()
        .copied()
        .filter(|&p| p > 0 && p < width)
        .collect())
}

impl BitStream for Lfsr {
    fn width(&self) -> usize {
        self.state.len()
    }

    fn next_block(&mut self) -> Vec<u8> {
        let bit = self
            .pattern
            .iter()
            .zip(&self.state)
            .fold(0u8, |acc, (p, s)| acc ^ (p & s));
        self.state.remove(0);
        self.state.push(bit);
        self.state.clone()
    }
}

/// RC4 keystream, emitted most significant bit first.
#[derive(Debug, Clone)]
pub struct Rc4Stream {
    width: usize,
    s: [u8; 256],
    i: u8,
    j: u8,
    pending: VecDeque<u8>,
}

impl Rc4Stream {
    /// The seed is the RC4 key: between 1 and `min(width, 256)` bytes.
    pub fn new(width: usize, seed: &[u8]) -> ErasureResult<Self> {
        ensure_width(width)?;
        if seed.is_empty() || seed.len() > width.min(256) {
            return Err(ErasureError::invalid_seed(format!(
                "RC4 key must hold between 1 and {} bytes, got {}",
                width.min(256),
                seed.len()
            )));
        }

        let mut s = [0u8; 256];
        for (k, slot) in s.iter_mut().enumerate() {
            *slot = k as u8;
        }
        let mut j = 0u8;
        for k in 0..256 {
            j = j.wrapping_add(s[k]).wrapping_add(seed[k % seed.len()]);
            s.swap(k, j as usize);
        }
        Ok(Self {
            width,
            s,
            i: 0,
            j: 0,
            pending: VecDeque::new(),
        })
    }

    fn next_byte(&mut self) -> u8 {
        self.i = self.i.wrapping_add(1);
        self.j = self.j.wrapping_add(self.s[self.i as usize]);
        self.s.swap(self.i as usize, self.j as usize);
        let k = self.s[self.i as usize].wrapping_add(self.s[self.j as usize]);
        self.s[k as usize]
    }
}

impl BitStream for Rc4Stream {
    fn width(&self) -> usize {
        self.width
    }

    fn next_block(&mut self) -> Vec<u8> {
        while self.pending.len() < self.width {
            let byte = self.next_byte();
            self.pending.extend((0..8).rev().map(|b| (byte >> b) & 1));
        }
        self.pending.drain(..self.width).collect()
    }
}

const SEED_MODULUS: u64 = 2_147_483_647;

/// Fold seed bits into an integer: `sum(2^i * seed[i] mod M) mod M` with `M = 2^31 - 1`.
pub fn fold_seed(seed: &[u8]) -> u64 {
    let mut weight = 1u64;
    let mut total = 0u64;
    for &s in seed {
        total = (total + (weight * u64::from(s)) % SEED_MODULUS) % SEED_MODULUS;
        weight = (weight * 2) % SEED_MODULUS;
    }
    total
}

/// ChaCha20 stream seeded from the folded seed.
#[derive(Debug, Clone)]
pub struct ChaChaStream {
    width: usize,
    rng: ChaCha20Rng,
}

impl ChaChaStream {
    /// The seed must hold `width` values.
    pub fn new(width: usize, seed: &[u8]) -> ErasureResult<Self> {
        ensure_width(width)?;
        if seed.len() != width {
            return Err(ErasureError::invalid_seed(format!(
                "ChaCha stream of width {width} needs {width} seed values, got {}",
                seed.len()
            )));
        }
        Ok(Self {
            width,
            rng: ChaCha20Rng::seed_from_u64(fold_seed(seed)),
        })
    }
}

impl BitStream for ChaChaStream {
    fn width(&self) -> usize {
        self.width
    }

    fn next_block(&mut self) -> Vec<u8> {
        (0..self.width).map(|_| self.rng.gen_range(0..=1u8)).collect()
    }
}
