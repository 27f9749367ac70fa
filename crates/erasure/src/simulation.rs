// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Head-to-head runs of the Reed-Solomon and randomized reconcilers on the same
//! random words and erasure patterns.

use crate::bitstream::{BitStream, ChaChaStream, Lfsr, Rc4Stream};
use crate::channel::erase_exact;
use crate::errors::ErasureResult;
use crate::reconciler::{RandomReconciler, ReedSolomonReconciler};
use crate::word::random_bits;
use gf_field::FieldRegistry;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

/// Which bit stream drives the randomized parity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorKind {
    Lfsr,
    Rc4,
    Chacha,
}

/// Build a generator of `width`-bit blocks with a seed drawn from `rng`.
pub fn make_generator<R: Rng + ?Sized>(
    kind: GeneratorKind,
    width: usize,
    rng: &mut R,
) -> ErasureResult<Box<dyn BitStream>> {
    Ok(match kind {
        GeneratorKind::Lfsr => {
            let mut seed = random_bits(width, rng);
            if let Some(first) = seed.first_mut() {
                *first = 1;
            }
            Box::new(Lfsr::new(width, &seed)?)
        }
        GeneratorKind::Rc4 => {
            let key: Vec<u8> = (0..width.min(16)).map(|_| rng.gen()).collect();
            Box::new(Rc4Stream::new(width, &key)?)
        }
        GeneratorKind::Chacha => Box::new(ChaChaStream::new(width, &random_bits(width, rng))?),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Word length in bits
    pub n: usize,
    /// Erased bits per word
    pub t: usize,
    pub trials: usize,
    pub generator: GeneratorKind,
}

/// Timings in seconds; error rates are the fraction of trials not recovered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentReport {
    pub n: usize,
    pub t: usize,
    pub trials: usize,
    pub slack: usize,
    pub rs_time: f64,
    pub rs_error: f64,
    pub rn_time: f64,
    pub rn_error: f64,
}

impl ExperimentReport {
    pub const CSV_HEADER: &'static str = "N,T,CNT,RS_TIME,RS_ERR,RN_TIME,RN_ERR";

    pub fn to_csv_row(&self) -> String {
        format!(
            "{},{},{},{},{},{},{}",
            self.n, self.t, self.trials, self.rs_time, self.rs_error, self.rn_time, self.rn_error
        )
    }
}

/// Run `trials` reconciliations of random `n`-bit words with exactly `t`
/// erasures through both reconcilers.
///
/// The Reed-Solomon matrix is built once; the randomized matrix is redrawn for
/// every word from a single generator.
pub fn run_experiment<R: Rng + ?Sized>(
    registry: &FieldRegistry,
    config: &ExperimentConfig,
    rng: &mut R,
) -> ErasureResult<ExperimentReport> {
    let ExperimentConfig {
        n,
        t,
        trials,
        generator,
    } = *config;
    let mut words = Vec::with_capacity(trials);
    for _ in 0..trials {
        let bits = random_bits(n, rng);
        let received = erase_exact(&bits, t, rng)?;
        words.push((bits, received));
    }

    let rs = ReedSolomonReconciler::new(registry, n, t)?;
    let rn = RandomReconciler::with_optimal_slack(t)?;
    let mut stream = make_generator(generator, n, rng)?;
    let share = 1.0 / trials.max(1) as f64;

    let start = Instant::now();
    let mut rs_error = 0.0;
    for (bits, received) in &words {
        let sketch = rs.sketch(bits)?;
        if rs.reconcile(&sketch, received)?.recovered() != Some(bits.as_slice()) {
            rs_error += share;
        }
    }
    let rs_time = start.elapsed().as_secs_f64();

    let start = Instant::now();
    let mut rn_error = 0.0;
    for (bits, received) in &words {
        let parity = rn.draw_parity(&mut stream)?;
        let sketch = rn.sketch(&parity, bits)?;
        if rn.reconcile(&parity, &sketch, received)?.recovered() != Some(bits.as_slice()) {
            rn_error += share;
        }
    }
    let rn_time = start.elapsed().as_secs_f64();

    debug!(
        "n={} t={}: Reed-Solomon over GF(2^{}), random with {} rows",
        n,
        t,
        rs.symbol_width(),
        rn.rows()
    );
    info!("finished simulation for n = {}", n);
    Ok(ExperimentReport {
        n,
        t,
        trials,
        slack: rn.slack(),
        rs_time,
        rs_error,
        rn_time,
        rn_error,
    })
}
