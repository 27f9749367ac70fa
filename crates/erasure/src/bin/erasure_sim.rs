// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Erasure Reconciliation Simulator
//!
//! Compares Reed-Solomon and randomized reconciliation over a range of word
//! lengths and prints one row per length.

use anyhow::{bail, Result};
use clap::Parser;
use gf_erasure::{run_experiment, ErasureBudget, ExperimentConfig, ExperimentReport, GeneratorKind};
use gf_field::FieldRegistry;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug, Clone)]
#[command(
    version,
    about = "Time Reed-Solomon against randomized erasure reconciliation on random words."
)]
struct Args {
    /// Shortest word length in bits
    #[arg(long, default_value_t = 2usize)]
    min_bits: usize,

    /// Longest word length in bits
    #[arg(long, default_value_t = 9usize)]
    max_bits: usize,

    /// Words per length
    #[arg(long, default_value_t = 10usize)]
    trials: usize,

    /// Erasures per word: ratio:<f> for ceil(f*n) or log:<b> for ceil(log_b n)
    #[arg(long, default_value = "ratio:0.1")]
    budget: ErasureBudget,

    /// Bit stream for the randomized parity check
    #[arg(long, value_enum, default_value_t = GeneratorKind::Chacha)]
    generator: GeneratorKind,

    /// Seed for words, erasures and generator seeds
    #[arg(long, default_value_t = 42u64)]
    seed: u64,

    /// Emit JSON lines instead of CSV
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Verbose per-step logging
    #[arg(long, default_value_t = false)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    if args.min_bits == 0 || args.min_bits > args.max_bits {
        bail!(
            "word lengths must satisfy 1 <= min-bits <= max-bits, got {}..={}",
            args.min_bits,
            args.max_bits
        );
    }
    let registry = FieldRegistry::new();
    let mut rng = ChaCha20Rng::seed_from_u64(args.seed);

    if !args.json {
        println!("{}", ExperimentReport::CSV_HEADER);
    }
    for n in args.min_bits..=args.max_bits {
        let config = ExperimentConfig {
            n,
            t: args.budget.t_for(n),
            trials: args.trials,
            generator: args.generator,
        };
        let report = run_experiment(&registry, &config, &mut rng)?;
        if args.json {
            println!("{}", serde_json::to_string(&report)?);
        } else {
            println!("{}", report.to_csv_row());
        }
    }
    Ok(())
}
