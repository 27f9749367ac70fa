// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Reed-Solomon Parity Matrix CLI
//!
//! Builds the `t × n` Vandermonde parity-check matrix over GF(q), prints its rank
//! and checks that the leading `t` columns are linearly independent.

use clap::Parser;
use gf_field::{FieldRegistry, SearchConfig};
use gf_parity_matrix::utils::print_matrix;
use gf_parity_matrix::{
    build_parity_check_matrix_for_order, has_full_rank, ParityMatrixError, ReedSolomonConfig,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug, Clone)]
#[command(
    version,
    about = "Generate the Reed-Solomon parity-check matrix H[i][j] = alpha^(i*j) over GF(q) for a primitive element alpha."
)]
struct Args {
    /// Field order q (a prime power)
    #[arg(long, default_value_t = 8u64)]
    order: u64,

    /// Number of parity rows t
    #[arg(long, default_value_t = 3usize)]
    t: usize,

    /// Code length n
    #[arg(long, default_value_t = 5usize)]
    n: usize,

    /// Disable exhaustive modulus search for untabulated degrees
    #[arg(long, default_value_t = false)]
    table_only: bool,

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
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), ParityMatrixError> {
    let config = if args.table_only {
        SearchConfig::table_only()
    } else {
        SearchConfig::default()
    };
    let registry = FieldRegistry::with_config(config);
    let field = registry.get(args.order)?;

    println!("=== Reed-Solomon Parity Matrix ===");
    println!(
        "Field: {} (characteristic {}, degree {})",
        field,
        field.characteristic(),
        field.degree()
    );
    if let Some(modulus) = field.modulus() {
        println!("Modulus: {}", modulus);
    }
    let alpha = field.primitive_element()?;
    println!("Primitive element: {}", alpha);
    println!("Shape: {} x {}\n", args.t, args.n);

    let h = build_parity_check_matrix_for_order(
        &registry,
        args.order,
        ReedSolomonConfig {
            t: args.t,
            n: args.n,
        },
    )?;
    print_matrix("Parity Matrix H", &h);

    let rank = h.rank()?;
    println!("rank(H) = {}", rank);
    if field.order() == 2 {
        println!("binary full-rank test: {}", has_full_rank(&h)?);
    }

    if args.t <= args.n && args.t > 0 {
        let first: Vec<usize> = (0..args.t).collect();
        let window = h.select_columns(&first)?;
        let det = window.det()?;
        if det.is_zero() {
            println!("✗ First {} columns are dependent (det = 0)", args.t);
        } else {
            println!("✓ First {} columns are independent (det = {})", args.t, det);
        }
    }

    Ok(())
}
