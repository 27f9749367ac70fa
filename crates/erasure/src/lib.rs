// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Erasure reconciliation over finite fields.
//!
//! A sender holding a bit word `x` publishes the redundancy `s = H · x` for a
//! parity-check matrix `H`. A receiver holding `x` with some positions erased
//! recovers them by solving a small linear system over the erased columns of
//! `H` (see [`protocol`]).
//!
//! Two choices of `H` are provided:
//!
//! - [`ReedSolomonReconciler`]: bits are grouped into GF(2^m) symbols and `H` is
//!   the Reed-Solomon parity-check matrix. Any `t` erasures are recoverable.
//! - [`RandomReconciler`]: `H` is `t + d` rows of GF(2) bits drawn from a
//!   shared [`BitStream`]. Recovery can fail; [`cost`] picks the slack `d`.

pub mod bitstream;
pub mod channel;
pub mod cost;
pub mod errors;
pub mod protocol;
pub mod reconciler;
pub mod simulation;
pub mod word;

pub use bitstream::{BitStream, ChaChaStream, Lfsr, Rc4Stream};
pub use cost::{excess, failure_probability, full_rank_probability, optimal_slack, ErasureBudget};
pub use errors::{ErasureError, ErasureResult};
pub use protocol::{decode, redundancy, DecodeOutcome};
pub use reconciler::{RandomReconciler, ReedSolomonReconciler};
pub use simulation::{run_experiment, ExperimentConfig, ExperimentReport, GeneratorKind};
