// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Exact arithmetic over finite fields GF(p^m).
//!
//! Prime fields GF(p) use modular integers. Extension fields GF(p^m) use
//! polynomials over GF(p) reduced modulo an irreducible polynomial of degree `m`,
//! taken from a table of known GF(2) polynomials or found by exhaustive search.
//!
//! ## Construction order
//!
//! An extension field needs its modulus, and the modulus search needs the base
//! field. The base field is therefore always built first and shared by `Arc`;
//! [`FieldRegistry`] caches every field it builds so each order is constructed once.
//!
//! ## Bounded search
//!
//! Negation, inversion, primitive elements and moduli are found by walking
//! candidates in canonical order. [`SearchConfig`] caps every such walk.

pub mod config;
pub mod element;
pub mod errors;
pub mod field;
pub mod numbertheory;
pub mod polynomial;
pub mod registry;
pub mod search;

pub use config::SearchConfig;
pub use element::FieldElement;
pub use errors::{FieldError, FieldResult};
pub use field::{FieldElements, FiniteField};
pub use polynomial::Polynomial;
pub use registry::FieldRegistry;
