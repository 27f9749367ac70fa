// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use serde::{Deserialize, Serialize};

/// Bounds for the brute-force searches a field performs.
///
/// Negation, inversion and primitive-element discovery walk the field's elements,
/// and untabulated moduli are found by walking polynomials. Every such walk stops
/// after `max_candidates` steps with [`crate::FieldError::SearchLimitExceeded`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Consult the built-in modulus tables before searching
    pub use_table: bool,
    /// Fall back to exhaustive search for untabulated degrees
    pub allow_search: bool,
    /// Maximum number of candidates any single search may test
    pub max_candidates: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            use_table: true,
            allow_search: true,
            max_candidates: 1 << 24,
        }
    }
}

impl SearchConfig {
    /// Table lookups only; untabulated degrees are an error.
    pub fn table_only() -> Self {
        Self {
            allow_search: false,
            ..Self::default()
        }
    }

    /// Exhaustive search only, ignoring the tables.
    pub fn search_only() -> Self {
        Self {
            use_table: false,
            ..Self::default()
        }
    }

    pub fn with_max_candidates(mut self, max_candidates: u64) -> Self {
        self.max_candidates = max_candidates;
        self
    }
}
