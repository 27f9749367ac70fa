// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Cost model for randomized reconciliation over GF(2).
//!
//! With `t` erasures and `c = t + d` random parity rows, decoding fails when the
//! `c × t` erased-column submatrix loses rank. Extra rows cost communication but
//! lower that probability; [`optimal_slack`] balances the two.

use crate::errors::{ErasureError, ErasureResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

fn half_pow(k: usize) -> f64 {
    0.5f64.powi(k.min(i32::MAX as usize) as i32)
}

/// Probability that `c` uniform vectors of `GF(2)^t` span the whole space,
/// `prod_{k<t} (1 - 2^-(c-k))`.
pub fn full_rank_probability(t: usize, c: usize) -> f64 {
    if c < t {
        return 0.0;
    }
    (0..t).map(|k| 1.0 - half_pow(c - k)).product()
}

/// Probability that a `(t + d) × t` random binary matrix has rank below `t`.
///
/// Exact at `d = 0`, a first-order estimate `2^-d (1 - 2^-t)` otherwise.
pub fn failure_probability(t: usize, d: usize) -> f64 {
    if d == 0 {
        return 1.0 - full_rank_probability(t, t);
    }
    half_pow(d) * (1.0 - half_pow(t))
}

/// Expected excess communication with slack `d`, counting retries on failure.
pub fn excess(t: usize, d: usize) -> f64 {
    let t_f = t as f64;
    if d == 0 {
        return t_f * ((1u128 << t.min(127)) as f64 - 1.0);
    }
    let miss = half_pow(d) * (1.0 - half_pow(t));
    (d as f64 + miss * t_f) / (1.0 - miss)
}

/// First `d` after which [`excess`] stops decreasing.
pub fn optimal_slack(t: usize) -> usize {
    if t == 0 {
        return 0;
    }
    let mut d = 0;
    while excess(t, d + 1) < excess(t, d) {
        d += 1;
    }
    d
}

/// How many erasures to budget for a word of `n` bits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErasureBudget {
    /// `t = ceil(f * n)`
    Ratio(f64),
    /// `t = ceil(log_b n)`
    Logarithm(f64),
}

const ROUNDING: f64 = 1e-9;

impl ErasureBudget {
    pub fn t_for(&self, n: usize) -> usize {
        let raw = match *self {
            ErasureBudget::Ratio(f) => f * n as f64,
            ErasureBudget::Logarithm(base) => {
                if n <= 1 {
                    return 0;
                }
                (n as f64).ln() / base.ln()
            }
        };
        ((raw - ROUNDING).ceil().max(0.0) as usize).min(n)
    }
}

impl fmt::Display for ErasureBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErasureBudget::Ratio(r) => write!(f, "ratio:{r}"),
            ErasureBudget::Logarithm(b) => write!(f, "log:{b}"),
        }
    }
}

impl FromStr for ErasureBudget {
    type Err = ErasureError;

    /// `ratio:<f>` with `f` in `[0, 1]`, or `log:<b>` with `b > 1`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, value) = s.split_once(':').ok_or_else(|| {
            ErasureError::invalid_parameter(format!(
                "erasure budget {s:?} must look like ratio:<f> or log:<b>"
            ))
        })?;
        let value: f64 = value.trim().parse().map_err(|_| {
            ErasureError::invalid_parameter(format!("erasure budget value {value:?} is not a number"))
        })?;
        match kind.trim() {
            "ratio" if (0.0..=1.0).contains(&value) => Ok(ErasureBudget::Ratio(value)),
            "log" if value > 1.0 => Ok(ErasureBudget::Logarithm(value)),
            "ratio" | "log" => Err(ErasureError::invalid_parameter(format!(
                "erasure budget {s:?} is out of range"
            ))),
            other => Err(ErasureError::invalid_parameter(format!(
                "unknown erasure budget kind {other:?}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_full_rank_probability() {
        assert!(close(full_rank_probability(1, 1), 0.5));
        assert!(close(full_rank_probability(2, 2), 0.375));
        assert!(close(full_rank_probability(0, 0), 1.0));
        assert_eq!(full_rank_probability(3, 2), 0.0);
        assert!(full_rank_probability(3, 6) > full_rank_probability(3, 4));
    }

    #[test]
    fn test_failure_probability() {
        assert!(close(failure_probability(2, 0), 0.625));
        assert!(close(failure_probability(3, 2), 0.25 * 0.875));
    }

    #[test]
    fn test_excess() {
        assert!(close(excess(3, 0), 21.0));
        assert!(close(excess(3, 1), 2.3125 / 0.5625));
        assert!(close(excess(0, 4), 4.0));
    }

    #[test]
    fn test_optimal_slack() {
        assert_eq!(optimal_slack(0), 0);
        assert_eq!(optimal_slack(1), 0);
        assert_eq!(optimal_slack(3), 2);
        let d = optimal_slack(10);
        assert!(excess(10, d) <= excess(10, d + 1));
        assert!(d == 0 || excess(10, d) < excess(10, d - 1));
    }

    #[test]
    fn test_budget_parse_and_apply() {
        let tenth: ErasureBudget = "ratio:0.1".parse().unwrap();
        assert_eq!(tenth, ErasureBudget::Ratio(0.1));
        assert_eq!(tenth.t_for(10), 1);
        assert_eq!(tenth.t_for(11), 2);
        assert_eq!(tenth.t_for(0), 0);

        let log2: ErasureBudget = "log:2".parse().unwrap();
        assert_eq!(log2.t_for(8), 3);
        assert_eq!(log2.t_for(9), 4);
        assert_eq!(log2.t_for(1), 0);
        assert_eq!(log2.to_string(), "log:2");

        assert!("ratio:2".parse::<ErasureBudget>().is_err());
        assert!("log:1".parse::<ErasureBudget>().is_err());
        assert!("half".parse::<ErasureBudget>().is_err());
        assert!("pow:2".parse::<ErasureBudget>().is_err());
    }
}
