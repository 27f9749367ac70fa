// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Integer helpers used to validate and decompose field orders.

use crate::errors::{FieldError, FieldResult};
use std::collections::BTreeMap;

/// Greatest common divisor.
pub fn gcd(a: u64, b: u64) -> u64 {
    num_integer::gcd(a, b)
}

/// Deterministic trial-division primality test.
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }
    let mut d = 5u64;
    while let Some(square) = d.checked_mul(d) {
        if square > n {
            break;
        }
        if n % d == 0 || n % (d + 2) == 0 {
            return false;
        }
        d += 6;
    }
    true
}

/// Smallest prime strictly greater than `n`, if one fits in a `u64`.
pub fn next_prime(n: u64) -> Option<u64> {
    let mut candidate = n.checked_add(1)?;
    while !is_prime(candidate) {
        candidate = candidate.checked_add(1)?;
    }
    Some(candidate)
}

/// Prime factorization as a map from prime to exponent.
pub fn prime_factor(mut n: u64) -> BTreeMap<u64, u32> {
    let mut factors = BTreeMap::new();
    let mut p = 2u64;
    while n > 1 {
        match p.checked_mul(p) {
            Some(square) if square <= n => {}
            _ => {
                *factors.entry(n).or_insert(0) += 1;
                break;
            }
        }
        while n % p == 0 {
            *factors.entry(p).or_insert(0) += 1;
            n /= p;
        }
        p += if p == 2 { 1 } else { 2 };
    }
    factors
}

/// Split `order` into `(p, m)` with `order = p^m`.
pub fn prime_power(order: u64) -> FieldResult<(u64, u32)> {
    if order < 2 {
        return Err(FieldError::invalid_order(order, "order must be at least 2"));
    }
    let factors = prime_factor(order);
    match factors.len() {
        1 => {
            let (&p, &m) = factors.iter().next().ok_or_else(|| {
                FieldError::invalid_order(order, "factorization produced no prime")
            })?;
            Ok((p, m))
        }
        _ => Err(FieldError::invalid_order(
            order,
            format!(
                "not a prime power (factors: {})",
                factors
                    .iter()
                    .map(|(p, e)| format!("{p}^{e}"))
                    .collect::<Vec<_>>()
                    .join(" * ")
            ),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_prime() {
        let primes: Vec<u64> = (0..30).filter(|&n| is_prime(n)).collect();
        assert_eq!(primes, vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
        assert!(is_prime(2_147_483_647));
        assert!(!is_prime(2_147_483_649));
    }

    #[test]
    fn test_next_prime() {
        assert_eq!(next_prime(1), Some(2));
        assert_eq!(next_prime(13), Some(17));
        assert_eq!(next_prime(u64::MAX), None);
    }

    #[test]
    fn test_prime_factor() {
        let factors = prime_factor(360);
        assert_eq!(factors.get(&2), Some(&3));
        assert_eq!(factors.get(&3), Some(&2));
        assert_eq!(factors.get(&5), Some(&1));
        assert_eq!(factors.len(), 3);
        assert!(prime_factor(1).is_empty());
    }

    #[test]
    fn test_prime_power() {
        assert_eq!(prime_power(2).unwrap(), (2, 1));
        assert_eq!(prime_power(8).unwrap(), (2, 3));
        assert_eq!(prime_power(9).unwrap(), (3, 2));
        assert_eq!(prime_power(125).unwrap(), (5, 3));
        assert!(matches!(
            prime_power(6),
            Err(FieldError::InvalidFieldOrder { order: 6, .. })
        ));
        assert!(prime_power(1).is_err());
        assert!(prime_power(0).is_err());
    }

    #[test]
    fn test_gcd() {
        assert_eq!(gcd(12, 18), 6);
        assert_eq!(gcd(7, 0), 7);
    }
}
