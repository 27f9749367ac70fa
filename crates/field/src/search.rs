// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Irreducible and primitive polynomial lookup and search.
//!
//! GF(2) moduli come from two tables: irreducible trinomials `x^m + x^k + 1`
//! and primitive polynomials given by their middle taps. Every other case walks
//! polynomials in canonical order, bounded by [`SearchConfig::max_candidates`].

use crate::config::SearchConfig;
use crate::element::FieldElement;
use crate::errors::{FieldError, FieldResult};
use crate::field::FiniteField;
use crate::polynomial::Polynomial;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, trace};

/// Irreducible trinomials `x^m + x^k + 1` over GF(2), as `(m, k)`.
pub const IRREDUCIBLE_TRINOMIALS: &[(u32, u32)] = &[
    (2, 1),
    (3, 1),
    (4, 1),
    (5, 2),
    (6, 1),
    (7, 1),
    (9, 1),
    (10, 3),
    (11, 2),
    (12, 3),
    (14, 5),
    (15, 1),
    (17, 3),
    (18, 3),
    (20, 3),
    (21, 2),
    (22, 1),
    (23, 5),
    (25, 3),
    (28, 1),
    (29, 2),
    (30, 1),
    (31, 3),
    (33, 10),
    (34, 7),
    (35, 2),
    (36, 9),
    (39, 4),
    (41, 3),
    (42, 7),
    (44, 5),
    (46, 1),
    (47, 5),
    (49, 9),
    (52, 3),
    (60, 1),
    (71, 6),
    (73, 25),
    (81, 4),
    (90, 27),
    (100, 15),
    (110, 33),
    (121, 18),
    (130, 3),
    (140, 15),
    (150, 53),
    (161, 18),
    (170, 11),
    (180, 3),
    (191, 9),
    (201, 14),
    (250, 103),
    (300, 5),
    (350, 53),
    (401, 152),
    (450, 47),
    (500, 27),
    (550, 193),
    (601, 201),
    (650, 3),
    (700, 75),
    (750, 309),
    (801, 217),
    (850, 111),
    (900, 1),
    (951, 260),
    (1001, 17),
    (1050, 159),
    (1100, 35),
    (1151, 90),
    (1201, 171),
    (1252, 97),
    (1300, 75),
    (1350, 237),
    (1401, 92),
    (1452, 315),
    (1478, 69),
];

/// Primitive polynomials over GF(2): `x^m + sum(x^tap) + 1`, as `(m, taps)`.
pub const PRIMITIVE_TAPS: &[(u32, &[u32])] = &[
    (2, &[1]),
    (3, &[1]),
    (4, &[1]),
    (5, &[2]),
    (6, &[1]),
    (7, &[1]),
    (8, &[6, 5, 1]),
    (9, &[4]),
    (10, &[3]),
    (11, &[2]),
    (12, &[7, 4, 3]),
    (13, &[4, 3, 1]),
    (14, &[12, 11, 1]),
    (15, &[1]),
    (17, &[3]),
    (19, &[5, 2, 1]),
    (31, &[3]),
    (61, &[43, 26, 14]),
    (89, &[38]),
    (107, &[82, 57, 31]),
    (127, &[1]),
    (229, &[64, 63, 1]),
    (521, &[32]),
    (607, &[105]),
    (1279, &[216]),
    (2203, &[1656, 1197, 585]),
    (2281, &[715]),
    (3217, &[67]),
    (4253, &[3297, 2254, 1093]),
    (4423, &[271]),
    (9689, &[84]),
    (9941, &[7449, 4964, 2475]),
    (11213, &[8218, 6181, 2304]),
    (19937, &[881]),
    (21701, &[15986, 11393, 5073]),
    (23209, &[1530]),
    (44497, &[8575]),
];

pub fn trinomial_exponent(degree: u32) -> Option<u32> {
    IRREDUCIBLE_TRINOMIALS
        .iter()
        .find(|(m, _)| *m == degree)
        .map(|(_, k)| *k)
}

pub fn primitive_taps(degree: u32) -> Option<&'static [u32]> {
    PRIMITIVE_TAPS
        .iter()
        .find(|(m, _)| *m == degree)
        .map(|(_, taps)| *taps)
}

fn sparse_binary(base: &Arc<FiniteField>, powers: &[usize]) -> Polynomial {
    let terms: BTreeMap<usize, FieldElement> =
        powers.iter().map(|&p| (p, FieldElement::Prime(1))).collect();
    Polynomial::from_reduced(base.clone(), terms)
}

/// Tabulated degree-`degree` modulus over `base`, if one is known.
///
/// Only characteristic 2 is tabulated. Trinomials are preferred; otherwise the
/// primitive polynomial with the listed taps is used.
pub fn tabulated_modulus(base: &Arc<FiniteField>, degree: u32) -> Option<Polynomial> {
    if base.order() != 2 {
        return None;
    }
    let m = degree as usize;
    if let Some(k) = trinomial_exponent(degree) {
        return Some(sparse_binary(base, &[0, k as usize, m]));
    }
    primitive_taps(degree).map(|taps| {
        let mut powers: Vec<usize> = taps.iter().map(|&t| t as usize).collect();
        powers.extend([0, m]);
        sparse_binary(base, &powers)
    })
}

/// Choose the reduction modulus for GF(p^degree).
pub fn find_modulus(
    base: &Arc<FiniteField>,
    degree: u32,
    config: &SearchConfig,
) -> FieldResult<Polynomial> {
    if degree < 2 {
        return Err(FieldError::invalid_order(
            base.order(),
            format!("extension degree {degree} must be at least 2"),
        ));
    }
    if config.use_table {
        if let Some(modulus) = tabulated_modulus(base, degree) {
            return Ok(modulus);
        }
    }
    if config.allow_search {
        let start = Polynomial::x(base.clone()).shift(degree as usize - 1);
        return next_irreducible(&start, config);
    }
    Err(FieldError::unimplemented(format!(
        "no tabulated modulus of degree {degree} over {base} and search is disabled"
    )))
}

fn bump(
    tested: &mut u64,
    config: &SearchConfig,
    context: impl FnOnce() -> String,
) -> FieldResult<()> {
    *tested += 1;
    if *tested > config.max_candidates {
        return Err(FieldError::search_limit(config.max_candidates, context()));
    }
    Ok(())
}

/// Trial division by every monic polynomial of degree at most half.
///
/// The zero polynomial and nonzero constants are not irreducible.
pub fn is_irreducible(poly: &Polynomial, config: &SearchConfig) -> FieldResult<bool> {
    let degree = match poly.degree() {
        None | Some(0) => return Ok(false),
        Some(1) => return Ok(true),
        Some(d) => d,
    };
    if poly.coefficient(0).is_zero() {
        return Ok(false);
    }

    let field = poly.field();
    let mut candidate = Polynomial::x(field.clone()).add(&Polynomial::one(field.clone()))?;
    let mut tested = 0u64;
    while candidate.degree().map_or(false, |d| 2 * d <= degree) {
        bump(&mut tested, config, || format!("testing {poly} for irreducibility"))?;
        if candidate.is_monic() && poly.rem(&candidate)?.is_zero() {
            trace!("{} divides {}", candidate, poly);
            return Ok(false);
        }
        candidate = candidate.successor()?;
    }
    Ok(true)
}

/// First irreducible polynomial strictly greater than `poly`.
pub fn next_irreducible(poly: &Polynomial, config: &SearchConfig) -> FieldResult<Polynomial> {
    let mut candidate = poly.successor()?;
    let mut tested = 0u64;
    loop {
        bump(&mut tested, config, || format!("searching for an irreducible after {poly}"))?;
        if is_irreducible(&candidate, config)? {
            debug!("next irreducible after {} is {}", poly, candidate);
            return Ok(candidate);
        }
        candidate = candidate.successor()?;
    }
}

/// Irreducible, and `x` has multiplicative order `p^n - 1` modulo `poly`.
pub fn is_primitive(poly: &Polynomial, config: &SearchConfig) -> FieldResult<bool> {
    if !is_irreducible(poly, config)? {
        return Ok(false);
    }
    let degree = poly.degree().unwrap_or(0) as u32;
    let group_order = poly
        .field()
        .order()
        .checked_pow(degree)
        .map(|q| q - 1)
        .ok_or_else(|| FieldError::unimplemented(format!("order of x modulo {poly} overflows")))?;
    if group_order > config.max_candidates {
        return Err(FieldError::search_limit(
            config.max_candidates,
            format!("computing the order of x modulo {poly}"),
        ));
    }

    let field = poly.field();
    let x = Polynomial::x(field.clone());
    let one = Polynomial::one(field.clone());
    let mut power = x.rem(poly)?;
    for k in 1..=group_order {
        if power == one {
            return Ok(k == group_order);
        }
        power = power.mul(&x)?.rem(poly)?;
    }
    Ok(false)
}

/// First primitive polynomial strictly greater than `poly`.
pub fn next_primitive(poly: &Polynomial, config: &SearchConfig) -> FieldResult<Polynomial> {
    let mut candidate = poly.successor()?;
    let mut tested = 0u64;
    loop {
        bump(&mut tested, config, || format!("searching for a primitive after {poly}"))?;
        if is_primitive(&candidate, config)? {
            return Ok(candidate);
        }
        candidate = candidate.successor()?;
    }
}

/// Factor into monic irreducibles, smallest first.
///
/// A leftover non-unit leading coefficient is appended as a constant factor,
/// so the product of the result always equals `poly`.
pub fn factor(poly: &Polynomial, config: &SearchConfig) -> FieldResult<Vec<Polynomial>> {
    let field = poly.field();
    if poly.is_zero() {
        return Err(FieldError::unimplemented(format!(
            "factorization of the zero polynomial over {field}"
        )));
    }

    let mut factors = Vec::new();
    let mut rest = poly.clone();
    let x = Polynomial::x(field.clone());
    while rest.degree().map_or(false, |d| d > 0) && rest.coefficient(0).is_zero() {
        rest = rest.quotient(&x)?;
        factors.push(x.clone());
    }

    let mut candidate = x.add(&Polynomial::one(field.clone()))?;
    let mut tested = 0u64;
    while let Some(degree) = rest.degree() {
        if degree == 0 {
            break;
        }
        let candidate_degree = candidate.degree().unwrap_or(0);
        if 2 * candidate_degree > degree {
            let lead = rest.leading_coefficient().cloned().unwrap_or_else(|| field.one());
            let monic = rest.scale(&field.inv(&lead)?)?;
            factors.push(monic);
            rest = Polynomial::monomial(field.clone(), lead, 0)?;
            break;
        }
        bump(&mut tested, config, || format!("factoring {poly}"))?;
        if candidate.is_monic() {
            let (q, r) = rest.div_rem(&candidate)?;
            if r.is_zero() {
                factors.push(candidate.clone());
                rest = q;
                continue;
            }
        }
        candidate = candidate.successor()?;
    }

    if !rest.coefficient(0).is_one() {
        factors.push(rest);
    }
    Ok(factors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary(coefficients: &[u64]) -> Polynomial {
        let f = FiniteField::new(2).unwrap();
        Polynomial::new(f, coefficients.iter().map(|&c| FieldElement::Prime(c)).collect()).unwrap()
    }

    #[test]
    fn test_table_lookups() {
        assert_eq!(trinomial_exponent(10), Some(3));
        assert_eq!(trinomial_exponent(8), None);
        assert_eq!(primitive_taps(8), Some(&[6u32, 5, 1][..]));
        assert_eq!(primitive_taps(16), None);
    }

    #[test]
    fn test_tabulated_moduli_are_irreducible() {
        let base = FiniteField::new(2).unwrap();
        let config = SearchConfig::default();
        for degree in 2..=12 {
            if let Some(modulus) = tabulated_modulus(&base, degree) {
                assert_eq!(modulus.degree(), Some(degree as usize));
                assert!(is_irreducible(&modulus, &config).unwrap(), "{modulus}");
            }
        }
        assert!(tabulated_modulus(&FiniteField::new(3).unwrap(), 2).is_none());
    }

    #[test]
    fn test_tabulated_primitive_taps_are_primitive() {
        let base = FiniteField::new(2).unwrap();
        let config = SearchConfig::default();
        for degree in [2u32, 3, 4, 5, 8] {
            let taps = primitive_taps(degree).unwrap();
            let mut powers: Vec<usize> = taps.iter().map(|&t| t as usize).collect();
            powers.extend([0, degree as usize]);
            let poly = sparse_binary(&base, &powers);
            assert!(is_primitive(&poly, &config).unwrap(), "{poly}");
        }
    }

    #[test]
    fn test_is_irreducible() {
        let config = SearchConfig::default();
        assert!(is_irreducible(&binary(&[1, 1, 1]), &config).unwrap());
        assert!(!is_irreducible(&binary(&[1, 0, 1]), &config).unwrap());
        assert!(!is_irreducible(&binary(&[0, 1, 1]), &config).unwrap());
        assert!(is_irreducible(&binary(&[0, 1]), &config).unwrap());
        assert!(!is_irreducible(&binary(&[1]), &config).unwrap());
        // (x^2 + x + 1)^2
        assert!(!is_irreducible(&binary(&[1, 0, 1, 0, 1]), &config).unwrap());
    }

    #[test]
    fn test_next_irreducible() {
        let config = SearchConfig::default();
        let start = binary(&[0, 0, 0, 0, 1]);
        assert_eq!(next_irreducible(&start, &config).unwrap(), binary(&[1, 1, 0, 0, 1]));
    }

    #[test]
    fn test_is_primitive() {
        let config = SearchConfig::default();
        assert!(is_primitive(&binary(&[1, 1, 0, 0, 1]), &config).unwrap());
        // x^4 + x^3 + x^2 + x + 1 is irreducible but x has order 5
        let poly = binary(&[1, 1, 1, 1, 1]);
        assert!(is_irreducible(&poly, &config).unwrap());
        assert!(!is_primitive(&poly, &config).unwrap());
    }

    #[test]
    fn test_next_primitive() {
        let config = SearchConfig::default();
        let start = binary(&[0, 0, 0, 1]);
        assert_eq!(next_primitive(&start, &config).unwrap(), binary(&[1, 1, 0, 1]));
    }

    #[test]
    fn test_factor() {
        let config = SearchConfig::default();
        // x^3 + x = x (x + 1)^2
        let factors = factor(&binary(&[0, 1, 0, 1]), &config).unwrap();
        assert_eq!(factors, vec![binary(&[0, 1]), binary(&[1, 1]), binary(&[1, 1])]);
        let irreducible = binary(&[1, 1, 0, 1]);
        assert_eq!(factor(&irreducible, &config).unwrap(), vec![irreducible]);
        assert!(factor(&binary(&[]), &config).is_err());
    }

    #[test]
    fn test_factor_product_over_gf3() {
        let config = SearchConfig::default();
        let f = FiniteField::new(3).unwrap();
        let poly = Polynomial::new(
            f.clone(),
            [2u64, 0, 1, 2, 2]
                .iter()
                .map(|&c| FieldElement::Prime(c))
                .collect(),
        )
        .unwrap();
        let factors = factor(&poly, &config).unwrap();
        let product = factors
            .iter()
            .try_fold(Polynomial::one(f), |acc, p| acc.mul(p))
            .unwrap();
        assert_eq!(product, poly);
        for p in factors.iter().filter(|p| p.degree() > Some(0)) {
            assert!(is_irreducible(p, &config).unwrap());
        }
    }

    #[test]
    fn test_search_is_bounded() {
        let config = SearchConfig::default().with_max_candidates(1);
        let start = binary(&[0, 0, 0, 0, 0, 0, 0, 1]);
        assert!(matches!(
            next_irreducible(&start, &config),
            Err(FieldError::SearchLimitExceeded { .. })
        ));
    }
}
