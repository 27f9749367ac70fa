// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::element::FieldElement;
use crate::errors::{FieldError, FieldResult};
use crate::field::FiniteField;
use num_bigint::BigUint;
use num_traits::Zero;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A polynomial with coefficients in a finite field.
///
/// Terms are stored sparsely as power → nonzero coefficient; zero coefficients
/// never appear in the map. Every operation returns a new value.
#[derive(Clone)]
pub struct Polynomial {
    field: Arc<FiniteField>,
    terms: BTreeMap<usize, FieldElement>,
}

impl Polynomial {
    /// Create a polynomial from coefficients in ascending power order.
    ///
    /// # Arguments
    ///
    /// * `field` - Coefficient field
    /// * `coefficients` - `coefficients[i]` multiplies `x^i`
    pub fn new(field: Arc<FiniteField>, coefficients: Vec<FieldElement>) -> FieldResult<Self> {
        Self::from_terms(field, coefficients.into_iter().enumerate().collect())
    }

    /// Create a polynomial from a sparse power → coefficient map.
    pub fn from_terms(
        field: Arc<FiniteField>,
        terms: BTreeMap<usize, FieldElement>,
    ) -> FieldResult<Self> {
        for coefficient in terms.values() {
            field.ensure_contains(coefficient)?;
        }
        Ok(Self::from_reduced(field, terms))
    }

    /// Integer-to-polynomial conversion has no defined semantics.
    pub fn from_integer(field: Arc<FiniteField>, value: u64) -> FieldResult<Self> {
        Err(FieldError::unimplemented(format!(
            "conversion of integer {value} to a polynomial over {field}"
        )))
    }

    /// Build from coefficients already known to lie in `field`.
    pub(crate) fn from_reduced(
        field: Arc<FiniteField>,
        mut terms: BTreeMap<usize, FieldElement>,
    ) -> Self {
        terms.retain(|_, c| !c.is_zero());
        Self { field, terms }
    }

    pub fn zero(field: Arc<FiniteField>) -> Self {
        Self {
            field,
            terms: BTreeMap::new(),
        }
    }

    pub fn one(field: Arc<FiniteField>) -> Self {
        let one = field.one();
        Self::from_reduced(field, BTreeMap::from([(0, one)]))
    }

    /// The indeterminate `x`.
    pub fn x(field: Arc<FiniteField>) -> Self {
        let one = field.one();
        Self::from_reduced(field, BTreeMap::from([(1, one)]))
    }

    /// `coefficient * x^power`.
    pub fn monomial(
        field: Arc<FiniteField>,
        coefficient: FieldElement,
        power: usize,
    ) -> FieldResult<Self> {
        Self::from_terms(field, BTreeMap::from([(power, coefficient)]))
    }

    pub fn field(&self) -> &Arc<FiniteField> {
        &self.field
    }

    /// Highest power present; `None` for the zero polynomial.
    pub fn degree(&self) -> Option<usize> {
        self.terms.keys().next_back().copied()
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn is_monic(&self) -> bool {
        self.leading_coefficient().map_or(false, FieldElement::is_one)
    }

    /// Coefficient of `x^power`, zero when absent.
    pub fn coefficient(&self, power: usize) -> FieldElement {
        self.terms
            .get(&power)
            .cloned()
            .unwrap_or_else(|| self.field.zero())
    }

    pub fn leading_coefficient(&self) -> Option<&FieldElement> {
        self.terms.values().next_back()
    }

    pub fn terms(&self) -> &BTreeMap<usize, FieldElement> {
        &self.terms
    }

    /// Dense coefficients in ascending power order; empty for zero.
    pub fn to_dense(&self) -> Vec<FieldElement> {
        match self.degree() {
            None => Vec::new(),
            Some(d) => (0..=d).map(|i| self.coefficient(i)).collect(),
        }
    }

    fn ensure_same_field(&self, other: &Self, operation: &str) -> FieldResult<()> {
        if self.field == other.field {
            Ok(())
        } else {
            Err(FieldError::incompatible(
                operation,
                self.field.as_ref(),
                other.field.as_ref(),
            ))
        }
    }

    /// Add two polynomials.
    pub fn add(&self, other: &Self) -> FieldResult<Self> {
        self.ensure_same_field(other, "polynomial addition")?;
        let mut terms = self.terms.clone();
        for (power, coefficient) in &other.terms {
            let sum = match terms.get(power) {
                Some(existing) => self.field.add(existing, coefficient)?,
                None => coefficient.clone(),
            };
            terms.insert(*power, sum);
        }
        Ok(Self::from_reduced(self.field.clone(), terms))
    }

    /// Negate all coefficients.
    pub fn neg(&self) -> FieldResult<Self> {
        let terms = self
            .terms
            .iter()
            .map(|(power, c)| Ok((*power, self.field.neg(c)?)))
            .collect::<FieldResult<BTreeMap<_, _>>>()?;
        Ok(Self::from_reduced(self.field.clone(), terms))
    }

    /// Subtract two polynomials.
    pub fn sub(&self, other: &Self) -> FieldResult<Self> {
        self.ensure_same_field(other, "polynomial subtraction")?;
        self.add(&other.neg()?)
    }

    /// Multiply two polynomials.
    pub fn mul(&self, other: &Self) -> FieldResult<Self> {
        self.ensure_same_field(other, "polynomial multiplication")?;
        let mut terms: BTreeMap<usize, FieldElement> = BTreeMap::new();
        for (i, a) in &self.terms {
            for (j, b) in &other.terms {
                let product = self.field.mul(a, b)?;
                let accumulated = match terms.get(&(i + j)) {
                    Some(existing) => self.field.add(existing, &product)?,
                    None => product,
                };
                terms.insert(i + j, accumulated);
            }
        }
        Ok(Self::from_reduced(self.field.clone(), terms))
    }

    /// Multiply every coefficient by a field element.
    pub fn scale(&self, scalar: &FieldElement) -> FieldResult<Self> {
        self.field.ensure_contains(scalar)?;
        let terms = self
            .terms
            .iter()
            .map(|(power, c)| Ok((*power, self.field.mul(c, scalar)?)))
            .collect::<FieldResult<BTreeMap<_, _>>>()?;
        Ok(Self::from_reduced(self.field.clone(), terms))
    }

    /// Multiply by `x^k`.
    pub fn shift(&self, k: usize) -> Self {
        let terms = self
            .terms
            .iter()
            .map(|(power, c)| (power + k, c.clone()))
            .collect();
        Self {
            field: self.field.clone(),
            terms,
        }
    }

    /// Raise to a non-negative power by repeated multiplication.
    pub fn pow(&self, exponent: u32) -> FieldResult<Self> {
        let mut result = Self::one(self.field.clone());
        for _ in 0..exponent {
            result = result.mul(self)?;
        }
        Ok(result)
    }

    /// Polynomial long division.
    ///
    /// Returns `(quotient, remainder)` with `self = quotient * divisor + remainder`
    /// and the remainder of lower degree than the divisor.
    pub fn div_rem(&self, divisor: &Self) -> FieldResult<(Self, Self)> {
        self.ensure_same_field(divisor, "polynomial division")?;
        let (divisor_degree, lead) = match (divisor.degree(), divisor.leading_coefficient()) {
            (Some(d), Some(lead)) => (d, lead),
            _ => return Err(FieldError::division_by_zero(self.field.as_ref())),
        };
        let lead_inverse = self.field.inv(lead)?;

        let mut quotient = BTreeMap::new();
        let mut remainder = self.clone();
        while let (Some(degree), Some(top)) = (remainder.degree(), remainder.leading_coefficient())
        {
            if degree < divisor_degree {
                break;
            }
            let coefficient = self.field.mul(top, &lead_inverse)?;
            let shift = degree - divisor_degree;
            let subtrahend = divisor.scale(&coefficient)?.shift(shift);
            quotient.insert(shift, coefficient);
            remainder = remainder.sub(&subtrahend)?;
        }
        Ok((Self::from_reduced(self.field.clone(), quotient), remainder))
    }

    pub fn rem(&self, divisor: &Self) -> FieldResult<Self> {
        Ok(self.div_rem(divisor)?.1)
    }

    pub fn quotient(&self, divisor: &Self) -> FieldResult<Self> {
        Ok(self.div_rem(divisor)?.0)
    }

    /// Evaluate at a point of the coefficient field using Horner's rule.
    pub fn evaluate(&self, point: &FieldElement) -> FieldResult<FieldElement> {
        self.field.ensure_contains(point)?;
        let mut acc = self.field.zero();
        if let Some(degree) = self.degree() {
            for power in (0..=degree).rev() {
                acc = self.field.mul(&acc, point)?;
                if let Some(c) = self.terms.get(&power) {
                    acc = self.field.add(&acc, c)?;
                }
            }
        }
        Ok(acc)
    }

    /// Integer encoding: coefficients as digits in base `|F|`.
    pub fn canonical_value(&self) -> BigUint {
        let radix = BigUint::from(self.field.order());
        let mut value = BigUint::zero();
        if let Some(degree) = self.degree() {
            for power in (0..=degree).rev() {
                value *= &radix;
                if let Some(c) = self.terms.get(&power) {
                    value += c.canonical_value();
                }
            }
        }
        value
    }

    /// The polynomial whose canonical value is one greater.
    ///
    /// Increments the constant coefficient in its field and carries into the
    /// next power on every wraparound to zero.
    pub fn successor(&self) -> FieldResult<Self> {
        let mut terms = self.terms.clone();
        let mut power = 0;
        loop {
            let (next, wrapped) = self.field.step(&self.coefficient(power))?;
            if next.is_zero() {
                terms.remove(&power);
            } else {
                terms.insert(power, next);
            }
            if !wrapped {
                break;
            }
            power += 1;
        }
        Ok(Self {
            field: self.field.clone(),
            terms,
        })
    }

    /// Compare by canonical value; fails across coefficient fields.
    pub fn try_cmp(&self, other: &Self) -> FieldResult<Ordering> {
        self.ensure_same_field(other, "polynomial comparison")?;
        Ok(self.canonical_value().cmp(&other.canonical_value()))
    }
}

impl PartialEq for Polynomial {
    fn eq(&self, other: &Self) -> bool {
        self.field == other.field && self.terms == other.terms
    }
}

impl Eq for Polynomial {}

impl PartialOrd for Polynomial {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.try_cmp(other).ok()
    }
}

impl Hash for Polynomial {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.field.order().hash(state);
        self.terms.hash(state);
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "0");
        }

        let mut first = true;
        for (power, coeff) in self.terms.iter().rev() {
            if !first {
                write!(f, " + ")?;
            }
            first = false;

            let compound = matches!(coeff, FieldElement::Extension(p) if p.terms.len() > 1);
            if *power == 0 || !coeff.is_one() {
                if compound {
                    write!(f, "({coeff})")?;
                } else {
                    write!(f, "{coeff}")?;
                }
            }

            if *power > 0 {
                write!(f, "x")?;
                if *power > 1 {
                    write!(f, "^{power}")?;
                }
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Polynomial({}: {})", self.field, self)
    }
}
