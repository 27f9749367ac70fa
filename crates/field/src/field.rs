// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Finite fields GF(p^m).
//!
//! A prime field GF(p) works on integers modulo `p`. An extension field GF(p^m)
//! works on polynomials over GF(p) modulo a fixed irreducible polynomial of
//! degree `m`. Negation and inversion are found by exhaustive search over the
//! field's elements and memoized per field instance.

use crate::config::SearchConfig;
use crate::element::FieldElement;
use crate::errors::{FieldError, FieldResult};
use crate::numbertheory::{is_prime, prime_power};
use crate::polynomial::Polynomial;
use crate::search;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

enum Representation {
    Integers,
    Polynomials {
        base: Arc<FiniteField>,
        modulus: Polynomial,
    },
}

/// A finite field of order `p^m`.
///
/// Two fields compare equal iff their orders match.
pub struct FiniteField {
    characteristic: u64,
    degree: u32,
    order: u64,
    representation: Representation,
    config: SearchConfig,
    negations: Mutex<HashMap<FieldElement, FieldElement>>,
    inverses: Mutex<HashMap<FieldElement, FieldElement>>,
    primitive: Mutex<Option<FieldElement>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl FiniteField {
    /// Build GF(order) with the default search bounds.
    pub fn new(order: u64) -> FieldResult<Arc<Self>> {
        Self::with_config(order, SearchConfig::default())
    }

    pub fn with_config(order: u64, config: SearchConfig) -> FieldResult<Arc<Self>> {
        let (p, m) = prime_power(order)?;
        Self::from_parts_with_config(p, m, config)
    }

    /// Build GF(characteristic^degree).
    pub fn from_parts(characteristic: u64, degree: u32) -> FieldResult<Arc<Self>> {
        Self::from_parts_with_config(characteristic, degree, SearchConfig::default())
    }

    pub fn from_parts_with_config(
        characteristic: u64,
        degree: u32,
        config: SearchConfig,
    ) -> FieldResult<Arc<Self>> {
        let base = Self::prime_with_config(characteristic, config)?;
        match degree {
            0 => Err(FieldError::invalid_order(
                1,
                format!("extension degree of GF({characteristic}) must be positive"),
            )),
            1 => Ok(base),
            m => Self::extension_of(base, m, config),
        }
    }

    /// Build the prime field GF(p).
    pub fn prime(p: u64) -> FieldResult<Arc<Self>> {
        Self::prime_with_config(p, SearchConfig::default())
    }

    pub fn prime_with_config(p: u64, config: SearchConfig) -> FieldResult<Arc<Self>> {
        if !is_prime(p) {
            return Err(FieldError::invalid_order(p, "characteristic must be prime"));
        }
        Ok(Arc::new(Self::assemble(p, 1, p, Representation::Integers, config)))
    }

    /// Build GF(p^m) over an existing prime field, choosing the modulus from the
    /// tables or by search.
    pub fn extension_of(
        base: Arc<FiniteField>,
        degree: u32,
        config: SearchConfig,
    ) -> FieldResult<Arc<Self>> {
        if !base.is_prime_field() {
            return Err(FieldError::unimplemented(format!(
                "towers of extensions over {base}"
            )));
        }
        let modulus = search::find_modulus(&base, degree, &config)?;
        debug!("GF({}^{}) uses modulus {}", base.order, degree, modulus);
        Self::assemble_extension(base, modulus, config)
    }

    /// Build an extension from an explicit irreducible modulus over a prime field.
    pub fn with_modulus(modulus: Polynomial, config: SearchConfig) -> FieldResult<Arc<Self>> {
        let base = modulus.field().clone();
        if !base.is_prime_field() {
            return Err(FieldError::unimplemented(format!(
                "towers of extensions over {base}"
            )));
        }
        match modulus.degree() {
            Some(d) if d >= 2 => {}
            _ => {
                return Err(FieldError::invalid_order(
                    base.order,
                    format!("modulus {modulus} must have degree at least 2"),
                ))
            }
        }
        if !search::is_irreducible(&modulus, &config)? {
            return Err(FieldError::invalid_order(
                base.order,
                format!("modulus {modulus} is reducible"),
            ));
        }
        Self::assemble_extension(base, modulus, config)
    }

    fn assemble_extension(
        base: Arc<FiniteField>,
        modulus: Polynomial,
        config: SearchConfig,
    ) -> FieldResult<Arc<Self>> {
        let degree = modulus
            .degree()
            .and_then(|d| u32::try_from(d).ok())
            .ok_or_else(|| FieldError::unimplemented("modulus degree out of range"))?;
        let order = base.order.checked_pow(degree).ok_or_else(|| {
            FieldError::invalid_order(base.order, format!("{}^{degree} overflows u64", base.order))
        })?;
        let characteristic = base.characteristic;
        Ok(Arc::new(Self::assemble(
            characteristic,
            degree,
            order,
            Representation::Polynomials { base, modulus },
            config,
        )))
    }

    fn assemble(
        characteristic: u64,
        degree: u32,
        order: u64,
        representation: Representation,
        config: SearchConfig,
    ) -> Self {
        Self {
            characteristic,
            degree,
            order,
            representation,
            config,
            negations: Mutex::new(HashMap::new()),
            inverses: Mutex::new(HashMap::new()),
            primitive: Mutex::new(None),
        }
    }

    pub fn characteristic(&self) -> u64 {
        self.characteristic
    }

    pub fn degree(&self) -> u32 {
        self.degree
    }

    pub fn order(&self) -> u64 {
        self.order
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn is_prime_field(&self) -> bool {
        matches!(self.representation, Representation::Integers)
    }

    /// Base prime field of an extension; `None` for a prime field.
    pub fn base(&self) -> Option<&Arc<FiniteField>> {
        match &self.representation {
            Representation::Integers => None,
            Representation::Polynomials { base, .. } => Some(base),
        }
    }

    /// Reduction modulus of an extension; `None` for a prime field.
    pub fn modulus(&self) -> Option<&Polynomial> {
        match &self.representation {
            Representation::Integers => None,
            Representation::Polynomials { modulus, .. } => Some(modulus),
        }
    }

    /// Membership in canonical form: an integer below `p`, or a polynomial over
    /// the base field of degree below `m`.
    pub fn contains(&self, value: &FieldElement) -> bool {
        match (&self.representation, value) {
            (Representation::Integers, FieldElement::Prime(v)) => *v < self.order,
            (Representation::Polynomials { base, .. }, FieldElement::Extension(poly)) => {
                poly.field().as_ref() == base.as_ref()
                    && poly.degree().map_or(true, |d| d < self.degree as usize)
            }
            _ => false,
        }
    }

    pub fn ensure_contains(&self, value: &FieldElement) -> FieldResult<()> {
        if self.contains(value) {
            Ok(())
        } else {
            Err(FieldError::not_in_field(value, self))
        }
    }

    /// Map an integer or a polynomial over the base field to its canonical
    /// representative.
    pub fn reduce(&self, value: &FieldElement) -> FieldResult<FieldElement> {
        match (&self.representation, value) {
            (Representation::Integers, FieldElement::Prime(v)) => {
                Ok(FieldElement::Prime(v % self.order))
            }
            (Representation::Polynomials { base, modulus }, FieldElement::Extension(poly))
                if poly.field().as_ref() == base.as_ref() =>
            {
                Ok(FieldElement::Extension(poly.rem(modulus)?))
            }
            _ => Err(FieldError::not_in_field(value, self)),
        }
    }

    /// Element of a prime field from an integer in `[0, p)`.
    pub fn element(&self, value: u64) -> FieldResult<FieldElement> {
        let element = FieldElement::Prime(value);
        self.ensure_contains(&element)?;
        Ok(element)
    }

    /// Element of an extension field from a polynomial over the base field,
    /// reduced modulo the field modulus.
    pub fn element_from_polynomial(&self, poly: Polynomial) -> FieldResult<FieldElement> {
        self.reduce(&FieldElement::Extension(poly))
    }

    pub fn zero(&self) -> FieldElement {
        match &self.representation {
            Representation::Integers => FieldElement::Prime(0),
            Representation::Polynomials { base, .. } => {
                FieldElement::Extension(Polynomial::zero(base.clone()))
            }
        }
    }

    pub fn one(&self) -> FieldElement {
        match &self.representation {
            Representation::Integers => FieldElement::Prime(1),
            Representation::Polynomials { base, .. } => {
                FieldElement::Extension(Polynomial::one(base.clone()))
            }
        }
    }

    pub fn add(&self, a: &FieldElement, b: &FieldElement) -> FieldResult<FieldElement> {
        self.ensure_contains(a)?;
        self.ensure_contains(b)?;
        match (a, b) {
            (FieldElement::Prime(x), FieldElement::Prime(y)) => {
                let sum = (u128::from(*x) + u128::from(*y)) % u128::from(self.order);
                Ok(FieldElement::Prime(sum as u64))
            }
            (FieldElement::Extension(x), FieldElement::Extension(y)) => {
                Ok(FieldElement::Extension(x.add(y)?))
            }
            _ => Err(FieldError::incompatible("addition", a, b)),
        }
    }

    pub fn mul(&self, a: &FieldElement, b: &FieldElement) -> FieldResult<FieldElement> {
        self.ensure_contains(a)?;
        self.ensure_contains(b)?;
        match (&self.representation, a, b) {
            (Representation::Integers, FieldElement::Prime(x), FieldElement::Prime(y)) => {
                let product = u128::from(*x) * u128::from(*y) % u128::from(self.order);
                Ok(FieldElement::Prime(product as u64))
            }
            (
                Representation::Polynomials { modulus, .. },
                FieldElement::Extension(x),
                FieldElement::Extension(y),
            ) => Ok(FieldElement::Extension(x.mul(y)?.rem(modulus)?)),
            _ => Err(FieldError::incompatible("multiplication", a, b)),
        }
    }

    /// Additive inverse, found by search and memoized.
    pub fn neg(&self, a: &FieldElement) -> FieldResult<FieldElement> {
        self.ensure_contains(a)?;
        let zero = self.zero();
        self.search_counterpart(&self.negations, a, &zero, "negating", |x, y| {
            self.add(x, y)
        })
    }

    /// Multiplicative inverse, found by search and memoized.
    pub fn inv(&self, a: &FieldElement) -> FieldResult<FieldElement> {
        self.ensure_contains(a)?;
        if a.is_zero() {
            return Err(FieldError::division_by_zero(self));
        }
        let one = self.one();
        self.search_counterpart(&self.inverses, a, &one, "inverting", |x, y| {
            self.mul(x, y)
        })
    }

    /// Walk the elements until `combine(value, candidate) == target`.
    ///
    /// The relation is symmetric, so a hit is recorded for both `value` and the
    /// candidate: inverting `a` also answers the later query for `a^-1`.
    fn search_counterpart<F>(
        &self,
        cache: &Mutex<HashMap<FieldElement, FieldElement>>,
        value: &FieldElement,
        target: &FieldElement,
        context: &str,
        combine: F,
    ) -> FieldResult<FieldElement>
    where
        F: Fn(&FieldElement, &FieldElement) -> FieldResult<FieldElement>,
    {
        if let Some(hit) = lock(cache).get(value) {
            return Ok(hit.clone());
        }
        for (tested, candidate) in self.elements().enumerate() {
            if tested as u64 >= self.config.max_candidates {
                return Err(FieldError::search_limit(
                    self.config.max_candidates,
                    format!("{context} {value} in {self}"),
                ));
            }
            if combine(value, &candidate)? == *target {
                let mut cache = lock(cache);
                cache.insert(candidate.clone(), value.clone());
                cache.insert(value.clone(), candidate.clone());
                return Ok(candidate);
            }
        }
        Err(FieldError::not_in_field(
            format!("counterpart of {value}"),
            self,
        ))
    }

    pub fn sub(&self, a: &FieldElement, b: &FieldElement) -> FieldResult<FieldElement> {
        self.add(a, &self.neg(b)?)
    }

    pub fn div(&self, a: &FieldElement, b: &FieldElement) -> FieldResult<FieldElement> {
        self.mul(a, &self.inv(b)?)
    }

    /// Square-and-multiply exponentiation; `a^0` is one.
    pub fn pow(&self, a: &FieldElement, mut exponent: u64) -> FieldResult<FieldElement> {
        self.ensure_contains(a)?;
        let mut result = self.one();
        let mut square = a.clone();
        while exponent > 0 {
            if exponent & 1 == 1 {
                result = self.mul(&result, &square)?;
            }
            exponent >>= 1;
            if exponent > 0 {
                square = self.mul(&square, &square)?;
            }
        }
        Ok(result)
    }

    /// Lazy enumeration of all `order` elements, starting at zero.
    pub fn elements(&self) -> FieldElements<'_> {
        FieldElements {
            field: self,
            next: Some(self.zero()),
            remaining: self.order,
        }
    }

    /// The next element in enumeration order, wrapping to zero after the last.
    pub fn successor(&self, value: &FieldElement) -> FieldResult<FieldElement> {
        self.ensure_contains(value)?;
        Ok(self.step(value)?.0)
    }

    /// Advance one step; the flag reports wraparound to zero.
    pub(crate) fn step(&self, value: &FieldElement) -> FieldResult<(FieldElement, bool)> {
        match (&self.representation, value) {
            (Representation::Integers, FieldElement::Prime(v)) => {
                let next = v + 1;
                if next >= self.order {
                    Ok((FieldElement::Prime(0), true))
                } else {
                    Ok((FieldElement::Prime(next), false))
                }
            }
            (Representation::Polynomials { base, .. }, FieldElement::Extension(poly)) => {
                let next = poly.successor()?;
                if next.degree().map_or(false, |d| d >= self.degree as usize) {
                    Ok((FieldElement::Extension(Polynomial::zero(base.clone())), true))
                } else {
                    Ok((FieldElement::Extension(next), false))
                }
            }
            _ => Err(FieldError::not_in_field(value, self)),
        }
    }

    /// Order of `a` in the multiplicative group, by repeated multiplication.
    pub fn multiplicative_order(&self, a: &FieldElement) -> FieldResult<u64> {
        self.ensure_contains(a)?;
        if a.is_zero() {
            return Err(FieldError::division_by_zero(self));
        }
        let mut power = a.clone();
        let mut order = 1u64;
        while !power.is_one() {
            if order >= self.order || order >= self.config.max_candidates {
                return Err(FieldError::search_limit(
                    self.config.max_candidates,
                    format!("computing the order of {a} in {self}"),
                ));
            }
            power = self.mul(&power, a)?;
            order += 1;
        }
        Ok(order)
    }

    /// First element in enumeration order whose powers reach every nonzero
    /// element. Memoized.
    pub fn primitive_element(&self) -> FieldResult<FieldElement> {
        if let Some(alpha) = lock(&self.primitive).as_ref() {
            return Ok(alpha.clone());
        }
        let target = self.order - 1;
        for (tested, candidate) in self.elements().skip(1).enumerate() {
            if tested as u64 >= self.config.max_candidates {
                break;
            }
            if self.multiplicative_order(&candidate)? == target {
                debug!("primitive element of {} is {}", self, candidate);
                *lock(&self.primitive) = Some(candidate.clone());
                return Ok(candidate);
            }
        }
        Err(FieldError::search_limit(
            self.config.max_candidates,
            format!("searching for a primitive element of {self}"),
        ))
    }
}

impl PartialEq for FiniteField {
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order
    }
}

impl Eq for FiniteField {}

impl fmt::Display for FiniteField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GF({})", self.order)
    }
}

impl fmt::Debug for FiniteField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("FiniteField");
        out.field("characteristic", &self.characteristic)
            .field("degree", &self.degree)
            .field("order", &self.order);
        if let Some(modulus) = self.modulus() {
            out.field("modulus", &format_args!("{modulus}"));
        }
        out.finish()
    }
}

/// Iterator over the elements of a field, see [`FiniteField::elements`].
pub struct FieldElements<'a> {
    field: &'a FiniteField,
    next: Option<FieldElement>,
    remaining: u64,
}

impl Iterator for FieldElements<'_> {
    type Item = FieldElement;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.next.take()?;
        self.remaining -= 1;
        if self.remaining > 0 {
            self.next = self.field.step(&current).ok().map(|(next, _)| next);
        }
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}
