// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::polynomial::Polynomial;
use num_bigint::BigUint;
use std::fmt;

/// A member of some [`crate::FiniteField`].
///
/// Prime fields hold canonical integers in `[0, p)`. Extension fields hold
/// polynomials over their base field of degree below the extension degree.
/// The variant says nothing about *which* field an element belongs to; that is
/// checked by the field operations themselves.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FieldElement {
    Prime(u64),
    Extension(Polynomial),
}

impl FieldElement {
    pub fn is_zero(&self) -> bool {
        match self {
            FieldElement::Prime(v) => *v == 0,
            FieldElement::Extension(p) => p.is_zero(),
        }
    }

    pub fn is_one(&self) -> bool {
        match self {
            FieldElement::Prime(v) => *v == 1,
            FieldElement::Extension(p) => p.degree() == Some(0) && p.coefficient(0).is_one(),
        }
    }

    pub fn as_prime(&self) -> Option<u64> {
        match self {
            FieldElement::Prime(v) => Some(*v),
            FieldElement::Extension(_) => None,
        }
    }

    pub fn as_polynomial(&self) -> Option<&Polynomial> {
        match self {
            FieldElement::Prime(_) => None,
            FieldElement::Extension(p) => Some(p),
        }
    }

    /// Integer encoding used for ordering and enumeration.
    ///
    /// Prime elements encode as themselves; extension elements evaluate their
    /// polynomial at the base field's order.
    pub fn canonical_value(&self) -> BigUint {
        match self {
            FieldElement::Prime(v) => BigUint::from(*v),
            FieldElement::Extension(p) => p.canonical_value(),
        }
    }

    /// Low bits of the canonical encoding, for symbol packing over GF(2^m).
    pub fn to_bits(&self, width: usize) -> Vec<u8> {
        let value = self.canonical_value();
        (0..width)
            .map(|i| if value.bit(i as u64) { 1 } else { 0 })
            .collect()
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldElement::Prime(v) => write!(f, "{v}"),
            FieldElement::Extension(p) => write!(f, "{p}"),
        }
    }
}

impl From<Polynomial> for FieldElement {
    fn from(poly: Polynomial) -> Self {
        FieldElement::Extension(poly)
    }
}
