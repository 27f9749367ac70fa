// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::errors::ParityMatrixResult;
use crate::matrix_type::Matrix;
use gf_field::{FieldRegistry, FiniteField};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Shape of a Reed-Solomon parity-check matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReedSolomonConfig {
    /// Number of parity rows, the erasures the code can recover
    pub t: usize,
    /// Code length in symbols
    pub n: usize,
}

/// Build the `t × n` Vandermonde parity-check matrix `H[i][j] = alpha^(i*j)`
/// for the field's primitive element `alpha`.
///
/// Column generators `alpha^j` are built by repeated multiplication, then each
/// row is the previous row multiplied column-wise by its generator, so no power
/// is computed from scratch. Any `t` columns are linearly independent as long as
/// `n <= q - 1`.
///
/// Row 0 is all ones. Exponents start at `i*j` rather than `(i+1)*j`; both
/// layouts give the same any-`t`-columns guarantee.
pub fn build_parity_check_matrix(
    field: &Arc<FiniteField>,
    config: ReedSolomonConfig,
) -> ParityMatrixResult<Matrix> {
    let ReedSolomonConfig { t, n } = config;
    if n as u64 > field.order() - 1 {
        warn!(
            "code length {} exceeds {} nonzero elements of {}; columns repeat",
            n,
            field.order() - 1,
            field
        );
    }
    let alpha = field.primitive_element()?;

    let mut generators = Vec::with_capacity(n);
    let mut power = field.one();
    for _ in 0..n {
        generators.push(power.clone());
        power = field.mul(&power, &alpha)?;
    }

    let mut data = Vec::with_capacity(t);
    if t > 0 {
        data.push(vec![field.one(); n]);
    }
    for i in 1..t {
        let row = data[i - 1]
            .iter()
            .zip(&generators)
            .map(|(above, g)| field.mul(above, g))
            .collect::<Result<Vec<_>, _>>()?;
        data.push(row);
    }

    debug!("built {}x{} parity-check matrix over {}", t, n, field);
    Ok(Matrix::from_parts(field.clone(), data, t, n))
}

/// As [`build_parity_check_matrix`], looking the field up by order.
pub fn build_parity_check_matrix_for_order(
    registry: &FieldRegistry,
    order: u64,
    config: ReedSolomonConfig,
) -> ParityMatrixResult<Matrix> {
    let field = registry.get(order)?;
    build_parity_check_matrix(&field, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::has_full_rank;
    use gf_field::FieldElement;

    #[test]
    fn test_vandermonde_structure_gf8() {
        let field = FiniteField::new(8).unwrap();
        let h = build_parity_check_matrix(&field, ReedSolomonConfig { t: 3, n: 5 }).unwrap();
        assert_eq!((h.rows(), h.cols()), (3, 5));
        let alpha = field.primitive_element().unwrap();
        for i in 0..3 {
            for j in 0..5 {
                let expected = field.pow(&alpha, (i * j) as u64).unwrap();
                assert_eq!(h.get(i, j).unwrap(), &expected, "H[{i}][{j}]");
            }
        }
    }

    #[test]
    fn test_any_t_columns_are_independent() {
        let field = FiniteField::new(16).unwrap();
        let t = 3;
        let h = build_parity_check_matrix(&field, ReedSolomonConfig { t, n: 15 }).unwrap();
        for a in 0..15 {
            for b in a + 1..15 {
                for c in b + 1..15 {
                    let sub = h.select_columns(&[a, b, c]).unwrap();
                    assert_eq!(sub.rank().unwrap(), t);
                }
            }
        }
    }

    #[test]
    fn test_prime_field_code() {
        let field = FiniteField::new(7).unwrap();
        let h = build_parity_check_matrix(&field, ReedSolomonConfig { t: 2, n: 6 }).unwrap();
        assert!(h.row(0).unwrap().iter().all(|v| *v == FieldElement::Prime(1)));
        // primitive element of GF(7) is 3
        assert_eq!(h.get(1, 1).unwrap(), &FieldElement::Prime(3));
        assert_eq!(h.get(1, 2).unwrap(), &FieldElement::Prime(2));
    }

    #[test]
    fn test_binary_code_from_registry() {
        let registry = FieldRegistry::new();
        let h = build_parity_check_matrix_for_order(&registry, 2, ReedSolomonConfig { t: 1, n: 4 })
            .unwrap();
        assert!(has_full_rank(&h).unwrap());
        assert!(registry.contains(2));
    }

    #[test]
    fn test_empty_code() {
        let field = FiniteField::new(4).unwrap();
        let h = build_parity_check_matrix(&field, ReedSolomonConfig { t: 0, n: 3 }).unwrap();
        assert_eq!((h.rows(), h.cols()), (0, 3));
    }
}
