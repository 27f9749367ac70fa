// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Gaussian elimination over a finite field: rank, determinant, inverse and
//! linear-system solving.

use crate::errors::{ParityMatrixError, ParityMatrixResult};
use crate::matrix_type::Matrix;
use gf_field::FieldElement;
use std::fmt;
use tracing::trace;

/// Why a linear system has no unique solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deficiency {
    /// Fewer equations than unknowns
    Underdetermined { rows: usize, cols: usize },
    /// No pivot in this column after elimination
    RankDeficient { column: usize },
    /// This equation reduced to `0 = c` with `c != 0`
    Inconsistent { row: usize },
}

impl fmt::Display for Deficiency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Deficiency::Underdetermined { rows, cols } => {
                write!(f, "underdetermined: {rows} equations in {cols} unknowns")
            }
            Deficiency::RankDeficient { column } => {
                write!(f, "rank deficient: no pivot in column {column}")
            }
            Deficiency::Inconsistent { row } => write!(f, "inconsistent equation in row {row}"),
        }
    }
}

/// Result of [`solve`]. Absence of a unique solution is an ordinary outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Solution {
    Unique(Vec<FieldElement>),
    NoSolution(Deficiency),
}

impl Solution {
    pub fn is_unique(&self) -> bool {
        matches!(self, Solution::Unique(_))
    }

    pub fn into_unique(self) -> Option<Vec<FieldElement>> {
        match self {
            Solution::Unique(values) => Some(values),
            Solution::NoSolution(_) => None,
        }
    }
}

impl Matrix {
    /// Move the first row at or below `from` with a nonzero entry in `col` up
    /// to `from`. Returns whether the rows were swapped, or `None` if the
    /// column has no candidate.
    fn seat_pivot(&mut self, from: usize, col: usize) -> Option<bool> {
        let found = (from..self.rows()).find(|&r| !self.entry(r, col).is_zero())?;
        if found != from {
            self.data_mut().swap(found, from);
        }
        Some(found != from)
    }

    /// Clear column `col` in every row except `row`, using the nonzero pivot
    /// at `(row, col)`.
    fn eliminate(&mut self, row: usize, col: usize) -> ParityMatrixResult<()> {
        let field = self.field().clone();
        let pivot_inverse = field.inv(self.entry(row, col))?;
        let pivot_row = self.data()[row].clone();
        for r in 0..self.rows() {
            if r == row || self.entry(r, col).is_zero() {
                continue;
            }
            let factor = field.mul(self.entry(r, col), &pivot_inverse)?;
            let target = &mut self.data_mut()[r];
            for (value, pivot_value) in target.iter_mut().zip(&pivot_row) {
                if pivot_value.is_zero() {
                    continue;
                }
                *value = field.sub(value, &field.mul(&factor, pivot_value)?)?;
            }
        }
        trace!("eliminated column {} with pivot row {}", col, row);
        Ok(())
    }

    /// One pivot step of Gaussian elimination at `(i, i)`.
    ///
    /// Every row other than `i` has `M[i,i]`-scaled multiples of row `i`
    /// subtracted so that column `i` becomes zero outside the pivot. A zero
    /// pivot leaves the matrix unchanged.
    pub fn reduce(&self, i: usize) -> ParityMatrixResult<Self> {
        if i >= self.rows() || i >= self.cols() {
            return Err(ParityMatrixError::out_of_bounds(
                i,
                self.rows().min(self.cols()),
                "pivot",
            ));
        }
        let mut reduced = self.clone();
        if !reduced.entry(i, i).is_zero() {
            reduced.eliminate(i, i)?;
        }
        Ok(reduced)
    }

    /// Number of linearly independent rows.
    pub fn rank(&self) -> ParityMatrixResult<usize> {
        let mut work = if self.rows() < self.cols() {
            self.transpose()
        } else {
            self.clone()
        };
        let mut pivots = 0;
        for col in 0..work.cols() {
            if pivots == work.rows() {
                break;
            }
            if work.seat_pivot(pivots, col).is_none() {
                continue;
            }
            work.eliminate(pivots, col)?;
            pivots += 1;
        }
        Ok(pivots)
    }

    fn ensure_square(&self, operation: &str) -> ParityMatrixResult<()> {
        if self.is_square() {
            Ok(())
        } else {
            Err(ParityMatrixError::shape_mismatch(format!(
                "{operation} requires a square matrix, got {}x{}",
                self.rows(),
                self.cols()
            )))
        }
    }

    /// Determinant by triangularization, tracking row swaps.
    pub fn det(&self) -> ParityMatrixResult<FieldElement> {
        self.ensure_square("determinant")?;
        let field = self.field().clone();
        let mut work = self.clone();
        let mut swaps = 0usize;
        for i in 0..work.rows() {
            match work.seat_pivot(i, i) {
                None => return Ok(field.zero()),
                Some(true) => swaps += 1,
                Some(false) => {}
            }
            work.eliminate(i, i)?;
        }
        let mut det = field.one();
        for i in 0..work.rows() {
            det = field.mul(&det, work.entry(i, i))?;
        }
        if swaps % 2 == 1 {
            det = field.neg(&det)?;
        }
        Ok(det)
    }

    /// Determinant by cofactor expansion along the first row.
    ///
    /// Factorial time; only for cross-checking [`Matrix::det`] on small inputs.
    pub fn slow_det(&self) -> ParityMatrixResult<FieldElement> {
        self.ensure_square("determinant")?;
        let field = self.field();
        match self.rows() {
            0 => Ok(field.one()),
            1 => Ok(self.entry(0, 0).clone()),
            n => {
                let mut det = field.zero();
                for j in 0..n {
                    if self.entry(0, j).is_zero() {
                        continue;
                    }
                    let term = field.mul(self.entry(0, j), &self.omit(0, j)?.slow_det()?)?;
                    det = if j % 2 == 0 {
                        field.add(&det, &term)?
                    } else {
                        field.sub(&det, &term)?
                    };
                }
                Ok(det)
            }
        }
    }

    /// Determinant of the matrix with row `i` and column `j` removed.
    pub fn minor(&self, i: usize, j: usize) -> ParityMatrixResult<FieldElement> {
        self.ensure_square("minor")?;
        self.omit(i, j)?.det()
    }

    /// `(-1)^(i+j)` times the `(i, j)` minor.
    pub fn cofactor(&self, i: usize, j: usize) -> ParityMatrixResult<FieldElement> {
        let minor = self.minor(i, j)?;
        if (i + j) % 2 == 0 {
            Ok(minor)
        } else {
            Ok(self.field().neg(&minor)?)
        }
    }

    pub fn cofactor_matrix(&self) -> ParityMatrixResult<Self> {
        self.ensure_square("cofactor matrix")?;
        let n = self.rows();
        let mut data = Vec::with_capacity(n);
        for i in 0..n {
            let row = (0..n)
                .map(|j| self.cofactor(i, j))
                .collect::<ParityMatrixResult<Vec<_>>>()?;
            data.push(row);
        }
        Ok(Matrix::from_parts(self.field().clone(), data, n, n))
    }

    /// Transpose of the cofactor matrix.
    pub fn adjugate(&self) -> ParityMatrixResult<Self> {
        Ok(self.cofactor_matrix()?.transpose())
    }

    /// Inverse by Cramer's rule, `det^-1 · adj(A)`.
    ///
    /// Recomputes a determinant per entry; only suitable for small matrices.
    /// A singular matrix fails with a division-by-zero field error.
    pub fn inverse(&self) -> ParityMatrixResult<Self> {
        let det = self.det()?;
        let det_inverse = self.field().inv(&det)?;
        self.adjugate()?.scale(&det_inverse)
    }
}

/// Solve `a · x = b` for a single column `b`.
///
/// Shape or field disagreements are errors. A system without a unique solution
/// yields [`Solution::NoSolution`] with the reason.
pub fn solve(a: &Matrix, b: &Matrix) -> ParityMatrixResult<Solution> {
    if a.field() != b.field() {
        return Err(ParityMatrixError::shape_mismatch(format!(
            "solve over {} with right-hand side over {}",
            a.field(),
            b.field()
        )));
    }
    if b.cols() != 1 {
        return Err(ParityMatrixError::dimension_mismatch(
            1,
            b.cols(),
            "right-hand side columns",
        ));
    }
    if a.rows() != b.rows() {
        return Err(ParityMatrixError::dimension_mismatch(
            a.rows(),
            b.rows(),
            "right-hand side rows",
        ));
    }

    let (m, n) = (a.rows(), a.cols());
    if m < n {
        return Ok(Solution::NoSolution(Deficiency::Underdetermined {
            rows: m,
            cols: n,
        }));
    }

    let mut work = a.augment(b)?;
    for i in 0..n {
        if work.seat_pivot(i, i).is_none() {
            return Ok(Solution::NoSolution(Deficiency::RankDeficient { column: i }));
        }
        work.eliminate(i, i)?;
    }

    // Every coefficient below row n is now zero.
    if let Some(row) = (n..m).find(|&r| !work.entry(r, n).is_zero()) {
        return Ok(Solution::NoSolution(Deficiency::Inconsistent { row }));
    }

    let field = a.field();
    let values = (0..n)
        .map(|i| field.div(work.entry(i, n), work.entry(i, i)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Solution::Unique(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gf_field::{FieldError, FiniteField};
    use proptest::prelude::*;
    use std::sync::Arc;

    fn gf(order: u64) -> Arc<FiniteField> {
        FiniteField::new(order).unwrap()
    }

    fn ints(field: &Arc<FiniteField>, rows: &[Vec<u64>]) -> Matrix {
        Matrix::from_integers(field.clone(), rows).unwrap()
    }

    fn by_index(field: &Arc<FiniteField>, rows: &[Vec<usize>]) -> Matrix {
        let elements: Vec<FieldElement> = field.elements().collect();
        let data = rows
            .iter()
            .map(|row| row.iter().map(|&i| elements[i % elements.len()].clone()).collect())
            .collect();
        Matrix::new(field.clone(), data).unwrap()
    }

    #[test]
    fn test_reduce_zeroes_pivot_column() {
        let f = gf(7);
        let m = ints(&f, &[vec![2, 1, 3], vec![4, 5, 6], vec![1, 0, 2]]);
        let r = m.reduce(0).unwrap();
        assert_eq!(r.row(0).unwrap(), m.row(0).unwrap());
        assert!(r.entry(1, 0).is_zero());
        assert!(r.entry(2, 0).is_zero());
    }

    #[test]
    fn test_reduce_with_zero_pivot_is_identity() {
        let f = gf(5);
        let m = ints(&f, &[vec![0, 1], vec![3, 4]]);
        assert_eq!(m.reduce(0).unwrap(), m);
        assert!(m.reduce(2).is_err());
    }

    #[test]
    fn test_rank() {
        let f = gf(2);
        assert_eq!(ints(&f, &[vec![1, 0], vec![0, 0]]).rank().unwrap(), 1);
        assert_eq!(ints(&f, &[vec![1, 1, 0], vec![0, 1, 1]]).rank().unwrap(), 2);
        assert_eq!(
            ints(&f, &[vec![1, 1], vec![1, 1], vec![0, 0]]).rank().unwrap(),
            1
        );
        // pivot column skipped in a tall matrix
        assert_eq!(
            ints(&f, &[vec![0, 1, 0], vec![0, 0, 1], vec![0, 1, 1], vec![0, 1, 0]])
                .rank()
                .unwrap(),
            2
        );
        assert_eq!(Matrix::zeros(f, 0, 3).rank().unwrap(), 0);
    }

    #[test]
    fn test_det_with_swaps() {
        let f = gf(7);
        // det [[0,1],[1,0]] = -1
        let m = ints(&f, &[vec![0, 1], vec![1, 0]]);
        assert_eq!(m.det().unwrap(), FieldElement::Prime(6));
        let singular = ints(&f, &[vec![1, 2], vec![2, 4]]);
        assert!(singular.det().unwrap().is_zero());
        assert!(ints(&f, &[vec![1, 2]]).det().is_err());
    }

    #[test]
    fn test_det_matches_slow_det() {
        let f = gf(5);
        let m = ints(&f, &[vec![2, 0, 1, 3], vec![1, 4, 0, 2], vec![0, 3, 3, 1], vec![4, 1, 2, 0]]);
        assert_eq!(m.det().unwrap(), m.slow_det().unwrap());
    }

    #[test]
    fn test_inverse() {
        let f = gf(7);
        let m = ints(&f, &[vec![2, 1, 0], vec![1, 3, 4], vec![0, 5, 6]]);
        let inv = m.inverse().unwrap();
        assert_eq!(m.mul(&inv).unwrap(), Matrix::identity(f.clone(), 3));
        assert_eq!(inv.mul(&m).unwrap(), Matrix::identity(f.clone(), 3));

        let singular = ints(&f, &[vec![1, 2], vec![2, 4]]);
        assert!(matches!(
            singular.inverse(),
            Err(ParityMatrixError::Field(FieldError::DivisionByZero { .. }))
        ));
    }

    #[test]
    fn test_adjugate() {
        let f = gf(11);
        let m = ints(&f, &[vec![1, 2], vec![3, 4]]);
        // adj [[a,b],[c,d]] = [[d,-b],[-c,a]]
        assert_eq!(m.adjugate().unwrap(), ints(&f, &[vec![4, 9], vec![8, 1]]));
    }

    #[test]
    fn test_solve_unique() {
        let f = gf(7);
        let a = ints(&f, &[vec![1, 2], vec![3, 4]]);
        let x = ints(&f, &[vec![5], vec![6]]);
        let b = a.mul(&x).unwrap();
        assert_eq!(
            solve(&a, &b).unwrap(),
            Solution::Unique(vec![FieldElement::Prime(5), FieldElement::Prime(6)])
        );
    }

    #[test]
    fn test_solve_rank_deficient() {
        let f = gf(2);
        let a = ints(&f, &[vec![1, 0], vec![0, 0]]);
        let b = ints(&f, &[vec![1], vec![1]]);
        let solution = solve(&a, &b).unwrap();
        assert!(!solution.is_unique());
        assert_eq!(
            solution,
            Solution::NoSolution(Deficiency::RankDeficient { column: 1 })
        );
    }

    #[test]
    fn test_solve_underdetermined() {
        let f = gf(2);
        let a = ints(&f, &[vec![1, 1]]);
        let b = ints(&f, &[vec![1]]);
        assert_eq!(
            solve(&a, &b).unwrap(),
            Solution::NoSolution(Deficiency::Underdetermined { rows: 1, cols: 2 })
        );
    }

    #[test]
    fn test_solve_overdetermined() {
        let f = gf(5);
        let a = ints(&f, &[vec![1, 0], vec![0, 1], vec![1, 1], vec![2, 1]]);
        let consistent = ints(&f, &[vec![2], vec![3], vec![0], vec![2]]);
        assert_eq!(
            solve(&a, &consistent).unwrap(),
            Solution::Unique(vec![FieldElement::Prime(2), FieldElement::Prime(3)])
        );
        // only the last of two extra equations disagrees
        let inconsistent = ints(&f, &[vec![2], vec![3], vec![0], vec![1]]);
        assert_eq!(
            solve(&a, &inconsistent).unwrap(),
            Solution::NoSolution(Deficiency::Inconsistent { row: 3 })
        );
    }

    #[test]
    fn test_solve_without_unknowns() {
        let f = gf(2);
        let a = Matrix::zeros(f.clone(), 2, 0);
        assert_eq!(
            solve(&a, &ints(&f, &[vec![0], vec![0]])).unwrap(),
            Solution::Unique(vec![])
        );
        assert!(!solve(&a, &ints(&f, &[vec![0], vec![1]])).unwrap().is_unique());
    }

    #[test]
    fn test_solve_shape_mismatch() {
        let f = gf(2);
        let a = ints(&f, &[vec![1, 0], vec![0, 1]]);
        assert!(matches!(
            solve(&a, &ints(&f, &[vec![1]])),
            Err(ParityMatrixError::ShapeMismatch { .. })
        ));
        assert!(matches!(
            solve(&a, &ints(&f, &[vec![1, 0], vec![0, 1]])),
            Err(ParityMatrixError::ShapeMismatch { .. })
        ));
        let other = Matrix::from_integers(gf(3), &[vec![1], vec![1]]).unwrap();
        assert!(matches!(
            solve(&a, &other),
            Err(ParityMatrixError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_solve_over_extension_field() {
        let f = gf(8);
        let a = by_index(&f, &[vec![1, 2, 3], vec![4, 5, 6], vec![7, 1, 2]]);
        assert!(!a.det().unwrap().is_zero());
        let x = by_index(&f, &[vec![3], vec![6], vec![5]]);
        let b = a.mul(&x).unwrap();
        let solution = solve(&a, &b).unwrap().into_unique().unwrap();
        assert_eq!(solution, x.column_values(0).unwrap());
    }

    fn square(order: u64, n: usize) -> impl Strategy<Value = Vec<Vec<usize>>> {
        prop::collection::vec(prop::collection::vec(0usize..order as usize, n), n)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_multiplication_is_associative(
            a in square(9, 3),
            b in square(9, 3),
            c in square(9, 3),
        ) {
            let f = gf(9);
            let (a, b, c) = (by_index(&f, &a), by_index(&f, &b), by_index(&f, &c));
            let left = a.mul(&b).unwrap().mul(&c).unwrap();
            let right = a.mul(&b.mul(&c).unwrap()).unwrap();
            prop_assert_eq!(left, right);
        }

        #[test]
        fn prop_inverse_of_nonsingular(a in square(4, 3)) {
            let f = gf(4);
            let a = by_index(&f, &a);
            prop_assume!(!a.det().unwrap().is_zero());
            let inverse = a.inverse().unwrap();
            prop_assert_eq!(a.mul(&inverse).unwrap(), Matrix::identity(f, 3));
        }

        #[test]
        fn prop_det_agrees_with_slow_det(a in square(5, 4)) {
            let f = gf(5);
            let a = by_index(&f, &a);
            prop_assert_eq!(a.det().unwrap(), a.slow_det().unwrap());
        }

        #[test]
        fn prop_reduce_clears_column(a in square(8, 4), i in 0usize..4) {
            let f = gf(8);
            let m = by_index(&f, &a);
            prop_assume!(!m.entry(i, i).is_zero());
            let r = m.reduce(i).unwrap();
            for row in 0..4 {
                if row != i {
                    prop_assert!(r.entry(row, i).is_zero());
                }
            }
        }

        #[test]
        fn prop_solve_recovers_solution(a in square(7, 3), x in prop::collection::vec(0u64..7, 3)) {
            let f = gf(7);
            let a = by_index(&f, &a);
            prop_assume!(!a.det().unwrap().is_zero());
            let x = Matrix::column(f.clone(), x.into_iter().map(FieldElement::Prime).collect()).unwrap();
            let b = a.mul(&x).unwrap();
            prop_assert_eq!(solve(&a, &b).unwrap(), Solution::Unique(x.column_values(0).unwrap()));
        }

        #[test]
        fn prop_overdetermined_solve_checks_every_extra_row(
            a in prop::collection::vec(prop::collection::vec(0usize..5, 3), 5),
            x in prop::collection::vec(0u64..5, 3),
            row in 3usize..5,
        ) {
            let f = gf(5);
            let a = by_index(&f, &a);
            prop_assume!(a.rank().unwrap() == 3);
            let x = Matrix::column(f.clone(), x.into_iter().map(FieldElement::Prime).collect()).unwrap();
            let b = a.mul(&x).unwrap();
            prop_assert_eq!(solve(&a, &b).unwrap(), Solution::Unique(x.column_values(0).unwrap()));

            let mut shifted = b.column_values(0).unwrap();
            shifted[row] = f.add(&shifted[row], &f.one()).unwrap();
            let shifted = Matrix::column(f.clone(), shifted).unwrap();
            let consistent = a.augment(&shifted).unwrap().rank().unwrap() == 3;
            prop_assert_eq!(solve(&a, &shifted).unwrap().is_unique(), consistent);
        }
    }
}
