// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Matrices over a finite field with dimension validation.

use crate::errors::{ParityMatrixError, ParityMatrixResult};
use gf_field::{FieldElement, FieldError, FiniteField};
use std::fmt;
use std::sync::Arc;

/// A matrix with runtime-determined dimensions over a finite field.
///
/// Every element is a member of `field`; this is checked at construction.
/// Operations return new matrices and never mutate `self`.
///
/// # Example
///
/// ```
/// use gf_field::FiniteField;
/// use gf_parity_matrix::Matrix;
///
/// let gf2 = FiniteField::new(2).unwrap();
/// let matrix = Matrix::from_integers(gf2, &[vec![1, 0], vec![1, 1]]).unwrap();
/// assert_eq!(matrix.rows(), 2);
/// assert_eq!(matrix.cols(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Matrix {
    field: Arc<FiniteField>,
    data: Vec<Vec<FieldElement>>,
    rows: usize,
    cols: usize,
}

impl Matrix {
    /// Creates a matrix from rows of field elements.
    ///
    /// # Errors
    ///
    /// Returns an error if rows have inconsistent lengths or an element is not
    /// in `field`.
    pub fn new(field: Arc<FiniteField>, data: Vec<Vec<FieldElement>>) -> ParityMatrixResult<Self> {
        let rows = data.len();
        let cols = data.first().map_or(0, Vec::len);

        for (i, row) in data.iter().enumerate() {
            if row.len() != cols {
                return Err(ParityMatrixError::dimension_mismatch(
                    cols,
                    row.len(),
                    format!("columns in row {}", i),
                ));
            }
            for value in row {
                field.ensure_contains(value)?;
            }
        }

        Ok(Self {
            field,
            data,
            rows,
            cols,
        })
    }

    /// Creates a matrix over a prime field from integers in `[0, p)`.
    pub fn from_integers(field: Arc<FiniteField>, data: &[Vec<u64>]) -> ParityMatrixResult<Self> {
        let rows = data
            .iter()
            .map(|row| row.iter().map(|&v| field.element(v)).collect::<Result<Vec<_>, _>>())
            .collect::<Result<Vec<Vec<_>>, FieldError>>()?;
        Self::new(field, rows)
    }

    /// A `1 × n` matrix.
    pub fn from_row(field: Arc<FiniteField>, row: Vec<FieldElement>) -> ParityMatrixResult<Self> {
        Self::new(field, vec![row])
    }

    /// An `n × 1` matrix.
    pub fn column(field: Arc<FiniteField>, column: Vec<FieldElement>) -> ParityMatrixResult<Self> {
        Self::new(field, column.into_iter().map(|v| vec![v]).collect())
    }

    pub(crate) fn from_parts(
        field: Arc<FiniteField>,
        data: Vec<Vec<FieldElement>>,
        rows: usize,
        cols: usize,
    ) -> Self {
        Self {
            field,
            data,
            rows,
            cols,
        }
    }

    /// Creates a zero matrix of the specified dimensions.
    pub fn zeros(field: Arc<FiniteField>, rows: usize, cols: usize) -> Self {
        let zero = field.zero();
        Self::from_parts(field, vec![vec![zero; cols]; rows], rows, cols)
    }

    pub fn identity(field: Arc<FiniteField>, n: usize) -> Self {
        let mut matrix = Self::zeros(field, n, n);
        let one = matrix.field.one();
        for i in 0..n {
            matrix.data[i][i] = one.clone();
        }
        matrix
    }

    pub fn field(&self) -> &Arc<FiniteField> {
        &self.field
    }

    /// Returns the number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Returns a reference to the underlying data.
    pub fn data(&self) -> &[Vec<FieldElement>] {
        &self.data
    }

    pub fn get(&self, row: usize, col: usize) -> ParityMatrixResult<&FieldElement> {
        self.data
            .get(row)
            .ok_or_else(|| ParityMatrixError::out_of_bounds(row, self.rows, "row"))?
            .get(col)
            .ok_or_else(|| ParityMatrixError::out_of_bounds(col, self.cols, "column"))
    }

    pub fn row(&self, row: usize) -> ParityMatrixResult<&[FieldElement]> {
        self.data
            .get(row)
            .map(Vec::as_slice)
            .ok_or_else(|| ParityMatrixError::out_of_bounds(row, self.rows, "row"))
    }

    /// Entries of a single-column matrix, top to bottom.
    pub fn column_values(&self, col: usize) -> ParityMatrixResult<Vec<FieldElement>> {
        if col >= self.cols {
            return Err(ParityMatrixError::out_of_bounds(col, self.cols, "column"));
        }
        Ok(self.data.iter().map(|row| row[col].clone()).collect())
    }

    pub fn transpose(&self) -> Self {
        let data = (0..self.cols)
            .map(|j| self.data.iter().map(|row| row[j].clone()).collect())
            .collect();
        Self::from_parts(self.field.clone(), data, self.cols, self.rows)
    }

    /// The matrix with one row and one column removed.
    pub fn omit(&self, row: usize, col: usize) -> ParityMatrixResult<Self> {
        if row >= self.rows {
            return Err(ParityMatrixError::out_of_bounds(row, self.rows, "row"));
        }
        if col >= self.cols {
            return Err(ParityMatrixError::out_of_bounds(col, self.cols, "column"));
        }
        let data = self
            .data
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != row)
            .map(|(_, r)| {
                r.iter()
                    .enumerate()
                    .filter(|(j, _)| *j != col)
                    .map(|(_, v)| v.clone())
                    .collect()
            })
            .collect();
        Ok(Self::from_parts(
            self.field.clone(),
            data,
            self.rows - 1,
            self.cols - 1,
        ))
    }

    /// The submatrix made of the listed columns, in the given order.
    pub fn select_columns(&self, columns: &[usize]) -> ParityMatrixResult<Self> {
        if let Some(&bad) = columns.iter().find(|&&c| c >= self.cols) {
            return Err(ParityMatrixError::out_of_bounds(bad, self.cols, "column"));
        }
        let data = self
            .data
            .iter()
            .map(|row| columns.iter().map(|&c| row[c].clone()).collect())
            .collect();
        Ok(Self::from_parts(
            self.field.clone(),
            data,
            self.rows,
            columns.len(),
        ))
    }

    /// `[self | other]`, side by side.
    pub fn augment(&self, other: &Self) -> ParityMatrixResult<Self> {
        self.ensure_same_field(other, "augmentation")?;
        if self.rows != other.rows {
            return Err(ParityMatrixError::dimension_mismatch(
                self.rows,
                other.rows,
                "augmentation rows",
            ));
        }
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| a.iter().chain(b).cloned().collect())
            .collect();
        Ok(Self::from_parts(
            self.field.clone(),
            data,
            self.rows,
            self.cols + other.cols,
        ))
    }

    pub fn swap_rows(&self, i: usize, j: usize) -> ParityMatrixResult<Self> {
        for index in [i, j] {
            if index >= self.rows {
                return Err(ParityMatrixError::out_of_bounds(index, self.rows, "row"));
            }
        }
        let mut swapped = self.clone();
        swapped.data.swap(i, j);
        Ok(swapped)
    }

    pub(crate) fn ensure_same_field(&self, other: &Self, operation: &str) -> ParityMatrixResult<()> {
        if self.field == other.field {
            Ok(())
        } else {
            Err(FieldError::incompatible(
                format!("matrix {operation}"),
                self.field.as_ref(),
                other.field.as_ref(),
            )
            .into())
        }
    }

    fn ensure_same_shape(&self, other: &Self, operation: &str) -> ParityMatrixResult<()> {
        if self.rows == other.rows && self.cols == other.cols {
            Ok(())
        } else {
            Err(ParityMatrixError::shape_mismatch(format!(
                "{operation} of {}x{} and {}x{}",
                self.rows, self.cols, other.rows, other.cols
            )))
        }
    }

    fn zip_with<F>(&self, other: &Self, operation: &str, combine: F) -> ParityMatrixResult<Self>
    where
        F: Fn(&FieldElement, &FieldElement) -> Result<FieldElement, FieldError>,
    {
        self.ensure_same_field(other, operation)?;
        self.ensure_same_shape(other, operation)?;
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| a.iter().zip(b).map(|(x, y)| combine(x, y)).collect::<Result<Vec<_>, _>>())
            .collect::<Result<Vec<Vec<_>>, FieldError>>()?;
        Ok(Self::from_parts(self.field.clone(), data, self.rows, self.cols))
    }

    pub fn add(&self, other: &Self) -> ParityMatrixResult<Self> {
        self.zip_with(other, "addition", |x, y| self.field.add(x, y))
    }

    pub fn sub(&self, other: &Self) -> ParityMatrixResult<Self> {
        self.zip_with(other, "subtraction", |x, y| self.field.sub(x, y))
    }

    pub fn neg(&self) -> ParityMatrixResult<Self> {
        let data = self
            .data
            .iter()
            .map(|row| row.iter().map(|v| self.field.neg(v)).collect::<Result<Vec<_>, _>>())
            .collect::<Result<Vec<Vec<_>>, FieldError>>()?;
        Ok(Self::from_parts(self.field.clone(), data, self.rows, self.cols))
    }

    /// Matrix product `self · other`.
    pub fn mul(&self, other: &Self) -> ParityMatrixResult<Self> {
        self.ensure_same_field(other, "multiplication")?;
        if self.cols != other.rows {
            return Err(ParityMatrixError::shape_mismatch(format!(
                "multiplication of {}x{} by {}x{}",
                self.rows, self.cols, other.rows, other.cols
            )));
        }
        let mut data = Vec::with_capacity(self.rows);
        for row in &self.data {
            let mut out = Vec::with_capacity(other.cols);
            for j in 0..other.cols {
                let mut acc = self.field.zero();
                for (k, value) in row.iter().enumerate() {
                    if value.is_zero() {
                        continue;
                    }
                    let product = self.field.mul(value, &other.data[k][j])?;
                    acc = self.field.add(&acc, &product)?;
                }
                out.push(acc);
            }
            data.push(out);
        }
        Ok(Self::from_parts(self.field.clone(), data, self.rows, other.cols))
    }

    /// Multiply every entry by a scalar of the same field.
    pub fn scale(&self, scalar: &FieldElement) -> ParityMatrixResult<Self> {
        self.field.ensure_contains(scalar)?;
        let data = self
            .data
            .iter()
            .map(|row| row.iter().map(|v| self.field.mul(v, scalar)).collect::<Result<Vec<_>, _>>())
            .collect::<Result<Vec<Vec<_>>, FieldError>>()?;
        Ok(Self::from_parts(self.field.clone(), data, self.rows, self.cols))
    }

    pub fn is_zero(&self) -> bool {
        self.data.iter().flatten().all(FieldElement::is_zero)
    }

    pub(crate) fn entry(&self, row: usize, col: usize) -> &FieldElement {
        &self.data[row][col]
    }

    pub(crate) fn data_mut(&mut self) -> &mut Vec<Vec<FieldElement>> {
        &mut self.data
    }
}

impl PartialEq for Matrix {
    fn eq(&self, other: &Self) -> bool {
        self.field == other.field
            && self.rows == other.rows
            && self.cols == other.cols
            && self.data == other.data
    }
}

impl Eq for Matrix {}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.data.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "[")?;
            for (j, value) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{value}")?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}
