// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::matrix_type::Matrix;

/// Render a matrix with right-aligned columns, one row per line.
pub fn format_matrix(name: &str, matrix: &Matrix) -> String {
    let mut out = format!(
        "{} ({}x{}) over {}:\n",
        name,
        matrix.rows(),
        matrix.cols(),
        matrix.field()
    );

    // Determine max width for formatting
    let max_width = matrix
        .data()
        .iter()
        .flat_map(|row| row.iter())
        .map(|v| v.to_string().len())
        .max()
        .unwrap_or(1);

    for row in matrix.data() {
        out.push_str("  [");
        for (i, val) in row.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(&format!("{:>width$}", val.to_string(), width = max_width));
        }
        out.push_str("]\n");
    }
    out
}

pub fn print_matrix(name: &str, matrix: &Matrix) {
    println!("{}", format_matrix(name, matrix));
}

#[cfg(test)]
mod tests {
    use super::*;
    use gf_field::FiniteField;

    #[test]
    fn test_format_matrix_aligns_columns() {
        let gf4 = FiniteField::new(4).unwrap();
        let elements: Vec<_> = gf4.elements().collect();
        let m = Matrix::new(
            gf4.clone(),
            vec![
                vec![elements[1].clone(), elements[3].clone()],
                vec![elements[2].clone(), elements[0].clone()],
            ],
        )
        .unwrap();
        let text = format_matrix("M", &m);
        assert_eq!(
            text,
            "M (2x2) over GF(4):\n  [    1, x + 1]\n  [    x,     0]\n"
        );
    }
}
