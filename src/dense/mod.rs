use ndarray::{Array2, ArrayView1, ArrayView2, Axis};

use crate::utils::Normalize;
use crate::SpectralError;

/// Builds a row-major matrix out of equally sized rows.
pub fn from_rows(rows: &[Vec<f64>]) -> crate::Result<Array2<f64>> {
    let n_rows = rows.len();
    if n_rows == 0 {
        return Err(SpectralError::invalid_input("matrix has no rows"));
    }
    let n_cols = rows[0].len();
    if n_cols == 0 {
        return Err(SpectralError::invalid_input("matrix has no columns"));
    }

    let mut values = Vec::with_capacity(n_rows * n_cols);
    for row in rows {
        if row.len() != n_cols {
            return Err(SpectralError::DimensionMismatch {
                expected: n_cols,
                found: row.len(),
            });
        }
        values.extend_from_slice(row);
    }

    Ok(Array2::from_shape_vec((n_rows, n_cols), values)?)
}

pub fn squared_euclidean(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let diff = x - y;
            diff * diff
        })
        .sum()
}

pub fn euclidean(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    squared_euclidean(a, b).sqrt()
}

/// Sum of squares of every entry outside the main diagonal.
pub fn off_diagonal_sq_sum(matrix: ArrayView2<f64>) -> f64 {
    matrix
        .indexed_iter()
        .filter(|((i, j), _)| i != j)
        .map(|(_, &v)| v * v)
        .sum()
}

/// Largest |A[i][j] - A[j][i]| over the matrix, `None` when it is not square.
pub fn max_asymmetry(matrix: ArrayView2<f64>) -> Option<f64> {
    let (rows, cols) = matrix.dim();
    if rows != cols {
        return None;
    }
    let mut worst = 0.0f64;
    for i in 0..rows {
        for j in (i + 1)..cols {
            worst = worst.max((matrix[(i, j)] - matrix[(j, i)]).abs());
        }
    }
    Some(worst)
}

pub fn ensure_square(matrix: ArrayView2<f64>, what: &str) -> crate::Result<usize> {
    let (rows, cols) = matrix.dim();
    if rows == 0 {
        return Err(SpectralError::invalid_input(format!("{what} is empty")));
    }
    if rows != cols {
        return Err(SpectralError::invalid_input(format!(
            "{what} must be square, got {rows}x{cols}"
        )));
    }
    Ok(rows)
}

impl Normalize for Array2<f64> {
    fn row_norms(&self) -> Vec<f64> {
        self.axis_iter(Axis(0))
            .map(|row| row.iter().map(|v| v * v).sum::<f64>().sqrt())
            .collect()
    }

    fn normalize_rows(&mut self, norms: &[f64]) -> crate::Result<()> {
        if norms.len() != self.nrows() {
            return Err(SpectralError::DimensionMismatch {
                expected: self.nrows(),
                found: norms.len(),
            });
        }

        for (mut row, &norm) in self.rows_mut().into_iter().zip(norms) {
            if norm != 0.0 {
                row /= norm;
            }
        }
        Ok(())
    }
}
