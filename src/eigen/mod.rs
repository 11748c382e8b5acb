//! # Eigen decomposition of symmetric matrices
//!
//! [`jacobi::JacobiSolver`] produces an [`EigenDecomposition`]: the eigenvalues in the order
//! they appear on the diagonal of the rotated matrix, and the matching eigenvectors as the
//! columns of the accumulated rotation matrix.
//!
//! The `jacobi` goal prints a decomposition as one matrix ([`EigenDecomposition::to_matrix`]):
//! the first row holds the eigenvalues and row `i + 1` holds the eigenvector belonging to
//! eigenvalue `i`.

use ndarray::{s, Array1, Array2, ArrayView2};

use crate::SpectralError;

pub mod jacobi;

pub use jacobi::{JacobiConfig, JacobiSolver};

#[derive(Debug, Clone, PartialEq)]
pub struct EigenPair {
    pub value: f64,
    pub vector: Array1<f64>,
    /// Position of the pair in the unsorted decomposition.
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EigenDecomposition {
    eigenvalues: Array1<f64>,
    eigenvectors: Array2<f64>,
    rotations: usize,
    converged: bool,
}

impl EigenDecomposition {
    pub(crate) fn new(
        eigenvalues: Array1<f64>,
        eigenvectors: Array2<f64>,
        rotations: usize,
        converged: bool,
    ) -> Self {
        EigenDecomposition {
            eigenvalues,
            eigenvectors,
            rotations,
            converged,
        }
    }

    /// Parses the `jacobi` output layout back into a decomposition.
    pub fn from_matrix(matrix: ArrayView2<f64>) -> crate::Result<Self> {
        let (rows, cols) = matrix.dim();
        if cols == 0 || rows != cols + 1 {
            return Err(SpectralError::invalid_input(format!(
                "eigen matrix must be (n+1)xn, got {rows}x{cols}"
            )));
        }

        let eigenvalues = matrix.row(0).to_owned();
        let eigenvectors = matrix.slice(s![1.., ..]).t().to_owned();
        Ok(EigenDecomposition::new(eigenvalues, eigenvectors, 0, true))
    }

    pub fn to_matrix(&self) -> Array2<f64> {
        let n = self.len();
        let mut out = Array2::<f64>::zeros((n + 1, n));
        out.row_mut(0).assign(&self.eigenvalues);
        out.slice_mut(s![1.., ..]).assign(&self.eigenvectors.t());
        out
    }

    pub fn len(&self) -> usize {
        self.eigenvalues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.eigenvalues.is_empty()
    }

    pub fn eigenvalues(&self) -> &Array1<f64> {
        &self.eigenvalues
    }

    /// Eigenvectors as columns, column `i` belongs to `eigenvalues()[i]`.
    pub fn eigenvectors(&self) -> &Array2<f64> {
        &self.eigenvectors
    }

    pub fn rotations(&self) -> usize {
        self.rotations
    }

    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Pairs sorted by ascending eigenvalue. The sort is stable, so equal eigenvalues keep
    /// their original relative order.
    pub fn sorted_pairs(&self) -> Vec<EigenPair> {
        let mut pairs: Vec<EigenPair> = self
            .eigenvalues
            .iter()
            .enumerate()
            .map(|(index, &value)| EigenPair {
                value,
                vector: self.eigenvectors.column(index).to_owned(),
                index,
            })
            .collect();
        pairs.sort_by(|a, b| a.value.total_cmp(&b.value));
        pairs
    }
}
