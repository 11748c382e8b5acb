//! # Spectral embedding
//!
//! Picks the number of clusters (fixed, or from the largest eigengap) and projects every
//! observation onto the eigenvectors of the smallest eigenvalues. Each row of the resulting
//! matrix `T` is scaled to unit length.

use std::fmt;
use std::str::FromStr;

use ndarray::Array2;

use crate::eigen::EigenDecomposition;
use crate::utils::Normalize;
use crate::SpectralError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClusterCount {
    /// Let the eigengap heuristic decide.
    #[default]
    Auto,
    Fixed(usize),
}

impl From<usize> for ClusterCount {
    /// `0` is the command-line spelling of "auto".
    fn from(k: usize) -> Self {
        if k == 0 {
            ClusterCount::Auto
        } else {
            ClusterCount::Fixed(k)
        }
    }
}

impl FromStr for ClusterCount {
    type Err = SpectralError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("auto") {
            return Ok(ClusterCount::Auto);
        }
        s.parse::<usize>()
            .map(ClusterCount::from)
            .map_err(|_| SpectralError::invalid_input(format!("'{s}' is not a cluster count")))
    }
}

impl fmt::Display for ClusterCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClusterCount::Auto => write!(f, "auto"),
            ClusterCount::Fixed(k) => write!(f, "{k}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Embedding {
    matrix: Array2<f64>,
    k: usize,
}

impl Embedding {
    /// n x k, rows of unit length (or all zero).
    pub fn matrix(&self) -> &Array2<f64> {
        &self.matrix
    }

    pub fn into_matrix(self) -> Array2<f64> {
        self.matrix
    }

    pub fn k(&self) -> usize {
        self.k
    }
}

/// Index of the largest gap among the first ⌈n/2⌉ consecutive gaps of the ascending
/// `eigenvalues`, plus one. The first maximum wins on ties.
pub fn eigengap_heuristic(eigenvalues: &[f64]) -> crate::Result<usize> {
    let n = eigenvalues.len();
    if n < 2 {
        return Err(SpectralError::invalid_input(format!(
            "eigengap heuristic needs at least two eigenvalues, got {n}"
        )));
    }

    let limit = n.div_ceil(2).min(n - 1);
    let mut best_index = 0;
    let mut best_gap = f64::NEG_INFINITY;
    for i in 0..limit {
        let gap = (eigenvalues[i + 1] - eigenvalues[i]).abs();
        if gap > best_gap {
            best_gap = gap;
            best_index = i;
        }
    }

    log::debug!("eigengap heuristic picked k = {} (gap {best_gap:e})", best_index + 1);
    Ok(best_index + 1)
}

pub fn select_k_and_embed(
    eigen: &EigenDecomposition,
    requested: ClusterCount,
) -> crate::Result<Embedding> {
    let n = eigen.len();
    let pairs = eigen.sorted_pairs();

    let k = match requested {
        ClusterCount::Auto => {
            let values: Vec<f64> = pairs.iter().map(|p| p.value).collect();
            eigengap_heuristic(&values)?
        }
        ClusterCount::Fixed(k) => k,
    };
    if k == 0 || k >= n {
        return Err(SpectralError::invalid_input(format!(
            "number of clusters must satisfy 1 <= k < {n}, got {k}"
        )));
    }

    let mut matrix = Array2::<f64>::zeros((n, k));
    for (mut column, pair) in matrix.columns_mut().into_iter().zip(&pairs) {
        column.assign(&pair.vector);
    }

    let norms = matrix.row_norms();
    matrix.normalize_rows(&norms)?;

    Ok(Embedding { matrix, k })
}
