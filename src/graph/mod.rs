//! # Similarity graph
//!
//! Dense weighted adjacency (WAM) and diagonal degree (DDG) matrices built from raw
//! observations, plus the normalized graph Laplacian in [`laplacian`].
//!
//! Every observation is a node; every pair of distinct observations is connected with the
//! weight `exp(-‖x_i - x_j‖₂ / 2)`. The diagonal stays zero.

use ndarray::{Array2, ArrayView2, Axis};
use rayon::prelude::*;

use crate::similarity::{EuclideanSimilarity, SimilarityMeasure};
use crate::SpectralError;

pub mod laplacian;

pub use laplacian::normalized_laplacian;

/// WAM with the default Gaussian-style kernel (gamma = 1/2).
pub fn weighted_adjacency(observations: ArrayView2<f64>) -> crate::Result<Array2<f64>> {
    weighted_adjacency_with(observations, &EuclideanSimilarity::default())
}

pub fn weighted_adjacency_with<S>(
    observations: ArrayView2<f64>,
    similarity: &S,
) -> crate::Result<Array2<f64>>
where
    S: SimilarityMeasure,
{
    let (n_samples, n_features) = observations.dim();
    if n_samples == 0 || n_features == 0 {
        return Err(SpectralError::invalid_input(format!(
            "observations must be non-empty, got {n_samples}x{n_features}"
        )));
    }

    let mut wam = Array2::<f64>::zeros((n_samples, n_samples));

    // Each row only reads the observations, so rows can be filled independently.
    wam.axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(i, mut row)| {
            let row_i = observations.row(i);
            for j in 0..n_samples {
                if i != j {
                    row[j] = similarity.calculate(row_i, observations.row(j));
                }
            }
        });

    log::debug!("built {n_samples}x{n_samples} weighted adjacency matrix");
    Ok(wam)
}

/// DDG[i][i] = Σ_j WAM[i][j], zero elsewhere.
pub fn diagonal_degree(wam: ArrayView2<f64>) -> crate::Result<Array2<f64>> {
    let n = crate::dense::ensure_square(wam, "weighted adjacency matrix")?;
    let degrees = degree_vector(wam);
    let ddg = Array2::from_diag(&ndarray::Array1::from(degrees));
    debug_assert_eq!(ddg.dim(), (n, n));
    Ok(ddg)
}

pub(crate) fn degree_vector(wam: ArrayView2<f64>) -> Vec<f64> {
    wam.axis_iter(Axis(0)).map(|row| row.sum()).collect()
}
