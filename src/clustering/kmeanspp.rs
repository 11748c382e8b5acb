use ndarray::{Array2, ArrayView2};
use rand::distr::weighted::{Error as WeightError, WeightedIndex};
use rand::distr::Distribution;
use rand::Rng;

use crate::dense::squared_euclidean;
use crate::SpectralError;

/// Initial centroids and the rows they were copied from, in the order they were drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Seeding {
    pub centroids: Array2<f64>,
    pub indices: Vec<usize>,
}

/// k-means++ seeding: the first centroid is drawn uniformly, every further one with a
/// probability proportional to the squared distance to the closest centroid chosen so far.
#[derive(Debug, Clone)]
pub struct KMeansPlusPlus {
    k: usize,
}

impl KMeansPlusPlus {
    pub fn new(k: usize) -> Self {
        KMeansPlusPlus { k }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn seed<R>(&self, data: ArrayView2<f64>, rng: &mut R) -> crate::Result<Seeding>
    where
        R: Rng + ?Sized,
    {
        let (n_samples, n_features) = data.dim();
        if n_samples == 0 || n_features == 0 {
            return Err(SpectralError::invalid_input("cannot seed from an empty matrix"));
        }
        if self.k == 0 || self.k > n_samples {
            return Err(SpectralError::invalid_input(format!(
                "k-means++ needs 1 <= k <= {n_samples}, got {}",
                self.k
            )));
        }

        let mut indices = Vec::with_capacity(self.k);
        indices.push(rng.random_range(0..n_samples));

        // closest[j] is the squared distance from row j to its nearest chosen centroid
        let first = data.row(indices[0]);
        let mut closest: Vec<f64> = data
            .rows()
            .into_iter()
            .map(|row| squared_euclidean(row, first))
            .collect();

        while indices.len() < self.k {
            let next = match WeightedIndex::new(&closest) {
                Ok(dist) => dist.sample(rng),
                Err(WeightError::InsufficientNonZero) => {
                    log::warn!(
                        "all points coincide with the chosen centroids, falling back to uniform sampling"
                    );
                    rng.random_range(0..n_samples)
                }
                Err(e) => {
                    return Err(SpectralError::computation(format!(
                        "invalid k-means++ weights: {e}"
                    )))
                }
            };
            indices.push(next);

            let chosen = data.row(next);
            for (dist, row) in closest.iter_mut().zip(data.rows()) {
                *dist = (*dist).min(squared_euclidean(row, chosen));
            }
        }

        let mut centroids = Array2::<f64>::zeros((self.k, n_features));
        for (mut centroid, &idx) in centroids.rows_mut().into_iter().zip(&indices) {
            centroid.assign(&data.row(idx));
        }

        log::debug!("k-means++ picked rows {indices:?}");
        Ok(Seeding { centroids, indices })
    }
}
