use ndarray::{Array2, ArrayView1, ArrayView2, Axis};
use rayon::prelude::*;

use crate::dense::{euclidean, squared_euclidean};
use crate::SpectralError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KMeansConfig {
    pub max_iterations: usize,
    /// Clustering stops once no centroid moves further than this (Euclidean distance).
    pub tolerance: f64,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            max_iterations: 300,
            tolerance: 0.0,
        }
    }
}

impl KMeansConfig {
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KMeansResult {
    pub centroids: Array2<f64>,
    /// Cluster of every point in the last assignment step.
    pub labels: Vec<usize>,
    pub iterations: usize,
    pub converged: bool,
    /// Within-cluster sum of squared distances measured at each assignment step.
    pub inertia_history: Vec<f64>,
}

impl KMeansResult {
    pub fn inertia(&self) -> Option<f64> {
        self.inertia_history.last().copied()
    }

    /// Nearest final centroid for every row of `data`.
    pub fn predict(&self, data: ArrayView2<f64>) -> crate::Result<Vec<usize>> {
        if data.ncols() != self.centroids.ncols() {
            return Err(SpectralError::DimensionMismatch {
                expected: self.centroids.ncols(),
                found: data.ncols(),
            });
        }
        Ok(assign(data, self.centroids.view())
            .into_iter()
            .map(|(label, _)| label)
            .collect())
    }
}

/// Lloyd's algorithm started from caller supplied centroids.
#[derive(Debug, Clone, Default)]
pub struct KMeans {
    config: KMeansConfig,
}

impl KMeans {
    pub fn new(config: KMeansConfig) -> Self {
        KMeans { config }
    }

    pub fn config(&self) -> &KMeansConfig {
        &self.config
    }

    pub fn fit(
        &self,
        data: ArrayView2<f64>,
        initial_centroids: ArrayView2<f64>,
    ) -> crate::Result<KMeansResult> {
        let (n_samples, n_features) = data.dim();
        let k = initial_centroids.nrows();
        if n_samples == 0 || n_features == 0 {
            return Err(SpectralError::invalid_input("cannot cluster an empty matrix"));
        }
        if k == 0 || k >= n_samples {
            return Err(SpectralError::invalid_input(format!(
                "number of clusters must satisfy 1 <= k < {n_samples}, got {k}"
            )));
        }
        if initial_centroids.ncols() != n_features {
            return Err(SpectralError::DimensionMismatch {
                expected: n_features,
                found: initial_centroids.ncols(),
            });
        }

        let mut centroids = initial_centroids.to_owned();
        let mut labels = vec![0; n_samples];
        let mut inertia_history = Vec::new();
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.config.max_iterations {
            let assignment = assign(data, centroids.view());
            let inertia: f64 = assignment.iter().map(|&(_, d)| d).sum();
            if !inertia.is_finite() {
                return Err(SpectralError::computation(
                    "k-means produced a non-finite inertia",
                ));
            }
            inertia_history.push(inertia);
            labels = assignment.into_iter().map(|(label, _)| label).collect();

            let updated = update_centroids(data, &labels, centroids.view());
            let shift = centroids
                .rows()
                .into_iter()
                .zip(updated.rows())
                .map(|(old, new)| euclidean(old, new))
                .fold(0.0f64, f64::max);

            centroids = updated;
            iterations += 1;
            log::trace!("k-means iteration {iterations}: inertia {inertia:e}, max shift {shift:e}");

            if shift <= self.config.tolerance {
                converged = true;
                break;
            }
        }

        log::debug!(
            "k-means finished after {iterations} iterations (converged: {converged})"
        );

        Ok(KMeansResult {
            centroids,
            labels,
            iterations,
            converged,
            inertia_history,
        })
    }
}

/// Index of the closest centroid and the squared distance to it. Ties go to the lower index.
fn nearest(point: ArrayView1<f64>, centroids: ArrayView2<f64>) -> (usize, f64) {
    let mut best = (0, f64::INFINITY);
    for (idx, centroid) in centroids.rows().into_iter().enumerate() {
        let d = squared_euclidean(point, centroid);
        if d < best.1 {
            best = (idx, d);
        }
    }
    best
}

fn assign(data: ArrayView2<f64>, centroids: ArrayView2<f64>) -> Vec<(usize, f64)> {
    data.axis_iter(Axis(0))
        .into_par_iter()
        .map(|point| nearest(point, centroids))
        .collect()
}

/// Mean of the points in each cluster; an empty cluster keeps its previous centroid.
fn update_centroids(
    data: ArrayView2<f64>,
    labels: &[usize],
    previous: ArrayView2<f64>,
) -> Array2<f64> {
    let mut sums = Array2::<f64>::zeros(previous.raw_dim());
    let mut counts = vec![0usize; previous.nrows()];

    for (point, &label) in data.rows().into_iter().zip(labels) {
        let mut sum = sums.row_mut(label);
        sum += &point;
        counts[label] += 1;
    }

    for (idx, mut sum) in sums.rows_mut().into_iter().enumerate() {
        if counts[idx] == 0 {
            sum.assign(&previous.row(idx));
        } else {
            sum /= counts[idx] as f64;
        }
    }
    sums
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array1};

    fn two_pairs() -> Array2<f64> {
        array![[0.0, 0.0], [0.0, 1.0], [10.0, 0.0], [10.0, 1.0]]
    }

    #[test]
    fn test_separates_pairs() {
        let data = two_pairs();
        let init = array![[0.0, 1.0], [10.0, 1.0]];
        let result = KMeans::default().fit(data.view(), init.view()).unwrap();

        assert!(result.converged);
        assert_eq!(result.labels[0], result.labels[1]);
        assert_eq!(result.labels[2], result.labels[3]);
        assert_ne!(result.labels[0], result.labels[2]);

        let mut centers: Vec<Vec<f64>> = result
            .centroids
            .rows()
            .into_iter()
            .map(|r| r.to_vec())
            .collect();
        centers.sort_by(|a, b| a[0].total_cmp(&b[0]));
        assert_eq!(centers, vec![vec![0.0, 0.5], vec![10.0, 0.5]]);
    }

    #[test]
    fn test_single_cluster_is_global_mean() {
        let data = array![[1.0, 2.0], [3.0, 4.0], [5.0, 9.0]];
        let init = array![[1.0, 2.0]];
        let result = KMeans::default().fit(data.view(), init.view()).unwrap();

        let mean: Array1<f64> = data.mean_axis(Axis(0)).unwrap();
        assert_abs_diff_eq!(result.centroids.row(0).to_owned(), mean, epsilon = 1e-12);
        // one update to reach the mean, one pass confirming nothing moves
        assert_eq!(result.iterations, 2);
        assert_eq!(result.inertia_history.len(), 2);
        assert!(result.converged);
    }

    #[test]
    fn test_single_cluster_started_at_mean() {
        let data = array![[0.0], [2.0], [4.0]];
        let init = array![[2.0]];
        let result = KMeans::default().fit(data.view(), init.view()).unwrap();
        assert_eq!(result.iterations, 1);
        assert_eq!(result.centroids, array![[2.0]]);
    }

    #[test]
    fn test_empty_cluster_keeps_centroid() {
        let data = array![[0.0], [0.5], [1.0]];
        let init = array![[0.5], [100.0]];
        let result = KMeans::default().fit(data.view(), init.view()).unwrap();

        assert_eq!(result.centroids[(1, 0)], 100.0);
        assert!(result.centroids.iter().all(|v| v.is_finite()));
        assert_eq!(result.labels, vec![0, 0, 0]);
    }

    #[test]
    fn test_ties_go_to_lowest_index() {
        let centroids = array![[1.0], [-1.0]];
        let point = array![0.0];
        assert_eq!(nearest(point.view(), centroids.view()).0, 0);
    }

    #[test]
    fn test_inertia_non_increasing() {
        let data = array![
            [0.0, 0.0],
            [0.5, 0.2],
            [0.1, 0.9],
            [5.0, 5.0],
            [5.5, 4.8],
            [4.9, 5.6],
            [9.0, 0.0],
            [9.4, 0.3],
            [8.8, 0.5],
        ];
        let init = array![[0.0, 0.0], [0.5, 0.2], [0.1, 0.9]];
        let result = KMeans::default().fit(data.view(), init.view()).unwrap();

        assert!(result.inertia_history.len() >= 2);
        for pair in result.inertia_history.windows(2) {
            assert!(pair[1] <= pair[0] + 1e-12, "{:?}", result.inertia_history);
        }
    }

    #[test]
    fn test_reproducible() {
        let data = two_pairs();
        let init = array![[0.0, 0.0], [10.0, 1.0]];
        let a = KMeans::default().fit(data.view(), init.view()).unwrap();
        let b = KMeans::default().fit(data.view(), init.view()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_labels_stable_at_convergence() {
        let data = two_pairs();
        let init = array![[0.0, 0.0], [10.0, 0.0]];
        let result = KMeans::default().fit(data.view(), init.view()).unwrap();

        assert!(result.converged);
        assert_eq!(result.predict(data.view()).unwrap(), result.labels);
    }

    #[test]
    fn test_iteration_cap() {
        let data = two_pairs();
        let init = array![[0.0, 0.0], [0.0, 1.0]];
        let result = KMeans::new(KMeansConfig::default().max_iterations(1))
            .fit(data.view(), init.view())
            .unwrap();
        assert_eq!(result.iterations, 1);
        assert!(!result.converged);
    }

    #[test]
    fn test_accepts_k_one_less_than_n() {
        let data = array![[0.0], [1.0], [5.0]];
        let init = array![[0.0], [5.0]];
        assert!(KMeans::default().fit(data.view(), init.view()).is_ok());
    }

    #[test]
    fn test_invalid_inputs() {
        let data = two_pairs();
        let too_many = Array2::<f64>::zeros((4, 2));
        assert!(KMeans::default().fit(data.view(), too_many.view()).is_err());

        let wrong_width = Array2::<f64>::zeros((2, 3));
        assert!(matches!(
            KMeans::default().fit(data.view(), wrong_width.view()),
            Err(SpectralError::DimensionMismatch { expected: 2, found: 3 })
        ));

        let none = Array2::<f64>::zeros((0, 2));
        assert!(KMeans::default().fit(data.view(), none.view()).is_err());
    }
}
