//! # Normalized spectral clustering
//!
//! The four entry points used by the `spkmeans` binary:
//!
//! - [`apply_mat_op`]: one matrix stage (`wam`, `ddg`, `lnorm` or `jacobi`)
//! - [`prepare_embedding`]: sorted eigenvectors to the row-normalized matrix `T`
//! - [`run_kmeanspp_seed`]: k-means++ initial centroids on `T`
//! - [`run_kmeans`]: Lloyd iterations from those centroids
//!
//! [`SpectralClustering`] chains them into the complete `spk` run.
//!
//! ## Usage
//! ```no_run
//! use ndarray::array;
//! use single_spectral::{ClusterCount, SpectralClusteringBuilder};
//!
//! let observations = array![[0.0, 0.0], [0.0, 1.0], [10.0, 0.0], [10.0, 1.0]];
//! let result = SpectralClusteringBuilder::new()
//!     .n_clusters(ClusterCount::Fixed(2))
//!     .seed(0)
//!     .build()
//!     .fit(observations.view())?;
//! println!("{:?}", result.seed_indices);
//! # Ok::<(), single_spectral::SpectralError>(())
//! ```

use std::fmt;
use std::str::FromStr;

use ndarray::{Array2, ArrayView2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::clustering::{KMeans, KMeansConfig, KMeansPlusPlus, KMeansResult, Seeding};
use crate::eigen::{EigenDecomposition, JacobiConfig, JacobiSolver};
use crate::embedding::{select_k_and_embed, ClusterCount, Embedding};
use crate::graph::{diagonal_degree, laplacian, weighted_adjacency_with};
use crate::similarity::EuclideanSimilarity;
use crate::SpectralError;

/// Single matrix stages that can be requested on their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatOp {
    Wam,
    Ddg,
    Lnorm,
    Jacobi,
}

/// Everything the command line can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Goal {
    Matrix(MatOp),
    Spk,
}

impl MatOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatOp::Wam => "wam",
            MatOp::Ddg => "ddg",
            MatOp::Lnorm => "lnorm",
            MatOp::Jacobi => "jacobi",
        }
    }
}

impl FromStr for Goal {
    type Err = SpectralError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wam" => Ok(Goal::Matrix(MatOp::Wam)),
            "ddg" => Ok(Goal::Matrix(MatOp::Ddg)),
            "lnorm" => Ok(Goal::Matrix(MatOp::Lnorm)),
            "jacobi" => Ok(Goal::Matrix(MatOp::Jacobi)),
            "spk" => Ok(Goal::Spk),
            other => Err(SpectralError::invalid_input(format!("unknown goal '{other}'"))),
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Goal::Matrix(op) => write!(f, "{}", op.as_str()),
            Goal::Spk => write!(f, "spk"),
        }
    }
}

/// Runs one matrix stage with default settings.
///
/// For [`MatOp::Jacobi`] `data` is the symmetric input matrix itself and the result uses the
/// layout of [`EigenDecomposition::to_matrix`].
pub fn apply_mat_op(op: MatOp, data: ArrayView2<f64>) -> crate::Result<Array2<f64>> {
    apply_mat_op_with(
        op,
        data,
        &EuclideanSimilarity::default(),
        &JacobiSolver::default(),
    )
}

fn apply_mat_op_with(
    op: MatOp,
    data: ArrayView2<f64>,
    similarity: &EuclideanSimilarity,
    solver: &JacobiSolver,
) -> crate::Result<Array2<f64>> {
    match op {
        MatOp::Wam => weighted_adjacency_with(data, similarity),
        MatOp::Ddg => {
            let wam = weighted_adjacency_with(data, similarity)?;
            diagonal_degree(wam.view())
        }
        MatOp::Lnorm => {
            let wam = weighted_adjacency_with(data, similarity)?;
            let ddg = diagonal_degree(wam.view())?;
            laplacian::normalized_laplacian(wam.view(), ddg.view())
        }
        MatOp::Jacobi => Ok(solver.compute(data)?.to_matrix()),
    }
}

pub fn prepare_embedding(
    eigen: &EigenDecomposition,
    requested: ClusterCount,
) -> crate::Result<Array2<f64>> {
    Ok(select_k_and_embed(eigen, requested)?.into_matrix())
}

pub fn run_kmeanspp_seed<R>(
    k: usize,
    embedding: ArrayView2<f64>,
    rng: &mut R,
) -> crate::Result<Seeding>
where
    R: Rng + ?Sized,
{
    KMeansPlusPlus::new(k).seed(embedding, rng)
}

pub fn run_kmeans(
    embedding: ArrayView2<f64>,
    initial_centroids: ArrayView2<f64>,
    config: KMeansConfig,
) -> crate::Result<KMeansResult> {
    KMeans::new(config).fit(embedding, initial_centroids)
}

pub struct SpectralClusteringBuilder {
    n_clusters: ClusterCount,
    seed: u64,
    gamma: f64,
    jacobi: JacobiConfig,
    kmeans: KMeansConfig,
}

impl SpectralClusteringBuilder {
    pub fn new() -> Self {
        SpectralClusteringBuilder {
            n_clusters: ClusterCount::Auto,
            seed: 0,
            gamma: EuclideanSimilarity::default().gamma(),
            jacobi: JacobiConfig::default(),
            kmeans: KMeansConfig::default(),
        }
    }

    pub fn n_clusters(mut self, n_clusters: ClusterCount) -> Self {
        self.n_clusters = n_clusters;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn jacobi(mut self, jacobi: JacobiConfig) -> Self {
        self.jacobi = jacobi;
        self
    }

    pub fn kmeans(mut self, kmeans: KMeansConfig) -> Self {
        self.kmeans = kmeans;
        self
    }

    pub fn build(self) -> SpectralClustering {
        SpectralClustering {
            n_clusters: self.n_clusters,
            seed: self.seed,
            similarity: EuclideanSimilarity::new(self.gamma),
            solver: JacobiSolver::new(self.jacobi),
            kmeans: KMeans::new(self.kmeans),
        }
    }
}

impl Default for SpectralClusteringBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct SpectralResult {
    /// Number of clusters actually used (after the eigengap heuristic, if any).
    pub k: usize,
    /// Rows of the embedding picked by k-means++, in draw order.
    pub seed_indices: Vec<usize>,
    pub eigen: EigenDecomposition,
    pub embedding: Embedding,
    pub clustering: KMeansResult,
}

impl SpectralResult {
    pub fn centroids(&self) -> &Array2<f64> {
        &self.clustering.centroids
    }

    pub fn labels(&self) -> &[usize] {
        &self.clustering.labels
    }
}

#[derive(Debug, Clone)]
pub struct SpectralClustering {
    n_clusters: ClusterCount,
    seed: u64,
    similarity: EuclideanSimilarity,
    solver: JacobiSolver,
    kmeans: KMeans,
}

impl Default for SpectralClustering {
    fn default() -> Self {
        SpectralClusteringBuilder::new().build()
    }
}

impl SpectralClustering {
    pub fn n_clusters(&self) -> ClusterCount {
        self.n_clusters
    }

    /// Same as [`apply_mat_op`], but with this instance's kernel and solver settings.
    pub fn apply_mat_op(&self, op: MatOp, data: ArrayView2<f64>) -> crate::Result<Array2<f64>> {
        apply_mat_op_with(op, data, &self.similarity, &self.solver)
    }

    /// Full run with a generator seeded from the configured seed.
    pub fn fit(&self, observations: ArrayView2<f64>) -> crate::Result<SpectralResult> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        self.fit_with_rng(observations, &mut rng)
    }

    pub fn fit_with_rng<R>(
        &self,
        observations: ArrayView2<f64>,
        rng: &mut R,
    ) -> crate::Result<SpectralResult>
    where
        R: Rng + ?Sized,
    {
        let n = observations.nrows();
        if let ClusterCount::Fixed(k) = self.n_clusters {
            if k >= n {
                return Err(SpectralError::invalid_input(format!(
                    "number of clusters must satisfy k < {n}, got {k}"
                )));
            }
        }

        let lnorm = self.apply_mat_op(MatOp::Lnorm, observations)?;
        let eigen = self.solver.compute(lnorm.view())?;
        let embedding = select_k_and_embed(&eigen, self.n_clusters)?;
        let k = embedding.k();
        log::debug!("spectral embedding: {n} points in {k} dimensions");

        let seeding = KMeansPlusPlus::new(k).seed(embedding.matrix().view(), rng)?;
        let clustering = self
            .kmeans
            .fit(embedding.matrix().view(), seeding.centroids.view())?;

        Ok(SpectralResult {
            k,
            seed_indices: seeding.indices,
            eigen,
            embedding,
            clustering,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn two_pairs() -> Array2<f64> {
        array![[0.0, 0.0], [0.0, 1.0], [10.0, 0.0], [10.0, 1.0]]
    }

    #[test]
    fn test_goal_parsing() {
        assert_eq!("wam".parse::<Goal>().unwrap(), Goal::Matrix(MatOp::Wam));
        assert_eq!("ddg".parse::<Goal>().unwrap(), Goal::Matrix(MatOp::Ddg));
        assert_eq!("lnorm".parse::<Goal>().unwrap(), Goal::Matrix(MatOp::Lnorm));
        assert_eq!("jacobi".parse::<Goal>().unwrap(), Goal::Matrix(MatOp::Jacobi));
        assert_eq!("spk".parse::<Goal>().unwrap(), Goal::Spk);
        assert!("SPK".parse::<Goal>().is_err());
        assert_eq!(Goal::Matrix(MatOp::Lnorm).to_string(), "lnorm");
    }

    #[test]
    fn test_mat_op_shapes() {
        let obs = two_pairs();
        for op in [MatOp::Wam, MatOp::Ddg, MatOp::Lnorm] {
            assert_eq!(apply_mat_op(op, obs.view()).unwrap().dim(), (4, 4));
        }
    }

    #[test]
    fn test_jacobi_goal_layout() {
        let m = array![[2.0, 1.0], [1.0, 2.0]];
        let out = apply_mat_op(MatOp::Jacobi, m.view()).unwrap();
        assert_eq!(out.dim(), (3, 2));

        let eig = EigenDecomposition::from_matrix(out.view()).unwrap();
        let v = eig.eigenvectors();
        let d = v.t().dot(&m).dot(v);
        assert_abs_diff_eq!(d, Array2::from_diag(eig.eigenvalues()), epsilon = 1e-12);
    }

    #[test]
    fn test_jacobi_goal_rejects_rectangular() {
        assert!(apply_mat_op(MatOp::Jacobi, two_pairs().view()).is_err());
    }

    #[test]
    fn test_entry_points_chain() {
        let obs = two_pairs();
        let lnorm = apply_mat_op(MatOp::Lnorm, obs.view()).unwrap();
        let jacobi = apply_mat_op(MatOp::Jacobi, lnorm.view()).unwrap();
        let eigen = EigenDecomposition::from_matrix(jacobi.view()).unwrap();

        let t = prepare_embedding(&eigen, ClusterCount::Fixed(2)).unwrap();
        assert_eq!(t.dim(), (4, 2));

        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let seeding = run_kmeanspp_seed(2, t.view(), &mut rng).unwrap();
        let result =
            run_kmeans(t.view(), seeding.centroids.view(), KMeansConfig::default()).unwrap();

        assert_eq!(result.centroids.dim(), (2, 2));
        assert_eq!(result.labels[0], result.labels[1]);
        assert_eq!(result.labels[2], result.labels[3]);
        assert_ne!(result.labels[0], result.labels[2]);
    }

    #[test]
    fn test_prepare_embedding_out_of_range() {
        let eigen = JacobiSolver::default()
            .compute(Array2::<f64>::eye(3).view())
            .unwrap();
        assert!(prepare_embedding(&eigen, ClusterCount::Fixed(3)).is_err());
    }

    #[test]
    fn test_fit_rejects_k_not_below_n() {
        let obs = two_pairs();
        let model = SpectralClusteringBuilder::new()
            .n_clusters(ClusterCount::Fixed(4))
            .build();
        assert!(model.fit(obs.view()).is_err());
    }

    #[test]
    fn test_fit_is_reproducible() {
        let obs = array![
            [0.0, 0.0],
            [0.2, 0.1],
            [0.1, 0.3],
            [6.0, 6.0],
            [6.1, 5.8],
            [5.9, 6.2],
        ];
        let model = SpectralClusteringBuilder::new()
            .n_clusters(ClusterCount::Fixed(2))
            .seed(1234)
            .build();

        let a = model.fit(obs.view()).unwrap();
        let b = model.fit(obs.view()).unwrap();
        assert_eq!(a.seed_indices, b.seed_indices);
        assert_eq!(a.centroids(), b.centroids());
        assert_eq!(a.labels(), b.labels());
    }
}
