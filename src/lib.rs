pub mod clustering;
pub mod dense;
pub mod eigen;
pub mod embedding;
mod error;
pub mod format;
pub mod graph;
pub mod io;
pub mod similarity;
pub mod spectral;
mod utils;

pub use error::{ErrorKind, Result, SpectralError};
pub use utils::Normalize;

pub use clustering::{KMeans, KMeansConfig, KMeansPlusPlus, KMeansResult, Seeding};
pub use eigen::{EigenDecomposition, EigenPair, JacobiConfig, JacobiSolver};
pub use embedding::{ClusterCount, Embedding};
pub use spectral::{
    apply_mat_op, prepare_embedding, run_kmeans, run_kmeanspp_seed, Goal, MatOp,
    SpectralClustering, SpectralClusteringBuilder, SpectralResult,
};
