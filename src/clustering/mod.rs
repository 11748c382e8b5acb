pub mod kmeans;
pub mod kmeanspp;

pub use kmeans::{KMeans, KMeansConfig, KMeansResult};
pub use kmeanspp::{KMeansPlusPlus, Seeding};
