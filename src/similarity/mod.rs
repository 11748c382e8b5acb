use ndarray::ArrayView1;
use num_traits::{Float, FromPrimitive, ToPrimitive};

/// Symmetric pairwise affinity between two observations.
pub trait SimilarityMeasure: Send + Sync {
    fn calculate<T>(&self, a: ArrayView1<T>, b: ArrayView1<T>) -> f64
    where
        T: Float + FromPrimitive + ToPrimitive;
}

/// `exp(-gamma * ‖a - b‖₂)`. The spectral graph uses gamma = 1/2.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EuclideanSimilarity {
    gamma: f64,
}

impl EuclideanSimilarity {
    pub fn new(gamma: f64) -> Self {
        Self { gamma }
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }
}

impl Default for EuclideanSimilarity {
    fn default() -> Self {
        Self { gamma: 0.5 }
    }
}

impl SimilarityMeasure for EuclideanSimilarity {
    fn calculate<T>(&self, a: ArrayView1<T>, b: ArrayView1<T>) -> f64
    where
        T: Float + FromPrimitive + ToPrimitive,
    {
        let mut squared_dist = T::zero();
        for (&x, &y) in a.iter().zip(b.iter()) {
            let diff = x - y;
            squared_dist = squared_dist + diff * diff;
        }
        let dist = squared_dist.sqrt().to_f64().unwrap_or(f64::NAN);
        (-self.gamma * dist).exp()
    }
}
