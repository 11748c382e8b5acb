pub trait Normalize {
    /// Euclidean norm of every row.
    fn row_norms(&self) -> Vec<f64>;

    /// Divides each row by the matching entry of `norms`.
    /// Entries equal to zero leave their row untouched.
    fn normalize_rows(&mut self, norms: &[f64]) -> crate::Result<()>;
}
