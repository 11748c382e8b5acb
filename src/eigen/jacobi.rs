use ndarray::{Array1, Array2, ArrayView2};
use rayon::prelude::*;

use crate::dense::{ensure_square, max_asymmetry, off_diagonal_sq_sum};
use crate::eigen::EigenDecomposition;

const ASYMMETRY_WARN_LEVEL: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JacobiConfig {
    /// Upper bound on the number of rotations applied.
    pub max_rotations: usize,
    /// The solver stops once one rotation lowers the off-diagonal sum of squares by no more
    /// than this, or once every off-diagonal magnitude is below it.
    pub tolerance: f64,
}

impl Default for JacobiConfig {
    fn default() -> Self {
        Self {
            max_rotations: 100,
            tolerance: 1e-5,
        }
    }
}

impl JacobiConfig {
    pub fn max_rotations(mut self, max_rotations: usize) -> Self {
        self.max_rotations = max_rotations;
        self
    }

    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

/// Classic Jacobi eigenvalue algorithm for real symmetric matrices.
///
/// The input has to be symmetric. Only its upper triangle drives pivot selection, so a
/// non-symmetric input yields meaningless output; it is logged, never rejected.
#[derive(Debug, Clone, Default)]
pub struct JacobiSolver {
    config: JacobiConfig,
}

impl JacobiSolver {
    pub fn new(config: JacobiConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &JacobiConfig {
        &self.config
    }

    pub fn compute(&self, matrix: ArrayView2<f64>) -> crate::Result<EigenDecomposition> {
        let n = ensure_square(matrix, "jacobi input")?;
        if let Some(asym) = max_asymmetry(matrix) {
            if asym > ASYMMETRY_WARN_LEVEL {
                log::warn!("jacobi input is not symmetric (max |a_ij - a_ji| = {asym:e})");
            }
        }

        let mut a = matrix.to_owned();
        let mut v = Array2::<f64>::eye(n);
        let mut off = off_diagonal_sq_sum(a.view());
        let mut rotations = 0;
        let mut converged = false;

        while rotations < self.config.max_rotations {
            let Some((p, q, magnitude)) = Self::find_pivot(&a) else {
                converged = true;
                break;
            };
            if magnitude < self.config.tolerance {
                converged = true;
                break;
            }

            let (c, s) = Self::compute_rotation(&a, p, q);
            Self::apply_rotation(&mut a, p, q, c, s);
            Self::accumulate_rotation(&mut v, p, q, c, s);
            rotations += 1;

            let next_off = off_diagonal_sq_sum(a.view());
            log::trace!("rotation {rotations}: pivot ({p}, {q}), off-diagonal {next_off:e}");
            if off - next_off <= self.config.tolerance {
                converged = true;
                break;
            }
            off = next_off;
        }

        if converged {
            log::debug!("jacobi converged on {n}x{n} matrix after {rotations} rotations");
        } else {
            log::warn!(
                "jacobi stopped at the rotation cap ({}) on {n}x{n} matrix, off-diagonal {off:e}",
                self.config.max_rotations
            );
        }

        let eigenvalues: Array1<f64> = a.diag().to_owned();
        Ok(EigenDecomposition::new(eigenvalues, v, rotations, converged))
    }

    /// Largest off-diagonal magnitude in the upper triangle. Ties go to the lowest (row, col).
    /// `None` for a 1x1 matrix or an exactly diagonal one.
    fn find_pivot(a: &Array2<f64>) -> Option<(usize, usize, f64)> {
        let n = a.nrows();
        let best = (0..n.saturating_sub(1))
            .into_par_iter()
            .filter_map(|i| {
                let mut local: Option<(usize, usize, f64)> = None;
                for j in (i + 1)..n {
                    let mag = a[(i, j)].abs();
                    if local.map_or(true, |(_, _, m)| mag > m) {
                        local = Some((i, j, mag));
                    }
                }
                local
            })
            .reduce_with(|x, y| {
                if y.2 > x.2 || (y.2 == x.2 && (y.0, y.1) < (x.0, x.1)) {
                    y
                } else {
                    x
                }
            })?;

        if best.2 == 0.0 {
            None
        } else {
            Some(best)
        }
    }

    fn compute_rotation(a: &Array2<f64>, p: usize, q: usize) -> (f64, f64) {
        let theta = (a[(q, q)] - a[(p, p)]) / (2.0 * a[(p, q)]);
        let sign = if theta >= 0.0 { 1.0 } else { -1.0 };
        let t = sign / (theta.abs() + (theta * theta + 1.0).sqrt());
        let c = 1.0 / (t * t + 1.0).sqrt();
        let s = t * c;
        (c, s)
    }

    /// A ← PᵀAP, touching only rows and columns p and q.
    fn apply_rotation(a: &mut Array2<f64>, p: usize, q: usize, c: f64, s: f64) {
        let n = a.nrows();
        let app = a[(p, p)];
        let aqq = a[(q, q)];
        let apq = a[(p, q)];

        for r in 0..n {
            if r == p || r == q {
                continue;
            }
            let arp = a[(r, p)];
            let arq = a[(r, q)];
            let new_rp = c * arp - s * arq;
            let new_rq = c * arq + s * arp;
            a[(r, p)] = new_rp;
            a[(p, r)] = new_rp;
            a[(r, q)] = new_rq;
            a[(q, r)] = new_rq;
        }

        a[(p, p)] = c * c * app + s * s * aqq - 2.0 * s * c * apq;
        a[(q, q)] = s * s * app + c * c * aqq + 2.0 * s * c * apq;
        a[(p, q)] = 0.0;
        a[(q, p)] = 0.0;
    }

    /// V ← VP; only columns p and q change.
    fn accumulate_rotation(v: &mut Array2<f64>, p: usize, q: usize, c: f64, s: f64) {
        for r in 0..v.nrows() {
            let vrp = v[(r, p)];
            let vrq = v[(r, q)];
            v[(r, p)] = c * vrp - s * vrq;
            v[(r, q)] = s * vrp + c * vrq;
        }
    }
}
