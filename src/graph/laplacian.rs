use ndarray::{Array2, ArrayView2};

use crate::dense::ensure_square;
use crate::SpectralError;

/// Lnorm = I - D^(-1/2) W D^(-1/2).
///
/// The inverse square root of the degree matrix is never formed; each entry of `wam` is
/// scaled by `1/√d_i · 1/√d_j` directly. A node with zero degree gets the scale factor 0, so
/// isolated points end up with a row equal to the identity row.
pub fn normalized_laplacian(
    wam: ArrayView2<f64>,
    ddg: ArrayView2<f64>,
) -> crate::Result<Array2<f64>> {
    let n = ensure_square(wam, "weighted adjacency matrix")?;
    let n_ddg = ensure_square(ddg, "diagonal degree matrix")?;
    if n != n_ddg {
        return Err(SpectralError::DimensionMismatch {
            expected: n,
            found: n_ddg,
        });
    }

    let scale: Vec<f64> = ddg
        .diag()
        .iter()
        .map(|&d| if d > 0.0 { 1.0 / d.sqrt() } else { 0.0 })
        .collect();

    let mut lnorm = Array2::<f64>::eye(n);
    for ((i, j), value) in lnorm.indexed_iter_mut() {
        *value -= scale[i] * wam[(i, j)] * scale[j];
    }

    log::debug!("built {n}x{n} normalized graph laplacian");
    Ok(lnorm)
}
