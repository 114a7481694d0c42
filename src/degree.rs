//! Diagonal degree matrix of a similarity graph.

use log::debug;

use crate::error::{Error, Result};
use crate::matrix::Matrix;

/// Build `D` with `D[i][i] = Σⱼ A[i][j]` and every off-diagonal entry `0.0`.
///
/// `A` must be square. Symmetry is assumed, not re-checked.
pub fn build_degree(a: &Matrix) -> Result<Matrix> {
    if !a.is_square() {
        return Err(Error::mismatch("build_degree", a.shape(), (a.rows(), a.rows())));
    }
    let n = a.rows();
    debug!("Building {}x{} degree matrix", n, n);

    let mut d = Matrix::zeros(n, n)?;
    for (i, row) in a.iter_rows().enumerate() {
        d[(i, i)] = row.iter().sum();
    }
    Ok(d)
}
