//! Symmetric normalization `W = D^-1/2 · A · D^-1/2`.
//!
//! The degree matrix is inverted **in place** via
//! [`Matrix::invert_sqrt_diagonal`]; the `&mut` parameter makes that visible
//! at the call site. Calling [`normalize`] twice with the same `D` applies the
//! inversion twice and gives a different, wrong result.

use log::debug;

use crate::error::{Error, Result};
use crate::matrix::Matrix;

/// Normalize similarity matrix `a` by degree matrix `d`.
///
/// `d` is left holding `D^-1/2`. Zero-degree rows stay zero, so isolated
/// points produce zero rows and columns in `W` instead of NaN.
pub fn normalize(a: &Matrix, d: &mut Matrix) -> Result<Matrix> {
    if !a.is_square() || a.shape() != d.shape() {
        return Err(Error::mismatch("normalize", a.shape(), d.shape()));
    }
    debug!("Normalizing {}x{} similarity matrix", a.rows(), a.cols());

    d.invert_sqrt_diagonal()?;
    let tmp = d.multiply(a)?;
    tmp.multiply(d)
}
