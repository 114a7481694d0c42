//! Gaussian-kernel similarity graph over a points matrix.
//!
//! Each pair of distinct points `(i, j)` is weighted
//! `exp(-GAUSSIAN_COEFFICIENT · ‖xᵢ − xⱼ‖²)`. The bandwidth is fixed.
//!
//! # Invariants
//! - Output is `n × n` and exactly symmetric (each pair is computed once and mirrored)
//! - Diagonal is `0.0`
//! - Off-diagonal entries are in `(0, 1]` for finite points; `1.0` only for coincident points

use log::debug;

use crate::error::Result;
use crate::matrix::{squared_euclidean_distance, Matrix};

/// Coefficient on the squared distance inside the kernel (`σ² = 1`).
pub const GAUSSIAN_COEFFICIENT: f64 = 0.5;

/// Build the similarity matrix `A` for an `n × d` points matrix.
///
/// O(n²·d) time, O(n²) space. Deterministic in the input order.
pub fn build_similarity(points: &Matrix) -> Result<Matrix> {
    let (n, d) = points.shape();
    debug!("Building {}x{} similarity matrix from {}-dimensional points", n, n, d);

    let mut a = Matrix::zeros(n, n)?;
    for i in 0..n {
        for j in i + 1..n {
            let dist = squared_euclidean_distance(points.row(i), points.row(j))?;
            let sim = (-GAUSSIAN_COEFFICIENT * dist).exp();
            a[(i, j)] = sim;
            a[(j, i)] = sim;
        }
    }
    Ok(a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_point_is_zero() {
        let points = Matrix::from_rows(&[[3.0, 4.0]]).unwrap();
        let a = build_similarity(&points).unwrap();
        assert_eq!(a.shape(), (1, 1));
        assert_eq!(a[(0, 0)], 0.0);
    }

    #[test]
    fn test_unit_distance_kernel_value() {
        // ‖x0 − x1‖² = 1 → exp(-0.5)
        let points = Matrix::from_rows(&[[0.0], [1.0]]).unwrap();
        let a = build_similarity(&points).unwrap();
        assert!((a[(0, 1)] - (-0.5f64).exp()).abs() < 1e-15);
        assert_eq!(a[(0, 1)], a[(1, 0)]);
    }

    #[test]
    fn test_closer_points_are_more_similar() {
        let points = Matrix::from_rows(&[[0.0, 0.0], [0.5, 0.0], [2.0, 0.0]]).unwrap();
        let a = build_similarity(&points).unwrap();
        assert!(a[(0, 1)] > a[(0, 2)]);
        assert!(a[(1, 2)] > a[(0, 2)]);
    }
}
