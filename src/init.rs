//! Random initial factor for the SymNMF loop.
//!
//! Entries are drawn uniformly from `[0, 2·√(mean(W)/k))`, which puts the
//! expected `H·Hᵀ` on the same scale as `W`.
//!
//! **DETERMINISTIC**: the generator is a ChaCha8 stream seeded by the caller.

use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::{Error, Result};
use crate::matrix::Matrix;

/// Seed used when the caller does not pick one.
pub const DEFAULT_SEED: u64 = 1234;

/// Upper bound of the uniform draw for affinity `w` and rank `k`.
pub fn upper_bound(w: &Matrix, k: usize) -> f64 {
    2.0 * (w.mean() / k as f64).sqrt()
}

/// Draw an `n × k` non-negative starting factor for affinity matrix `w`.
///
/// When the bound is zero or not finite (e.g. an all-zero `W`) the factor is
/// all zeros.
pub fn initial_h(w: &Matrix, k: usize, seed: u64) -> Result<Matrix> {
    if k == 0 {
        return Err(Error::InvalidArgument {
            arg: "k",
            reason: "rank must be at least 1".into(),
        });
    }
    let n = w.rows();
    let bound = upper_bound(w, k);
    debug!("Initial {}x{} factor, uniform on [0, {}) with seed {}", n, k, bound, seed);

    let mut h = Matrix::zeros(n, k)?;
    if !(bound > 0.0 && bound.is_finite()) {
        return Ok(h);
    }
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    for i in 0..n {
        for v in h.row_mut(i) {
            *v = rng.gen_range(0.0..bound);
        }
    }
    Ok(h)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w() -> Matrix {
        Matrix::from_rows(&[[0.0, 0.4, 0.2], [0.4, 0.0, 0.6], [0.2, 0.6, 0.0]]).unwrap()
    }

    #[test]
    fn test_entries_within_bound() {
        let h = initial_h(&w(), 2, DEFAULT_SEED).unwrap();
        let bound = upper_bound(&w(), 2);
        assert_eq!(h.shape(), (3, 2));
        assert!(h.as_slice().iter().all(|&v| (0.0..bound).contains(&v)));
    }

    #[test]
    fn test_same_seed_same_factor() {
        assert_eq!(initial_h(&w(), 2, 7).unwrap(), initial_h(&w(), 2, 7).unwrap());
        assert_ne!(initial_h(&w(), 2, 7).unwrap(), initial_h(&w(), 2, 8).unwrap());
    }

    #[test]
    fn test_zero_affinity_gives_zero_factor() {
        let h = initial_h(&Matrix::zeros(4, 4).unwrap(), 2, DEFAULT_SEED).unwrap();
        assert!(h.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_zero_rank_rejected() {
        assert!(matches!(
            initial_h(&w(), 0, DEFAULT_SEED),
            Err(Error::InvalidArgument { arg: "k", .. })
        ));
    }
}
