//! Symmetric non-negative matrix factorization by multiplicative update.
//!
//! Approximates a symmetric non-negative affinity matrix `W` (n×n) as `H·Hᵀ`
//! with `H ≥ 0` (n×k). Each iteration rescales every entry of the current
//! factor:
//!
//! ```text
//! H'[i][j] = H[i][j] · (1 − β + β · (W·H)[i][j] / ((H·Hᵀ·H)[i][j] + δ))
//! ```
//!
//! and stops when `‖H' − H‖²_F < ε` or after `max_iter` updates.
//!
//! # Invariants
//! - Non-negative `W` and `H0` give a non-negative result (every factor is ≥ 0)
//! - Never more than `max_iter` updates; output shape always equals `H0`'s
//! - On convergence the pre-update iterate is returned, not the candidate
//!
//! Ownership: the loop owns exactly one current factor. Per iteration either
//! the candidate replaces it (the old one is dropped) or the candidate is
//! dropped and the loop stops. Any error drops everything the loop owns.

use log::{debug, trace, warn};

use crate::error::{Error, Result};
use crate::matrix::Matrix;

/// Update damping `β`.
pub const BETA: f64 = 0.5;

/// Guard added to the denominator `δ`.
pub const DELTA: f64 = 1e-9;

/// Convergence tolerance `ε` on the squared Frobenius step size.
pub const EPSILON: f64 = 1e-4;

/// Iteration cap.
pub const MAX_ITER: u32 = 300;

/// Outcome of a factorization run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FactorizeResult {
    /// Final factor `H` (n×k).
    pub h: Matrix,
    /// Whether the step size dropped below `epsilon` within `max_iter`.
    pub converged: bool,
    /// Number of updates computed.
    pub iterations: u32,
    /// Squared Frobenius distance of the last computed step.
    pub residual: f64,
}

/// SymNMF multiplicative-update solver.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SymNmf {
    /// Update damping (default: 0.5).
    pub beta: f64,
    /// Denominator guard (default: 1e-9).
    pub delta: f64,
    /// Stop when `‖H' − H‖²_F < epsilon` (default: 1e-4).
    pub epsilon: f64,
    /// Maximum number of updates (default: 300).
    pub max_iter: u32,
}

impl Default for SymNmf {
    fn default() -> Self {
        Self {
            beta: BETA,
            delta: DELTA,
            epsilon: EPSILON,
            max_iter: MAX_ITER,
        }
    }
}

impl SymNmf {
    /// Create a solver with explicit constants.
    pub fn new(beta: f64, delta: f64, epsilon: f64, max_iter: u32) -> Self {
        Self {
            beta,
            delta,
            epsilon,
            max_iter,
        }
    }

    /// Set the convergence tolerance.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set the iteration cap.
    pub fn with_max_iter(mut self, max_iter: u32) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Compute one candidate update from `h` against `w`.
    ///
    /// The three intermediate products are dropped before returning.
    pub fn step(&self, w: &Matrix, h: &Matrix) -> Result<Matrix> {
        let hht = h.gram()?;
        let wh = w.multiply(h)?;
        let hhth = hht.multiply(h)?;

        let (n, k) = h.shape();
        let mut candidate = Matrix::zeros(n, k)?;
        for i in 0..n {
            for j in 0..k {
                let ratio = wh[(i, j)] / (hhth[(i, j)] + self.delta);
                candidate[(i, j)] = h[(i, j)] * (1.0 - self.beta + self.beta * ratio);
            }
        }
        Ok(candidate)
    }

    /// Factorize `w` starting from `h0`, which the loop takes ownership of.
    ///
    /// `w` must be n×n and `h0` n×k. `h0` should be entrywise non-negative;
    /// that precondition is not checked.
    pub fn factorize(&self, w: &Matrix, h0: Matrix) -> Result<FactorizeResult> {
        if !w.is_square() || w.rows() != h0.rows() {
            return Err(Error::mismatch("factorize", w.shape(), h0.shape()));
        }
        let (n, k) = h0.shape();
        debug!(
            "Factorizing {}x{} affinity into rank {} (beta={}, epsilon={}, max_iter={})",
            n, n, k, self.beta, self.epsilon, self.max_iter
        );

        let mut current = h0;
        let mut residual = f64::INFINITY;
        for iter in 0..self.max_iter {
            let candidate = self.step(w, &current)?;
            residual = candidate.squared_frobenius_distance(&current)?;
            trace!("iteration {}: step residual {:e}", iter + 1, residual);

            if residual < self.epsilon {
                debug!("Converged after {} iterations (residual {:e})", iter + 1, residual);
                return Ok(FactorizeResult {
                    h: current,
                    converged: true,
                    iterations: iter + 1,
                    residual,
                });
            }
            current = candidate;
        }

        warn!(
            "No convergence within {} iterations (last residual {:e})",
            self.max_iter, residual
        );
        Ok(FactorizeResult {
            h: current,
            converged: false,
            iterations: self.max_iter,
            residual,
        })
    }
}

/// Factorize with the default constants and return only `H`.
pub fn factorize(w: &Matrix, h0: Matrix) -> Result<Matrix> {
    SymNmf::default().factorize(w, h0).map(|r| r.h)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sn() -> SymNmf {
        SymNmf::default()
    }

    #[test]
    fn test_defaults_match_constants() {
        let s = sn();
        assert_eq!(s.beta, 0.5);
        assert_eq!(s.delta, 1e-9);
        assert_eq!(s.epsilon, 1e-4);
        assert_eq!(s.max_iter, 300);
    }

    #[test]
    fn test_new_sets_every_constant() {
        let s = SymNmf::new(0.25, 1e-6, 1e-3, 40);
        assert_eq!(s.beta, 0.25);
        assert_eq!(s.delta, 1e-6);
        assert_eq!(s.epsilon, 1e-3);
        assert_eq!(s.max_iter, 40);
        assert_eq!(SymNmf::new(BETA, DELTA, EPSILON, MAX_ITER), SymNmf::default());
    }

    #[test]
    fn test_undamped_step_uses_beta() {
        // beta = 1: H' = H · WH / (HHᵀH + δ)
        let w = Matrix::from_rows(&[[2.0]]).unwrap();
        let h = Matrix::from_rows(&[[1.0]]).unwrap();
        let c = SymNmf::new(1.0, 0.0, EPSILON, MAX_ITER).step(&w, &h).unwrap();
        assert_eq!(c[(0, 0)], 2.0);
    }

    #[test]
    fn test_step_matches_hand_computation() {
        // n = 1, k = 1: W = [[2]], H = [[1]] → WH = 2, HHᵀH = 1
        let w = Matrix::from_rows(&[[2.0]]).unwrap();
        let h = Matrix::from_rows(&[[1.0]]).unwrap();
        let c = sn().step(&w, &h).unwrap();
        let expected = 1.0 * (0.5 + 0.5 * (2.0 / (1.0 + 1e-9)));
        assert!((c[(0, 0)] - expected).abs() < 1e-15);
    }

    #[test]
    fn test_zero_entries_stay_zero() {
        let w = Matrix::from_rows(&[[0.0, 1.0], [1.0, 0.0]]).unwrap();
        let h = Matrix::from_rows(&[[0.0, 0.3], [0.0, 0.7]]).unwrap();
        let c = sn().step(&w, &h).unwrap();
        assert_eq!(c[(0, 0)], 0.0);
        assert_eq!(c[(1, 0)], 0.0);
    }

    #[test]
    fn test_zero_max_iter_returns_input() {
        let w = Matrix::identity(2).unwrap();
        let h0 = Matrix::from_rows(&[[0.2], [0.4]]).unwrap();
        let r = sn().with_max_iter(0).factorize(&w, h0.clone()).unwrap();
        assert_eq!(r.h, h0);
        assert_eq!(r.iterations, 0);
        assert!(!r.converged);
    }

    #[test]
    fn test_iteration_cap_respected() {
        // epsilon 0 can never be beaten by a strictly positive step
        let w = Matrix::from_rows(&[[0.0, 1.0], [1.0, 0.0]]).unwrap();
        let h0 = Matrix::from_rows(&[[0.01], [5.0]]).unwrap();
        let r = sn().with_epsilon(0.0).with_max_iter(7).factorize(&w, h0).unwrap();
        assert_eq!(r.iterations, 7);
        assert!(!r.converged);
        assert_eq!(r.h.shape(), (2, 1));
    }

    #[test]
    fn test_shape_mismatch() {
        let w = Matrix::identity(3).unwrap();
        let h0 = Matrix::zeros(2, 2).unwrap();
        assert!(matches!(
            sn().factorize(&w, h0),
            Err(Error::DimensionMismatch { op: "factorize", .. })
        ));
    }

    #[test]
    fn test_rank_one_fixed_point() {
        // W = h·hᵀ for h = [1, 1]ᵀ, so H = [[1], [1]] is a fixed point
        let w = Matrix::from_rows(&[[1.0, 1.0], [1.0, 1.0]]).unwrap();
        let h0 = Matrix::from_rows(&[[0.5], [0.5]]).unwrap();
        let r = sn().factorize(&w, h0).unwrap();
        assert!(r.converged);
        for i in 0..2 {
            assert!((r.h[(i, 0)] - 1.0).abs() < 0.05, "h[{i}] = {}", r.h[(i, 0)]);
        }
    }
}
