//! Goal-driven chaining of the pipeline stages.
//!
//! ```text
//! points → build_similarity → A → build_degree → D → normalize → W
//!                                                     W, initial_h → factorize → H
//! ```
//!
//! Each stage owns its output; intermediates are dropped as soon as the next
//! stage no longer needs them.

use core::fmt;
use core::str::FromStr;

use log::debug;

use crate::degree::build_degree;
use crate::error::{Error, Result};
use crate::factorize::{FactorizeResult, SymNmf};
use crate::init::{initial_h, DEFAULT_SEED};
use crate::matrix::Matrix;
use crate::normalize::normalize;
use crate::similarity::build_similarity;

/// Which matrix to produce from a points matrix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Goal {
    /// Similarity matrix `A`.
    Sym,
    /// Degree matrix `D`.
    Ddg,
    /// Normalized affinity `W`.
    Norm,
    /// Factor `H` (needs a rank).
    Symnmf,
}

impl Goal {
    /// Command-line name of the goal.
    pub fn as_str(self) -> &'static str {
        match self {
            Goal::Sym => "sym",
            Goal::Ddg => "ddg",
            Goal::Norm => "norm",
            Goal::Symnmf => "symnmf",
        }
    }
}

impl FromStr for Goal {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sym" => Ok(Goal::Sym),
            "ddg" => Ok(Goal::Ddg),
            "norm" => Ok(Goal::Norm),
            "symnmf" => Ok(Goal::Symnmf),
            other => Err(Error::InvalidArgument {
                arg: "goal",
                reason: format!("unknown goal '{other}'"),
            }),
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters that only the factorization goal uses.
#[derive(Clone, Debug, PartialEq)]
pub struct RunOptions {
    /// Rank of `H`; required for [`Goal::Symnmf`].
    pub k: Option<usize>,
    /// Seed for the initial factor.
    pub seed: u64,
    /// Solver constants.
    pub solver: SymNmf,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            k: None,
            seed: DEFAULT_SEED,
            solver: SymNmf::default(),
        }
    }
}

/// Points → normalized affinity `W`. `A` and `D` are dropped on return.
pub fn affinity(points: &Matrix) -> Result<Matrix> {
    let a = build_similarity(points)?;
    let mut d = build_degree(&a)?;
    normalize(&a, &mut d)
}

/// Points → `W` → seeded initial factor → SymNMF.
pub fn cluster(points: &Matrix, k: usize, seed: u64, solver: &SymNmf) -> Result<FactorizeResult> {
    let w = affinity(points)?;
    let h0 = initial_h(&w, k, seed)?;
    solver.factorize(&w, h0)
}

/// Produce the matrix named by `goal` for `points`.
pub fn run_goal(goal: Goal, points: &Matrix, options: &RunOptions) -> Result<Matrix> {
    debug!("Running goal '{}' on {}x{} points", goal, points.rows(), points.cols());
    match goal {
        Goal::Sym => build_similarity(points),
        Goal::Ddg => build_degree(&build_similarity(points)?),
        Goal::Norm => affinity(points),
        Goal::Symnmf => {
            let k = options.k.ok_or_else(|| Error::InvalidArgument {
                arg: "k",
                reason: "the symnmf goal needs a rank".into(),
            })?;
            cluster(points, k, options.seed, &options.solver).map(|r| r.h)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points() -> Matrix {
        Matrix::from_rows(&[[0.0, 0.0], [0.1, 0.0], [5.0, 5.0], [5.1, 5.0]]).unwrap()
    }

    #[test]
    fn test_goal_names_round_trip() {
        for g in [Goal::Sym, Goal::Ddg, Goal::Norm, Goal::Symnmf] {
            assert_eq!(g.as_str().parse::<Goal>().unwrap(), g);
        }
        assert!("kmeans".parse::<Goal>().is_err());
    }

    #[test]
    fn test_each_goal_shape() {
        let opts = RunOptions {
            k: Some(2),
            ..RunOptions::default()
        };
        for g in [Goal::Sym, Goal::Ddg, Goal::Norm] {
            assert_eq!(run_goal(g, &points(), &opts).unwrap().shape(), (4, 4));
        }
        assert_eq!(run_goal(Goal::Symnmf, &points(), &opts).unwrap().shape(), (4, 2));
    }

    #[test]
    fn test_symnmf_without_rank() {
        assert!(matches!(
            run_goal(Goal::Symnmf, &points(), &RunOptions::default()),
            Err(Error::InvalidArgument { arg: "k", .. })
        ));
    }
}
