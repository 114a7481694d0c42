//! # symnmf-core
//!
//! Symmetric Non-negative Matrix Factorization (SymNMF) for clustering.
//!
//! ---
//!
//! From `n` points in `d` dimensions the crate builds a Gaussian similarity
//! graph, normalizes it by its degrees, and factorizes the resulting affinity
//! `W ≈ H·Hᵀ` with a non-negative `n × k` factor `H`. Row `i` of `H` is the
//! soft cluster membership of point `i`; taking the arg-max per row gives a
//! hard label.
//!
//! ## The pipeline
//!
//! ```text
//! points ─→ build_similarity ─→ A ─→ build_degree ─→ D
//!                               │                    │ (inverted in place)
//!                               └──────→ normalize ←─┘
//!                                           │
//!                                           W ─→ factorize(W, H0) ─→ H
//! ```
//!
//! ## Module overview
//!
//! | Module | Key items | What it does |
//! |--------|-----------|--------------|
//! | [`matrix`] | [`Matrix`] | Owned dense store, products, distances, in-place `D^-1/2` |
//! | [`similarity`] | [`build_similarity`] | Gaussian kernel `exp(-½‖xᵢ − xⱼ‖²)`, zero diagonal |
//! | [`degree`] | [`build_degree`] | Diagonal of row sums |
//! | [`normalize`](mod@normalize) | [`normalize()`] | `D^-1/2 · A · D^-1/2` |
//! | [`factorize`](mod@factorize) | [`SymNmf`], [`FactorizeResult`] | Damped multiplicative update, ε / iteration cap |
//! | [`init`] | [`initial_h`] | Seeded uniform starting factor |
//! | [`pipeline`] | [`Goal`], [`run_goal`] | Chains the stages for a requested output |
//! | [`analysis`] | [`analysis::compare`], [`AnalysisReport`] | Arg-max labels, k-means baseline, silhouette scores |
//! | [`io`] | [`read_points`], [`write_matrix`] | Text ingestion and 4-decimal presentation |
//!
//! ## Example
//!
//! ```
//! use symnmf_core::{build_degree, build_similarity, normalize, initial_h, SymNmf, Matrix};
//!
//! let points = Matrix::from_rows(&[[0.0, 0.0], [0.2, 0.1], [6.0, 6.0], [6.1, 5.9]])?;
//! let a = build_similarity(&points)?;
//! let mut d = build_degree(&a)?;
//! let w = normalize(&a, &mut d)?;
//! let h0 = initial_h(&w, 2, 1234)?;
//! let result = SymNmf::default().factorize(&w, h0)?;
//! assert_eq!(result.h.shape(), (4, 2));
//! # Ok::<(), symnmf_core::Error>(())
//! ```
//!
//! ## Features
//!
//! - `serde` — `Serialize`/`Deserialize` for [`Matrix`], [`SymNmf`] and [`FactorizeResult`]
//! - `python-ffi` — PyO3 extension module `symnmf`
//! - `cli` — the `symnmf` command-line binary

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod analysis;
pub mod degree;
pub mod error;
pub mod factorize;
pub mod init;
pub mod io;
pub mod matrix;
pub mod normalize;
pub mod pipeline;
pub mod similarity;

#[cfg(feature = "python-ffi")]
pub mod ffi;

pub use analysis::{kmeans, silhouette, AnalysisReport, KMeansResult};
pub use degree::build_degree;
pub use error::{Error, Result};
pub use factorize::{factorize, FactorizeResult, SymNmf};
pub use init::initial_h;
pub use io::{read_points, read_points_file, write_matrix};
pub use matrix::{squared_euclidean_distance, Matrix};
pub use normalize::normalize;
pub use pipeline::{run_goal, Goal, RunOptions};
pub use similarity::build_similarity;
