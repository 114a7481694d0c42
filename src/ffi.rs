//! Python FFI bindings via PyO3.
//!
//! Exposes the pipeline stages as functions over `list[list[float]]` with
//! explicit shapes. Every inner list is checked against the declared width
//! before anything reaches the core, and every native matrix is dropped
//! before the call returns.
//!
//! # Building the Python extension
//!
//! ```bash
//! pip install maturin
//! maturin develop --features python-ffi
//! ```
//!
//! # Usage
//!
//! ```python
//! import symnmf
//!
//! points = [[0.0, 0.0], [0.1, 0.0], [5.0, 5.0], [5.1, 5.0]]
//! w = symnmf.norm(points, 4, 2)
//! h0 = symnmf.init_h(w, 2)
//! h = symnmf.symnmf(w, h0, 4, 2)
//! labels = [max(range(2), key=row.__getitem__) for row in h]
//! ```

use pyo3::exceptions::{PyMemoryError, PyValueError};
use pyo3::prelude::*;

use crate::degree::build_degree;
use crate::error::Error;
use crate::factorize::factorize;
use crate::init::{initial_h, DEFAULT_SEED};
use crate::matrix::Matrix;
use crate::pipeline::affinity;
use crate::similarity::build_similarity;

impl From<Error> for PyErr {
    fn from(e: Error) -> Self {
        match e {
            Error::Allocation { .. } => PyMemoryError::new_err(e.to_string()),
            other => PyValueError::new_err(other.to_string()),
        }
    }
}

/// Convert nested rows into a `rows × cols` matrix, checking every length.
fn to_matrix(name: &str, nested: &[Vec<f64>], rows: usize, cols: usize) -> PyResult<Matrix> {
    if nested.len() != rows {
        return Err(PyValueError::new_err(format!(
            "{name} must have exactly {rows} rows, got {}",
            nested.len()
        )));
    }
    if let Some((i, row)) = nested.iter().enumerate().find(|(_, r)| r.len() != cols) {
        return Err(PyValueError::new_err(format!(
            "{name} row {i} must have exactly {cols} elements, got {}",
            row.len()
        )));
    }
    Ok(Matrix::from_rows(nested)?)
}

/// Square input whose size is taken from its own length.
fn to_square(name: &str, nested: &[Vec<f64>]) -> PyResult<Matrix> {
    to_matrix(name, nested, nested.len(), nested.len())
}

/// Similarity matrix of `n` points of dimension `d`.
#[pyfunction]
pub fn sym(points: Vec<Vec<f64>>, n: usize, d: usize) -> PyResult<Vec<Vec<f64>>> {
    let points = to_matrix("points", &points, n, d)?;
    Ok(build_similarity(&points)?.to_rows())
}

/// Diagonal degree matrix of `n` points of dimension `d`.
#[pyfunction]
pub fn ddg(points: Vec<Vec<f64>>, n: usize, d: usize) -> PyResult<Vec<Vec<f64>>> {
    let points = to_matrix("points", &points, n, d)?;
    let a = build_similarity(&points)?;
    Ok(build_degree(&a)?.to_rows())
}

/// Normalized affinity matrix of `n` points of dimension `d`.
#[pyfunction]
pub fn norm(points: Vec<Vec<f64>>, n: usize, d: usize) -> PyResult<Vec<Vec<f64>>> {
    let points = to_matrix("points", &points, n, d)?;
    Ok(affinity(&points)?.to_rows())
}

/// Factorize the `n × n` affinity `w` from the `n × k` starting factor `h`.
#[pyfunction]
#[pyo3(name = "symnmf")]
pub fn py_symnmf(w: Vec<Vec<f64>>, h: Vec<Vec<f64>>, n: usize, k: usize) -> PyResult<Vec<Vec<f64>>> {
    let w = to_matrix("w", &w, n, n)?;
    let h0 = to_matrix("h", &h, n, k)?;
    Ok(factorize(&w, h0)?.to_rows())
}

/// Seeded uniform starting factor for affinity `w` and rank `k`.
#[pyfunction]
#[pyo3(signature = (w, k, seed=DEFAULT_SEED))]
pub fn init_h(w: Vec<Vec<f64>>, k: usize, seed: u64) -> PyResult<Vec<Vec<f64>>> {
    let w = to_square("w", &w)?;
    Ok(initial_h(&w, k, seed)?.to_rows())
}

/// SymNMF Python bindings.
#[pymodule]
#[pyo3(name = "symnmf")]
pub fn symnmf_module(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(sym, m)?)?;
    m.add_function(wrap_pyfunction!(ddg, m)?)?;
    m.add_function(wrap_pyfunction!(norm, m)?)?;
    m.add_function(wrap_pyfunction!(py_symnmf, m)?)?;
    m.add_function(wrap_pyfunction!(init_h, m)?)?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add("MAX_ITER", crate::factorize::MAX_ITER)?;
    m.add("EPSILON", crate::factorize::EPSILON)?;
    Ok(())
}
