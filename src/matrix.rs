//! Dense matrix store.
//!
//! A [`Matrix`] is one owned row-major buffer of `rows × cols` values plus its
//! shape. Allocation either fully succeeds or fails with
//! [`Error::Allocation`]; there is no partially built matrix to clean up.
//! Releasing a matrix is dropping it.
//!
//! Shape checks are explicit: every binary operation returns
//! [`Error::DimensionMismatch`] instead of reading out of bounds.

use core::fmt;
use core::ops::{Index, IndexMut};

use crate::error::{Error, Result};

/// Reserve a zero-filled buffer for a `rows × cols` matrix.
fn zeroed_buffer(rows: usize, cols: usize) -> Result<Vec<f64>> {
    let len = rows
        .checked_mul(cols)
        .ok_or(Error::Allocation { rows, cols })?;
    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|_| Error::Allocation { rows, cols })?;
    data.resize(len, 0.0);
    Ok(data)
}

/// Owned, mutable, row-major dense matrix of `f64`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawMatrix")
)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Allocate a `rows × cols` matrix with every entry set to `0.0`.
    pub fn zeros(rows: usize, cols: usize) -> Result<Self> {
        let data = zeroed_buffer(rows, cols)?;
        Ok(Self { rows, cols, data })
    }

    /// `n × n` identity matrix.
    pub fn identity(n: usize) -> Result<Self> {
        let mut m = Self::zeros(n, n)?;
        for i in 0..n {
            m[(i, i)] = 1.0;
        }
        Ok(m)
    }

    /// Wrap a row-major buffer. `data.len()` must equal `rows * cols`.
    pub fn from_vec(data: Vec<f64>, rows: usize, cols: usize) -> Result<Self> {
        match rows.checked_mul(cols) {
            Some(len) if len == data.len() => Ok(Self { rows, cols, data }),
            Some(_) => Err(Error::mismatch("from_vec", (rows, cols), (1, data.len()))),
            None => Err(Error::Allocation { rows, cols }),
        }
    }

    /// Build a matrix from a slice of rows. Every row must have the length of
    /// the first; an empty slice gives a `0 × 0` matrix.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let n = rows.len();
        let d = rows.first().map_or(0, |r| r.as_ref().len());
        let mut m = Self::zeros(n, d)?;
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != d {
                return Err(Error::mismatch("from_rows", (n, d), (i, row.len())));
            }
            m.row_mut(i).copy_from_slice(row);
        }
        Ok(m)
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Returns `true` when `rows == cols`.
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Entry at `(i, j)`, or `None` when out of range.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        (i < self.rows && j < self.cols).then(|| self.data[i * self.cols + j])
    }

    /// Overwrite entry `(i, j)`; `None` when out of range.
    pub fn set(&mut self, i: usize, j: usize, v: f64) -> Option<()> {
        if i >= self.rows || j >= self.cols {
            return None;
        }
        self.data[i * self.cols + j] = v;
        Some(())
    }

    /// Row `i` as a slice.
    ///
    /// # Panics
    /// If `i >= rows`.
    pub fn row(&self, i: usize) -> &[f64] {
        assert!(i < self.rows, "row {} out of range for {} rows", i, self.rows);
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Row `i` as a mutable slice.
    ///
    /// # Panics
    /// If `i >= rows`.
    pub fn row_mut(&mut self, i: usize) -> &mut [f64] {
        assert!(i < self.rows, "row {} out of range for {} rows", i, self.rows);
        &mut self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Iterate over the rows in order.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.rows).map(move |i| self.row(i))
    }

    /// The whole row-major buffer.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Copy out as nested rows.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.iter_rows().map(<[f64]>::to_vec).collect()
    }

    /// Arithmetic mean of all entries; `0.0` for an empty matrix.
    pub fn mean(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.data.iter().sum::<f64>() / self.data.len() as f64
    }

    /// Returns `true` when square and `|a[i][j] - a[j][i]| <= tol` everywhere.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        self.is_square()
            && (0..self.rows)
                .all(|i| (i + 1..self.cols).all(|j| (self[(i, j)] - self[(j, i)]).abs() <= tol))
    }

    /// Standard matrix product `self · other`.
    ///
    /// Requires `self.cols() == other.rows()`; returns a new
    /// `self.rows() × other.cols()` matrix.
    pub fn multiply(&self, other: &Matrix) -> Result<Matrix> {
        if self.cols != other.rows {
            return Err(Error::mismatch("multiply", self.shape(), other.shape()));
        }
        let p = other.cols;
        let mut out = Matrix::zeros(self.rows, p)?;
        for i in 0..self.rows {
            let lhs = self.row(i);
            let dst = &mut out.data[i * p..(i + 1) * p];
            for (k, &a) in lhs.iter().enumerate() {
                for (o, &b) in dst.iter_mut().zip(other.row(k)) {
                    *o += a * b;
                }
            }
        }
        Ok(out)
    }

    /// Symmetric product `self · selfᵀ`.
    ///
    /// Only the upper triangle is computed; each value is mirrored below the
    /// diagonal, so the result is exactly symmetric.
    pub fn gram(&self) -> Result<Matrix> {
        let n = self.rows;
        let mut out = Matrix::zeros(n, n)?;
        for i in 0..n {
            for j in i..n {
                let dot: f64 = self.row(i).iter().zip(self.row(j)).map(|(a, b)| a * b).sum();
                out[(i, j)] = dot;
                out[(j, i)] = dot;
            }
        }
        Ok(out)
    }

    /// `Σ (self[i][j] - other[i][j])²` over all entries. Shapes must match.
    pub fn squared_frobenius_distance(&self, other: &Matrix) -> Result<f64> {
        if self.shape() != other.shape() {
            return Err(Error::mismatch("squared_frobenius_distance", self.shape(), other.shape()));
        }
        Ok(self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| (a - b) * (a - b))
            .sum())
    }

    /// Replace every diagonal entry `x` with `1/√x`, leaving zeros at zero.
    ///
    /// **Mutates in place.** After this call the original degree values are
    /// gone; a caller that still needs them must clone first. Off-diagonal
    /// entries are not touched. The matrix must be square.
    pub fn invert_sqrt_diagonal(&mut self) -> Result<()> {
        if !self.is_square() {
            return Err(Error::mismatch(
                "invert_sqrt_diagonal",
                self.shape(),
                (self.rows, self.rows),
            ));
        }
        for i in 0..self.rows {
            let x = self[(i, i)];
            // isolated point: zero total similarity
            if x != 0.0 {
                self[(i, i)] = 1.0 / x.sqrt();
            }
        }
        Ok(())
    }
}

/// `Σ (a[i] - b[i])²`. Both vectors must have the same length.
pub fn squared_euclidean_distance(a: &[f64], b: &[f64]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(Error::mismatch(
            "squared_euclidean_distance",
            (1, a.len()),
            (1, b.len()),
        ));
    }
    Ok(a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum())
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        assert!(
            i < self.rows && j < self.cols,
            "index ({}, {}) out of range for {}x{} matrix",
            i,
            j,
            self.rows,
            self.cols
        );
        &self.data[i * self.cols + j]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f64 {
        assert!(
            i < self.rows && j < self.cols,
            "index ({}, {}) out of range for {}x{} matrix",
            i,
            j,
            self.rows,
            self.cols
        );
        &mut self.data[i * self.cols + j]
    }
}

/// Comma-separated rows, four decimals per field, one line per row.
impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.iter_rows() {
            for (j, v) in row.iter().enumerate() {
                if j > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{:.4}", v)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Unchecked wire form; validated into a [`Matrix`] on deserialization.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawMatrix> for Matrix {
    type Error = Error;

    fn try_from(raw: RawMatrix) -> Result<Self> {
        Matrix::from_vec(raw.data, raw.rows, raw.cols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(rows: &[&[f64]]) -> Matrix {
        Matrix::from_rows(rows).unwrap()
    }

    #[test]
    fn test_zeros_is_all_zero() {
        let z = Matrix::zeros(3, 4).unwrap();
        assert_eq!(z.shape(), (3, 4));
        assert!(z.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_zeros_overflow_is_allocation_error() {
        let err = Matrix::zeros(usize::MAX, 2).unwrap_err();
        assert!(err.is_allocation(), "unexpected error: {err:?}");
    }

    #[test]
    fn test_zeros_huge_request_is_allocation_error() {
        // fits in usize but not in the address space
        let err = Matrix::zeros(usize::MAX / 4, 1).unwrap_err();
        assert!(err.is_allocation(), "unexpected error: {err:?}");
    }

    #[test]
    fn test_get_and_set_bounds() {
        let mut a = Matrix::zeros(2, 3).unwrap();
        assert_eq!(a.set(1, 2, 7.5), Some(()));
        assert_eq!(a.get(1, 2), Some(7.5));
        assert_eq!(a[(1, 2)], 7.5);
        assert_eq!(a.get(2, 0), None);
        assert_eq!(a.get(0, 3), None);
        assert_eq!(a.set(2, 0, 1.0), None);
        assert_eq!(a.set(0, 3, 1.0), None);
        assert_eq!(a.as_slice().iter().filter(|&&v| v != 0.0).count(), 1);
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let rows = vec![vec![1.0, 2.0], vec![3.0]];
        let err = Matrix::from_rows(&rows).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { op: "from_rows", .. }));
    }

    #[test]
    fn test_from_vec_checks_length() {
        assert!(Matrix::from_vec(vec![1.0; 6], 2, 3).is_ok());
        assert!(matches!(
            Matrix::from_vec(vec![1.0; 5], 2, 3),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_multiply_known_product() {
        let a = m(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]);
        let b = m(&[&[7.0, 8.0], &[9.0, 10.0], &[11.0, 12.0]]);
        let c = a.multiply(&b).unwrap();
        assert_eq!(c, m(&[&[58.0, 64.0], &[139.0, 154.0]]));
    }

    #[test]
    fn test_multiply_dimension_mismatch() {
        let a = Matrix::zeros(2, 3).unwrap();
        let b = Matrix::zeros(2, 3).unwrap();
        match a.multiply(&b) {
            Err(Error::DimensionMismatch { op, lhs, rhs }) => {
                assert_eq!(op, "multiply");
                assert_eq!(lhs, (2, 3));
                assert_eq!(rhs, (2, 3));
            }
            other => panic!("expected mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_gram_matches_explicit_transpose_product() {
        let h = m(&[&[1.0, 2.0], &[0.5, 0.0], &[3.0, 1.0]]);
        let ht = m(&[&[1.0, 0.5, 3.0], &[2.0, 0.0, 1.0]]);
        assert_eq!(h.gram().unwrap(), h.multiply(&ht).unwrap());
        assert!(h.gram().unwrap().is_symmetric(0.0));
    }

    #[test]
    fn test_squared_frobenius_distance() {
        let a = m(&[&[1.0, 2.0], &[3.0, 4.0]]);
        let b = m(&[&[0.0, 2.0], &[3.0, 2.0]]);
        assert_eq!(a.squared_frobenius_distance(&b).unwrap(), 5.0);
        assert_eq!(a.squared_frobenius_distance(&a).unwrap(), 0.0);
        assert!(a.squared_frobenius_distance(&Matrix::zeros(2, 3).unwrap()).is_err());
    }

    #[test]
    fn test_squared_euclidean_distance() {
        assert_eq!(squared_euclidean_distance(&[0.0, 0.0], &[3.0, 4.0]).unwrap(), 25.0);
        assert!(squared_euclidean_distance(&[0.0], &[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_invert_sqrt_diagonal_guards_zero() {
        let mut d = m(&[&[4.0, 0.0, 0.0], &[0.0, 0.0, 0.0], &[0.0, 0.0, 0.25]]);
        d.invert_sqrt_diagonal().unwrap();
        assert_eq!(d[(0, 0)], 0.5);
        assert_eq!(d[(1, 1)], 0.0);
        assert_eq!(d[(2, 2)], 2.0);
        assert!(d.as_slice().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_invert_sqrt_diagonal_rejects_non_square() {
        let mut d = Matrix::zeros(2, 3).unwrap();
        assert!(d.invert_sqrt_diagonal().is_err());
    }

    #[test]
    fn test_display_four_decimals_no_trailing_comma() {
        let a = m(&[&[1.0, 0.123456], &[-2.5, 10.0]]);
        assert_eq!(a.to_string(), "1.0000,0.1235\n-2.5000,10.0000\n");
    }

    #[test]
    fn test_empty_columns_iterate() {
        let a = Matrix::zeros(3, 0).unwrap();
        assert_eq!(a.iter_rows().count(), 3);
        assert_eq!(a.mean(), 0.0);
    }
}
