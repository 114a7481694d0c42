//! Cluster quality: SymNMF labels against a k-means baseline.
//!
//! Hard labels come from the arg-max of each row of `H`. The baseline is
//! Lloyd's k-means seeded with the first `k` points. Both labelings are
//! scored with the mean silhouette coefficient over Euclidean distance.

use core::fmt;

use log::{debug, warn};

use crate::error::{Error, Result};
use crate::factorize::SymNmf;
use crate::matrix::{squared_euclidean_distance, Matrix};
use crate::pipeline::cluster;

/// Iteration cap of the k-means baseline.
pub const KMEANS_MAX_ITER: u32 = 300;

/// Centroid movement below which k-means stops.
pub const KMEANS_EPSILON: f64 = 1e-4;

fn distance(a: &[f64], b: &[f64]) -> Result<f64> {
    Ok(squared_euclidean_distance(a, b)?.sqrt())
}

/// Index of the largest entry of each row; the first one wins ties.
pub fn labels(h: &Matrix) -> Vec<usize> {
    h.iter_rows()
        .map(|row| {
            row.iter()
                .enumerate()
                .fold((0, f64::NEG_INFINITY), |best, (j, &v)| {
                    if v > best.1 {
                        (j, v)
                    } else {
                        best
                    }
                })
                .0
        })
        .collect()
}

/// Outcome of [`kmeans`].
#[derive(Clone, Debug, PartialEq)]
pub struct KMeansResult {
    /// `k × d` centroids.
    pub centroids: Matrix,
    /// Nearest centroid of each point.
    pub labels: Vec<usize>,
    /// Assignment passes run.
    pub iterations: u32,
}

fn nearest(point: &[f64], centroids: &Matrix) -> Result<usize> {
    let mut best = (0, f64::INFINITY);
    for (j, c) in centroids.iter_rows().enumerate() {
        let dist = distance(point, c)?;
        if dist < best.1 {
            best = (j, dist);
        }
    }
    Ok(best.0)
}

/// Lloyd's k-means starting from the first `k` rows of `points`.
///
/// Stops once no centroid moves by `epsilon` or more, or after `max_iter`
/// passes. Empty clusters keep their previous centroid.
///
/// # Errors
///
/// [`Error::InvalidArgument`] when `k` is zero or larger than the number of
/// points.
pub fn kmeans(points: &Matrix, k: usize, max_iter: u32, epsilon: f64) -> Result<KMeansResult> {
    let (n, d) = points.shape();
    if k == 0 || k > n {
        return Err(Error::InvalidArgument {
            arg: "k",
            reason: format!("k-means needs 0 < k <= {n}, got {k}"),
        });
    }

    let mut centroids = Matrix::zeros(k, d)?;
    for j in 0..k {
        centroids.row_mut(j).copy_from_slice(points.row(j));
    }

    let mut iterations = 0;
    let mut moved = true;
    while iterations < max_iter && moved {
        moved = false;
        let mut sums = Matrix::zeros(k, d)?;
        let mut counts = vec![0usize; k];
        for point in points.iter_rows() {
            let j = nearest(point, &centroids)?;
            counts[j] += 1;
            for (s, x) in sums.row_mut(j).iter_mut().zip(point) {
                *s += x;
            }
        }
        for j in 0..k {
            if counts[j] == 0 {
                continue;
            }
            let size = counts[j] as f64;
            sums.row_mut(j).iter_mut().for_each(|s| *s /= size);
            if distance(sums.row(j), centroids.row(j))? >= epsilon {
                moved = true;
            }
            centroids.row_mut(j).copy_from_slice(sums.row(j));
        }
        iterations += 1;
    }
    if moved {
        warn!("k-means hit the iteration cap ({max_iter}) before settling");
    }
    debug!("k-means finished after {iterations} passes");

    let labels = points
        .iter_rows()
        .map(|p| nearest(p, &centroids))
        .collect::<Result<Vec<_>>>()?;
    Ok(KMeansResult {
        centroids,
        labels,
        iterations,
    })
}

/// Mean silhouette coefficient of a labeling.
///
/// For point `i`, `a` is its mean distance to the rest of its cluster and
/// `b` the smallest mean distance to another cluster; its score is
/// `(b - a) / max(a, b)`, and zero when its cluster is a singleton.
///
/// # Errors
///
/// [`Error::DimensionMismatch`] when `labels` does not have one entry per
/// point, [`Error::InvalidArgument`] unless the number of distinct labels is
/// between 2 and `n - 1`.
pub fn silhouette(points: &Matrix, labels: &[usize]) -> Result<f64> {
    let n = points.rows();
    if labels.len() != n {
        return Err(Error::mismatch("silhouette", points.shape(), (labels.len(), 1)));
    }
    let buckets = labels.iter().max().map_or(0, |&m| m + 1);
    let mut sizes = vec![0usize; buckets];
    for &l in labels {
        sizes[l] += 1;
    }
    let distinct = sizes.iter().filter(|&&s| s > 0).count();
    if distinct < 2 || distinct >= n {
        return Err(Error::InvalidArgument {
            arg: "labels",
            reason: format!(
                "silhouette needs 2..={} distinct labels, got {distinct}",
                n.saturating_sub(1)
            ),
        });
    }

    let mut total = 0.0;
    let mut sums = vec![0.0; buckets];
    for i in 0..n {
        sums.iter_mut().for_each(|s| *s = 0.0);
        for j in 0..n {
            if i != j {
                sums[labels[j]] += distance(points.row(i), points.row(j))?;
            }
        }
        let own = labels[i];
        if sizes[own] == 1 {
            continue;
        }
        let a = sums[own] / (sizes[own] - 1) as f64;
        let b = (0..buckets)
            .filter(|&c| c != own && sizes[c] > 0)
            .map(|c| sums[c] / sizes[c] as f64)
            .fold(f64::INFINITY, f64::min);
        let scale = a.max(b);
        if scale > 0.0 {
            total += (b - a) / scale;
        }
    }
    Ok(total / n as f64)
}

/// Silhouette scores of the two clusterings of the same points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnalysisReport {
    /// Score of the SymNMF arg-max labels.
    pub nmf: f64,
    /// Score of the k-means labels.
    pub kmeans: f64,
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "nmf: {:.4}", self.nmf)?;
        writeln!(f, "kmeans: {:.4}", self.kmeans)
    }
}

/// Cluster `points` into `k` groups both ways and score each labeling.
pub fn compare(points: &Matrix, k: usize, seed: u64, solver: &SymNmf) -> Result<AnalysisReport> {
    let factor = cluster(points, k, seed, solver)?;
    let nmf = silhouette(points, &labels(&factor.h))?;
    let baseline = kmeans(points, k, KMEANS_MAX_ITER, KMEANS_EPSILON)?;
    let kmeans = silhouette(points, &baseline.labels)?;
    debug!("Silhouette nmf={nmf:.4} kmeans={kmeans:.4}");
    Ok(AnalysisReport { nmf, kmeans })
}
