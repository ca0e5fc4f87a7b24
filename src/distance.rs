//! Pairwise vector distances.
//!
//! Both metrics are pure and reject vectors of different lengths with
//! [`Error::DimensionMismatch`] instead of silently truncating.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{Error, Result};

/// Distance between two raw vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "lowercase"))]
pub enum DistanceMetric {
    /// L2 distance: `sqrt(sum((a_i - b_i)^2))`.
    #[default]
    Euclidean,
    /// L-infinity distance: `max(|a_i - b_i|)`.
    Chebyshev,
}

impl DistanceMetric {
    /// Lower-case name of the metric.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            DistanceMetric::Euclidean => "euclidean",
            DistanceMetric::Chebyshev => "chebyshev",
        }
    }

    /// Distance between `a` and `b` under this metric.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the lengths differ.
    pub fn distance(self, a: &[f64], b: &[f64]) -> Result<f64> {
        match self {
            DistanceMetric::Euclidean => euclidean(a, b),
            DistanceMetric::Chebyshev => chebyshev(a, b),
        }
    }

    /// Full symmetric distance matrix between all pairs of `vectors`.
    ///
    /// Rows are computed on the rayon pool with the `parallel` feature. Each
    /// entry is evaluated the same way on either path, so the result is
    /// bit-identical.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the vectors are ragged.
    pub fn pairwise(self, vectors: &[Vec<f64>]) -> Result<DistanceMatrix> {
        #[cfg(feature = "parallel")]
        {
            self.pairwise_parallel(vectors)
        }
        #[cfg(not(feature = "parallel"))]
        {
            self.pairwise_sequential(vectors)
        }
    }

    #[cfg_attr(all(feature = "parallel", not(test)), allow(dead_code))]
    fn pairwise_sequential(self, vectors: &[Vec<f64>]) -> Result<DistanceMatrix> {
        check_rectangular(vectors)?;
        let rows = (0..vectors.len()).map(|i| self.distance_row(vectors, i));
        DistanceMatrix::from_rows(rows.collect::<Result<_>>()?)
    }

    #[cfg(feature = "parallel")]
    fn pairwise_parallel(self, vectors: &[Vec<f64>]) -> Result<DistanceMatrix> {
        check_rectangular(vectors)?;
        let rows = (0..vectors.len()).into_par_iter().map(|i| self.distance_row(vectors, i));
        DistanceMatrix::from_rows(rows.collect::<Result<_>>()?)
    }

    fn distance_row(self, vectors: &[Vec<f64>], i: usize) -> Result<Vec<f64>> {
        vectors.iter().map(|other| self.distance(&vectors[i], other)).collect()
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DistanceMetric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "euclidean" => Ok(DistanceMetric::Euclidean),
            "chebyshev" => Ok(DistanceMetric::Chebyshev),
            other => Err(Error::UnknownSelector { kind: "distance", value: other.to_string() }),
        }
    }
}

fn check_rectangular(vectors: &[Vec<f64>]) -> Result<()> {
    let expected = vectors.first().map_or(0, Vec::len);
    match vectors.iter().find(|v| v.len() != expected) {
        Some(bad) => Err(Error::DimensionMismatch { expected, found: bad.len() }),
        None => Ok(()),
    }
}

fn check_lengths(a: &[f64], b: &[f64]) -> Result<()> {
    if a.len() != b.len() {
        return Err(Error::DimensionMismatch { expected: a.len(), found: b.len() });
    }
    Ok(())
}

/// Euclidean (L2) distance.
///
/// # Errors
///
/// Returns [`Error::DimensionMismatch`] if the lengths differ.
pub fn euclidean(a: &[f64], b: &[f64]) -> Result<f64> {
    check_lengths(a, b)?;
    Ok(a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum::<f64>().sqrt())
}

/// Chebyshev (L-infinity) distance; `0.0` for empty vectors.
///
/// A NaN component makes the whole distance NaN, like the Euclidean sum.
///
/// # Errors
///
/// Returns [`Error::DimensionMismatch`] if the lengths differ.
pub fn chebyshev(a: &[f64], b: &[f64]) -> Result<f64> {
    check_lengths(a, b)?;
    let mut max = 0.0;
    for (x, y) in a.iter().zip(b) {
        let d = (x - y).abs();
        if d.is_nan() {
            return Ok(f64::NAN);
        }
        if d > max {
            max = d;
        }
    }
    Ok(max)
}

/// Dense `n x n` pairwise distance matrix indexed by leaf id.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    values: Vec<f64>,
    n: usize,
}

impl DistanceMatrix {
    /// Wrap precomputed row-major `n x n` distances.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] if `values.len() != n * n`.
    pub fn from_vec(values: Vec<f64>, n: usize) -> Result<Self> {
        if n.checked_mul(n) != Some(values.len()) {
            return Err(Error::ShapeMismatch { rows: n, cols: n, len: values.len() });
        }
        Ok(Self { values, n })
    }

    fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n = rows.len();
        Self::from_vec(rows.into_iter().flatten().collect(), n)
    }

    /// Number of items.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.n
    }

    /// Whether the matrix covers zero items.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Distance between items `i` and `j`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.n + j]
    }

    /// Flat row-major view.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_euclidean() {
        assert_relative_eq!(euclidean(&[0.0, 0.0], &[3.0, 4.0]).unwrap(), 5.0);
        assert_relative_eq!(euclidean(&[1.0, 2.0], &[1.0, 2.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_chebyshev() {
        assert_relative_eq!(chebyshev(&[0.0, 0.0], &[3.0, -4.0]).unwrap(), 4.0);
        assert_relative_eq!(chebyshev(&[], &[]).unwrap(), 0.0);
    }

    #[test]
    fn test_nan_propagates() {
        assert!(euclidean(&[f64::NAN, 0.0], &[1.0, 0.0]).unwrap().is_nan());
        assert!(chebyshev(&[f64::NAN, 0.0], &[1.0, 5.0]).unwrap().is_nan());
    }

    #[test]
    fn test_dimension_mismatch() {
        assert!(matches!(
            euclidean(&[1.0, 2.0], &[1.0]),
            Err(Error::DimensionMismatch { expected: 2, found: 1 })
        ));
        assert!(matches!(
            chebyshev(&[1.0], &[1.0, 2.0, 3.0]),
            Err(Error::DimensionMismatch { expected: 1, found: 3 })
        ));
    }

    #[test]
    fn test_metric_dispatch() {
        let a = [1.0, 1.0];
        let b = [4.0, 5.0];
        assert_relative_eq!(DistanceMetric::Euclidean.distance(&a, &b).unwrap(), 5.0);
        assert_relative_eq!(DistanceMetric::Chebyshev.distance(&a, &b).unwrap(), 4.0);
    }

    #[test]
    fn test_pairwise_symmetric_zero_diagonal() {
        let vectors = vec![vec![0.0, 0.0], vec![3.0, 4.0], vec![6.0, 8.0]];
        let d = DistanceMetric::Euclidean.pairwise(&vectors).unwrap();
        assert_eq!(d.len(), 3);
        for i in 0..3 {
            assert_relative_eq!(d.get(i, i), 0.0);
            for j in 0..3 {
                assert_relative_eq!(d.get(i, j), d.get(j, i));
            }
        }
        assert_relative_eq!(d.get(0, 2), 10.0);
    }

    #[test]
    fn test_pairwise_ragged() {
        let vectors = vec![vec![0.0, 0.0], vec![3.0]];
        assert!(DistanceMetric::Euclidean.pairwise(&vectors).is_err());
    }

    #[test]
    fn test_pairwise_empty() {
        let d = DistanceMetric::Chebyshev.pairwise(&[]).unwrap();
        assert!(d.is_empty());
    }

    #[test]
    fn test_distance_matrix_from_vec() {
        assert!(DistanceMatrix::from_vec(vec![0.0, 1.0, 1.0, 0.0], 2).is_ok());
        assert!(DistanceMatrix::from_vec(vec![0.0, 1.0, 1.0], 2).is_err());
    }

    #[test]
    fn test_metric_parse() {
        assert_eq!("euclidean".parse::<DistanceMetric>().unwrap(), DistanceMetric::Euclidean);
        assert_eq!("chebyshev".parse::<DistanceMetric>().unwrap(), DistanceMetric::Chebyshev);
        assert!("manhattan".parse::<DistanceMetric>().is_err());
        assert_eq!(DistanceMetric::Chebyshev.to_string(), "chebyshev");
    }
}
