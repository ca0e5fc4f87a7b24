//! Row-major numeric matrix and per-axis vector extraction.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// One of the two axes of a matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "lowercase"))]
pub enum Axis {
    /// Rows: vectors of length `cols`, one per row.
    Row,
    /// Columns: vectors of length `rows`, one per column.
    #[cfg_attr(feature = "config", serde(alias = "col"))]
    Column,
}

impl Axis {
    /// Lower-case name of the axis.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Axis::Row => "row",
            Axis::Column => "column",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Axis {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "row" => Ok(Axis::Row),
            "column" | "col" => Ok(Axis::Column),
            other => Err(Error::UnknownSelector { kind: "axis", value: other.to_string() }),
        }
    }
}

/// A `rows x cols` grid of `f64` stored flat in row-major order.
///
/// Element `(r, c)` lives at index `r * cols + c`. The shape is validated on
/// construction; every transform in this crate returns a new matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl Matrix {
    /// Create a matrix from flat row-major data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] if `data.len() != rows * cols`.
    pub fn new(data: Vec<f64>, rows: usize, cols: usize) -> Result<Self> {
        if rows.checked_mul(cols) != Some(data.len()) {
            return Err(Error::ShapeMismatch { rows, cols, len: data.len() });
        }
        Ok(Self { data, rows, cols })
    }

    /// Create a matrix from a slice of equally long rows.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the rows are ragged.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if let Some(bad) = rows.iter().find(|r| r.len() != cols) {
            return Err(Error::DimensionMismatch { expected: cols, found: bad.len() });
        }
        Ok(Self { data: rows.iter().flatten().copied().collect(), rows: rows.len(), cols })
    }

    /// Shape is trusted by the caller.
    pub(crate) fn from_parts(data: Vec<f64>, rows: usize, cols: usize) -> Self {
        debug_assert_eq!(data.len(), rows * cols);
        Self { data, rows, cols }
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Total number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the matrix holds no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Flat row-major view of the values.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Consume the matrix, returning the flat row-major values.
    #[must_use]
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Value at `(row, col)`.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.data.get(row * self.cols + col).copied()
    }

    /// Borrow one row.
    #[must_use]
    pub fn row(&self, row: usize) -> Option<&[f64]> {
        if row >= self.rows {
            return None;
        }
        self.data.get(row * self.cols..(row + 1) * self.cols)
    }

    /// Copy one column out of the row-major storage.
    #[must_use]
    pub fn column(&self, col: usize) -> Option<Vec<f64>> {
        if col >= self.cols {
            return None;
        }
        Some(self.data.iter().skip(col).step_by(self.cols).copied().collect())
    }

    /// Number of vectors along `axis`.
    #[must_use]
    pub const fn count(&self, axis: Axis) -> usize {
        match axis {
            Axis::Row => self.rows,
            Axis::Column => self.cols,
        }
    }

    /// Split the matrix into vectors along `axis`.
    ///
    /// `Axis::Row` yields `rows` vectors of length `cols`; `Axis::Column`
    /// yields `cols` vectors of length `rows`.
    #[must_use]
    pub fn vectors(&self, axis: Axis) -> Vec<Vec<f64>> {
        match axis {
            Axis::Row => (0..self.rows)
                .map(|r| self.data[r * self.cols..(r + 1) * self.cols].to_vec())
                .collect(),
            Axis::Column => (0..self.cols)
                .map(|c| (0..self.rows).map(|r| self.data[r * self.cols + c]).collect())
                .collect(),
        }
    }

    /// Transposed copy (`cols x rows`).
    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for c in 0..self.cols {
            for r in 0..self.rows {
                data.push(self.data[r * self.cols + c]);
            }
        }
        Self { data, rows: self.cols, cols: self.rows }
    }
}
