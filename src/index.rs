//! Mapping between display positions and original matrix positions.
//!
//! A clustered heat map shows cell `(i, j)` of the display at original cell
//! `(row_order[i], col_order[j])`. Flat indices on both sides are row-major
//! with the same column count.

use crate::error::{Error, Result};
use crate::matrix::Matrix;
use crate::permutation::Permutation;

/// Translates indices between the reordered display and the original data.
///
/// Lookups are O(1) and allocation-free; the inverse permutations are
/// computed once on construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexMapper {
    row_order: Permutation,
    col_order: Permutation,
    row_position: Permutation,
    col_position: Permutation,
}

impl IndexMapper {
    /// Build a mapper from the row and column display orders.
    #[must_use]
    pub fn new(row_order: Permutation, col_order: Permutation) -> Self {
        let row_position = row_order.inverse();
        let col_position = col_order.inverse();
        Self { row_order, col_order, row_position, col_position }
    }

    /// Mapper that leaves both axes in place.
    #[must_use]
    pub fn identity(rows: usize, cols: usize) -> Self {
        Self::new(Permutation::identity(rows), Permutation::identity(cols))
    }

    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.row_order.len()
    }

    /// Number of columns.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.col_order.len()
    }

    /// Row display order.
    #[must_use]
    pub const fn row_order(&self) -> &Permutation {
        &self.row_order
    }

    /// Column display order.
    #[must_use]
    pub const fn col_order(&self) -> &Permutation {
        &self.col_order
    }

    fn split(&self, flat: usize) -> Option<(usize, usize)> {
        let cols = self.cols();
        if flat >= self.rows() * cols {
            return None;
        }
        Some((flat / cols, flat % cols))
    }

    /// Original flat index of the cell shown at display index `display`.
    #[must_use]
    pub fn to_original_flat_index(&self, display: usize) -> Option<usize> {
        let (i, j) = self.split(display)?;
        Some(self.row_order.get(i)? * self.cols() + self.col_order.get(j)?)
    }

    /// Original row of the cell shown at display index `display`.
    #[must_use]
    pub fn to_original_row(&self, display: usize) -> Option<usize> {
        let (i, _) = self.split(display)?;
        self.row_order.get(i)
    }

    /// Original column of the cell shown at display index `display`.
    #[must_use]
    pub fn to_original_col(&self, display: usize) -> Option<usize> {
        let (_, j) = self.split(display)?;
        self.col_order.get(j)
    }

    /// Display index at which original flat index `original` is shown.
    #[must_use]
    pub fn to_display_flat_index(&self, original: usize) -> Option<usize> {
        let (r, c) = self.split(original)?;
        Some(self.row_position.get(r)? * self.cols() + self.col_position.get(c)?)
    }

    /// Display row of original row `row`.
    #[must_use]
    pub fn to_display_row(&self, row: usize) -> Option<usize> {
        self.row_position.get(row)
    }

    /// Display column of original column `col`.
    #[must_use]
    pub fn to_display_col(&self, col: usize) -> Option<usize> {
        self.col_position.get(col)
    }

    /// Reorder `data` into display order. See [`reshape`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] if `data` does not hold
    /// `rows * cols` values.
    pub fn reshape(&self, data: &[f64]) -> Result<Matrix> {
        reshape(data, &self.row_order, &self.col_order)
    }
}

/// Copy `data` (row-major, original order) into display order.
///
/// Display cell `(i, j)` receives `data[row_order[i] * cols + col_order[j]]`.
///
/// # Errors
///
/// Returns [`Error::ShapeMismatch`] if
/// `row_order.len() * col_order.len() != data.len()`.
pub fn reshape(data: &[f64], row_order: &Permutation, col_order: &Permutation) -> Result<Matrix> {
    let (rows, cols) = (row_order.len(), col_order.len());
    if rows.checked_mul(cols) != Some(data.len()) {
        return Err(Error::ShapeMismatch { rows, cols, len: data.len() });
    }

    Ok(reshape_unchecked(data, row_order, col_order))
}

/// [`reshape`] for callers that already hold `data` of the right length.
pub(crate) fn reshape_unchecked(
    data: &[f64],
    row_order: &Permutation,
    col_order: &Permutation,
) -> Matrix {
    let cols = col_order.len();
    let mut out = Vec::with_capacity(data.len());
    for &r in row_order.as_slice() {
        let row = &data[r * cols..(r + 1) * cols];
        out.extend(col_order.as_slice().iter().map(|&c| row[c]));
    }
    Matrix::from_parts(out, row_order.len(), cols)
}

/// Reorder row or column labels into display order.
///
/// # Errors
///
/// Returns [`Error::DimensionMismatch`] if `items.len() != order.len()`.
pub fn apply_order<T: Clone>(items: &[T], order: &Permutation) -> Result<Vec<T>> {
    order.apply(items)
}
