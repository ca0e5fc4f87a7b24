//! Scale, cluster and reorder in one call.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use log::debug;

use crate::cluster::HierarchicalClustering;
use crate::config::ReorderConfig;
use crate::error::Result;
use crate::index::{reshape_unchecked, IndexMapper};
use crate::matrix::{Axis, Matrix};
use crate::permutation::Permutation;
use crate::scale::DegenerateSlice;

/// Result of [`reorder`].
#[derive(Debug, Clone, PartialEq)]
pub struct Reordering {
    /// Scaled matrix in original order.
    pub scaled: Matrix,
    /// Row display order (identity if rows were not clustered).
    pub row_order: Permutation,
    /// Column display order (identity if columns were not clustered).
    pub col_order: Permutation,
    /// Slices the scaler could not normalize.
    pub degenerate: Vec<DegenerateSlice>,
}

impl Reordering {
    /// Index translation between display and original positions.
    #[must_use]
    pub fn index_mapper(&self) -> IndexMapper {
        IndexMapper::new(self.row_order.clone(), self.col_order.clone())
    }

    /// The scaled matrix in display order.
    #[must_use]
    pub fn reshaped(&self) -> Matrix {
        // both orders were built from the shape of `scaled`
        reshape_unchecked(self.scaled.as_slice(), &self.row_order, &self.col_order)
    }
}

/// Scale `matrix` and cluster the axes selected by `config`.
///
/// Both axes are clustered from the same scaled matrix, independently of
/// each other.
///
/// # Errors
///
/// Propagates clustering errors; see [`HierarchicalClustering::fit`].
pub fn reorder(matrix: &Matrix, config: &ReorderConfig) -> Result<Reordering> {
    run(matrix, config, None)
}

/// [`reorder`] with a cancel flag checked between merge steps.
///
/// # Errors
///
/// Returns [`Error::Cancelled`](crate::Error::Cancelled) once `cancel` is
/// set, and otherwise the same errors as [`reorder`].
pub fn reorder_cancellable(
    matrix: &Matrix,
    config: &ReorderConfig,
    cancel: Arc<AtomicBool>,
) -> Result<Reordering> {
    run(matrix, config, Some(cancel))
}

fn run(
    matrix: &Matrix,
    config: &ReorderConfig,
    cancel: Option<Arc<AtomicBool>>,
) -> Result<Reordering> {
    let (rows, cols) = matrix.shape();
    debug!(
        "reorder {rows}x{cols}: scaler={}, axis={}, distance={}, linkage={}",
        config.scaler, config.axis, config.distance, config.linkage
    );

    let scaled = config.scaler.apply(matrix);

    let mut engine =
        HierarchicalClustering::new().distance(config.distance).linkage(config.linkage);
    if let Some(flag) = cancel {
        engine = engine.cancel_flag(flag);
    }

    let order = |axis: Axis| -> Result<Permutation> {
        if config.axis.includes(axis) {
            engine.order(&scaled.matrix.vectors(axis))
        } else {
            Ok(Permutation::identity(scaled.matrix.count(axis)))
        }
    };
    let row_order = order(Axis::Row)?;
    let col_order = order(Axis::Column)?;

    debug!("reorder finished with {} degenerate slices", scaled.degenerate.len());
    Ok(Reordering { scaled: scaled.matrix, row_order, col_order, degenerate: scaled.degenerate })
}
