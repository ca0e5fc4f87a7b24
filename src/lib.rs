//! # heatmap-reorder
//!
//! Row and column reordering for clustered heat maps.
//!
//! A numeric matrix is normalized with a [`Scaler`], its rows and/or columns
//! are grouped by greedy agglomerative clustering, and the resulting binary
//! trees are ladderized and flattened into display orders. An [`IndexMapper`]
//! then translates between positions in the reordered display and cells of
//! the original data.
//!
//! ## Quick Start
//!
//! ```rust
//! use heatmap_reorder::prelude::*;
//!
//! let matrix = Matrix::from_rows(&[
//!     vec![1.0, 2.0, 9.0],
//!     vec![50.0, 60.0, 1.0],
//!     vec![1.5, 2.5, 8.0],
//! ])?;
//!
//! let config = ReorderConfig::new().axis(ClusterAxis::Both).linkage(Linkage::Average);
//! let result = reorder(&matrix, &config)?;
//!
//! assert_eq!(result.row_order.len(), 3);
//! let display = result.reshaped();
//! assert_eq!(display.shape(), (3, 3));
//! # Ok::<(), heatmap_reorder::Error>(())
//! ```
//!
//! ## Determinism
//!
//! Clustering uses no randomness and no unordered containers. Ties between
//! equally distant pairs go to the first pair in enumeration order, so the
//! same input always yields the same orders.
//!
//! ## Feature Flags
//!
//! - `config` (default): serde derives and YAML loading for [`ReorderConfig`]
//! - `parallel`: compute pairwise distance matrices with rayon
//!
//! ## References
//!
//! - Ward, J. H. (1963). "Hierarchical Grouping to Optimize an Objective
//!   Function." *JASA* 58(301).
//! - Sokal, R. R., & Michener, C. D. (1958). Average linkage (UPGMA).

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// Row-major matrix and axis selection.
pub mod matrix;

/// Display orders.
pub mod permutation;

/// Value normalization.
pub mod scale;

// ============================================================================
// Clustering Modules
// ============================================================================

/// Vector distances.
pub mod distance;

/// Cluster-to-cluster distances.
pub mod linkage;

/// Agglomerative clustering and cluster trees.
pub mod cluster;

// ============================================================================
// Reordering Modules
// ============================================================================

/// Display/original index mapping.
pub mod index;

/// Run configuration.
pub mod config;

/// End-to-end scaling and clustering.
pub mod pipeline;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for heatmap-reorder operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Re-exports
// ============================================================================

pub use cluster::{cluster, ClusterTree, HierarchicalClustering};
pub use config::{ClusterAxis, ReorderConfig};
pub use distance::{chebyshev, euclidean, DistanceMatrix, DistanceMetric};
pub use index::{apply_order, reshape, IndexMapper};
pub use linkage::{Linkage, LinkageContext};
pub use matrix::{Axis, Matrix};
pub use permutation::Permutation;
pub use pipeline::{reorder, reorder_cancellable, Reordering};
pub use scale::{DegenerateKind, DegenerateSlice, LinearScale, Scaled, Scaler, Slice};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types for convenient imports.
///
/// ```rust
/// use heatmap_reorder::prelude::*;
/// ```
pub mod prelude {
    pub use crate::cluster::{ClusterTree, HierarchicalClustering};
    pub use crate::config::{ClusterAxis, ReorderConfig};
    pub use crate::distance::DistanceMetric;
    pub use crate::error::{Error, Result};
    pub use crate::index::IndexMapper;
    pub use crate::linkage::Linkage;
    pub use crate::matrix::{Axis, Matrix};
    pub use crate::permutation::Permutation;
    pub use crate::pipeline::{reorder, Reordering};
    pub use crate::scale::{Scaled, Scaler};
}
