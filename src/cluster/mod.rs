//! Agglomerative clustering of the rows or columns of a heat map.
//!
//! Bottom-up: every vector starts as its own cluster and the two closest
//! clusters are merged until one remains. The resulting binary tree is
//! ladderized (larger subtree first at every node) and flattened into a
//! leaf order, which becomes the display order of that axis.
//!
//! | Linkage | Reads | Notes |
//! |---------|-------|-------|
//! | [`Linkage::Average`](crate::Linkage::Average) | distance matrix | works with [`HierarchicalClustering::fit_precomputed`] |
//! | [`Linkage::Ward`](crate::Linkage::Ward) | raw vectors | needs [`HierarchicalClustering::fit`] |
//!
//! ```
//! use heatmap_reorder::cluster::HierarchicalClustering;
//! use heatmap_reorder::{DistanceMetric, Linkage};
//!
//! let rows = vec![vec![0.0, 0.0], vec![10.0, 10.0], vec![0.0, 0.0]];
//! let order = HierarchicalClustering::new()
//!     .distance(DistanceMetric::Euclidean)
//!     .linkage(Linkage::Average)
//!     .order(&rows)
//!     .unwrap();
//! assert_eq!(order.as_slice(), &[0, 2, 1]);
//! ```

mod hierarchical;
mod tree;

pub use hierarchical::{cluster, HierarchicalClustering};
pub use tree::{ClusterNode, ClusterTree, Leaves, Merge};
