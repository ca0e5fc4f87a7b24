//! Greedy agglomerative clustering.
//!
//! Every step evaluates the linkage for all pairs of active clusters and
//! merges the closest one:
//!
//! ```text
//! active = [0, 1, ..., n-1]
//! while |active| > 1:
//!     (i, j) = argmin over i < j of linkage(active[i], active[j])
//!     active = active - {i, j} + [merge(i, j)]
//! ```
//!
//! That is O(n^3) linkage evaluations, fine for the row or column count of a
//! single heat map. Ties go to the first pair in `(i, j)` order over the
//! active list, and the merged node is appended at the end of that list, so
//! the output is fully determined by the input. A faster nearest-neighbour
//! chain would change which of several equidistant pairs wins.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, trace, warn};

use super::tree::ClusterTree;
use crate::distance::{DistanceMatrix, DistanceMetric};
use crate::error::{Error, Result};
use crate::linkage::{Linkage, LinkageContext};
use crate::permutation::Permutation;

/// Hierarchical (agglomerative) clustering producing a ladderized tree.
#[derive(Debug, Clone, Default)]
pub struct HierarchicalClustering {
    distance: DistanceMetric,
    linkage: Linkage,
    cancel: Option<Arc<AtomicBool>>,
    /// Raise the cancel flag once this many merges have completed.
    #[cfg(test)]
    raise_cancel_after: Option<usize>,
}

impl HierarchicalClustering {
    /// Euclidean distance, Ward linkage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the vector distance metric.
    #[must_use]
    pub fn distance(mut self, distance: DistanceMetric) -> Self {
        self.distance = distance;
        self
    }

    /// Set the linkage method.
    #[must_use]
    pub fn linkage(mut self, linkage: Linkage) -> Self {
        self.linkage = linkage;
        self
    }

    /// Abort between merge steps once `flag` is set.
    #[must_use]
    pub fn cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// The configured distance metric.
    #[must_use]
    pub const fn distance_metric(&self) -> DistanceMetric {
        self.distance
    }

    /// The configured linkage.
    #[must_use]
    pub const fn linkage_method(&self) -> Linkage {
        self.linkage
    }

    /// Cluster `vectors` and return the ladderized tree.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] for ragged vectors and
    /// [`Error::Cancelled`] if the cancel flag was raised.
    pub fn fit(&self, vectors: &[Vec<f64>]) -> Result<ClusterTree> {
        let distances = self.distance.pairwise(vectors)?;
        self.agglomerate(distances.len(), &LinkageContext::new(&distances, vectors))
    }

    /// Cluster from a precomputed distance matrix alone.
    ///
    /// No raw vectors are available here, so Ward linkage is rejected before
    /// any merge happens.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingLinkageResource`] for Ward linkage and
    /// [`Error::Cancelled`] if the cancel flag was raised.
    pub fn fit_precomputed(&self, distances: &DistanceMatrix) -> Result<ClusterTree> {
        self.agglomerate(distances.len(), &LinkageContext::from_distances(distances))
    }

    /// Cluster `vectors` and return the display order of the leaves.
    ///
    /// # Errors
    ///
    /// See [`HierarchicalClustering::fit`].
    pub fn order(&self, vectors: &[Vec<f64>]) -> Result<Permutation> {
        let tree = self.fit(vectors)?;
        Ok(Permutation::from_vec_unchecked(tree.leaf_order()))
    }

    pub(crate) fn agglomerate(
        &self,
        n: usize,
        context: &LinkageContext<'_>,
    ) -> Result<ClusterTree> {
        self.linkage.check(context)?;

        debug!("clustering {n} vectors: distance={}, linkage={}", self.distance, self.linkage);

        let mut tree = ClusterTree::with_leaves(n);
        let mut active: Vec<usize> = (0..n).collect();

        while active.len() > 1 {
            let completed_merges = n - active.len();
            #[cfg(test)]
            self.raise_cancel_at(completed_merges);
            if self.is_cancelled() {
                warn!("clustering cancelled after {completed_merges} of {} merges", n - 1);
                return Err(Error::Cancelled { completed_merges });
            }

            let (i, j, height) = self.closest_pair(&tree, &active, context)?;
            let (a, b) = (active[i], active[j]);
            let merged = tree.merge(a, b, height);
            trace!("merge {completed_merges}: {a} + {b} -> {merged} at {height}");

            // j > i, so removing j first leaves i in place
            active.remove(j);
            active.remove(i);
            active.push(merged);
        }

        tree.ladderize();
        debug!("clustering finished with {} nodes", tree.len());
        Ok(tree)
    }

    /// Positions `(i, j)`, `i < j`, in `active` of the closest pair.
    fn closest_pair(
        &self,
        tree: &ClusterTree,
        active: &[usize],
        context: &LinkageContext<'_>,
    ) -> Result<(usize, usize, f64)> {
        let members = |pos: usize| tree.node(active[pos]).map_or(&[][..], |node| node.members());

        let mut best: Option<(usize, usize, f64)> = None;
        for i in 0..active.len() - 1 {
            for j in (i + 1)..active.len() {
                let d = self.linkage.between(members(i), members(j), context)?;
                // strict comparison: the first pair wins ties, and a NaN
                // distance never displaces a candidate
                if best.map_or(true, |(_, _, best_d)| d < best_d) {
                    best = Some((i, j, d));
                }
            }
        }
        // active.len() >= 2 guarantees at least one pair
        Ok(best.unwrap_or((0, 1, f64::NAN)))
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    #[cfg(test)]
    fn raise_cancel_at(&self, completed_merges: usize) {
        if let (Some(flag), Some(after)) = (&self.cancel, self.raise_cancel_after) {
            if completed_merges == after {
                flag.store(true, Ordering::Relaxed);
            }
        }
    }
}

/// Cluster `vectors` with the given metric and linkage and return the
/// display order.
///
/// # Errors
///
/// Returns [`Error::DimensionMismatch`] for ragged vectors.
pub fn cluster(
    vectors: &[Vec<f64>],
    distance: DistanceMetric,
    linkage: Linkage,
) -> Result<Permutation> {
    HierarchicalClustering::new().distance(distance).linkage(linkage).order(vectors)
}
