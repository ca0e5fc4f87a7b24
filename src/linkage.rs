//! Inter-cluster distances.
//!
//! | Linkage | Needs | Formula |
//! |---------|-------|---------|
//! | Average | distance matrix | mean(d(a, b)) for a in A, b in B |
//! | Ward | raw data | sqrt(\|A\|\|B\| / (\|A\| + \|B\|) * \|\|mu_A - mu_B\|\|^2) |
//!
//! Each linkage reads from a [`LinkageContext`]. A context that lacks the
//! resource a linkage needs is rejected with
//! [`Error::MissingLinkageResource`]; [`Linkage::check`] lets the clustering
//! engine do that once, before the first merge.

use std::fmt;
use std::str::FromStr;

use crate::distance::{euclidean, DistanceMatrix};
use crate::error::{Error, Result};

/// Cluster-to-cluster distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "lowercase"))]
pub enum Linkage {
    /// Mean of all member-pair distances.
    Average,
    /// Size-weighted distance between centroids.
    #[default]
    Ward,
}

/// A resource a linkage reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkageResource {
    /// Precomputed pairwise distance matrix.
    DistanceMatrix,
    /// Raw data vectors, one per leaf.
    DataMatrix,
}

impl LinkageResource {
    const fn description(self) -> &'static str {
        match self {
            LinkageResource::DistanceMatrix => "distance matrix",
            LinkageResource::DataMatrix => "data matrix",
        }
    }
}

/// What a linkage may read: distances, raw vectors, or both.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkageContext<'a> {
    /// Pairwise distances indexed by leaf id.
    pub distances: Option<&'a DistanceMatrix>,
    /// Raw vectors indexed by leaf id.
    pub data: Option<&'a [Vec<f64>]>,
}

impl<'a> LinkageContext<'a> {
    /// Context carrying both resources.
    #[must_use]
    pub fn new(distances: &'a DistanceMatrix, data: &'a [Vec<f64>]) -> Self {
        Self { distances: Some(distances), data: Some(data) }
    }

    /// Context carrying only a distance matrix.
    #[must_use]
    pub fn from_distances(distances: &'a DistanceMatrix) -> Self {
        Self { distances: Some(distances), data: None }
    }

    /// Context carrying only raw vectors.
    #[must_use]
    pub fn from_data(data: &'a [Vec<f64>]) -> Self {
        Self { distances: None, data: Some(data) }
    }
}

impl Linkage {
    /// Lower-case name of the linkage.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Linkage::Average => "average",
            Linkage::Ward => "ward",
        }
    }

    /// The resource this linkage reads.
    #[must_use]
    pub const fn requires(self) -> LinkageResource {
        match self {
            Linkage::Average => LinkageResource::DistanceMatrix,
            Linkage::Ward => LinkageResource::DataMatrix,
        }
    }

    /// Verify `context` carries what this linkage needs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingLinkageResource`] if it does not.
    pub fn check(self, context: &LinkageContext<'_>) -> Result<()> {
        let present = match self.requires() {
            LinkageResource::DistanceMatrix => context.distances.is_some(),
            LinkageResource::DataMatrix => context.data.is_some(),
        };
        if present {
            Ok(())
        } else {
            Err(self.missing())
        }
    }

    fn missing(self) -> Error {
        Error::MissingLinkageResource {
            linkage: self.name(),
            resource: self.requires().description(),
        }
    }

    /// Distance between the clusters whose leaf ids are `a` and `b`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingLinkageResource`] if `context` lacks the
    /// needed resource, or [`Error::DimensionMismatch`] on ragged data.
    pub fn between(self, a: &[usize], b: &[usize], context: &LinkageContext<'_>) -> Result<f64> {
        match self {
            Linkage::Average => {
                let distances = context.distances.ok_or_else(|| self.missing())?;
                Ok(average(a, b, distances))
            }
            Linkage::Ward => {
                let data = context.data.ok_or_else(|| self.missing())?;
                ward(a, b, data)
            }
        }
    }
}

impl fmt::Display for Linkage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Linkage {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "average" => Ok(Linkage::Average),
            "ward" => Ok(Linkage::Ward),
            other => Err(Error::UnknownSelector { kind: "linkage", value: other.to_string() }),
        }
    }
}

/// Average linkage over a precomputed distance matrix.
#[must_use]
pub fn average(a: &[usize], b: &[usize], distances: &DistanceMatrix) -> f64 {
    let sum: f64 = a.iter().flat_map(|&i| b.iter().map(move |&j| distances.get(i, j))).sum();
    sum / a.len() as f64 / b.len() as f64
}

/// Ward linkage computed from cluster centroids.
///
/// # Errors
///
/// Returns [`Error::DimensionMismatch`] if the member vectors are ragged.
pub fn ward(a: &[usize], b: &[usize], data: &[Vec<f64>]) -> Result<f64> {
    let first = centroid(a, data)?;
    let second = centroid(b, data)?;
    let d = euclidean(&first, &second)?;
    let (na, nb) = (a.len() as f64, b.len() as f64);
    Ok(((na * nb) / (na + nb) * d.powi(2)).sqrt())
}

/// Elementwise mean of the vectors at `members`.
fn centroid(members: &[usize], data: &[Vec<f64>]) -> Result<Vec<f64>> {
    let dim = data.first().map_or(0, Vec::len);
    let mut sum = vec![0.0; dim];
    for &m in members {
        let v = &data[m];
        if v.len() != dim {
            return Err(Error::DimensionMismatch { expected: dim, found: v.len() });
        }
        for (s, x) in sum.iter_mut().zip(v) {
            *s += x;
        }
    }
    let n = members.len() as f64;
    Ok(sum.into_iter().map(|s| s / n).collect())
}
