//! Reordering configuration.
//!
//! A [`ReorderConfig`] names the four selectors of a run. With the `config`
//! feature it can be read from YAML:
//!
//! ```yaml
//! scaler: zscore
//! axis: both
//! distance: chebyshev
//! linkage: average
//! ```
//!
//! Missing keys fall back to the defaults (`log`, `row`, `euclidean`, `ward`).

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "config")]
use std::path::Path;

use crate::distance::DistanceMetric;
use crate::error::{Error, Result};
use crate::linkage::Linkage;
use crate::matrix::Axis;
use crate::scale::Scaler;

/// Which axes of the matrix get clustered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "lowercase"))]
pub enum ClusterAxis {
    /// Rows only.
    #[default]
    Row,
    /// Columns only.
    #[cfg_attr(feature = "config", serde(alias = "col"))]
    Column,
    /// Rows and columns, independently.
    Both,
    /// Neither; both orders stay the identity.
    None,
}

impl ClusterAxis {
    /// Lower-case name of the selector.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ClusterAxis::Row => "row",
            ClusterAxis::Column => "column",
            ClusterAxis::Both => "both",
            ClusterAxis::None => "none",
        }
    }

    /// Whether `axis` is clustered under this selector.
    #[must_use]
    pub const fn includes(self, axis: Axis) -> bool {
        matches!(
            (self, axis),
            (ClusterAxis::Row | ClusterAxis::Both, Axis::Row)
                | (ClusterAxis::Column | ClusterAxis::Both, Axis::Column)
        )
    }
}

impl fmt::Display for ClusterAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ClusterAxis {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "row" => Ok(ClusterAxis::Row),
            "column" | "col" => Ok(ClusterAxis::Column),
            "both" => Ok(ClusterAxis::Both),
            "none" => Ok(ClusterAxis::None),
            other => Err(Error::UnknownSelector { kind: "axis", value: other.to_string() }),
        }
    }
}

/// Selectors for one [`reorder`](crate::pipeline::reorder) run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ReorderConfig {
    /// Normalization applied before clustering.
    pub scaler: Scaler,
    /// Axes to cluster.
    pub axis: ClusterAxis,
    /// Vector distance.
    pub distance: DistanceMetric,
    /// Cluster-to-cluster distance.
    pub linkage: Linkage,
}

impl ReorderConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the scaler.
    #[must_use]
    pub fn scaler(mut self, scaler: Scaler) -> Self {
        self.scaler = scaler;
        self
    }

    /// Set the clustered axes.
    #[must_use]
    pub fn axis(mut self, axis: ClusterAxis) -> Self {
        self.axis = axis;
        self
    }

    /// Set the distance metric.
    #[must_use]
    pub fn distance(mut self, distance: DistanceMetric) -> Self {
        self.distance = distance;
        self
    }

    /// Set the linkage.
    #[must_use]
    pub fn linkage(mut self, linkage: Linkage) -> Self {
        self.linkage = linkage;
        self
    }
}

#[cfg(feature = "config")]
impl ReorderConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigNotFound`] if the file does not exist,
    /// [`Error::Io`] if it cannot be read and [`Error::ConfigParse`] if it is
    /// not valid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::ConfigNotFound(path.display().to_string()),
            _ => Error::Io(e),
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error with line number if parsing fails.
    pub fn parse(yaml: &str) -> Result<Self> {
        // an empty document deserializes as unit, not as an empty map
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml_ng::from_str(yaml).map_err(|e| {
            let line = e.location().map_or(0, |l| l.line());
            Error::ConfigParse { line, message: e.to_string() }
        })
    }

    /// Serializes the configuration to YAML.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigParse`] if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml_ng::to_string(self)
            .map_err(|e| Error::ConfigParse { line: 0, message: e.to_string() })
    }

    /// Loads configuration with fallback to defaults.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_default()
    }
}
