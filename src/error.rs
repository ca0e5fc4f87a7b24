//! Error types for heatmap-reorder operations.

use std::io;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while scaling, clustering or reordering a matrix.
///
/// Every variant is a caller or configuration error; none of them is
/// retryable.
#[derive(Error, Debug)]
pub enum Error {
    /// Two vectors handed to a distance function have different lengths.
    #[error("dimension mismatch: expected {expected} elements, found {found}")]
    DimensionMismatch {
        /// Length of the first vector.
        expected: usize,
        /// Length of the second vector.
        found: usize,
    },

    /// Data length does not match the requested rows x cols shape.
    #[error("shape mismatch: {rows} rows * {cols} cols does not match data length {len}")]
    ShapeMismatch {
        /// Number of rows (or row order length).
        rows: usize,
        /// Number of columns (or column order length).
        cols: usize,
        /// Actual data length.
        len: usize,
    },

    /// A linkage needs a resource the caller did not supply.
    #[error("{linkage} linkage requires a {resource}")]
    MissingLinkageResource {
        /// Linkage name.
        linkage: &'static str,
        /// Missing resource description.
        resource: &'static str,
    },

    /// A sequence is not a bijection on `0..len`.
    #[error("invalid permutation of length {len}: value {value} is out of range or repeated")]
    InvalidPermutation {
        /// Permutation length.
        len: usize,
        /// First offending value.
        value: usize,
    },

    /// A selector name could not be parsed.
    #[error("unknown {kind} '{value}'")]
    UnknownSelector {
        /// Selector kind ("scaler", "distance", ...).
        kind: &'static str,
        /// The rejected name.
        value: String,
    },

    /// Clustering was cancelled between two merge steps.
    #[error("clustering cancelled after {completed_merges} merges")]
    Cancelled {
        /// Number of merges completed before cancellation.
        completed_merges: usize,
    },

    /// Configuration parsing error with line number.
    #[error("configuration error at line {line}: {message}")]
    ConfigParse {
        /// Line number where the error occurred (1-indexed, 0 if unknown).
        line: usize,
        /// Error message describing the issue.
        message: String,
    },

    /// Configuration file not found.
    #[error("configuration file not found: {0}")]
    ConfigNotFound(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
