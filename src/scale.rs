//! Value normalization applied before clustering and color mapping.
//!
//! Every scaler except z-score maps its slice onto `[0, 1]` and inverts it,
//! so the largest raw value ends up at `0` and the smallest at `1`:
//!
//! | Scaler | Slice | Transform |
//! |--------|-------|-----------|
//! | `row` | each row | `1 - (x - min) / (max - min)` |
//! | `column` | each column | same, per column |
//! | `log` | whole matrix | `log2(x + 1)`, then as above |
//! | `zscore` | each row | `log2(x + 1)`, then `(x - mean) / sd` |
//! | `none` | whole matrix | as `row`, with the global extent |
//!
//! A slice with zero range (or zero variance for z-score) cannot be
//! normalized. All of its cells become `NaN` and the slice is reported in
//! [`Scaled::degenerate`]; it is never coerced to zero.
//!
//! Non-finite cells, including those `log2(x + 1)` produces for `x <= -1`,
//! become `NaN` on their own and are left out of the extent and the moments
//! of their slice. Only a slice with no finite cell at all is reported.

use std::fmt;
use std::str::FromStr;

use log::warn;

use crate::error::{Error, Result};
use crate::matrix::{Axis, Matrix};

// ============================================================================
// LinearScale
// ============================================================================

/// Linear map from a continuous domain onto a continuous range.
///
/// The range may be reversed: `(1.0, 0.0)` maps the domain minimum to `1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_min: f64,
    domain_max: f64,
    range_min: f64,
    range_max: f64,
}

impl LinearScale {
    /// Create a linear scale.
    ///
    /// Returns `None` if the domain has zero width or a non-finite bound.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Option<Self> {
        if domain.0 == domain.1 || !domain.0.is_finite() || !domain.1.is_finite() {
            return None;
        }

        Some(Self {
            domain_min: domain.0,
            domain_max: domain.1,
            range_min: range.0,
            range_max: range.1,
        })
    }

    /// Create a scale over the extent of `data`. Non-finite cells are ignored.
    #[must_use]
    pub fn from_data(data: &[f64], range: (f64, f64)) -> Option<Self> {
        let (min, max) = extent(data.iter().copied())?;
        Self::new((min, max), range)
    }

    /// Map a domain value into the range.
    #[must_use]
    pub fn scale(&self, value: f64) -> f64 {
        let t = (value - self.domain_min) / (self.domain_max - self.domain_min);
        self.range_min + t * (self.range_max - self.range_min)
    }

    /// Invert the scale (range to domain).
    #[must_use]
    pub fn invert(&self, value: f64) -> f64 {
        let t = (value - self.range_min) / (self.range_max - self.range_min);
        self.domain_min + t * (self.domain_max - self.domain_min)
    }

    /// Domain extent.
    #[must_use]
    pub const fn domain(&self) -> (f64, f64) {
        (self.domain_min, self.domain_max)
    }

    /// Range extent.
    #[must_use]
    pub const fn range(&self) -> (f64, f64) {
        (self.range_min, self.range_max)
    }
}

/// Min and max of the finite values; `None` if there are none.
fn extent(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.filter(|v| v.is_finite()).fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((min, max)) => Some((f64::min(min, v), f64::max(max, v))),
    })
}

// ============================================================================
// Degenerate slices
// ============================================================================

/// The part of a matrix a normalization was computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slice {
    /// One row, by index.
    Row(usize),
    /// One column, by index.
    Column(usize),
    /// The whole matrix (global scalers).
    Matrix,
}

impl fmt::Display for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slice::Row(i) => write!(f, "row {i}"),
            Slice::Column(i) => write!(f, "column {i}"),
            Slice::Matrix => f.write_str("matrix"),
        }
    }
}

/// Why a slice could not be normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DegenerateKind {
    /// Every value is zero.
    AllZero,
    /// Every finite value is equal (but not zero).
    ZeroRange,
    /// Population variance is zero (z-score only).
    ZeroVariance,
    /// No value is finite.
    NonFinite,
}

impl fmt::Display for DegenerateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DegenerateKind::AllZero => "all values are zero",
            DegenerateKind::ZeroRange => "zero range",
            DegenerateKind::ZeroVariance => "zero variance",
            DegenerateKind::NonFinite => "no finite values",
        })
    }
}

/// A slice whose cells were set to `NaN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DegenerateSlice {
    /// Which slice.
    pub slice: Slice,
    /// Why it is degenerate.
    pub kind: DegenerateKind,
}

impl fmt::Display for DegenerateSlice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.slice, self.kind)
    }
}

/// Output of [`Scaler::apply`].
#[derive(Debug, Clone, PartialEq)]
pub struct Scaled {
    /// Scaled values, same shape as the input.
    pub matrix: Matrix,
    /// Slices set to `NaN`, in the order they were found.
    pub degenerate: Vec<DegenerateSlice>,
}

impl Scaled {
    /// Whether every slice could be normalized.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.degenerate.is_empty()
    }
}

// ============================================================================
// Scaler
// ============================================================================

/// Normalization applied to the raw matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "lowercase"))]
pub enum Scaler {
    /// Per-row min/max rescale, inverted.
    Row,
    /// Per-column min/max rescale, inverted.
    Column,
    /// `log2(x + 1)`, global min/max rescale, inverted.
    #[default]
    Log,
    /// Per-row `log2(x + 1)` standardized to zero mean, unit variance.
    ZScore,
    /// Global min/max rescale, inverted.
    None,
}

impl Scaler {
    /// Lower-case name of the scaler.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Scaler::Row => "row",
            Scaler::Column => "column",
            Scaler::Log => "log",
            Scaler::ZScore => "zscore",
            Scaler::None => "none",
        }
    }

    /// Scale `matrix`, reporting degenerate slices.
    #[must_use]
    pub fn apply(self, matrix: &Matrix) -> Scaled {
        let (rows, cols) = matrix.shape();
        let mut degenerate = Vec::new();

        let data = match self {
            Scaler::Row => {
                rescale_slices(matrix.as_slice(), rows, cols, Axis::Row, &mut degenerate)
            }
            Scaler::Column => {
                rescale_slices(matrix.as_slice(), rows, cols, Axis::Column, &mut degenerate)
            }
            Scaler::Log => {
                let logged: Vec<f64> = matrix.as_slice().iter().map(|&x| log1p2(x)).collect();
                rescale_global(logged, &mut degenerate)
            }
            Scaler::ZScore => zscore_rows(matrix.as_slice(), rows, cols, &mut degenerate),
            Scaler::None => rescale_global(matrix.as_slice().to_vec(), &mut degenerate),
        };

        for slice in &degenerate {
            warn!("{} scaler: {slice}; cells set to NaN", self.name());
        }

        Scaled { matrix: Matrix::from_parts(data, rows, cols), degenerate }
    }

    /// Scale `matrix`, discarding the degenerate-slice report.
    #[must_use]
    pub fn scale(self, matrix: &Matrix) -> Matrix {
        self.apply(matrix).matrix
    }
}

impl fmt::Display for Scaler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scaler {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "row" => Ok(Scaler::Row),
            "column" => Ok(Scaler::Column),
            "log" => Ok(Scaler::Log),
            "zscore" => Ok(Scaler::ZScore),
            "none" => Ok(Scaler::None),
            other => Err(Error::UnknownSelector { kind: "scaler", value: other.to_string() }),
        }
    }
}

fn log1p2(x: f64) -> f64 {
    (x + 1.0).log2()
}

fn classify(min: f64, max: f64) -> DegenerateKind {
    if min == 0.0 && max == 0.0 {
        DegenerateKind::AllZero
    } else {
        DegenerateKind::ZeroRange
    }
}

/// Rescale `values` in place onto `[1, 0]`; `Some(kind)` if degenerate.
fn rescale_in_place(values: &mut [f64]) -> Option<DegenerateKind> {
    let Some((min, max)) = extent(values.iter().copied()) else {
        values.fill(f64::NAN);
        return Some(DegenerateKind::NonFinite);
    };
    let Some(scale) = LinearScale::new((min, max), (1.0, 0.0)) else {
        values.fill(f64::NAN);
        return Some(classify(min, max));
    };
    for v in values.iter_mut() {
        *v = if v.is_finite() { scale.scale(*v) } else { f64::NAN };
    }
    None
}

fn rescale_slices(
    data: &[f64],
    rows: usize,
    cols: usize,
    axis: Axis,
    degenerate: &mut Vec<DegenerateSlice>,
) -> Vec<f64> {
    match axis {
        Axis::Row => {
            let mut out = data.to_vec();
            if cols == 0 {
                return out;
            }
            for (r, row) in out.chunks_mut(cols).enumerate() {
                if let Some(kind) = rescale_in_place(row) {
                    degenerate.push(DegenerateSlice { slice: Slice::Row(r), kind });
                }
            }
            out
        }
        Axis::Column => {
            // scale the transpose row-wise, then transpose back
            let mut transposed = vec![0.0; data.len()];
            for r in 0..rows {
                for c in 0..cols {
                    transposed[c * rows + r] = data[r * cols + c];
                }
            }
            if rows > 0 {
                for (c, column) in transposed.chunks_mut(rows).enumerate() {
                    if let Some(kind) = rescale_in_place(column) {
                        degenerate.push(DegenerateSlice { slice: Slice::Column(c), kind });
                    }
                }
            }
            let mut out = vec![0.0; data.len()];
            for c in 0..cols {
                for r in 0..rows {
                    out[r * cols + c] = transposed[c * rows + r];
                }
            }
            out
        }
    }
}

fn rescale_global(mut data: Vec<f64>, degenerate: &mut Vec<DegenerateSlice>) -> Vec<f64> {
    if data.is_empty() {
        return data;
    }
    if let Some(kind) = rescale_in_place(&mut data) {
        degenerate.push(DegenerateSlice { slice: Slice::Matrix, kind });
    }
    data
}

fn zscore_rows(
    data: &[f64],
    rows: usize,
    cols: usize,
    degenerate: &mut Vec<DegenerateSlice>,
) -> Vec<f64> {
    let mut out: Vec<f64> = data.iter().map(|&x| log1p2(x)).collect();
    if cols == 0 {
        return out;
    }
    debug_assert_eq!(out.len(), rows * cols);

    for (r, row) in out.chunks_mut(cols).enumerate() {
        // equal values have zero variance; testing them directly avoids
        // rounding noise in the mean turning a constant row into huge scores
        let kind = match extent(row.iter().copied()) {
            None => Some(DegenerateKind::NonFinite),
            Some((min, max)) if min == max => Some(DegenerateKind::ZeroVariance),
            Some(_) => None,
        };
        let (mean, variance) = mean_variance(row);
        if let Some(kind) = kind.or((variance == 0.0).then_some(DegenerateKind::ZeroVariance)) {
            row.fill(f64::NAN);
            degenerate.push(DegenerateSlice { slice: Slice::Row(r), kind });
            continue;
        }
        let sd = variance.sqrt();
        for x in row.iter_mut() {
            *x = if x.is_finite() { (*x - mean) / sd } else { f64::NAN };
        }
    }
    out
}

/// Population mean and variance of the finite values.
fn mean_variance(values: &[f64]) -> (f64, f64) {
    let finite = || values.iter().copied().filter(|x| x.is_finite());
    let n = finite().count() as f64;
    let mean = finite().sum::<f64>() / n;
    let variance = finite().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    (mean, variance)
}
