//! Falsification tests for heat-map reordering.
//!
//! Each test is a falsifiable claim about the public API that can be
//! empirically refuted.
//!
//! Run: cargo test --test falsification_test

#![allow(clippy::unwrap_used, clippy::float_cmp)]

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use heatmap_reorder::prelude::*;
use heatmap_reorder::{apply_order, cluster, reshape, DegenerateKind, Slice};

fn position(order: &Permutation, item: usize) -> usize {
    order.as_slice().iter().position(|&x| x == item).unwrap()
}

fn is_bijection(order: &Permutation, n: usize) -> bool {
    let mut sorted = order.as_slice().to_vec();
    sorted.sort_unstable();
    sorted == (0..n).collect::<Vec<_>>()
}

// ============================================================================
// CLUSTERING CLAIMS (1-9)
// ============================================================================

/// Claim 1: Identical vectors are at distance zero and merge first at height 0.
#[test]
fn claim_01_identical_vectors_merge_at_zero() {
    let vectors = vec![vec![3.0, 1.0], vec![7.0, 7.0], vec![3.0, 1.0]];
    let distances = DistanceMetric::Euclidean.pairwise(&vectors).unwrap();
    assert_eq!(distances.get(0, 2), 0.0, "Claim 1 FALSIFIED: d(v, v) != 0");

    let tree = HierarchicalClustering::new().linkage(Linkage::Average).fit(&vectors).unwrap();
    let first = tree.merges().next().unwrap();
    assert_eq!(first.height, 0.0, "Claim 1 FALSIFIED: first merge at {}", first.height);
}

/// Claim 2: Clustering output is a bijection on 0..n.
#[test]
fn claim_02_output_is_bijection() {
    for n in [2, 3, 7, 16] {
        let vectors: Vec<Vec<f64>> =
            (0..n).map(|i| vec![(i * 37 % 11) as f64, (i * 5 % 3) as f64]).collect();
        for linkage in [Linkage::Average, Linkage::Ward] {
            let order = cluster(&vectors, DistanceMetric::Euclidean, linkage).unwrap();
            assert!(is_bijection(&order, n), "Claim 2 FALSIFIED: {order:?} for n={n}");
        }
    }
}

/// Claim 3: Duplicate rows end up adjacent: [[0,0],[10,10],[0,0]] -> [0, 2, 1].
#[test]
fn claim_03_duplicates_contiguous() {
    let vectors = vec![vec![0.0, 0.0], vec![10.0, 10.0], vec![0.0, 0.0]];
    let order = cluster(&vectors, DistanceMetric::Euclidean, Linkage::Average).unwrap();
    assert_eq!(
        position(&order, 0).abs_diff(position(&order, 2)),
        1,
        "Claim 3 FALSIFIED: {order:?}"
    );
    assert_eq!(order.as_slice(), &[0, 2, 1]);
}

/// Claim 4: Trivial inputs short-circuit: n=0 -> [], n=1 -> [0].
#[test]
fn claim_04_trivial_inputs() {
    let none: Vec<Vec<f64>> = Vec::new();
    assert!(cluster(&none, DistanceMetric::Chebyshev, Linkage::Ward).unwrap().is_empty());
    let one = vec![vec![42.0]];
    assert_eq!(cluster(&one, DistanceMetric::Chebyshev, Linkage::Ward).unwrap().as_slice(), &[0]);
}

/// Claim 5: Ward without raw data fails before producing any tree.
#[test]
fn claim_05_ward_needs_raw_data() {
    let vectors = vec![vec![0.0], vec![1.0]];
    let distances = DistanceMetric::Euclidean.pairwise(&vectors).unwrap();
    let result = HierarchicalClustering::new().linkage(Linkage::Ward).fit_precomputed(&distances);
    assert!(
        matches!(result, Err(Error::MissingLinkageResource { .. })),
        "Claim 5 FALSIFIED: {result:?}"
    );

    // also for a single leaf, where no merge would be needed
    let single = DistanceMetric::Euclidean.pairwise(&vectors[..1]).unwrap();
    assert!(HierarchicalClustering::new().fit_precomputed(&single).is_err());
}

/// Claim 6: After ladderization a 3-leaf subtree precedes its 1-leaf sibling.
#[test]
fn claim_06_ladderized_larger_first() {
    // the outlier (row 0) comes first in the input but joins last
    let vectors = vec![vec![100.0], vec![0.0], vec![1.0], vec![2.5]];
    let tree = HierarchicalClustering::new().linkage(Linkage::Average).fit(&vectors).unwrap();
    let root = tree.root().unwrap();
    let [left, right] = root.children().unwrap();
    assert_eq!(tree.node(left).unwrap().size(), 3, "Claim 6 FALSIFIED: left child too small");
    assert_eq!(tree.node(right).unwrap().size(), 1);
    assert_eq!(tree.leaf_order().last(), Some(&0));
}

/// Claim 7: Same input twice gives the same permutation.
#[test]
fn claim_07_deterministic() {
    let vectors: Vec<Vec<f64>> =
        (0..20).map(|i| vec![(i % 3) as f64, (i % 5) as f64, (i % 2) as f64]).collect();
    let engine = HierarchicalClustering::new().linkage(Linkage::Average);
    let first = engine.order(&vectors).unwrap();
    for _ in 0..5 {
        assert_eq!(engine.order(&vectors).unwrap(), first, "Claim 7 FALSIFIED");
    }
}

/// Claim 8: A raised cancel flag stops clustering before the first merge.
#[test]
fn claim_08_cancellation() {
    let flag = Arc::new(AtomicBool::new(true));
    let vectors = vec![vec![0.0], vec![1.0], vec![3.0]];
    let result = HierarchicalClustering::new().cancel_flag(flag).fit(&vectors);
    assert!(
        matches!(result, Err(Error::Cancelled { completed_merges: 0 })),
        "Claim 8 FALSIFIED: {result:?}"
    );
}

/// Claim 9: Ragged vectors are rejected, never truncated.
#[test]
fn claim_09_ragged_rejected() {
    let vectors = vec![vec![0.0, 1.0, 2.0], vec![0.0, 1.0]];
    let result = cluster(&vectors, DistanceMetric::Euclidean, Linkage::Average);
    assert!(
        matches!(result, Err(Error::DimensionMismatch { expected: 3, found: 2 })),
        "Claim 9 FALSIFIED: {result:?}"
    );
}

// ============================================================================
// SCALING CLAIMS (10-12)
// ============================================================================

/// Claim 10: row, column, log and none scalers land in [0, 1].
#[test]
fn claim_10_scalers_unit_interval() {
    let matrix = Matrix::new((0..30).map(|i| f64::from(i * i % 17)).collect(), 5, 6).unwrap();
    for scaler in [Scaler::Row, Scaler::Column, Scaler::Log, Scaler::None] {
        let scaled = scaler.apply(&matrix);
        for &v in scaled.matrix.as_slice() {
            assert!(
                v.is_nan() || (0.0..=1.0).contains(&v),
                "Claim 10 FALSIFIED: {scaler} produced {v}"
            );
        }
    }
}

/// Claim 11: An all-zero row under the row scaler is NaN, not an error.
#[test]
fn claim_11_all_zero_row_is_nan() {
    let matrix = Matrix::from_rows(&[vec![1.0, 2.0, 3.0], vec![0.0, 0.0, 0.0]]).unwrap();
    let scaled = Scaler::Row.apply(&matrix);
    assert!(
        scaled.matrix.row(1).unwrap().iter().all(|v| v.is_nan()),
        "Claim 11 FALSIFIED: zero row coerced to a number"
    );
    assert_eq!(scaled.degenerate.len(), 1);
    assert_eq!(scaled.degenerate[0].slice, Slice::Row(1));
    assert_eq!(scaled.degenerate[0].kind, DegenerateKind::AllZero);
}

/// Claim 12: Larger raw values map to smaller scaled values.
#[test]
fn claim_12_scaling_inverts() {
    let matrix = Matrix::from_rows(&[vec![1.0, 10.0, 100.0]]).unwrap();
    for scaler in [Scaler::Row, Scaler::Log, Scaler::None] {
        let row = scaler.scale(&matrix).into_vec();
        assert!(row[0] > row[1] && row[1] > row[2], "Claim 12 FALSIFIED: {scaler} {row:?}");
    }
}

// ============================================================================
// INDEX MAPPING CLAIMS (13-15)
// ============================================================================

/// Claim 13: reshape with identity orders is the identity.
#[test]
fn claim_13_reshape_identity() {
    let data: Vec<f64> = (0..20).map(f64::from).collect();
    let out = reshape(&data, &Permutation::identity(4), &Permutation::identity(5)).unwrap();
    assert_eq!(out.as_slice(), data.as_slice(), "Claim 13 FALSIFIED");
}

/// Claim 14: display -> original -> display is the identity for every cell.
#[test]
fn claim_14_index_round_trip() {
    let mapper = IndexMapper::new(
        Permutation::new(vec![3, 1, 0, 2]).unwrap(),
        Permutation::new(vec![2, 0, 1]).unwrap(),
    );
    for i in 0..12 {
        let original = mapper.to_original_flat_index(i).unwrap();
        assert_eq!(mapper.to_display_flat_index(original), Some(i), "Claim 14 FALSIFIED at {i}");
    }
}

/// Claim 15: Order lengths that do not match the data are rejected.
#[test]
fn claim_15_shape_mismatch() {
    let result = reshape(&[0.0; 5], &Permutation::identity(2), &Permutation::identity(3));
    assert!(
        matches!(result, Err(Error::ShapeMismatch { rows: 2, cols: 3, len: 5 })),
        "Claim 15 FALSIFIED: {result:?}"
    );
}

// ============================================================================
// PIPELINE CLAIMS (16-18)
// ============================================================================

fn expression_matrix() -> Matrix {
    // two gene groups across four samples; samples 0/2 and 1/3 agree
    Matrix::from_rows(&[
        vec![5.0, 90.0, 6.0, 85.0],
        vec![80.0, 4.0, 75.0, 3.0],
        vec![6.0, 88.0, 5.0, 92.0],
        vec![78.0, 5.0, 82.0, 2.0],
        vec![4.0, 91.0, 7.0, 87.0],
    ])
    .unwrap()
}

/// Claim 16: Both axes are clustered independently into coherent blocks.
#[test]
fn claim_16_both_axes_blocks() {
    let config = ReorderConfig::new().axis(ClusterAxis::Both);
    let result = reorder(&expression_matrix(), &config).unwrap();

    let rows: Vec<_> = [0, 2, 4].iter().map(|&r| position(&result.row_order, r)).collect();
    assert_eq!(
        rows.iter().max().unwrap() - rows.iter().min().unwrap(),
        2,
        "Claim 16 FALSIFIED: rows {:?}",
        result.row_order
    );
    // three-row block comes first
    assert_eq!(*rows.iter().min().unwrap(), 0);
    assert_eq!(
        position(&result.col_order, 0).abs_diff(position(&result.col_order, 2)),
        1,
        "Claim 16 FALSIFIED: cols {:?}",
        result.col_order
    );
}

/// Claim 17: An axis that is not clustered keeps the identity order.
#[test]
fn claim_17_unclustered_axis_identity() {
    let result = reorder(&expression_matrix(), &ReorderConfig::default()).unwrap();
    assert!(result.col_order.is_identity(), "Claim 17 FALSIFIED: {:?}", result.col_order);
    assert!(is_bijection(&result.row_order, 5));
}

/// Claim 18: Labels follow the data through the same permutation.
#[test]
fn claim_18_labels_follow_rows() {
    let genes = ["CD3E", "ALB", "CD4", "APOA1", "CD8A"];
    let result = reorder(&expression_matrix(), &ReorderConfig::default()).unwrap();
    let labels = apply_order(&genes, &result.row_order).unwrap();
    let display = result.reshaped();

    for (i, label) in labels.iter().enumerate() {
        let original = genes.iter().position(|g| g == label).unwrap();
        assert_eq!(
            display.row(i).unwrap(),
            result.scaled.row(original).unwrap(),
            "Claim 18 FALSIFIED: label {label} detached from its row"
        );
    }
}

// ============================================================================
// CONFIGURATION CLAIMS (19-20)
// ============================================================================

/// Claim 19: Selector names parse, including the "col" alias.
#[test]
fn claim_19_selector_names() {
    assert_eq!("col".parse::<Axis>().unwrap(), Axis::Column);
    assert_eq!("col".parse::<ClusterAxis>().unwrap(), ClusterAxis::Column);
    assert_eq!("zscore".parse::<Scaler>().unwrap(), Scaler::ZScore);
    assert_eq!("chebyshev".parse::<DistanceMetric>().unwrap(), DistanceMetric::Chebyshev);
    assert_eq!("ward".parse::<Linkage>().unwrap(), Linkage::Ward);
    let err = "median".parse::<Linkage>().unwrap_err();
    assert!(err.to_string().contains("median"), "Claim 19 FALSIFIED: {err}");
}

/// Claim 20: A YAML file drives the same result as the equivalent builder.
#[cfg(feature = "config")]
#[test]
fn claim_20_yaml_config_matches_builder() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "scaler: row\naxis: both\ndistance: chebyshev\nlinkage: average").unwrap();
    let loaded = ReorderConfig::load(file.path()).unwrap();

    let built = ReorderConfig::new()
        .scaler(Scaler::Row)
        .axis(ClusterAxis::Both)
        .distance(DistanceMetric::Chebyshev)
        .linkage(Linkage::Average);
    assert_eq!(loaded, built, "Claim 20 FALSIFIED");

    let a = reorder(&expression_matrix(), &loaded).unwrap();
    let b = reorder(&expression_matrix(), &built).unwrap();
    assert_eq!(a.row_order, b.row_order);
    assert_eq!(a.col_order, b.col_order);
}
