//! Tests for marker scoring and percentile normalization.

use crate::category::{CategorySchema, CategorySelector};
use crate::error::HeatmapError;
use crate::markers::{Marker, ScoredMarker};
use crate::scoring::{
    category_aggregate, normalize, normalize_scores, percentile, score, score_markers,
    PercentileWindow,
};

fn schema() -> CategorySchema {
    CategorySchema::new(["resources", "services"])
}

fn sample_marker() -> Marker {
    Marker::new(43.45, -80.49)
        .with_entry("resources", "food", 0.8, true)
        .with_entry("resources", "clothing", 0.4, true)
        .with_entry("resources", "shelter", 1.0, false)
        .with_entry("services", "health", 0.6, true)
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-12
}

// -------------------------------------------------------------------------
// Category aggregation
// -------------------------------------------------------------------------

#[test]
fn test_category_aggregate_averages_enabled_labels_only() {
    let m = sample_marker();
    assert!(close(category_aggregate(&m, "resources"), 0.6));
    assert!(close(category_aggregate(&m, "services"), 0.6));
}

#[test]
fn test_category_aggregate_missing_or_disabled_is_zero() {
    let m = Marker::new(0.0, 0.0).with_entry("resources", "food", 0.9, false);
    assert_eq!(category_aggregate(&m, "resources"), 0.0);
    assert_eq!(category_aggregate(&m, "services"), 0.0);
}

#[test]
fn test_enabled_label_without_score_counts_as_zero() {
    let mut m = Marker::new(0.0, 0.0).with_entry("resources", "food", 1.0, true);
    m.categories
        .get_mut("resources")
        .expect("category exists")
        .insert("water".into(), true);
    assert!(close(category_aggregate(&m, "resources"), 0.5));
}

#[test]
fn test_score_averages_across_categories() {
    let m = Marker::new(0.0, 0.0)
        .with_entry("resources", "food", 1.0, true)
        .with_entry("services", "health", 0.0, false);
    let both = vec!["resources".to_string(), "services".to_string()];
    assert!(close(score(&m, &both).expect("score"), 0.5));
    assert!(close(score(&m, &["resources".to_string()]).expect("score"), 1.0));
}

#[test]
fn test_score_is_order_independent() {
    let m = sample_marker();
    let forward = vec!["resources".to_string(), "services".to_string()];
    let backward = vec!["services".to_string(), "resources".to_string()];
    assert!(close(
        score(&m, &forward).expect("score"),
        score(&m, &backward).expect("score")
    ));
}

#[test]
fn test_score_markers_resolves_selector_once() {
    let markers = vec![sample_marker(), Marker::new(1.0, 1.0)];
    let scored = score_markers(&markers, &CategorySelector::All, &schema()).expect("score");
    assert_eq!(scored.len(), 2);
    assert!(close(scored[0].score, 0.6));
    assert_eq!(scored[1].score, 0.0);
}

#[test]
fn test_score_markers_unknown_category_fails_fast() {
    let markers = vec![sample_marker()];
    let result = score_markers(
        &markers,
        &CategorySelector::Single("transport".into()),
        &schema(),
    );
    assert_eq!(
        result,
        Err(HeatmapError::UnknownCategory("transport".into()))
    );
}

// -------------------------------------------------------------------------
// Percentile
// -------------------------------------------------------------------------

#[test]
fn test_percentile_empty_is_zero() {
    assert_eq!(percentile(&[], 50.0), 0.0);
}

#[test]
fn test_percentile_exact_and_interpolated() {
    let data = [4.0, 1.0, 3.0, 2.0, 5.0];
    assert_eq!(percentile(&data, 0.0), 1.0);
    assert_eq!(percentile(&data, 50.0), 3.0);
    assert_eq!(percentile(&data, 100.0), 5.0);
    // idx = 0.1 * 4 = 0.4 -> 1 + 0.4 * (2 - 1)
    assert!(close(percentile(&data, 10.0), 1.4));
}

#[test]
fn test_percentile_is_monotonic_in_p() {
    let data = [0.3, 0.9, 0.1, 0.5, 0.5, 0.7, 0.2];
    let mut prev = f64::NEG_INFINITY;
    for step in 0..=100 {
        let v = percentile(&data, step as f64);
        assert!(v >= prev, "percentile dropped at p={}: {} < {}", step, v, prev);
        prev = v;
    }
}

// -------------------------------------------------------------------------
// Normalize
// -------------------------------------------------------------------------

#[test]
fn test_normalize_degenerate_window_is_one() {
    for v in [-5.0, 0.0, 0.25, 1.0, 42.0] {
        assert_eq!(normalize(v, 3.0, 3.0), 1.0);
    }
}

#[test]
fn test_normalize_unit_window_is_identity() {
    for v in [0.0, 0.1, 0.5, 0.99, 1.0] {
        assert_eq!(normalize(v, 0.0, 1.0), v);
        assert_eq!(normalize(normalize(v, 0.0, 1.0), 0.0, 1.0), v);
    }
}

#[test]
fn test_normalize_extrapolates_outside_window() {
    assert!(close(normalize(1.5, 0.0, 1.0), 1.5));
    assert!(close(normalize(-0.5, 0.0, 1.0), -0.5));
}

// -------------------------------------------------------------------------
// Window
// -------------------------------------------------------------------------

fn scored(scores: &[f64]) -> Vec<ScoredMarker> {
    scores
        .iter()
        .map(|&s| ScoredMarker {
            position: Default::default(),
            score: s,
            normalized: s,
        })
        .collect()
}

#[test]
fn test_full_window_equals_min_max_normalization() {
    let raw = [0.2, 0.9, 0.4, 0.4, 0.65];
    let mut markers = scored(&raw);
    normalize_scores(&mut markers, PercentileWindow::default()).expect("normalize");

    let min = raw.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = raw.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    for (m, &r) in markers.iter().zip(raw.iter()) {
        assert!(close(m.normalized, (r - min) / (max - min)));
    }
}

#[test]
fn test_equal_scores_normalize_to_one() {
    let mut markers = scored(&[0.3, 0.3, 0.3]);
    normalize_scores(&mut markers, PercentileWindow::default()).expect("normalize");
    assert!(markers.iter().all(|m| m.normalized == 1.0));
}

#[test]
fn test_narrow_window_leaves_outliers_outside_unit_range() {
    let mut markers = scored(&[0.0, 1.0, 2.0, 3.0, 100.0]);
    normalize_scores(&mut markers, PercentileWindow::new(25.0, 75.0)).expect("normalize");
    // window bounds are 1.0 and 3.0
    assert!(close(markers[0].normalized, -0.5));
    assert!(close(markers[2].normalized, 0.5));
    assert!(markers[4].normalized > 1.0);
}

#[test]
fn test_invalid_windows_are_rejected() {
    for (lo, hi) in [(-1.0, 50.0), (10.0, 101.0), (60.0, 40.0), (f64::NAN, 100.0)] {
        let mut markers = scored(&[0.1, 0.2]);
        assert!(matches!(
            normalize_scores(&mut markers, PercentileWindow::new(lo, hi)),
            Err(HeatmapError::InvalidPercentileWindow { .. })
        ));
    }
}

#[test]
fn test_score_without_categories_fails() {
    assert_eq!(
        score(&sample_marker(), &[]),
        Err(HeatmapError::EmptyCategorySelection)
    );
}

#[test]
fn test_non_finite_scores_count_as_zero() {
    let m = Marker::new(0.0, 0.0)
        .with_entry("resources", "food", f64::NAN, true)
        .with_entry("resources", "water", f64::INFINITY, true)
        .with_entry("resources", "shelter", 1.0, true);
    assert!(close(category_aggregate(&m, "resources"), 1.0 / 3.0));

    let markers = vec![m, Marker::new(1.0, 1.0).with_entry("resources", "food", 0.5, true)];
    let mut scored =
        score_markers(&markers, &CategorySelector::All, &schema()).expect("scores");
    normalize_scores(&mut scored, PercentileWindow::default()).expect("normalize");
    assert!(scored.iter().all(|s| s.score.is_finite() && s.normalized.is_finite()));
}
