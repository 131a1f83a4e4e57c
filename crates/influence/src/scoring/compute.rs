//! Pure scoring functions. Free of ECS dependencies.

use crate::category::{CategorySchema, CategorySelector};
use crate::error::HeatmapError;
use crate::markers::{Marker, ScoredMarker};

/// Average score of the enabled sub-labels of one category; 0 when the
/// category is missing or nothing in it is enabled. A label that is enabled
/// but has no finite score counts as 0.
pub fn category_aggregate(marker: &Marker, category: &str) -> f64 {
    let Some(flags) = marker.categories.get(category) else {
        return 0.0;
    };
    let scores = marker.scores.get(category);

    let mut sum = 0.0;
    let mut count = 0u32;
    for (label, _) in flags.iter().filter(|(_, enabled)| **enabled) {
        sum += scores
            .and_then(|s| s.get(label))
            .copied()
            .filter(|v| v.is_finite())
            .unwrap_or(0.0);
        count += 1;
    }

    if count == 0 {
        return 0.0;
    }
    sum / count as f64
}

/// Average of [`category_aggregate`] over already-resolved category names.
/// An empty name list is [`HeatmapError::EmptyCategorySelection`].
pub fn score(marker: &Marker, categories: &[String]) -> Result<f64, HeatmapError> {
    if categories.is_empty() {
        return Err(HeatmapError::EmptyCategorySelection);
    }
    let total: f64 = categories
        .iter()
        .map(|c| category_aggregate(marker, c))
        .sum();
    Ok(total / categories.len() as f64)
}

/// Resolves `selector` once, then scores every marker. `normalized` is left
/// at the raw score until [`super::normalize_scores`] runs.
pub fn score_markers(
    markers: &[Marker],
    selector: &CategorySelector,
    schema: &CategorySchema,
) -> Result<Vec<ScoredMarker>, HeatmapError> {
    let categories = selector.resolve(schema)?;
    markers
        .iter()
        .map(|m| {
            let s = score(m, &categories)?;
            Ok(ScoredMarker {
                position: m.position(),
                score: s,
                normalized: s,
            })
        })
        .collect()
}
