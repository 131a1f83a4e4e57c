use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_PERCENTILE_MAX, DEFAULT_PERCENTILE_MIN};
use crate::error::HeatmapError;
use crate::markers::ScoredMarker;

/// Rank statistic with linear interpolation between neighbours.
///
/// `p` is in percent. The fractional rank is `p / 100 * (n - 1)`; an exact
/// index returns that element, anything else interpolates between the floor
/// and ceiling elements. Empty input returns 0. `p` outside [0, 100] is
/// clamped.
pub fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let p = p.clamp(0.0, 100.0);
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let idx = (p / 100.0) * (sorted.len() - 1) as f64;
    let lower = idx.floor() as usize;
    let upper = idx.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    sorted[lower] + (idx - lower as f64) * (sorted[upper] - sorted[lower])
}

/// Rescales `value` so `min` maps to 0 and `max` to 1. A degenerate window
/// (`min == max`) maps every value to exactly 1.
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    if max != min {
        (value - min) / (max - min)
    } else {
        1.0
    }
}

/// Low/high percentiles bounding the normalization range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentileWindow {
    pub min: f64,
    pub max: f64,
}

impl Default for PercentileWindow {
    fn default() -> Self {
        Self {
            min: DEFAULT_PERCENTILE_MIN,
            max: DEFAULT_PERCENTILE_MAX,
        }
    }
}

impl PercentileWindow {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn validate(&self) -> Result<(), HeatmapError> {
        let in_range = |p: f64| (0.0..=100.0).contains(&p);
        if in_range(self.min) && in_range(self.max) && self.min <= self.max {
            Ok(())
        } else {
            Err(HeatmapError::InvalidPercentileWindow {
                min: self.min,
                max: self.max,
            })
        }
    }

    /// Score values at the window's low and high percentiles.
    pub fn bounds(&self, scores: &[f64]) -> (f64, f64) {
        (percentile(scores, self.min), percentile(scores, self.max))
    }
}

/// Fills `normalized` for every marker from the window computed over the
/// whole run's raw scores.
pub fn normalize_scores(
    markers: &mut [ScoredMarker],
    window: PercentileWindow,
) -> Result<(), HeatmapError> {
    window.validate()?;
    let scores: Vec<f64> = markers.iter().map(|m| m.score).collect();
    let (lo, hi) = window.bounds(&scores);
    for m in markers.iter_mut() {
        m.normalized = normalize(m.score, lo, hi);
    }
    Ok(())
}
