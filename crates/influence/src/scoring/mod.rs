//! Marker scoring and percentile normalization.
//!
//! A marker's score is the average over the selected categories of the
//! average score of its enabled sub-labels. Scores are then mapped through a
//! percentile window so runs with different score ranges stay comparable:
//! - `percentile`: linearly interpolated rank statistic
//! - `normalize`: min/max rescale, `1` when the window is degenerate
//!
//! Both models that read scores (distribution and cumulative) go through
//! `score_markers` followed by `normalize_scores`.

pub mod compute;
pub mod percentile;

#[cfg(test)]
mod tests;

pub use compute::{category_aggregate, score, score_markers};
pub use percentile::{normalize, normalize_scores, percentile, PercentileWindow};
