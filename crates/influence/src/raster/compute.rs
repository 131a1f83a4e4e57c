//! Per-cell aggregation models.
//!
//! Each model scans every marker for every cell (no spatial index). Markers
//! further than the buffer radius are skipped; the rest contribute through a
//! decay kernel evaluated at `distance / radius`.

use crate::decay::DecayKernel;
use crate::geo::{haversine_m, LatLng};
use crate::markers::ScoredMarker;

/// A model bound to the marker data of one run.
#[derive(Debug, Clone, Copy)]
pub enum CellModel<'a> {
    Proximity {
        positions: &'a [LatLng],
        kernel: DecayKernel,
    },
    Distribution {
        markers: &'a [ScoredMarker],
        kernel: DecayKernel,
    },
    Cumulative {
        markers: &'a [ScoredMarker],
        kernel: DecayKernel,
    },
}

impl CellModel<'_> {
    pub fn value(&self, cell: LatLng, radius_m: f64) -> f64 {
        match *self {
            Self::Proximity { positions, kernel } => {
                proximity_value(cell, positions, radius_m, kernel)
            }
            Self::Distribution { markers, kernel } => {
                distribution_value(cell, markers, radius_m, kernel)
            }
            Self::Cumulative { markers, kernel } => {
                cumulative_value(cell, markers, radius_m, kernel)
            }
        }
    }
}

/// Kernel weight of a marker at `marker` seen from `cell`, or `None` when the
/// marker is out of reach.
fn reach_weight(cell: LatLng, marker: LatLng, radius_m: f64, kernel: DecayKernel) -> Option<f64> {
    let distance = haversine_m(cell, marker);
    if distance > radius_m {
        return None;
    }
    Some(kernel.weight(distance / radius_m))
}

/// Mean kernel weight over the markers that contribute a positive weight.
/// Scores are ignored; 0 when nothing contributes.
pub fn proximity_value(cell: LatLng, positions: &[LatLng], radius_m: f64, kernel: DecayKernel) -> f64 {
    let mut total = 0.0;
    let mut contributors = 0u32;
    for &p in positions {
        if let Some(w) = reach_weight(cell, p, radius_m, kernel) {
            if w > 0.0 {
                total += w;
                contributors += 1;
            }
        }
    }
    if contributors == 0 {
        return 0.0;
    }
    total / contributors as f64
}

/// Weighted mean of normalized scores, weights from the kernel. 0 when the
/// total weight is 0.
pub fn distribution_value(
    cell: LatLng,
    markers: &[ScoredMarker],
    radius_m: f64,
    kernel: DecayKernel,
) -> f64 {
    let mut weighted = 0.0;
    let mut weight_sum = 0.0;
    for m in markers {
        if let Some(w) = reach_weight(cell, m.position, radius_m, kernel) {
            weighted += w * m.normalized;
            weight_sum += w;
        }
    }
    if weight_sum <= 0.0 {
        return 0.0;
    }
    weighted / weight_sum
}

/// Sum of `normalized * weight`: nearby markers add up instead of averaging.
pub fn cumulative_value(
    cell: LatLng,
    markers: &[ScoredMarker],
    radius_m: f64,
    kernel: DecayKernel,
) -> f64 {
    markers
        .iter()
        .filter_map(|m| reach_weight(cell, m.position, radius_m, kernel).map(|w| m.normalized * w))
        .sum()
}
