//! Entry points: one call per "Generate" action, recomputing everything from
//! the full marker set.

use bevy::log::debug;
use bevy::tasks::{ComputeTaskPool, TaskPool};

use crate::analysis::{AnalysisMode, HeatmapConfig};
use crate::cancel::CancelToken;
use crate::category::{CategorySchema, CategorySelector};
use crate::decay::DecayKernel;
use crate::error::HeatmapError;
use crate::markers::{validate_markers, Marker, ScoredMarker};
use crate::scoring::{normalize_scores, score_markers};

use super::compute::CellModel;
use super::types::{Grid, GridLayout};

/// Generates a grid for `markers` under `config`.
///
/// All validation happens before any cell is evaluated. On error no grid is
/// produced.
pub fn generate(
    markers: &[Marker],
    config: &HeatmapConfig,
    schema: &CategorySchema,
) -> Result<Grid, HeatmapError> {
    generate_with_cancel(markers, config, schema, &CancelToken::new())
}

/// [`generate`] with a cancellation token checked before every row. A
/// cancelled run returns [`HeatmapError::Cancelled`] and nothing else.
pub fn generate_with_cancel(
    markers: &[Marker],
    config: &HeatmapConfig,
    schema: &CategorySchema,
    cancel: &CancelToken,
) -> Result<Grid, HeatmapError> {
    #[cfg(feature = "trace")]
    let _span = bevy::log::info_span!("generate_heatmap", mode = ?config.mode).entered();

    config.validate()?;
    let positions = validate_markers(markers)?;
    let layout =
        GridLayout::around(&positions, config.resolution).ok_or(HeatmapError::NoMarkers)?;

    let scored = if config.mode.uses_scores() {
        prepare_scores(markers, config, schema)?
    } else {
        Vec::new()
    };

    let model = match config.mode {
        AnalysisMode::Proximity => CellModel::Proximity {
            positions: &positions,
            kernel: config.decay_variant.kernel(),
        },
        AnalysisMode::Distribution => CellModel::Distribution {
            markers: &scored,
            kernel: DecayKernel::for_distribution(config.buffer_radius_meters),
        },
        AnalysisMode::Cumulative => CellModel::Cumulative {
            markers: &scored,
            kernel: DecayKernel::Power(config.decay_power),
        },
    };

    let values = rasterize(&layout, &model, config.buffer_radius_meters, cancel)?;
    let grid = Grid::from_values(layout, config.mode, values);

    debug!(
        "heatmap: {:?} over {} markers at {}x{}, peak {:.4}",
        config.mode,
        markers.len(),
        config.resolution,
        config.resolution,
        grid.max_value()
    );
    Ok(grid)
}

/// Scores and normalizes every marker for the score-reading models.
pub fn prepare_scores(
    markers: &[Marker],
    config: &HeatmapConfig,
    schema: &CategorySchema,
) -> Result<Vec<ScoredMarker>, HeatmapError> {
    let selector = CategorySelector::parse(&config.category_selector, schema);
    let mut scored = score_markers(markers, &selector, schema)?;
    normalize_scores(&mut scored, config.percentile_window())?;
    Ok(scored)
}

/// Evaluates every cell, one task per row on the compute pool. Rows share the
/// read-only model and write nothing in common, so the output is identical
/// to a sequential scan.
pub fn rasterize(
    layout: &GridLayout,
    model: &CellModel<'_>,
    radius_m: f64,
    cancel: &CancelToken,
) -> Result<Vec<f64>, HeatmapError> {
    let pool = ComputeTaskPool::get_or_init(TaskPool::default);
    let rows: Vec<Option<Vec<f64>>> = pool.scope(|s| {
        for y in 0..layout.resolution {
            s.spawn(async move {
                if cancel.is_cancelled() {
                    return None;
                }
                let row: Vec<f64> = (0..layout.resolution)
                    .map(|x| model.value(layout.cell_point(x, y), radius_m))
                    .collect();
                Some(row)
            });
        }
    });

    if cancel.is_cancelled() {
        return Err(HeatmapError::Cancelled);
    }
    let mut values = Vec::with_capacity(layout.cell_count());
    for row in rows {
        values.extend(row.ok_or(HeatmapError::Cancelled)?);
    }
    Ok(values)
}
