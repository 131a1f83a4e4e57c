use std::sync::Arc;

use bevy::prelude::*;
use bevy::tasks::{block_on, AsyncComputeTaskPool, TaskPool};

use crate::analysis::AnalysisMode;
use crate::cancel::CancelToken;
use crate::error::HeatmapError;
use crate::raster::{generate, generate_with_cancel, Grid};

use super::types::{HeatmapOverlay, HeatmapRequest, InFlight, MarkerCatalogue, PendingHeatmap};

/// Turns the latest request of the frame into a generation task.
///
/// Earlier requests in the same frame are superseded before they start. Any
/// run still in flight is cancelled first.
///
/// On WASM (single-threaded) the grid is generated synchronously.
pub fn dispatch_heatmap_requests(
    mut requests: EventReader<HeatmapRequest>,
    catalogue: Res<MarkerCatalogue>,
    mut pending: ResMut<PendingHeatmap>,
    mut overlay: ResMut<HeatmapOverlay>,
) {
    let Some(request) = requests.read().last().cloned() else {
        return;
    };
    if pending.cancel() {
        debug!("heatmap: superseded in-flight generation");
    }

    let config = match request {
        HeatmapRequest::Clear => {
            overlay.clear();
            info!("heatmap: overlay cleared");
            return;
        }
        HeatmapRequest::Generate(config) => config,
    };

    if cfg!(target_arch = "wasm32") {
        let result = generate(&catalogue.markers, &config, &catalogue.schema);
        apply_result(&mut overlay, config.mode, result);
        return;
    }

    let cancel = CancelToken::new();
    let token = cancel.clone();
    let markers = Arc::clone(&catalogue.markers);
    let schema = Arc::clone(&catalogue.schema);
    let task_config = config.clone();

    let pool = AsyncComputeTaskPool::get_or_init(TaskPool::default);
    let task = pool.spawn(async move {
        generate_with_cancel(&markers, &task_config, &schema, &token)
    });
    pending.in_flight = Some(InFlight {
        task,
        cancel,
        config,
    });
}

/// Polls the in-flight task and installs its result once it is done.
pub fn collect_heatmap_results(
    mut pending: ResMut<PendingHeatmap>,
    mut overlay: ResMut<HeatmapOverlay>,
) {
    let Some(in_flight) = pending.in_flight.as_mut() else {
        return;
    };
    let Some(result) = block_on(futures_lite::future::poll_once(&mut in_flight.task)) else {
        return;
    };
    let mode = in_flight.config.mode;
    pending.in_flight = None;
    apply_result(&mut overlay, mode, result);
}

/// Installs a finished grid, or records why there is none.
///
/// A failed run leaves the previous grid on screen. A cancelled run changes
/// nothing at all.
pub fn apply_result(
    overlay: &mut HeatmapOverlay,
    mode: AnalysisMode,
    result: Result<Grid, HeatmapError>,
) {
    match result {
        Ok(grid) => {
            info!(
                "heatmap: {} ready ({}x{}, peak {:.3})",
                mode.label(),
                grid.resolution,
                grid.resolution,
                grid.max_value()
            );
            overlay.install(grid);
        }
        Err(HeatmapError::Cancelled) => {
            debug!("heatmap: {} generation cancelled", mode.label());
        }
        Err(err) => {
            warn!("heatmap: {} generation failed: {}", mode.label(), err);
            overlay.last_error = Some(err);
        }
    }
}
