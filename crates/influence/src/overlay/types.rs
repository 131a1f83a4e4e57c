use std::sync::Arc;

use bevy::prelude::*;
use bevy::tasks::Task;

use crate::analysis::HeatmapConfig;
use crate::cancel::CancelToken;
use crate::category::CategorySchema;
use crate::error::HeatmapError;
use crate::markers::Marker;
use crate::raster::Grid;

// =============================================================================
// Inputs
// =============================================================================

/// Marker set and category schema the next generation runs against.
///
/// Both halves sit behind `Arc` so a dispatched task can hold them without
/// copying while the host swaps in a new catalogue.
#[derive(Resource, Debug, Clone, Default)]
pub struct MarkerCatalogue {
    pub markers: Arc<Vec<Marker>>,
    pub schema: Arc<CategorySchema>,
}

impl MarkerCatalogue {
    pub fn new(markers: Vec<Marker>, schema: CategorySchema) -> Self {
        Self {
            markers: Arc::new(markers),
            schema: Arc::new(schema),
        }
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

/// What the options panel asks for.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum HeatmapRequest {
    /// Recompute from the full catalogue with this configuration.
    Generate(HeatmapConfig),
    /// Drop the current overlay and abandon any in-flight run.
    Clear,
}

// =============================================================================
// Outputs
// =============================================================================

/// The overlay currently on screen.
#[derive(Resource, Debug, Default)]
pub struct HeatmapOverlay {
    pub grid: Option<Grid>,
    /// Error from the most recent failed request. Cleared by the next success.
    pub last_error: Option<HeatmapError>,
    /// Bumped every time `grid` is replaced or cleared.
    pub revision: u64,
}

impl HeatmapOverlay {
    pub fn is_visible(&self) -> bool {
        self.grid.is_some()
    }

    pub fn install(&mut self, grid: Grid) {
        self.grid = Some(grid);
        self.last_error = None;
        self.revision += 1;
    }

    pub fn clear(&mut self) {
        if self.grid.take().is_some() {
            self.revision += 1;
        }
        self.last_error = None;
    }
}

// =============================================================================
// In-flight work
// =============================================================================

pub struct InFlight {
    pub(crate) task: Task<Result<Grid, HeatmapError>>,
    pub(crate) cancel: CancelToken,
    pub(crate) config: HeatmapConfig,
}

/// At most one generation runs at a time.
#[derive(Resource, Default)]
pub struct PendingHeatmap {
    pub(crate) in_flight: Option<InFlight>,
}

impl PendingHeatmap {
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Configuration of the run still in flight, if any.
    pub fn config(&self) -> Option<&HeatmapConfig> {
        self.in_flight.as_ref().map(|f| &f.config)
    }

    /// Signals the in-flight run to stop and forgets it. Returns whether
    /// anything was running.
    pub fn cancel(&mut self) -> bool {
        match self.in_flight.take() {
            Some(in_flight) => {
                in_flight.cancel.cancel();
                true
            }
            None => false,
        }
    }
}
