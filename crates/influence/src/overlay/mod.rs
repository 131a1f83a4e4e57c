//! ECS front end for the generator.
//!
//! A host sends [`HeatmapRequest`] events; generation runs on the
//! `AsyncComputeTaskPool` and the finished grid lands in [`HeatmapOverlay`].
//! A new request cancels whatever is still in flight, so the overlay only
//! ever shows the result of the latest completed request.

pub mod systems;
pub mod types;


use bevy::prelude::*;

pub use systems::{apply_result, collect_heatmap_results, dispatch_heatmap_requests};
pub use types::{HeatmapOverlay, HeatmapRequest, MarkerCatalogue, PendingHeatmap};

pub struct HeatmapPlugin;

impl Plugin for HeatmapPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MarkerCatalogue>()
            .init_resource::<HeatmapOverlay>()
            .init_resource::<PendingHeatmap>()
            .add_event::<HeatmapRequest>()
            .add_systems(
                Update,
                (dispatch_heatmap_requests, collect_heatmap_results).chain(),
            );
    }
}
