//! # TestMap: headless harness for the heat-map plugin
//!
//! Wraps a `bevy::app::App` with `MinimalPlugins` + [`HeatmapPlugin`] so tests
//! and benches can drive requests through the real dispatch/collect systems.

use std::time::Duration;

use bevy::app::App;
use bevy::prelude::*;

use crate::analysis::HeatmapConfig;
use crate::category::CategorySchema;
use crate::markers::Marker;
use crate::overlay::{HeatmapOverlay, HeatmapPlugin, HeatmapRequest, MarkerCatalogue, PendingHeatmap};
use crate::raster::Grid;

/// Upper bound on frames `run_until_idle` waits for a generation.
const MAX_IDLE_FRAMES: u32 = 20_000;

pub struct TestMap {
    app: App,
}

impl Default for TestMap {
    fn default() -> Self {
        Self::new()
    }
}

impl TestMap {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// An app with an empty catalogue and no overlay.
    pub fn new() -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(HeatmapPlugin);
        app.update();
        Self { app }
    }

    /// Replace the markers, keeping the current schema.
    pub fn with_markers(mut self, markers: Vec<Marker>) -> Self {
        self.load_markers(markers);
        self
    }

    /// Replace the schema, keeping the current markers.
    pub fn with_schema(mut self, schema: CategorySchema) -> Self {
        let markers = self.catalogue().markers.as_ref().clone();
        self.app
            .insert_resource(MarkerCatalogue::new(markers, schema));
        self
    }

    pub fn load_markers(&mut self, markers: Vec<Marker>) {
        let schema = self.catalogue().schema.as_ref().clone();
        self.app
            .insert_resource(MarkerCatalogue::new(markers, schema));
    }

    // -----------------------------------------------------------------------
    // Requests
    // -----------------------------------------------------------------------

    pub fn request(&mut self, config: HeatmapConfig) {
        self.app
            .world_mut()
            .send_event(HeatmapRequest::Generate(config));
    }

    pub fn clear(&mut self) {
        self.app.world_mut().send_event(HeatmapRequest::Clear);
    }

    /// Run a single frame.
    pub fn update(&mut self) {
        self.app.update();
    }

    /// Run frames until no generation is in flight.
    ///
    /// Sleeps briefly between frames so the `AsyncComputeTaskPool` gets a
    /// chance to finish on a low-core CI runner.
    pub fn run_until_idle(&mut self) {
        for _ in 0..MAX_IDLE_FRAMES {
            self.app.update();
            if !self.is_busy() {
                return;
            }
            std::thread::yield_now();
            std::thread::sleep(Duration::from_micros(200));
        }
        panic!("heat-map generation did not finish within {MAX_IDLE_FRAMES} frames");
    }

    /// `request` followed by `run_until_idle`.
    pub fn generate(&mut self, config: HeatmapConfig) -> Option<&Grid> {
        self.request(config);
        self.run_until_idle();
        self.grid()
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }

    pub fn catalogue(&self) -> &MarkerCatalogue {
        self.app.world().resource::<MarkerCatalogue>()
    }

    pub fn overlay(&self) -> &HeatmapOverlay {
        self.app.world().resource::<HeatmapOverlay>()
    }

    pub fn grid(&self) -> Option<&Grid> {
        self.overlay().grid.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.app.world().resource::<PendingHeatmap>().is_busy()
    }
}
