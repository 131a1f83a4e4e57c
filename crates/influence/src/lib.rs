//! Spatial influence heat-maps over geographic point markers.
//!
//! [`generate`] is the whole engine: markers, configuration and category
//! schema in, a colored `resolution x resolution` [`Grid`] out.
//! [`HeatmapPlugin`] wraps it for Bevy hosts, running each request off the
//! main thread and keeping the latest finished grid in [`HeatmapOverlay`].

pub mod analysis;
pub mod cancel;
pub mod category;
pub mod color;
pub mod config;
pub mod decay;
pub mod error;
pub mod geo;
pub mod host_protocol;
pub mod markers;
pub mod overlay;
pub mod raster;
pub mod scoring;

#[cfg(any(test, feature = "bench"))]
pub mod test_harness;

pub use analysis::{AnalysisMode, HeatmapConfig};
pub use cancel::CancelToken;
pub use category::{CategorySchema, CategorySelector};
pub use decay::{DecayKernel, DecayVariant};
pub use error::{ErrorKind, HeatmapError};
pub use geo::{GeoBounds, LatLng};
pub use markers::Marker;
pub use overlay::{HeatmapOverlay, HeatmapPlugin, HeatmapRequest, MarkerCatalogue};
pub use raster::{generate, generate_with_cancel, Grid, Pixel};
