//! Newline-delimited JSON protocol for the headless `--host` mode.
//!
//! A host process (the map UI, a script, a test) writes one [`HostCommand`]
//! per line on stdin and reads one [`HostResponse`] per line on stdout. The
//! I/O loop itself lives in `crates/app/src/host_mode.rs`.

use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisMode, HeatmapConfig};
use crate::category::CategorySchema;
use crate::error::{ErrorKind, HeatmapError};
use crate::markers::Marker;
use crate::overlay::HeatmapOverlay;
use crate::raster::{Grid, Pixel};

// ---------------------------------------------------------------------------
// Commands (stdin → engine)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(tag = "cmd")]
pub enum HostCommand {
    /// Replace the marker catalogue. A missing schema means no categories.
    #[serde(rename = "load_catalogue")]
    LoadCatalogue {
        markers: Vec<Marker>,
        #[serde(default)]
        schema: CategorySchema,
    },

    /// Generate an overlay and wait for it. Omitted fields take defaults.
    #[serde(rename = "generate")]
    Generate {
        #[serde(default)]
        config: HeatmapConfig,
    },

    /// Drop the current overlay.
    #[serde(rename = "clear")]
    Clear,

    /// Report what the overlay currently shows.
    #[serde(rename = "status")]
    Status,

    /// Look up the overlay cell nearest to a coordinate.
    #[serde(rename = "probe")]
    Probe { lat: f64, lng: f64 },

    #[serde(rename = "quit")]
    Quit,
}

// ---------------------------------------------------------------------------
// Responses (engine → stdout)
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct HostResponse {
    pub protocol_version: u32,
    #[serde(flatten)]
    pub payload: ResponsePayload,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum ResponsePayload {
    #[serde(rename = "ready")]
    Ready,

    #[serde(rename = "loaded")]
    Loaded { markers: usize, categories: usize },

    #[serde(rename = "grid")]
    Grid { grid: Grid },

    #[serde(rename = "status")]
    Status { status: OverlayStatus },

    /// `pixel` is null while no overlay is shown.
    #[serde(rename = "probe")]
    Probe { pixel: Option<Pixel> },

    #[serde(rename = "ok")]
    Ok,

    /// `kind` is null for protocol errors (bad JSON, unknown command).
    #[serde(rename = "error")]
    Error {
        message: String,
        kind: Option<ErrorKind>,
    },

    #[serde(rename = "goodbye")]
    Goodbye,
}

/// Summary of [`HeatmapOverlay`] without the pixel payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayStatus {
    pub visible: bool,
    pub mode: Option<AnalysisMode>,
    pub resolution: Option<u32>,
    pub revision: u64,
    pub last_error: Option<String>,
}

impl OverlayStatus {
    pub fn of(overlay: &HeatmapOverlay) -> Self {
        Self {
            visible: overlay.is_visible(),
            mode: overlay.grid.as_ref().map(|g| g.mode),
            resolution: overlay.grid.as_ref().map(|g| g.resolution),
            revision: overlay.revision,
            last_error: overlay.last_error.as_ref().map(ToString::to_string),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Bump when the command/response schema changes.
pub const PROTOCOL_VERSION: u32 = 1;

pub fn make_response(payload: ResponsePayload) -> HostResponse {
    HostResponse {
        protocol_version: PROTOCOL_VERSION,
        payload,
    }
}

/// Error response carrying the engine's error category.
pub fn error_response(err: &HeatmapError) -> HostResponse {
    make_response(ResponsePayload::Error {
        message: err.to_string(),
        kind: Some(err.kind()),
    })
}

/// Error response for input that never reached the engine.
pub fn protocol_error(message: impl Into<String>) -> HostResponse {
    make_response(ResponsePayload::Error {
        message: message.into(),
        kind: None,
    })
}
