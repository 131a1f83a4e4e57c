//! Error taxonomy for heat-map generation.
//!
//! Every failure is detected before rasterization starts (or, for
//! cancellation, aborts the whole run). A failed run never yields a partial
//! grid.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse grouping of [`HeatmapError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The caller supplied markers or parameters that cannot be gridded.
    InvalidInput,
    /// The category selector does not match the category schema.
    Configuration,
    /// The run was abandoned through its cancellation token.
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HeatmapError {
    NoMarkers,
    InvalidCoordinate {
        index: usize,
        latitude: f64,
        longitude: f64,
    },
    InvalidResolution(u32),
    InvalidBufferRadius(f64),
    InvalidDecayPower(f64),
    InvalidPercentileWindow {
        min: f64,
        max: f64,
    },
    UnknownCategory(String),
    EmptyCategorySelection,
    Cancelled,
}

impl HeatmapError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoMarkers
            | Self::InvalidCoordinate { .. }
            | Self::InvalidResolution(_)
            | Self::InvalidBufferRadius(_)
            | Self::InvalidDecayPower(_)
            | Self::InvalidPercentileWindow { .. } => ErrorKind::InvalidInput,
            Self::UnknownCategory(_) | Self::EmptyCategorySelection => ErrorKind::Configuration,
            Self::Cancelled => ErrorKind::Cancelled,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl fmt::Display for HeatmapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoMarkers => write!(f, "no markers supplied"),
            Self::InvalidCoordinate {
                index,
                latitude,
                longitude,
            } => write!(
                f,
                "marker {} has invalid coordinates ({}, {})",
                index, latitude, longitude
            ),
            Self::InvalidResolution(res) => {
                write!(f, "resolution must be positive, got {}", res)
            }
            Self::InvalidBufferRadius(radius) => write!(
                f,
                "buffer radius must be a positive number of meters, got {}",
                radius
            ),
            Self::InvalidDecayPower(power) => {
                write!(f, "decay power must be positive, got {}", power)
            }
            Self::InvalidPercentileWindow { min, max } => write!(
                f,
                "percentile window [{}, {}] must satisfy 0 <= min <= max <= 100",
                min, max
            ),
            Self::UnknownCategory(name) => write!(f, "unknown category '{}'", name),
            Self::EmptyCategorySelection => {
                write!(f, "category selector resolved to no categories")
            }
            Self::Cancelled => write!(f, "generation cancelled"),
        }
    }
}

impl std::error::Error for HeatmapError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_grouping() {
        assert_eq!(HeatmapError::NoMarkers.kind(), ErrorKind::InvalidInput);
        assert_eq!(
            HeatmapError::InvalidResolution(0).kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            HeatmapError::UnknownCategory("food".into()).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            HeatmapError::EmptyCategorySelection.kind(),
            ErrorKind::Configuration
        );
        assert!(HeatmapError::Cancelled.is_cancelled());
    }

    #[test]
    fn test_display_names_the_offending_value() {
        let msg = HeatmapError::InvalidCoordinate {
            index: 3,
            latitude: 91.0,
            longitude: 0.0,
        }
        .to_string();
        assert!(msg.contains("marker 3"), "got: {}", msg);
        assert!(msg.contains("91"), "got: {}", msg);
    }
}
