//! Per-run analysis configuration.
//!
//! One immutable [`HeatmapConfig`] describes a whole "Generate" action. It
//! deserializes from the camelCase JSON the options panel sends, with every
//! field defaulted.

use serde::{Deserialize, Serialize};

use crate::config::{
    ALL_CATEGORIES, DEFAULT_BUFFER_RADIUS_M, DEFAULT_DECAY_POWER, DEFAULT_PERCENTILE_MAX,
    DEFAULT_PERCENTILE_MIN, DEFAULT_RESOLUTION,
};
use crate::decay::DecayVariant;
use crate::error::HeatmapError;
use crate::scoring::PercentileWindow;

/// Aggregation model used to fill each grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    /// Unscored spatial density: mean decay weight of the markers in reach.
    #[default]
    Proximity,
    /// Decay-weighted mean of normalized scores.
    Distribution,
    /// Decay-weighted sum of normalized scores.
    Cumulative,
}

impl AnalysisMode {
    pub fn uses_scores(self) -> bool {
        !matches!(self, Self::Proximity)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Proximity => "Proximity Influence Zones",
            Self::Distribution => "Resource Distribution",
            Self::Cumulative => "Cumulative Resource Influence",
        }
    }

    pub const ALL: [AnalysisMode; 3] = [Self::Proximity, Self::Distribution, Self::Cumulative];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeatmapConfig {
    pub mode: AnalysisMode,
    /// Distance (meters) beyond which a marker has no influence on a cell.
    pub buffer_radius_meters: f64,
    /// Cells per axis.
    pub resolution: u32,
    /// Proximity mode only.
    pub decay_variant: DecayVariant,
    /// Cumulative mode only.
    pub decay_power: f64,
    /// Distribution and cumulative modes only.
    pub category_selector: String,
    pub percentile_min: f64,
    pub percentile_max: f64,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            mode: AnalysisMode::default(),
            buffer_radius_meters: DEFAULT_BUFFER_RADIUS_M,
            resolution: DEFAULT_RESOLUTION,
            decay_variant: DecayVariant::default(),
            decay_power: DEFAULT_DECAY_POWER,
            category_selector: ALL_CATEGORIES.to_string(),
            percentile_min: DEFAULT_PERCENTILE_MIN,
            percentile_max: DEFAULT_PERCENTILE_MAX,
        }
    }
}

impl HeatmapConfig {
    pub fn new(mode: AnalysisMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn with_buffer_radius(mut self, meters: f64) -> Self {
        self.buffer_radius_meters = meters;
        self
    }

    pub fn with_resolution(mut self, resolution: u32) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_decay_variant(mut self, variant: DecayVariant) -> Self {
        self.decay_variant = variant;
        self
    }

    pub fn with_decay_power(mut self, power: f64) -> Self {
        self.decay_power = power;
        self
    }

    pub fn with_category_selector(mut self, selector: impl Into<String>) -> Self {
        self.category_selector = selector.into();
        self
    }

    pub fn with_percentiles(mut self, min: f64, max: f64) -> Self {
        self.percentile_min = min;
        self.percentile_max = max;
        self
    }

    pub fn percentile_window(&self) -> PercentileWindow {
        PercentileWindow::new(self.percentile_min, self.percentile_max)
    }

    /// Reports the first parameter that makes the run impossible. Fields a
    /// mode does not read are not checked.
    pub fn validate(&self) -> Result<(), HeatmapError> {
        if self.resolution == 0 {
            return Err(HeatmapError::InvalidResolution(self.resolution));
        }
        if !(self.buffer_radius_meters.is_finite() && self.buffer_radius_meters > 0.0) {
            return Err(HeatmapError::InvalidBufferRadius(self.buffer_radius_meters));
        }
        if self.mode == AnalysisMode::Cumulative
            && !(self.decay_power.is_finite() && self.decay_power > 0.0)
        {
            return Err(HeatmapError::InvalidDecayPower(self.decay_power));
        }
        if self.mode.uses_scores() {
            self.percentile_window().validate()?;
        }
        Ok(())
    }
}
