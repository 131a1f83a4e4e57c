//! Distance-decay kernels.
//!
//! A kernel maps the distance fraction `f = distance / buffer_radius` in
//! [0, 1] to an influence weight in [0, 1]. Every kernel is exactly 1 at
//! `f = 0`, exactly 0 at `f = 1`, and non-increasing in between. Markers
//! beyond the buffer radius are filtered out before a kernel is consulted.

use serde::{Deserialize, Serialize};

use crate::config::{DISTRIBUTION_TIER_MID_M, DISTRIBUTION_TIER_NEAR_M};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DecayKernel {
    /// `1 - f`
    Linear,
    /// `sqrt(1 - f)`
    Sqrt,
    /// `(1 - f)^p`
    Power(f64),
}

impl DecayKernel {
    pub fn weight(self, f: f64) -> f64 {
        let remaining = (1.0 - f).clamp(0.0, 1.0);
        match self {
            Self::Linear => remaining,
            Self::Sqrt => remaining.sqrt(),
            Self::Power(p) => remaining.powf(p),
        }
    }

    /// Kernel used by distribution mode: larger radii get a sharper falloff
    /// so distant markers don't flatten the local picture.
    pub fn for_distribution(buffer_radius_m: f64) -> Self {
        let exponent = if buffer_radius_m <= DISTRIBUTION_TIER_NEAR_M {
            1.0
        } else if buffer_radius_m <= DISTRIBUTION_TIER_MID_M {
            2.0
        } else {
            3.0
        };
        Self::Power(exponent)
    }
}

/// Falloff choice exposed for proximity mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecayVariant {
    /// Linear falloff.
    #[default]
    Fast,
    /// Square-root falloff: influence stays high further out.
    Slow,
}

impl DecayVariant {
    pub fn kernel(self) -> DecayKernel {
        match self {
            Self::Fast => DecayKernel::Linear,
            Self::Slow => DecayKernel::Sqrt,
        }
    }
}
