//! Red-to-green heat color scale for grid cells.
//!
//! A pure mapping from a unit-interval value to a fully saturated hue:
//! 0 is red (critical shortage), 0.5 is yellow, 1 is green (well served).

use bevy::color::Hsla;
use serde::Serializer;

use crate::config::MAX_HEAT_HUE;

/// Clamps `value` to [0, 1] and maps it linearly onto hue 0..120 degrees at
/// full saturation and 50% lightness. NaN maps to red.
pub fn heat_color(value: f64) -> Hsla {
    let t = if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    };
    // Multiply in f64 so the CSS hue matches the double-precision value.
    let hue = (t * MAX_HEAT_HUE) as f32;
    Hsla::new(hue, 1.0, 0.5, 1.0)
}

/// CSS form consumed by the map overlay renderer, e.g. `hsl(60, 100%, 50%)`.
pub fn css_hsl(color: &Hsla) -> String {
    format!(
        "hsl({}, {}%, {}%)",
        color.hue,
        (color.saturation * 100.0).round(),
        (color.lightness * 100.0).round()
    )
}

/// Serde adapter writing a color as its CSS string.
pub(crate) fn serialize_css<S>(color: &Hsla, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&css_hsl(color))
}
