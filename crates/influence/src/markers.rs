//! Marker records as handed over by the catalogue fetch layer.
//!
//! Documents come from a loosely typed store, so coordinates may arrive as
//! numbers or numeric strings and flag values follow JSON truthiness.

use std::collections::BTreeMap;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::HeatmapError;
use crate::geo::LatLng;

/// Sub-label -> numeric contribution, per category.
pub type ScoreTable = BTreeMap<String, BTreeMap<String, f64>>;
/// Sub-label -> enabled, per category.
pub type FlagTable = BTreeMap<String, BTreeMap<String, bool>>;

/// A geo-located catalogue entry. Read-only input to the engine.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Marker {
    #[serde(deserialize_with = "deserialize_coordinate")]
    pub latitude: f64,
    #[serde(deserialize_with = "deserialize_coordinate")]
    pub longitude: f64,
    #[serde(default, deserialize_with = "deserialize_scores")]
    pub scores: ScoreTable,
    #[serde(default, alias = "flags", deserialize_with = "deserialize_flags")]
    pub categories: FlagTable,
}

impl Marker {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            ..Default::default()
        }
    }

    /// Builder: set one sub-label's score and flag inside `category`.
    pub fn with_entry(mut self, category: &str, label: &str, score: f64, enabled: bool) -> Self {
        self.scores
            .entry(category.to_string())
            .or_default()
            .insert(label.to_string(), score);
        self.categories
            .entry(category.to_string())
            .or_default()
            .insert(label.to_string(), enabled);
        self
    }

    pub fn position(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }
}

/// A marker position annotated with its derived score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredMarker {
    pub position: LatLng,
    /// Category-aggregated raw score.
    pub score: f64,
    /// Score mapped through the percentile window. Not clamped: scores
    /// outside the window land outside [0, 1].
    pub normalized: f64,
}

/// Checks the marker set is non-empty and every coordinate is usable, and
/// returns the positions in input order.
pub fn validate_markers(markers: &[Marker]) -> Result<Vec<LatLng>, HeatmapError> {
    if markers.is_empty() {
        return Err(HeatmapError::NoMarkers);
    }
    markers
        .iter()
        .enumerate()
        .map(|(index, m)| {
            let p = m.position();
            if p.is_valid() {
                Ok(p)
            } else {
                Err(HeatmapError::InvalidCoordinate {
                    index,
                    latitude: m.latitude,
                    longitude: m.longitude,
                })
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Lenient deserializers
// ---------------------------------------------------------------------------

fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// JSON truthiness: `false`, `0`, `""` and `null` are disabled.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0 && !v.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Unparseable strings become NaN so coordinate validation can report the
/// offending marker by index.
fn deserialize_coordinate<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Number(_) | Value::String(_) => Ok(number_from_value(&value).unwrap_or(f64::NAN)),
        other => Err(de::Error::custom(format!(
            "expected a number or numeric string for a coordinate, got {}",
            other
        ))),
    }
}

/// Non-numeric and non-finite score entries are dropped; lookups then fall
/// back to 0.
fn deserialize_scores<'de, D>(deserializer: D) -> Result<ScoreTable, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: BTreeMap<String, BTreeMap<String, Value>> =
        Option::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .map(|(category, labels)| {
            let labels = labels
                .into_iter()
                .filter_map(|(label, v)| {
                    number_from_value(&v)
                        .filter(|n| n.is_finite())
                        .map(|n| (label, n))
                })
                .collect();
            (category, labels)
        })
        .collect())
}

fn deserialize_flags<'de, D>(deserializer: D) -> Result<FlagTable, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: BTreeMap<String, BTreeMap<String, Value>> =
        Option::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .map(|(category, labels)| {
            let labels = labels
                .into_iter()
                .map(|(label, v)| {
                    let enabled = is_truthy(&v);
                    (label, enabled)
                })
                .collect();
            (category, labels)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_accept_numbers_and_strings() {
        let json = r#"[
            {"latitude": 43.45, "longitude": -80.49},
            {"latitude": "43.46", "longitude": " -80.50 "}
        ]"#;
        let markers: Vec<Marker> = serde_json::from_str(json).expect("parse");
        assert_eq!(markers[0].position(), LatLng::new(43.45, -80.49));
        assert_eq!(markers[1].position(), LatLng::new(43.46, -80.50));
    }

    #[test]
    fn test_unparseable_coordinate_fails_validation_by_index() {
        let json = r#"[
            {"latitude": 43.45, "longitude": -80.49},
            {"latitude": "north", "longitude": -80.50}
        ]"#;
        let markers: Vec<Marker> = serde_json::from_str(json).expect("parse");
        match validate_markers(&markers) {
            Err(HeatmapError::InvalidCoordinate { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected InvalidCoordinate, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_coordinate_is_a_parse_error() {
        let json = r#"{"latitude": 43.45}"#;
        assert!(serde_json::from_str::<Marker>(json).is_err());
    }

    #[test]
    fn test_flags_follow_truthiness_and_accept_alias() {
        let json = r#"{
            "latitude": 1, "longitude": 2,
            "flags": {"food": {"a": true, "b": 0, "c": "yes", "d": null, "e": "", "f": 1}}
        }"#;
        let marker: Marker = serde_json::from_str(json).expect("parse");
        let food = &marker.categories["food"];
        assert!(food["a"]);
        assert!(!food["b"]);
        assert!(food["c"]);
        assert!(!food["d"]);
        assert!(!food["e"]);
        assert!(food["f"]);
    }

    #[test]
    fn test_non_numeric_scores_are_dropped() {
        let json = r#"{
            "latitude": 1, "longitude": 2,
            "scores": {"food": {"a": 0.5, "b": "0.25", "c": null}}
        }"#;
        let marker: Marker = serde_json::from_str(json).expect("parse");
        let food = &marker.scores["food"];
        assert_eq!(food.get("a"), Some(&0.5));
        assert_eq!(food.get("b"), Some(&0.25));
        assert_eq!(food.get("c"), None);
    }

    #[test]
    fn test_validate_rejects_empty_and_out_of_range() {
        assert_eq!(validate_markers(&[]), Err(HeatmapError::NoMarkers));
        let bad = [Marker::new(0.0, 0.0), Marker::new(0.0, 181.0)];
        assert!(matches!(
            validate_markers(&bad),
            Err(HeatmapError::InvalidCoordinate { index: 1, .. })
        ));
    }
}
