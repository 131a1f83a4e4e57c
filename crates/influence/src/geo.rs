//! Planar bounding-box geometry and spherical distance.

use serde::{Deserialize, Serialize};

use crate::config::{BOUNDS_PADDING_FRACTION, EARTH_RADIUS_M, MIN_PADDING_DEGREES};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Great-circle distance in meters (haversine).
pub fn haversine_m(a: LatLng, b: LatLng) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Axis-aligned box in degrees, south-west to north-east.
///
/// Serialized as `[[south, west], [north, east]]`, the corner-pair layout map
/// overlay renderers expect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "[[f64; 2]; 2]", from = "[[f64; 2]; 2]")]
pub struct GeoBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl From<GeoBounds> for [[f64; 2]; 2] {
    fn from(b: GeoBounds) -> Self {
        [
            [b.south_west.lat, b.south_west.lng],
            [b.north_east.lat, b.north_east.lng],
        ]
    }
}

impl From<[[f64; 2]; 2]> for GeoBounds {
    fn from(c: [[f64; 2]; 2]) -> Self {
        Self {
            south_west: LatLng::new(c[0][0], c[0][1]),
            north_east: LatLng::new(c[1][0], c[1][1]),
        }
    }
}

impl GeoBounds {
    /// Tight box around `points`, or `None` when there are none.
    pub fn enclosing(points: impl IntoIterator<Item = LatLng>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Self {
            south_west: first,
            north_east: first,
        };
        for p in iter {
            bounds.south_west.lat = bounds.south_west.lat.min(p.lat);
            bounds.south_west.lng = bounds.south_west.lng.min(p.lng);
            bounds.north_east.lat = bounds.north_east.lat.max(p.lat);
            bounds.north_east.lng = bounds.north_east.lng.max(p.lng);
        }
        Some(bounds)
    }

    pub fn lat_span(&self) -> f64 {
        self.north_east.lat - self.south_west.lat
    }

    pub fn lng_span(&self) -> f64 {
        self.north_east.lng - self.south_west.lng
    }

    /// Grows each axis by `BOUNDS_PADDING_FRACTION` of its span on both
    /// sides, but never by less than `MIN_PADDING_DEGREES`, so near-coincident
    /// points still end up strictly inside.
    pub fn padded(&self) -> Self {
        let pad = |span: f64| (span * BOUNDS_PADDING_FRACTION).max(MIN_PADDING_DEGREES);
        let pad_lat = pad(self.lat_span());
        let pad_lng = pad(self.lng_span());
        Self {
            south_west: LatLng::new(self.south_west.lat - pad_lat, self.south_west.lng - pad_lng),
            north_east: LatLng::new(self.north_east.lat + pad_lat, self.north_east.lng + pad_lng),
        }
    }

    /// Inclusive containment test.
    pub fn contains(&self, p: LatLng) -> bool {
        p.lat >= self.south_west.lat
            && p.lat <= self.north_east.lat
            && p.lng >= self.south_west.lng
            && p.lng <= self.north_east.lng
    }

    /// Strict containment test (point not on any edge).
    pub fn strictly_contains(&self, p: LatLng) -> bool {
        p.lat > self.south_west.lat
            && p.lat < self.north_east.lat
            && p.lng > self.south_west.lng
            && p.lng < self.north_east.lng
    }
}
