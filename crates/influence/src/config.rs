/// Mean Earth radius in meters used by the haversine distance.
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Fraction of the raw bounding-box span added on each side of each axis.
pub const BOUNDS_PADDING_FRACTION: f64 = 0.1;

/// Lower bound (degrees) on the padding of each axis, so a single marker, a
/// perfectly vertical/horizontal line or near-coincident markers still yield
/// a box that strictly contains them.
pub const MIN_PADDING_DEGREES: f64 = 0.01;

pub const DEFAULT_BUFFER_RADIUS_M: f64 = 5000.0;
pub const DEFAULT_RESOLUTION: u32 = 100;
pub const DEFAULT_DECAY_POWER: f64 = 5.0;
pub const DEFAULT_PERCENTILE_MIN: f64 = 0.0;
pub const DEFAULT_PERCENTILE_MAX: f64 = 100.0;

/// Selector string that expands to every category in the schema.
pub const ALL_CATEGORIES: &str = "all";

/// Token joining two category names into a compound selector.
pub const CATEGORY_SEPARATOR: char = '_';

/// Distribution mode picks its kernel exponent from the buffer radius:
/// radius <= `DISTRIBUTION_TIER_NEAR_M` uses exponent 1, radius <=
/// `DISTRIBUTION_TIER_MID_M` uses 2, anything larger uses 3.
pub const DISTRIBUTION_TIER_NEAR_M: f64 = 1000.0;
pub const DISTRIBUTION_TIER_MID_M: f64 = 5000.0;

/// Hue (degrees) reached by a fully saturated cell. 0 is red, 120 is green.
pub const MAX_HEAT_HUE: f64 = 120.0;
