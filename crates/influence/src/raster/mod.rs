//! Grid rasterizer.
//!
//! Lays a `resolution x resolution` lattice over the padded bounding box of
//! the markers and fills each cell with one of three aggregation models:
//! - Proximity: mean decay weight of the markers in reach (scores ignored)
//! - Distribution: decay-weighted mean of normalized scores
//! - Cumulative: decay-weighted sum of normalized scores
//!
//! Distances are haversine meters between the cell's reference point and each
//! marker. Colors come from [`crate::color::heat_color`].

pub mod compute;
pub mod generate;
pub mod types;


pub use compute::{cumulative_value, distribution_value, proximity_value, CellModel};
pub use generate::{generate, generate_with_cancel, prepare_scores, rasterize};
pub use types::{Grid, GridLayout, Pixel};
