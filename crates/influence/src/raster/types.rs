//! Grid layout and output types.

use bevy::color::Hsla;
use serde::Serialize;

use crate::analysis::AnalysisMode;
use crate::color::{heat_color, serialize_css};
use crate::geo::{GeoBounds, LatLng};

// =============================================================================
// Layout
// =============================================================================

/// A `resolution x resolution` lattice laid over padded bounds.
///
/// Cell `(x, y)` has its reference point at
/// `(north - y * lat_step, west + x * lng_step)`: row 0 is the northernmost
/// row and column 0 the westernmost column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub bounds: GeoBounds,
    pub resolution: u32,
}

impl GridLayout {
    /// Pads the tight box around `positions` and lays the lattice over it.
    /// Returns `None` for an empty position set.
    pub fn around(positions: &[LatLng], resolution: u32) -> Option<Self> {
        let bounds = GeoBounds::enclosing(positions.iter().copied())?.padded();
        Some(Self { bounds, resolution })
    }

    pub fn lat_step(&self) -> f64 {
        self.bounds.lat_span() / self.resolution as f64
    }

    pub fn lng_step(&self) -> f64 {
        self.bounds.lng_span() / self.resolution as f64
    }

    pub fn cell_count(&self) -> usize {
        let r = self.resolution as usize;
        r * r
    }

    pub fn cell_point(&self, x: u32, y: u32) -> LatLng {
        LatLng::new(
            self.bounds.north_east.lat - y as f64 * self.lat_step(),
            self.bounds.south_west.lng + x as f64 * self.lng_step(),
        )
    }

    /// Rectangle a renderer paints for cell `(x, y)`: from the cell's
    /// reference point one step south and one step east.
    pub fn cell_rect(&self, x: u32, y: u32) -> GeoBounds {
        let top_left = self.cell_point(x, y);
        GeoBounds {
            south_west: LatLng::new(top_left.lat - self.lat_step(), top_left.lng),
            north_east: LatLng::new(top_left.lat, top_left.lng + self.lng_step()),
        }
    }

    /// Cell whose reference point is closest to `p` in grid space.
    pub fn nearest_cell(&self, p: LatLng) -> (u32, u32) {
        let max = self.resolution.saturating_sub(1) as f64;
        let x = ((p.lng - self.bounds.south_west.lng) / self.lng_step())
            .round()
            .clamp(0.0, max);
        let y = ((self.bounds.north_east.lat - p.lat) / self.lat_step())
            .round()
            .clamp(0.0, max);
        (x as u32, y as u32)
    }
}

// =============================================================================
// Output
// =============================================================================

/// One rasterized cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pixel {
    pub x: u32,
    pub y: u32,
    /// Model output for the cell. For cumulative mode this is the raw sum.
    pub value: f64,
    #[serde(serialize_with = "serialize_css")]
    pub color: Hsla,
}

/// The rasterized heat-map handed to the overlay renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grid {
    pub bounds: GeoBounds,
    pub resolution: u32,
    pub mode: AnalysisMode,
    /// Row-major, north to south, west to east.
    pub pixels: Vec<Pixel>,
}

impl Grid {
    /// Builds pixels from row-major cell values and assigns colors.
    ///
    /// Cumulative mode colors each cell by `value / max` where `max` is the
    /// largest value of the finished run, so every cell is scaled against the
    /// same peak. The other modes color the value directly.
    pub fn from_values(layout: GridLayout, mode: AnalysisMode, values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), layout.cell_count());
        let peak = values.iter().copied().fold(0.0_f64, f64::max);
        let res = layout.resolution as usize;

        let pixels = values
            .into_iter()
            .enumerate()
            .map(|(i, value)| {
                let shade = match mode {
                    AnalysisMode::Cumulative if peak > 0.0 => value / peak,
                    AnalysisMode::Cumulative => 0.0,
                    _ => value,
                };
                Pixel {
                    x: (i % res) as u32,
                    y: (i / res) as u32,
                    value,
                    color: heat_color(shade),
                }
            })
            .collect();

        Self {
            bounds: layout.bounds,
            resolution: layout.resolution,
            mode,
            pixels,
        }
    }

    pub fn layout(&self) -> GridLayout {
        GridLayout {
            bounds: self.bounds,
            resolution: self.resolution,
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<&Pixel> {
        if x >= self.resolution || y >= self.resolution {
            return None;
        }
        self.pixels
            .get(y as usize * self.resolution as usize + x as usize)
    }

    pub fn max_value(&self) -> f64 {
        self.pixels.iter().map(|p| p.value).fold(0.0, f64::max)
    }

    /// Pixel covering the cell nearest to `p`.
    pub fn pixel_near(&self, p: LatLng) -> Option<&Pixel> {
        let (x, y) = self.layout().nearest_cell(p);
        self.pixel(x, y)
    }
}
