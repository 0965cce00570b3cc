//! Tessel Core: shapes in, runs out, bytes at the end
//!
//! Colored polygons enter a [`Renderer`], leave as a run-length
//! [`types::RunCanvas`], and an [`Exporter`] turns that canvas into a file.
//! This crate holds the vocabulary every stage shares.
//!
//! ## The Pipeline
//!
//! 1. **Geometry** - Polygons and flattened circles, grouped into shapes
//! 2. **Rasterization** - Shapes become antialiased color runs
//! 3. **Export** - Runs become PNG bytes
//!
//! ## The Traits That Power Everything
//!
//! - [`Renderer`] - Where geometry becomes pixels
//! - [`Exporter`] - Where pixels become files

pub mod color;
pub mod error;
pub mod geometry;
pub mod traits;

pub use color::Color;
pub use error::{Result, TesselError};
pub use geometry::Point;
pub use traits::{Exporter, Renderer, ShapeHandle};

/// The data structures that power the pipeline
pub mod types {
    use crate::error::{RenderError, Result};
    use crate::Color;

    /// A horizontal span of identically colored pixels
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ColorRun {
        pub color: Color,
        pub count: u32,
    }

    impl ColorRun {
        pub const fn new(color: Color, count: u32) -> Self {
            Self { color, count }
        }
    }

    /// A finished canvas stored as row-major color runs
    ///
    /// Runs may cross row boundaries; only their total length is fixed at
    /// `width * height`.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RunCanvas {
        pub width: u32,
        pub height: u32,
        pub runs: Vec<ColorRun>,
    }

    impl RunCanvas {
        /// Wrap runs after checking they cover the canvas exactly
        pub fn new(width: u32, height: u32, runs: Vec<ColorRun>) -> Result<Self> {
            let expected = u64::from(width) * u64::from(height);
            let total: u64 = runs.iter().map(|run| u64::from(run.count)).sum();
            if width == 0 || height == 0 || total != expected {
                return Err(RenderError::InvalidDimensions { width, height }.into());
            }
            Ok(Self {
                width,
                height,
                runs,
            })
        }

        /// A canvas of one color
        pub fn solid(width: u32, height: u32, color: Color) -> Result<Self> {
            Self::new(width, height, vec![ColorRun::new(color, width * height)])
        }

        /// Number of pixels on the canvas
        pub fn pixel_count(&self) -> u64 {
            u64::from(self.width) * u64::from(self.height)
        }

        /// Every pixel in row-major order
        pub fn pixels(&self) -> impl Iterator<Item = Color> + '_ {
            self.runs
                .iter()
                .flat_map(|run| std::iter::repeat(run.color).take(run.count as usize))
        }

        /// Look up a single pixel (linear in the number of runs)
        pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
            if x >= self.width || y >= self.height {
                return None;
            }
            let mut remaining = u64::from(y) * u64::from(self.width) + u64::from(x);
            for run in &self.runs {
                if remaining < u64::from(run.count) {
                    return Some(run.color);
                }
                remaining -= u64::from(run.count);
            }
            None
        }

        /// Distinct colors in first-seen order
        pub fn distinct_colors(&self) -> Vec<Color> {
            let mut seen = std::collections::HashSet::new();
            self.runs
                .iter()
                .map(|run| run.color)
                .filter(|color| seen.insert(*color))
                .collect()
        }

        /// Expand into straight-alpha RGBA bytes, 4 per pixel
        pub fn to_rgba8(&self) -> Vec<u8> {
            let mut data = Vec::with_capacity(self.pixel_count() as usize * 4);
            for color in self.pixels() {
                data.extend_from_slice(&[color.r, color.g, color.b, color.a]);
            }
            data
        }
    }
}

/// How rendering should behave
#[derive(Debug, Clone)]
pub struct RenderParams {
    /// Painted beneath every shape
    pub background: Color,
    /// Largest accepted width or height
    pub max_size: u32,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            background: Color::transparent(),
            max_size: 16384,
        }
    }
}
