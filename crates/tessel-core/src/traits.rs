//! The contracts that bind every backend together
//!
//! Two traits, one hand-off. A [`Renderer`] accepts colored geometry and
//! produces a run-length canvas; an [`Exporter`] turns that canvas into
//! file bytes. Backends implement one side and know nothing of the other.

// this_file: crates/tessel-core/src/traits.rs

use crate::{
    error::Result,
    geometry::{circle_polygon, Point},
    types::RunCanvas,
    Color,
};

/// Identifies one filled shape
///
/// Renderers hand these out from `begin_shape` in strictly increasing
/// order, which is also the painter's order: a larger id paints on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShapeHandle(u32);

impl ShapeHandle {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub const fn id(self) -> u32 {
        self.0
    }
}

/// Where geometry becomes pixels
///
/// Every output target implements this once. Shapes are bracketed by
/// `begin_shape` and `finish_shape`; polygons and circles added in between
/// share the shape's color and id.
///
/// ```ignore
/// let handle = renderer.begin_shape(Color::rgb(255, 0, 0))?;
/// renderer.add_polygon(&[Point::new(0.0, 0.0), Point::new(4.0, 0.0), Point::new(0.0, 4.0)])?;
/// renderer.add_circle(Point::new(8.0, 8.0), 3.0, false)?;
/// renderer.finish_shape(handle)?;
/// let canvas = renderer.render()?;
/// ```
pub trait Renderer: Send {
    /// Your renderer's signature
    fn name(&self) -> &'static str;

    /// Color painted beneath every shape
    fn set_background(&mut self, color: Color);

    /// Open a new shape; the returned handle closes it
    fn begin_shape(&mut self, color: Color) -> Result<ShapeHandle>;

    /// Add a polygon to the open shape
    ///
    /// The polygon is closed implicitly: an edge from the last point back
    /// to the first is always added.
    fn add_polygon(&mut self, points: &[Point]) -> Result<()>;

    /// Add a circle to the open shape
    ///
    /// The default implementation flattens the circle with
    /// [`circle_polygon`] and forwards it to `add_polygon`. A radius too
    /// large to flatten is an `InvalidGeometry` error.
    fn add_circle(&mut self, center: Point, radius: f32, counter_clockwise: bool) -> Result<()> {
        self.add_polygon(&circle_polygon(center, radius, counter_clockwise)?)
    }

    /// Commit the open shape's geometry
    fn finish_shape(&mut self, handle: ShapeHandle) -> Result<()>;

    /// Rasterize everything committed so far
    fn render(&self) -> Result<RunCanvas>;
}

/// The final step: pixels become files
pub trait Exporter: Send + Sync {
    /// Who are you?
    fn name(&self) -> &'static str;

    /// Encode the canvas as bytes
    fn export(&self, canvas: &RunCanvas) -> Result<Vec<u8>>;

    /// What file extension should be used?
    fn extension(&self) -> &'static str;

    /// What MIME type identifies your format?
    fn mime_type(&self) -> &'static str;
}
