//! Tessel - deterministic antialiased shapes, straight to PNG
//!
//! Colored polygons and circles go in; a PNG comes out that is
//! byte-identical for identical input, at any size, without a system
//! graphics stack.
//!
//! # Example
//!
//! ```
//! use tessel::prelude::*;
//!
//! let triangle = Shape::new(Color::rgb(255, 0, 0)).with_polygon(vec![
//!     Point::new(0.0, 0.0),
//!     Point::new(16.0, 0.0),
//!     Point::new(0.0, 16.0),
//! ]);
//! let png = tessel::render_png(16, 16, &[triangle], &RenderParams::default(), &PngParams::default())?;
//! assert_eq!(&png[..8], &tessel::export::PNG_SIGNATURE);
//! # Ok::<(), tessel::error::TesselError>(())
//! ```

use log::debug;

pub use tessel_core::{error, geometry, traits, types, Color, Point, RenderParams};
pub use tessel_export as export;
pub use tessel_export::{PngExporter, PngParams};
pub use tessel_render_scan as render_scan;
pub use tessel_render_scan::ScanlineRenderer;

use tessel_core::{
    error::Result,
    traits::{Exporter, Renderer},
    types::RunCanvas,
};

/// A circle to be flattened into a polygon
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: f32,
    pub counter_clockwise: bool,
}

/// One color, any number of polygons and circles
///
/// Everything in a shape shares the shape's id, so overlapping parts of
/// the same shape cancel out like holes.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub color: Color,
    pub polygons: Vec<Vec<Point>>,
    pub circles: Vec<Circle>,
}

impl Shape {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            polygons: Vec::new(),
            circles: Vec::new(),
        }
    }

    pub fn with_polygon(mut self, points: Vec<Point>) -> Self {
        self.polygons.push(points);
        self
    }

    pub fn with_circle(mut self, center: Point, radius: f32, counter_clockwise: bool) -> Self {
        self.circles.push(Circle {
            center,
            radius,
            counter_clockwise,
        });
        self
    }
}

/// Feed shapes to any renderer, in painter's order
pub fn draw<R: Renderer + ?Sized>(renderer: &mut R, shapes: &[Shape]) -> Result<()> {
    for shape in shapes {
        let handle = renderer.begin_shape(shape.color)?;
        for polygon in &shape.polygons {
            renderer.add_polygon(polygon)?;
        }
        for circle in &shape.circles {
            renderer.add_circle(circle.center, circle.radius, circle.counter_clockwise)?;
        }
        renderer.finish_shape(handle)?;
    }
    Ok(())
}

/// Rasterize shapes onto a fresh canvas
pub fn render_canvas(
    width: u32,
    height: u32,
    shapes: &[Shape],
    render_params: &RenderParams,
) -> Result<RunCanvas> {
    let mut renderer = ScanlineRenderer::with_params(width, height, render_params)?;
    draw(&mut renderer, shapes)?;
    renderer.render()
}

/// Geometry in, PNG bytes out
pub fn render_png(
    width: u32,
    height: u32,
    shapes: &[Shape],
    render_params: &RenderParams,
    png_params: &PngParams,
) -> Result<Vec<u8>> {
    let exporter = PngExporter::with_params(png_params.clone())?;
    let canvas = render_canvas(width, height, shapes, render_params)?;
    let png = exporter.export(&canvas)?;
    debug!(
        "{} shapes -> {} runs -> {} PNG bytes",
        shapes.len(),
        canvas.runs.len(),
        png.len()
    );
    Ok(png)
}

/// Common imports for typical usage
pub mod prelude {
    pub use crate::{Circle, Shape};
    pub use tessel_core::{
        error::{Result, TesselError},
        traits::{Exporter, Renderer, ShapeHandle},
        types::{ColorRun, RunCanvas},
        Color, Point, RenderParams,
    };
    pub use tessel_export::{PngEncoder, PngExporter, PngParams};
    pub use tessel_render_scan::ScanlineRenderer;
}
