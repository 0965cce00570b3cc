//! Scan Renderer: polygons in, antialiased color runs out
//!
//! No graphics stack, no GPU, no platform rasterizer. Edges are filed by
//! row, each row is swept left to right, and every pixel gets either an
//! exact trapezoid coverage or a 4×4 supersample. The same geometry always
//! yields the same runs, at any canvas size.
//!
//! ## The Moving Parts
//!
//! - `edge`: Polygon sides and the per-row [`edge::EdgeTable`]
//! - `layers`: The [`layers::LayerStack`] that knows which shapes we're inside
//! - `compositor`: The sweep that picks analytic or supersampled coverage
//! - `row_writer`: Run-length output as pixels are decided

pub mod compositor;
pub mod edge;
pub mod layers;
pub mod row_writer;

use log::debug;
use tessel_core::{
    error::{RenderError, Result},
    traits::{Renderer, ShapeHandle},
    types::RunCanvas,
    Color, Point, RenderParams,
};

use crate::compositor::ScanlineCompositor;
use crate::edge::{Edge, EdgeTable};

/// A shape between `begin_shape` and `finish_shape`
#[derive(Debug)]
struct OpenShape {
    id: u32,
    color: Color,
    edges: Vec<Edge>,
}

/// The pure-Rust rasterizing backend
///
/// Geometry is buffered as edges; every call to [`Renderer::render`]
/// builds a fresh edge table from them and sweeps it.
#[derive(Debug)]
pub struct ScanlineRenderer {
    width: u32,
    height: u32,
    background: Color,
    edges: Vec<Edge>,
    open: Option<OpenShape>,
    next_shape_id: u32,
}

impl ScanlineRenderer {
    /// A renderer for a `width`×`height` canvas with default parameters
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::with_params(width, height, &RenderParams::default())
    }

    /// Validate the canvas size before anything is allocated
    pub fn with_params(width: u32, height: u32, params: &RenderParams) -> Result<Self> {
        if width == 0 || height == 0 || width > params.max_size || height > params.max_size {
            return Err(RenderError::InvalidDimensions { width, height }.into());
        }

        Ok(Self {
            width,
            height,
            background: params.background,
            edges: Vec::new(),
            open: None,
            next_shape_id: 0,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn background(&self) -> Color {
        self.background
    }

    /// Committed edges, in draw order
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of shapes begun so far
    pub fn shape_count(&self) -> u32 {
        self.next_shape_id
    }
}

impl Renderer for ScanlineRenderer {
    fn name(&self) -> &'static str {
        "scan"
    }

    fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    fn begin_shape(&mut self, color: Color) -> Result<ShapeHandle> {
        if let Some(open) = &self.open {
            return Err(RenderError::ShapeAlreadyOpen(open.id).into());
        }

        let id = self.next_shape_id;
        self.next_shape_id = id
            .checked_add(1)
            .ok_or_else(|| RenderError::InvalidGeometry("shape id space exhausted".into()))?;

        self.open = Some(OpenShape {
            id,
            color,
            edges: Vec::new(),
        });
        Ok(ShapeHandle::new(id))
    }

    fn add_polygon(&mut self, points: &[Point]) -> Result<()> {
        let shape = self.open.as_mut().ok_or(RenderError::NoActiveShape)?;
        if points.len() < 2 {
            return Ok(());
        }

        // Pairs each point with its successor, wrapping to close the ring
        let closing = points.iter().skip(1).chain(points.first());
        for (&from, &to) in points.iter().zip(closing) {
            shape.edges.push(Edge::new(shape.id, from, to, shape.color));
        }
        Ok(())
    }

    fn finish_shape(&mut self, handle: ShapeHandle) -> Result<()> {
        let open_id = self
            .open
            .as_ref()
            .map(|shape| shape.id)
            .ok_or(RenderError::NoActiveShape)?;
        if open_id != handle.id() {
            return Err(RenderError::ShapeMismatch {
                expected: open_id,
                got: handle.id(),
            }
            .into());
        }

        if let Some(shape) = self.open.take() {
            self.edges.extend(shape.edges);
        }
        Ok(())
    }

    fn render(&self) -> Result<RunCanvas> {
        if let Some(open) = &self.open {
            debug!("Shape {} is still open and will not be drawn", open.id);
        }

        let mut table = EdgeTable::new(self.width, self.height);
        for edge in &self.edges {
            table.add(*edge);
        }
        table.sort();

        debug!(
            "Rendering {}x{}: {} shapes, {} edges ({} in table)",
            self.width,
            self.height,
            self.next_shape_id,
            self.edges.len(),
            table.len()
        );

        let (canvas, _stats) = ScanlineCompositor::new(&table, self.background).composite()?;
        Ok(canvas)
    }
}
