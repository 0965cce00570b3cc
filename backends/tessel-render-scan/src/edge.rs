// this_file: backends/tessel-render-scan/src/edge.rs

//! Edges and the per-row table that indexes them
//!
//! Every polygon side becomes an [`Edge`] that remembers which shape it
//! belongs to. The [`EdgeTable`] files each edge under every pixel row it
//! crosses, together with the columns it can touch there, so the compositor
//! only ever looks at edges that matter for the row in hand.

use tessel_core::{Color, Point};

/// One polygon side, tagged with its shape
///
/// `from` and `to` keep the polygon's original winding; nothing here
/// reorders them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub shape_id: u32,
    pub from: Point,
    pub to: Point,
    pub color: Color,
}

impl Edge {
    pub fn new(shape_id: u32, from: Point, to: Point, color: Color) -> Self {
        Self {
            shape_id,
            from,
            to,
            color,
        }
    }

    #[inline]
    pub fn y_min(&self) -> f32 {
        self.from.y.min(self.to.y)
    }

    #[inline]
    pub fn y_max(&self) -> f32 {
        self.from.y.max(self.to.y)
    }

    /// Does a horizontal line at `y` cross this edge?
    ///
    /// Half-open: the top end counts, the bottom end does not, so two
    /// edges meeting at a vertex are crossed exactly once.
    #[inline]
    pub fn crosses(&self, y: f32) -> bool {
        self.y_min() <= y && y < self.y_max()
    }

    /// Does the edge reach across the whole band `[top, top + 1]`?
    #[inline]
    pub fn spans_row(&self, top: f32) -> bool {
        self.y_min() <= top && self.y_max() >= top + 1.0
    }

    /// X position of the edge's line at height `y`
    #[inline]
    pub fn x_at(&self, y: f32) -> f32 {
        let dy = self.to.y - self.from.y;
        self.from.x + (y - self.from.y) * (self.to.x - self.from.x) / dy
    }

    /// Edges that never change height never cross a sample line
    fn is_flat(&self) -> bool {
        // Written this way round so NaN coordinates count as flat too
        !(self.y_min() < self.y_max())
    }
}

/// An edge's footprint on one row: pixel columns `[x_start, x_end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowEdge {
    /// Index into [`EdgeTable::edge`]
    pub edge: usize,
    pub x_start: u32,
    pub x_end: u32,
}

/// Every edge, filed under every row it crosses
#[derive(Debug, Clone)]
pub struct EdgeTable {
    width: u32,
    edges: Vec<Edge>,
    rows: Vec<Vec<RowEdge>>,
    sorted: bool,
}

impl EdgeTable {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            edges: Vec::new(),
            rows: vec![Vec::new(); height as usize],
            sorted: true,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.rows.len() as u32
    }

    /// Number of edges that made it into at least one row
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// File `edge` under every row whose band it intersects
    ///
    /// Flat edges are dropped. Columns are clamped to the canvas, except
    /// that an edge lying wholly left of the canvas is pinned to column 0:
    /// crossing it still changes which shapes are inside further right.
    /// An edge starting at or beyond the right border is skipped for that
    /// row, since nothing visible lies to its right.
    pub fn add(&mut self, edge: Edge) {
        if edge.is_flat() || self.rows.is_empty() || self.width == 0 {
            return;
        }

        let y_min = edge.y_min();
        let y_max = edge.y_max();

        // Clamp while still in f32 so far-away coordinates cannot overflow
        let first = y_min.floor().max(0.0);
        let end = y_max.ceil().min(self.rows.len() as f32);
        if first >= end {
            return;
        }

        let width = self.width as f32;
        let index = self.edges.len();
        let mut filed = false;

        for row in first as usize..end as usize {
            let top = row as f32;
            let xa = edge.x_at(y_min.max(top));
            let xb = edge.x_at(y_max.min(top + 1.0));
            let (x_lo, x_hi) = if xa <= xb { (xa, xb) } else { (xb, xa) };

            let start = x_lo.floor();
            if start >= width {
                continue;
            }
            let x_start = start.max(0.0);
            let x_end = (x_hi.floor() + 1.0).max(x_start + 1.0).min(width);

            self.rows[row].push(RowEdge {
                edge: index,
                x_start: x_start as u32,
                x_end: x_end as u32,
            });
            filed = true;
        }

        if filed {
            self.edges.push(edge);
            self.sorted = false;
        }
    }

    /// Order every row by ascending start column
    ///
    /// Stable, so edges starting in the same column keep insertion order.
    pub fn sort(&mut self) {
        for row in &mut self.rows {
            row.sort_by_key(|entry| entry.x_start);
        }
        self.sorted = true;
    }

    /// The sorted footprints for row `y`
    pub fn row(&self, y: u32) -> &[RowEdge] {
        debug_assert!(self.sorted, "EdgeTable::sort must run before rows are read");
        self.rows.get(y as usize).map(Vec::as_slice).unwrap_or(&[])
    }

    #[inline]
    pub fn edge(&self, index: usize) -> &Edge {
        &self.edges[index]
    }
}
