//! Which shapes are we inside right now?
//!
//! A sweep along a sample line carries one [`LayerStack`]. Crossing an edge
//! toggles that edge's shape: in if it was out, out if it was in. The stack
//! keeps the shapes ordered by id (draw order) and caches the color they
//! composite to over the background.

use tessel_core::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Layer {
    shape_id: u32,
    color: Color,
}

/// Shapes covering the current sweep position, bottom to top
#[derive(Debug, Clone)]
pub struct LayerStack {
    background: Color,
    layers: Vec<Layer>,
    current: Color,
}

impl LayerStack {
    pub fn new(background: Color) -> Self {
        Self {
            background,
            layers: Vec::new(),
            current: background,
        }
    }

    /// Forget every layer, keeping the allocation
    pub fn reset(&mut self) {
        self.layers.clear();
        self.current = self.background;
    }

    /// Composite of all active shapes over the background
    #[inline]
    pub fn current_color(&self) -> Color {
        self.current
    }

    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    pub fn contains(&self, shape_id: u32) -> bool {
        self.find(shape_id).is_ok()
    }

    /// Enter or leave `shape_id` and return the new composite
    pub fn toggle(&mut self, shape_id: u32, color: Color) -> Color {
        match self.find(shape_id) {
            Ok(pos) => {
                self.layers.remove(pos);
            },
            Err(pos) => self.layers.insert(pos, Layer { shape_id, color }),
        }
        self.current = self.composite();
        self.current
    }

    fn find(&self, shape_id: u32) -> Result<usize, usize> {
        self.layers
            .binary_search_by_key(&shape_id, |layer| layer.shape_id)
    }

    fn composite(&self) -> Color {
        self.layers
            .iter()
            .fold(self.background, |below, layer| layer.color.over(below))
    }
}
