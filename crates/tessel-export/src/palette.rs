//! Indexed or truecolor? One pass over the runs decides
//!
//! Flat-colored icons rarely use more than a handful of colors, and an
//! indexed PNG stores one byte per pixel instead of four. The builder
//! collects colors in first-seen order and gives up the moment a 257th
//! distinct color appears.

use std::collections::HashMap;

use tessel_core::{types::ColorRun, Color};

/// Most entries a PNG `PLTE` chunk can hold at 8 bits per index
pub const MAX_PALETTE_SIZE: usize = 256;

/// Distinct canvas colors in first-seen order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Color>,
    indices: HashMap<Color, u8>,
    has_alpha: bool,
}

impl Palette {
    /// Collect the colors of `runs`, or `None` if there are too many
    pub fn build(runs: &[ColorRun]) -> Option<Self> {
        let mut colors = Vec::new();
        let mut indices = HashMap::new();

        for run in runs {
            if indices.contains_key(&run.color) {
                continue;
            }
            if colors.len() == MAX_PALETTE_SIZE {
                return None;
            }
            indices.insert(run.color, colors.len() as u8);
            colors.push(run.color);
        }

        let has_alpha = colors.iter().any(|c| !c.is_opaque());
        Some(Self {
            colors,
            indices,
            has_alpha,
        })
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Does any entry need a `tRNS` alpha byte?
    pub fn has_alpha(&self) -> bool {
        self.has_alpha
    }

    pub fn index_of(&self, color: Color) -> Option<u8> {
        self.indices.get(&color).copied()
    }

    /// `PLTE` payload: RGB triplets
    pub fn rgb_bytes(&self) -> Vec<u8> {
        self.colors.iter().flat_map(|c| [c.r, c.g, c.b]).collect()
    }

    /// `tRNS` payload: one alpha byte per entry
    pub fn alpha_bytes(&self) -> Vec<u8> {
        self.colors.iter().map(|c| c.a).collect()
    }
}
