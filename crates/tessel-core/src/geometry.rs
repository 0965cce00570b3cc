//! Points and the fixed circle tessellation rule
//!
//! Circles never reach the rasterizer as circles. They are flattened here
//! into regular polygons whose vertex count depends only on the radius, so
//! the same circle always produces the same edges.

use std::f32::consts::PI;

use crate::error::{RenderError, Result};

/// An immutable 2D point in canvas pixels (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// Target arc length of one circle sector, in pixels
pub const CIRCLE_SECTOR_LENGTH: f32 = 3.0;

/// Fewest sectors a circle is ever split into
pub const CIRCLE_MIN_SECTORS: usize = 4;

/// Most sectors a circle may be split into
///
/// At three pixels per sector this is a radius of roughly 500 000 pixels,
/// far past any canvas a renderer accepts.
pub const CIRCLE_MAX_SECTORS: usize = 1 << 20;

/// How many polygon vertices a circle of `radius` becomes
///
/// Returns `None` when the circle would need more than
/// [`CIRCLE_MAX_SECTORS`] vertices, including an infinite radius.
pub fn circle_sector_count(radius: f32) -> Option<usize> {
    let sectors = (2.0 * PI * radius.abs() / CIRCLE_SECTOR_LENGTH).round();
    if sectors > CIRCLE_MAX_SECTORS as f32 {
        None
    } else if sectors > CIRCLE_MIN_SECTORS as f32 {
        Some(sectors as usize)
    } else {
        Some(CIRCLE_MIN_SECTORS)
    }
}

/// Flatten a circle into a closed polygon
///
/// Vertices are evenly spaced starting at angle 0 (the rightmost point).
/// With `counter_clockwise == false` the angle grows, which on a y-down
/// canvas walks clockwise; otherwise it shrinks.
pub fn circle_polygon(center: Point, radius: f32, counter_clockwise: bool) -> Result<Vec<Point>> {
    let sectors = circle_sector_count(radius).ok_or_else(|| {
        RenderError::InvalidGeometry(format!(
            "circle radius {} needs more than {} sectors",
            radius, CIRCLE_MAX_SECTORS
        ))
    })?;
    let step = 2.0 * PI / sectors as f32;
    let sign = if counter_clockwise { -1.0 } else { 1.0 };

    Ok((0..sectors)
        .map(|i| {
            let angle = sign * step * i as f32;
            Point::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            )
        })
        .collect())
}
