// this_file: backends/tessel-render-scan/src/compositor.rs

//! The scanline compositor: rows of edges become rows of color runs
//!
//! Each row is cut into ranges, the stretches of columns some edge can
//! influence. Between ranges nothing changes, so those pixels are a single
//! run of whatever color the sweep is carrying. Inside a range we pick the
//! cheapest exact method available:
//!
//! - **Analytic**: one edge that spans the whole row height splits each
//!   pixel into a trapezoid, and the covered area has a closed form.
//! - **Supersampled**: anything else is sampled on a 4×4 grid per pixel,
//!   one [`LayerStack`] sweep per sub-scanline, then averaged.
//!
//! Four layer stacks, one per sub-scanline, live for the whole row so the
//! shapes entered in one range are still entered in the next.

use std::ops::Range;

use log::{debug, trace};
use tessel_core::{types::RunCanvas, Color, Result};

use crate::edge::{EdgeTable, RowEdge};
use crate::layers::LayerStack;
use crate::row_writer::RowWriter;

/// Sub-samples per pixel along X
pub const SAMPLES_PER_PIXEL_X: usize = 4;

/// Sub-scanlines per pixel row
pub const SAMPLES_PER_PIXEL_Y: usize = 4;

/// Trapezoids narrower than this are treated as a vertical step
pub const VERTICAL_EPSILON: f32 = 0.001;

const SAMPLES_PER_PIXEL: f32 = (SAMPLES_PER_PIXEL_X * SAMPLES_PER_PIXEL_Y) as f32;

/// Premultiplied color sum used while averaging samples
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Accum {
    r: f32,
    g: f32,
    b: f32,
    a: f32,
}

impl Accum {
    fn premultiply(color: Color) -> Self {
        let a = f32::from(color.a);
        Self {
            r: f32::from(color.r) * a / 255.0,
            g: f32::from(color.g) * a / 255.0,
            b: f32::from(color.b) * a / 255.0,
            a,
        }
    }

    #[inline]
    fn add(&mut self, other: Accum) {
        self.r += other.r;
        self.g += other.g;
        self.b += other.b;
        self.a += other.a;
    }

    /// Divide the sum by `samples` and return to straight alpha
    fn resolve(self, samples: f32) -> Color {
        let a = self.a / samples;
        if a.round() <= 0.0 {
            return Color::transparent();
        }
        let channel = |premultiplied: f32| -> u8 {
            (premultiplied / samples * 255.0 / a).round().clamp(0.0, 255.0) as u8
        };
        Color::rgba(
            channel(self.r),
            channel(self.g),
            channel(self.b),
            a.round().clamp(0.0, 255.0) as u8,
        )
    }
}

/// Average a handful of colors, exactly when they agree
fn average(colors: &[Color]) -> Color {
    match colors.split_first() {
        None => Color::transparent(),
        Some((first, rest)) if rest.iter().all(|c| c == first) => *first,
        Some(_) => {
            let mut sum = Accum::default();
            for color in colors {
                sum.add(Accum::premultiply(*color));
            }
            sum.resolve(colors.len() as f32)
        },
    }
}

/// Fraction of pixel column `[x, x + 1)` lying right of the edge
///
/// `x0..x1` is the horizontal extent of the edge across the row. Right of
/// the edge is where the sweep has already crossed it, so this is the
/// weight of the post-edge color.
pub fn trapezoid_coverage(x0: f32, x1: f32, x: f32) -> f32 {
    let width = x1 - x0;
    if width < VERTICAL_EPSILON {
        return if x0 <= x + 0.5 { 1.0 } else { 0.0 };
    }

    // Where the edge sits left of the column the whole pixel row is covered
    let full = (x1.min(x) - x0).max(0.0);

    // Inside the column, coverage falls off linearly with the edge position
    let lo = x0.max(x);
    let hi = x1.min(x + 1.0);
    let partial = if hi > lo {
        (hi - lo) * (x + 1.0 - (lo + hi) * 0.5)
    } else {
        0.0
    };

    ((full + partial) / width).clamp(0.0, 1.0)
}

/// Counters reported once a render finishes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompositeStats {
    pub empty_rows: u32,
    pub analytic_ranges: u32,
    pub supersampled_ranges: u32,
    pub runs: usize,
}

/// Columns `[start, end)` plus the row entries whose footprints make them up
#[derive(Debug, Clone, PartialEq, Eq)]
struct SampleRange {
    start: u32,
    end: u32,
    entries: Range<usize>,
}

/// Merge touching or overlapping footprints of a sorted row
fn sample_ranges(row: &[RowEdge]) -> Vec<SampleRange> {
    let mut ranges: Vec<SampleRange> = Vec::new();
    for (i, entry) in row.iter().enumerate() {
        match ranges.last_mut() {
            Some(range) if entry.x_start <= range.end => {
                range.end = range.end.max(entry.x_end);
                range.entries.end = i + 1;
            },
            _ => ranges.push(SampleRange {
                start: entry.x_start,
                end: entry.x_end,
                entries: i..i + 1,
            }),
        }
    }
    ranges
}

/// Sweeps an [`EdgeTable`] row by row into a [`RunCanvas`]
pub struct ScanlineCompositor<'a> {
    table: &'a EdgeTable,
    background: Color,
    stacks: [LayerStack; SAMPLES_PER_PIXEL_Y],
    samples: Vec<Accum>,
    intercepts: Vec<(f32, usize)>,
    writer: RowWriter,
    stats: CompositeStats,
}

impl<'a> ScanlineCompositor<'a> {
    pub fn new(table: &'a EdgeTable, background: Color) -> Self {
        Self {
            table,
            background,
            stacks: std::array::from_fn(|_| LayerStack::new(background)),
            samples: Vec::new(),
            intercepts: Vec::new(),
            writer: RowWriter::new(),
            stats: CompositeStats::default(),
        }
    }

    /// Composite every row and return the canvas with its counters
    pub fn composite(mut self) -> Result<(RunCanvas, CompositeStats)> {
        for y in 0..self.table.height() {
            self.composite_row(y);
        }

        self.stats.runs = self.writer.run_count();
        debug!(
            "Composited {}x{}: {} empty rows, {} analytic / {} supersampled ranges, {} runs",
            self.table.width(),
            self.table.height(),
            self.stats.empty_rows,
            self.stats.analytic_ranges,
            self.stats.supersampled_ranges,
            self.stats.runs
        );

        let canvas = self.writer.finish(self.table.width(), self.table.height())?;
        Ok((canvas, self.stats))
    }

    fn composite_row(&mut self, y: u32) {
        let table = self.table;
        let width = table.width();
        let row = table.row(y);

        if row.is_empty() {
            self.stats.empty_rows += 1;
            self.writer.push(self.background, width);
            return;
        }

        for stack in &mut self.stacks {
            stack.reset();
        }

        let ranges = sample_ranges(row);
        trace!("Row {}: {} edges in {} ranges", y, row.len(), ranges.len());

        let mut cursor = 0;
        let mut carried = self.background;
        for range in &ranges {
            if range.start > cursor {
                self.writer.push(carried, range.start - cursor);
            }

            let entries = &row[range.entries.clone()];
            match entries {
                [single] if table.edge(single.edge).spans_row(y as f32) => {
                    self.stats.analytic_ranges += 1;
                    self.analytic(range, single.edge, y);
                },
                _ => {
                    self.stats.supersampled_ranges += 1;
                    self.supersample(range, entries, y);
                },
            }

            carried = self.stack_average();
            cursor = range.end;
        }

        if cursor < width {
            self.writer.push(carried, width - cursor);
        }
    }

    fn stack_average(&self) -> Color {
        let colors: [Color; SAMPLES_PER_PIXEL_Y] =
            std::array::from_fn(|k| self.stacks[k].current_color());
        average(&colors)
    }

    /// One edge crossing the full row: closed-form coverage per pixel
    fn analytic(&mut self, range: &SampleRange, edge_index: usize, y: u32) {
        let edge = *self.table.edge(edge_index);
        let before = self.stack_average();
        for stack in &mut self.stacks {
            stack.toggle(edge.shape_id, edge.color);
        }
        let after = self.stack_average();

        let top = y as f32;
        let xa = edge.x_at(top);
        let xb = edge.x_at(top + 1.0);
        let (x0, x1) = if xa <= xb { (xa, xb) } else { (xb, xa) };

        for column in range.start..range.end {
            let x = column as f32;
            let color = if x1 <= x {
                after
            } else if x0 >= x + 1.0 {
                before
            } else {
                match trapezoid_coverage(x0, x1, x) {
                    c if c <= 0.0 => before,
                    c if c >= 1.0 => after,
                    c => Color::mix(before, after, c),
                }
            };
            self.writer.push(color, 1);
        }
    }

    /// Anything else: 4 sub-scanlines × 4 sub-samples per pixel
    fn supersample(&mut self, range: &SampleRange, entries: &[RowEdge], y: u32) {
        let table = self.table;
        let first = range.start as i64 * SAMPLES_PER_PIXEL_X as i64;
        let last = range.end as i64 * SAMPLES_PER_PIXEL_X as i64;

        self.samples.clear();
        self.samples.resize((last - first) as usize, Accum::default());

        for (k, stack) in self.stacks.iter_mut().enumerate() {
            let sample_y = y as f32 + (k as f32 + 0.5) / SAMPLES_PER_PIXEL_Y as f32;

            self.intercepts.clear();
            self.intercepts.extend(entries.iter().filter_map(|entry| {
                let edge = table.edge(entry.edge);
                edge.crosses(sample_y)
                    .then(|| (edge.x_at(sample_y), entry.edge))
            }));
            self.intercepts.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut position = first;
            let mut color = Accum::premultiply(stack.current_color());
            for &(x, edge_index) in &self.intercepts {
                // First sample whose centre lies strictly right of x
                let sample = ((x * SAMPLES_PER_PIXEL_X as f32 + 0.5).floor() as i64)
                    .clamp(first, last);
                if sample > position {
                    let span = (position - first) as usize..(sample - first) as usize;
                    for slot in &mut self.samples[span] {
                        slot.add(color);
                    }
                    position = sample;
                }

                let edge = table.edge(edge_index);
                color = Accum::premultiply(stack.toggle(edge.shape_id, edge.color));
            }

            for slot in &mut self.samples[(position - first) as usize..] {
                slot.add(color);
            }
        }

        for pixel in self.samples.chunks_exact(SAMPLES_PER_PIXEL_X) {
            let mut sum = Accum::default();
            for sample in pixel {
                sum.add(*sample);
            }
            self.writer.push(sum.resolve(SAMPLES_PER_PIXEL), 1);
        }
    }
}
