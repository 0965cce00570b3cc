//! Run-length output for the compositor
//!
//! Pixels arrive left to right, row after row. Rather than store one color
//! per pixel we extend the last run whenever the color repeats, which for
//! flat-colored icons shrinks a canvas to a few runs per row.

use tessel_core::types::{ColorRun, RunCanvas};
use tessel_core::{Color, Result};

#[derive(Debug, Default)]
pub struct RowWriter {
    runs: Vec<ColorRun>,
    written: u64,
}

impl RowWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `count` pixels of `color`, merging with the previous run
    pub fn push(&mut self, color: Color, count: u32) {
        if count == 0 {
            return;
        }
        self.written += u64::from(count);
        match self.runs.last_mut() {
            Some(last) if last.color == color => last.count += count,
            _ => self.runs.push(ColorRun::new(color, count)),
        }
    }

    /// Pixels written so far
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    /// Hand the runs over as a canvas; fails if they don't cover it exactly
    pub fn finish(self, width: u32, height: u32) -> Result<RunCanvas> {
        RunCanvas::new(width, height, self.runs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjacent_runs_coalesce() {
        let mut writer = RowWriter::new();
        writer.push(Color::black(), 2);
        writer.push(Color::black(), 3);
        writer.push(Color::white(), 1);
        writer.push(Color::white(), 0);
        writer.push(Color::black(), 2);
        assert_eq!(writer.run_count(), 3);
        assert_eq!(writer.written(), 8);

        let canvas = writer.finish(4, 2).unwrap();
        assert_eq!(canvas.runs[0], ColorRun::new(Color::black(), 5));
    }

    #[test]
    fn test_finish_rejects_short_canvas() {
        let mut writer = RowWriter::new();
        writer.push(Color::black(), 3);
        assert!(writer.finish(2, 2).is_err());
    }
}
