//! Info command implementation

use tessel::{
    error::Result,
    geometry::{CIRCLE_MIN_SECTORS, CIRCLE_SECTOR_LENGTH},
    render_scan::compositor::{SAMPLES_PER_PIXEL_X, SAMPLES_PER_PIXEL_Y, VERTICAL_EPSILON},
    traits::{Exporter, Renderer},
    PngExporter, ScanlineRenderer,
};

pub fn run() -> Result<()> {
    let renderer = ScanlineRenderer::new(1, 1)?;
    let exporter = PngExporter::new();

    println!("Tessel v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Renderer:");
    println!("  {:<17} - scanline, analytic or supersampled coverage", renderer.name());
    println!();
    println!("Exporter:");
    println!(
        "  {:<17} - .{} ({}), indexed when 256 colors or fewer",
        exporter.name(),
        exporter.extension(),
        exporter.mime_type()
    );
    println!();
    println!("Sampling:");
    println!("  samples per pixel {}x{}", SAMPLES_PER_PIXEL_X, SAMPLES_PER_PIXEL_Y);
    println!("  vertical epsilon  {}", VERTICAL_EPSILON);
    println!(
        "  circle sectors    one per {} px of circumference, at least {}",
        CIRCLE_SECTOR_LENGTH, CIRCLE_MIN_SECTORS
    );
    Ok(())
}
