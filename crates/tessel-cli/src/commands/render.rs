// this_file: crates/tessel-cli/src/commands/render.rs

//! Render command implementation

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use log::{debug, info};
use tessel::{
    error::{ExportError, Result, TesselError},
    traits::Exporter,
    Color, PngExporter, PngParams, RenderParams,
};

use crate::cli::RenderArgs;
use crate::scene::Scene;

pub fn run(args: &RenderArgs) -> Result<()> {
    if let Some(path) = &args.output {
        check_output_format(path, &PngExporter::new())?;
    }
    let scene = Scene::from_json(&read_scene(args)?)?;

    let width = args
        .width
        .or(scene.width)
        .ok_or_else(|| TesselError::ConfigError("No width given in scene or flags".into()))?;
    let height = args
        .height
        .or(scene.height)
        .ok_or_else(|| TesselError::ConfigError("No height given in scene or flags".into()))?;

    let background = match &args.background {
        Some(flag) => flag.parse()?,
        None => scene.background()?.unwrap_or_else(Color::transparent),
    };
    let shapes = scene.shapes()?;
    debug!(
        "Scene: {}x{}, background {}, {} shapes",
        width,
        height,
        background,
        shapes.len()
    );

    let render_params = RenderParams {
        background,
        ..RenderParams::default()
    };
    let png_params = PngParams {
        software: args.software.clone(),
        compression: args.compression,
        gamma: if args.no_gamma {
            None
        } else {
            PngParams::default().gamma
        },
    };

    let png = tessel::render_png(width, height, &shapes, &render_params, &png_params)?;
    write_output(args, &png)?;

    match &args.output {
        Some(path) => info!("Wrote {} bytes to {}", png.len(), path.display()),
        None => info!("Wrote {} bytes to stdout", png.len()),
    }
    Ok(())
}

/// An output extension, if present, must be the exporter's
fn check_output_format(path: &Path, exporter: &dyn Exporter) -> Result<()> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if !ext.eq_ignore_ascii_case(exporter.extension()) => {
            Err(ExportError::FormatNotSupported(format!(
                "{} writes .{} files, not .{}",
                exporter.name(),
                exporter.extension(),
                ext
            ))
            .into())
        },
        _ => Ok(()),
    }
}

fn read_scene(args: &RenderArgs) -> Result<String> {
    if args.scene.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        fs::read_to_string(&args.scene).map_err(|e| {
            TesselError::ConfigError(format!("Cannot read {}: {}", args.scene.display(), e))
        })
    }
}

fn write_output(args: &RenderArgs, data: &[u8]) -> Result<()> {
    if let Some(path) = &args.output {
        fs::write(path, data)?;
    } else {
        let mut stdout = io::stdout().lock();
        stdout.write_all(data)?;
        stdout.flush()?;
    }
    Ok(())
}
