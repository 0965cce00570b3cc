// this_file: crates/tessel-export/src/png.rs

//! PNG export format
//!
//! Writes run-length canvases straight to PNG without an image library.
//! Chunks go out in a fixed order: `IHDR`, `gAMA`, `PLTE` and `tRNS` when
//! indexed, `tEXt`, `IDAT`, `IEND`. Rows are expanded from runs one at a
//! time and fed into the zlib stream, so the raw scanlines never exist as
//! one buffer.

use std::io::{self, Write};

use log::debug;
use tessel_core::{
    error::{ExportError, Result},
    traits::Exporter,
    types::RunCanvas,
    TesselError,
};

use crate::checksum::Crc32;
use crate::palette::Palette;
use crate::zlib::ZlibStream;

/// The eight bytes every PNG starts with
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Gamma 2.2 in PNG's 1/100000 fixed point
pub const DEFAULT_GAMMA: u32 = 45455;

const COLOR_TYPE_INDEXED: u8 = 3;
const COLOR_TYPE_RGBA: u8 = 6;
const BIT_DEPTH: u8 = 8;
const FILTER_NONE: u8 = 0;
const SOFTWARE_KEYWORD: &[u8] = b"Software";

/// How the encoder should behave
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PngParams {
    /// Value of the `tEXt` `Software` entry, Latin-1 only
    pub software: String,
    /// Deflate level, 0 (store) to 9 (smallest)
    pub compression: u32,
    /// `gAMA` value; `None` leaves the chunk out
    pub gamma: Option<u32>,
}

impl Default for PngParams {
    fn default() -> Self {
        Self {
            software: "tessel".to_string(),
            compression: 9,
            gamma: Some(DEFAULT_GAMMA),
        }
    }
}

impl PngParams {
    /// Reject values no PNG could carry
    pub fn validate(&self) -> Result<()> {
        if self.compression > 9 {
            return Err(TesselError::ConfigError(format!(
                "compression level must be 0-9, got {}",
                self.compression
            )));
        }
        if self.software.contains('\0') {
            return Err(TesselError::ConfigError(
                "software name must not contain NUL".into(),
            ));
        }
        if let Some(c) = self.software.chars().find(|&c| u32::from(c) > 0xFF) {
            return Err(TesselError::ConfigError(format!(
                "software name must be Latin-1, found {:?}",
                c
            )));
        }
        Ok(())
    }
}

/// Turns a [`RunCanvas`] into PNG bytes
#[derive(Debug, Clone, Default)]
pub struct PngEncoder {
    params: PngParams,
}

impl PngEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(params: PngParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &PngParams {
        &self.params
    }

    /// Encode, choosing indexed color whenever the canvas fits a palette
    pub fn encode(&self, canvas: &RunCanvas) -> Result<Vec<u8>> {
        let palette = Palette::build(&canvas.runs);
        self.encode_with(canvas, palette.as_ref())
    }

    /// Encode with an explicit palette, or as truecolor when `None`
    pub fn encode_with(&self, canvas: &RunCanvas, palette: Option<&Palette>) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.write_with(canvas, palette, &mut out)?;
        Ok(out)
    }

    /// Encode into any sink
    pub fn write_to<W: Write>(&self, canvas: &RunCanvas, out: &mut W) -> Result<()> {
        let palette = Palette::build(&canvas.runs);
        self.write_with(canvas, palette.as_ref(), out)
    }

    fn write_with<W: Write>(
        &self,
        canvas: &RunCanvas,
        palette: Option<&Palette>,
        out: &mut W,
    ) -> Result<()> {
        check_canvas(canvas)?;

        match palette {
            Some(p) => debug!(
                "PNG {}x{}: indexed, {} colors{}",
                canvas.width,
                canvas.height,
                p.len(),
                if p.has_alpha() { " with alpha" } else { "" }
            ),
            None => debug!("PNG {}x{}: truecolor with alpha", canvas.width, canvas.height),
        }

        let image_data = self.compress_rows(canvas, palette)?;
        debug!(
            "IDAT: {} bytes at compression level {}",
            image_data.len(),
            self.params.compression
        );

        out.write_all(&PNG_SIGNATURE).map_err(write_failed)?;
        write_chunk(out, b"IHDR", &header_data(canvas, palette.is_some()))?;
        if let Some(gamma) = self.params.gamma {
            write_chunk(out, b"gAMA", &gamma.to_be_bytes())?;
        }
        if let Some(palette) = palette {
            write_chunk(out, b"PLTE", &palette.rgb_bytes())?;
            if palette.has_alpha() {
                write_chunk(out, b"tRNS", &palette.alpha_bytes())?;
            }
        }
        write_chunk(out, b"tEXt", &self.software_text())?;
        write_chunk(out, b"IDAT", &image_data)?;
        write_chunk(out, b"IEND", &[])?;
        Ok(())
    }

    fn software_text(&self) -> Vec<u8> {
        let mut text = Vec::with_capacity(SOFTWARE_KEYWORD.len() + 1 + self.params.software.len());
        text.extend_from_slice(SOFTWARE_KEYWORD);
        text.push(0);
        // tEXt text is Latin-1, one byte per char
        text.extend(self.params.software.chars().map(|c| c as u8));
        text
    }

    /// Filtered scanlines, expanded from runs, through zlib
    fn compress_rows(&self, canvas: &RunCanvas, palette: Option<&Palette>) -> Result<Vec<u8>> {
        let bytes_per_pixel = if palette.is_some() { 1 } else { 4 };
        let row_len = 1 + canvas.width as usize * bytes_per_pixel;

        let mut stream =
            ZlibStream::new(Vec::new(), self.params.compression).map_err(encoding_failed)?;
        let mut row = Vec::with_capacity(row_len);
        row.push(FILTER_NONE);

        for run in &canvas.runs {
            let rgba = [run.color.r, run.color.g, run.color.b, run.color.a];
            let index;
            let pixel: &[u8] = match palette {
                Some(palette) => {
                    index = palette.index_of(run.color).ok_or_else(|| {
                        ExportError::EncodingFailed(format!(
                            "color {} is missing from the palette",
                            run.color
                        ))
                    })?;
                    std::slice::from_ref(&index)
                },
                None => &rgba,
            };

            let mut remaining = run.count as usize;
            while remaining > 0 {
                let take = remaining.min((row_len - row.len()) / bytes_per_pixel);
                for _ in 0..take {
                    row.extend_from_slice(pixel);
                }
                remaining -= take;

                if row.len() == row_len {
                    stream.write_all(&row).map_err(encoding_failed)?;
                    row.truncate(1);
                }
            }
        }

        stream.finish().map_err(encoding_failed)
    }
}

fn check_canvas(canvas: &RunCanvas) -> Result<()> {
    let total: u64 = canvas.runs.iter().map(|run| u64::from(run.count)).sum();
    if canvas.width == 0 || canvas.height == 0 || total != canvas.pixel_count() {
        return Err(ExportError::EncodingFailed(format!(
            "runs cover {} pixels, canvas {}x{} needs {}",
            total,
            canvas.width,
            canvas.height,
            canvas.pixel_count()
        ))
        .into());
    }
    Ok(())
}

fn header_data(canvas: &RunCanvas, indexed: bool) -> [u8; 13] {
    let mut data = [0u8; 13];
    data[0..4].copy_from_slice(&canvas.width.to_be_bytes());
    data[4..8].copy_from_slice(&canvas.height.to_be_bytes());
    data[8] = BIT_DEPTH;
    data[9] = if indexed {
        COLOR_TYPE_INDEXED
    } else {
        COLOR_TYPE_RGBA
    };
    // compression, filter and interlace methods stay 0
    data
}

/// Length, type, data, then the CRC-32 of type and data
pub fn write_chunk<W: Write>(out: &mut W, kind: &[u8; 4], data: &[u8]) -> Result<()> {
    let length = u32::try_from(data.len()).map_err(|_| {
        ExportError::EncodingFailed(format!(
            "{} chunk of {} bytes is too large",
            String::from_utf8_lossy(kind),
            data.len()
        ))
    })?;

    let mut crc = Crc32::new();
    crc.update(kind);
    crc.update(data);

    out.write_all(&length.to_be_bytes()).map_err(write_failed)?;
    out.write_all(kind).map_err(write_failed)?;
    out.write_all(data).map_err(write_failed)?;
    out.write_all(&crc.value().to_be_bytes())
        .map_err(write_failed)?;
    Ok(())
}

fn write_failed(err: io::Error) -> TesselError {
    ExportError::WriteFailed(err.to_string()).into()
}

fn encoding_failed(err: io::Error) -> TesselError {
    ExportError::EncodingFailed(format!("zlib stream: {}", err)).into()
}

/// PNG exporter for rendered canvases
///
/// # Examples
///
/// ```
/// use tessel_export::PngExporter;
/// let exporter = PngExporter::new();
/// ```
#[derive(Debug, Clone, Default)]
pub struct PngExporter {
    encoder: PngEncoder,
}

impl PngExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(params: PngParams) -> Result<Self> {
        Ok(Self {
            encoder: PngEncoder::with_params(params)?,
        })
    }

    pub fn encoder(&self) -> &PngEncoder {
        &self.encoder
    }
}

impl Exporter for PngExporter {
    fn name(&self) -> &'static str {
        "png"
    }

    fn export(&self, canvas: &RunCanvas) -> Result<Vec<u8>> {
        self.encoder.encode(canvas)
    }

    fn extension(&self) -> &'static str {
        "png"
    }

    fn mime_type(&self) -> &'static str {
        "image/png"
    }
}
