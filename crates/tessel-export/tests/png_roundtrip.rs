//! Decode what we encode with an independent PNG reader

use std::io::Cursor;

use proptest::prelude::*;
use tessel_core::{
    traits::Exporter,
    types::{ColorRun, RunCanvas},
    Color,
};
use tessel_export::{adler32, crc32, Adler32, Crc32, PngEncoder, PngExporter, PngParams};

struct Decoded {
    width: u32,
    height: u32,
    color_type: png::ColorType,
    has_palette: bool,
    rgba: Vec<u8>,
}

fn decode(bytes: &[u8]) -> Decoded {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::EXPAND);
    let mut reader = decoder.read_info().unwrap();
    let color_type = reader.info().color_type;
    let has_palette = reader.info().palette.is_some();

    let mut buf = vec![0; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut buf).unwrap();
    buf.truncate(frame.buffer_size());

    // Indexed images without tRNS expand to RGB; widen to RGBA
    let rgba = match frame.color_type {
        png::ColorType::Rgba => buf,
        png::ColorType::Rgb => buf
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        other => panic!("unexpected decoded color type {:?}", other),
    };

    Decoded {
        width: frame.width,
        height: frame.height,
        color_type,
        has_palette,
        rgba,
    }
}

fn gradient(width: u32, height: u32) -> RunCanvas {
    let runs = (0..width * height)
        .map(|i| ColorRun::new(Color::rgba((i % 256) as u8, (i / 256) as u8, 7, 255), 1))
        .collect();
    RunCanvas::new(width, height, runs).unwrap()
}

#[test]
fn test_background_canvas_round_trip() {
    let canvas = RunCanvas::solid(4, 4, Color::rgb(10, 20, 30)).unwrap();
    let decoded = decode(&PngExporter::new().export(&canvas).unwrap());

    assert_eq!((decoded.width, decoded.height), (4, 4));
    assert_eq!(decoded.color_type, png::ColorType::Indexed);
    assert!(decoded
        .rgba
        .chunks_exact(4)
        .all(|p| p == [10, 20, 30, 255]));
}

#[test]
fn test_indexed_with_alpha_round_trip() {
    let canvas = RunCanvas::new(
        3,
        2,
        vec![
            ColorRun::new(Color::transparent(), 2),
            ColorRun::new(Color::rgba(255, 0, 0, 128), 3),
            ColorRun::new(Color::rgb(0, 255, 0), 1),
        ],
    )
    .unwrap();
    let decoded = decode(&PngEncoder::new().encode(&canvas).unwrap());

    assert_eq!(decoded.color_type, png::ColorType::Indexed);
    assert_eq!(decoded.rgba, canvas.to_rgba8());
}

#[test]
fn test_256_colors_stay_indexed() {
    let canvas = gradient(16, 16);
    let decoded = decode(&PngEncoder::new().encode(&canvas).unwrap());
    assert_eq!(decoded.color_type, png::ColorType::Indexed);
    assert!(decoded.has_palette);
    assert_eq!(decoded.rgba, canvas.to_rgba8());
}

#[test]
fn test_257_colors_switch_to_truecolor() {
    let canvas = gradient(257, 1);
    let decoded = decode(&PngEncoder::new().encode(&canvas).unwrap());
    assert_eq!(decoded.color_type, png::ColorType::Rgba);
    assert!(!decoded.has_palette);
    assert_eq!(decoded.rgba, canvas.to_rgba8());
}

#[test]
fn test_runs_crossing_rows_round_trip() {
    // One run spans the end of row 0 and all of row 1
    let canvas = RunCanvas::new(
        3,
        3,
        vec![
            ColorRun::new(Color::black(), 2),
            ColorRun::new(Color::white(), 4),
            ColorRun::new(Color::rgb(9, 9, 9), 3),
        ],
    )
    .unwrap();
    let decoded = decode(&PngEncoder::new().encode_with(&canvas, None).unwrap());
    assert_eq!(decoded.rgba, canvas.to_rgba8());
}

#[test]
fn test_every_compression_level_decodes() {
    let canvas = gradient(20, 20);
    for compression in 0..=9 {
        let params = PngParams {
            compression,
            ..PngParams::default()
        };
        let bytes = PngEncoder::with_params(params).unwrap().encode(&canvas).unwrap();
        assert_eq!(decode(&bytes).rgba, canvas.to_rgba8(), "level {compression}");
    }
}

#[test]
fn test_encoding_is_deterministic() {
    let canvas = gradient(40, 9);
    let encoder = PngEncoder::new();
    assert_eq!(encoder.encode(&canvas).unwrap(), encoder.encode(&canvas).unwrap());
}

#[test]
fn test_checksum_reference_values() {
    assert_eq!(crc32(b""), 0);
    assert_eq!(crc32(b"IHDR"), 0xA8A1_AE0A);
    assert_eq!(adler32(b""), 1);
}

proptest! {
    #[test]
    fn prop_incremental_checksums_match_one_shot(
        data in prop::collection::vec(any::<u8>(), 0..20_000),
        split in any::<prop::sample::Index>(),
    ) {
        let at = split.index(data.len() + 1);
        let (head, tail) = data.split_at(at);

        let mut crc = Crc32::new();
        crc.update(head);
        crc.update(tail);
        prop_assert_eq!(crc.value(), crc32(&data));

        let mut adler = Adler32::new();
        adler.update(head);
        adler.update(tail);
        prop_assert_eq!(adler.value(), adler32(&data));
    }

    #[test]
    fn prop_any_canvas_round_trips(
        runs in prop::collection::vec((any::<[u8; 4]>(), 1u32..40), 1..60),
        width in 1u32..30,
    ) {
        let runs: Vec<ColorRun> = runs
            .into_iter()
            .map(|([r, g, b, a], count)| ColorRun::new(Color::rgba(r, g, b, a), count))
            .collect();
        let total: u32 = runs.iter().map(|r| r.count).sum();
        // Pad the last row so the runs fill a whole rectangle
        let height = total.div_ceil(width);
        let mut runs = runs;
        let pad = width * height - total;
        if pad > 0 {
            runs.push(ColorRun::new(Color::transparent(), pad));
        }
        let canvas = RunCanvas::new(width, height, runs).unwrap();

        let decoded = decode(&PngEncoder::new().encode(&canvas).unwrap());
        prop_assert_eq!(decoded.rgba, canvas.to_rgba8());
    }
}
