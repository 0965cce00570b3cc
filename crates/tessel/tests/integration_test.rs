//! End-to-end tests: shapes in, decoded PNG pixels out

// this_file: crates/tessel/tests/integration_test.rs

use std::io::Cursor;

use proptest::prelude::*;
use tessel::prelude::*;

fn rect(x0: f32, y0: f32, x1: f32, y1: f32) -> Vec<Point> {
    vec![
        Point::new(x0, y0),
        Point::new(x1, y0),
        Point::new(x1, y1),
        Point::new(x0, y1),
    ]
}

fn png_with_background(width: u32, height: u32, background: Color, shapes: &[Shape]) -> Vec<u8> {
    let params = RenderParams {
        background,
        ..RenderParams::default()
    };
    tessel::render_png(width, height, shapes, &params, &PngParams::default()).unwrap()
}

fn png_of(width: u32, height: u32, shapes: &[Shape]) -> Vec<u8> {
    png_with_background(width, height, Color::transparent(), shapes)
}

/// Decode to (width, height, color type, RGBA bytes)
fn decode(bytes: &[u8]) -> (u32, u32, png::ColorType, Vec<u8>) {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::EXPAND);
    let mut reader = decoder.read_info().unwrap();
    let color_type = reader.info().color_type;
    let mut buf = vec![0; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut buf).unwrap();
    buf.truncate(frame.buffer_size());

    let rgba = match frame.color_type {
        png::ColorType::Rgba => buf,
        png::ColorType::Rgb => buf
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        other => panic!("unexpected color type {:?}", other),
    };
    (frame.width, frame.height, color_type, rgba)
}

fn pixel(rgba: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * width + x) * 4) as usize;
    [rgba[i], rgba[i + 1], rgba[i + 2], rgba[i + 3]]
}

#[test]
fn test_background_only_image() {
    let png = png_with_background(4, 4, Color::rgba(10, 20, 30, 255), &[]);
    let (width, height, color_type, rgba) = decode(&png);

    assert_eq!((width, height), (4, 4));
    assert_eq!(color_type, png::ColorType::Indexed);
    assert!(rgba.chunks_exact(4).all(|p| p == [10, 20, 30, 255]));
}

#[test]
fn test_solid_rectangle_image() {
    let shape = Shape::new(Color::rgb(255, 0, 0)).with_polygon(rect(0.0, 0.0, 4.0, 4.0));
    let (_, _, _, rgba) = decode(&png_of(4, 4, &[shape]));
    assert!(rgba.chunks_exact(4).all(|p| p == [255, 0, 0, 255]));
}

#[test]
fn test_diagonal_triangle_image() {
    let shape = Shape::new(Color::rgb(255, 0, 0)).with_polygon(vec![
        Point::new(0.0, 0.0),
        Point::new(4.0, 0.0),
        Point::new(0.0, 4.0),
    ]);
    let (_, _, _, rgba) = decode(&png_of(4, 4, &[shape]));

    assert_eq!(pixel(&rgba, 4, 0, 0), [255, 0, 0, 255]);
    assert_eq!(pixel(&rgba, 4, 3, 3)[3], 0);
    assert!(rgba
        .chunks_exact(4)
        .any(|p| p[3] > 0 && p[3] < 255));
}

#[test]
fn test_later_shape_wins_overlap() {
    let red = Shape::new(Color::rgb(255, 0, 0)).with_polygon(rect(0.0, 0.0, 3.0, 4.0));
    let blue = Shape::new(Color::rgb(0, 0, 255)).with_polygon(rect(1.0, 0.0, 4.0, 4.0));

    let (_, _, _, red_first) = decode(&png_of(4, 4, &[red.clone(), blue.clone()]));
    let (_, _, _, blue_first) = decode(&png_of(4, 4, &[blue, red]));

    assert_eq!(pixel(&red_first, 4, 2, 2), [0, 0, 255, 255]);
    assert_eq!(pixel(&blue_first, 4, 2, 2), [255, 0, 0, 255]);
}

#[test]
fn test_identicon_style_scene_is_deterministic() {
    let scene = vec![
        Shape::new(Color::rgb(240, 240, 240)).with_polygon(rect(0.0, 0.0, 48.0, 48.0)),
        Shape::new(Color::rgb(64, 128, 200))
            .with_polygon(vec![
                Point::new(8.0, 8.0),
                Point::new(24.0, 4.5),
                Point::new(16.3, 20.1),
            ])
            .with_circle(Point::new(32.0, 32.0), 9.5, false),
        Shape::new(Color::rgba(200, 40, 40, 180)).with_circle(Point::new(24.0, 24.0), 6.0, true),
    ];

    let first = png_of(48, 48, &scene);
    let second = png_of(48, 48, &scene);
    assert_eq!(first, second);

    let (width, height, _, rgba) = decode(&first);
    assert_eq!((width, height), (48, 48));
    assert_eq!(rgba.len(), 48 * 48 * 4);
}

#[test]
fn test_many_colors_fall_back_to_truecolor() {
    // An antialiased circle's fringe stays well under 256 colors
    let few = png_of(
        32,
        32,
        &[Shape::new(Color::white()).with_circle(Point::new(16.0, 16.0), 10.0, false)],
    );
    assert_eq!(decode(&few).2, png::ColorType::Indexed);

    // 300 one-pixel rectangles, each a distinct color
    let shapes: Vec<Shape> = (0..300u32)
        .map(|i| {
            let (x, y) = ((i % 20) as f32, (i / 20) as f32);
            Shape::new(Color::rgb((i % 256) as u8, (i / 256) as u8, 99))
                .with_polygon(rect(x, y, x + 1.0, y + 1.0))
        })
        .collect();
    let (_, _, color_type, rgba) = decode(&png_of(20, 15, &shapes));
    assert_eq!(color_type, png::ColorType::Rgba);
    assert_eq!(pixel(&rgba, 20, 19, 14), [43, 1, 99, 255]);
}

#[test]
fn test_canvas_matches_decoded_png() {
    let shapes = [Shape::new(Color::rgba(30, 200, 90, 200))
        .with_polygon(vec![
            Point::new(1.2, 0.4),
            Point::new(11.7, 3.3),
            Point::new(5.5, 9.9),
        ])];
    let canvas = tessel::render_canvas(12, 10, &shapes, &RenderParams::default()).unwrap();
    let png = PngExporter::new().export(&canvas).unwrap();
    assert_eq!(decode(&png).3, canvas.to_rgba8());
}

#[test]
fn test_draw_works_through_trait_objects() {
    let mut renderer: Box<dyn Renderer> = Box::new(ScanlineRenderer::new(4, 4).unwrap());
    tessel::draw(
        renderer.as_mut(),
        &[Shape::new(Color::black()).with_polygon(rect(0.0, 0.0, 4.0, 4.0))],
    )
    .unwrap();
    let canvas = renderer.render().unwrap();
    assert_eq!(canvas.runs, vec![ColorRun::new(Color::black(), 16)]);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_same_scene_same_bytes(
        points in prop::collection::vec((0.0f32..24.0, 0.0f32..24.0), 3..7),
        radius in 0.5f32..10.0,
        alpha in 1u8..=255,
    ) {
        let polygon: Vec<Point> = points.into_iter().map(Point::from).collect();
        let scene = [Shape::new(Color::rgba(12, 34, 56, alpha))
            .with_polygon(polygon)
            .with_circle(Point::new(12.0, 12.0), radius, false)];
        prop_assert_eq!(png_of(24, 24, &scene), png_of(24, 24, &scene));
    }
}
