//! CLI Smoke Tests
//!
//! Runs the built `tessel` binary against small scenes and checks exit
//! status, output files and error reporting.

use std::fs;
use std::io::{Cursor, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};

fn tessel() -> Command {
    Command::new(env!("CARGO_BIN_EXE_tessel"))
}

/// A unique path under the system temp dir
fn temp_path(name: &str) -> PathBuf {
    let id = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("tessel_test_{}_{}_{}", std::process::id(), id, name))
}

const SCENE: &str = r##"{
    "width": 16, "height": 12, "background": "#102030ff",
    "shapes": [
        { "color": "#ff0000ff", "polygons": [[[0,0],[8,0],[8,12],[0,12]]] },
        { "color": "#00ff0080", "circles": [ { "center": [12, 6], "radius": 3.5 } ] }
    ]
}"##;

fn write_scene(text: &str) -> PathBuf {
    let path = temp_path("scene.json");
    fs::write(&path, text).unwrap();
    path
}

fn decode(bytes: &[u8]) -> (u32, u32, Vec<u8>) {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::EXPAND);
    let mut reader = decoder.read_info().unwrap();
    let mut buf = vec![0; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut buf).unwrap();
    buf.truncate(frame.buffer_size());
    (frame.width, frame.height, buf)
}

#[test]
fn test_info_lists_backends() {
    let output = tessel().arg("info").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("scan"));
    assert!(stdout.contains("image/png"));
    assert!(stdout.contains("4x4"));
}

#[test]
fn test_render_writes_png() {
    let scene = write_scene(SCENE);
    let out = temp_path("out.png");

    let output = tessel()
        .args(["render", scene.to_str().unwrap(), "-o", out.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let bytes = fs::read(&out).unwrap();
    let (width, height, pixels) = decode(&bytes);
    assert_eq!((width, height), (16, 12));
    assert!(!pixels.is_empty());

    let _ = fs::remove_file(scene);
    let _ = fs::remove_file(out);
}

#[test]
fn test_size_flags_override_scene() {
    let scene = write_scene(SCENE);
    let out = temp_path("override.png");

    let status = tessel()
        .args(["render", scene.to_str().unwrap(), "-o", out.to_str().unwrap()])
        .args(["--width", "5", "--height", "7", "-q"])
        .status()
        .unwrap();
    assert!(status.success());
    let (width, height, _) = decode(&fs::read(&out).unwrap());
    assert_eq!((width, height), (5, 7));

    let _ = fs::remove_file(scene);
    let _ = fs::remove_file(out);
}

#[test]
fn test_render_to_stdout_from_stdin() {
    let mut child = tessel()
        .args(["render", "-", "--background", "#fff", "-q"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(br#"{"width": 3, "height": 2}"#)
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());

    let (width, height, pixels) = decode(&output.stdout);
    assert_eq!((width, height), (3, 2));
    // Opaque white, no tRNS, so it expands to RGB
    assert!(pixels.iter().all(|&b| b == 255));
}

#[test]
fn test_identical_runs_are_byte_identical() {
    let scene = write_scene(SCENE);
    let render = || {
        tessel()
            .args(["render", scene.to_str().unwrap(), "-q"])
            .output()
            .unwrap()
            .stdout
    };
    assert_eq!(render(), render());
    let _ = fs::remove_file(scene);
}

#[test]
fn test_bad_inputs_fail() {
    let missing = tessel()
        .args(["render", "/nonexistent/scene.json"])
        .output()
        .unwrap();
    assert!(!missing.status.success());
    assert!(String::from_utf8_lossy(&missing.stderr).contains("Cannot read"));

    let no_size = write_scene(r#"{"shapes": []}"#);
    let status = tessel()
        .args(["render", no_size.to_str().unwrap(), "-q"])
        .stdout(Stdio::null())
        .status()
        .unwrap();
    assert!(!status.success());

    let status = tessel()
        .args(["render", no_size.to_str().unwrap(), "--width", "4", "--height", "4"])
        .args(["--compression", "11", "-q"])
        .stdout(Stdio::null())
        .status()
        .unwrap();
    assert!(!status.success());

    let jpeg = temp_path("out.jpg");
    let wrong_format = tessel()
        .args(["render", no_size.to_str().unwrap(), "--width", "4", "--height", "4"])
        .args(["-o", jpeg.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(!wrong_format.status.success());
    assert!(String::from_utf8_lossy(&wrong_format.stderr).contains("Format not supported"));
    assert!(!jpeg.exists());

    let huge_circle = write_scene(
        r##"{"width": 4, "height": 4,
             "shapes": [{"color": "#000", "circles": [{"center": [2, 2], "radius": 1e20}]}]}"##,
    );
    let output = tessel()
        .args(["render", huge_circle.to_str().unwrap()])
        .stdout(Stdio::null())
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid geometry"));

    let _ = fs::remove_file(huge_circle);
    let _ = fs::remove_file(no_size);
}
