// crates/labelpress-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Helper Unit Tests
// Description: Unit coverage for CLI input parsing helpers.
// Purpose: Ensure serial splitting and image loading behave deterministically.
// Dependencies: labelpress-cli, tempfile
// ============================================================================

//! ## Overview
//! Unit tests for the helpers behind offline label generation: textarea-style
//! serial splitting, MIME detection, and data-URI image loading.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::Path;

use crate::load_image;
use crate::mime_for_extension;
use crate::split_serial_lines;

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn serial_lines_drop_blank_entries() {
    let lines = split_serial_lines("SN1\n\n  \nSN2\n SN3 \n");
    assert_eq!(lines, vec!["SN1", "SN2", "SN3"]);
}

#[test]
fn serial_lines_preserve_order() {
    let lines = split_serial_lines("B\nA\nC");
    assert_eq!(lines, vec!["B", "A", "C"]);
}

#[test]
fn mime_detection_covers_common_extensions() {
    assert_eq!(mime_for_extension(Path::new("foto.JPG")), "image/jpeg");
    assert_eq!(mime_for_extension(Path::new("caja.png")), "image/png");
    assert_eq!(mime_for_extension(Path::new("raro.bin")), "application/octet-stream");
    assert_eq!(mime_for_extension(Path::new("sin_extension")), "application/octet-stream");
}

#[test]
fn images_load_as_data_uris() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("producto.png");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(&[0x89, b'P', b'N', b'G']).unwrap();
    drop(file);
    let image = load_image(&path).unwrap();
    assert_eq!(image.content_type, "image/png");
    assert_eq!(image.name, "producto.png");
    assert!(image.url.starts_with("data:image/png;base64,"));
}

#[test]
fn missing_image_file_fails_with_path() {
    let result = load_image(Path::new("/nonexistent/foto.jpg"));
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("foto.jpg"));
}
