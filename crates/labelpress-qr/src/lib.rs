// crates/labelpress-qr/src/lib.rs
// ============================================================================
// Module: Labelpress QR Rendering
// Description: QR image rendering adapter for label payloads.
// Purpose: Turn payload strings into PNG bytes behind a small typed surface.
// Dependencies: qrcode, image, serde, thiserror
// ============================================================================

//! ## Overview
//! This crate wraps the external QR encoding library behind a small typed
//! surface. Payload strings go in, PNG bytes come out. Rendering options
//! mirror the label tool's historical defaults: 256 pixel target width, a
//! quiet-zone margin, and high error correction.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Cursor;

use image::ImageFormat;
use image::Luma;
use qrcode::EcLevel;
use qrcode::QrCode;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Options
// ============================================================================

/// Default rendered image width in pixels.
const DEFAULT_WIDTH: u32 = 256;
/// Default quiet-zone margin in modules.
const DEFAULT_MARGIN: u32 = 1;

/// QR error correction level.
///
/// # Invariants
/// - Values map 1:1 to the encoder's error correction levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCorrection {
    /// Low (~7% recovery).
    L,
    /// Medium (~15% recovery).
    M,
    /// Quartile (~25% recovery).
    Q,
    /// High (~30% recovery), the label default.
    #[default]
    H,
}

impl ErrorCorrection {
    /// Returns the encoder-level error correction value.
    const fn ec_level(self) -> EcLevel {
        match self {
            Self::L => EcLevel::L,
            Self::M => EcLevel::M,
            Self::Q => EcLevel::Q,
            Self::H => EcLevel::H,
        }
    }
}

/// Rendering options for QR label images.
///
/// # Invariants
/// - `width` is a target upper bound; the rendered image snaps to a whole
///   number of pixels per module.
/// - A zero `margin` disables the quiet zone; any positive value keeps the
///   renderer's standard quiet zone width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct QrOptions {
    /// Target image width (and height) in pixels.
    #[serde(default = "default_width")]
    pub width: u32,
    /// Quiet-zone margin in modules.
    #[serde(default = "default_margin")]
    pub margin: u32,
    /// Error correction level.
    #[serde(default)]
    pub error_correction: ErrorCorrection,
}

impl Default for QrOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            margin: DEFAULT_MARGIN,
            error_correction: ErrorCorrection::default(),
        }
    }
}

/// Returns the default rendered image width.
const fn default_width() -> u32 {
    DEFAULT_WIDTH
}

/// Returns the default quiet-zone margin.
const fn default_margin() -> u32 {
    DEFAULT_MARGIN
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// QR image generation errors.
#[derive(Debug, Error)]
pub enum EncodingError {
    /// The payload could not be encoded as a QR symbol.
    #[error("qr encoding failed: {0}")]
    Encode(String),
    /// The rendered symbol could not be serialized as PNG.
    #[error("png encoding failed: {0}")]
    Image(String),
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Renders a payload string into PNG bytes.
///
/// # Errors
///
/// Returns [`EncodingError`] when the payload exceeds QR capacity for the
/// configured error correction level or the PNG encoder fails.
pub fn render_png(payload: &str, options: &QrOptions) -> Result<Vec<u8>, EncodingError> {
    let code = QrCode::with_error_correction_level(payload, options.error_correction.ec_level())
        .map_err(|err| EncodingError::Encode(err.to_string()))?;
    let rendered = code
        .render::<Luma<u8>>()
        .max_dimensions(options.width, options.width)
        .quiet_zone(options.margin > 0)
        .build();
    let mut bytes = Vec::new();
    image::DynamicImage::ImageLuma8(rendered)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|err| EncodingError::Image(err.to_string()))?;
    Ok(bytes)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
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

    use super::EncodingError;
    use super::QrOptions;
    use super::render_png;

    #[test]
    fn render_produces_png_bytes() {
        let payload = "BULK:V1:ABC123:02:SN1:SN2:[07-08-2026, 14-30-45]";
        let bytes = render_png(payload, &QrOptions::default()).unwrap();
        assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G']));
    }

    #[test]
    fn render_is_deterministic() {
        let payload = "RMA:V1:R100:Pallet:Original:Bueno:2 Bultos:[07-08-2026, 14-30-45]";
        let first = render_png(payload, &QrOptions::default()).unwrap();
        let second = render_png(payload, &QrOptions::default()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn oversized_payload_is_rejected() {
        let payload = "X".repeat(8_000);
        let result = render_png(&payload, &QrOptions::default());
        assert!(matches!(result, Err(EncodingError::Encode(_))));
    }
}
