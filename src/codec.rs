//! Data-URI decoding for uploads and PNG data-URI encoding for export.

use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{ImageFormat, RgbaImage};

use crate::error::EditorError;
use crate::pixels::PixelBuffer;

const IMAGE_PREFIX: &str = "data:image/";
const BASE64_MARKER: &str = ";base64,";
const PNG_PREFIX: &str = "data:image/png;base64,";

/// Decode a `data:image/...;base64,...` URI into RGBA pixels.
///
/// PNG, JPEG, GIF, WebP and BMP payloads are accepted; the format is sniffed
/// from the bytes, so the prefix only has to claim an image type.
pub fn decode_data_uri(uri: &str) -> Result<PixelBuffer, EditorError> {
    let rest = uri
        .strip_prefix(IMAGE_PREFIX)
        .ok_or_else(|| EditorError::InvalidImage("not an image data URI".into()))?;
    let (_, payload) = rest
        .split_once(BASE64_MARKER)
        .ok_or_else(|| EditorError::InvalidImage("data URI is not base64".into()))?;

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| EditorError::InvalidImage(format!("base64: {e}")))?;
    decode_bytes(&bytes)
}

/// Decode encoded image bytes (PNG, ...) into RGBA pixels.
pub fn decode_bytes(bytes: &[u8]) -> Result<PixelBuffer, EditorError> {
    let rgba = image::load_from_memory(bytes)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    PixelBuffer::from_raw(width as usize, height as usize, rgba.into_raw())
}

/// Encode pixels as PNG bytes.
pub fn encode_png(pixels: &PixelBuffer) -> Result<Vec<u8>, EditorError> {
    let image = RgbaImage::from_raw(pixels.width() as u32, pixels.height() as u32, pixels.to_raw())
        .ok_or_else(|| EditorError::Encode("pixel data does not match dimensions".into()))?;

    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| EditorError::Encode(e.to_string()))?;
    Ok(bytes)
}

/// Encode pixels as a `data:image/png;base64,` URI.
pub fn encode_png_data_uri(pixels: &PixelBuffer) -> Result<String, EditorError> {
    let bytes = encode_png(pixels)?;
    Ok(format!("{PNG_PREFIX}{}", STANDARD.encode(bytes)))
}
