//! PNG normalization of generated images.

use std::io::Cursor;

use image::ImageFormat;

/// PNG file signature.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Re-encode image bytes as an RGBA PNG.
///
/// # Errors
///
/// Returns an error if the bytes cannot be decoded or re-encoded.
pub fn encode_png(data: &[u8]) -> Result<Vec<u8>, image::ImageError> {
    let img = image::load_from_memory(data)?;
    let rgba = image::DynamicImage::ImageRgba8(img.to_rgba8());
    let mut out = Cursor::new(Vec::with_capacity(data.len()));
    rgba.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

/// Re-encode as PNG, passing the original bytes through if they do not decode.
#[must_use]
pub fn normalize_png(data: Vec<u8>) -> Vec<u8> {
    match encode_png(&data) {
        Ok(png) => png,
        Err(e) => {
            tracing::warn!(
                error = %e,
                bytes = data.len(),
                "returning provider image without re-encoding"
            );
            data
        }
    }
}
