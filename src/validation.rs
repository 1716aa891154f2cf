//! Upload ingestion and the decode-before-call validation gate.

use axum::body::Bytes;
use image::{ImageError, ImageFormat};

use crate::error::ServiceError;

/// JPEG end-of-image marker.
const JPEG_EOI: [u8; 2] = [0xFF, 0xD9];

/// An uploaded image and the MIME type it will be described with upstream.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    /// Raw upload bytes.
    pub bytes: Bytes,
    /// MIME type: the declared one when it is an `image/*` type, otherwise
    /// sniffed from the bytes.
    pub mime: String,
}

impl ImagePayload {
    /// Wrap upload bytes together with the client-declared content type.
    pub fn new(bytes: impl Into<Bytes>, declared_mime: Option<&str>) -> Self {
        let bytes = bytes.into();
        let mime = declared_mime
            .map(str::trim)
            .filter(|m| m.starts_with("image/"))
            .map(str::to_string)
            .or_else(|| sniff_mime(&bytes).map(str::to_string))
            .unwrap_or_else(|| "application/octet-stream".to_string());
        Self { bytes, mime }
    }

    /// Whether the upload carried no bytes at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    image::guess_format(bytes).ok().map(|f| f.to_mime_type())
}

/// Confirm that `bytes` decode as a raster image and convert to RGB.
///
/// # Errors
///
/// - [`ServiceError::InvalidInput`] for empty input.
/// - [`ServiceError::UnsupportedFormat`] for unrecognised, corrupt or
///   truncated data.
/// - [`ServiceError::Internal`] for any other decoder failure.
pub fn check_image(bytes: &[u8]) -> Result<(), ServiceError> {
    if bytes.is_empty() {
        return Err(ServiceError::InvalidInput("Image file is empty".into()));
    }

    // The JPEG decoder pads missing scan data instead of failing.
    if image::guess_format(bytes).ok() == Some(ImageFormat::Jpeg) && !jpeg_is_complete(bytes) {
        return Err(ServiceError::UnsupportedFormat);
    }

    match image::load_from_memory(bytes) {
        Ok(img) => {
            let _rgb = img.to_rgb8();
            Ok(())
        }
        Err(ImageError::Unsupported(_) | ImageError::Decoding(_)) => {
            Err(ServiceError::UnsupportedFormat)
        }
        Err(ImageError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            Err(ServiceError::UnsupportedFormat)
        }
        Err(e) => Err(ServiceError::Internal(format!("image decode failed: {e}"))),
    }
}

/// Whether a JPEG stream ends with its EOI marker, ignoring trailing padding.
fn jpeg_is_complete(bytes: &[u8]) -> bool {
    let end = bytes.iter().rposition(|&b| !matches!(b, 0x00 | b'\r' | b'\n' | b' '));
    end.is_some_and(|i| bytes[..=i].ends_with(&JPEG_EOI))
}

/// Run [`check_image`] on the blocking pool.
///
/// # Errors
///
/// Same as [`check_image`], plus [`ServiceError::Internal`] if the worker
/// panicked.
pub async fn validate_image(payload: &ImagePayload) -> Result<(), ServiceError> {
    if payload.is_empty() {
        return Err(ServiceError::InvalidInput("Image file is empty".into()));
    }
    let bytes = payload.bytes.clone();
    tokio::task::spawn_blocking(move || check_image(&bytes))
        .await
        .map_err(|e| ServiceError::Internal(format!("image validation task failed: {e}")))?
}
