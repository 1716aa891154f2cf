//! Validation of provider parameters taken from configuration.

/// Output sizes accepted by the `OpenAI` image-edit endpoint.
const VALID_SIZES: &[&str] = &["256x256", "512x512", "1024x1024", "1536x1024", "1024x1536", "auto"];

/// Validate an image-edit output size.
///
/// # Errors
///
/// Returns an error if the size is not one the edit endpoint accepts.
pub fn validate_size(size: &str) -> Result<(), String> {
    if VALID_SIZES.contains(&size) {
        Ok(())
    } else {
        Err(format!("Unsupported image size '{size}'. Valid: {}", VALID_SIZES.join(", ")))
    }
}

/// Build a `data:` URL inlining the image for the vision endpoint.
#[must_use]
pub fn data_url(mime: &str, base64_data: &str) -> String {
    format!("data:{mime};base64,{base64_data}")
}
