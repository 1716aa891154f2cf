//! Model defaults and request-shape selection.

use serde::{Deserialize, Serialize};

/// Vision model used when none is configured.
pub const DEFAULT_VISION_MODEL: &str = "gpt-5.0";

/// Image-edit model used when none is configured.
pub const DEFAULT_IMAGE_MODEL: &str = "gpt-image-1";

/// Output size used when none is configured.
pub const DEFAULT_IMAGE_SIZE: &str = "1024x1024";

/// The two envelope shapes accepted by the vision endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisionApi {
    /// `POST /responses` with `input_text` / `input_image` parts.
    Responses,
    /// `POST /chat/completions` with `text` / `image_url` parts.
    ChatCompletions,
}

/// The two multipart shapes accepted by the image-edit endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditShape {
    /// A single `image` part.
    #[default]
    Single,
    /// Legacy `image[]` array part.
    Array,
}

impl EditShape {
    /// Multipart field name carrying the source image.
    #[must_use]
    pub fn field_name(self) -> &'static str {
        match self {
            Self::Single => "image",
            Self::Array => "image[]",
        }
    }

    /// Parse a configured shape name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not `single` or `array`.
    pub fn parse(name: &str) -> Result<Self, String> {
        match name.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(Self::Single),
            "array" | "legacy" => Ok(Self::Array),
            other => Err(format!("Unknown image edit shape '{other}'. Valid: single, array")),
        }
    }
}

/// Pick the vision envelope for a model.
///
/// The GPT-5 family only speaks the Responses API; other models use Chat
/// Completions unless `force_responses` is set.
#[must_use]
pub fn select_vision_api(model: &str, force_responses: bool) -> VisionApi {
    if model.starts_with("gpt-5") || force_responses {
        VisionApi::Responses
    } else {
        VisionApi::ChatCompletions
    }
}

/// Interpret a boolean-ish flag value such as `USE_RESPONSES`.
#[must_use]
pub fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gpt5_uses_responses() {
        assert_eq!(select_vision_api("gpt-5.0", false), VisionApi::Responses);
        assert_eq!(select_vision_api("gpt-5-mini", false), VisionApi::Responses);
    }

    #[test]
    fn older_models_use_chat_completions() {
        assert_eq!(select_vision_api("gpt-4o", false), VisionApi::ChatCompletions);
        assert_eq!(select_vision_api("gpt-4.1-mini", false), VisionApi::ChatCompletions);
    }

    #[test]
    fn force_flag_overrides() {
        assert_eq!(select_vision_api("gpt-4o", true), VisionApi::Responses);
    }

    #[test]
    fn flag_parsing() {
        assert!(parse_flag("true"));
        assert!(parse_flag("TRUE"));
        assert!(parse_flag("1"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn edit_shape_parsing() {
        assert_eq!(EditShape::parse("single").unwrap(), EditShape::Single);
        assert_eq!(EditShape::parse("Array").unwrap(), EditShape::Array);
        assert!(EditShape::parse("many").is_err());
    }

    #[test]
    fn edit_shape_field_names() {
        assert_eq!(EditShape::Single.field_name(), "image");
        assert_eq!(EditShape::Array.field_name(), "image[]");
    }
}
