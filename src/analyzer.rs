//! Clothing item analysis: prompt, vision call, and response coercion.

use std::sync::Arc;

use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ServiceError;
use crate::model::select_vision_api;
use crate::params::data_url;
use crate::ports::vision_client::{VisionClient, VisionRequest};
use crate::validation::{validate_image, ImagePayload};

/// Instruction sent with every analysis request.
pub const VISION_PROMPT: &str = r#"You are a precise fashion vision assistant.

TASK:
Analyze the photo of a person and identify ALL distinct wearable clothing items visible
(e.g., t-shirt, shirt, jacket, blazer, pants, jeans, dress, skirt, tie, coat, shoes, hat).

For each detected clothing item, output exactly these three fields:
- "item_category": concise lower-case noun (e.g., "t-shirt", "blazer", "jeans", "tie").
- "item_color": short phrase of the visible color and pattern.
  • If any pattern exists (stripes, plaid, polka dots, prints, logos, text, lace, etc.),
    include base color + pattern (e.g., "white with blue stripes", "black with white checks").
  • If there is a visible logo/text/print, include it in the color phrase (e.g., "red with white logo").
  • Keep it lowercase and concise.
- "item_brand": brand name only if clearly visible; otherwise "".

STYLE:
- Do NOT invent brands or hallucinate colors.
- Keep all text lowercase.
- Return JSON ONLY. No explanations, no markdown.

OUTPUT FORMAT (return strictly this):
{
  "items": [
    { "item_category": "string", "item_color": "string", "item_brand": "string" }
  ]
}"#;

/// One wearable item detected in a photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClothingItem {
    /// Lower-case category noun, e.g. `"t-shirt"`.
    pub item_category: String,
    /// Lower-case colour and pattern phrase.
    pub item_color: String,
    /// Visible brand, or `""`.
    pub item_brand: String,
}

/// Items in the order the provider listed them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Detected items; may be empty.
    pub items: Vec<ClothingItem>,
}

/// Lists the clothing visible in a photo via a vision model.
pub struct ItemAnalyzer {
    vision: Arc<dyn VisionClient>,
    model: String,
    force_responses: bool,
}

impl ItemAnalyzer {
    /// Create an analyzer using `model`; `force_responses` pins the Responses API.
    pub fn new(
        vision: Arc<dyn VisionClient>,
        model: impl Into<String>,
        force_responses: bool,
    ) -> Self {
        Self { vision, model: model.into(), force_responses }
    }

    /// Validate the upload, ask the vision model for items, and normalize them.
    ///
    /// # Errors
    ///
    /// Validation errors are returned before any provider call. Provider
    /// failures surface as [`ServiceError::Provider`]; unusable replies as
    /// [`ServiceError::MalformedResponse`].
    pub async fn analyze(&self, image: &ImagePayload) -> Result<AnalysisResult, ServiceError> {
        validate_image(image).await?;

        let api = select_vision_api(&self.model, self.force_responses);
        let encoded = base64::engine::general_purpose::STANDARD.encode(&image.bytes);
        let request = VisionRequest {
            model: self.model.clone(),
            api,
            prompt: VISION_PROMPT.to_string(),
            image_data_url: data_url(&image.mime, &encoded),
        };

        tracing::debug!(
            model = %self.model,
            ?api,
            bytes = image.bytes.len(),
            "requesting item analysis"
        );
        let text = self.vision.complete(&request).await.inspect_err(|e| {
            tracing::warn!(error = %e, "vision request failed");
        })?;

        let result = parse_analysis(&text)?;
        tracing::debug!(items = result.items.len(), "item analysis complete");
        Ok(result)
    }
}

/// Parse the model's text reply into an [`AnalysisResult`].
///
/// # Errors
///
/// Returns [`ServiceError::MalformedResponse`] if the text is not a JSON
/// object.
pub fn parse_analysis(text: &str) -> Result<AnalysisResult, ServiceError> {
    let payload: Value = serde_json::from_str(text)
        .map_err(|e| ServiceError::malformed("vision model", e.to_string()))?;
    Ok(AnalysisResult { items: coerce_items(&payload)? })
}

/// Coerce a parsed payload into clean items.
///
/// An `items` value that is missing or not an array yields no items.
/// Non-object entries are dropped; missing fields become `""`. Category and
/// colour are trimmed and lower-cased; brand is trimmed only.
///
/// # Errors
///
/// Returns [`ServiceError::MalformedResponse`] if `payload` is not an object.
pub fn coerce_items(payload: &Value) -> Result<Vec<ClothingItem>, ServiceError> {
    let Some(object) = payload.as_object() else {
        return Err(ServiceError::malformed("vision model", "expected a JSON object"));
    };

    let entries: &[Value] = match object.get("items") {
        Some(Value::Array(entries)) => entries,
        None | Some(Value::Null) => &[],
        Some(other) => {
            tracing::warn!(items = %other, "\"items\" is not an array; returning no items");
            &[]
        }
    };

    Ok(entries
        .iter()
        .filter_map(Value::as_object)
        .map(|entry| ClothingItem {
            item_category: field_text(entry.get("item_category")).to_lowercase(),
            item_color: field_text(entry.get("item_color")).to_lowercase(),
            item_brand: field_text(entry.get("item_brand")),
        })
        .collect())
}

/// Trimmed text of a field; absent or null is `""`, other scalars use their JSON text.
fn field_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => other.to_string().trim().to_string(),
    }
}
