//! Image editor port for instruction-driven image editing APIs.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::error::ServiceError;
use crate::model::EditShape;

/// A request to edit one source image according to an instruction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditRequest {
    /// The model identifier (e.g., `"gpt-image-1"`).
    pub model: String,
    /// The edit instruction.
    pub prompt: String,
    /// Output size (e.g., `"1024x1024"`).
    pub size: String,
    /// Multipart shape used to submit the image.
    pub shape: EditShape,
    /// MIME type of the source image.
    pub mime_type: String,
    /// Source image bytes. Not written to cassettes.
    #[serde(skip)]
    pub image: Vec<u8>,
}

/// The first result entry returned by the edit endpoint.
///
/// Providers return either an inline base64 image or a URL to fetch; both
/// fields are `None` when the provider returned no entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditPayload {
    /// Inline base64-encoded image.
    #[serde(default)]
    pub b64_json: Option<String>,
    /// URL of the generated image.
    #[serde(default)]
    pub url: Option<String>,
}

/// Boxed future type returned by [`ImageEditor::edit`].
pub type EditFuture<'a> =
    Pin<Box<dyn Future<Output = Result<EditPayload, ServiceError>> + Send + 'a>>;

/// Edits images via an external API.
pub trait ImageEditor: Send + Sync {
    /// Submit the edit and return the provider's first result entry.
    fn edit(&self, request: &EditRequest) -> EditFuture<'_>;
}
