//! Vision client port for multimodal text-generation APIs.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::error::ServiceError;
use crate::model::VisionApi;

/// A single prompt-plus-image request to a vision model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionRequest {
    /// The model identifier (e.g., `"gpt-5.0"`).
    pub model: String,
    /// Which request/response envelope to use.
    pub api: VisionApi,
    /// The instruction text.
    pub prompt: String,
    /// The image inlined as a `data:` URL. Not written to cassettes.
    #[serde(skip)]
    pub image_data_url: String,
}

/// Boxed future type returned by [`VisionClient::complete`].
pub type CompleteFuture<'a> =
    Pin<Box<dyn Future<Output = Result<String, ServiceError>> + Send + 'a>>;

/// Sends a prompt and an image to a vision model and returns the model's text.
pub trait VisionClient: Send + Sync {
    /// Run the request and return the textual payload of the reply.
    fn complete(&self, request: &VisionRequest) -> CompleteFuture<'_>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_url_is_not_serialized() {
        let request = VisionRequest {
            model: "gpt-5.0".into(),
            api: VisionApi::Responses,
            prompt: "list the clothes".into(),
            image_data_url: "data:image/png;base64,AAAA".into(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["api"], "responses");
        assert!(json.get("image_data_url").is_none());
    }
}
