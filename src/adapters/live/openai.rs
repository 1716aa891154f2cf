//! Live adapter for the `OpenAI` vision APIs (Responses and Chat Completions).

use reqwest::Client;
use serde_json::{json, Value};

use crate::error::ServiceError;
use crate::model::VisionApi;
use crate::ports::vision_client::{CompleteFuture, VisionClient, VisionRequest};

const VISION_FAILED: &str = "OpenAI vision request failed";

/// Shared connection details for `OpenAI` endpoints.
///
/// The `reqwest::Client` is built once at startup and cloned into every
/// adapter; the API key is only checked when a request is about to be sent.
#[derive(Clone)]
pub struct OpenAiClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenAiClient {
    /// Create a client for the given base URL and (possibly missing) API key.
    #[must_use]
    pub fn new(http: Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self { http, base_url: base_url.into(), api_key }
    }

    /// The underlying HTTP client.
    #[must_use]
    pub fn http(&self) -> &Client {
        &self.http
    }

    /// Absolute URL for an API path such as `"/responses"`.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// The API key, or a configuration error if none is set.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Configuration`] when `OPENAI_API_KEY` is unset.
    pub fn api_key(&self) -> Result<&str, ServiceError> {
        self.api_key.as_deref().ok_or_else(|| {
            ServiceError::Configuration("Missing OPENAI_API_KEY in environment".into())
        })
    }
}

/// Live vision client backed by the `OpenAI` API.
pub struct OpenAiVision {
    client: OpenAiClient,
}

impl OpenAiVision {
    /// Create a new vision client.
    #[must_use]
    pub fn new(client: OpenAiClient) -> Self {
        Self { client }
    }
}

impl VisionClient for OpenAiVision {
    fn complete(&self, request: &VisionRequest) -> CompleteFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let api_key = self.client.api_key()?;

            let (path, body) = match request.api {
                VisionApi::Responses => ("/responses", responses_body(&request)),
                VisionApi::ChatCompletions => ("/chat/completions", chat_body(&request)),
            };

            let response = self
                .client
                .http()
                .post(self.client.endpoint(path))
                .bearer_auth(api_key)
                .json(&body)
                .send()
                .await
                .map_err(|e| ServiceError::provider(VISION_FAILED, e.to_string()))?;

            let status = response.status();
            let response_text = response
                .text()
                .await
                .map_err(|e| ServiceError::provider(VISION_FAILED, e.to_string()))?;

            if !status.is_success() {
                return Err(ServiceError::provider(
                    VISION_FAILED,
                    format!("{}: {}", status.as_u16(), truncate(&response_text)),
                ));
            }

            let parsed: Value = serde_json::from_str(&response_text)
                .map_err(|e| ServiceError::malformed("vision model", e.to_string()))?;

            let text = match request.api {
                VisionApi::Responses => responses_text(&parsed),
                VisionApi::ChatCompletions => chat_text(&parsed),
            };

            text.ok_or_else(|| {
                ServiceError::malformed(
                    "vision model",
                    format!("empty content. raw={}", truncate(&response_text)),
                )
            })
        })
    }
}

fn responses_body(request: &VisionRequest) -> Value {
    json!({
        "model": request.model,
        "input": [{
            "role": "user",
            "content": [
                {"type": "input_text", "text": request.prompt},
                {"type": "input_image", "image_url": request.image_data_url},
            ],
        }],
    })
}

fn chat_body(request: &VisionRequest) -> Value {
    json!({
        "model": request.model,
        "messages": [{
            "role": "user",
            "content": [
                {"type": "text", "text": request.prompt},
                {"type": "image_url", "image_url": {"url": request.image_data_url}},
            ],
        }],
    })
}

/// Text of a Responses API reply: `output_text` if present, otherwise the
/// `output_text` parts of the `message` outputs.
fn responses_text(body: &Value) -> Option<String> {
    if let Some(text) = body.get("output_text").and_then(Value::as_str) {
        if !text.is_empty() {
            return Some(text.to_string());
        }
    }

    let text: String = body
        .get("output")?
        .as_array()?
        .iter()
        .filter_map(|item| item.get("content").and_then(Value::as_array))
        .flatten()
        .filter(|part| part.get("type").and_then(Value::as_str) == Some("output_text"))
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();

    (!text.is_empty()).then_some(text)
}

/// Text of a Chat Completions reply: `choices[0].message.content`.
fn chat_text(body: &Value) -> Option<String> {
    let content = body.get("choices")?.get(0)?.get("message")?.get("content")?;
    let text = match content {
        Value::String(s) => s.clone(),
        Value::Array(parts) => {
            parts.iter().filter_map(|p| p.get("text").and_then(Value::as_str)).collect()
        }
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Trim long upstream bodies before they end up in error messages.
pub(crate) fn truncate(text: &str) -> String {
    if text.len() > 500 {
        let cut = text.char_indices().nth(500).map_or(text.len(), |(i, _)| i);
        format!("{}...", &text[..cut])
    } else {
        text.to_string()
    }
}
