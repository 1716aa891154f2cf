//! Live adapter for the `OpenAI` image-edit API.

use std::io::Write;
use std::path::PathBuf;

use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use super::openai::{truncate, OpenAiClient};
use crate::error::ServiceError;
use crate::ports::image_editor::{EditFuture, EditPayload, EditRequest, ImageEditor};

const EDIT_FAILED: &str = "OpenAI image edit failed";

/// Live image editor that calls `POST /images/edits`.
pub struct OpenAiImageEditor {
    client: OpenAiClient,
    staging_dir: PathBuf,
}

impl OpenAiImageEditor {
    /// Create a new image editor that stages uploads in the system temp directory.
    #[must_use]
    pub fn new(client: OpenAiClient) -> Self {
        Self { client, staging_dir: std::env::temp_dir() }
    }

    /// Stage uploads in `dir` instead.
    #[must_use]
    pub fn with_staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = dir.into();
        self
    }
}

impl ImageEditor for OpenAiImageEditor {
    fn edit(&self, request: &EditRequest) -> EditFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let api_key = self.client.api_key()?;

            // The upload is staged on disk for the lifetime of this call only;
            // the file is removed when `staged` drops, on every exit path.
            let file_name = upload_file_name(&request.mime_type);
            let mut staged = tempfile::Builder::new()
                .prefix("personfi-upload-")
                .suffix(&format!(".{}", extension_of(&file_name)))
                .tempfile_in(&self.staging_dir)?;
            staged.write_all(&request.image)?;
            staged.flush()?;
            let image_bytes = tokio::fs::read(staged.path()).await?;

            let part = Part::bytes(image_bytes)
                .file_name(file_name)
                .mime_str(&request.mime_type)
                .map_err(|e| {
                    ServiceError::Internal(format!("invalid mime '{}': {e}", request.mime_type))
                })?;

            let form = Form::new()
                .text("model", request.model.clone())
                .text("prompt", request.prompt.clone())
                .text("size", request.size.clone())
                .part(request.shape.field_name(), part);

            tracing::debug!(
                model = %request.model,
                shape = request.shape.field_name(),
                bytes = request.image.len(),
                "submitting image edit"
            );

            let response = self
                .client
                .http()
                .post(self.client.endpoint("/images/edits"))
                .bearer_auth(api_key)
                .multipart(form)
                .send()
                .await
                .map_err(|e| ServiceError::provider(EDIT_FAILED, e.to_string()))?;

            let status = response.status();
            let response_text = response
                .text()
                .await
                .map_err(|e| ServiceError::provider(EDIT_FAILED, e.to_string()))?;

            drop(staged);

            if !status.is_success() {
                return Err(ServiceError::provider(
                    EDIT_FAILED,
                    format!("{}: {}", status.as_u16(), truncate(&response_text)),
                ));
            }

            let parsed: EditResponse = serde_json::from_str(&response_text)
                .map_err(|e| ServiceError::malformed("image edit", e.to_string()))?;

            Ok(parsed.data.into_iter().next().unwrap_or_default())
        })
    }
}

/// File name sent with the multipart image part, derived from its MIME type.
fn upload_file_name(mime: &str) -> String {
    let ext = image::ImageFormat::from_mime_type(mime)
        .and_then(|f| f.extensions_str().first().copied())
        .unwrap_or("png");
    format!("upload.{ext}")
}

fn extension_of(file_name: &str) -> &str {
    file_name.rsplit('.').next().unwrap_or("png")
}

// --- OpenAI API response types ---

#[derive(Deserialize)]
struct EditResponse {
    #[serde(default)]
    data: Vec<EditPayload>,
}
