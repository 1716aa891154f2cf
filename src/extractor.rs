//! Clothing-only image generation via the image-edit endpoint.

use std::sync::Arc;

use base64::Engine;

use crate::error::ServiceError;
use crate::model::EditShape;
use crate::output::normalize_png;
use crate::ports::image_editor::{EditRequest, ImageEditor};
use crate::ports::image_fetcher::ImageFetcher;
use crate::validation::{validate_image, ImagePayload};

/// Instruction sent with every extraction request.
pub const EXTRACTION_INSTRUCTION: &str = "Extract only the wearable clothing and accessories \
from the person photo. Remove the person and any body parts completely. Arrange the garments \
and accessories neatly as a styled product laydown on a plain white background. Keep colors \
and textures accurate and realistic. No logos unless clearly visible in the source, no text, \
and no extra objects.";

/// A PNG-encoded result image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    /// PNG bytes, or the provider's bytes unchanged if they did not decode.
    pub data: Vec<u8>,
}

/// Settings for [`GarmentExtractor`].
#[derive(Debug, Clone)]
pub struct ExtractorOptions {
    /// Image-edit model identifier.
    pub model: String,
    /// Output size, e.g. `"1024x1024"`.
    pub size: String,
    /// Multipart request shape.
    pub shape: EditShape,
}

/// Turns a photo of a person into a flat-lay of their garments.
pub struct GarmentExtractor {
    editor: Arc<dyn ImageEditor>,
    fetcher: Arc<dyn ImageFetcher>,
    options: ExtractorOptions,
}

impl GarmentExtractor {
    /// Create an extractor over the given ports.
    pub fn new(
        editor: Arc<dyn ImageEditor>,
        fetcher: Arc<dyn ImageFetcher>,
        options: ExtractorOptions,
    ) -> Self {
        Self { editor, fetcher, options }
    }

    /// Validate the upload, request the edit, retrieve the result and
    /// re-encode it as PNG.
    ///
    /// # Errors
    ///
    /// Validation errors are returned before any provider call. Edit or
    /// download failures surface as [`ServiceError::Provider`]; a reply with
    /// neither inline data nor a URL as [`ServiceError::EmptyResult`].
    pub async fn extract(&self, image: &ImagePayload) -> Result<GeneratedImage, ServiceError> {
        validate_image(image).await?;

        let request = EditRequest {
            model: self.options.model.clone(),
            prompt: EXTRACTION_INSTRUCTION.to_string(),
            size: self.options.size.clone(),
            shape: self.options.shape,
            mime_type: image.mime.clone(),
            image: image.bytes.to_vec(),
        };

        let payload = self.editor.edit(&request).await.inspect_err(|e| {
            tracing::warn!(error = %e, "image edit failed");
        })?;

        let raw = if let Some(b64) = payload.b64_json.as_deref().filter(|s| !s.is_empty()) {
            base64::engine::general_purpose::STANDARD.decode(b64).map_err(|e| {
                ServiceError::malformed("image edit", format!("invalid base64: {e}"))
            })?
        } else if let Some(url) = payload.url.as_deref().filter(|s| !s.is_empty()) {
            tracing::debug!(%url, "fetching generated image");
            self.fetcher.fetch(url).await?.data
        } else {
            return Err(ServiceError::EmptyResult(
                "Image generation contained no data payload".into(),
            ));
        };

        let data = tokio::task::spawn_blocking(move || normalize_png(raw))
            .await
            .map_err(|e| ServiceError::Internal(format!("PNG encoding task failed: {e}")))?;

        Ok(GeneratedImage { data })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;
    use crate::output::PNG_SIGNATURE;
    use crate::ports::image_editor::{EditFuture, EditPayload};
    use crate::ports::image_fetcher::{FetchFuture, FetchedImage};
    use crate::validation::test_images::solid;

    struct StubEditor {
        payload: EditPayload,
        calls: AtomicUsize,
        last: Mutex<Option<EditRequest>>,
    }

    impl ImageEditor for StubEditor {
        fn edit(&self, request: &EditRequest) -> EditFuture<'_> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some(request.clone());
            let payload = self.payload.clone();
            Box::pin(async move { Ok(payload) })
        }
    }

    struct StubFetcher {
        data: Result<Vec<u8>, String>,
        urls: Mutex<Vec<String>>,
    }

    impl ImageFetcher for StubFetcher {
        fn fetch(&self, url: &str) -> FetchFuture<'_> {
            self.urls.lock().unwrap().push(url.to_string());
            let result = self
                .data
                .clone()
                .map(|data| FetchedImage { data })
                .map_err(|m| ServiceError::provider("Failed to fetch generated image url", m));
            Box::pin(async move { result })
        }
    }

    fn extractor(
        payload: EditPayload,
        fetched: Result<Vec<u8>, String>,
    ) -> (GarmentExtractor, Arc<StubEditor>, Arc<StubFetcher>) {
        let editor = Arc::new(StubEditor {
            payload,
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        });
        let fetcher = Arc::new(StubFetcher { data: fetched, urls: Mutex::new(Vec::new()) });
        let options = ExtractorOptions {
            model: "gpt-image-1".into(),
            size: "1024x1024".into(),
            shape: EditShape::Single,
        };
        let extractor = GarmentExtractor::new(editor.clone(), fetcher.clone(), options);
        (extractor, editor, fetcher)
    }

    fn photo() -> ImagePayload {
        ImagePayload::new(solid(10, 10, image::ImageFormat::Jpeg), Some("image/jpeg"))
    }

    fn b64(data: &[u8]) -> String {
        base64::engine::general_purpose::STANDARD.encode(data)
    }

    #[tokio::test]
    async fn inline_base64_result() {
        let payload = EditPayload {
            b64_json: Some(b64(&solid(1, 1, image::ImageFormat::Png))),
            url: None,
        };
        let (extractor, editor, fetcher) = extractor(payload, Err("unused".into()));

        let image = extractor.extract(&photo()).await.unwrap();
        assert_eq!(&image.data[..8], &PNG_SIGNATURE);
        assert!(fetcher.urls.lock().unwrap().is_empty());

        let sent = editor.last.lock().unwrap().clone().unwrap();
        assert_eq!(sent.prompt, EXTRACTION_INSTRUCTION);
        assert_eq!(sent.size, "1024x1024");
        assert_eq!(sent.mime_type, "image/jpeg");
        assert!(!sent.image.is_empty());
    }

    #[tokio::test]
    async fn url_result_is_fetched_and_reencoded() {
        let payload =
            EditPayload { b64_json: None, url: Some("https://cdn.example/out.jpg".into()) };
        let (extractor, _, fetcher) = extractor(payload, Ok(solid(3, 2, image::ImageFormat::Jpeg)));

        let image = extractor.extract(&photo()).await.unwrap();
        assert_eq!(&image.data[..8], &PNG_SIGNATURE);
        assert_eq!(*fetcher.urls.lock().unwrap(), ["https://cdn.example/out.jpg"]);
    }

    #[tokio::test]
    async fn inline_data_wins_over_url() {
        let payload = EditPayload {
            b64_json: Some(b64(&solid(1, 1, image::ImageFormat::Png))),
            url: Some("https://cdn.example/out.png".into()),
        };
        let (extractor, _, fetcher) = extractor(payload, Err("unused".into()));
        extractor.extract(&photo()).await.unwrap();
        assert!(fetcher.urls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn neither_payload_is_empty_result() {
        let (extractor, _, _) = extractor(EditPayload::default(), Err("unused".into()));
        let err = extractor.extract(&photo()).await.unwrap_err();
        assert_eq!(err.kind(), "empty_provider_result");
    }

    #[tokio::test]
    async fn fetch_failure_is_provider_error() {
        let payload = EditPayload { b64_json: None, url: Some("https://cdn.example/gone".into()) };
        let (extractor, _, _) = extractor(payload, Err("404 Not Found".into()));
        let err = extractor.extract(&photo()).await.unwrap_err();
        assert_eq!(err.kind(), "provider_error");
        assert!(err.to_string().starts_with("Failed to fetch generated image url"));
    }

    #[tokio::test]
    async fn bad_base64_is_malformed() {
        let payload = EditPayload { b64_json: Some("***".into()), url: None };
        let (extractor, _, _) = extractor(payload, Err("unused".into()));
        let err = extractor.extract(&photo()).await.unwrap_err();
        assert_eq!(err.kind(), "malformed_provider_response");
    }

    #[tokio::test]
    async fn undecodable_result_passes_through() {
        let payload = EditPayload { b64_json: Some(b64(b"opaque bytes")), url: None };
        let (extractor, _, _) = extractor(payload, Err("unused".into()));
        let image = extractor.extract(&photo()).await.unwrap();
        assert_eq!(image.data, b"opaque bytes");
    }

    #[tokio::test]
    async fn invalid_upload_skips_provider() {
        let (extractor, editor, _) = extractor(EditPayload::default(), Err("unused".into()));

        let empty = ImagePayload::new(Vec::new(), None);
        assert_eq!(extractor.extract(&empty).await.unwrap_err().kind(), "invalid_input");

        let junk = ImagePayload::new(vec![0u8; 64], Some("image/png"));
        assert_eq!(extractor.extract(&junk).await.unwrap_err().kind(), "unsupported_format");

        assert_eq!(editor.calls.load(Ordering::SeqCst), 0);
    }
}
