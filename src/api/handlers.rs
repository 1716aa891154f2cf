//! Route handlers.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

use super::AppState;
use crate::analyzer::AnalysisResult;
use crate::error::ServiceError;
use crate::validation::ImagePayload;

/// Multipart field carrying the uploaded photo.
pub const UPLOAD_FIELD: &str = "file";

/// Body of `GET /hello`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HelloResponse {
    /// Greeting.
    pub message: String,
    /// Whether Supabase credentials are present.
    pub supabase_configured: bool,
    /// Setup hint when Supabase is not configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

/// GET /hello - liveness plus Supabase configuration status.
pub async fn hello(State(state): State<AppState>) -> Json<HelloResponse> {
    let response = if state.supabase_configured {
        HelloResponse {
            message: "Hello from personfi with Supabase configured.".into(),
            supabase_configured: true,
            hint: None,
        }
    } else {
        HelloResponse {
            message: "Hello from personfi. Supabase is not configured yet.".into(),
            supabase_configured: false,
            hint: Some(
                "Set SUPABASE_URL and SUPABASE_ANON_KEY in your environment or .env file.".into(),
            ),
        }
    };
    Json(response)
}

/// POST /analyze - list the clothing items in an uploaded photo.
pub async fn analyze(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalysisResult>, ServiceError> {
    let upload = read_upload(multipart).await?;
    let result = state.analyzer.analyze(&upload).await?;
    Ok(Json(result))
}

/// GET /generate-clothing/ready
pub async fn generate_ready() -> Json<Value> {
    Json(json!({ "ok": true }))
}

/// POST /generate-clothing - return a PNG of the garments without the person.
pub async fn generate_clothing(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ServiceError> {
    let upload = read_upload(multipart).await?;
    if upload.is_empty() {
        return Err(ServiceError::InvalidInput("Image file is empty".into()));
    }
    let image = state.extractor.extract(&upload).await?;
    Ok(([(header::CONTENT_TYPE, "image/png")], image.data).into_response())
}

/// Pull the `file` field out of a multipart body.
///
/// A body over the configured limit is rejected with 413; any other
/// malformed body with 400.
async fn read_upload(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<ImagePayload, ServiceError> {
    let mut multipart =
        multipart.map_err(|e| upload_error(e.status(), format!("Expected multipart form: {e}")))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| upload_error(e.status(), format!("Failed to read multipart field: {e}")))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| upload_error(e.status(), format!("Failed to read upload: {e}")))?;
        return Ok(ImagePayload::new(bytes, content_type.as_deref()));
    }

    Err(ServiceError::InvalidInput(format!("Missing multipart field '{UPLOAD_FIELD}'")))
}

fn upload_error(status: StatusCode, message: String) -> ServiceError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        ServiceError::PayloadTooLarge(message)
    } else {
        ServiceError::InvalidInput(message)
    }
}
