//! Shared helpers for router-level tests: fixture images, multipart bodies
//! and counting stand-ins for the provider ports.

#![allow(dead_code)]

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{header, Request};
use axum::Router;

use personfi::api::{create_app, AppState};
use personfi::config::Settings;
use personfi::context::ServiceContext;
use personfi::error::ServiceError;
use personfi::model::EditShape;
use personfi::ports::image_editor::{EditFuture, EditPayload, EditRequest, ImageEditor};
use personfi::ports::image_fetcher::{FetchFuture, FetchedImage, ImageFetcher};
use personfi::ports::vision_client::{CompleteFuture, VisionClient, VisionRequest};

pub const BOUNDARY: &str = "personfi-test-boundary";

pub use personfi::output::PNG_SIGNATURE;

/// Encode an opaque `width`×`height` image in the given format.
pub fn opaque_image(width: u32, height: u32, format: image::ImageFormat) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([10, 120, 200]));
    let mut buf = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img).write_to(&mut buf, format).unwrap();
    buf.into_inner()
}

/// Encode a `width`×`height` gradient; unlike a flat colour its JPEG scan
/// data spans most of the file.
pub fn gradient_image(width: u32, height: u32, format: image::ImageFormat) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x * 4 % 256) as u8, (y * 4 % 256) as u8, ((x + y) * 2 % 256) as u8])
    });
    let mut buf = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img).write_to(&mut buf, format).unwrap();
    buf.into_inner()
}

/// A multipart body with a single field.
pub fn multipart_body(field: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"photo\"\r\n\
             Content-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// A `POST` request uploading `data` as the `file` field.
pub fn upload(uri: &str, content_type: &str, data: &[u8]) -> Request<Body> {
    upload_field(uri, "file", content_type, data)
}

/// A `POST` request uploading `data` under an arbitrary field name.
pub fn upload_field(uri: &str, field: &str, content_type: &str, data: &[u8]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(multipart_body(field, content_type, data)))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
}

pub async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Settings as they would resolve with no config file and no environment.
pub fn test_settings() -> Settings {
    Settings {
        api_key: Some("sk-test".into()),
        base_url: "http://127.0.0.1:9".into(),
        vision_model: "gpt-5.0".into(),
        force_responses: false,
        image_model: "gpt-image-1".into(),
        image_size: "1024x1024".into(),
        edit_shape: EditShape::Single,
        supabase_configured: false,
        max_upload_bytes: 20 * 1024 * 1024,
    }
}

/// Vision port that returns a fixed reply and counts calls.
pub struct MockVision {
    reply: Result<String, (String, String)>,
    pub calls: AtomicUsize,
}

impl MockVision {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self { reply: Ok(text.to_string()), calls: AtomicUsize::new(0) })
    }

    pub fn failing(context: &str, message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err((context.to_string(), message.to_string())),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl VisionClient for MockVision {
    fn complete(&self, _request: &VisionRequest) -> CompleteFuture<'_> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.reply.clone().map_err(|(c, m)| ServiceError::provider(c, m));
        Box::pin(async move { reply })
    }
}

/// Image-edit port that returns a fixed payload and records requests.
pub struct MockEditor {
    payload: EditPayload,
    pub requests: Mutex<Vec<EditRequest>>,
}

impl MockEditor {
    pub fn returning(payload: EditPayload) -> Arc<Self> {
        Arc::new(Self { payload, requests: Mutex::new(Vec::new()) })
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl ImageEditor for MockEditor {
    fn edit(&self, request: &EditRequest) -> EditFuture<'_> {
        self.requests.lock().unwrap().push(request.clone());
        let payload = self.payload.clone();
        Box::pin(async move { Ok(payload) })
    }
}

/// Fetch port serving fixed bytes for any URL.
pub struct MockFetcher {
    data: Vec<u8>,
    pub calls: AtomicUsize,
}

impl MockFetcher {
    pub fn serving(data: Vec<u8>) -> Arc<Self> {
        Arc::new(Self { data, calls: AtomicUsize::new(0) })
    }
}

impl ImageFetcher for MockFetcher {
    fn fetch(&self, _url: &str) -> FetchFuture<'_> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let data = self.data.clone();
        Box::pin(async move { Ok(FetchedImage { data }) })
    }
}

/// Router over the given ports with [`test_settings`].
pub fn app_with(
    vision: Arc<MockVision>,
    editor: Arc<MockEditor>,
    fetcher: Arc<MockFetcher>,
) -> Router {
    app_with_settings(vision, editor, fetcher, &test_settings())
}

pub fn app_with_settings(
    vision: Arc<MockVision>,
    editor: Arc<MockEditor>,
    fetcher: Arc<MockFetcher>,
    settings: &Settings,
) -> Router {
    let ctx = ServiceContext { vision, editor, fetcher };
    create_app(AppState::new(&ctx, settings))
}
