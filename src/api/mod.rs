//! HTTP surface: router, shared state and handlers.

pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::analyzer::ItemAnalyzer;
use crate::config::Settings;
use crate::context::ServiceContext;
use crate::extractor::{ExtractorOptions, GarmentExtractor};

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Item analysis pipeline.
    pub analyzer: Arc<ItemAnalyzer>,
    /// Garment extraction pipeline.
    pub extractor: Arc<GarmentExtractor>,
    /// Whether Supabase credentials are configured.
    pub supabase_configured: bool,
    /// Request body limit in bytes.
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Build both pipelines over the ports in `ctx`.
    #[must_use]
    pub fn new(ctx: &ServiceContext, settings: &Settings) -> Self {
        let analyzer = ItemAnalyzer::new(
            Arc::clone(&ctx.vision),
            settings.vision_model.clone(),
            settings.force_responses,
        );
        let extractor = GarmentExtractor::new(
            Arc::clone(&ctx.editor),
            Arc::clone(&ctx.fetcher),
            ExtractorOptions {
                model: settings.image_model.clone(),
                size: settings.image_size.clone(),
                shape: settings.edit_shape,
            },
        );
        Self {
            analyzer: Arc::new(analyzer),
            extractor: Arc::new(extractor),
            supabase_configured: settings.supabase_configured,
            max_upload_bytes: settings.max_upload_bytes,
        }
    }
}

/// Build the application router.
pub fn create_app(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;
    Router::new()
        .route("/hello", get(handlers::hello))
        .route("/analyze", post(handlers::analyze))
        .route("/generate-clothing/ready", get(handlers::generate_ready))
        .route("/generate-clothing", post(handlers::generate_clothing))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
