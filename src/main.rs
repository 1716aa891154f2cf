//! personfi - HTTP server entry point.

use std::path::Path;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use personfi::api::{create_app, AppState};
use personfi::cli::Cli;
use personfi::config::{self, Config, Settings};
use personfi::context::ServiceContext;
use personfi::error::ServiceError;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "personfi=debug,tower_http=debug" } else { "personfi=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run(cli: Cli) -> Result<(), ServiceError> {
    // Load config
    let config_path = config::discover_config_path(cli.config.as_deref());
    let config = Config::load(&config_path).map_err(ServiceError::Configuration)?;
    let settings = Settings::resolve(&config).map_err(ServiceError::Configuration)?;
    let addr = cli.bind_addr().map_err(ServiceError::Configuration)?;

    tracing::debug!(path = %config_path.display(), "configuration loaded");
    if settings.api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY is not set; provider calls will fail until it is");
    }

    // Create context based on mode (live / recording / replaying)
    let replay_path = std::env::var("PERSONFI_REPLAY").ok();
    let is_recording = std::env::var("PERSONFI_REC").is_ok_and(|v| v == "true" || v == "1");

    let (ctx, recording_session) = if let Some(ref cassette_path) = replay_path {
        tracing::info!(cassette = %cassette_path, "replaying provider interactions");
        (ServiceContext::replaying(Path::new(cassette_path))?, None)
    } else if is_recording {
        tracing::info!("recording provider interactions");
        let (ctx, session) = ServiceContext::recording(&settings)?;
        if let Some(path) = session.path() {
            tracing::info!(path = %path.display(), "writing cassette");
        }
        (ctx, Some(session))
    } else {
        (ServiceContext::live(&settings), None)
    };

    let app = create_app(AppState::new(&ctx, &settings));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        vision_model = %settings.vision_model,
        image_model = %settings.image_model,
        "personfi listening"
    );

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    // Finish recording if active
    if let Some(session) = recording_session {
        match session.finish() {
            Ok(path) => tracing::info!(path = %path.display(), "cassette saved"),
            Err(e) => tracing::warn!("failed to save cassette: {e}"),
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
