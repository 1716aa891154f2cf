//! Service context that bundles all port trait objects.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::adapters::live::http_fetcher::HttpImageFetcher;
use crate::adapters::live::openai::{OpenAiClient, OpenAiVision};
use crate::adapters::live::openai_images::OpenAiImageEditor;
use crate::adapters::recording::image_editor::RecordingImageEditor;
use crate::adapters::recording::image_fetcher::RecordingImageFetcher;
use crate::adapters::recording::vision_client::RecordingVisionClient;
use crate::adapters::replaying::image_editor::ReplayingImageEditor;
use crate::adapters::replaying::image_fetcher::ReplayingImageFetcher;
use crate::adapters::replaying::vision_client::ReplayingVisionClient;
use crate::cassette::config::load_cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::cassette::replayer::CassetteReplayer;
use crate::config::Settings;
use crate::error::ServiceError;
use crate::ports::{ImageEditor, ImageFetcher, VisionClient};

/// Bundles all port trait objects into a single context.
#[derive(Clone)]
pub struct ServiceContext {
    /// Vision model port.
    pub vision: Arc<dyn VisionClient>,
    /// Image-edit port.
    pub editor: Arc<dyn ImageEditor>,
    /// Result download port.
    pub fetcher: Arc<dyn ImageFetcher>,
}

/// Handle to a recording session; calls are on disk as they complete.
pub struct RecordingSession {
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingSession {
    /// Where the cassette is being written.
    #[must_use]
    pub fn path(&self) -> Option<PathBuf> {
        self.recorder.lock().ok().map(|r| r.path().to_path_buf())
    }

    /// Sync the cassette to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be synced.
    pub fn finish(self) -> Result<PathBuf, String> {
        let recorder = self.recorder.lock().map_err(|e| format!("Recorder lock poisoned: {e}"))?;
        recorder.finish().map_err(|e| format!("Failed to write cassette: {e}"))
    }
}

impl ServiceContext {
    /// Create a live context talking to `OpenAI`.
    ///
    /// A missing API key is not an error here; it is reported on the first
    /// provider call.
    #[must_use]
    pub fn live(settings: &Settings) -> Self {
        let http = reqwest::Client::new();
        let openai =
            OpenAiClient::new(http.clone(), settings.base_url.clone(), settings.api_key.clone());
        Self {
            vision: Arc::new(OpenAiVision::new(openai.clone())),
            editor: Arc::new(OpenAiImageEditor::new(openai)),
            fetcher: Arc::new(HttpImageFetcher::new(http)),
        }
    }

    /// Create a recording context that wraps the live adapters with a recorder
    /// writing under `.personfi/cassettes/<timestamp>/`.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be created.
    pub fn recording(settings: &Settings) -> Result<(Self, RecordingSession), ServiceError> {
        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let path = PathBuf::from(".personfi/cassettes")
            .join(&timestamp)
            .join("providers.cassette.yaml");
        Self::recording_to(settings, &path, &format!("{timestamp}-providers"))
    }

    /// Create a recording context whose cassette is written to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be created.
    pub fn recording_to(
        settings: &Settings,
        path: &Path,
        name: &str,
    ) -> Result<(Self, RecordingSession), ServiceError> {
        let recorder = CassetteRecorder::create(path, name, &get_commit_hash())
            .map_err(|e| ServiceError::Configuration(format!("Failed to create cassette: {e}")))?;
        let recorder = Arc::new(Mutex::new(recorder));
        let live_ctx = Self::live(settings);

        let ctx = Self {
            vision: Arc::new(RecordingVisionClient::new(live_ctx.vision, Arc::clone(&recorder))),
            editor: Arc::new(RecordingImageEditor::new(live_ctx.editor, Arc::clone(&recorder))),
            fetcher: Arc::new(RecordingImageFetcher::new(live_ctx.fetcher, Arc::clone(&recorder))),
        };
        let session = RecordingSession { recorder };

        Ok((ctx, session))
    }

    /// Create a replaying context from a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be loaded.
    pub fn replaying(path: &Path) -> Result<Self, ServiceError> {
        let replayer = load_cassette(path)
            .map_err(|e| ServiceError::Configuration(format!("Failed to load cassette: {e}")))?;
        tracing::info!(interactions = replayer.remaining(), "serving providers from cassette");
        Ok(Self::from_replayer(replayer))
    }

    /// Create a replaying context from an already-loaded replayer.
    #[must_use]
    pub fn from_replayer(replayer: CassetteReplayer) -> Self {
        let replayer = Arc::new(Mutex::new(replayer));
        Self {
            vision: Arc::new(ReplayingVisionClient::new(Arc::clone(&replayer))),
            editor: Arc::new(ReplayingImageEditor::new(Arc::clone(&replayer))),
            fetcher: Arc::new(ReplayingImageFetcher::new(replayer)),
        }
    }
}

/// Get the current git commit hash, or "unknown" if unavailable.
fn get_commit_hash() -> String {
    std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map_or_else(|| "unknown".to_string(), |s| s.trim().to_string())
}
