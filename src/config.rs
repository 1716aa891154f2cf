//! Configuration file loading with environment variable overrides.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::model::{
    parse_flag, EditShape, DEFAULT_IMAGE_MODEL, DEFAULT_IMAGE_SIZE, DEFAULT_VISION_MODEL,
};
use crate::params::validate_size;

/// Provider base URL used when none is configured.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Upload body limit used when none is configured (20 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Top-level configuration file.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// `OpenAI` provider settings.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Supabase settings (reported by `/hello` only).
    #[serde(default)]
    pub supabase: SupabaseConfig,

    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
}

/// `OpenAI` provider settings.
#[derive(Debug, Default, Deserialize)]
pub struct OpenAiConfig {
    /// API key.
    pub api_key: Option<String>,
    /// API base URL.
    pub base_url: Option<String>,
    /// Vision model identifier.
    pub vision_model: Option<String>,
    /// Force the Responses API regardless of model.
    pub use_responses: Option<bool>,
    /// Image-edit model identifier.
    pub image_model: Option<String>,
    /// Image-edit output size.
    pub image_size: Option<String>,
    /// Image-edit multipart shape (`single` or `array`).
    pub image_edit_shape: Option<String>,
}

/// Supabase settings.
#[derive(Debug, Default, Deserialize)]
pub struct SupabaseConfig {
    /// Project URL.
    pub url: Option<String>,
    /// Anonymous key.
    pub anon_key: Option<String>,
}

/// HTTP server settings.
#[derive(Debug, Default, Deserialize)]
pub struct ServerConfig {
    /// Maximum accepted request body size in bytes.
    pub max_upload_bytes: Option<usize>,
}

impl Config {
    /// Load configuration from the given path, or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
        toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
    }
}

/// Effective settings after applying environment overrides and defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    /// `OpenAI` API key; absence surfaces at first provider use.
    pub api_key: Option<String>,
    /// `OpenAI` API base URL without trailing slash.
    pub base_url: String,
    /// Vision model identifier.
    pub vision_model: String,
    /// Force the Responses API.
    pub force_responses: bool,
    /// Image-edit model identifier.
    pub image_model: String,
    /// Image-edit output size.
    pub image_size: String,
    /// Image-edit multipart shape.
    pub edit_shape: EditShape,
    /// Whether both Supabase URL and key are present.
    pub supabase_configured: bool,
    /// Request body limit.
    pub max_upload_bytes: usize,
}

impl Settings {
    /// Resolve settings from the config file and the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured value is invalid.
    pub fn resolve(config: &Config) -> Result<Self, String> {
        Self::resolve_with(config, |key| std::env::var(key).ok())
    }

    /// Resolve settings using `env` as the environment lookup.
    ///
    /// Environment values win over file values; empty values count as unset.
    ///
    /// # Errors
    ///
    /// Returns an error if the image size or edit shape is invalid.
    pub fn resolve_with(
        config: &Config,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, String> {
        let lookup = |key: &str, file: &Option<String>| {
            env(key).filter(|v| !v.trim().is_empty()).or_else(|| file.clone())
        };

        let openai = &config.openai;
        let api_key = lookup("OPENAI_API_KEY", &openai.api_key);
        let base_url = lookup("OPENAI_BASE_URL", &openai.base_url)
            .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let vision_model = lookup("OPENAI_VISION_MODEL", &openai.vision_model)
            .unwrap_or_else(|| DEFAULT_VISION_MODEL.to_string());
        let force_responses = env("USE_RESPONSES")
            .map(|v| parse_flag(&v))
            .or(openai.use_responses)
            .unwrap_or(false);
        let image_model = lookup("OPENAI_IMAGE_MODEL", &openai.image_model)
            .unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string());
        let image_size = lookup("OPENAI_IMAGE_SIZE", &openai.image_size)
            .unwrap_or_else(|| DEFAULT_IMAGE_SIZE.to_string());
        validate_size(&image_size)?;
        let edit_shape = lookup("OPENAI_IMAGE_EDIT_SHAPE", &openai.image_edit_shape)
            .map(|s| EditShape::parse(&s))
            .transpose()?
            .unwrap_or_default();

        let supabase_url = lookup("SUPABASE_URL", &config.supabase.url);
        let supabase_key = lookup("SUPABASE_ANON_KEY", &config.supabase.anon_key);

        Ok(Self {
            api_key,
            base_url,
            vision_model,
            force_responses,
            image_model,
            image_size,
            edit_shape,
            supabase_configured: supabase_url.is_some() && supabase_key.is_some(),
            max_upload_bytes: config.server.max_upload_bytes.unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        })
    }
}

/// Discover the config file path using the resolution order:
/// 1. Explicit path (from `--config` flag)
/// 2. `PERSONFI_CONFIG` environment variable
/// 3. `~/.config/personfi/config.toml`
#[must_use]
pub fn discover_config_path(explicit: Option<&str>) -> PathBuf {
    if let Some(p) = explicit {
        return PathBuf::from(p);
    }

    if let Ok(p) = std::env::var("PERSONFI_CONFIG") {
        return PathBuf::from(p);
    }

    default_config_path()
}

/// Default config path: `~/.config/personfi/config.toml`.
fn default_config_path() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".config/personfi/config.toml")
    } else {
        PathBuf::from("personfi.toml")
    }
}
