//! Unified error type for the personfi service.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors that can occur while serving a request.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The upload was empty or the multipart form was unusable.
    #[error("{0}")]
    InvalidInput(String),

    /// The request body exceeded the configured upload limit.
    #[error("{0}")]
    PayloadTooLarge(String),

    /// The upload is not a decodable raster image.
    #[error("Unsupported or invalid image file")]
    UnsupportedFormat,

    /// The upstream provider could not be reached or answered with an error.
    #[error("{context}: {message}")]
    Provider {
        /// What was being attempted (e.g. `"OpenAI vision request failed"`).
        context: String,
        /// Upstream error message or body.
        message: String,
    },

    /// The upstream provider answered 2xx with a body we could not interpret.
    #[error("Malformed response from {source_name}: {message}")]
    MalformedResponse {
        /// Which provider response was malformed.
        source_name: String,
        /// Parse failure detail.
        message: String,
    },

    /// The upstream provider succeeded but supplied no usable payload.
    #[error("{0}")]
    EmptyResult(String),

    /// A required setting is missing or invalid.
    #[error("{0}")]
    Configuration(String),

    /// Unexpected failure (decoder limits, I/O, panicked worker).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Shorthand for a provider failure.
    pub fn provider(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider { context: context.into(), message: message.into() }
    }

    /// Shorthand for a malformed provider response.
    pub fn malformed(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedResponse { source_name: source_name.into(), message: message.into() }
    }

    /// HTTP status this error is reported with.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) | Self::UnsupportedFormat => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Provider { .. } => StatusCode::BAD_GATEWAY,
            Self::MalformedResponse { .. }
            | Self::EmptyResult(_)
            | Self::Configuration(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable snake_case tag reported to clients as `error_type`.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::PayloadTooLarge(_) => "payload_too_large",
            Self::UnsupportedFormat => "unsupported_format",
            Self::Provider { .. } => "provider_error",
            Self::MalformedResponse { .. } => "malformed_provider_response",
            Self::EmptyResult(_) => "empty_provider_result",
            Self::Configuration(_) => "configuration_error",
            Self::Internal(_) => "internal_error",
        }
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(e: std::io::Error) -> Self {
        Self::Internal(format!("I/O error: {e}"))
    }
}
