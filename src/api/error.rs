//! JSON error responses.

use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

/// Body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Snake-case error kind, e.g. `"empty_provider_result"`.
    pub error_type: String,
    /// Human-readable message.
    pub detail: String,
}

impl From<&ServiceError> for ErrorResponse {
    fn from(e: &ServiceError) -> Self {
        Self { error_type: e.kind().to_string(), detail: e.to_string() }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error_type = self.kind(), status = status.as_u16(), "{self}");
        } else {
            tracing::debug!(error_type = self.kind(), status = status.as_u16(), "{self}");
        }
        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}
