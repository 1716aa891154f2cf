//! Recording adapters that capture interactions to cassettes.

pub mod image_editor;
pub mod image_fetcher;
pub mod vision_client;

use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::cassette::recorder::CassetteRecorder;
use crate::error::ServiceError;

/// Record a `Result<T, ServiceError>` interaction using the Ok/Err JSON convention.
///
/// Errors keep their kind so a replay reproduces the same HTTP status.
pub(crate) fn record_result<T, I>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, ServiceError>,
) where
    T: Serialize,
    I: Serialize,
{
    let input_json = match serde_json::to_value(input) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(port, method, error = %e, "failed to serialize recording input");
            return;
        }
    };

    let output_json = match result {
        Ok(v) => match serde_json::to_value(v) {
            Ok(inner) => serde_json::json!({ "Ok": inner }),
            Err(e) => {
                tracing::warn!(port, method, error = %e, "failed to serialize recording output");
                return;
            }
        },
        Err(e) => serde_json::json!({ "Err": { "kind": e.kind(), "message": e.to_string() } }),
    };

    match recorder.lock() {
        Ok(mut guard) => {
            if let Err(e) = guard.record(port, method, input_json, output_json) {
                tracing::warn!(port, method, error = %e, "failed to append to cassette");
            }
        }
        Err(e) => tracing::warn!(port, method, error = %e, "recorder lock poisoned"),
    }
}
