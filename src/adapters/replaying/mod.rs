//! Replaying adapters that serve recorded interactions from cassettes.

pub mod image_editor;
pub mod image_fetcher;
pub mod vision_client;

use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::cassette::replayer::CassetteReplayer;
use crate::error::ServiceError;

/// Retrieve the next recorded output for a given port and method.
pub(crate) fn next_output(
    replayer: &Arc<Mutex<CassetteReplayer>>,
    port: &str,
    method: &str,
) -> Result<Value, ServiceError> {
    let mut guard = replayer
        .lock()
        .map_err(|e| ServiceError::Internal(format!("replayer lock poisoned: {e}")))?;
    guard
        .next_interaction(port, method)
        .map(|interaction| interaction.output)
        .map_err(|e| ServiceError::provider("Replay failed", e))
}

/// Deserialize a replayed output as `Result<T, ServiceError>`.
pub(crate) fn replay_result<T: serde::de::DeserializeOwned>(
    output: Value,
) -> Result<T, ServiceError> {
    if let Some(err_val) = output.get("Err").or_else(|| output.get("err")) {
        return Err(recorded_error(err_val));
    }
    let ok_val = output.get("Ok").or_else(|| output.get("ok")).cloned().unwrap_or(output);
    serde_json::from_value(ok_val)
        .map_err(|e| ServiceError::Internal(format!("cassette output does not match port: {e}")))
}

/// Rebuild a [`ServiceError`] from its recorded `{kind, message}` form.
fn recorded_error(value: &Value) -> ServiceError {
    let Some(kind) = value.get("kind").and_then(Value::as_str) else {
        let message = value.as_str().unwrap_or("replayed error");
        return ServiceError::provider("Replayed error", message);
    };
    let message = value.get("message").and_then(Value::as_str).unwrap_or_default();

    match kind {
        "invalid_input" => ServiceError::InvalidInput(message.to_string()),
        "payload_too_large" => ServiceError::PayloadTooLarge(message.to_string()),
        "unsupported_format" => ServiceError::UnsupportedFormat,
        "provider_error" => match message.split_once(": ") {
            Some((context, rest)) => ServiceError::provider(context, rest),
            None => ServiceError::provider("Replayed error", message),
        },
        "malformed_provider_response" => {
            let rest = message.strip_prefix("Malformed response from ").unwrap_or(message);
            match rest.split_once(": ") {
                Some((source_name, detail)) => ServiceError::malformed(source_name, detail),
                None => ServiceError::malformed("provider", rest),
            }
        }
        "empty_provider_result" => ServiceError::EmptyResult(message.to_string()),
        "configuration_error" => ServiceError::Configuration(message.to_string()),
        _ => ServiceError::Internal(
            message.strip_prefix("Internal error: ").unwrap_or(message).to_string(),
        ),
    }
}
