//! On-disk cassette format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A recorded session of provider interactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cassette {
    /// Human-readable session name.
    pub name: String,
    /// When recording started.
    pub recorded_at: DateTime<Utc>,
    /// Git commit the recording was made from.
    pub commit: String,
    /// Interactions in call order.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub interactions: Vec<Interaction>,
}

// A session that made no calls leaves `interactions:` with a null value.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Interaction>, D::Error> {
    Ok(Option::deserialize(deserializer)?.unwrap_or_default())
}

/// One call made through a port.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    /// Global sequence number within the cassette.
    pub seq: u64,
    /// Port name (e.g. `"vision_client"`).
    pub port: String,
    /// Method name (e.g. `"complete"`).
    pub method: String,
    /// Serialized call input.
    pub input: serde_json::Value,
    /// Serialized result using the `{"Ok": ...}` / `{"Err": ...}` convention.
    pub output: serde_json::Value,
}
