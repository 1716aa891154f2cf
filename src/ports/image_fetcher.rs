//! Image fetcher port for downloading provider-hosted results.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

/// Raw bytes downloaded from a result URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchedImage {
    /// Response body.
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

/// Boxed future type returned by [`ImageFetcher::fetch`].
pub type FetchFuture<'a> =
    Pin<Box<dyn Future<Output = Result<FetchedImage, ServiceError>> + Send + 'a>>;

/// Downloads an image by URL.
pub trait ImageFetcher: Send + Sync {
    /// Fetch the body at `url`, failing on non-2xx responses.
    fn fetch(&self, url: &str) -> FetchFuture<'_>;
}

/// Serde helper for serializing `Vec<u8>` as base64 strings in cassettes.
mod base64_bytes {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize bytes as base64 string.
    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(data);
        serializer.serialize_str(&encoded)
    }

    /// Deserialize base64 string to bytes.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD.decode(&s).map_err(serde::de::Error::custom)
    }
}
