//! Live adapter that downloads provider-hosted images over HTTP.

use std::time::Duration;

use reqwest::Client;

use crate::error::ServiceError;
use crate::ports::image_fetcher::{FetchFuture, FetchedImage, ImageFetcher};

/// Upper bound on a single result download.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

const FETCH_FAILED: &str = "Failed to fetch generated image url";

/// Fetches result URLs with a bounded timeout.
pub struct HttpImageFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpImageFetcher {
    /// Create a fetcher using [`FETCH_TIMEOUT`].
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client, timeout: FETCH_TIMEOUT }
    }
}

impl ImageFetcher for HttpImageFetcher {
    fn fetch(&self, url: &str) -> FetchFuture<'_> {
        let url = url.to_string();
        Box::pin(async move {
            let response = self
                .client
                .get(&url)
                .timeout(self.timeout)
                .send()
                .await
                .and_then(reqwest::Response::error_for_status)
                .map_err(|e| ServiceError::provider(FETCH_FAILED, e.to_string()))?;

            let data = response
                .bytes()
                .await
                .map_err(|e| ServiceError::provider(FETCH_FAILED, e.to_string()))?;

            Ok(FetchedImage { data: data.to_vec() })
        })
    }
}
