//! Recording adapter for the `VisionClient` port.

use std::sync::{Arc, Mutex};

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::vision_client::{CompleteFuture, VisionClient, VisionRequest};

/// Records vision interactions while delegating to an inner implementation.
pub struct RecordingVisionClient {
    inner: Arc<dyn VisionClient>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingVisionClient {
    /// Creates a new recording client wrapping the given implementation.
    pub fn new(inner: Arc<dyn VisionClient>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl VisionClient for RecordingVisionClient {
    fn complete(&self, request: &VisionRequest) -> CompleteFuture<'_> {
        let request_clone = request.clone();
        let recorder = Arc::clone(&self.recorder);

        Box::pin(async move {
            let result = self.inner.complete(&request_clone).await;
            record_result(&recorder, "vision_client", "complete", &request_clone, &result);
            result
        })
    }
}
