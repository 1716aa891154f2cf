//! Replaying adapter for the `VisionClient` port.

use std::sync::{Arc, Mutex};

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::vision_client::{CompleteFuture, VisionClient, VisionRequest};

/// Serves recorded vision replies from a cassette.
pub struct ReplayingVisionClient {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingVisionClient {
    /// Create a replaying client backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer }
    }
}

impl VisionClient for ReplayingVisionClient {
    fn complete(&self, _request: &VisionRequest) -> CompleteFuture<'_> {
        let output = next_output(&self.replayer, "vision_client", "complete");
        Box::pin(async move { output.and_then(replay_result::<String>) })
    }
}
