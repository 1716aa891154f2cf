//! Replaying adapter for the `ImageEditor` port.

use std::sync::{Arc, Mutex};

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::image_editor::{EditFuture, EditPayload, EditRequest, ImageEditor};

/// Serves recorded image-edit results from a cassette.
pub struct ReplayingImageEditor {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingImageEditor {
    /// Create a replaying editor backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer }
    }
}

impl ImageEditor for ReplayingImageEditor {
    fn edit(&self, _request: &EditRequest) -> EditFuture<'_> {
        let output = next_output(&self.replayer, "image_editor", "edit");
        Box::pin(async move { output.and_then(replay_result::<EditPayload>) })
    }
}
