//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the request pipelines and an
//! external system. Implementations live in `src/adapters/`.

pub mod image_editor;
pub mod image_fetcher;
pub mod vision_client;

pub use image_editor::{EditPayload, EditRequest, ImageEditor};
pub use image_fetcher::{FetchedImage, ImageFetcher};
pub use vision_client::{VisionClient, VisionRequest};
