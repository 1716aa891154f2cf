//! Live adapters that talk to real provider endpoints.

pub mod http_fetcher;
pub mod openai;
pub mod openai_images;
