//! Adapter implementations for the provider ports.
//!
//! - `live/`: `OpenAI` vision, image-edit and result download over HTTP
//! - `recording/`: pass calls through to live adapters and log them to a cassette
//! - `replaying/`: serve calls from a cassette without touching the network

pub mod live;
pub mod recording;
pub mod replaying;
