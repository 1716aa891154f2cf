//! personfi - clothing analysis and clothing-only image generation for
//! uploaded photos, backed by `OpenAI` vision and image-edit APIs.

pub mod adapters;
pub mod analyzer;
pub mod api;
pub mod cassette;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod extractor;
pub mod model;
pub mod output;
pub mod params;
pub mod ports;
pub mod validation;
