//! Record/replay infrastructure for provider interactions.

pub mod config;
pub mod format;
pub mod recorder;
pub mod replayer;
