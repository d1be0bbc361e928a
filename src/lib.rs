//! Weather augmentation of first-person riding footage.
//!
//! Source frames are re-rendered under several weather conditions through the
//! Gemini image API, and the augmented frame folders are turned into short
//! clips through the VEO video API. Local helpers cover frame extraction,
//! clip export, and dataset housekeeping via `ffmpeg` and the file system.

pub mod cli;
pub mod command;
pub mod error;
pub mod internal;
pub mod utils;
