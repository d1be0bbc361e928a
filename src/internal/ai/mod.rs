//! Generative media infrastructure.
//!
//! - **Provider Abstractions**: [`ImageModel`] and [`VideoModel`] traits for pluggable backends
//! - **HTTP plumbing**: the generic [`client::Client`] with per-provider request signing
//! - **Long-running jobs**: [`operation::generate_video_to`] polls a video operation to completion
//!
//! # Example
//! ```no_run
//! use weather_aug::internal::ai::providers::gemini::Client;
//!
//! let client = Client::with_api_key("key");
//! let model = client.image_model("gemini-2.5-flash-image");
//! ```

pub mod client;
pub mod generation;
pub mod operation;
pub mod providers;

pub use generation::{GenerationError, ImageModel, VideoModel};
