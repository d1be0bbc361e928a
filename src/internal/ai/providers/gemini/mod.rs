//! Google Gemini (image) and VEO (video) provider.
//!
//! # Example
//! ```no_run
//! use weather_aug::internal::ai::providers::gemini;
//!
//! let client = gemini::Client::with_api_key("key");
//! let images = client.image_model(gemini::GEMINI_2_5_FLASH_IMAGE);
//! let videos = client.video_model(gemini::VEO_3_1_GENERATE_PREVIEW);
//! ```

pub mod api_types;
pub mod client;
pub mod image;
pub mod video;


pub use client::{BASE_URL_ENV, Client, GeminiProvider};
pub use self::image::ImageModel;
pub use self::video::VideoModel;

pub const GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com";

// Model constants
pub const GEMINI_2_5_FLASH_IMAGE: &str = "gemini-2.5-flash-image";
pub const VEO_3_1: &str = "veo-3.1";
pub const VEO_3_1_GENERATE_PREVIEW: &str = "models/veo-3.1-generate-preview";

use crate::internal::ai::generation::GenerationError;

/// Reads at most the first 1KB of an error body and turns it into a
/// [`GenerationError`], preferring the API's own `error.message`.
pub(crate) async fn error_from_response(resp: reqwest::Response) -> GenerationError {
    let status = resp.status();
    let body = match resp.bytes().await {
        Ok(body) => body,
        Err(e) => return GenerationError::HttpError(e),
    };
    let message = match serde_json::from_slice::<api_types::ApiErrorBody>(&body) {
        Ok(parsed) => parsed.error.message,
        Err(_) => String::from_utf8_lossy(&body[..body.len().min(1024)]).into_owned(),
    };
    GenerationError::from_status(status, message)
}
