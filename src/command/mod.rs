//! Command handlers, one module per subcommand.

pub mod augment;
pub mod collect_refs;
pub mod export_videos;
pub mod extract_frames;
pub mod flatten_videos;
pub mod sample;
pub mod video;
pub mod video_batch;

use std::path::Path;

use crate::{
    error::WeatherError,
    internal::{ai::providers::gemini, config::resolve_api_key},
};

/// Gemini client for the key from `GEMINI_API_KEY` or `api_key_path`.
pub(crate) fn gemini_client(api_key_path: Option<&Path>) -> Result<gemini::Client, WeatherError> {
    let api_key = resolve_api_key(api_key_path)?;
    Ok(gemini::Client::with_api_key(api_key))
}
