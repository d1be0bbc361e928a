use std::{env, fmt};

use super::{GEMINI_API_BASE_URL, image::ImageModel, video::VideoModel};
use crate::internal::ai::client::Provider;

/// Environment variable that redirects all Gemini traffic (proxies, local mocks).
pub const BASE_URL_ENV: &str = "GEMINI_BASE_URL";

/// Gemini AI Provider for interfacing with Google's Gemini and VEO models.
#[derive(Clone)]
pub struct GeminiProvider {
    api_key: String,
}

impl fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("api_key", &"***")
            .finish()
    }
}

impl GeminiProvider {
    /// Creates a new GeminiProvider with the given API key.
    pub fn new(api_key: String) -> Self {
        Self { api_key }
    }

    /// Returns the API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl Provider for GeminiProvider {
    fn on_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.header("x-goog-api-key", &self.api_key)
    }
}

pub type Client = crate::internal::ai::client::Client<GeminiProvider>;

impl Client {
    /// Creates a Gemini Client for `api_key`, honouring [`BASE_URL_ENV`].
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        let base_url = env::var(BASE_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| GEMINI_API_BASE_URL.to_string());
        Self::new(&base_url, GeminiProvider::new(api_key.into()))
    }

    /// Creates an image editing model for the specified Gemini model.
    pub fn image_model(&self, model: &str) -> ImageModel {
        ImageModel::new(self.clone(), model)
    }

    /// Creates a video generation model for the specified VEO model.
    pub fn video_model(&self, model: &str) -> VideoModel {
        VideoModel::new(self.clone(), model)
    }
}

/// Turns a configured model name into the `models/{id}` resource path.
/// Both `veo-3.1` and `models/veo-3.1` are accepted.
pub fn model_resource(model: &str) -> String {
    let id = model.trim().trim_start_matches("models/");
    format!("models/{id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_resource_strips_existing_prefix() {
        assert_eq!(
            model_resource("models/veo-3.1-generate-preview"),
            "models/veo-3.1-generate-preview"
        );
        assert_eq!(
            model_resource("gemini-2.5-flash-image"),
            "models/gemini-2.5-flash-image"
        );
    }

    #[test]
    fn test_provider_debug_masks_key() {
        let provider = GeminiProvider::new("secret".to_string());
        let shown = format!("{provider:?}");
        assert!(!shown.contains("secret"));
        assert!(shown.contains("***"));
        assert_eq!(provider.api_key(), "secret");
    }
}
