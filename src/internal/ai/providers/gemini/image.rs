use base64::{Engine, engine::general_purpose::STANDARD};

use super::{
    api_types::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part},
    client::{Client, model_resource},
    error_from_response,
};
use crate::internal::ai::{
    client::Provider,
    generation::{GenerationError, ImageEditRequest, ImageModel as ImageModelTrait},
};

/// An image editing model backed by Gemini `generateContent`.
/// The prompt part precedes the source frame.
#[derive(Clone, Debug)]
pub struct ImageModel {
    /// The client instance used to make HTTP requests.
    client: Client,
    /// The name of the Gemini model to use (e.g., "gemini-2.5-flash-image").
    model: String,
}

impl ImageModel {
    pub fn new(client: Client, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub(crate) fn build_body(request: &ImageEditRequest) -> GenerateContentRequest {
        let parts = vec![
            Part::text(request.prompt.clone()),
            Part::inline_data(
                request.image.mime_type.clone(),
                STANDARD.encode(&request.image.data),
            ),
        ];
        GenerateContentRequest {
            contents: vec![Content::user(parts)],
            generation_config: Some(GenerationConfig {
                temperature: Some(request.sampling.temperature),
                top_p: Some(request.sampling.top_p),
                top_k: Some(request.sampling.top_k),
            }),
        }
    }
}

impl ImageModelTrait for ImageModel {
    async fn edit_image(&self, request: &ImageEditRequest) -> Result<Vec<u8>, GenerationError> {
        let url = self.client.url(&format!(
            "v1beta/{}:generateContent",
            model_resource(&self.model)
        ));
        let body = Self::build_body(request);

        let req_builder = self.client.http_client.post(&url).json(&body);
        let req_builder = self.client.provider.on_request(req_builder);

        tracing::debug!("Sending request to Gemini API: {}", url);
        let resp = req_builder.send().await?;
        tracing::debug!("Received response status: {}", resp.status());

        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }

        let api_resp: GenerateContentResponse = resp.json().await?;
        decode_first_image(&api_resp)
    }
}

pub(crate) fn decode_first_image(
    api_resp: &GenerateContentResponse,
) -> Result<Vec<u8>, GenerationError> {
    match api_resp.first_inline_data() {
        Some(blob) => STANDARD
            .decode(blob.data.as_bytes())
            .map_err(|e| GenerationError::ResponseError(format!("invalid base64 image: {e}"))),
        None => {
            if let Some(reason) = api_resp
                .prompt_feedback
                .as_ref()
                .and_then(|f| f.block_reason.as_deref())
            {
                tracing::warn!("Gemini blocked the prompt: {}", reason);
            }
            Err(GenerationError::NoImage)
        }
    }
}
