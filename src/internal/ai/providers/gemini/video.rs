use std::path::Path;

use base64::{Engine, engine::general_purpose::STANDARD};
use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;

use super::{
    api_types::{
        ImageData, OperationResponse, PredictLongRunningRequest, ReferenceImageData,
        VideoInstance, VideoParameters,
    },
    client::{Client, model_resource},
    error_from_response,
};
use crate::{
    internal::ai::{
        client::Provider,
        generation::{
            GeneratedVideo, GenerationError, InlineImage, Operation, VideoModel as VideoModelTrait,
            VideoRequest,
        },
    },
    utils::fs::{part_path, write_atomic},
};

/// A VEO video model driven through `predictLongRunning` and operation polling.
#[derive(Clone, Debug)]
pub struct VideoModel {
    client: Client,
    model: String,
}

impl VideoModel {
    pub fn new(client: Client, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub(crate) fn build_body(request: &VideoRequest) -> PredictLongRunningRequest {
        let reference_images = (!request.reference_images.is_empty()).then(|| {
            request
                .reference_images
                .iter()
                .map(|r| ReferenceImageData {
                    image: image_data(&r.image),
                    reference_type: r.reference_type.as_api_str().to_string(),
                })
                .collect()
        });

        PredictLongRunningRequest {
            instances: vec![VideoInstance {
                prompt: request.prompt.clone(),
                image: request.image.as_ref().map(image_data),
                last_frame: request.last_frame.as_ref().map(image_data),
                reference_images,
            }],
            parameters: VideoParameters {
                duration_seconds: request.duration_seconds,
                aspect_ratio: non_empty(&request.aspect_ratio),
                resolution: non_empty(&request.resolution),
                negative_prompt: non_empty(&request.negative_prompt),
            },
        }
    }
}

fn image_data(image: &InlineImage) -> ImageData {
    ImageData {
        bytes_base64_encoded: STANDARD.encode(&image.data),
        mime_type: image.mime_type.clone(),
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Maps the wire operation onto the provider-neutral [`Operation`].
pub(crate) fn into_operation(resp: OperationResponse) -> Result<Operation, GenerationError> {
    let error = resp.error.map(|e| match e.code {
        Some(code) => format!("{} (code {})", e.message, code),
        None => e.message,
    });

    let video = match resp
        .response
        .and_then(|r| r.generate_video_response)
        .and_then(|r| r.generated_samples)
        .and_then(|samples| samples.into_iter().next())
        .and_then(|sample| sample.video)
    {
        Some(data) => match (data.bytes_base64_encoded, data.uri) {
            (Some(encoded), _) if !encoded.is_empty() => {
                let bytes = STANDARD.decode(encoded.as_bytes()).map_err(|e| {
                    GenerationError::ResponseError(format!("invalid base64 video: {e}"))
                })?;
                Some(GeneratedVideo::Bytes(bytes))
            }
            (_, Some(uri)) if !uri.is_empty() => Some(GeneratedVideo::Uri(uri)),
            _ => {
                return Err(GenerationError::ResponseError(
                    "Video response missing data and URI".into(),
                ));
            }
        },
        None => None,
    };

    Ok(Operation {
        name: resp.name,
        done: resp.done,
        error,
        video,
    })
}

impl VideoModelTrait for VideoModel {
    async fn submit(&self, request: &VideoRequest) -> Result<Operation, GenerationError> {
        let url = self.client.url(&format!(
            "v1beta/{}:predictLongRunning",
            model_resource(&self.model)
        ));
        let body = Self::build_body(request);

        let req_builder = self.client.http_client.post(&url).json(&body);
        let req_builder = self.client.provider.on_request(req_builder);

        tracing::info!("Sending request to VEO API: {}", url);
        let resp = req_builder.send().await?;
        tracing::info!("Received response status: {}", resp.status());

        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }
        into_operation(resp.json().await?)
    }

    async fn poll(&self, operation: &Operation) -> Result<Operation, GenerationError> {
        let url = self.client.url(&format!("v1beta/{}", operation.name));
        let req_builder = self.client.provider.on_request(self.client.http_client.get(&url));

        let resp = req_builder.send().await?;
        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }
        into_operation(resp.json().await?)
    }

    async fn save(&self, video: &GeneratedVideo, dest: &Path) -> Result<(), GenerationError> {
        match video {
            GeneratedVideo::Bytes(bytes) => {
                write_atomic(dest, bytes).await?;
            }
            GeneratedVideo::Uri(uri) => {
                tracing::info!("Downloading video from {}", uri);
                let req_builder = self.client.provider.on_request(self.client.http_client.get(uri));
                let resp = req_builder.send().await?;
                if !resp.status().is_success() {
                    return Err(error_from_response(resp).await);
                }

                let part = part_path(dest);
                if let Err(e) = download_to(resp, &part).await {
                    let _ = tokio::fs::remove_file(&part).await;
                    return Err(e);
                }
                tokio::fs::rename(&part, dest).await?;
            }
        }
        Ok(())
    }
}

async fn download_to(resp: reqwest::Response, path: &Path) -> Result<(), GenerationError> {
    let mut file = tokio::fs::File::create(path).await?;
    let mut stream = resp.bytes_stream();
    while let Some(chunk) = stream.next().await {
        file.write_all(&chunk?).await?;
    }
    file.flush().await?;
    Ok(())
}
