pub mod request;

use std::{future::Future, path::Path};

pub use request::{
    GeneratedVideo, ImageEditRequest, InlineImage, Operation, ReferenceImage, ReferenceType,
    SamplingConfig, VideoRequest,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("HttpError: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JsonError: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A 4xx answer other than 429, typically an unsupported request field.
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// 429 or 5xx.
    #[error("Service unavailable ({status}): {message}")]
    Unavailable { status: u16, message: String },

    #[error("ResponseError: {0}")]
    ResponseError(String),

    #[error("No image data returned by Gemini")]
    NoImage,

    #[error("Video generation failed: {0}")]
    OperationFailed(String),

    #[error("No video content returned from operation")]
    NoVideo,

    #[error("ImageError: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GenerationError {
    /// Builds the error for a non-success HTTP status.
    pub fn from_status(status: reqwest::StatusCode, message: String) -> Self {
        let code = status.as_u16();
        if status.is_client_error() && status != reqwest::StatusCode::TOO_MANY_REQUESTS {
            GenerationError::Rejected {
                status: code,
                message,
            }
        } else {
            GenerationError::Unavailable {
                status: code,
                message,
            }
        }
    }

    /// Whether sending the same request again may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GenerationError::HttpError(_)
                | GenerationError::JsonError(_)
                | GenerationError::Unavailable { .. }
                | GenerationError::ResponseError(_)
                | GenerationError::NoImage
                | GenerationError::ImageError(_)
        )
    }
}

/// A model that re-renders a source image according to a text prompt.
pub trait ImageModel: Clone + Send + Sync {
    /// Returns the raw bytes of the first image the model produced.
    fn edit_image(
        &self,
        request: &ImageEditRequest,
    ) -> impl Future<Output = Result<Vec<u8>, GenerationError>> + Send;
}

/// A model that synthesizes video through a long-running remote operation.
pub trait VideoModel: Clone + Send + Sync {
    /// Starts a generation and returns the (usually unfinished) operation.
    fn submit(
        &self,
        request: &VideoRequest,
    ) -> impl Future<Output = Result<Operation, GenerationError>> + Send;

    /// Fetches the current state of a previously submitted operation.
    fn poll(
        &self,
        operation: &Operation,
    ) -> impl Future<Output = Result<Operation, GenerationError>> + Send;

    /// Writes a finished video to `dest`, downloading it when only a URI was returned.
    fn save(
        &self,
        video: &GeneratedVideo,
        dest: &Path,
    ) -> impl Future<Output = Result<(), GenerationError>> + Send;
}
