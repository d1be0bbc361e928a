//! Implements `video`: a single VEO generation described by one job config.

use std::path::{Path, PathBuf};

use clap::Parser;
use colored::Colorize;

use crate::{
    command::gemini_client,
    error::WeatherError,
    internal::{
        ai::{
            VideoModel,
            generation::{InlineImage, ReferenceImage, VideoRequest},
            operation::generate_video_to,
        },
        config::VideoJobConfig,
    },
};

#[derive(Parser, Debug, Clone)]
pub struct VideoArgs {
    /// Video job config
    #[clap(default_value = "configs/veo_video.yaml")]
    pub config: PathBuf,
}

pub async fn execute(args: VideoArgs) -> Result<(), WeatherError> {
    let job = VideoJobConfig::load(&args.config)?;
    let client = gemini_client(job.api_key_path.as_deref())?;
    let model = client.video_model(&job.model_name);

    let path = run(&model, &job).await?;
    println!("{} {}", "Saved video to".green(), path.display());
    Ok(())
}

/// Builds the request for `job`, generates it, and returns the saved path.
pub async fn run<M: VideoModel>(model: &M, job: &VideoJobConfig) -> Result<PathBuf, WeatherError> {
    let request = build_request(job).await?;
    let path = generate_video_to(model, &request, job.poll_interval, &job.output_path).await?;
    Ok(path)
}

/// The first frame becomes the starting image and, when enabled, the single
/// reference image. The last frame is only sent when `use_last_frame` is set.
pub async fn build_request(job: &VideoJobConfig) -> Result<VideoRequest, WeatherError> {
    let first = match &job.first_frame {
        Some(path) => Some(read_frame(path).await?),
        None => None,
    };
    let last = match &job.last_frame {
        Some(path) if job.use_last_frame => Some(read_frame(path).await?),
        _ => None,
    };

    let reference_images = match &first {
        Some(image) if job.use_first_frame_reference => vec![ReferenceImage {
            image: image.clone(),
            reference_type: job.reference_type,
        }],
        _ => Vec::new(),
    };

    Ok(VideoRequest {
        prompt: job.prompt.clone(),
        negative_prompt: job.negative_prompt.clone(),
        image: first,
        last_frame: last,
        reference_images,
        duration_seconds: job.duration_seconds,
        aspect_ratio: job.aspect_ratio.clone(),
        resolution: job.resolution.clone(),
    })
}

async fn read_frame(path: &Path) -> Result<InlineImage, WeatherError> {
    if !path.is_file() {
        return Err(WeatherError::ImageNotFound(path.to_path_buf()));
    }
    Ok(InlineImage::read(path).await?)
}
