//! Implements `video-batch`: one VEO clip per scene and weather variant,
//! anchored on the augmented frames of that variant.

use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use tracing::info;

use crate::{
    command::{gemini_client, video},
    error::WeatherError,
    internal::{
        ai::VideoModel,
        config::{VideoBatchConfig, VideoJobConfig, VideoVariant, video::EffectiveVideoSettings},
        frames::{ReferenceFrames, images_in, pick_reference_frames, scene_dirs},
        layout::video_output,
        prompt::PromptCache,
    },
    utils::path::file_name,
};

#[derive(Parser, Debug, Clone)]
pub struct VideoBatchArgs {
    /// Video batch config
    #[clap(default_value = "configs/veo_video_batch.yaml")]
    pub config: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoBatchSummary {
    pub generated: Vec<PathBuf>,
    pub skipped: usize,
}

pub async fn execute(args: VideoBatchArgs) -> Result<(), WeatherError> {
    let config = VideoBatchConfig::load(&args.config)?;
    let client = gemini_client(config.api_key_path.as_deref())?;
    let model = client.video_model(&config.model_name);

    let summary = run(&model, &config).await?;
    println!(
        "{} {} videos generated, {} already present",
        "done:".green().bold(),
        summary.generated.len(),
        summary.skipped
    );
    Ok(())
}

/// Walks `input_root/<scene>/<variant>/` and generates every missing clip,
/// one at a time. Variants without a folder or without frames are ignored.
pub async fn run<M: VideoModel>(
    model: &M,
    config: &VideoBatchConfig,
) -> Result<VideoBatchSummary, WeatherError> {
    let mut prompts = PromptCache::lenient();
    let mut summary = VideoBatchSummary::default();

    for scene in scene_dirs(&config.input_root)? {
        let scene_name = file_name(&scene);
        for variant in &config.variants {
            let folder = scene.join(&variant.name);
            if !folder.is_dir() {
                continue;
            }
            let Some(frames) = pick_reference_frames(&images_in(&folder)?) else {
                continue;
            };

            let output = video_output(&config.output_root, &scene_name, &variant.name);
            if output.exists() {
                info!(path = %output.display(), "video exists, skipping");
                summary.skipped += 1;
                continue;
            }

            let prompt = prompts.get(&variant.prompt_file)?.video_text();
            let job = job_for(config, variant, frames, output, prompt)?;
            info!(scene = %scene_name, weather = %variant.name, "generating video");
            summary.generated.push(video::run(model, &job).await?);
        }
    }
    Ok(summary)
}

/// The single-job config for one scene/variant pair.
pub fn job_for(
    config: &VideoBatchConfig,
    variant: &VideoVariant,
    frames: ReferenceFrames,
    output_path: PathBuf,
    prompt: String,
) -> Result<VideoJobConfig, WeatherError> {
    let EffectiveVideoSettings {
        duration_seconds,
        aspect_ratio,
        resolution,
        poll_interval,
        use_first_frame_reference,
        use_last_frame,
        reference_type,
    } = config
        .effective(variant)
        .map_err(WeatherError::InvalidArgument)?;

    Ok(VideoJobConfig {
        model_name: config.model_name.clone(),
        api_key_path: config.api_key_path.clone(),
        first_frame: Some(frames.first),
        last_frame: use_last_frame.then_some(frames.last),
        output_path,
        prompt,
        negative_prompt: None,
        duration_seconds,
        aspect_ratio,
        resolution,
        poll_interval,
        reference_type,
        use_first_frame_reference,
        use_last_frame,
    })
}
