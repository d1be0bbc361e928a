//! Implements `sample`: one source image through every configured weather
//! variant, for checking prompts before a full batch.

use std::path::{Path, PathBuf};

use clap::Parser;
use colored::Colorize;

use crate::{
    command::{augment::write_output, gemini_client},
    error::WeatherError,
    internal::{
        ai::{
            GenerationError, ImageModel,
            generation::{ImageEditRequest, InlineImage},
        },
        config::ImageConfig,
        imaging::normalize_png,
        layout::variant_image_output,
        prompt::PromptCache,
        throttle::{DEFAULT_RATE_LIMIT_QPS, MAX_RETRIES, RateLimiter, RetryPolicy},
    },
    utils::path::file_name,
};

#[derive(Parser, Debug, Clone)]
pub struct SampleArgs {
    /// Image batch config
    #[clap(default_value = "configs/gemini_weather.yaml")]
    pub config: PathBuf,
    /// Source frame to augment
    #[clap(long, default_value = "input/test/0004.png")]
    pub image: PathBuf,
}

pub async fn execute(args: SampleArgs) -> Result<(), WeatherError> {
    if !args.image.is_file() {
        return Err(WeatherError::ImageNotFound(args.image));
    }
    let config = ImageConfig::load(&args.config)?;
    let client = gemini_client(config.api_key_path.as_deref())?;
    let model = client.image_model(&config.model_name);

    for path in run(&model, &config, &args.image).await? {
        println!("{} {}", "Saved:".green(), path.display());
    }
    Ok(())
}

/// Writes `<output_root>/<weather>/<stem>_<weather>.png` for every variant.
pub async fn run<M: ImageModel>(
    model: &M,
    config: &ImageConfig,
    image: &Path,
) -> Result<Vec<PathBuf>, WeatherError> {
    if !image.is_file() {
        return Err(WeatherError::ImageNotFound(image.to_path_buf()));
    }
    let source = InlineImage::read(image).await?;
    let limiter = RateLimiter::per_second(DEFAULT_RATE_LIMIT_QPS);
    let retry = RetryPolicy::new(MAX_RETRIES, limiter.interval());
    let mut prompts = PromptCache::new();
    let name = PathBuf::from(file_name(image));

    let mut saved = Vec::new();
    for variant in &config.variants {
        let request = ImageEditRequest {
            prompt: prompts.get(&variant.prompt_file)?.image_text(),
            image: source.clone(),
            sampling: variant.sampling(),
        };
        let (request, limiter) = (&request, &limiter);
        let png = retry
            .run(move |_| async move {
                limiter.acquire().await;
                let raw = model.edit_image(request).await?;
                normalize_png(&raw, config.output_width, config.output_height)
                    .map_err(GenerationError::from)
            })
            .await?;

        let output = variant_image_output(&config.output_root, &variant.name, &name);
        write_output(&output, &png).await?;
        saved.push(output);
    }
    Ok(saved)
}
