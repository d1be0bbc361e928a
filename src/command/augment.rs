//! Implements `augment`, the Gemini image batch: every input frame is edited
//! once per weather variant and written to the output tree.

use std::path::{Path, PathBuf};

use clap::Parser;
use colored::Colorize;
use futures::{StreamExt, TryStreamExt, stream};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use crate::{
    command::gemini_client,
    error::WeatherError,
    internal::{
        ai::{
            GenerationError, ImageModel,
            generation::{ImageEditRequest, InlineImage, SamplingConfig},
        },
        config::ImageConfig,
        frames::{images_in, images_under, scene_dirs},
        imaging::normalize_png,
        layout::{Layout, scene_image_output, variant_image_output},
        prompt::PromptCache,
        throttle::{DEFAULT_RATE_LIMIT_QPS, MAX_RETRIES, RateLimiter, RetryPolicy},
    },
    utils::{fs::write_atomic, path::file_name},
};

#[derive(Parser, Debug, Clone)]
pub struct AugmentArgs {
    /// Image batch config
    #[clap(default_value = "configs/gemini_weather.yaml")]
    pub config: PathBuf,
    /// Output grouping: per scene folder, or per weather variant
    #[clap(long, value_enum, default_value_t = Layout::Scene)]
    pub layout: Layout,
    /// Maximum requests started per second
    #[clap(long, default_value_t = DEFAULT_RATE_LIMIT_QPS)]
    pub rate_limit: f64,
    /// Attempts per frame before the batch fails
    #[clap(long, default_value_t = MAX_RETRIES)]
    pub retries: u32,
    /// Frames edited concurrently
    #[clap(short, long, default_value_t = 1)]
    pub jobs: usize,
    /// Regenerate outputs that already exist
    #[clap(long)]
    pub overwrite: bool,
}

/// Batch options independent of the config file.
#[derive(Debug, Clone, Copy)]
pub struct AugmentOptions {
    pub layout: Layout,
    pub rate_limit_qps: f64,
    pub retries: u32,
    pub jobs: usize,
    pub overwrite: bool,
}

impl Default for AugmentOptions {
    fn default() -> Self {
        Self {
            layout: Layout::Scene,
            rate_limit_qps: DEFAULT_RATE_LIMIT_QPS,
            retries: MAX_RETRIES,
            jobs: 1,
            overwrite: false,
        }
    }
}

impl From<&AugmentArgs> for AugmentOptions {
    fn from(args: &AugmentArgs) -> Self {
        Self {
            layout: args.layout,
            rate_limit_qps: args.rate_limit,
            retries: args.retries,
            jobs: args.jobs,
            overwrite: args.overwrite,
        }
    }
}

/// One frame under one weather variant.
#[derive(Debug, Clone)]
pub struct ImageJob {
    pub source: PathBuf,
    pub output: PathBuf,
    pub weather: String,
    pub prompt: String,
    pub sampling: SamplingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AugmentSummary {
    pub generated: Vec<PathBuf>,
    pub skipped: usize,
}

pub async fn execute(args: AugmentArgs) -> Result<(), WeatherError> {
    let config = ImageConfig::load(&args.config)?;
    let client = gemini_client(config.api_key_path.as_deref())?;
    let model = client.image_model(&config.model_name);

    let summary = run(&model, &config, AugmentOptions::from(&args)).await?;
    println!(
        "{} {} generated, {} skipped",
        "done:".green().bold(),
        summary.generated.len(),
        summary.skipped
    );
    Ok(())
}

/// Lists every (frame, variant) pair for `layout`, in output order.
pub fn plan_jobs(
    config: &ImageConfig,
    layout: Layout,
    prompts: &mut PromptCache,
) -> Result<Vec<ImageJob>, WeatherError> {
    let mut jobs = Vec::new();
    match layout {
        Layout::Scene => {
            for scene in scene_dirs(&config.input_root)? {
                let images = images_in(&scene)?;
                if images.is_empty() {
                    continue;
                }
                let scene_name = file_name(&scene);
                for variant in &config.variants {
                    let prompt = prompts.get(&variant.prompt_file)?.image_text();
                    for image in &images {
                        jobs.push(ImageJob {
                            source: image.clone(),
                            output: scene_image_output(
                                &config.output_root,
                                &scene_name,
                                &variant.name,
                                image,
                            ),
                            weather: variant.name.clone(),
                            prompt: prompt.clone(),
                            sampling: variant.sampling(),
                        });
                    }
                }
            }
        }
        Layout::Variant => {
            let images = images_under(&config.input_root)?;
            for variant in &config.variants {
                let prompt = prompts.get(&variant.prompt_file)?.image_text();
                for image in &images {
                    let relative = image.strip_prefix(&config.input_root).unwrap_or(image);
                    jobs.push(ImageJob {
                        source: image.clone(),
                        output: variant_image_output(&config.output_root, &variant.name, relative),
                        weather: variant.name.clone(),
                        prompt: prompt.clone(),
                        sampling: variant.sampling(),
                    });
                }
            }
        }
    }
    Ok(jobs)
}

/// Runs the image batch against `model`.
///
/// Existing outputs are skipped unless `overwrite` is set. Request starts are
/// paced by the rate limit across all concurrent jobs, and a job that still
/// fails after its retries aborts the batch.
pub async fn run<M: ImageModel>(
    model: &M,
    config: &ImageConfig,
    options: AugmentOptions,
) -> Result<AugmentSummary, WeatherError> {
    let mut prompts = PromptCache::new();
    let jobs = plan_jobs(config, options.layout, &mut prompts)?;
    let (pending, existing): (Vec<_>, Vec<_>) = jobs
        .into_iter()
        .partition(|job| options.overwrite || !job.output.exists());
    for job in &existing {
        debug!(path = %job.output.display(), "output exists, skipping");
    }
    info!(
        pending = pending.len(),
        skipped = existing.len(),
        templates = prompts.len(),
        "planned image batch"
    );

    let limiter = RateLimiter::per_second(options.rate_limit_qps);
    let retry = RetryPolicy::new(options.retries, limiter.interval());
    let bar = progress_bar(pending.len());
    let size = (config.output_width, config.output_height);

    let (limiter, retry, bar) = (&limiter, &retry, &bar);
    let generated: Vec<PathBuf> = stream::iter(pending)
        .map(|job| async move {
            let out = edit_one(model, &job, size, limiter, retry).await?;
            bar.inc(1);
            Ok::<_, WeatherError>(out)
        })
        .buffered(options.jobs.max(1))
        .try_collect()
        .await?;
    bar.finish_and_clear();

    Ok(AugmentSummary {
        generated,
        skipped: existing.len(),
    })
}

/// Edits one frame and writes the normalized PNG.
async fn edit_one<M: ImageModel>(
    model: &M,
    job: &ImageJob,
    (width, height): (u32, u32),
    limiter: &RateLimiter,
    retry: &RetryPolicy,
) -> Result<PathBuf, WeatherError> {
    let request = ImageEditRequest {
        prompt: job.prompt.clone(),
        image: InlineImage::read(&job.source).await?,
        sampling: job.sampling,
    };
    let request = &request;

    let png = retry
        .run(move |_| async move {
            limiter.acquire().await;
            let raw = model.edit_image(request).await?;
            normalize_png(&raw, width, height).map_err(GenerationError::from)
        })
        .await?;

    write_output(&job.output, &png).await?;
    info!(weather = %job.weather, "saved {}", job.output.display());
    Ok(job.output.clone())
}

pub(crate) async fn write_output(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    write_atomic(path, bytes).await
}

fn progress_bar(len: usize) -> ProgressBar {
    let bar = ProgressBar::new(len as u64);
    let template = "{bar:40.cyan/blue} {pos}/{len} [{elapsed_precise}] {msg}";
    if let Ok(style) = ProgressStyle::with_template(template) {
        bar.set_style(style);
    }
    bar
}
