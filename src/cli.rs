//! CLI entry for weather-aug, defining clap subcommands and dispatching each command handler.

use clap::{Parser, Subcommand};

use crate::{command, error::WeatherError};

// The Cli struct represents the root of the command line interface.
#[derive(Parser, Debug)]
#[command(
    name = "weather-aug",
    about = "Weather augmentation of POV riding footage via Gemini image and VEO video generation",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Subcommands; each one's args and `execute` live in the `command` module.
#[derive(Subcommand, Debug)]
enum Commands {
    // Remote generation
    #[command(about = "Re-render every input frame under each configured weather variant")]
    Augment(command::augment::AugmentArgs),
    #[command(about = "Run a single image through every weather variant")]
    Sample(command::sample::SampleArgs),
    #[command(about = "Generate one video from a single VEO job config")]
    Video(command::video::VideoArgs),
    #[command(about = "Generate a video for every scene and weather variant folder")]
    VideoBatch(command::video_batch::VideoBatchArgs),

    // Local dataset preparation
    #[command(about = "Split every clip in a directory into one frame per second")]
    ExtractFrames(command::extract_frames::ExtractFramesArgs),
    #[command(about = "Encode every frame folder into a clip")]
    ExportVideos(command::export_videos::ExportVideosArgs),
    #[command(about = "Copy the 0000/0008 reference frames of each numbered scene")]
    CollectRefs(command::collect_refs::CollectRefsArgs),
    #[command(about = "Move nested clips to the top of a directory as 1.mp4, 2.mp4, ...")]
    FlattenVideos(command::flatten_videos::FlattenVideosArgs),
}

/// Parses the command line and executes the selected command.
/// - Caution: This is a `synchronous` function, it's declared as `async` to be able to use
///   `[tokio::main]`
/// - `args`: parse from command line if it's `None`, otherwise parse from the given args
#[tokio::main]
pub async fn parse(args: Option<&[&str]>) -> Result<(), WeatherError> {
    parse_async(args).await
}

/// `async` version of the [parse] function
pub async fn parse_async(args: Option<&[&str]>) -> Result<(), WeatherError> {
    let args = match args {
        Some(args) => {
            Cli::try_parse_from(args).map_err(|e| WeatherError::InvalidArgument(e.to_string()))?
        }
        None => Cli::parse(),
    };
    match args.command {
        Commands::Augment(args) => command::augment::execute(args).await,
        Commands::Sample(args) => command::sample::execute(args).await,
        Commands::Video(args) => command::video::execute(args).await,
        Commands::VideoBatch(args) => command::video_batch::execute(args).await,
        Commands::ExtractFrames(args) => command::extract_frames::execute(args).await,
        Commands::ExportVideos(args) => command::export_videos::execute(args).await,
        Commands::CollectRefs(args) => command::collect_refs::execute(args),
        Commands::FlattenVideos(args) => command::flatten_videos::execute(args),
    }
}

/// this test is to verify that the CLI can be built without panicking
/// according [clap dock](https://docs.rs/clap/latest/clap/_derive/_tutorial/chapter_4/index.html)
#[test]
fn verify_cli() {
    use clap::CommandFactory;

    Cli::command().debug_assert()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_augment_defaults() {
        let cli = Cli::try_parse_from(["weather-aug", "augment"]).unwrap();
        let Commands::Augment(args) = cli.command else {
            panic!("expected augment");
        };
        assert_eq!(
            args.config,
            std::path::PathBuf::from("configs/gemini_weather.yaml")
        );
        assert_eq!(args.layout, crate::internal::layout::Layout::Scene);
        assert_eq!(args.rate_limit, 0.5);
        assert_eq!(args.retries, 3);
        assert_eq!(args.jobs, 1);
        assert!(!args.overwrite);
    }

    #[test]
    fn test_augment_variant_layout() {
        let cli = Cli::try_parse_from([
            "weather-aug",
            "augment",
            "cfg.yaml",
            "--layout",
            "variant",
            "--jobs",
            "4",
            "--overwrite",
        ])
        .unwrap();
        let Commands::Augment(args) = cli.command else {
            panic!("expected augment");
        };
        assert_eq!(args.layout, crate::internal::layout::Layout::Variant);
        assert_eq!(args.jobs, 4);
        assert!(args.overwrite);
    }

    #[test]
    fn test_export_videos_defaults() {
        let cli = Cli::try_parse_from(["weather-aug", "export-videos"]).unwrap();
        let Commands::ExportVideos(args) = cli.command else {
            panic!("expected export-videos");
        };
        assert_eq!(args.frames_root, std::path::PathBuf::from("outputimg"));
        assert_eq!(args.out_root, std::path::PathBuf::from("outputmp4"));
        assert_eq!(args.fps, 1);
    }

    #[test]
    fn test_collect_refs_requires_both_dirs() {
        assert!(Cli::try_parse_from(["weather-aug", "collect-refs", "shifan"]).is_err());
    }
}
