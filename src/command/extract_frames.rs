//! Implements `extract-frames`: splits each clip in a directory into one
//! frame per second.

use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;

use crate::{
    error::WeatherError,
    internal::media::{Ffmpeg, extract_all},
};

#[derive(Parser, Debug, Clone)]
pub struct ExtractFramesArgs {
    /// Directory holding the source clips
    pub input_dir: PathBuf,
}

pub async fn execute(args: ExtractFramesArgs) -> Result<(), WeatherError> {
    let done = extract_all(&Ffmpeg::from_env(), &args.input_dir).await?;
    for clip in &done {
        println!(
            "{} {} ({} frames)",
            "extracted".green(),
            clip.frames_dir.display(),
            clip.frames
        );
    }
    Ok(())
}
