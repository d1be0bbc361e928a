//! Implements `export-videos`: encodes every frame folder into a clip.

use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;

use crate::{
    error::WeatherError,
    internal::media::{Ffmpeg, export_all},
};

#[derive(Parser, Debug, Clone)]
pub struct ExportVideosArgs {
    /// Root of the frame folders
    #[clap(long, default_value = "outputimg")]
    pub frames_root: PathBuf,
    /// Root the clips are written under, mirroring the frame tree
    #[clap(long, default_value = "outputmp4")]
    pub out_root: PathBuf,
    /// Frames per second of the encoded clips
    #[clap(long, default_value_t = 1)]
    pub fps: u32,
}

pub async fn execute(args: ExportVideosArgs) -> Result<(), WeatherError> {
    let written =
        export_all(&Ffmpeg::from_env(), &args.frames_root, &args.out_root, args.fps).await?;
    println!("{} {} clips", "exported".green(), written.len());
    Ok(())
}
