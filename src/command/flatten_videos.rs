//! Implements `flatten-videos`.

use std::path::PathBuf;

use clap::Parser;

use crate::{error::WeatherError, internal::dataset::flatten_videos};

#[derive(Parser, Debug, Clone)]
pub struct FlattenVideosArgs {
    /// Directory whose nested clips are moved to its top level
    pub dir: PathBuf,
}

pub fn execute(args: FlattenVideosArgs) -> Result<(), WeatherError> {
    let moved = flatten_videos(&args.dir)?;
    println!(
        "All videos have been flattened and renamed ({} moved).",
        moved.len()
    );
    Ok(())
}
