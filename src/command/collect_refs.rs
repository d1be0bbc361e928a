//! Implements `collect-refs`.

use std::path::PathBuf;

use clap::Parser;

use crate::{error::WeatherError, internal::dataset::collect_reference_frames};

#[derive(Parser, Debug, Clone)]
pub struct CollectRefsArgs {
    /// Directory of numbered scene folders
    pub source: PathBuf,
    /// Directory the reference frames are copied into
    pub dest: PathBuf,
}

pub fn execute(args: CollectRefsArgs) -> Result<(), WeatherError> {
    let copied = collect_reference_frames(&args.source, &args.dest)?;
    println!("Image copying completed ({} files).", copied.len());
    Ok(())
}
