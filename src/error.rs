//! Top-level error returned by every command.

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::internal::{ai::GenerationError, config::ConfigError};

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Media(#[from] anyhow::Error),

    #[error("Image not found: {}", .0.display())]
    ImageNotFound(PathBuf),

    #[error("Invalid arguments: {0}")]
    InvalidArgument(String),
}
