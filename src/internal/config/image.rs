//! Image augmentation config (`configs/gemini_weather.yaml`).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{ConfigError, check_variant_names, load_yaml};
use crate::{
    internal::ai::{generation::SamplingConfig, providers::gemini::GEMINI_2_5_FLASH_IMAGE},
    utils::path::{config_dir, resolve_relative},
};

/// One weather variant of the image batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageVariant {
    /// Weather name; also the output folder and file suffix.
    pub name: String,
    /// Prompt template YAML, relative to the config file.
    pub prompt_file: PathBuf,
    /// Sampling temperature.
    #[serde(default = "default_creativity")]
    pub creativity: f64,
    /// Kept for config compatibility; the API exposes no equivalent knob.
    #[serde(default = "default_fidelity")]
    pub fidelity: f64,
}

impl ImageVariant {
    pub fn sampling(&self) -> SamplingConfig {
        SamplingConfig::with_temperature(self.creativity)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    #[serde(default = "default_model_name")]
    pub model_name: String,
    #[serde(default = "default_output_width")]
    pub output_width: u32,
    #[serde(default = "default_output_height")]
    pub output_height: u32,
    #[serde(default = "default_input_root")]
    pub input_root: PathBuf,
    #[serde(default = "default_output_root")]
    pub output_root: PathBuf,
    #[serde(default)]
    pub api_key_path: Option<PathBuf>,
    #[serde(default)]
    pub variants: Vec<ImageVariant>,
}

fn default_creativity() -> f64 {
    0.2
}

fn default_fidelity() -> f64 {
    0.7
}

fn default_model_name() -> String {
    GEMINI_2_5_FLASH_IMAGE.to_string()
}

fn default_output_width() -> u32 {
    1344
}

fn default_output_height() -> u32 {
    768
}

fn default_input_root() -> PathBuf {
    PathBuf::from("input")
}

fn default_output_root() -> PathBuf {
    PathBuf::from("outputimg")
}

impl ImageConfig {
    /// Loads the config and resolves every path against the config's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config: Self = load_yaml(path)?;
        config.resolve_paths(&config_dir(path));
        config.validate(path)?;
        Ok(config)
    }

    fn resolve_paths(&mut self, base: &Path) {
        self.input_root = resolve_relative(base, &self.input_root);
        self.output_root = resolve_relative(base, &self.output_root);
        self.api_key_path = self
            .api_key_path
            .as_deref()
            .map(|p| resolve_relative(base, p));
        for variant in &mut self.variants {
            variant.prompt_file = resolve_relative(base, &variant.prompt_file);
        }
    }

    fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        if self.output_width == 0 || self.output_height == 0 {
            return Err(ConfigError::Invalid {
                path: path.to_path_buf(),
                message: format!(
                    "output size must be non-zero, got {}x{}",
                    self.output_width, self.output_height
                ),
            });
        }
        check_variant_names(path, self.variants.iter().map(|v| v.name.as_str()))
    }
}
