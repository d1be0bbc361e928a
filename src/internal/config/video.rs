//! VEO configs: the per-scene batch (`configs/veo_video_batch.yaml`) and the
//! single job (`configs/veo_video.yaml`).

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};

use super::{ConfigError, check_variant_names, load_yaml};
use crate::{
    internal::ai::{
        generation::ReferenceType,
        providers::gemini::{VEO_3_1, VEO_3_1_GENERATE_PREVIEW},
    },
    utils::path::{config_dir, resolve_relative},
};

/// Batch-wide defaults, overridable per variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoDefaults {
    #[serde(default = "default_duration_seconds")]
    pub duration_seconds: u32,
    #[serde(default)]
    pub aspect_ratio: Option<String>,
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default = "default_poll_interval_seconds")]
    pub poll_interval_seconds: f64,
    #[serde(default = "default_true")]
    pub use_first_frame_reference: bool,
    #[serde(default)]
    pub use_last_frame: bool,
    #[serde(default = "default_reference_type")]
    pub reference_type: String,
}

impl Default for VideoDefaults {
    fn default() -> Self {
        Self {
            duration_seconds: default_duration_seconds(),
            aspect_ratio: None,
            resolution: None,
            poll_interval_seconds: default_poll_interval_seconds(),
            use_first_frame_reference: true,
            use_last_frame: false,
            reference_type: default_reference_type(),
        }
    }
}

/// A weather variant of the video batch; every `Some` overrides the default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoVariant {
    pub name: String,
    pub prompt_file: PathBuf,
    #[serde(default)]
    pub duration_seconds: Option<u32>,
    #[serde(default)]
    pub aspect_ratio: Option<String>,
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default)]
    pub use_first_frame_reference: Option<bool>,
    #[serde(default)]
    pub use_last_frame: Option<bool>,
    #[serde(default)]
    pub reference_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoBatchConfig {
    #[serde(default = "default_batch_model_name")]
    pub model_name: String,
    #[serde(default)]
    pub api_key_path: Option<PathBuf>,
    #[serde(default = "default_batch_input_root")]
    pub input_root: PathBuf,
    #[serde(default = "default_batch_output_root")]
    pub output_root: PathBuf,
    #[serde(default)]
    pub defaults: VideoDefaults,
    #[serde(default)]
    pub variants: Vec<VideoVariant>,
}

/// Settings after merging a variant over the batch defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveVideoSettings {
    pub duration_seconds: u32,
    pub aspect_ratio: Option<String>,
    pub resolution: Option<String>,
    pub poll_interval: Duration,
    pub use_first_frame_reference: bool,
    pub use_last_frame: bool,
    pub reference_type: ReferenceType,
}

impl VideoBatchConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config: Self = load_yaml(path)?;
        let base = config_dir(path);
        config.input_root = resolve_relative(&base, &config.input_root);
        config.output_root = resolve_relative(&base, &config.output_root);
        config.api_key_path = config
            .api_key_path
            .as_deref()
            .map(|p| resolve_relative(&base, p));
        for variant in &mut config.variants {
            variant.prompt_file = resolve_relative(&base, &variant.prompt_file);
        }
        check_variant_names(path, config.variants.iter().map(|v| v.name.as_str()))?;
        // Surface bad reference types before any API call is made.
        for variant in &config.variants {
            config.effective(variant).map_err(|message| ConfigError::Invalid {
                path: path.to_path_buf(),
                message,
            })?;
        }
        Ok(config)
    }

    /// Merges `variant` over [`VideoDefaults`].
    pub fn effective(&self, variant: &VideoVariant) -> Result<EffectiveVideoSettings, String> {
        let d = &self.defaults;
        let reference_type = variant
            .reference_type
            .as_deref()
            .unwrap_or(&d.reference_type)
            .parse::<ReferenceType>()?;

        Ok(EffectiveVideoSettings {
            duration_seconds: variant
                .duration_seconds
                .filter(|&s| s > 0)
                .unwrap_or(d.duration_seconds),
            aspect_ratio: variant.aspect_ratio.clone().or_else(|| d.aspect_ratio.clone()),
            resolution: variant.resolution.clone().or_else(|| d.resolution.clone()),
            poll_interval: poll_interval(d.poll_interval_seconds),
            use_first_frame_reference: variant
                .use_first_frame_reference
                .unwrap_or(d.use_first_frame_reference),
            use_last_frame: variant.use_last_frame.unwrap_or(d.use_last_frame),
            reference_type,
        })
    }
}

/// A single, fully specified video job.
#[derive(Debug, Clone)]
pub struct VideoJobConfig {
    pub model_name: String,
    pub api_key_path: Option<PathBuf>,
    pub first_frame: Option<PathBuf>,
    pub last_frame: Option<PathBuf>,
    pub output_path: PathBuf,
    pub prompt: String,
    pub negative_prompt: Option<String>,
    pub duration_seconds: u32,
    pub aspect_ratio: Option<String>,
    pub resolution: Option<String>,
    pub poll_interval: Duration,
    pub reference_type: ReferenceType,
    pub use_first_frame_reference: bool,
    pub use_last_frame: bool,
}

/// On-disk form of [`VideoJobConfig`].
#[derive(Debug, Deserialize)]
struct RawVideoJobConfig {
    #[serde(default = "default_job_model_name")]
    model_name: String,
    #[serde(default)]
    api_key_path: Option<PathBuf>,
    #[serde(default)]
    first_frame: Option<PathBuf>,
    #[serde(default)]
    last_frame: Option<PathBuf>,
    #[serde(default)]
    output_path: Option<PathBuf>,
    #[serde(default)]
    prompt: Option<String>,
    #[serde(default)]
    negative_prompt: Option<String>,
    #[serde(default = "default_duration_seconds")]
    duration_seconds: u32,
    #[serde(default)]
    aspect_ratio: Option<String>,
    #[serde(default)]
    resolution: Option<String>,
    #[serde(default = "default_poll_interval_seconds")]
    poll_interval_seconds: f64,
    #[serde(default = "default_reference_type")]
    reference_type: String,
    #[serde(default)]
    use_first_frame_reference: bool,
    #[serde(default)]
    use_last_frame: bool,
}

impl VideoJobConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw: RawVideoJobConfig = load_yaml(path)?;
        let base = config_dir(path);
        let missing = |field| ConfigError::MissingField {
            path: path.to_path_buf(),
            field,
        };

        let output_path = raw.output_path.ok_or_else(|| missing("output_path"))?;
        let prompt = raw
            .prompt
            .map(|p| p.trim().to_string())
            .ok_or_else(|| missing("prompt"))?;
        let reference_type =
            raw.reference_type
                .parse::<ReferenceType>()
                .map_err(|message| ConfigError::Invalid {
                    path: path.to_path_buf(),
                    message,
                })?;
        let resolve = |p: PathBuf| resolve_relative(&base, &p);

        Ok(Self {
            model_name: raw.model_name,
            api_key_path: raw.api_key_path.map(resolve),
            first_frame: raw.first_frame.map(resolve),
            last_frame: raw.last_frame.map(resolve),
            output_path: resolve(output_path),
            prompt,
            negative_prompt: raw
                .negative_prompt
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
            duration_seconds: raw.duration_seconds,
            aspect_ratio: raw.aspect_ratio,
            resolution: raw.resolution,
            poll_interval: poll_interval(raw.poll_interval_seconds),
            reference_type,
            use_first_frame_reference: raw.use_first_frame_reference,
            use_last_frame: raw.use_last_frame,
        })
    }
}

fn poll_interval(seconds: f64) -> Duration {
    if seconds.is_finite() && seconds > 0.0 {
        Duration::from_secs_f64(seconds)
    } else {
        Duration::from_secs_f64(default_poll_interval_seconds())
    }
}

fn default_duration_seconds() -> u32 {
    6
}

fn default_poll_interval_seconds() -> f64 {
    10.0
}

fn default_true() -> bool {
    true
}

fn default_reference_type() -> String {
    "ASSET".to_string()
}

fn default_batch_model_name() -> String {
    VEO_3_1_GENERATE_PREVIEW.to_string()
}

fn default_job_model_name() -> String {
    VEO_3_1.to_string()
}

fn default_batch_input_root() -> PathBuf {
    PathBuf::from("outputimg")
}

fn default_batch_output_root() -> PathBuf {
    PathBuf::from("outputmp4")
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_batch_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = write(
            tmp.path(),
            "batch.yaml",
            "variants:\n  - name: fog\n    prompt_file: prompts/fog.yaml\n",
        );
        let config = VideoBatchConfig::load(&path).unwrap();

        assert_eq!(config.model_name, "models/veo-3.1-generate-preview");
        assert_eq!(config.input_root, tmp.path().join("outputimg"));
        assert_eq!(config.output_root, tmp.path().join("outputmp4"));
        assert_eq!(
            config.variants[0].prompt_file,
            tmp.path().join("prompts/fog.yaml")
        );

        let eff = config.effective(&config.variants[0]).unwrap();
        assert_eq!(
            eff,
            EffectiveVideoSettings {
                duration_seconds: 6,
                aspect_ratio: None,
                resolution: None,
                poll_interval: Duration::from_secs(10),
                use_first_frame_reference: true,
                use_last_frame: false,
                reference_type: ReferenceType::Asset,
            }
        );
    }

    #[test]
    fn test_variant_overrides_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = write(
            tmp.path(),
            "batch.yaml",
            r#"
defaults:
  duration_seconds: 8
  aspect_ratio: "16:9"
  resolution: 720p
  poll_interval_seconds: 2.5
  use_last_frame: true
variants:
  - name: night_rain
    prompt_file: night_rain.yaml
    duration_seconds: 4
    resolution: 1080p
    use_first_frame_reference: false
    reference_type: style
  - name: sunny
    prompt_file: sunny.yaml
"#,
        );
        let config = VideoBatchConfig::load(&path).unwrap();

        let night = config.effective(&config.variants[0]).unwrap();
        assert_eq!(night.duration_seconds, 4);
        assert_eq!(night.aspect_ratio.as_deref(), Some("16:9"));
        assert_eq!(night.resolution.as_deref(), Some("1080p"));
        assert_eq!(night.poll_interval, Duration::from_millis(2500));
        assert!(!night.use_first_frame_reference);
        assert!(night.use_last_frame);
        assert_eq!(night.reference_type, ReferenceType::Style);

        let sunny = config.effective(&config.variants[1]).unwrap();
        assert_eq!(sunny.duration_seconds, 8);
        assert_eq!(sunny.resolution.as_deref(), Some("720p"));
        assert!(sunny.use_first_frame_reference);
    }

    #[test]
    fn test_batch_rejects_unknown_reference_type() {
        let tmp = TempDir::new().unwrap();
        let path = write(
            tmp.path(),
            "batch.yaml",
            "variants:\n  - name: fog\n    prompt_file: fog.yaml\n    reference_type: subject\n",
        );
        let err = VideoBatchConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid reference_type: SUBJECT"));
    }

    #[test]
    fn test_batch_rejects_path_like_variant_names() {
        let tmp = TempDir::new().unwrap();
        for name in ["\"\"", "../fog", "rain\\night"] {
            let path = write(
                tmp.path(),
                "batch.yaml",
                &format!("variants:\n  - name: {name}\n    prompt_file: fog.yaml\n"),
            );
            let err = VideoBatchConfig::load(&path).unwrap_err();
            let ConfigError::Invalid { message, .. } = &err else {
                panic!("{name}: unexpected error {err}");
            };
            assert!(message.starts_with("invalid variant name"), "{name}: {message}");
        }
    }

    #[test]
    fn test_single_job_config() {
        let tmp = TempDir::new().unwrap();
        let path = write(
            tmp.path(),
            "veo_video.yaml",
            r#"
first_frame: frames/0000.png
last_frame: frames/0008.png
output_path: out/clip.mp4
prompt: "  POV ride through fog  "
negative_prompt: ""
use_last_frame: true
"#,
        );
        let job = VideoJobConfig::load(&path).unwrap();

        assert_eq!(job.model_name, "veo-3.1");
        assert_eq!(job.first_frame, Some(tmp.path().join("frames/0000.png")));
        assert_eq!(job.last_frame, Some(tmp.path().join("frames/0008.png")));
        assert_eq!(job.output_path, tmp.path().join("out/clip.mp4"));
        assert_eq!(job.prompt, "POV ride through fog");
        assert_eq!(job.negative_prompt, None);
        assert_eq!(job.duration_seconds, 6);
        assert_eq!(job.poll_interval, Duration::from_secs(10));
        assert!(!job.use_first_frame_reference);
        assert!(job.use_last_frame);
    }

    #[test]
    fn test_single_job_requires_prompt_and_output() {
        let tmp = TempDir::new().unwrap();
        let path = write(tmp.path(), "a.yaml", "output_path: x.mp4\n");
        assert!(matches!(
            VideoJobConfig::load(&path),
            Err(ConfigError::MissingField {
                field: "prompt",
                ..
            })
        ));

        let path = write(tmp.path(), "b.yaml", "prompt: hi\n");
        assert!(matches!(
            VideoJobConfig::load(&path),
            Err(ConfigError::MissingField {
                field: "output_path",
                ..
            })
        ));
    }
}
