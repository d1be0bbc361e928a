//! YAML configuration for the image and video workflows, plus API key lookup.

pub mod image;
pub mod video;

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::de::DeserializeOwned;
use thiserror::Error;

pub use self::image::{ImageConfig, ImageVariant};
pub use self::video::{VideoBatchConfig, VideoDefaults, VideoJobConfig, VideoVariant};

/// Environment variable holding the Gemini / VEO API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{}: missing required field `{field}`", .path.display())]
    MissingField { path: PathBuf, field: &'static str },

    #[error("{}: {message}", .path.display())]
    Invalid { path: PathBuf, message: String },

    #[error(
        "Gemini API key not provided. Set GEMINI_API_KEY or populate the file configured in api_key_path."
    )]
    MissingApiKey,
}

/// Reads and deserializes a YAML file.
pub fn load_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Rejects variant names that cannot serve as a single path component.
pub(crate) fn check_variant_names<'a>(
    path: &Path,
    names: impl IntoIterator<Item = &'a str>,
) -> Result<(), ConfigError> {
    match names
        .into_iter()
        .find(|name| name.trim().is_empty() || name.contains(['/', '\\']))
    {
        Some(name) => Err(ConfigError::Invalid {
            path: path.to_path_buf(),
            message: format!("invalid variant name {name:?}"),
        }),
        None => Ok(()),
    }
}

/// Resolves the API key: `GEMINI_API_KEY` first, then the trimmed contents of
/// `api_key_path` when that file exists.
pub fn resolve_api_key(api_key_path: Option<&Path>) -> Result<String, ConfigError> {
    resolve_api_key_from(env::var(API_KEY_ENV).ok(), api_key_path)
}

pub(crate) fn resolve_api_key_from(
    env_value: Option<String>,
    api_key_path: Option<&Path>,
) -> Result<String, ConfigError> {
    if let Some(key) = env_value.map(|k| k.trim().to_string()).filter(|k| !k.is_empty()) {
        return Ok(key);
    }
    if let Some(path) = api_key_path
        && let Ok(content) = fs::read_to_string(path)
    {
        let key = content.trim();
        if !key.is_empty() {
            tracing::debug!(path = %path.display(), "loaded API key from file");
            return Ok(key.to_string());
        }
    }
    Err(ConfigError::MissingApiKey)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_env_key_wins_over_file() {
        let tmp = TempDir::new().unwrap();
        let key_file = tmp.path().join("key.txt");
        fs::write(&key_file, "from-file\n").unwrap();

        let key = resolve_api_key_from(Some("from-env".into()), Some(&key_file)).unwrap();
        assert_eq!(key, "from-env");
    }

    #[test]
    fn test_key_file_is_trimmed() {
        let tmp = TempDir::new().unwrap();
        let key_file = tmp.path().join("key.txt");
        fs::write(&key_file, "  abc123 \n").unwrap();

        let key = resolve_api_key_from(None, Some(&key_file)).unwrap();
        assert_eq!(key, "abc123");
    }

    #[test]
    fn test_missing_key_everywhere() {
        let tmp = TempDir::new().unwrap();
        let absent = tmp.path().join("nope.txt");
        assert!(matches!(
            resolve_api_key_from(Some("   ".into()), Some(&absent)),
            Err(ConfigError::MissingApiKey)
        ));
        assert!(matches!(
            resolve_api_key_from(None, None),
            Err(ConfigError::MissingApiKey)
        ));
    }

    #[test]
    fn test_load_yaml_reports_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("broken.yaml");
        fs::write(&path, "variants: [").unwrap();

        let err = load_yaml::<serde_yaml::Value>(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("broken.yaml"));
    }
}
