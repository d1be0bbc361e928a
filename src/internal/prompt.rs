//! Weather prompt templates: YAML files with `positive` and `negative` text.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::debug;

use super::config::{ConfigError, load_yaml};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PromptTemplate {
    pub positive: String,
    pub negative: String,
}

#[derive(Debug, Deserialize)]
struct RawPrompt {
    #[serde(default)]
    positive: Option<String>,
    #[serde(default)]
    negative: Option<String>,
}

impl PromptTemplate {
    pub fn new(positive: impl Into<String>, negative: impl Into<String>) -> Self {
        Self {
            positive: positive.into().trim().to_string(),
            negative: negative.into().trim().to_string(),
        }
    }

    /// Loads a template that must define both `positive` and `negative`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw: RawPrompt = load_yaml(path)?;
        let missing = |field| ConfigError::MissingField {
            path: path.to_path_buf(),
            field,
        };
        let positive = raw.positive.ok_or_else(|| missing("positive"))?;
        let negative = raw.negative.ok_or_else(|| missing("negative"))?;
        Ok(Self::new(positive, negative))
    }

    /// Loads a template where either side may be absent.
    pub fn load_lenient(path: &Path) -> Result<Self, ConfigError> {
        let raw: RawPrompt = load_yaml(path)?;
        Ok(Self::new(
            raw.positive.unwrap_or_default(),
            raw.negative.unwrap_or_default(),
        ))
    }

    /// Prompt text for an image edit; the negative line is always present.
    pub fn image_text(&self) -> String {
        format!("{}\nNegative prompt: {}", self.positive, self.negative)
    }

    /// Prompt text for a video job; the negative line is dropped when empty.
    pub fn video_text(&self) -> String {
        if self.negative.is_empty() {
            self.positive.clone()
        } else {
            self.image_text()
        }
    }
}

/// Loads each template file at most once per run.
#[derive(Debug, Default)]
pub struct PromptCache {
    templates: HashMap<PathBuf, PromptTemplate>,
    lenient: bool,
}

impl PromptCache {
    /// Cache for image prompts (strict).
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache for video prompts (lenient).
    pub fn lenient() -> Self {
        Self {
            lenient: true,
            ..Self::default()
        }
    }

    pub fn get(&mut self, path: &Path) -> Result<&PromptTemplate, ConfigError> {
        if !self.templates.contains_key(path) {
            let template = if self.lenient {
                PromptTemplate::load_lenient(path)?
            } else {
                PromptTemplate::load(path)?
            };
            debug!(path = %path.display(), "loaded prompt template");
            self.templates.insert(path.to_path_buf(), template);
        }
        Ok(&self.templates[path])
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
