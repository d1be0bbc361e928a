use std::{fmt, path::Path, str::FromStr};

/// Image bytes with their MIME type, as sent inline to the API.
#[derive(Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl fmt::Debug for InlineImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InlineImage")
            .field("mime_type", &self.mime_type)
            .field("data", &format_args!("{} bytes", self.data.len()))
            .finish()
    }
}

impl InlineImage {
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }

    pub fn png(data: Vec<u8>) -> Self {
        Self::new("image/png", data)
    }

    /// Reads an image file, deriving the MIME type from its extension.
    pub async fn read(path: &Path) -> std::io::Result<Self> {
        let data = tokio::fs::read(path).await?;
        Ok(Self::new(mime_type_for(path), data))
    }
}

/// MIME type for an image path; anything that is not a JPEG is sent as PNG.
pub fn mime_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "image/png",
    }
}

/// Sampling parameters for image edits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingConfig {
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
}

impl SamplingConfig {
    pub fn with_temperature(temperature: f64) -> Self {
        Self {
            temperature,
            ..Default::default()
        }
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            top_p: 0.9,
            top_k: 40,
        }
    }
}

/// A single prompt-guided edit of one source frame.
#[derive(Debug, Clone)]
pub struct ImageEditRequest {
    pub prompt: String,
    pub image: InlineImage,
    pub sampling: SamplingConfig,
}

/// How the video model should use a reference image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReferenceType {
    #[default]
    Asset,
    Style,
}

impl ReferenceType {
    /// Wire value expected by the video API.
    pub fn as_api_str(&self) -> &'static str {
        match self {
            ReferenceType::Asset => "asset",
            ReferenceType::Style => "style",
        }
    }
}

impl FromStr for ReferenceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ASSET" => Ok(ReferenceType::Asset),
            "STYLE" => Ok(ReferenceType::Style),
            other => Err(format!("Invalid reference_type: {other}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReferenceImage {
    pub image: InlineImage,
    pub reference_type: ReferenceType,
}

/// A video generation job. Optional fields are left out of the request
/// entirely when `None`.
#[derive(Debug, Clone, Default)]
pub struct VideoRequest {
    pub prompt: String,
    pub negative_prompt: Option<String>,
    /// Starting frame of the clip.
    pub image: Option<InlineImage>,
    /// Frame the clip should end on.
    pub last_frame: Option<InlineImage>,
    pub reference_images: Vec<ReferenceImage>,
    pub duration_seconds: u32,
    pub aspect_ratio: Option<String>,
    pub resolution: Option<String>,
}

/// Where a finished video can be found.
#[derive(Clone, PartialEq, Eq)]
pub enum GeneratedVideo {
    Bytes(Vec<u8>),
    Uri(String),
}

impl fmt::Debug for GeneratedVideo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneratedVideo::Bytes(b) => write!(f, "Bytes({} bytes)", b.len()),
            GeneratedVideo::Uri(uri) => f.debug_tuple("Uri").field(uri).finish(),
        }
    }
}

/// Snapshot of a long-running generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub name: String,
    pub done: bool,
    pub error: Option<String>,
    pub video: Option<GeneratedVideo>,
}

impl Operation {
    pub fn pending(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            done: false,
            error: None,
            video: None,
        }
    }
}
