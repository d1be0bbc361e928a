//! Local video plumbing through the `ffmpeg` binary: splitting source clips
//! into 1 Hz frames and encoding frame folders back into clips.

use std::{
    env,
    ffi::OsString,
    path::{Path, PathBuf},
    process::ExitStatus,
};

use anyhow::Context;
use thiserror::Error;
use tokio::process::Command;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::{
    internal::frames::has_extension,
    utils::path::{file_name, stem},
};

/// Clip extensions picked up by frame extraction.
pub const SOURCE_VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "mkv"];

/// Overrides the ffmpeg executable.
pub const FFMPEG_ENV: &str = "FFMPEG_BIN";

/// ffmpeg ran but exited non-zero, typically on an unreadable input.
#[derive(Debug, Error)]
#[error("{} exited with {status}: {stderr}", .binary.display())]
pub struct FfmpegFailed {
    pub binary: PathBuf,
    pub status: ExitStatus,
    pub stderr: String,
}

/// Handle on an ffmpeg executable.
#[derive(Debug, Clone)]
pub struct Ffmpeg {
    binary: PathBuf,
}

impl Ffmpeg {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// `$FFMPEG_BIN`, or `ffmpeg` from `PATH`.
    pub fn from_env() -> Self {
        Self::new(env::var_os(FFMPEG_ENV).unwrap_or_else(|| OsString::from("ffmpeg")))
    }

    async fn run(&self, args: &[OsString]) -> anyhow::Result<()> {
        let output = Command::new(&self.binary)
            .args(args)
            .output()
            .await
            .with_context(|| {
                format!(
                    "failed to launch {}; is ffmpeg installed and on PATH?",
                    self.binary.display()
                )
            })?;
        if !output.status.success() {
            return Err(FfmpegFailed {
                binary: self.binary.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Writes the first frame of every second of `video` to
    /// `out_dir/0000.png`, `0001.png`, … and returns how many were written.
    pub async fn extract_frames_per_second(
        &self,
        video: &Path,
        out_dir: &Path,
    ) -> anyhow::Result<usize> {
        tokio::fs::create_dir_all(out_dir)
            .await
            .with_context(|| format!("failed to create {}", out_dir.display()))?;
        self.run(&extract_args(video, out_dir)).await?;
        let written = count_with_extension(out_dir, &["png"])?;
        Ok(written)
    }

    /// Encodes the PNGs of `frames_dir`, in name order, into `out_path`.
    pub async fn frames_to_video(
        &self,
        frames_dir: &Path,
        out_path: &Path,
        fps: u32,
    ) -> anyhow::Result<()> {
        if let Some(parent) = out_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        self.run(&encode_args(frames_dir, out_path, fps)).await
    }
}

/// `ffmpeg` arguments for 1 Hz frame extraction. `round=down` keeps the
/// frame at the start of each second rather than the nearest one.
pub fn extract_args(video: &Path, out_dir: &Path) -> Vec<OsString> {
    vec![
        "-hide_banner".into(),
        "-loglevel".into(),
        "error".into(),
        "-y".into(),
        "-i".into(),
        video.into(),
        "-vf".into(),
        "fps=1:round=down".into(),
        "-start_number".into(),
        "0".into(),
        out_dir.join("%04d.png").into(),
    ]
}

pub fn encode_args(frames_dir: &Path, out_path: &Path, fps: u32) -> Vec<OsString> {
    vec![
        "-hide_banner".into(),
        "-loglevel".into(),
        "error".into(),
        "-y".into(),
        "-framerate".into(),
        fps.max(1).to_string().into(),
        "-pattern_type".into(),
        "glob".into(),
        "-i".into(),
        frames_dir.join("*.png").into(),
        "-c:v".into(),
        "libx264".into(),
        "-pix_fmt".into(),
        "yuv420p".into(),
        out_path.into(),
    ]
}

fn count_with_extension(dir: &Path, extensions: &[&str]) -> anyhow::Result<usize> {
    let mut n = 0;
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && has_extension(&path, extensions) {
            n += 1;
        }
    }
    Ok(n)
}

/// Result of extracting one clip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub video: PathBuf,
    pub frames_dir: PathBuf,
    pub frames: usize,
}

/// Extracts 1 Hz frames for every clip directly inside `input_dir` into
/// `input_dir/<clip stem>/`. A clip ffmpeg cannot decode is logged and
/// skipped; any other failure, such as a missing binary, aborts.
pub async fn extract_all(ffmpeg: &Ffmpeg, input_dir: &Path) -> anyhow::Result<Vec<Extracted>> {
    let mut videos = Vec::new();
    for entry in std::fs::read_dir(input_dir)
        .with_context(|| format!("failed to read {}", input_dir.display()))?
    {
        let path = entry?.path();
        if path.is_file() && has_extension(&path, SOURCE_VIDEO_EXTENSIONS) {
            videos.push(path);
        }
    }
    videos.sort();

    let mut done = Vec::new();
    for video in videos {
        let frames_dir = input_dir.join(stem(&video));
        match ffmpeg.extract_frames_per_second(&video, &frames_dir).await {
            Ok(frames) => {
                info!("Processed {} ({} frames extracted)", file_name(&video), frames);
                done.push(Extracted {
                    video,
                    frames_dir,
                    frames,
                });
            }
            Err(e) if e.is::<FfmpegFailed>() => {
                warn!("Failed to extract frames from {}: {:#}", file_name(&video), e)
            }
            Err(e) => {
                return Err(e.context(format!("failed to extract {}", video.display())));
            }
        }
    }
    Ok(done)
}

/// Directories below `frames_root` that directly contain PNGs, paired with
/// their clip path `out_root/<relative dir>.mp4`.
pub fn export_plan(frames_root: &Path, out_root: &Path) -> anyhow::Result<Vec<(PathBuf, PathBuf)>> {
    let mut plan = Vec::new();
    for entry in WalkDir::new(frames_root).min_depth(1).sort_by_file_name() {
        let entry = entry.with_context(|| format!("failed to walk {}", frames_root.display()))?;
        if !entry.file_type().is_dir() || count_with_extension(entry.path(), &["png"])? == 0 {
            continue;
        }
        let relative = entry.path().strip_prefix(frames_root)?;
        let mut out = out_root.join(relative).into_os_string();
        out.push(".mp4");
        plan.push((entry.path().to_path_buf(), PathBuf::from(out)));
    }
    Ok(plan)
}

/// Encodes every frame folder under `frames_root` into a clip under `out_root`.
pub async fn export_all(
    ffmpeg: &Ffmpeg,
    frames_root: &Path,
    out_root: &Path,
    fps: u32,
) -> anyhow::Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for (frames_dir, out_path) in export_plan(frames_root, out_root)? {
        ffmpeg
            .frames_to_video(&frames_dir, &out_path, fps)
            .await
            .with_context(|| format!("failed to encode {}", frames_dir.display()))?;
        info!("Exported {}", out_path.display());
        written.push(out_path);
    }
    Ok(written)
}
