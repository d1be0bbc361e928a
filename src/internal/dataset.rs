//! Source dataset housekeeping: gathering reference frames and flattening
//! nested clip folders.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tracing::info;
use walkdir::WalkDir;

use crate::{internal::frames::has_extension, utils::path::file_name};

/// Frames copied from each scene as the start/end references.
pub const REFERENCE_FRAME_NAMES: &[&str] = &["0000.png", "0008.png"];

/// Clip extensions gathered by [`flatten_videos`].
pub const FLATTEN_VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv", "flv", "wmv"];

fn is_numeric_name(path: &Path) -> bool {
    let name = file_name(path);
    !name.is_empty() && name.chars().all(|c| c.is_ascii_digit())
}

/// For every numerically named subdirectory of `source`, copies the
/// [`REFERENCE_FRAME_NAMES`] that exist into `dest/<subdir>/`.
/// Returns the copied destination paths.
pub fn collect_reference_frames(source: &Path, dest: &Path) -> io::Result<Vec<PathBuf>> {
    fs::create_dir_all(dest)?;

    let mut scenes: Vec<PathBuf> = fs::read_dir(source)?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.is_dir() && is_numeric_name(p))
        .collect();
    scenes.sort();

    let mut copied = Vec::new();
    for scene in scenes {
        let target_dir = dest.join(file_name(&scene));
        fs::create_dir_all(&target_dir)?;
        for name in REFERENCE_FRAME_NAMES {
            let from = scene.join(name);
            if from.is_file() {
                let to = target_dir.join(name);
                fs::copy(&from, &to)?;
                info!("Copied {} to {}", from.display(), to.display());
                copied.push(to);
            }
        }
    }
    Ok(copied)
}

/// Moves every clip found anywhere under `dir` to `dir/<n>.<ext>`, numbering
/// from 1 in sorted path order; an occupied name becomes `<n>_<k>.<ext>`.
/// Directories left empty are removed afterwards.
///
/// Returns `(from, to)` for each clip that moved.
pub fn flatten_videos(dir: &Path) -> io::Result<Vec<(PathBuf, PathBuf)>> {
    let mut videos = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1) {
        let entry = entry.map_err(io::Error::other)?;
        if entry.file_type().is_file() && has_extension(entry.path(), FLATTEN_VIDEO_EXTENSIONS) {
            videos.push(entry.into_path());
        }
    }
    videos.sort();

    let mut moved = Vec::new();
    for (idx, from) in videos.into_iter().enumerate() {
        let ext = from
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_else(|| "mp4".to_string());
        let n = idx + 1;

        let mut to = dir.join(format!("{n}.{ext}"));
        if to == from {
            continue;
        }
        let mut counter = 1;
        while to.exists() {
            to = dir.join(format!("{n}_{counter}.{ext}"));
            counter += 1;
        }

        fs::rename(&from, &to)?;
        info!("Moved and renamed: {} -> {}", file_name(&from), file_name(&to));
        moved.push((from, to));
    }

    remove_empty_dirs(dir)?;
    Ok(moved)
}

/// Removes empty directories below `root`, deepest first. `root` itself stays.
fn remove_empty_dirs(root: &Path) -> io::Result<()> {
    for entry in WalkDir::new(root).min_depth(1).contents_first(true) {
        let entry = entry.map_err(io::Error::other)?;
        if entry.file_type().is_dir() && fs::read_dir(entry.path())?.next().is_none() {
            fs::remove_dir(entry.path())?;
            info!("Removed empty directory: {}", file_name(entry.path()));
        }
    }
    Ok(())
}
