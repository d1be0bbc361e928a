//! Frame discovery and reference-frame selection.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use walkdir::WalkDir;

use crate::utils::path::stem;

pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Whether `path` has one of [`IMAGE_EXTENSIONS`] (case-insensitive).
pub fn is_image(path: &Path) -> bool {
    has_extension(path, IMAGE_EXTENSIONS)
}

pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
}

/// Sorted immediate subdirectories of `root`. A missing root yields nothing.
pub fn scene_dirs(root: &Path) -> io::Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Ok(Vec::new());
    }
    let mut dirs = Vec::new();
    for entry in fs::read_dir(root)? {
        let path = entry?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// Sorted image files directly inside `dir`.
pub fn images_in(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut images = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_image(&path) {
            images.push(path);
        }
    }
    images.sort();
    Ok(images)
}

/// Sorted image files anywhere below `root`.
pub fn images_under(root: &Path) -> io::Result<Vec<PathBuf>> {
    let mut images = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(io::Error::other)?;
        if entry.file_type().is_file() && is_image(entry.path()) {
            images.push(entry.into_path());
        }
    }
    images.sort();
    Ok(images)
}

/// The frames a video is anchored on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceFrames {
    pub first: PathBuf,
    pub last: PathBuf,
}

/// Picks the start and end frames of a sorted frame list.
///
/// The first frame is the earliest whose stem contains `0000`, falling back to
/// the first entry. The last frame is the latest whose stem contains `0008`
/// or `last` (any case), falling back to the final entry. A single frame
/// serves as both. Returns `None` for an empty list.
pub fn pick_reference_frames(frames: &[PathBuf]) -> Option<ReferenceFrames> {
    let (head, tail) = (frames.first()?, frames.last()?);

    if frames.len() == 1 {
        return Some(ReferenceFrames {
            first: head.clone(),
            last: head.clone(),
        });
    }

    let first = frames
        .iter()
        .find(|f| stem(f).contains("0000"))
        .unwrap_or(head);
    let last = frames
        .iter()
        .rev()
        .find(|f| {
            let s = stem(f);
            s.contains("0008") || s.to_lowercase().contains("last")
        })
        .unwrap_or(tail);

    Some(ReferenceFrames {
        first: first.clone(),
        last: last.clone(),
    })
}
