//! Output tree conventions.
//!
//! ```text
//! input/<scene>/<frame>.png
//!   -> outputimg/<scene>/<weather>/<frame>_<weather>.png
//!   -> outputmp4/<scene>/<weather>/<scene>_<weather>.mp4
//! ```

use std::path::{Path, PathBuf};

use clap::ValueEnum;

use crate::utils::path::stem;

/// How augmented frames are grouped under the output root.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, ValueEnum)]
pub enum Layout {
    /// `<out>/<scene>/<weather>/…`, one level of scene folders under the input root.
    #[default]
    Scene,
    /// `<out>/<weather>/<relative dir>/…`, every image below the input root.
    Variant,
}

/// `<stem>_<weather>.png`
pub fn augmented_file_name(source: &Path, weather: &str) -> String {
    format!("{}_{}.png", stem(source), weather)
}

/// `<out>/<scene>/<weather>/<stem>_<weather>.png`
pub fn scene_image_output(out_root: &Path, scene: &str, weather: &str, source: &Path) -> PathBuf {
    out_root
        .join(scene)
        .join(weather)
        .join(augmented_file_name(source, weather))
}

/// `<out>/<weather>/<relative parent>/<stem>_<weather>.png`
///
/// `relative` is the source path relative to the input root.
pub fn variant_image_output(out_root: &Path, weather: &str, relative: &Path) -> PathBuf {
    let mut dir = out_root.join(weather);
    if let Some(parent) = relative.parent() {
        dir.push(parent);
    }
    dir.join(augmented_file_name(relative, weather))
}

/// `<out>/<scene>/<weather>/<scene>_<weather>.mp4`
pub fn video_output(out_root: &Path, scene: &str, weather: &str) -> PathBuf {
    out_root
        .join(scene)
        .join(weather)
        .join(format!("{scene}_{weather}.mp4"))
}
