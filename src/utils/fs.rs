//! Output writes that never leave a partial file at the final path.

use std::{
    io,
    path::{Path, PathBuf},
};

/// `<dest>.part`, the staging file a write goes through before it is renamed.
pub fn part_path(dest: &Path) -> PathBuf {
    let mut staged = dest.as_os_str().to_owned();
    staged.push(".part");
    PathBuf::from(staged)
}

/// Writes `bytes` to [`part_path`] and renames it onto `dest` once complete.
pub async fn write_atomic(dest: &Path, bytes: &[u8]) -> io::Result<()> {
    let part = part_path(dest);
    if let Err(e) = tokio::fs::write(&part, bytes).await {
        let _ = tokio::fs::remove_file(&part).await;
        return Err(e);
    }
    tokio::fs::rename(&part, dest).await
}
