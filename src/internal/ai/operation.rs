//! Drives a long-running video generation from submission to a file on disk.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use tracing::{debug, info};

use super::generation::{GenerationError, VideoModel, VideoRequest};
use crate::internal::throttle::{MAX_RETRIES, RetryPolicy};

/// Submits `request`, polls every `poll_interval` until the operation is done,
/// and saves the result to `dest` (parent directories are created).
///
/// Submission, each poll and the save are retried on transient failures with
/// `poll_interval` as the base backoff, so a flaky poll does not discard an
/// operation that is still running remotely.
pub async fn generate_video_to<M: VideoModel>(
    model: &M,
    request: &VideoRequest,
    poll_interval: Duration,
    dest: &Path,
) -> Result<PathBuf, GenerationError> {
    let retry = RetryPolicy::new(MAX_RETRIES, poll_interval);

    let mut operation = retry.run(|_| model.submit(request)).await?;
    info!(operation = %operation.name, "submitted video generation operation");

    while !operation.done {
        tokio::time::sleep(poll_interval).await;
        let next = retry.run(|_| model.poll(&operation)).await?;
        operation = next;
        debug!(
            operation = %operation.name,
            status = if operation.done { "done" } else { "running" },
            "polled video operation"
        );
    }

    if let Some(error) = operation.error {
        return Err(GenerationError::OperationFailed(error));
    }
    let video = operation.video.ok_or(GenerationError::NoVideo)?;

    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    retry.run(|_| model.save(&video, dest)).await?;
    info!(path = %dest.display(), "saved video");
    Ok(dest.to_path_buf())
}
