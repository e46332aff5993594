//! Audio acquisition for the analysis pipeline.
//!
//! Materializes a video reference as a uniquely named local audio file using
//! yt-dlp. The file is scratch state owned by a single pipeline run and is
//! removed when the [`AudioAsset`] is dropped.

use crate::error::FetchError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// A transient, uniquely named local audio file.
///
/// Owned exclusively by one pipeline run. The backing file is removed when
/// the asset is dropped, whichever way the run ends.
#[derive(Debug)]
pub struct AudioAsset {
    path: PathBuf,
    id: Uuid,
}

impl AudioAsset {
    pub(crate) fn new(path: PathBuf, id: Uuid) -> Self {
        Self { path, id }
    }

    /// Path of the scratch file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Uniqueness token for this asset.
    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl Drop for AudioAsset {
    fn drop(&mut self) {
        if self.path.exists() {
            match std::fs::remove_file(&self.path) {
                Ok(()) => debug!("Removed scratch audio file {}", self.path.display()),
                Err(e) => warn!("Failed to clean up {}: {}", self.path.display(), e),
            }
        }
    }
}

/// Trait for services that turn a video reference into a local audio asset.
#[async_trait]
pub trait AudioFetcher: Send + Sync {
    /// Fetch audio for the given video reference.
    ///
    /// The reference is opaque here; whether it points at a real video is
    /// only discovered by the success or failure of the fetch itself.
    async fn fetch(&self, video_ref: &str) -> Result<AudioAsset, FetchError>;
}

/// yt-dlp based audio fetcher.
pub struct YtDlpFetcher {
    temp_dir: PathBuf,
}

impl YtDlpFetcher {
    /// Create a fetcher writing scratch files into `temp_dir`.
    pub fn new(temp_dir: PathBuf) -> Self {
        Self { temp_dir }
    }
}

#[async_trait]
impl AudioFetcher for YtDlpFetcher {
    #[instrument(skip(self), fields(video_ref = %video_ref))]
    async fn fetch(&self, video_ref: &str) -> Result<AudioAsset, FetchError> {
        std::fs::create_dir_all(&self.temp_dir)
            .map_err(|e| FetchError::ExternalFailure(format!("Cannot create temp dir: {e}")))?;

        // Fresh name per call so overlapping requests never collide.
        let id = Uuid::new_v4();
        let target = self.temp_dir.join(format!("audio_{}.mp3", id));

        info!("Downloading audio from {}", video_ref);

        let result = Command::new("yt-dlp")
            .arg("--extract-audio")
            .arg("--audio-format").arg("mp3")
            .arg("--output").arg(&target)
            .arg("--no-playlist")
            .arg("--quiet")
            .arg("--no-warnings")
            .arg(video_ref)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await;

        let output = match result {
            Ok(o) => o,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(FetchError::ToolMissing);
            }
            Err(e) => {
                return Err(FetchError::ExternalFailure(format!(
                    "yt-dlp execution failed: {e}"
                )));
            }
        };

        if !output.status.success() {
            // A partial file may have been written before the failure.
            drop(AudioAsset::new(target, id));

            let stderr = String::from_utf8_lossy(&output.stderr);
            if stderr_indicates_missing_video(&stderr) {
                return Err(FetchError::NotFound);
            }
            return Err(FetchError::ExternalFailure(format!(
                "yt-dlp failed: {}",
                stderr.trim()
            )));
        }

        if !target.exists() {
            return Err(FetchError::ExternalFailure(
                "Audio file not found after download".into(),
            ));
        }

        debug!("Audio downloaded to {}", target.display());
        Ok(AudioAsset::new(target, id))
    }
}

/// Classify yt-dlp stderr output that means the video itself is gone,
/// as opposed to an extraction or network failure.
fn stderr_indicates_missing_video(stderr: &str) -> bool {
    let lower = stderr.to_ascii_lowercase();
    lower.contains("video unavailable")
        || lower.contains("is not a valid url")
        || lower.contains("unable to download")
        || lower.contains("404")
}
