//! Download requests and progress reports.

use gale_providers::{escape_filename, WebTrackResult};
use std::path::{Path, PathBuf};

/// One request to materialize a web track as a local file.
///
/// The intermediate audio and artwork files are owned by the orchestrator
/// while the job runs and are removed whatever the outcome.
#[derive(Debug, Clone)]
pub struct DownloadJob {
    pub result: WebTrackResult,
    pub destination: PathBuf,
}

impl DownloadJob {
    pub fn new(result: WebTrackResult, destination: impl Into<PathBuf>) -> Self {
        Self {
            result,
            destination: destination.into(),
        }
    }

    /// Target `<dir>/<suggested file name>`.
    pub fn into_dir(result: WebTrackResult, dir: impl AsRef<Path>) -> Self {
        let destination = dir.as_ref().join(suggested_file_name(&result));
        Self::new(result, destination)
    }

    /// Directory the temp audio file is staged in, so the final move stays
    /// on one filesystem.
    pub(crate) fn staging_dir(&self) -> PathBuf {
        match self.destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

/// `<escaped title>.mp3`
pub fn suggested_file_name(result: &WebTrackResult) -> String {
    let stem = if result.download_filename.is_empty() {
        escape_filename(&result.title)
    } else {
        result.download_filename.clone()
    };
    format!("{stem}.mp3")
}

/// Bytes streamed so far for the current download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadProgress {
    pub bytes_received: u64,
    /// From `Content-Length`, when the server sends one
    pub bytes_total: Option<u64>,
}

impl DownloadProgress {
    /// Percentage in `0..=100`, when the total is known
    pub fn percentage(&self) -> Option<u8> {
        match self.bytes_total {
            Some(0) => Some(100),
            Some(total) => Some((self.bytes_received.min(total) * 100 / total) as u8),
            None => None,
        }
    }
}
