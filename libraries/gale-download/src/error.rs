/// Error types for track downloads
use gale_providers::ProviderError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DownloadError>;

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("'{title}' cannot be downloaded")]
    NotDownloadable { title: String },

    #[error("Media stream unavailable: {0}")]
    StreamUnavailable(#[source] ProviderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write tags: {0}")]
    Tagging(#[from] lofty::error::LoftyError),

    #[error("Failed to move download to {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Download task panicked: {0}")]
    TaskPanicked(String),
}

impl From<ProviderError> for DownloadError {
    fn from(err: ProviderError) -> Self {
        Self::StreamUnavailable(err)
    }
}
