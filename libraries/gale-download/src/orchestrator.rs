//! Fetch, tag and persist a single web track.

use crate::error::{DownloadError, Result};
use crate::job::{DownloadJob, DownloadProgress};
use crate::tagging::{embed_tags, TrackTags};
use futures_util::StreamExt;
use gale_core::{DownloadSettings, ProviderName};
use gale_providers::{HttpClient, ProviderError, ProviderRegistry, WebTrackResult};
use std::path::{Path, PathBuf};
use tempfile::TempPath;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};
use url::Url;

/// Progress callback type
pub type ProgressCallback = Box<dyn Fn(&DownloadProgress) + Send + Sync>;

/// Downloads tracks from providers that expose raw media.
///
/// A download streams the audio into a hidden temp file next to the
/// destination, embeds tags and artwork, and only then renames the file into
/// place. The destination is never touched when any step fails, and temp
/// files are removed on every path.
pub struct DownloadOrchestrator {
    registry: ProviderRegistry,
    http: HttpClient,
    settings: DownloadSettings,
    progress_callback: Option<ProgressCallback>,
}

impl DownloadOrchestrator {
    pub fn new(registry: ProviderRegistry, http: HttpClient, settings: DownloadSettings) -> Self {
        Self {
            registry,
            http,
            settings,
            progress_callback: None,
        }
    }

    /// Set progress callback
    pub fn on_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Whether `result` can be handed to [`download`](Self::download).
    pub fn is_downloadable(&self, result: &WebTrackResult) -> bool {
        result.downloadable
            && self
                .registry
                .get(result.provider())
                .is_some_and(|adapter| adapter.supports_download())
    }

    /// Download `job.result` to `job.destination`, replacing any existing file.
    pub async fn download(&self, job: &DownloadJob) -> Result<PathBuf> {
        let result = &job.result;
        let provider = result.provider();

        let adapter = self
            .registry
            .get(provider)
            .filter(|adapter| result.downloadable && adapter.supports_download())
            .ok_or_else(|| not_downloadable(result))?;
        let media_url = adapter
            .media_url(result)?
            .ok_or_else(|| not_downloadable(result))?;

        let staging = job.staging_dir();
        tokio::fs::create_dir_all(&staging).await?;

        let audio = self.fetch_audio(provider, media_url, &staging).await?;

        let artwork = match adapter.artwork_url(result, self.settings.artwork_quality) {
            Some(url) => self.fetch_artwork(provider, &url).await,
            None => None,
        };

        let tags = TrackTags::from_result(result);
        let audio_path = audio.to_path_buf();
        let artwork_path = artwork.as_ref().map(|path| path.to_path_buf());

        // The tagging error crosses the blocking pool boundary untouched.
        tokio::task::spawn_blocking(move || {
            embed_tags(&audio_path, &tags, artwork_path.as_deref())
        })
        .await
        .map_err(|e| DownloadError::TaskPanicked(e.to_string()))??;

        audio
            .persist(&job.destination)
            .map_err(|e| DownloadError::Persist {
                path: job.destination.clone(),
                source: e.error,
            })?;

        info!(
            provider = %provider,
            title = %result.title,
            path = ?job.destination,
            with_artwork = artwork.is_some(),
            "Download complete"
        );

        Ok(job.destination.clone())
    }

    async fn fetch_audio(&self, provider: ProviderName, url: Url, dir: &Path) -> Result<TempPath> {
        let response = self.http.get(provider, url).await?;
        let bytes_total = response.content_length();

        let (file, path) = tempfile::Builder::new()
            .prefix(".gale-")
            .suffix(".part")
            .tempfile_in(dir)?
            .into_parts();
        let mut file = tokio::fs::File::from_std(file);

        let mut bytes_received = 0u64;
        let mut stream = response.bytes_stream();

        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result.map_err(|source| ProviderError::Transport { provider, source })?;
            file.write_all(&chunk).await?;
            bytes_received += chunk.len() as u64;

            if let Some(ref callback) = self.progress_callback {
                callback(&DownloadProgress {
                    bytes_received,
                    bytes_total,
                });
            }
        }
        file.flush().await?;

        debug!(provider = %provider, bytes = bytes_received, path = ?path, "Audio stream saved");
        Ok(path)
    }

    /// Artwork is optional: any failure is logged and the download goes on
    /// without it.
    async fn fetch_artwork(&self, provider: ProviderName, url: &str) -> Option<TempPath> {
        match self.try_fetch_artwork(provider, url).await {
            Ok(path) => Some(path),
            Err(e) => {
                warn!(provider = %provider, url, error = %e, "Artwork unavailable, continuing without it");
                None
            }
        }
    }

    async fn try_fetch_artwork(&self, provider: ProviderName, url: &str) -> Result<TempPath> {
        let url = Url::parse(url).map_err(|e| ProviderError::InvalidUrl {
            provider,
            message: e.to_string(),
        })?;
        let bytes = self.http.get_bytes(provider, url).await?;

        let dir = self
            .settings
            .scratch_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir);
        tokio::fs::create_dir_all(&dir).await?;

        let path = tempfile::Builder::new()
            .prefix("gale-art-")
            .tempfile_in(&dir)?
            .into_temp_path();
        tokio::fs::write(&path, &bytes).await?;

        Ok(path)
    }
}

fn not_downloadable(result: &WebTrackResult) -> DownloadError {
    DownloadError::NotDownloadable {
        title: result.title.clone(),
    }
}
