//! Bulk conversion and committing into a playlist.

use crate::error::{ImportError, Result};
use crate::playable::to_playable;
use gale_core::{ImportProgress, LibraryHost, PlayableTrack, PlaylistTarget};
use gale_providers::WebTrackResult;
use std::collections::HashSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Callback for per-item progress updates
pub type ProgressCallback = Box<dyn Fn(&ImportProgress) + Send + Sync>;

/// How a bulk conversion ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStatus {
    /// Every item converted
    Completed,
    /// Ran to the end, but some items failed to convert
    Partial,
    /// Stopped early; `tracks` holds what was converted before the stop
    Canceled,
}

/// One item that could not be converted or committed.
#[derive(Debug)]
pub struct ImportFailure {
    pub index: usize,
    pub title: String,
    pub error: ImportError,
}

/// Result of a bulk conversion.
#[derive(Debug)]
pub struct ImportOutcome {
    pub status: ImportStatus,
    pub tracks: Vec<PlayableTrack>,
    pub failures: Vec<ImportFailure>,
    /// Number of items in the batch
    pub total: usize,
}

impl ImportOutcome {
    pub fn is_canceled(&self) -> bool {
        self.status == ImportStatus::Canceled
    }
}

/// Converts search results into playable tracks.
#[derive(Default)]
pub struct ImportPipeline {
    progress_callback: Option<ProgressCallback>,
}

impl ImportPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set progress callback
    pub fn on_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Convert a selection of results. The first failing item fails the call.
    pub fn convert(&self, results: &[WebTrackResult]) -> Result<Vec<PlayableTrack>> {
        results.iter().map(to_playable).collect()
    }

    /// Convert a playlist item by item, reporting progress before each one.
    ///
    /// Cancellation is checked between items; items converted before it are
    /// kept. Items that fail to convert are recorded and skipped.
    pub async fn convert_playlist(
        &self,
        items: &[WebTrackResult],
        cancel: &CancellationToken,
    ) -> ImportOutcome {
        let total = items.len();
        let mut tracks = Vec::with_capacity(total);
        let mut failures = Vec::new();

        for (index, item) in items.iter().enumerate() {
            if cancel.is_cancelled() {
                info!(converted = tracks.len(), total, "Import canceled");
                return ImportOutcome {
                    status: ImportStatus::Canceled,
                    tracks,
                    failures,
                    total,
                };
            }

            if let Some(callback) = &self.progress_callback {
                callback(&ImportProgress {
                    current_item_name: item.title.clone(),
                    items_processed: index + 1,
                    items_total: total,
                });
            }

            match to_playable(item) {
                Ok(track) => tracks.push(track),
                Err(error) => {
                    warn!(index, title = %item.title, error = %error, "Skipping item");
                    failures.push(ImportFailure {
                        index,
                        title: item.title.clone(),
                        error,
                    });
                }
            }

            tokio::task::yield_now().await;
        }

        let status = if failures.is_empty() {
            ImportStatus::Completed
        } else {
            ImportStatus::Partial
        };
        debug!(converted = tracks.len(), failed = failures.len(), "Conversion finished");

        ImportOutcome {
            status,
            tracks,
            failures,
            total,
        }
    }

    /// Convert `items` and append them to `target`.
    ///
    /// Items the target rejects are recorded as failures and the outcome
    /// becomes [`ImportStatus::Partial`]; the remaining items are still
    /// appended. When at least one track was appended the target is
    /// selected, the host saves, and background loading is scheduled. A
    /// canceled conversion leaves the target and host untouched.
    pub async fn add_to_target(
        &self,
        items: &[WebTrackResult],
        target: &dyn PlaylistTarget,
        host: &dyn LibraryHost,
        cancel: &CancellationToken,
    ) -> Result<ImportOutcome> {
        let mut outcome = self.convert_playlist(items, cancel).await;
        if outcome.is_canceled() {
            return Ok(outcome);
        }

        // A finished conversion holds one track per item that did not fail.
        let failed: HashSet<usize> = outcome.failures.iter().map(|f| f.index).collect();
        let indices = (0..items.len()).filter(|index| !failed.contains(index));
        let converted = std::mem::take(&mut outcome.tracks);

        for (index, track) in indices.zip(converted) {
            match target.add_track(track.clone()).await {
                Ok(()) => outcome.tracks.push(track),
                Err(e) => {
                    warn!(
                        playlist = target.name(),
                        index,
                        title = %track.title,
                        error = %e,
                        "Playlist rejected track"
                    );
                    outcome.failures.push(ImportFailure {
                        index,
                        title: track.title,
                        error: ImportError::Target(e),
                    });
                }
            }
        }

        if !outcome.failures.is_empty() {
            outcome.failures.sort_by_key(|f| f.index);
            outcome.status = ImportStatus::Partial;
        }

        if outcome.tracks.is_empty() {
            warn!(
                playlist = target.name(),
                failed = outcome.failures.len(),
                "Nothing was imported"
            );
            return Ok(outcome);
        }

        host.select(target.name(), outcome.tracks.first().map(|t| t.id))
            .await;
        host.save().await.map_err(ImportError::Host)?;
        host.load_in_background(target.name());

        info!(
            playlist = target.name(),
            added = outcome.tracks.len(),
            failed = outcome.failures.len(),
            "Import committed"
        );
        Ok(outcome)
    }
}
