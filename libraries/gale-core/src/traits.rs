/// Collaborator traits implemented by the library/playback layer
use crate::error::Result;
use crate::types::{PlayableTrack, TrackId};
use async_trait::async_trait;

/// A playlist-like container that imported tracks are appended to.
///
/// Implementers own playlist storage; Gale only ever appends.
#[async_trait]
pub trait PlaylistTarget: Send + Sync {
    /// Display name of the playlist
    fn name(&self) -> &str;

    /// Append a track to the end of the playlist
    ///
    /// # Errors
    /// Returns an error if the track cannot be stored
    async fn add_track(&self, track: PlayableTrack) -> Result<()>;
}

/// The host that owns selection state and persisted settings.
#[async_trait]
pub trait LibraryHost: Send + Sync {
    /// Mark `playlist` (and optionally one of its tracks) as the current selection
    async fn select(&self, playlist: &str, track: Option<TrackId>);

    /// Persist playlists and settings after a successful import
    ///
    /// # Errors
    /// Returns an error if saving fails
    async fn save(&self) -> Result<()>;

    /// Start loading artwork and metadata for a playlist in the background.
    ///
    /// Must return immediately.
    fn load_in_background(&self, playlist: &str);
}
