//! Provider-independent search results.

use crate::soundcloud::SoundCloudTrack;
use crate::youtube::YouTubeVideo;
use gale_core::ProviderName;
use std::collections::BTreeSet;
use std::time::Duration;

/// The provider's own record, kept intact for conversion and download.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderPayload {
    SoundCloud(Box<SoundCloudTrack>),
    YouTube(Box<YouTubeVideo>),
}

impl ProviderPayload {
    pub fn provider(&self) -> ProviderName {
        match self {
            ProviderPayload::SoundCloud(_) => ProviderName::SoundCloud,
            ProviderPayload::YouTube(_) => ProviderName::YouTube,
        }
    }

    /// Provider-native identifier as text
    pub fn native_id(&self) -> String {
        match self {
            ProviderPayload::SoundCloud(track) => track.id.to_string(),
            ProviderPayload::YouTube(video) => video.id.clone(),
        }
    }
}

impl From<SoundCloudTrack> for ProviderPayload {
    fn from(track: SoundCloudTrack) -> Self {
        ProviderPayload::SoundCloud(Box::new(track))
    }
}

impl From<YouTubeVideo> for ProviderPayload {
    fn from(video: YouTubeVideo) -> Self {
        ProviderPayload::YouTube(Box::new(video))
    }
}

/// One normalized search hit.
///
/// Display fields are public so the UI can render and sort them; the
/// provider payload is only reachable through [`WebTrackResult::payload`]
/// and never changes after normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct WebTrackResult {
    pub title: String,
    pub uploader: String,
    pub duration: Duration,
    /// Public page of the track on the provider
    pub source_url: String,
    pub image_url: Option<String>,
    pub genres: BTreeSet<String>,
    /// Play or view count; the result ordering key
    pub popularity: u64,
    pub downloadable: bool,
    /// Suggested base name (no extension) for a downloaded copy
    pub download_filename: String,
    pub description: Option<String>,
    pub(crate) payload: ProviderPayload,
}

impl WebTrackResult {
    /// Provider this result came from, derived from the payload
    pub fn provider(&self) -> ProviderName {
        self.payload.provider()
    }

    pub fn payload(&self) -> &ProviderPayload {
        &self.payload
    }

    /// SoundCloud record, if this is a SoundCloud result
    pub fn soundcloud(&self) -> Option<&SoundCloudTrack> {
        match &self.payload {
            ProviderPayload::SoundCloud(track) => Some(track),
            ProviderPayload::YouTube(_) => None,
        }
    }

    /// YouTube record, if this is a YouTube result
    pub fn youtube(&self) -> Option<&YouTubeVideo> {
        match &self.payload {
            ProviderPayload::YouTube(video) => Some(video),
            ProviderPayload::SoundCloud(_) => None,
        }
    }
}

/// Header and tracks of a resolved playlist-like listing.
///
/// `tracks` keeps the provider's native order.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistResolution {
    pub title: String,
    pub owner: String,
    pub artwork_url: Option<String>,
    pub tracks: Vec<WebTrackResult>,
}

impl PlaylistResolution {
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

/// Outcome of probing a query as a provider URL.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SpecialUrlMatch {
    /// The input is not a URL this provider understands, or resolving it failed
    #[default]
    NotMatched,
    /// The input resolved to one or more tracks
    Matched {
        tracks: Vec<WebTrackResult>,
        playlist: Option<PlaylistResolution>,
    },
}

impl SpecialUrlMatch {
    /// Match for a single track
    pub fn single(track: WebTrackResult) -> Self {
        SpecialUrlMatch::Matched {
            tracks: vec![track],
            playlist: None,
        }
    }

    /// Match for a playlist; tracks are taken from the playlist in native order
    pub fn playlist(playlist: PlaylistResolution) -> Self {
        SpecialUrlMatch::Matched {
            tracks: playlist.tracks.clone(),
            playlist: Some(playlist),
        }
    }

    pub fn is_matched(&self) -> bool {
        matches!(self, SpecialUrlMatch::Matched { .. })
    }
}
