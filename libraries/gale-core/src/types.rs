//! Domain types shared by every Gale library.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

use crate::error::GaleError;

/// External music catalog a result or track originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderName {
    /// SoundCloud public API
    SoundCloud,
    /// YouTube Data API v3
    YouTube,
}

impl ProviderName {
    /// All known providers, in registry order.
    pub const ALL: [ProviderName; 2] = [ProviderName::SoundCloud, ProviderName::YouTube];

    /// Stable lowercase key used in configuration and on the command line.
    pub fn key(&self) -> &'static str {
        match self {
            ProviderName::SoundCloud => "soundcloud",
            ProviderName::YouTube => "youtube",
        }
    }
}

impl fmt::Display for ProviderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderName::SoundCloud => write!(f, "SoundCloud"),
            ProviderName::YouTube => write!(f, "YouTube"),
        }
    }
}

impl FromStr for ProviderName {
    type Err = GaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "soundcloud" => Ok(ProviderName::SoundCloud),
            "youtube" => Ok(ProviderName::YouTube),
            other => Err(GaleError::invalid_input(format!("unknown provider: {other}"))),
        }
    }
}

/// Artwork size requested from a provider's image URL template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageQuality {
    /// ~100x100
    Small,
    /// ~300x300
    Medium,
    /// ~400x400
    Large,
    /// Largest variant the provider offers
    #[default]
    Maximum,
}

/// Unique identifier of a playable track in the local library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackId(Uuid);

impl TrackId {
    /// Generate a fresh identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TrackId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a playable track streams from.
///
/// Each variant carries the provider's native identifier, which is enough to
/// re-derive the remote source URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum TrackSource {
    /// SoundCloud track
    SoundCloud {
        /// Numeric SoundCloud track id
        track_id: u64,
        /// Public permalink, e.g. `https://soundcloud.com/artist/title`
        permalink_url: String,
        /// API stream endpoint (requires a client id to play)
        stream_url: Option<String>,
    },
    /// YouTube video
    YouTube {
        /// Eleven character video id
        video_id: String,
    },
}

impl TrackSource {
    /// Provider this source belongs to
    pub fn provider(&self) -> ProviderName {
        match self {
            TrackSource::SoundCloud { .. } => ProviderName::SoundCloud,
            TrackSource::YouTube { .. } => ProviderName::YouTube,
        }
    }

    /// Provider-native identifier as text
    pub fn native_id(&self) -> String {
        match self {
            TrackSource::SoundCloud { track_id, .. } => track_id.to_string(),
            TrackSource::YouTube { video_id } => video_id.clone(),
        }
    }

    /// Remote URL the user would open to reach this track
    pub fn source_url(&self) -> String {
        match self {
            TrackSource::SoundCloud { permalink_url, .. } => permalink_url.clone(),
            TrackSource::YouTube { video_id } => youtube_watch_url(video_id),
        }
    }
}

/// Canonical watch URL for a YouTube video id.
pub fn youtube_watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}

/// A library entry that the playback layer can open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayableTrack {
    /// Local identifier
    pub id: TrackId,
    /// Track title
    pub title: String,
    /// Uploader / performer
    pub artist: String,
    /// Track length
    pub duration: Duration,
    /// Genres reported by the provider
    pub genres: Vec<String>,
    /// Cover art URL, loaded lazily by the library
    pub artwork_url: Option<String>,
    /// Free text description
    pub description: Option<String>,
    /// When the track was added to the library
    pub added_at: DateTime<Utc>,
    /// Remote source
    pub source: TrackSource,
}

impl PlayableTrack {
    /// Create a new playable track with a fresh id, added now.
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        duration: Duration,
        source: TrackSource,
    ) -> Self {
        Self {
            id: TrackId::new(),
            title: title.into(),
            artist: artist.into(),
            duration,
            genres: Vec::new(),
            artwork_url: None,
            description: None,
            added_at: Utc::now(),
            source,
        }
    }

    /// Provider the track streams from
    pub fn provider(&self) -> ProviderName {
        self.source.provider()
    }

    /// Remote source URL, derived from the native identifier
    pub fn source_url(&self) -> String {
        self.source.source_url()
    }

    /// "Artist - Title", or just the title when the artist is unknown
    pub fn display_name(&self) -> String {
        if self.artist.is_empty() {
            self.title.clone()
        } else {
            format!("{} - {}", self.artist, self.title)
        }
    }
}

/// Progress of a bulk conversion.
///
/// `items_processed` counts the item currently being materialized, so the
/// first report of an N item import is `1 / N`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportProgress {
    /// Name of the item currently being converted
    pub current_item_name: String,
    /// 1-based index of the current item
    pub items_processed: usize,
    /// Total number of items in the batch
    pub items_total: usize,
}

impl ImportProgress {
    /// Fraction complete in `0.0..=1.0`
    pub fn fraction(&self) -> f64 {
        if self.items_total == 0 {
            return 1.0;
        }
        self.items_processed as f64 / self.items_total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_name_parses_case_insensitively() {
        assert_eq!(
            "SoundCloud".parse::<ProviderName>().unwrap(),
            ProviderName::SoundCloud
        );
        assert_eq!(" youtube ".parse::<ProviderName>().unwrap(), ProviderName::YouTube);
        assert!("vimeo".parse::<ProviderName>().is_err());
    }

    #[test]
    fn soundcloud_source_url_is_permalink() {
        let source = TrackSource::SoundCloud {
            track_id: 42,
            permalink_url: "https://soundcloud.com/a/b".to_string(),
            stream_url: None,
        };
        assert_eq!(source.source_url(), "https://soundcloud.com/a/b");
        assert_eq!(source.native_id(), "42");
        assert_eq!(source.provider(), ProviderName::SoundCloud);
    }

    #[test]
    fn display_name_omits_missing_artist() {
        let mut track = PlayableTrack::new(
            "Title",
            "",
            Duration::from_secs(1),
            TrackSource::YouTube {
                video_id: "abc".to_string(),
            },
        );
        assert_eq!(track.display_name(), "Title");
        track.artist = "Artist".to_string();
        assert_eq!(track.display_name(), "Artist - Title");
    }

    #[test]
    fn progress_fraction_handles_empty_batch() {
        let progress = ImportProgress {
            current_item_name: String::new(),
            items_processed: 0,
            items_total: 0,
        };
        assert_eq!(progress.fraction(), 1.0);
    }
}
