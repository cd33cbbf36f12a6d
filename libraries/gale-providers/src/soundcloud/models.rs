//! Wire models for the SoundCloud API.

use crate::pagination::ContinuationPage;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundCloudUser {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub permalink: Option<String>,
    #[serde(default)]
    pub permalink_url: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundCloudTrack {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub title: String,
    /// Length in milliseconds
    #[serde(default)]
    pub duration: u64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub tag_list: Option<String>,
    #[serde(default)]
    pub streamable: Option<bool>,
    #[serde(default)]
    pub downloadable: Option<bool>,
    #[serde(default)]
    pub user: Option<SoundCloudUser>,
    #[serde(default)]
    pub permalink_url: Option<String>,
    #[serde(default)]
    pub artwork_url: Option<String>,
    #[serde(default)]
    pub stream_url: Option<String>,
    #[serde(default)]
    pub playback_count: Option<u64>,
    #[serde(default)]
    pub favoritings_count: Option<u64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl SoundCloudTrack {
    /// Only streamable tracks are offered as search results
    pub fn is_streamable(&self) -> bool {
        self.streamable == Some(true)
    }

    /// Flagged downloadable and carries a stream URL
    pub fn can_download(&self) -> bool {
        self.downloadable == Some(true)
            && self
                .stream_url
                .as_deref()
                .is_some_and(|url| !url.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundCloudPlaylist {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub user: Option<SoundCloudUser>,
    #[serde(default)]
    pub artwork_url: Option<String>,
    #[serde(default)]
    pub permalink_url: Option<String>,
    #[serde(default)]
    pub track_count: Option<u32>,
    /// Full nested track list; required so a non-playlist body fails to parse
    pub tracks: Vec<SoundCloudTrack>,
}

/// One page of a `linked_partitioning` listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionedCollection {
    pub collection: Vec<SoundCloudTrack>,
    #[serde(default)]
    pub next_href: Option<String>,
}

impl ContinuationPage for PartitionedCollection {
    type Item = SoundCloudTrack;

    fn into_parts(self) -> (Vec<SoundCloudTrack>, Option<String>) {
        (self.collection, self.next_href)
    }
}
