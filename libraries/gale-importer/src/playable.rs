//! Per-provider conversion of search results into playable tracks.

use crate::error::{ImportError, Result};
use gale_core::{PlayableTrack, ProviderName, TrackSource};
use gale_providers::{ProviderPayload, SoundCloudTrack, WebTrackResult, YouTubeVideo};
use url::Url;

/// Build the library entry for one result.
///
/// The track's source carries the provider's native identifier, from
/// which the same remote URL as `result.source_url` is re-derived.
pub fn to_playable(result: &WebTrackResult) -> Result<PlayableTrack> {
    let source = match result.payload() {
        ProviderPayload::SoundCloud(track) => soundcloud_source(track)?,
        ProviderPayload::YouTube(video) => youtube_source(video)?,
    };

    let mut track = PlayableTrack::new(
        result.title.clone(),
        result.uploader.clone(),
        result.duration,
        source,
    );
    track.genres = result.genres.iter().cloned().collect();
    track.artwork_url = result.image_url.clone();
    track.description = result.description.clone();
    Ok(track)
}

fn soundcloud_source(track: &SoundCloudTrack) -> Result<TrackSource> {
    if track.id == 0 {
        return Err(ImportError::MissingField {
            provider: ProviderName::SoundCloud,
            field: "id",
        });
    }

    let permalink_url = track
        .permalink_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .ok_or(ImportError::MissingField {
            provider: ProviderName::SoundCloud,
            field: "permalink_url",
        })?;

    let parsed = Url::parse(permalink_url).map_err(|e| ImportError::InvalidSourceUrl {
        url: permalink_url.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ImportError::InvalidSourceUrl {
            url: permalink_url.to_string(),
            reason: format!("unsupported scheme {}", parsed.scheme()),
        });
    }

    Ok(TrackSource::SoundCloud {
        track_id: track.id,
        permalink_url: permalink_url.to_string(),
        stream_url: track.stream_url.clone().filter(|s| !s.trim().is_empty()),
    })
}

fn youtube_source(video: &YouTubeVideo) -> Result<TrackSource> {
    let video_id = video.id.trim();
    if video_id.is_empty() {
        return Err(ImportError::MissingField {
            provider: ProviderName::YouTube,
            field: "id",
        });
    }

    Ok(TrackSource::YouTube {
        video_id: video_id.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gale_providers::normalize;
    use gale_providers::soundcloud::SoundCloudUser;
    use gale_providers::youtube::VideoSnippet;
    use std::time::Duration;

    fn soundcloud(id: u64, permalink: Option<&str>) -> WebTrackResult {
        normalize(
            SoundCloudTrack {
                id,
                title: "Tides".to_string(),
                duration: 90_000,
                genre: Some("Ambient".to_string()),
                permalink_url: permalink.map(str::to_string),
                user: Some(SoundCloudUser {
                    username: "shore".to_string(),
                    ..Default::default()
                }),
                ..Default::default()
            }
            .into(),
        )
    }

    #[test]
    fn soundcloud_round_trips_source_url() {
        let result = soundcloud(11, Some("https://soundcloud.com/shore/tides"));
        let track = to_playable(&result).unwrap();

        assert_eq!(track.source_url(), result.source_url);
        assert_eq!(track.provider(), ProviderName::SoundCloud);
        assert_eq!(track.artist, "shore");
        assert_eq!(track.duration, Duration::from_secs(90));
        assert_eq!(track.genres, vec!["Ambient".to_string()]);
    }

    #[test]
    fn youtube_round_trips_source_url() {
        let result = normalize(
            YouTubeVideo {
                id: "dQw4w9WgXcQ".to_string(),
                snippet: VideoSnippet {
                    title: "Song".to_string(),
                    channel_title: "Channel".to_string(),
                    ..Default::default()
                },
                ..Default::default()
            }
            .into(),
        );
        let track = to_playable(&result).unwrap();

        assert_eq!(track.source_url(), result.source_url);
        assert_eq!(track.source.native_id(), "dQw4w9WgXcQ");
    }

    #[test]
    fn soundcloud_requires_permalink() {
        let err = to_playable(&soundcloud(11, None)).unwrap_err();
        assert!(matches!(
            err,
            ImportError::MissingField {
                field: "permalink_url",
                ..
            }
        ));
    }

    #[test]
    fn soundcloud_rejects_bad_permalink() {
        let err = to_playable(&soundcloud(11, Some("not a url"))).unwrap_err();
        assert!(matches!(err, ImportError::InvalidSourceUrl { .. }));
    }

    #[test]
    fn soundcloud_requires_id() {
        let err = to_playable(&soundcloud(0, Some("https://soundcloud.com/a/b"))).unwrap_err();
        assert!(matches!(err, ImportError::MissingField { field: "id", .. }));
    }
}
