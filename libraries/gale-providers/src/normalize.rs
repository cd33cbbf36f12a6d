//! Turn provider records into [`WebTrackResult`]s.

use crate::soundcloud::SoundCloudTrack;
use crate::types::{ProviderPayload, WebTrackResult};
use crate::youtube::{parse_iso8601_duration, YouTubeVideo};
use gale_core::types::youtube_watch_url;
use std::collections::BTreeSet;
use std::time::Duration;

/// Build the display fields of a result from its payload.
///
/// Missing optional fields become empty or zero values; normalization
/// never fails.
pub fn normalize(payload: ProviderPayload) -> WebTrackResult {
    match payload {
        ProviderPayload::SoundCloud(track) => from_soundcloud(*track),
        ProviderPayload::YouTube(video) => from_youtube(*video),
    }
}

/// Normalize a batch, preserving order.
pub fn normalize_all<I, P>(records: I) -> Vec<WebTrackResult>
where
    I: IntoIterator<Item = P>,
    P: Into<ProviderPayload>,
{
    records.into_iter().map(|r| normalize(r.into())).collect()
}

fn from_soundcloud(track: SoundCloudTrack) -> WebTrackResult {
    let uploader = track
        .user
        .as_ref()
        .map(|u| u.username.clone())
        .unwrap_or_default();

    let genres = track
        .genre
        .as_deref()
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(|g| BTreeSet::from([g.to_string()]))
        .unwrap_or_default();

    WebTrackResult {
        title: track.title.clone(),
        uploader,
        duration: Duration::from_millis(track.duration),
        source_url: track.permalink_url.clone().unwrap_or_default(),
        image_url: track.artwork_url.clone(),
        genres,
        popularity: track.playback_count.unwrap_or(0),
        downloadable: track.can_download(),
        download_filename: escape_filename(&track.title),
        description: track.description.clone().filter(|d| !d.is_empty()),
        payload: ProviderPayload::SoundCloud(Box::new(track)),
    }
}

fn from_youtube(video: YouTubeVideo) -> WebTrackResult {
    let duration = video
        .content_details
        .as_ref()
        .and_then(|d| parse_iso8601_duration(&d.duration))
        .unwrap_or_default();

    WebTrackResult {
        title: video.snippet.title.clone(),
        uploader: video.snippet.channel_title.clone(),
        duration,
        source_url: youtube_watch_url(&video.id),
        image_url: video.snippet.thumbnails.best().map(|t| t.url.clone()),
        genres: BTreeSet::new(),
        popularity: video.view_count(),
        downloadable: false,
        download_filename: escape_filename(&video.snippet.title),
        description: video.snippet.description.clone().filter(|d| !d.is_empty()),
        payload: ProviderPayload::YouTube(Box::new(video)),
    }
}

/// Replace characters that are invalid in file names on common platforms.
///
/// Trailing dots and spaces are dropped; an empty result becomes `"track"`.
pub fn escape_filename(name: &str) -> String {
    let escaped: String = name
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let trimmed = escaped.trim().trim_end_matches(['.', ' ']);
    if trimmed.is_empty() {
        "track".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::soundcloud::SoundCloudUser;

    fn sample_track() -> SoundCloudTrack {
        SoundCloudTrack {
            id: 7,
            title: "Night/Drive".to_string(),
            duration: 215_000,
            genre: Some(" Ambient ".to_string()),
            playback_count: Some(1200),
            permalink_url: Some("https://soundcloud.com/someone/night-drive".to_string()),
            user: Some(SoundCloudUser {
                username: "someone".to_string(),
                ..Default::default()
            }),
            streamable: Some(true),
            ..Default::default()
        }
    }

    #[test]
    fn soundcloud_fields_are_mapped() {
        let result = normalize(sample_track().into());

        assert_eq!(result.title, "Night/Drive");
        assert_eq!(result.uploader, "someone");
        assert_eq!(result.duration, Duration::from_secs(215));
        assert_eq!(result.popularity, 1200);
        assert_eq!(result.genres.iter().collect::<Vec<_>>(), vec!["Ambient"]);
        assert_eq!(result.download_filename, "Night_Drive");
        assert!(!result.downloadable);
        assert_eq!(result.payload().native_id(), "7");
    }

    #[test]
    fn downloadable_requires_flag_and_stream() {
        let mut track = sample_track();
        track.downloadable = Some(true);
        assert!(!normalize(track.clone().into()).downloadable);

        track.stream_url = Some("https://api.soundcloud.com/tracks/7/stream".to_string());
        assert!(normalize(track.into()).downloadable);
    }

    #[test]
    fn missing_fields_become_defaults() {
        let result = normalize(SoundCloudTrack::default().into());
        assert_eq!(result.uploader, "");
        assert_eq!(result.popularity, 0);
        assert!(result.genres.is_empty());
        assert_eq!(result.download_filename, "track");
    }

    #[test]
    fn escape_filename_strips_reserved_characters() {
        assert_eq!(escape_filename("a:b*c?"), "a_b_c_");
        assert_eq!(escape_filename("ends with dot."), "ends with dot");
        assert_eq!(escape_filename("   "), "track");
    }
}
