//! Plain-text rendering of search results.

use gale_providers::WebTrackResult;
use gale_search::{ProviderFailure, SearchResults};
use std::fmt::Write as _;
use std::time::Duration;

/// `m:ss`, or `h:mm:ss` past an hour
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

pub fn format_track(index: usize, track: &WebTrackResult) -> String {
    let mut line = format!("{:>3}. ", index + 1);
    if !track.uploader.is_empty() {
        let _ = write!(line, "{} - ", track.uploader);
    }
    let _ = write!(
        line,
        "{} [{}] ({}, {} plays)",
        track.title,
        format_duration(track.duration),
        track.provider(),
        track.popularity
    );
    if track.downloadable {
        line.push_str(" [downloadable]");
    }
    line
}

pub fn format_failure(failure: &ProviderFailure) -> String {
    format!("warning: {failure}")
}

/// Full report for one finished search.
pub fn render_results(results: &SearchResults, limit: Option<usize>) -> String {
    let mut out = String::new();

    if let Some(playlist) = &results.playlist {
        let _ = writeln!(
            out,
            "{} by {} ({} tracks)",
            playlist.title,
            playlist.owner,
            playlist.len()
        );
    }

    if results.nothing_found() {
        let _ = writeln!(out, "No results for \"{}\"", results.query);
    }

    let shown = limit.unwrap_or(results.tracks.len());
    for (index, track) in results.tracks.iter().take(shown).enumerate() {
        let _ = writeln!(out, "{}", format_track(index, track));
    }
    if results.tracks.len() > shown {
        let _ = writeln!(out, "... and {} more", results.tracks.len() - shown);
    }

    for failure in &results.failures {
        let _ = writeln!(out, "{}", format_failure(failure));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use gale_providers::{normalize, SoundCloudTrack};

    fn track(title: &str, plays: u64) -> WebTrackResult {
        normalize(
            SoundCloudTrack {
                id: 1,
                title: title.to_string(),
                duration: 185_000,
                playback_count: Some(plays),
                ..Default::default()
            }
            .into(),
        )
    }

    fn results(tracks: Vec<WebTrackResult>) -> SearchResults {
        SearchResults {
            query: "q".to_string(),
            tracks,
            playlist: None,
            failures: Vec::new(),
            resolved_by: None,
        }
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(5)), "0:05");
        assert_eq!(format_duration(Duration::from_secs(185)), "3:05");
        assert_eq!(format_duration(Duration::from_secs(3725)), "1:02:05");
    }

    #[test]
    fn test_format_track_without_uploader() {
        assert_eq!(
            format_track(0, &track("Song", 12)),
            "  1. Song [3:05] (SoundCloud, 12 plays)"
        );
    }

    #[test]
    fn test_render_respects_limit() {
        let tracks = vec![track("A", 3), track("B", 2), track("C", 1)];
        let out = render_results(&results(tracks), Some(2));
        assert!(out.contains("A ["));
        assert!(out.contains("B ["));
        assert!(!out.contains("C ["));
        assert!(out.contains("... and 1 more"));
    }

    #[test]
    fn test_render_nothing_found() {
        let out = render_results(&results(Vec::new()), None);
        assert_eq!(out, "No results for \"q\"\n");
    }
}
