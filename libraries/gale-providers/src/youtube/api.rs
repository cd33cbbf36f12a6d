use super::models::{
    PlaylistItemsPage, PlaylistListResponse, SearchListResponse, VideoListResponse, YouTubeVideo,
};
use crate::adapter::ProviderAdapter;
use crate::error::{ProviderError, Result};
use crate::http::{endpoint, set_query_param, HttpClient};
use crate::normalize::normalize_all;
use crate::pagination::PaginationResolver;
use crate::types::{PlaylistResolution, SpecialUrlMatch, WebTrackResult};
use async_trait::async_trait;
use gale_core::{ImageQuality, PaginationSettings, ProviderName, YouTubeSettings};
use std::collections::HashMap;
use tracing::{debug, info, warn};
use url::Url;

const PROVIDER: ProviderName = ProviderName::YouTube;

/// Results requested per keyword search
const SEARCH_RESULTS: u32 = 25;

/// API maximum for `maxResults` and for ids per `videos` call
const MAX_PAGE: usize = 50;

/// A YouTube URL the adapter knows how to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YouTubeLink {
    Video(String),
    Playlist(String),
}

/// Recognize watch, short, embed, youtu.be and playlist URLs.
///
/// Any URL carrying a `list` parameter resolves to the playlist.
pub fn parse_youtube_link(input: &str) -> Option<YouTubeLink> {
    let input = input.trim();
    let url = Url::parse(input)
        .or_else(|_| Url::parse(&format!("https://{input}")))
        .ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }

    let host = url.host_str()?.trim_start_matches("www.");
    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();
    let query = |key: &str| {
        url.query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    };

    let link = match host {
        "youtu.be" => segments.first().map(|id| YouTubeLink::Video((*id).to_string())),
        "youtube.com" | "m.youtube.com" | "music.youtube.com" => match segments.as_slice() {
            _ if query("list").is_some() => query("list").map(YouTubeLink::Playlist),
            ["watch"] => query("v").map(YouTubeLink::Video),
            ["shorts", id] | ["embed", id] | ["live", id] => {
                Some(YouTubeLink::Video((*id).to_string()))
            }
            _ => None,
        },
        _ => None,
    }?;

    let valid = match &link {
        YouTubeLink::Video(id) => id.len() == 11 && is_id(id),
        YouTubeLink::Playlist(id) => !id.is_empty() && is_id(id),
    };
    valid.then_some(link)
}

fn is_id(text: &str) -> bool {
    text.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Adapter for the YouTube Data API v3.
///
/// Results are never downloadable.
pub struct YouTubeApi {
    http: HttpClient,
    settings: YouTubeSettings,
    pages: PaginationResolver,
}

impl YouTubeApi {
    pub fn new(http: HttpClient, settings: YouTubeSettings, pagination: &PaginationSettings) -> Self {
        let pages = PaginationResolver::new(http.clone(), PROVIDER, pagination);
        Self {
            http,
            settings,
            pages,
        }
    }

    fn api_key(&self) -> Result<&str> {
        self.settings
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(ProviderError::NotConfigured { provider: PROVIDER })
    }

    fn api_url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url> {
        let mut url = endpoint(PROVIDER, &self.settings.api_base, path)?;
        for (key, value) in params {
            set_query_param(&mut url, key, value);
        }
        set_query_param(&mut url, "key", self.api_key()?);
        Ok(url)
    }

    fn page_size(&self) -> String {
        (self.pages.page_size() as usize).min(MAX_PAGE).to_string()
    }

    /// Keyword search, returning full video resources in relevance order.
    pub async fn search_videos(&self, query: &str) -> Result<Vec<YouTubeVideo>> {
        let limit = SEARCH_RESULTS.to_string();
        let url = self.api_url(
            "search",
            &[
                ("part", "snippet"),
                ("type", "video"),
                ("maxResults", limit.as_str()),
                ("q", query),
            ],
        )?;

        let response: SearchListResponse = self
            .http
            .get_json(PROVIDER, url)
            .await
            .map_err(explain_error)?;
        let ids: Vec<String> = response
            .items
            .into_iter()
            .filter_map(|item| item.id.video_id)
            .collect();

        self.videos(&ids).await
    }

    /// Fetch video resources for `ids`, in the order given.
    ///
    /// Ids the API does not return (private or deleted videos) are skipped.
    pub async fn videos(&self, ids: &[String]) -> Result<Vec<YouTubeVideo>> {
        let mut found: HashMap<String, YouTubeVideo> = HashMap::with_capacity(ids.len());

        for chunk in ids.chunks(MAX_PAGE) {
            let joined = chunk.join(",");
            let url = self.api_url(
                "videos",
                &[("part", "snippet,contentDetails,statistics"), ("id", joined.as_str())],
            )?;
            let response: VideoListResponse = self
                .http
                .get_json(PROVIDER, url)
                .await
                .map_err(explain_error)?;
            for video in response.items {
                found.insert(video.id.clone(), video);
            }
        }

        if found.len() < ids.len() {
            debug!(
                requested = ids.len(),
                returned = found.len(),
                "Some videos are unavailable"
            );
        }

        Ok(ids.iter().filter_map(|id| found.get(id).cloned()).collect())
    }

    /// Resolve a recognized link.
    pub async fn resolve_link(&self, link: &YouTubeLink) -> Result<SpecialUrlMatch> {
        match link {
            YouTubeLink::Video(id) => {
                let videos = self.videos(std::slice::from_ref(id)).await?;
                let found = normalize_all(videos).pop();
                Ok(found.map(SpecialUrlMatch::single).unwrap_or_default())
            }
            YouTubeLink::Playlist(id) => Ok(self
                .playlist(id)
                .await?
                .map(SpecialUrlMatch::playlist)
                .unwrap_or_default()),
        }
    }

    async fn playlist(&self, id: &str) -> Result<Option<PlaylistResolution>> {
        let url = self.api_url("playlists", &[("part", "snippet"), ("id", id)])?;
        let header: PlaylistListResponse = self
            .http
            .get_json(PROVIDER, url)
            .await
            .map_err(explain_error)?;
        let Some(header) = header.items.into_iter().next() else {
            return Ok(None);
        };

        let page_size = self.page_size();
        let first = self.api_url(
            "playlistItems",
            &[
                ("part", "contentDetails"),
                ("playlistId", id),
                ("maxResults", page_size.as_str()),
            ],
        )?;
        let template = first.clone();

        let ids = self
            .pages
            .continuation::<PlaylistItemsPage, _>(first, |token| {
                let mut next = template.clone();
                set_query_param(&mut next, "pageToken", token);
                Ok(next)
            })
            .await
            .map_err(explain_error)?;

        let videos = self.videos(&ids).await?;
        info!(
            title = %header.snippet.title,
            items = ids.len(),
            available = videos.len(),
            "Resolved YouTube playlist"
        );

        Ok(Some(PlaylistResolution {
            title: header.snippet.title,
            owner: header.snippet.channel_title,
            artwork_url: header.snippet.thumbnails.best().map(|t| t.url.clone()),
            tracks: normalize_all(videos),
        }))
    }
}

#[async_trait]
impl ProviderAdapter for YouTubeApi {
    fn provider_name(&self) -> ProviderName {
        PROVIDER
    }

    fn is_enabled(&self) -> bool {
        self.settings.is_active()
    }

    async fn resolve_special_url(&self, input: &str) -> SpecialUrlMatch {
        let Some(link) = parse_youtube_link(input) else {
            return SpecialUrlMatch::NotMatched;
        };

        match self.resolve_link(&link).await {
            Ok(found) => found,
            Err(e) => {
                warn!(error = %e, "YouTube URL did not resolve");
                SpecialUrlMatch::NotMatched
            }
        }
    }

    async fn search(&self, query: &str) -> Result<Vec<WebTrackResult>> {
        let videos = self.search_videos(query).await?;
        debug!(query, results = videos.len(), "YouTube search finished");
        Ok(normalize_all(videos))
    }

    fn artwork_url(&self, result: &WebTrackResult, quality: ImageQuality) -> Option<String> {
        let Some(video) = result.youtube() else {
            return result.image_url.clone();
        };
        let thumbs = &video.snippet.thumbnails;
        let pick = match quality {
            ImageQuality::Small => thumbs.smallest(),
            ImageQuality::Medium => thumbs.medium.as_ref().or(thumbs.smallest()),
            ImageQuality::Large => thumbs.high.as_ref().or(thumbs.best()),
            ImageQuality::Maximum => thumbs.best(),
        };
        pick.map(|t| t.url.clone())
    }
}

/// The Data API reports a bad key as 400 and an exhausted quota as 403.
fn explain_error(err: ProviderError) -> ProviderError {
    match err {
        ProviderError::Status {
            provider,
            status: 400,
            message,
        } if message.contains("keyInvalid") || message.contains("API key not valid") => {
            ProviderError::Auth { provider, message }
        }
        ProviderError::Auth { provider, message } if message.contains("quotaExceeded") => {
            ProviderError::RateLimited {
                provider,
                retry_after_secs: None,
            }
        }
        other => other,
    }
}
