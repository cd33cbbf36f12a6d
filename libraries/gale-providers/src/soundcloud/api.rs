use super::models::{PartitionedCollection, SoundCloudPlaylist, SoundCloudTrack, SoundCloudUser};
use crate::adapter::ProviderAdapter;
use crate::error::{ProviderError, Result};
use crate::http::{endpoint, set_query_param, HttpClient};
use crate::normalize::normalize_all;
use crate::pagination::PaginationResolver;
use crate::types::{PlaylistResolution, SpecialUrlMatch, WebTrackResult};
use async_trait::async_trait;
use gale_core::{ImageQuality, PaginationSettings, ProviderName, SoundCloudSettings};
use serde::Deserialize;
use tracing::{debug, info, warn};
use url::Url;

const PROVIDER: ProviderName = ProviderName::SoundCloud;

const REVOKED_KEY: &str = "SoundCloud client id is invalid or has been revoked";

/// Body returned by `/resolve` when the API answers inline instead of redirecting.
#[derive(Debug, Deserialize)]
struct ResolvedResource {
    kind: String,
    id: u64,
}

/// Adapter for the SoundCloud public API.
pub struct SoundCloudApi {
    http: HttpClient,
    settings: SoundCloudSettings,
    pages: PaginationResolver,
}

impl SoundCloudApi {
    pub fn new(
        http: HttpClient,
        settings: SoundCloudSettings,
        pagination: &PaginationSettings,
    ) -> Self {
        let pages = PaginationResolver::new(http.clone(), PROVIDER, pagination);
        Self {
            http,
            settings,
            pages,
        }
    }

    fn client_id(&self) -> Result<&str> {
        self.settings
            .client_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(ProviderError::NotConfigured { provider: PROVIDER })
    }

    fn api_url(&self, path: &str) -> Result<Url> {
        let mut url = endpoint(PROVIDER, &self.settings.api_base, path)?;
        set_query_param(&mut url, "client_id", self.client_id()?);
        Ok(url)
    }

    /// Add credentials and the continuation hints to a listing URL.
    fn listing_url(&self, mut url: Url) -> Result<Url> {
        set_query_param(&mut url, "client_id", self.client_id()?);
        set_query_param(&mut url, "limit", &self.pages.page_size().to_string());
        set_query_param(&mut url, "linked_partitioning", "1");
        Ok(url)
    }

    /// Whether `input` points at soundcloud.com at all
    pub fn recognizes(input: &str) -> bool {
        let input = input.trim();
        let parsed = Url::parse(input).or_else(|_| Url::parse(&format!("https://{input}")));

        match parsed {
            Ok(url) if matches!(url.scheme(), "http" | "https") => url
                .host_str()
                .is_some_and(|host| host == "soundcloud.com" || host.ends_with(".soundcloud.com")),
            _ => false,
        }
    }

    /// Ask `/resolve` for the API location of a public URL.
    pub async fn resolve(&self, input: &str) -> Result<Url> {
        let mut url = self.api_url("resolve")?;
        set_query_param(&mut url, "url", input.trim());

        let response = self.http.get(PROVIDER, url).await.map_err(explain_auth)?;
        let location = response.url().clone();

        if !location.path().trim_end_matches('/').ends_with("/resolve") {
            debug!(path = location.path(), "Resolved via redirect");
            return Ok(location);
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::transport(PROVIDER, e))?;
        let resource: ResolvedResource = serde_json::from_str(&body)
            .map_err(|e| ProviderError::unexpected(PROVIDER, format!("resolve: {e}")))?;

        debug!(kind = %resource.kind, id = resource.id, "Resolved inline");
        let collection = match resource.kind.as_str() {
            "track" => "tracks",
            "playlist" => "playlists",
            "user" => "users",
            other => {
                return Err(ProviderError::unexpected(
                    PROVIDER,
                    format!("cannot resolve a {other}"),
                ))
            }
        };
        endpoint(
            PROVIDER,
            &self.settings.api_base,
            &format!("{collection}/{}", resource.id),
        )
    }

    /// Resolve a public URL into its tracks and, for listings, a playlist header.
    pub async fn resolve_listing(&self, input: &str) -> Result<SpecialUrlMatch> {
        let location = self.resolve(input).await?;
        let segments: Vec<String> = location
            .path_segments()
            .map(|s| s.filter(|s| !s.is_empty()).map(str::to_string).collect())
            .unwrap_or_default();
        let segments: Vec<&str> = segments.iter().map(String::as_str).collect();

        match segments.as_slice() {
            [.., "playlists", _] => self.playlist(location).await.map(SpecialUrlMatch::playlist),
            [.., "users", id, mode] => {
                let id = id.to_string();
                let mode = mode.to_string();
                self.user_listing(&id, &mode, location)
                    .await
                    .map(SpecialUrlMatch::playlist)
            }
            [.., "users", id] => {
                let id = id.to_string();
                let mut location = location.clone();
                location
                    .path_segments_mut()
                    .map_err(|_| ProviderError::invalid_url(PROVIDER, "cannot-be-a-base URL"))?
                    .push("tracks");
                self.user_listing(&id, "tracks", location)
                    .await
                    .map(SpecialUrlMatch::playlist)
            }
            [.., "tracks", _] => {
                let mut url = location;
                set_query_param(&mut url, "client_id", self.client_id()?);
                let track: SoundCloudTrack = self.http.get_json(PROVIDER, url).await?;
                let mut tracks = normalize_all([track]);
                Ok(tracks
                    .pop()
                    .map(SpecialUrlMatch::single)
                    .unwrap_or_default())
            }
            _ => {
                let tracks = self.collect(location).await?;
                Ok(SpecialUrlMatch::Matched {
                    tracks: normalize_all(tracks),
                    playlist: None,
                })
            }
        }
    }

    async fn playlist(&self, location: Url) -> Result<PlaylistResolution> {
        let url = self.listing_url(location)?;
        let playlist: SoundCloudPlaylist = self.pages.single_shot(url).await?;

        info!(
            title = %playlist.title,
            tracks = playlist.tracks.len(),
            "Resolved SoundCloud playlist"
        );

        let artwork_url = playlist
            .artwork_url
            .clone()
            .or_else(|| playlist.tracks.first().and_then(|t| t.artwork_url.clone()));

        Ok(PlaylistResolution {
            title: playlist.title,
            owner: playlist.user.map(|u| u.username).unwrap_or_default(),
            artwork_url,
            tracks: normalize_all(playlist.tracks),
        })
    }

    async fn user_listing(&self, id: &str, mode: &str, location: Url) -> Result<PlaylistResolution> {
        let user: SoundCloudUser = self
            .http
            .get_json(PROVIDER, self.api_url(&format!("users/{id}"))?)
            .await?;
        let tracks = self.collect(location).await?;

        info!(
            user = %user.username,
            mode,
            tracks = tracks.len(),
            "Resolved SoundCloud user listing"
        );

        let artwork_url = user
            .avatar_url
            .clone()
            .or_else(|| tracks.first().and_then(|t| t.artwork_url.clone()));

        Ok(PlaylistResolution {
            title: title_case(mode),
            owner: user.username,
            artwork_url,
            tracks: normalize_all(tracks),
        })
    }

    async fn collect(&self, location: Url) -> Result<Vec<SoundCloudTrack>> {
        let first = self.listing_url(location)?;
        let client_id = self.client_id()?.to_string();

        self.pages
            .continuation::<PartitionedCollection, _>(first, |cursor| {
                let mut next =
                    Url::parse(cursor).map_err(|e| ProviderError::invalid_url(PROVIDER, e))?;
                set_query_param(&mut next, "client_id", &client_id);
                Ok(next)
            })
            .await
    }

    /// Keyword search; only streamable tracks are returned.
    pub async fn search_tracks(&self, query: &str) -> Result<Vec<SoundCloudTrack>> {
        let mut url = self.api_url("tracks")?;
        set_query_param(&mut url, "q", query);

        let tracks: Vec<SoundCloudTrack> = self
            .http
            .get_json(PROVIDER, url)
            .await
            .map_err(explain_auth)?;

        Ok(tracks.into_iter().filter(SoundCloudTrack::is_streamable).collect())
    }

    /// Stream URL with the client id attached.
    pub fn stream_url(&self, track: &SoundCloudTrack) -> Result<Option<Url>> {
        let Some(stream) = track.stream_url.as_deref().filter(|s| !s.trim().is_empty()) else {
            return Ok(None);
        };
        let mut url = Url::parse(stream).map_err(|e| ProviderError::invalid_url(PROVIDER, e))?;
        set_query_param(&mut url, "client_id", self.client_id()?);
        Ok(Some(url))
    }
}

#[async_trait]
impl ProviderAdapter for SoundCloudApi {
    fn provider_name(&self) -> ProviderName {
        PROVIDER
    }

    fn is_enabled(&self) -> bool {
        self.settings.is_active()
    }

    fn supports_download(&self) -> bool {
        true
    }

    async fn resolve_special_url(&self, input: &str) -> SpecialUrlMatch {
        if !Self::recognizes(input) {
            return SpecialUrlMatch::NotMatched;
        }

        match self.resolve_listing(input).await {
            Ok(found) => found,
            Err(e) => {
                warn!(error = %e, "SoundCloud URL did not resolve");
                SpecialUrlMatch::NotMatched
            }
        }
    }

    async fn search(&self, query: &str) -> Result<Vec<WebTrackResult>> {
        let tracks = self.search_tracks(query).await?;
        debug!(query, results = tracks.len(), "SoundCloud search finished");
        Ok(normalize_all(tracks))
    }

    fn media_url(&self, result: &WebTrackResult) -> Result<Option<Url>> {
        match result.soundcloud() {
            Some(track) if track.can_download() => self.stream_url(track),
            _ => Ok(None),
        }
    }

    fn artwork_url(&self, result: &WebTrackResult, quality: ImageQuality) -> Option<String> {
        result
            .image_url
            .as_deref()
            .map(|url| artwork_for_quality(url, quality))
    }
}

fn explain_auth(err: ProviderError) -> ProviderError {
    match err {
        ProviderError::Auth { provider, .. } => ProviderError::Auth {
            provider,
            message: REVOKED_KEY.to_string(),
        },
        other => other,
    }
}

/// Swap the `-large` size suffix of a SoundCloud artwork URL.
pub fn artwork_for_quality(url: &str, quality: ImageQuality) -> String {
    let size = match quality {
        ImageQuality::Small => "large",
        ImageQuality::Medium => "t300x300",
        ImageQuality::Large => "crop",
        ImageQuality::Maximum => "t500x500",
    };
    url.replace("-large", &format!("-{size}"))
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
