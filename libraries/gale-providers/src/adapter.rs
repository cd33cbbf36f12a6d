//! The seam every music catalog implements.

use crate::error::Result;
use crate::types::{SpecialUrlMatch, WebTrackResult};
use async_trait::async_trait;
use gale_core::{ImageQuality, ProviderName};
use url::Url;

/// One external music catalog.
///
/// `resolve_special_url` never fails: inputs the adapter does not
/// recognize, and recognized inputs that fail to resolve, both yield
/// [`SpecialUrlMatch::NotMatched`] so the caller falls back to keyword
/// search.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    fn provider_name(&self) -> ProviderName;

    /// Enabled in settings and holding credentials
    fn is_enabled(&self) -> bool;

    /// Whether results from this provider can ever be downloaded
    fn supports_download(&self) -> bool {
        false
    }

    /// Check whether `input` is a track, playlist or user URL of this provider.
    async fn resolve_special_url(&self, input: &str) -> SpecialUrlMatch;

    /// Keyword search, in the provider's own order.
    async fn search(&self, query: &str) -> Result<Vec<WebTrackResult>>;

    /// Authenticated URL the audio of `result` can be fetched from
    fn media_url(&self, _result: &WebTrackResult) -> Result<Option<Url>> {
        Ok(None)
    }

    /// Artwork URL at the requested size
    fn artwork_url(&self, result: &WebTrackResult, _quality: ImageQuality) -> Option<String> {
        result.image_url.clone()
    }
}
