//! Listing retrieval: one-shot collections and cursor-driven continuation.

use crate::error::{ProviderError, Result};
use crate::http::HttpClient;
use gale_core::{PaginationSettings, ProviderName};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use tracing::debug;
use url::Url;

/// A page of a continuation listing: its items plus an optional cursor.
///
/// The cursor is whatever the provider hands back (a full URL for
/// SoundCloud, a page token for YouTube); callers turn it into the next
/// request URL.
pub trait ContinuationPage: DeserializeOwned {
    type Item;

    fn into_parts(self) -> (Vec<Self::Item>, Option<String>);
}

/// Fetches listings for one provider.
///
/// Continuation stops at an absent or blank cursor. A listing that keeps
/// going past `max_pages`, or hands back a cursor it already returned,
/// fails with [`ProviderError::PaginationLimit`]. Any failing page discards
/// everything accumulated so far.
#[derive(Clone, Debug)]
pub struct PaginationResolver {
    http: HttpClient,
    provider: ProviderName,
    page_size: u32,
    max_pages: usize,
}

impl PaginationResolver {
    pub fn new(http: HttpClient, provider: ProviderName, settings: &PaginationSettings) -> Self {
        Self {
            http,
            provider,
            page_size: settings.page_size.max(1),
            max_pages: settings.max_pages.max(1),
        }
    }

    /// Page-size hint for continuation requests
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    /// One request returning the whole collection.
    pub async fn single_shot<C: DeserializeOwned>(&self, url: Url) -> Result<C> {
        debug!(provider = %self.provider, path = url.path(), "Fetching single-shot listing");
        self.http.get_json(self.provider, url).await
    }

    /// Follow cursors from `first` until the listing ends.
    ///
    /// `next_url` builds the request for a cursor.
    pub async fn continuation<P, F>(&self, first: Url, mut next_url: F) -> Result<Vec<P::Item>>
    where
        P: ContinuationPage,
        F: FnMut(&str) -> Result<Url>,
    {
        let mut items = Vec::new();
        let mut seen = HashSet::new();
        let mut url = first;
        let mut pages = 0usize;

        loop {
            let page: P = self.http.get_json(self.provider, url).await?;
            pages += 1;

            let (batch, cursor) = page.into_parts();
            debug!(
                provider = %self.provider,
                page = pages,
                items = batch.len(),
                "Fetched listing page"
            );
            items.extend(batch);

            let cursor = match cursor.filter(|c| !c.trim().is_empty()) {
                Some(cursor) => cursor,
                None => break,
            };

            if pages >= self.max_pages || !seen.insert(cursor.clone()) {
                return Err(ProviderError::PaginationLimit {
                    provider: self.provider,
                    limit: self.max_pages,
                });
            }

            url = next_url(&cursor)?;
        }

        debug!(
            provider = %self.provider,
            pages,
            total = items.len(),
            "Listing complete"
        );
        Ok(items)
    }
}
