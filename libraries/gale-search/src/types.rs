//! Search scope, state and outcome types.

use crate::error::ProviderFailure;
use gale_core::ProviderName;
use gale_providers::{PlaylistResolution, WebTrackResult};
use std::fmt;

/// Which providers a keyword search is dispatched to.
///
/// Special-URL probing always covers every enabled provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchScope {
    #[default]
    All,
    Only(ProviderName),
}

impl SearchScope {
    pub fn includes(&self, provider: ProviderName) -> bool {
        match self {
            SearchScope::All => true,
            SearchScope::Only(only) => *only == provider,
        }
    }
}

impl From<Option<ProviderName>> for SearchScope {
    fn from(provider: Option<ProviderName>) -> Self {
        provider.map_or(SearchScope::All, SearchScope::Only)
    }
}

impl fmt::Display for SearchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchScope::All => write!(f, "all providers"),
            SearchScope::Only(provider) => write!(f, "{provider}"),
        }
    }
}

/// Lifecycle of the coordinator's most recent search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchState {
    #[default]
    Idle,
    Searching,
    Completed,
    Canceled,
    Failed,
}

/// Merged, ordered results of a finished search.
#[derive(Debug, Clone)]
pub struct SearchResults {
    /// Trimmed query text
    pub query: String,
    /// Sorted by descending popularity, dispatch order among equals
    pub tracks: Vec<WebTrackResult>,
    /// Header of the resolved playlist, when the query was a listing URL
    pub playlist: Option<PlaylistResolution>,
    /// Providers that failed while the search still produced an outcome
    pub failures: Vec<ProviderFailure>,
    /// Provider that recognized the query as one of its URLs
    pub resolved_by: Option<ProviderName>,
}

impl SearchResults {
    /// The search worked but found nothing; distinct from a failed search
    pub fn nothing_found(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Failures caused by bad or missing credentials
    pub fn auth_failures(&self) -> impl Iterator<Item = &ProviderFailure> {
        self.failures.iter().filter(|f| f.is_auth())
    }

    pub fn is_url_resolution(&self) -> bool {
        self.resolved_by.is_some()
    }
}

/// How a search ended.
#[derive(Debug, Clone)]
pub enum SearchOutcome {
    Completed(SearchResults),
    /// Superseded by a newer search or canceled explicitly
    Canceled,
}

impl SearchOutcome {
    pub fn is_canceled(&self) -> bool {
        matches!(self, SearchOutcome::Canceled)
    }

    pub fn results(&self) -> Option<&SearchResults> {
        match self {
            SearchOutcome::Completed(results) => Some(results),
            SearchOutcome::Canceled => None,
        }
    }

    pub fn into_results(self) -> Option<SearchResults> {
        match self {
            SearchOutcome::Completed(results) => Some(results),
            SearchOutcome::Canceled => None,
        }
    }
}

/// Stable sort by descending popularity.
///
/// Equal scores keep their incoming order, which is provider dispatch
/// order followed by each provider's own order.
pub fn sort_by_popularity(tracks: &mut [WebTrackResult]) {
    tracks.sort_by(|a, b| b.popularity.cmp(&a.popularity));
}
