//! Single-active-search coordination.

use crate::error::{ProviderFailure, Result, SearchError};
use crate::recent::RecentSearches;
use crate::types::{sort_by_popularity, SearchOutcome, SearchResults, SearchScope, SearchState};
use futures_util::future::{join_all, try_join_all};
use gale_core::{FailurePolicy, ProviderName, SearchSettings};
use gale_providers::{ProviderAdapter, ProviderError, ProviderRegistry, SpecialUrlMatch, WebTrackResult};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// The search currently holding the active slot.
struct ActiveSearch {
    id: u64,
    token: CancellationToken,
    finished: watch::Receiver<bool>,
}

#[derive(Default)]
struct Slot {
    active: Option<ActiveSearch>,
    /// Acknowledgements of superseded searches, kept until each one stops.
    /// A search dropped while waiting must not release its successors early.
    draining: Vec<watch::Receiver<bool>>,
}

/// Releases the active slot and acknowledges termination when a search
/// future ends, however it ends.
struct Handoff<'a> {
    coordinator: &'a SearchCoordinator,
    id: u64,
    finished: watch::Sender<bool>,
}

impl Drop for Handoff<'_> {
    fn drop(&mut self) {
        {
            let mut slot = lock(&self.coordinator.slot);
            if slot.active.as_ref().is_some_and(|a| a.id == self.id) {
                slot.active = None;
            }
        }
        self.finished.send_replace(true);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn wait_finished(mut finished: watch::Receiver<bool>) {
    while !*finished.borrow_and_update() {
        if finished.changed().await.is_err() {
            break;
        }
    }
}

/// Runs searches across the registered providers, one at a time.
///
/// Starting a search while another is running cancels the running one and
/// waits until it, and every search it superseded, has fully stopped before
/// dispatching anything, so result sets of two searches never mix.
///
/// # Example
///
/// ```ignore
/// let coordinator = SearchCoordinator::new(registry, config.search.clone());
///
/// match coordinator.start_search("lofi beats", SearchScope::All).await? {
///     SearchOutcome::Completed(results) if results.nothing_found() => println!("Nothing found"),
///     SearchOutcome::Completed(results) => {
///         for track in &results.tracks {
///             println!("{} - {}", track.uploader, track.title);
///         }
///     }
///     SearchOutcome::Canceled => {}
/// }
/// ```
pub struct SearchCoordinator {
    registry: ProviderRegistry,
    settings: SearchSettings,
    slot: Mutex<Slot>,
    state: Mutex<SearchState>,
    recent: Mutex<RecentSearches>,
    last_id: AtomicU64,
}

impl SearchCoordinator {
    pub fn new(registry: ProviderRegistry, settings: SearchSettings) -> Self {
        let recent = RecentSearches::new(settings.max_recent_searches);
        Self {
            registry,
            settings,
            slot: Mutex::new(Slot::default()),
            state: Mutex::new(SearchState::Idle),
            recent: Mutex::new(recent),
            last_id: AtomicU64::new(0),
        }
    }

    /// Seed the recent-search list from persisted settings, newest first.
    #[must_use]
    pub fn with_recent_searches(self, entries: Vec<String>) -> Self {
        *lock(&self.recent) = RecentSearches::from_entries(entries, self.settings.max_recent_searches);
        self
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn state(&self) -> SearchState {
        *lock(&self.state)
    }

    /// A search holds the active slot (including while it waits for its predecessor)
    pub fn is_searching(&self) -> bool {
        lock(&self.slot).active.is_some()
    }

    /// Recent queries, newest first
    pub fn recent_searches(&self) -> Vec<String> {
        lock(&self.recent).entries().to_vec()
    }

    /// Signal the active search to stop. Returns whether one was running.
    ///
    /// The canceled search resolves to [`SearchOutcome::Canceled`].
    pub fn cancel(&self) -> bool {
        match lock(&self.slot).active.as_ref() {
            Some(active) => {
                debug!(search = active.id, "Cancel requested");
                active.token.cancel();
                true
            }
            None => false,
        }
    }

    /// Cancel the active search and wait until it and every search it
    /// superseded have stopped.
    pub async fn cancel_and_wait(&self) {
        let pending = {
            let slot = lock(&self.slot);
            let mut pending = slot.draining.clone();
            if let Some(active) = &slot.active {
                active.token.cancel();
                pending.push(active.finished.clone());
            }
            pending
        };

        join_all(pending.into_iter().map(wait_finished)).await;
    }

    /// Run a search for `query`.
    ///
    /// A blank query is rejected without touching the running search.
    /// Otherwise any running search is canceled and awaited first, along
    /// with any earlier search that has not stopped yet. The query is
    /// checked as a provider URL on every enabled provider in
    /// registration order; the first match is the result. If nothing
    /// matches, `scope` providers are searched in parallel and merged by
    /// descending popularity.
    pub async fn start_search(&self, query: &str, scope: SearchScope) -> Result<SearchOutcome> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        let id = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;
        let token = CancellationToken::new();
        let (finished_tx, finished_rx) = watch::channel(false);

        let draining = {
            let mut slot = lock(&self.slot);
            let previous = slot.active.replace(ActiveSearch {
                id,
                token: token.clone(),
                finished: finished_rx,
            });
            if let Some(previous) = previous {
                debug!(superseded = previous.id, search = id, "Canceling previous search");
                previous.token.cancel();
                slot.draining.push(previous.finished);
            }
            slot.draining.retain(|finished| !*finished.borrow());
            slot.draining.clone()
        };
        let _handoff = Handoff {
            coordinator: self,
            id,
            finished: finished_tx,
        };

        if !draining.is_empty() {
            debug!(search = id, pending = draining.len(), "Waiting for earlier searches to stop");
            join_all(draining.into_iter().map(wait_finished)).await;
        }

        if token.is_cancelled() {
            self.settle(id, SearchState::Canceled);
            return Ok(SearchOutcome::Canceled);
        }

        self.settle(id, SearchState::Searching);
        info!(search = id, query, scope = %scope, "Search started");

        let result = tokio::select! {
            biased;
            () = token.cancelled() => None,
            result = self.run(query, scope) => Some(result),
        };

        match result {
            None => {
                info!(search = id, query, "Search canceled");
                self.settle(id, SearchState::Canceled);
                Ok(SearchOutcome::Canceled)
            }
            Some(Ok(results)) => {
                lock(&self.recent).record(query);
                info!(
                    search = id,
                    query,
                    results = results.tracks.len(),
                    failures = results.failures.len(),
                    "Search completed"
                );
                self.settle(id, SearchState::Completed);
                Ok(SearchOutcome::Completed(results))
            }
            Some(Err(e)) => {
                warn!(search = id, query, error = %e, "Search failed");
                self.settle(id, SearchState::Failed);
                Err(e)
            }
        }
    }

    /// Update the observable state unless a newer search has started.
    fn settle(&self, id: u64, state: SearchState) {
        if self.last_id.load(Ordering::SeqCst) == id {
            *lock(&self.state) = state;
        }
    }

    fn timeout(&self) -> Duration {
        self.settings.provider_timeout()
    }

    async fn run(&self, query: &str, scope: SearchScope) -> Result<SearchResults> {
        let enabled = self.registry.enabled();
        if enabled.is_empty() {
            return Err(SearchError::NoProviders);
        }

        if let Some(results) = self.resolve_special_url(query, &enabled).await {
            return Ok(results);
        }

        let dispatched: Vec<Arc<dyn ProviderAdapter>> = enabled
            .into_iter()
            .filter(|adapter| scope.includes(adapter.provider_name()))
            .collect();
        if dispatched.is_empty() {
            return Err(SearchError::NoProviders);
        }

        let (mut tracks, failures) = match self.settings.failure_policy {
            FailurePolicy::Degrade => self.search_degrading(query, &dispatched).await?,
            FailurePolicy::Escalate => (self.search_escalating(query, &dispatched).await?, Vec::new()),
        };

        sort_by_popularity(&mut tracks);
        Ok(SearchResults {
            query: query.to_string(),
            tracks,
            playlist: None,
            failures,
            resolved_by: None,
        })
    }

    /// Try every enabled adapter in order; the first match wins.
    async fn resolve_special_url(
        &self,
        query: &str,
        enabled: &[Arc<dyn ProviderAdapter>],
    ) -> Option<SearchResults> {
        let timeout = self.timeout();

        for adapter in enabled {
            let provider = adapter.provider_name();
            match time::timeout(timeout, adapter.resolve_special_url(query)).await {
                Ok(SpecialUrlMatch::Matched { mut tracks, playlist }) => {
                    info!(
                        provider = %provider,
                        results = tracks.len(),
                        playlist = playlist.as_ref().map(|p| p.title.as_str()),
                        "Query resolved as provider URL"
                    );
                    sort_by_popularity(&mut tracks);
                    return Some(SearchResults {
                        query: query.to_string(),
                        tracks,
                        playlist,
                        failures: Vec::new(),
                        resolved_by: Some(provider),
                    });
                }
                Ok(SpecialUrlMatch::NotMatched) => {}
                Err(_) => warn!(provider = %provider, ?timeout, "Special URL check timed out"),
            }
        }

        None
    }

    async fn search_one(
        adapter: Arc<dyn ProviderAdapter>,
        query: &str,
        timeout: Duration,
    ) -> (ProviderName, std::result::Result<Vec<WebTrackResult>, ProviderError>) {
        let provider = adapter.provider_name();
        let result = match time::timeout(timeout, adapter.search(query)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout {
                provider,
                after: timeout,
            }),
        };
        (provider, result)
    }

    /// Wait for every provider; failures are recorded, not fatal, unless all fail.
    async fn search_degrading(
        &self,
        query: &str,
        dispatched: &[Arc<dyn ProviderAdapter>],
    ) -> Result<(Vec<WebTrackResult>, Vec<ProviderFailure>)> {
        let timeout = self.timeout();
        let searches = dispatched
            .iter()
            .map(|adapter| Self::search_one(Arc::clone(adapter), query, timeout));

        let mut tracks = Vec::new();
        let mut failures = Vec::new();

        for (provider, result) in join_all(searches).await {
            match result {
                Ok(found) => {
                    debug!(provider = %provider, results = found.len(), "Provider search finished");
                    tracks.extend(found);
                }
                Err(e) => {
                    log_failure(&e);
                    failures.push(ProviderFailure::from(e));
                }
            }
        }

        if failures.len() == dispatched.len() {
            return Err(SearchError::AllProvidersFailed(failures));
        }

        Ok((tracks, failures))
    }

    /// The first provider error fails the whole search.
    async fn search_escalating(
        &self,
        query: &str,
        dispatched: &[Arc<dyn ProviderAdapter>],
    ) -> Result<Vec<WebTrackResult>> {
        let timeout = self.timeout();
        let searches = dispatched.iter().map(|adapter| {
            let adapter = Arc::clone(adapter);
            async move {
                match Self::search_one(adapter, query, timeout).await {
                    (_, Ok(found)) => Ok(found),
                    (_, Err(e)) => {
                        log_failure(&e);
                        Err(SearchError::Provider(ProviderFailure::from(e)))
                    }
                }
            }
        });

        let per_provider = try_join_all(searches).await?;
        Ok(per_provider.into_iter().flatten().collect())
    }
}

fn log_failure(err: &ProviderError) {
    if err.is_auth() {
        error!(provider = %err.provider(), error = %err, "Provider rejected credentials");
    } else {
        warn!(provider = %err.provider(), error = %err, "Provider search failed");
    }
}
