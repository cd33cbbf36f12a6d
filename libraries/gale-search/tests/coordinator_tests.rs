//! Behaviour of the search coordinator against in-process fake providers.

use async_trait::async_trait;
use gale_core::{FailurePolicy, ProviderName, SearchSettings};
use gale_providers::soundcloud::SoundCloudTrack;
use gale_providers::youtube::{VideoSnippet, VideoStatistics, YouTubeVideo};
use gale_providers::{
    normalize, PlaylistResolution, ProviderAdapter, ProviderError, ProviderRegistry,
    SpecialUrlMatch, WebTrackResult,
};
use gale_search::{
    FailureKind, SearchCoordinator, SearchError, SearchOutcome, SearchScope, SearchState,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

// ===== Helpers =====

fn soundcloud_result(title: &str, plays: u64) -> WebTrackResult {
    normalize(
        SoundCloudTrack {
            id: plays,
            title: title.to_string(),
            playback_count: Some(plays),
            streamable: Some(true),
            ..Default::default()
        }
        .into(),
    )
}

fn youtube_result(title: &str, views: u64) -> WebTrackResult {
    normalize(
        YouTubeVideo {
            id: format!("{title:_<11}"),
            snippet: VideoSnippet {
                title: title.to_string(),
                ..Default::default()
            },
            statistics: Some(VideoStatistics {
                view_count: Some(views.to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }
        .into(),
    )
}

type ResultsFn = Box<dyn Fn(&str) -> Result<Vec<WebTrackResult>, ProviderError> + Send + Sync>;

/// Provider double with scripted behaviour.
struct FakeProvider {
    name: ProviderName,
    enabled: bool,
    special_url: Option<(String, SpecialUrlMatch)>,
    results: ResultsFn,
    delay: Option<Duration>,
    /// Queries equal to this block until `release` is notified
    gated_query: Option<String>,
    entered: Arc<Notify>,
    release: Arc<Notify>,
    searches: AtomicUsize,
    url_checks: AtomicUsize,
}

impl FakeProvider {
    fn new(name: ProviderName, results: ResultsFn) -> Self {
        Self {
            name,
            enabled: true,
            special_url: None,
            results,
            delay: None,
            gated_query: None,
            entered: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
            searches: AtomicUsize::new(0),
            url_checks: AtomicUsize::new(0),
        }
    }

    fn returning(name: ProviderName, tracks: Vec<WebTrackResult>) -> Self {
        Self::new(name, Box::new(move |_: &str| Ok::<_, ProviderError>(tracks.clone())))
    }

    fn failing(name: ProviderName, make: fn(ProviderName) -> ProviderError) -> Self {
        Self::new(
            name,
            Box::new(move |_: &str| Err::<Vec<WebTrackResult>, _>(make(name))),
        )
    }

    fn with_special_url(mut self, url: &str, found: SpecialUrlMatch) -> Self {
        self.special_url = Some((url.to_string(), found));
        self
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn gated_on(mut self, query: &str) -> Self {
        self.gated_query = Some(query.to_string());
        self
    }

    fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    fn searches(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProviderAdapter for FakeProvider {
    fn provider_name(&self) -> ProviderName {
        self.name
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn resolve_special_url(&self, input: &str) -> SpecialUrlMatch {
        self.url_checks.fetch_add(1, Ordering::SeqCst);
        match &self.special_url {
            Some((url, found)) if url == input => found.clone(),
            _ => SpecialUrlMatch::NotMatched,
        }
    }

    async fn search(&self, query: &str) -> gale_providers::Result<Vec<WebTrackResult>> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        if self.gated_query.as_deref() == Some(query) {
            self.entered.notify_one();
            self.release.notified().await;
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        (self.results)(query)
    }
}

fn http_500(provider: ProviderName) -> ProviderError {
    ProviderError::Status {
        provider,
        status: 500,
        message: "internal".to_string(),
    }
}

fn revoked(provider: ProviderName) -> ProviderError {
    ProviderError::Auth {
        provider,
        message: "revoked".to_string(),
    }
}

fn settings() -> SearchSettings {
    SearchSettings {
        provider_timeout_secs: 15,
        ..Default::default()
    }
}

fn coordinator(providers: Vec<Arc<FakeProvider>>, settings: SearchSettings) -> SearchCoordinator {
    let mut registry = ProviderRegistry::new();
    for provider in providers {
        registry.register(provider);
    }
    SearchCoordinator::new(registry, settings)
}

fn titles(outcome: &SearchOutcome) -> Vec<String> {
    outcome
        .results()
        .expect("completed search")
        .tracks
        .iter()
        .map(|t| t.title.clone())
        .collect()
}

// ===== Keyword Search =====

#[tokio::test]
async fn test_merge_orders_by_popularity_with_stable_ties() {
    let soundcloud = Arc::new(FakeProvider::returning(
        ProviderName::SoundCloud,
        vec![
            soundcloud_result("a", 10),
            soundcloud_result("b", 5),
            soundcloud_result("c", 5),
        ],
    ));
    let youtube = Arc::new(FakeProvider::returning(
        ProviderName::YouTube,
        vec![youtube_result("d", 7), youtube_result("e", 5)],
    ));
    let coordinator = coordinator(vec![soundcloud, youtube], settings());

    let outcome = coordinator.start_search("lofi", SearchScope::All).await.unwrap();

    assert_eq!(titles(&outcome), vec!["a", "d", "b", "c", "e"]);
    assert_eq!(coordinator.state(), SearchState::Completed);
    assert!(!coordinator.is_searching());
}

#[tokio::test]
async fn test_plain_text_checks_every_provider_url_then_searches() {
    let soundcloud = Arc::new(FakeProvider::returning(ProviderName::SoundCloud, vec![]));
    let youtube = Arc::new(FakeProvider::returning(
        ProviderName::YouTube,
        vec![youtube_result("hit", 1)],
    ));
    let coordinator = coordinator(vec![soundcloud.clone(), youtube.clone()], settings());

    let outcome = coordinator.start_search("lofi beats", SearchScope::All).await.unwrap();

    assert_eq!(soundcloud.url_checks.load(Ordering::SeqCst), 1);
    assert_eq!(youtube.url_checks.load(Ordering::SeqCst), 1);
    assert_eq!(soundcloud.searches(), 1);
    assert_eq!(titles(&outcome), vec!["hit"]);
    assert!(!outcome.results().unwrap().is_url_resolution());
}

#[tokio::test]
async fn test_nothing_found_is_not_an_error() {
    let soundcloud = Arc::new(FakeProvider::returning(ProviderName::SoundCloud, vec![]));
    let coordinator = coordinator(vec![soundcloud], settings());

    let outcome = coordinator.start_search("zzzz", SearchScope::All).await.unwrap();
    let results = outcome.results().unwrap();

    assert!(results.nothing_found());
    assert!(results.failures.is_empty());
}

#[tokio::test]
async fn test_scope_limits_keyword_dispatch() {
    let soundcloud = Arc::new(FakeProvider::returning(
        ProviderName::SoundCloud,
        vec![soundcloud_result("sc", 1)],
    ));
    let youtube = Arc::new(FakeProvider::returning(
        ProviderName::YouTube,
        vec![youtube_result("yt", 1)],
    ));
    let coordinator = coordinator(vec![soundcloud.clone(), youtube.clone()], settings());

    let outcome = coordinator
        .start_search("lofi", SearchScope::Only(ProviderName::YouTube))
        .await
        .unwrap();

    assert_eq!(titles(&outcome), vec!["yt"]);
    assert_eq!(soundcloud.searches(), 0);
    assert_eq!(soundcloud.url_checks.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_disabled_providers_are_skipped() {
    let soundcloud = Arc::new(
        FakeProvider::returning(ProviderName::SoundCloud, vec![soundcloud_result("sc", 1)])
            .disabled(),
    );
    let coordinator = coordinator(vec![soundcloud.clone()], settings());

    let err = coordinator.start_search("lofi", SearchScope::All).await.unwrap_err();

    assert_eq!(err, SearchError::NoProviders);
    assert_eq!(soundcloud.searches(), 0);
    assert_eq!(coordinator.state(), SearchState::Failed);
}

// ===== Special URLs =====

#[tokio::test]
async fn test_special_url_short_circuits_keyword_search() {
    let url = "https://soundcloud.com/someone/sets/mix";
    let playlist = PlaylistResolution {
        title: "Mix".to_string(),
        owner: "someone".to_string(),
        artwork_url: None,
        tracks: vec![soundcloud_result("low", 1), soundcloud_result("high", 9)],
    };
    let soundcloud = Arc::new(
        FakeProvider::returning(ProviderName::SoundCloud, vec![soundcloud_result("kw", 100)])
            .with_special_url(url, SpecialUrlMatch::playlist(playlist)),
    );
    let youtube = Arc::new(FakeProvider::returning(
        ProviderName::YouTube,
        vec![youtube_result("kw", 100)],
    ));
    let coordinator = coordinator(vec![soundcloud.clone(), youtube.clone()], settings());

    let outcome = coordinator.start_search(url, SearchScope::All).await.unwrap();
    let results = outcome.results().unwrap();

    assert_eq!(results.resolved_by, Some(ProviderName::SoundCloud));
    assert_eq!(titles(&outcome), vec!["high", "low"]);
    let native: Vec<_> = results
        .playlist
        .as_ref()
        .unwrap()
        .tracks
        .iter()
        .map(|t| t.title.as_str())
        .collect();
    assert_eq!(native, vec!["low", "high"]);

    assert_eq!(soundcloud.searches(), 0);
    assert_eq!(youtube.searches(), 0);
    assert_eq!(youtube.url_checks.load(Ordering::SeqCst), 0);
}

// ===== Failure Policy =====

#[tokio::test]
async fn test_degrade_keeps_results_of_healthy_providers() {
    let soundcloud = Arc::new(FakeProvider::failing(ProviderName::SoundCloud, http_500));
    let youtube = Arc::new(FakeProvider::returning(
        ProviderName::YouTube,
        vec![youtube_result("ok", 3)],
    ));
    let coordinator = coordinator(vec![soundcloud, youtube], settings());

    let outcome = coordinator.start_search("lofi", SearchScope::All).await.unwrap();
    let results = outcome.results().unwrap();

    assert_eq!(titles(&outcome), vec!["ok"]);
    assert_eq!(results.failures.len(), 1);
    assert_eq!(results.failures[0].provider, ProviderName::SoundCloud);
    assert_eq!(results.failures[0].kind, FailureKind::Transport);
    assert_eq!(results.auth_failures().count(), 0);
}

#[tokio::test]
async fn test_auth_failures_are_surfaced() {
    let soundcloud = Arc::new(FakeProvider::failing(ProviderName::SoundCloud, revoked));
    let youtube = Arc::new(FakeProvider::returning(
        ProviderName::YouTube,
        vec![youtube_result("ok", 3)],
    ));
    let coordinator = coordinator(vec![soundcloud, youtube], settings());

    let outcome = coordinator.start_search("lofi", SearchScope::All).await.unwrap();
    let auth: Vec<_> = outcome.results().unwrap().auth_failures().collect();

    assert_eq!(auth.len(), 1);
    assert_eq!(auth[0].provider, ProviderName::SoundCloud);
}

#[tokio::test]
async fn test_every_provider_failing_is_an_error() {
    let soundcloud = Arc::new(FakeProvider::failing(ProviderName::SoundCloud, revoked));
    let youtube = Arc::new(FakeProvider::failing(ProviderName::YouTube, http_500));
    let coordinator = coordinator(vec![soundcloud, youtube], settings());

    let err = coordinator.start_search("lofi", SearchScope::All).await.unwrap_err();

    match &err {
        SearchError::AllProvidersFailed(failures) => assert_eq!(failures.len(), 2),
        other => panic!("Expected AllProvidersFailed, got {other:?}"),
    }
    assert!(err.is_auth());
    assert!(coordinator.recent_searches().is_empty());
}

#[tokio::test]
async fn test_escalate_fails_on_provider_error() {
    let soundcloud = Arc::new(FakeProvider::failing(ProviderName::SoundCloud, http_500));
    let youtube = Arc::new(FakeProvider::returning(
        ProviderName::YouTube,
        vec![youtube_result("ok", 3)],
    ));
    let settings = SearchSettings {
        failure_policy: FailurePolicy::Escalate,
        ..settings()
    };
    let coordinator = coordinator(vec![soundcloud, youtube], settings);

    let err = coordinator.start_search("lofi", SearchScope::All).await.unwrap_err();

    match err {
        SearchError::Provider(failure) => assert_eq!(failure.provider, ProviderName::SoundCloud),
        other => panic!("Expected Provider error, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_slow_provider_times_out_without_blocking_merge() {
    let soundcloud = Arc::new(
        FakeProvider::returning(ProviderName::SoundCloud, vec![soundcloud_result("late", 99)])
            .with_delay(Duration::from_secs(60)),
    );
    let youtube = Arc::new(FakeProvider::returning(
        ProviderName::YouTube,
        vec![youtube_result("fast", 1)],
    ));
    let coordinator = coordinator(vec![soundcloud, youtube], settings());

    let outcome = coordinator.start_search("lofi", SearchScope::All).await.unwrap();
    let results = outcome.results().unwrap();

    assert_eq!(titles(&outcome), vec!["fast"]);
    assert_eq!(results.failures.len(), 1);
    assert_eq!(results.failures[0].kind, FailureKind::Timeout);
}

// ===== Cancellation and Rendezvous =====

#[tokio::test]
async fn test_new_search_supersedes_running_search() {
    let soundcloud = Arc::new(
        FakeProvider::new(
            ProviderName::SoundCloud,
            Box::new(|query: &str| {
                Ok::<_, ProviderError>(vec![soundcloud_result(&format!("{query}-result"), 1)])
            }),
        )
        .gated_on("first"),
    );
    let coordinator = Arc::new(coordinator(vec![soundcloud.clone()], settings()));

    let first = tokio::spawn({
        let coordinator = Arc::clone(&coordinator);
        async move { coordinator.start_search("first", SearchScope::All).await }
    });
    soundcloud.entered.notified().await;
    assert!(coordinator.is_searching());
    assert_eq!(coordinator.state(), SearchState::Searching);

    let second = coordinator.start_search("second", SearchScope::All).await.unwrap();
    let first = first.await.unwrap().unwrap();

    assert!(first.is_canceled());
    assert_eq!(titles(&second), vec!["second-result"]);
    assert_eq!(coordinator.state(), SearchState::Completed);
    assert!(!coordinator.is_searching());
    assert_eq!(coordinator.recent_searches(), vec!["second".to_string()]);
}

#[tokio::test]
async fn test_dropped_waiter_does_not_release_later_search_early() {
    let soundcloud = Arc::new(
        FakeProvider::new(
            ProviderName::SoundCloud,
            Box::new(|query: &str| {
                Ok::<_, ProviderError>(vec![soundcloud_result(&format!("{query}-result"), 1)])
            }),
        )
        .gated_on("first"),
    );
    let coordinator = coordinator(vec![soundcloud.clone()], settings());

    // Held but not polled, so it cannot acknowledge cancellation yet.
    let mut first = Box::pin(coordinator.start_search("first", SearchScope::All));
    tokio::select! {
        _ = &mut first => panic!("first search finished while gated"),
        () = soundcloud.entered.notified() => {}
    }

    let second = coordinator.start_search("second", SearchScope::All);
    assert!(tokio::time::timeout(Duration::from_millis(50), second).await.is_err());

    let third = coordinator.start_search("third", SearchScope::All);
    tokio::pin!(third);
    assert!(tokio::time::timeout(Duration::from_millis(50), &mut third).await.is_err());
    assert_eq!(soundcloud.searches(), 1);

    assert!(first.await.unwrap().is_canceled());
    let third = third.await.unwrap();

    assert_eq!(titles(&third), vec!["third-result"]);
    assert_eq!(soundcloud.searches(), 2);
    assert_eq!(coordinator.state(), SearchState::Completed);
    assert!(!coordinator.is_searching());
}

#[tokio::test]
async fn test_explicit_cancel() {
    let soundcloud = Arc::new(
        FakeProvider::returning(ProviderName::SoundCloud, vec![soundcloud_result("x", 1)])
            .gated_on("slow"),
    );
    let coordinator = Arc::new(coordinator(vec![soundcloud.clone()], settings()));

    let running = tokio::spawn({
        let coordinator = Arc::clone(&coordinator);
        async move { coordinator.start_search("slow", SearchScope::All).await }
    });
    soundcloud.entered.notified().await;

    coordinator.cancel_and_wait().await;

    assert!(running.await.unwrap().unwrap().is_canceled());
    assert_eq!(coordinator.state(), SearchState::Canceled);
    assert!(!coordinator.is_searching());
    assert!(!coordinator.cancel());
}

#[tokio::test]
async fn test_blank_query_does_not_cancel_running_search() {
    let soundcloud = Arc::new(
        FakeProvider::returning(ProviderName::SoundCloud, vec![soundcloud_result("kept", 1)])
            .gated_on("slow"),
    );
    let coordinator = Arc::new(coordinator(vec![soundcloud.clone()], settings()));

    let running = tokio::spawn({
        let coordinator = Arc::clone(&coordinator);
        async move { coordinator.start_search("slow", SearchScope::All).await }
    });
    soundcloud.entered.notified().await;

    let err = coordinator.start_search("   ", SearchScope::All).await.unwrap_err();
    assert_eq!(err, SearchError::EmptyQuery);
    assert!(coordinator.is_searching());

    soundcloud.release.notify_one();
    let outcome = running.await.unwrap().unwrap();
    assert_eq!(titles(&outcome), vec!["kept"]);
}

// ===== Recent Searches =====

#[tokio::test]
async fn test_recent_searches_move_duplicates_to_front() {
    let soundcloud = Arc::new(FakeProvider::returning(ProviderName::SoundCloud, vec![]));
    let coordinator = coordinator(vec![soundcloud], settings())
        .with_recent_searches(vec!["older".to_string()]);

    for query in ["Lofi", "jazz", "LOFI"] {
        coordinator.start_search(query, SearchScope::All).await.unwrap();
    }

    assert_eq!(coordinator.recent_searches(), vec!["Lofi", "jazz", "older"]);
}

#[tokio::test]
async fn test_recent_searches_respect_capacity() {
    let soundcloud = Arc::new(FakeProvider::returning(ProviderName::SoundCloud, vec![]));
    let settings = SearchSettings {
        max_recent_searches: 2,
        ..settings()
    };
    let coordinator = coordinator(vec![soundcloud], settings);

    for query in ["a", "b", "c"] {
        coordinator.start_search(query, SearchScope::All).await.unwrap();
    }

    assert_eq!(coordinator.recent_searches(), vec!["c", "b"]);
}
