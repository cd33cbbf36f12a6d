//! Error types for search coordination.

use gale_core::ProviderName;
use gale_providers::ProviderError;
use std::fmt;
use thiserror::Error;

/// Broad category of a provider failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Credentials are missing, invalid or revoked
    Auth,
    /// The provider did not answer within the per-provider timeout
    Timeout,
    /// Network failure, rate limit or server error
    Transport,
    /// Unexpected status or response shape
    Response,
}

/// A provider that failed during a search, kept in the outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderFailure {
    pub provider: ProviderName,
    pub kind: FailureKind,
    pub message: String,
}

impl ProviderFailure {
    pub fn is_auth(&self) -> bool {
        self.kind == FailureKind::Auth
    }
}

impl From<ProviderError> for ProviderFailure {
    fn from(err: ProviderError) -> Self {
        let kind = if err.is_auth() {
            FailureKind::Auth
        } else if matches!(err, ProviderError::Timeout { .. }) {
            FailureKind::Timeout
        } else if err.is_transient() {
            FailureKind::Transport
        } else {
            FailureKind::Response
        };

        Self {
            provider: err.provider(),
            kind,
            message: err.to_string(),
        }
    }
}

impl fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Errors that can end a search.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// Blank queries are rejected before anything else happens
    #[error("Search query is empty")]
    EmptyQuery,

    /// No enabled provider is in scope
    #[error("No enabled provider to search")]
    NoProviders,

    /// Every dispatched provider failed
    #[error("All providers failed: {}", join(.0))]
    AllProvidersFailed(Vec<ProviderFailure>),

    /// A provider failed and the failure policy escalates
    #[error("{0}")]
    Provider(ProviderFailure),
}

impl SearchError {
    /// Whether any failure behind this error is a credentials problem
    pub fn is_auth(&self) -> bool {
        match self {
            SearchError::AllProvidersFailed(failures) => failures.iter().any(ProviderFailure::is_auth),
            SearchError::Provider(failure) => failure.is_auth(),
            _ => false,
        }
    }
}

fn join(failures: &[ProviderFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;
