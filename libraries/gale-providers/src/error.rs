//! Error types for provider adapters.

use gale_core::ProviderName;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while talking to a music catalog.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Request never produced a response (DNS, connect, TLS, body read)
    #[error("{provider} request failed: {source}")]
    Transport {
        provider: ProviderName,
        #[source]
        source: reqwest::Error,
    },

    /// Provider did not answer within the allotted time
    #[error("{provider} did not answer within {after:?}")]
    Timeout {
        provider: ProviderName,
        after: Duration,
    },

    /// Provider answered with a non-success status
    #[error("{provider} returned HTTP {status}: {message}")]
    Status {
        provider: ProviderName,
        status: u16,
        message: String,
    },

    /// Resource does not exist
    #[error("{provider} has no resource at {path}")]
    NotFound { provider: ProviderName, path: String },

    /// Rate limited by the provider
    #[error("{provider} rate limited the request")]
    RateLimited {
        provider: ProviderName,
        retry_after_secs: Option<u64>,
    },

    /// Credentials are invalid or revoked
    #[error("{provider} rejected the configured credentials: {message}")]
    Auth {
        provider: ProviderName,
        message: String,
    },

    /// No credentials configured for an adapter that needs them
    #[error("{provider} has no credentials configured")]
    NotConfigured { provider: ProviderName },

    /// Response body could not be parsed
    #[error("{provider} returned an unexpected response: {message}")]
    UnexpectedResponse {
        provider: ProviderName,
        message: String,
    },

    /// A continuation listing ran past its page bound or repeated a cursor
    #[error("{provider} listing did not terminate within {limit} pages")]
    PaginationLimit { provider: ProviderName, limit: usize },

    /// A request URL could not be built
    #[error("invalid {provider} URL: {message}")]
    InvalidUrl {
        provider: ProviderName,
        message: String,
    },
}

impl ProviderError {
    /// Provider the error originated from
    pub fn provider(&self) -> ProviderName {
        match self {
            ProviderError::Transport { provider, .. }
            | ProviderError::Timeout { provider, .. }
            | ProviderError::Status { provider, .. }
            | ProviderError::NotFound { provider, .. }
            | ProviderError::RateLimited { provider, .. }
            | ProviderError::Auth { provider, .. }
            | ProviderError::NotConfigured { provider }
            | ProviderError::UnexpectedResponse { provider, .. }
            | ProviderError::PaginationLimit { provider, .. }
            | ProviderError::InvalidUrl { provider, .. } => *provider,
        }
    }

    /// Credentials problem the user has to fix
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            ProviderError::Auth { .. } | ProviderError::NotConfigured { .. }
        )
    }

    /// Failure that might go away on retry
    pub fn is_transient(&self) -> bool {
        match self {
            ProviderError::Transport { .. }
            | ProviderError::Timeout { .. }
            | ProviderError::RateLimited { .. } => true,
            ProviderError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }

    pub(crate) fn transport(provider: ProviderName, source: reqwest::Error) -> Self {
        Self::Transport { provider, source }
    }

    pub(crate) fn unexpected(provider: ProviderName, message: impl Into<String>) -> Self {
        Self::UnexpectedResponse {
            provider,
            message: message.into(),
        }
    }

    pub(crate) fn invalid_url(provider: ProviderName, err: impl std::fmt::Display) -> Self {
        Self::InvalidUrl {
            provider,
            message: err.to_string(),
        }
    }
}

/// Result type for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;
