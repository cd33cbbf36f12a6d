//! Shared HTTP plumbing for every adapter.

use crate::error::{ProviderError, Result};
use gale_core::{HttpSettings, ProviderName};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

/// Thin wrapper over a `reqwest::Client` that maps statuses into
/// [`ProviderError`]s.
///
/// Request URLs carry API credentials in their query string, so only the
/// path is ever logged.
#[derive(Clone, Debug)]
pub struct HttpClient {
    http: Client,
}

impl HttpClient {
    /// Build a client with the configured timeouts and user agent.
    pub fn new(settings: &HttpSettings) -> reqwest::Result<Self> {
        let http = Client::builder()
            .timeout(settings.timeout())
            .connect_timeout(settings.connect_timeout())
            .user_agent(settings.user_agent.clone())
            .build()?;

        Ok(Self { http })
    }

    /// Wrap an already configured client.
    pub fn from_client(http: Client) -> Self {
        Self { http }
    }

    /// Underlying reqwest client, for streaming downloads.
    pub fn inner(&self) -> &Client {
        &self.http
    }

    /// GET `url` and return the response if its status is a success.
    ///
    /// Redirects are followed; the final location is available through
    /// [`Response::url`].
    pub async fn get(&self, provider: ProviderName, url: Url) -> Result<Response> {
        debug!(provider = %provider, path = url.path(), "GET");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::transport(provider, e))?;

        check_status(provider, response).await
    }

    /// GET `url` and deserialize the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, provider: ProviderName, url: Url) -> Result<T> {
        let response = self.get(provider, url).await?;
        let path = response.url().path().to_string();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::transport(provider, e))?;

        serde_json::from_str(&body).map_err(|e| {
            warn!(provider = %provider, path = %path, error = %e, "Failed to parse response");
            ProviderError::unexpected(provider, format!("{path}: {e}"))
        })
    }

    /// GET `url` and return the raw body.
    pub async fn get_bytes(&self, provider: ProviderName, url: Url) -> Result<Vec<u8>> {
        let response = self.get(provider, url).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ProviderError::transport(provider, e))?;
        Ok(bytes.to_vec())
    }
}

/// Map a non-success response onto the error taxonomy.
pub async fn check_status(provider: ProviderName, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let path = response.url().path().to_string();
    let retry_after_secs = response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok());
    let message = response.text().await.unwrap_or_default();

    warn!(provider = %provider, status = status.as_u16(), path = %path, "Request failed");

    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::Auth { provider, message },
        StatusCode::NOT_FOUND => ProviderError::NotFound { provider, path },
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited {
            provider,
            retry_after_secs,
        },
        _ => ProviderError::Status {
            provider,
            status: status.as_u16(),
            message,
        },
    })
}

/// Join `path` onto an API base that may or may not end in `/`.
pub fn endpoint(provider: ProviderName, base: &str, path: &str) -> Result<Url> {
    let joined = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    Url::parse(&joined).map_err(|e| ProviderError::invalid_url(provider, e))
}

/// Set `key` to `value`, replacing any existing occurrences.
pub fn set_query_param(url: &mut Url, key: &str, value: &str) {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != key)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut pairs = url.query_pairs_mut();
    pairs.clear();
    for (k, v) in &kept {
        pairs.append_pair(k, v);
    }
    pairs.append_pair(key, value);
}
