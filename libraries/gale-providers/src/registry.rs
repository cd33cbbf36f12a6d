//! The set of adapters known to the application.

use crate::adapter::ProviderAdapter;
use crate::http::HttpClient;
use crate::soundcloud::SoundCloudApi;
use crate::youtube::YouTubeApi;
use gale_core::{GaleConfig, ProviderName};
use std::sync::Arc;
use tracing::info;

/// Ordered collection of provider adapters.
///
/// Registration order is the order special-URL checks run in.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    adapters: Vec<Arc<dyn ProviderAdapter>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the SoundCloud and YouTube adapters from configuration.
    ///
    /// Both are always registered; those without credentials report
    /// themselves disabled.
    pub fn from_config(config: &GaleConfig) -> reqwest::Result<Self> {
        let http = HttpClient::new(&config.http)?;
        let registry = Self::new()
            .with(Arc::new(SoundCloudApi::new(
                http.clone(),
                config.providers.soundcloud.clone(),
                &config.pagination,
            )))
            .with(Arc::new(YouTubeApi::new(
                http,
                config.providers.youtube.clone(),
                &config.pagination,
            )));

        info!(
            enabled = ?registry.enabled().iter().map(|a| a.provider_name()).collect::<Vec<_>>(),
            "Provider registry ready"
        );
        Ok(registry)
    }

    /// Add an adapter, replacing any previous adapter for the same provider.
    pub fn register(&mut self, adapter: Arc<dyn ProviderAdapter>) {
        let name = adapter.provider_name();
        self.adapters.retain(|a| a.provider_name() != name);
        self.adapters.push(adapter);
    }

    pub fn with(mut self, adapter: Arc<dyn ProviderAdapter>) -> Self {
        self.register(adapter);
        self
    }

    pub fn all(&self) -> &[Arc<dyn ProviderAdapter>] {
        &self.adapters
    }

    /// Adapters that are enabled, in registration order
    pub fn enabled(&self) -> Vec<Arc<dyn ProviderAdapter>> {
        self.adapters
            .iter()
            .filter(|a| a.is_enabled())
            .cloned()
            .collect()
    }

    pub fn get(&self, name: ProviderName) -> Option<Arc<dyn ProviderAdapter>> {
        self.adapters
            .iter()
            .find(|a| a.provider_name() == name)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.adapters.iter().map(|a| a.provider_name()))
            .finish()
    }
}
