/// Gale configuration (file + environment layering)
use crate::error::{GaleError, Result};
use crate::types::{ImageQuality, ProviderName};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level configuration shared by every Gale component.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GaleConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,

    #[serde(default)]
    pub search: SearchSettings,

    #[serde(default)]
    pub pagination: PaginationSettings,

    #[serde(default)]
    pub http: HttpSettings,

    #[serde(default)]
    pub download: DownloadSettings,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub soundcloud: SoundCloudSettings,

    #[serde(default)]
    pub youtube: YouTubeSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SoundCloudSettings {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// API client id; the provider stays disabled without one
    #[serde(default)]
    pub client_id: Option<String>,

    #[serde(default = "default_soundcloud_api")]
    pub api_base: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct YouTubeSettings {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Data API v3 key; the provider stays disabled without one
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_youtube_api")]
    pub api_base: String,
}

/// What the search coordinator does when an individual provider fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Record the failure and merge whatever the other providers returned
    #[default]
    Degrade,
    /// Fail the whole search on the first provider error
    Escalate,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchSettings {
    #[serde(default = "default_provider_timeout_secs")]
    pub provider_timeout_secs: u64,

    #[serde(default)]
    pub failure_policy: FailurePolicy,

    #[serde(default = "default_max_recent_searches")]
    pub max_recent_searches: usize,

    /// Restrict keyword search to one provider (`None` searches all enabled providers).
    ///
    /// Written as `"all"` or a provider key in configuration.
    #[serde(default, with = "scope_setting")]
    pub scope: Option<ProviderName>,
}

/// `"all"` maps to `None`, anything else must name a provider.
mod scope_setting {
    use crate::types::ProviderName;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        scope: &Option<ProviderName>,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(scope.map_or("all", |provider| provider.key()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Option<ProviderName>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(value) if value.trim().eq_ignore_ascii_case("all") => Ok(None),
            Some(value) => value.parse().map(Some).map_err(de::Error::custom),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaginationSettings {
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Upper bound on continuation requests for one listing
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpSettings {
    #[serde(default = "default_http_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DownloadSettings {
    /// Where artwork is staged while a download is tagged (OS temp dir when unset)
    #[serde(default)]
    pub scratch_dir: Option<PathBuf>,

    #[serde(default)]
    pub artwork_quality: ImageQuality,
}

fn default_enabled() -> bool {
    true
}

fn default_soundcloud_api() -> String {
    "https://api.soundcloud.com".to_string()
}

fn default_youtube_api() -> String {
    "https://www.googleapis.com/youtube/v3".to_string()
}

fn default_provider_timeout_secs() -> u64 {
    15
}

fn default_max_recent_searches() -> usize {
    50
}

fn default_page_size() -> u32 {
    200
}

fn default_max_pages() -> usize {
    500
}

fn default_http_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("Gale/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for SoundCloudSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            client_id: None,
            api_base: default_soundcloud_api(),
        }
    }
}

impl Default for YouTubeSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            api_key: None,
            api_base: default_youtube_api(),
        }
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            provider_timeout_secs: default_provider_timeout_secs(),
            failure_policy: FailurePolicy::default(),
            max_recent_searches: default_max_recent_searches(),
            scope: None,
        }
    }
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            max_pages: default_max_pages(),
        }
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_http_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl SoundCloudSettings {
    /// Enabled in config and a client id is present
    pub fn is_active(&self) -> bool {
        self.enabled && self.client_id.as_deref().is_some_and(|id| !id.trim().is_empty())
    }
}

impl YouTubeSettings {
    /// Enabled in config and an API key is present
    pub fn is_active(&self) -> bool {
        self.enabled && self.api_key.as_deref().is_some_and(|key| !key.trim().is_empty())
    }
}

impl SearchSettings {
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }
}

impl HttpSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl GaleConfig {
    /// Load configuration from an optional TOML file and the environment.
    ///
    /// Environment variables use the `GALE` prefix with `__` between path
    /// segments, e.g. `GALE__PROVIDERS__SOUNDCLOUD__CLIENT_ID`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        if let Some(path) = path {
            settings = settings.add_source(config::File::from(path.to_path_buf()).required(true));
        }

        settings = settings.add_source(
            config::Environment::with_prefix("GALE")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text (no environment overlay).
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = config::Config::builder()
            .add_source(config::File::from_str(text, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.pagination.page_size == 0 {
            return Err(GaleError::config("pagination.page_size must be positive"));
        }

        if self.pagination.max_pages == 0 {
            return Err(GaleError::config("pagination.max_pages must be positive"));
        }

        if self.search.provider_timeout_secs == 0 {
            return Err(GaleError::config(
                "search.provider_timeout_secs must be positive",
            ));
        }

        if self.http.timeout_secs == 0 || self.http.connect_timeout_secs == 0 {
            return Err(GaleError::config("http timeouts must be positive"));
        }

        if matches!(self.providers.soundcloud.client_id.as_deref(), Some(id) if id.trim().is_empty())
        {
            return Err(GaleError::config(
                "providers.soundcloud.client_id is set but blank",
            ));
        }

        if matches!(self.providers.youtube.api_key.as_deref(), Some(key) if key.trim().is_empty())
        {
            return Err(GaleError::config("providers.youtube.api_key is set but blank"));
        }

        Ok(())
    }

    /// Providers that are both enabled and have credentials
    pub fn active_providers(&self) -> Vec<ProviderName> {
        let mut active = Vec::new();
        if self.providers.soundcloud.is_active() {
            active.push(ProviderName::SoundCloud);
        }
        if self.providers.youtube.is_active() {
            active.push(ProviderName::YouTube);
        }
        active
    }
}
