//! Gale Download
//!
//! Materializes web tracks as local audio files.
//!
//! # Flow
//!
//! 1. The provider adapter supplies the media URL (only downloadable results)
//! 2. The audio is streamed into a temp file beside the destination
//! 3. Artwork is fetched into a scratch temp file; failure is not fatal
//! 4. Tags and artwork are embedded with `lofty` on the blocking pool
//! 5. The temp file is renamed onto the destination
//!
//! # Example
//!
//! ```rust,no_run
//! use gale_core::GaleConfig;
//! use gale_download::{DownloadJob, DownloadOrchestrator};
//! use gale_providers::{HttpClient, ProviderRegistry, WebTrackResult};
//!
//! # async fn example(result: WebTrackResult) -> Result<(), Box<dyn std::error::Error>> {
//! let config = GaleConfig::default();
//! let registry = ProviderRegistry::from_config(&config)?;
//! let http = HttpClient::new(&config.http)?;
//! let orchestrator = DownloadOrchestrator::new(registry, http, config.download.clone());
//!
//! let path = orchestrator
//!     .download(&DownloadJob::into_dir(result, "/music"))
//!     .await?;
//! println!("Saved to {}", path.display());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod job;
pub mod orchestrator;
pub mod tagging;

pub use error::{DownloadError, Result};
pub use job::{suggested_file_name, DownloadJob, DownloadProgress};
pub use orchestrator::{DownloadOrchestrator, ProgressCallback};
pub use tagging::{embed_tags, TrackTags, SOURCE_ID_KEY};
