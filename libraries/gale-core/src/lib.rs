//! Gale Core
//!
//! Shared types, collaborator traits, and configuration for the Gale web track
//! search and import pipeline.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `ProviderName`, `PlayableTrack`, `TrackSource`, `ImportProgress`
//! - **Collaborator Traits**: `PlaylistTarget`, `LibraryHost` (implemented by the
//!   library/playback layer that owns persisted playlists and settings)
//! - **Configuration**: `GaleConfig`, loaded from TOML and `GALE__*` environment variables
//! - **Error Handling**: Unified `GaleError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use gale_core::{PlayableTrack, ProviderName, TrackSource};
//! use std::time::Duration;
//!
//! let track = PlayableTrack::new(
//!     "Night Drive",
//!     "Someone",
//!     Duration::from_secs(215),
//!     TrackSource::YouTube {
//!         video_id: "dQw4w9WgXcQ".to_string(),
//!     },
//! );
//!
//! assert_eq!(track.provider(), ProviderName::YouTube);
//! assert_eq!(track.source_url(), "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
//! ```

#![forbid(unsafe_code)]

pub mod settings;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use settings::{
    DownloadSettings, FailurePolicy, GaleConfig, HttpSettings, PaginationSettings,
    ProvidersConfig, SearchSettings, SoundCloudSettings, YouTubeSettings,
};
pub use error::{GaleError, Result};
pub use traits::{LibraryHost, PlaylistTarget};
pub use types::{ImageQuality, ImportProgress, PlayableTrack, ProviderName, TrackId, TrackSource};
