//! Gale Providers
//!
//! Adapters for external music catalogs and the plumbing they share.
//!
//! # Components
//!
//! - [`ProviderAdapter`]: special-URL resolution and keyword search for one catalog
//! - [`SoundCloudApi`] and [`YouTubeApi`]: the two bundled adapters
//! - [`normalize`]: provider records to [`WebTrackResult`]s
//! - [`PaginationResolver`]: single-shot and cursor-driven listings with a page bound
//! - [`ProviderRegistry`]: adapters built from [`gale_core::GaleConfig`]

#![forbid(unsafe_code)]

pub mod adapter;
pub mod error;
pub mod http;
pub mod normalize;
pub mod pagination;
pub mod registry;
pub mod soundcloud;
pub mod types;
pub mod youtube;

pub use adapter::ProviderAdapter;
pub use error::{ProviderError, Result};
pub use http::HttpClient;
pub use normalize::{escape_filename, normalize, normalize_all};
pub use pagination::{ContinuationPage, PaginationResolver};
pub use registry::ProviderRegistry;
pub use soundcloud::{SoundCloudApi, SoundCloudTrack};
pub use types::{PlaylistResolution, ProviderPayload, SpecialUrlMatch, WebTrackResult};
pub use youtube::{YouTubeApi, YouTubeVideo};
