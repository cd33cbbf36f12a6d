//! SoundCloud public API adapter.

mod api;
mod models;

pub use api::{artwork_for_quality, SoundCloudApi};
pub use models::{PartitionedCollection, SoundCloudPlaylist, SoundCloudTrack, SoundCloudUser};
