//! YouTube Data API v3 adapter.

mod api;
mod duration;
mod models;

pub use api::{parse_youtube_link, YouTubeApi, YouTubeLink};
pub use duration::parse_iso8601_duration;
pub use models::{
    ContentDetails, PlaylistItem, PlaylistItemDetails, PlaylistItemsPage, Thumbnail, Thumbnails,
    VideoSnippet, VideoStatistics, YouTubeVideo,
};
