//! Tag embedding for downloaded audio.
//!
//! All functions here do blocking file I/O; call them from
//! `tokio::task::spawn_blocking`.

use crate::error::Result;
use gale_providers::WebTrackResult;
use lofty::{Accessor, ItemKey, Picture, PictureType, Probe, Tag, TagExt, TaggedFileExt};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use tracing::{debug, warn};

/// Key holding the provider-native identifier
pub const SOURCE_ID_KEY: &str = "GALE_SOURCE_ID";

/// Metadata written into a downloaded file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackTags {
    pub title: String,
    pub artist: String,
    pub genre: Option<String>,
    pub comment: Option<String>,
    /// Provider-native id, e.g. the SoundCloud track id
    pub source_id: String,
}

impl TrackTags {
    pub fn from_result(result: &WebTrackResult) -> Self {
        Self {
            title: result.title.clone(),
            artist: result.uploader.clone(),
            genre: result.genres.iter().next().cloned(),
            comment: result.description.clone(),
            source_id: result.payload().native_id(),
        }
    }
}

/// Write `tags` (and the picture at `artwork`, if any) into the file at `audio`.
///
/// The file type is detected from content, not from the extension. An
/// unreadable picture is skipped; any other failure is returned.
pub fn embed_tags(audio: &Path, tags: &TrackTags, artwork: Option<&Path>) -> Result<()> {
    let mut tagged_file = Probe::open(audio)?.guess_file_type()?.read()?;

    // Get or create the primary tag
    let tag_type = tagged_file.primary_tag_type();
    let tag = match tagged_file.tag_mut(tag_type) {
        Some(t) => t,
        None => {
            tagged_file.insert_tag(Tag::new(tag_type));
            tagged_file.tag_mut(tag_type).ok_or_else(|| {
                io::Error::other(format!("{tag_type:?} tag could not be created"))
            })?
        }
    };

    if !tags.title.is_empty() {
        tag.set_title(tags.title.clone());
    }
    if !tags.artist.is_empty() {
        tag.set_artist(tags.artist.clone());
    }
    if let Some(genre) = &tags.genre {
        tag.set_genre(genre.clone());
    }
    if let Some(comment) = &tags.comment {
        tag.set_comment(comment.clone());
    }
    if !tags.source_id.is_empty() {
        tag.insert_text(ItemKey::Unknown(SOURCE_ID_KEY.to_string()), tags.source_id.clone());
    }

    if let Some(path) = artwork {
        match read_picture(path) {
            Ok(picture) => tag.push_picture(picture),
            Err(e) => warn!(path = ?path, error = %e, "Skipping unreadable artwork"),
        }
    }

    tag.save_to_path(audio)?;

    debug!(path = ?audio, tag_type = ?tag_type, "Tags written");
    Ok(())
}

fn read_picture(path: &Path) -> Result<Picture> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut picture = Picture::from_reader(&mut reader)?;
    picture.set_pic_type(PictureType::CoverFront);
    Ok(picture)
}
