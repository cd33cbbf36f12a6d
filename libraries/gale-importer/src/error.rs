//! Error types for the importer

use gale_core::{GaleError, ProviderName};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("{provider} result has no {field}")]
    MissingField {
        provider: ProviderName,
        field: &'static str,
    },

    #[error("Invalid source URL {url}: {reason}")]
    InvalidSourceUrl { url: String, reason: String },

    #[error("Playlist rejected track: {0}")]
    Target(#[source] GaleError),

    #[error("Library host failed: {0}")]
    Host(#[source] GaleError),
}

pub type Result<T> = std::result::Result<T, ImportError>;
