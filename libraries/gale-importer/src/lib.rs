//! Gale Importer
//!
//! Turns search results into playable library tracks.
//!
//! # Features
//!
//! - Per-provider conversion keyed by the result's payload
//! - Bulk playlist conversion with progress reporting and cancellation
//! - Committing converted tracks into a playlist and triggering a save

#![forbid(unsafe_code)]

pub mod error;
pub mod pipeline;
pub mod playable;

pub use error::{ImportError, Result};
pub use pipeline::{ImportFailure, ImportOutcome, ImportPipeline, ImportStatus, ProgressCallback};
pub use playable::to_playable;
