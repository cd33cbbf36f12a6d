//! Gale Search
//!
//! Coordinates keyword searches and provider-URL resolution across every
//! enabled provider, with at most one search logically active at a time.
//!
//! # Features
//!
//! - **Cancel and rendezvous**: a new search cancels the running one and waits for it to stop
//! - **URL fast path**: provider URLs resolve directly, skipping keyword search
//! - **Parallel fan-out**: keyword searches run on all providers in scope at once,
//!   each bounded by a timeout
//! - **Ordering**: results are merged by descending popularity, stable among equals
//! - **Recent searches**: a most-recently-used query list, case-insensitively deduplicated

#![forbid(unsafe_code)]

pub mod coordinator;
pub mod error;
pub mod recent;
pub mod types;

pub use coordinator::SearchCoordinator;
pub use error::{FailureKind, ProviderFailure, Result, SearchError};
pub use recent::RecentSearches;
pub use types::{sort_by_popularity, SearchOutcome, SearchResults, SearchScope, SearchState};
