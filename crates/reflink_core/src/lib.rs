//! Core reconciliation and ranking logic for reflink.
//! This crate is the single source of truth for linking invariants.

pub mod catalog;
pub mod config;
pub mod logging;
pub mod model;
pub mod normalize;
pub mod notes;
pub mod search;
pub mod service;
pub mod stats;
pub mod store;

pub use catalog::normalizer::{is_placeholder_title, normalize_collection, normalize_item};
pub use catalog::paths::{resolve_paths, CollectionPaths, BREADCRUMB_SEPARATOR};
pub use config::{ConfigError, LibraryConfig, LibraryKind};
pub use logging::{init_logging, logging_status, LogLevel, LoggingError};
pub use model::collection::Collection;
pub use model::entry::{Entry, RawCreator, RawItem, RawTag};
pub use model::notes::{NotesIndex, NotesLocation};
pub use notes::loader::{load_notes_index, load_notes_index_with_stats, LoadStats};
pub use notes::reconciler::{MatchTier, NotesMatch, ReconcileStats, Reconciler};
pub use notes::shape::IndexShape;
pub use search::ranker::{rank, SearchHit, SearchQuery};
pub use service::library_service::{
    build_snapshot, LibraryService, LibraryServiceError, ReloadOutcome,
};
pub use service::snapshot::{LibrarySnapshot, ReloadTicket, SnapshotCell};
pub use store::{
    next_page_url, InMemoryNotesSource, InMemoryReferenceStore, NotesSource, ReferenceStore,
    StoreError, StoreResult,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
