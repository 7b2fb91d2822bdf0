//! Library reload use-case service.
//!
//! # Responsibility
//! - Run one full reload: breadcrumbs, entry normalization, notes index,
//!   reconciliation.
//! - Hand the finished snapshot to `SnapshotCell` for atomic publication.
//!
//! # Invariants
//! - A store failure aborts the reload; the previous snapshot stays visible.
//! - A notes failure only degrades the reload: empty index, warning logged.
//! - Nothing from a previous reload is reused.
//! - Each collection key is listed once, even when the store repeats it.

use crate::catalog::normalizer::normalize_collection;
use crate::catalog::paths::resolve_paths;
use crate::model::notes::NotesIndex;
use crate::notes::loader::load_notes_index;
use crate::notes::reconciler::Reconciler;
use crate::search::ranker::SearchQuery;
use crate::service::snapshot::{LibrarySnapshot, SnapshotCell};
use crate::store::{NotesSource, ReferenceStore, StoreError};
use log::{info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Errors from library reloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryServiceError {
    /// Collection listing failed.
    Collections(StoreError),
    /// Item listing for one collection failed.
    Items {
        collection_key: String,
        source: StoreError,
    },
}

impl Display for LibraryServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Collections(err) => write!(f, "failed to list collections: {err}"),
            Self::Items {
                collection_key,
                source,
            } => write!(f, "failed to list items of `{collection_key}`: {source}"),
        }
    }
}

impl Error for LibraryServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Collections(err) => Some(err),
            Self::Items { source, .. } => Some(source),
        }
    }
}

/// Outcome of one reload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// The reload's snapshot is now current.
    Published(Arc<LibrarySnapshot>),
    /// A newer reload published first; this result was discarded.
    Superseded,
}

/// Library service facade over the two collaborators.
pub struct LibraryService<S: ReferenceStore, N: NotesSource> {
    store: S,
    notes: N,
    cell: SnapshotCell,
}

impl<S: ReferenceStore, N: NotesSource> LibraryService<S, N> {
    /// Creates service from collaborator implementations.
    pub fn new(store: S, notes: N) -> Self {
        Self {
            store,
            notes,
            cell: SnapshotCell::new(),
        }
    }

    /// Rebuilds everything from scratch and publishes the result.
    pub fn reload(&self) -> Result<ReloadOutcome, LibraryServiceError> {
        let ticket = self.cell.begin_reload();
        info!(
            "event=library_reload module=service status=start generation={}",
            ticket.generation()
        );

        let snapshot = build_snapshot(&self.store, &self.notes).map_err(|err| {
            warn!(
                "event=library_reload module=service status=error generation={} error={}",
                ticket.generation(),
                err
            );
            err
        })?;

        Ok(match self.cell.publish(ticket, snapshot) {
            Some(published) => ReloadOutcome::Published(published),
            None => ReloadOutcome::Superseded,
        })
    }

    /// Currently published snapshot, if any reload has completed.
    pub fn current(&self) -> Option<Arc<LibrarySnapshot>> {
        self.cell.current()
    }

    /// Ranks the current snapshot; empty before the first reload.
    pub fn search(&self, query: &SearchQuery) -> Vec<(String, u32)> {
        let Some(snapshot) = self.current() else {
            return Vec::new();
        };
        snapshot
            .search(query)
            .into_iter()
            .map(|hit| (hit.entry.id.clone(), hit.score))
            .collect()
    }

    /// Snapshot cell shared with callers that run their own reloads.
    pub fn cell(&self) -> &SnapshotCell {
        &self.cell
    }
}

/// Builds a complete, unpublished snapshot from the collaborators.
///
/// `generation` is assigned at publication time.
pub fn build_snapshot<S, N>(store: &S, notes: &N) -> Result<LibrarySnapshot, LibraryServiceError>
where
    S: ReferenceStore + ?Sized,
    N: NotesSource + ?Sized,
{
    let collections = store
        .list_collections()
        .map_err(LibraryServiceError::Collections)?;
    let paths = resolve_paths(&collections);

    let mut entries = Vec::new();
    let mut listed = HashSet::new();
    for collection in &collections {
        // Repeated keys resolve to their first occurrence, like the breadcrumbs.
        if !listed.insert(collection.key.as_str()) {
            continue;
        }
        let items = store
            .list_items(&collection.key)
            .map_err(|source| LibraryServiceError::Items {
                collection_key: collection.key.clone(),
                source,
            })?;
        let label = paths.label(&collection.key).unwrap_or(collection.name.as_str());
        entries.extend(normalize_collection(&items, &collection.key, label));
    }

    let location = notes.location();
    let (index, notes_available) = match notes.fetch_index() {
        Ok(document) => (load_notes_index(&document, location), true),
        Err(err) => {
            warn!(
                "event=notes_index_load module=service status=degraded error={}",
                err
            );
            (NotesIndex::empty(location.origin.clone()), false)
        }
    };

    let (entries, reconcile) = Reconciler::new(&index).reconcile_all(entries);
    info!(
        "event=library_build module=service status=ok collections={} entries={} linked={}",
        collections.len(),
        entries.len(),
        reconcile.linked()
    );

    Ok(LibrarySnapshot {
        generation: 0,
        collections,
        paths,
        entries,
        notes: index,
        reconcile,
        notes_available,
    })
}
